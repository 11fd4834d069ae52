//! Panel settings and preferences
//!
//! Persisted as JSON next to the scripts; every field has a default so older
//! files keep loading.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};

/// Display toggles shared by every entity of the panel.
///
/// Passed explicitly into draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw airplane and tower sprites
    pub show_sprites: bool,
    /// Draw airplane hitboxes and tower areas
    pub show_hitboxes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_sprites: true,
            show_hitboxes: true,
        }
    }
}

impl RenderConfig {
    pub fn toggle_sprites(&mut self) {
        self.show_sprites = !self.show_sprites;
    }

    pub fn toggle_hitboxes(&mut self) {
        self.show_hitboxes = !self.show_hitboxes;
    }
}

/// Map bounds in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Parameters used by the editor when creating and key-editing entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Speed of a freshly created airplane (px/s)
    pub airplane_speed: f32,
    /// Takeoff delay of a freshly created airplane (s)
    pub airplane_delay: f32,
    /// Radius of a freshly created tower (px)
    pub tower_radius: f32,
    /// Speed change per `+`/`-` key press
    pub speed_step: f32,
    /// Delay change per `PageUp`/`PageDown` key press
    pub delay_step: f32,
    /// Radius change per `+`/`-` key press
    pub radius_step: f32,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            airplane_speed: 10.0,
            airplane_delay: 0.0,
            tower_radius: 100.0,
            speed_step: 10.0,
            delay_step: 1.0,
            radius_step: 10.0,
        }
    }
}

/// Panel settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    pub viewport: Viewport,
    pub editor: EditorDefaults,
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(SettingsError::Io(e)),
        };
        let settings: Self = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

/// Failure while reading or writing a settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings format: {0}")]
    Format(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.render.show_sprites);
        assert!(settings.render.show_hitboxes);
        assert_eq!(settings.viewport.center(), Vec2::new(960.0, 540.0));
        assert_eq!(settings.editor.tower_radius, 100.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"render": {"show_sprites": false}}"#).unwrap();
        assert!(!settings.render.show_sprites);
        assert!(settings.render.show_hitboxes);
        assert_eq!(settings.viewport, Viewport::default());
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join("my_radar_settings_test.json");
        let mut settings = Settings::default();
        settings.render.toggle_hitboxes();
        settings.viewport = Viewport::new(200.0, 200.0);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let path = std::env::temp_dir().join("my_radar_settings_malformed.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Format(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("my_radar_settings_absent.json");
        let _ = std::fs::remove_file(&path);
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }
}
