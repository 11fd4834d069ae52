//! Panel session
//!
//! Owns the simulation, the editor and the render configuration for one
//! script, and dispatches normalized input between them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::{Editor, EditorAction, InputEvent, Key};
use crate::error::ScriptError;
use crate::persistence;
use crate::renderer::{Surface, draw_scene};
use crate::settings::{RenderConfig, Settings};
use crate::sim::{SimEvent, SimMode, Simulation, advance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Run the script
    Play,
    /// Edit the script while it runs
    Editor,
}

impl SessionMode {
    fn sim_mode(self) -> SimMode {
        match self {
            SessionMode::Play => SimMode::Play,
            SessionMode::Editor => SimMode::Editor,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    mode: SessionMode,
    pub sim: Simulation,
    editor: Editor,
    render: RenderConfig,
    running: bool,
}

impl Session {
    /// Load a script. Editor sessions may start from a file that does not exist yet.
    pub fn open(path: &Path, mode: SessionMode, settings: &Settings) -> Result<Self, ScriptError> {
        let script = match mode {
            SessionMode::Play => persistence::load(path)?,
            SessionMode::Editor => persistence::load_or_empty(path)?,
        };
        let sim = Simulation::from_script(&script, mode.sim_mode(), settings.viewport);
        log::info!("{:?} session on {}", mode, path.display());
        Ok(Self {
            path: path.to_path_buf(),
            mode,
            sim,
            editor: Editor::new(settings.editor),
            render: settings.render,
            running: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.sim.clock.is_paused()
    }

    /// Unsaved editor changes
    pub fn is_modified(&self) -> bool {
        self.editor.history().is_modified()
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        if let InputEvent::KeyDown { key, modifiers } = *event
            && !modifiers.ctrl
        {
            match key {
                Key::P => {
                    let paused = self.sim.clock.toggle_pause();
                    log::info!("Simulation {}", if paused { "paused" } else { "resumed" });
                    return;
                }
                Key::L => {
                    self.render.toggle_hitboxes();
                    return;
                }
                Key::S => {
                    self.render.toggle_sprites();
                    return;
                }
                _ => {}
            }
        }

        match self.mode {
            SessionMode::Play => match event {
                InputEvent::Quit
                | InputEvent::KeyDown {
                    key: Key::Escape, ..
                } => self.running = false,
                _ => {}
            },
            SessionMode::Editor => match self.editor.handle_event(event, &mut self.sim) {
                EditorAction::None => {}
                EditorAction::Save => {
                    self.save();
                }
                EditorAction::Quit => self.running = false,
            },
        }
    }

    /// Advance the simulation by one frame delta (seconds)
    pub fn update(&mut self, frame_dt: f32) -> Vec<SimEvent> {
        advance(&mut self.sim, frame_dt)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let active = match self.mode {
            SessionMode::Play => None,
            SessionMode::Editor => self.editor.active(),
        };
        draw_scene(&self.sim, &self.render, active, surface);
    }

    /// Write the current entities back to the script.
    ///
    /// Returns false on failure; the modified flag then stays set.
    pub fn save(&mut self) -> bool {
        match persistence::save(&self.path, &self.sim.to_script()) {
            Ok(()) => {
                self.editor.history_mut().mark_saved();
                true
            }
            Err(e) => {
                log::error!("Save failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{HeldButtons, Modifiers, MouseButton};
    use crate::renderer::RecordingSurface;
    use crate::settings::Viewport;
    use glam::Vec2;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("my_radar_session_{}_{}", std::process::id(), name))
    }

    fn settings() -> Settings {
        Settings {
            viewport: Viewport::new(400.0, 400.0),
            ..Settings::default()
        }
    }

    #[test]
    fn test_play_requires_existing_script() {
        let err = Session::open(&temp_path("absent.rdr"), SessionMode::Play, &settings())
            .unwrap_err();
        assert_eq!(err.kind(), "FileNotFoundError");
    }

    #[test]
    fn test_editor_starts_blank() {
        let session =
            Session::open(&temp_path("blank.rdr"), SessionMode::Editor, &settings()).unwrap();
        assert!(session.sim.airplanes.is_empty());
        assert!(session.sim.towers.is_empty());
        assert!(!session.is_modified());
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let err = Session::open(&temp_path("map.txt"), SessionMode::Editor, &settings())
            .unwrap_err();
        assert_eq!(err.kind(), "ScriptParserError");
    }

    #[test]
    fn test_play_runs_to_completion() {
        let path = temp_path("play.rdr");
        std::fs::write(&path, "A 10 10 60 10 50 0\nT 300 300 20\n").unwrap();
        let mut session = Session::open(&path, SessionMode::Play, &settings()).unwrap();
        let mut landed = false;
        for _ in 0..200 {
            landed |= session.update(1.0 / 60.0).contains(&SimEvent::Landed(1));
        }
        assert!(landed);
        assert!(session.sim.is_finished());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_toggles_and_pause() {
        let mut session =
            Session::open(&temp_path("toggles.rdr"), SessionMode::Editor, &settings()).unwrap();
        session.handle_event(&InputEvent::key(Key::L));
        session.handle_event(&InputEvent::key(Key::S));
        assert!(!session.render_config().show_hitboxes);
        assert!(!session.render_config().show_sprites);

        session.handle_event(&InputEvent::key(Key::P));
        assert!(session.is_paused());
        session.update(0.05);
        assert_eq!(session.sim.clock.ticks, 0);
        session.handle_event(&InputEvent::key(Key::P));
        assert!(!session.is_paused());
    }

    #[test]
    fn test_edit_then_save() {
        let path = temp_path("edit.rdr");
        let mut session = Session::open(&path, SessionMode::Editor, &settings()).unwrap();
        session.handle_event(&InputEvent::MouseMove {
            pos: Vec2::new(100.0, 100.0),
            held: HeldButtons::default(),
        });
        session.handle_event(&InputEvent::key(Key::T));
        assert!(session.is_modified());

        session.handle_event(&InputEvent::KeyDown {
            key: Key::S,
            modifiers: Modifiers::CTRL,
        });
        assert!(!session.is_modified());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "T 100.0 100.0 100.0\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_failed_save_keeps_modified() {
        let path = temp_path("no_such_dir").join("map.rdr");
        let mut session = Session::open(&path, SessionMode::Editor, &settings()).unwrap();
        session.handle_event(&InputEvent::key(Key::A));
        assert!(!session.save());
        assert!(session.is_modified());
    }

    #[test]
    fn test_quit() {
        let mut session =
            Session::open(&temp_path("quit.rdr"), SessionMode::Editor, &settings()).unwrap();
        session.handle_event(&InputEvent::Quit);
        assert!(!session.is_running());
    }

    #[test]
    fn test_draw_highlights_dragged_entity() {
        let path = temp_path("draw.rdr");
        std::fs::write(&path, "T 100 100 30\nT 300 300 30\n").unwrap();
        let mut session = Session::open(&path, SessionMode::Editor, &settings()).unwrap();
        session.handle_event(&InputEvent::MouseButtonDown {
            pos: Vec2::new(100.0, 100.0),
            button: MouseButton::Left,
        });

        let mut surface = RecordingSurface::new();
        session.draw(&mut surface);
        let last_sprite = surface.sprites().last().map(|(_, center)| center);
        assert_eq!(last_sprite, Some(Vec2::new(100.0, 100.0)));
        let _ = std::fs::remove_file(&path);
    }
}
