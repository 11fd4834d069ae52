//! My Radar - air traffic simulation panel and script editor
//!
//! Core modules:
//! - `sim`: Deterministic simulation (airplanes, towers, collisions)
//! - `editor`: Selection, edit gestures and undo/redo history
//! - `persistence`: `.rdr` script loading and saving
//! - `renderer`: Drawing contract towards an external surface
//! - `session`: Play/editor session wiring the above together

pub mod editor;
pub mod error;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{EditError, ScriptError};
pub use session::{Session, SessionMode};
pub use settings::{RenderConfig, Settings, Viewport};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation sub-step (10 ms of simulated time)
    pub const STEP_MS: u64 = 10;
    /// Sub-steps per simulated second
    pub const STEPS_PER_SECOND: u32 = 100;
    /// Sub-step length in seconds
    pub const STEP_SECONDS: f32 = 1.0 / STEPS_PER_SECOND as f32;
    /// Longest frame delta fed to the accumulator
    pub const MAX_FRAME_DELTA: f32 = 0.1;
    /// Maximum sub-steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS_PER_FRAME: u32 = 10;

    /// Airplane sprite/hitbox size in pixels
    pub const AIRPLANE_SIZE: Vec2 = Vec2::new(20.0, 20.0);
    /// Half extents of the airplane hitbox
    pub const AIRPLANE_HALF_EXTENTS: Vec2 = Vec2::new(10.0, 10.0);

    /// Default viewport (1080p display)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1920.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 1080.0;

    /// Grab distance around an airplane's arrival marker
    pub const ARRIVAL_HANDLE_RADIUS: f32 = 8.0;
    /// Grab distance around a tower's rim (resize handle)
    pub const TOWER_RIM_TOLERANCE: f32 = 6.0;
    /// Smallest radius a tower can be resized to
    pub const MIN_TOWER_RADIUS: f32 = 1.0;
}

/// Scale a vector to the given length (zero vectors stay zero)
#[inline]
pub fn scale_to_length(v: Vec2, length: f32) -> Vec2 {
    v.normalize_or_zero() * length
}

/// Rotate a vector counterclockwise by `degrees`
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_angle_deg(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Signed angle in degrees that rotates `from` onto `to`
pub fn angle_between_deg(from: Vec2, to: Vec2) -> f32 {
    let a = from.y.atan2(from.x);
    let b = to.y.atan2(to.x);
    normalize_angle_deg((b - a).to_degrees())
}

/// Heading of a direction vector in screen degrees.
///
/// Screen space has y pointing down, so the heading is the angle from the
/// direction back onto the +x axis: a plane flying towards +y has heading -90.
#[inline]
pub fn heading_deg(direction: Vec2) -> f32 {
    angle_between_deg(direction, Vec2::X)
}
