//! G-VOID - a gravity-flip reflex runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity body, obstacles, collisions, run state)
//! - `driver`: Frame loop that feeds display frames into fixed simulation ticks
//! - `settings`: Play-field and tuning configuration
//! - `highscores`: Best-score board fed by death events

pub mod driver;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use driver::{FrameDriver, FrameOutcome, HapticKind, RunObserver};
pub use error::ConfigError;
pub use highscores::HighScores;
pub use settings::{PlayField, Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; per-tick speeds and drag are tuned for it)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Fixed timestep in milliseconds
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted (seconds); longer stalls are dropped
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Default play-field dimensions
    pub const DEFAULT_WIDTH: f32 = 390.0;
    pub const DEFAULT_HEIGHT: f32 = 844.0;
    pub const WALL_THICKNESS: f32 = 32.0;

    /// Player defaults - stationary body at 20% of the field width
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_X_RATIO: f32 = 0.2;
    /// Collision radius is the visual radius minus this inset
    pub const HITBOX_INSET: f32 = 2.0;

    /// Gravity force magnitude (scaled by `GRAVITY_SCALE` into units/ms²)
    pub const GRAVITY: f32 = 1.4;
    pub const GRAVITY_SCALE: f32 = 0.001;
    /// Air drag applied per tick
    pub const DRAG: f32 = 0.04;
    /// Force applied on flip, in the new gravity direction
    pub const FLIP_KICK: f32 = 0.006;
    /// Body density (mass = density * area)
    pub const BODY_DENSITY: f32 = 0.001;

    /// World distance before the first obstacle spawns
    pub const FIRST_SPAWN_X: f32 = 900.0;
    /// Obstacles spawn this far past the right edge
    pub const SPAWN_MARGIN: f32 = 60.0;
    /// Obstacles left of this x are recycled
    pub const OFFSCREEN_X: f32 = -200.0;
    /// Mine hazard radius
    pub const MINE_RADIUS: f32 = 18.0;

    /// One coin per this many points
    pub const COIN_EVERY: u32 = 5;
}

/// Generate a fresh run seed from the thread RNG
pub fn random_seed() -> u64 {
    use rand::Rng;
    rand::rng().random()
}
