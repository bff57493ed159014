//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No allocation per tick beyond obstacle pool growth
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod level;
pub mod obstacle;
pub mod state;
pub mod tick;
pub mod tier;

pub use body::{Gravity, GravityBody};
pub use collision::{
    check_collision, find_collision, score_obstacles, scroll_obstacles, update_mines,
};
pub use level::{LevelState, spawn_distance};
pub use obstacle::{
    MineMotion, Obstacle, ObstacleKind, ObstaclePool, gap_for_score, kind_for_score, spawn_obstacle,
};
pub use state::{GameEvent, GamePhase, GameState, ObstacleView, Snapshot};
pub use tick::{TickInput, tick};
pub use tier::{SPEED_TIERS, SpeedTier, TierInfo, speed_for_score};
