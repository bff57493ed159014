//! Level director
//!
//! Owns world scroll, spawn scheduling and the view of live obstacles.
//! Speed and tier are re-derived from score every update.

use rand::Rng;

use super::collision::scroll_obstacles;
use super::obstacle::{ObstaclePool, spawn_obstacle};
use super::tier::SpeedTier;
use crate::consts::FIRST_SPAWN_X;
use crate::settings::PlayField;

/// Spawn spacing at score 0
pub const MAX_SPAWN_DISTANCE: f32 = 500.0;
/// Spawn spacing from score 100 on
pub const MIN_SPAWN_DISTANCE: f32 = 340.0;
/// Score at which spacing stops tightening
pub const SPACING_FULL_SCORE: f32 = 100.0;

/// World distance between consecutive spawns. Tightens until score 100, then holds.
#[inline]
pub fn spawn_distance(score: u32) -> f32 {
    let progress = (score as f32 / SPACING_FULL_SCORE).min(1.0);
    MAX_SPAWN_DISTANCE - (MAX_SPAWN_DISTANCE - MIN_SPAWN_DISTANCE) * progress
}

#[derive(Debug, Clone)]
pub struct LevelState {
    /// Pool indices of live obstacles, in spawn order
    pub obstacles: Vec<usize>,
    /// Cumulative scroll distance
    pub world_x: f32,
    /// World distance at which the next obstacle spawns
    pub next_spawn_x: f32,
    /// Scroll speed (units/tick), derived from score
    pub speed: f32,
    pub score: u32,
    /// Derived from score
    pub tier: SpeedTier,
    /// Reused scratch for off-screen indices
    off_screen: Vec<usize>,
}

impl Default for LevelState {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelState {
    pub fn new() -> Self {
        Self {
            obstacles: Vec::new(),
            world_x: 0.0,
            next_spawn_x: FIRST_SPAWN_X,
            speed: SpeedTier::Easy.speed(),
            score: 0,
            tier: SpeedTier::Easy,
            off_screen: Vec::new(),
        }
    }

    /// Back to a fresh level, keeping buffer capacity
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.off_screen.clear();
        self.world_x = 0.0;
        self.next_spawn_x = FIRST_SPAWN_X;
        self.score = 0;
        self.tier = SpeedTier::Easy;
        self.speed = self.tier.speed();
    }

    /// Advance one tick: derive speed, scroll, recycle, spawn, compact.
    pub fn update(&mut self, pool: &mut ObstaclePool, field: &PlayField, rng: &mut impl Rng) {
        self.tier = SpeedTier::for_score(self.score);
        self.speed = self.tier.speed();
        self.world_x += self.speed;

        self.off_screen.clear();
        scroll_obstacles(pool.records_mut(), self.speed, &mut self.off_screen);
        for &index in &self.off_screen {
            pool.release(index);
        }

        if self.world_x >= self.next_spawn_x {
            let index = spawn_obstacle(pool, self.score, field, field.spawn_x(), rng);
            self.obstacles.push(index);
            self.next_spawn_x = self.world_x + spawn_distance(self.score);
        }

        self.obstacles.retain(|&i| pool[i].active);
    }
}
