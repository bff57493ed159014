//! Run state and core simulation types
//!
//! One `GameState` per run: the body, the level, the obstacle pool, the run
//! clock and the phase machine. Collaborators read it between frames through
//! `Snapshot` and the event queue, never by mutating it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Gravity, GravityBody};
use super::collision::collides;
use super::level::LevelState;
use super::obstacle::{ObstacleKind, ObstaclePool};
use super::tier::SpeedTier;
use crate::settings::{PlayField, Tuning};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, not started
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Frozen, no stepping of any kind
    Paused,
    /// Hit an obstacle. Terminal unless continued.
    Dead,
}

/// Something a collaborator may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Flipped { gravity: Gravity },
    ScoreChanged { score: u32 },
    TierChanged { tier: SpeedTier },
    CoinsEarned { amount: u32 },
    Died { score: u32, tier: SpeedTier },
    Continued,
}

/// Copy of one obstacle for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub x: f32,
    pub width: f32,
    pub top_y: f32,
    pub bottom_y: f32,
    pub mine_y: Option<f32>,
}

/// Copy of everything a renderer or HUD needs from a frame
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: Vec2,
    pub player_radius: f32,
    pub gravity: Gravity,
    pub score: u32,
    pub tier: SpeedTier,
    pub speed: f32,
    pub world_x: f32,
    pub obstacles: Vec<ObstacleView>,
}

/// Complete run state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub field: PlayField,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub body: GravityBody,
    pub level: LevelState,
    pub pool: ObstaclePool,
    /// Run clock; only advances while running
    pub elapsed_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// The one continue of this run has been spent
    pub continue_used: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle run with the given seed
    pub fn new(field: PlayField, tuning: Tuning, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            tuning,
            phase: GamePhase::Idle,
            body: GravityBody::new(&field, &tuning),
            level: LevelState::new(),
            pool: ObstaclePool::new(),
            elapsed_ms: 0.0,
            time_ticks: 0,
            continue_used: false,
            events: Vec::new(),
        }
    }

    /// Start (or retry) a run: fresh score, level, body and empty obstacle view.
    /// Pool records stay allocated for reuse.
    pub fn start(&mut self) {
        self.body = GravityBody::new(&self.field, &self.tuning);
        self.level.reset();
        self.pool.release_all();
        self.elapsed_ms = 0.0;
        self.time_ticks = 0;
        self.continue_used = false;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);
        log::info!("Run started (seed {})", self.seed);
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
            log::debug!("Paused at tick {}", self.time_ticks);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
            log::debug!("Resumed at tick {}", self.time_ticks);
        }
    }

    /// Resume a dead run in place, keeping score, scroll and obstacles.
    /// Needs the collaborator's permission and works once per run.
    /// Obstacles overlapping the body are released so it is not hit again
    /// on the first resumed frame.
    pub fn try_continue(&mut self, may_continue: bool) -> bool {
        if self.phase != GamePhase::Dead {
            return false;
        }
        if self.continue_used {
            log::warn!("Continue rejected: already used this run");
            return false;
        }
        if !may_continue {
            log::info!("Continue not permitted");
            return false;
        }

        let player = self.body.pos;
        let radius = self.tuning.hit_radius();
        for &index in &self.level.obstacles {
            if collides(&self.pool[index], player, radius) {
                self.pool.release(index);
            }
        }
        let pool = &self.pool;
        self.level.obstacles.retain(|&i| pool[i].active);

        self.continue_used = true;
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Continued);
        log::info!("Run continued at score {}", self.level.score);
        true
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.level.score
    }

    #[inline]
    pub fn tier(&self) -> SpeedTier {
        SpeedTier::for_score(self.level.score)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    /// Events queued since the last drain
    #[inline]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take queued events, keeping the buffer
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Copy render-relevant state into `out`, reusing its buffers
    pub fn fill_snapshot(&self, out: &mut Snapshot) {
        out.phase = self.phase;
        out.player = self.body.pos;
        out.player_radius = self.body.radius;
        out.gravity = self.body.gravity;
        out.score = self.level.score;
        out.tier = self.tier();
        out.speed = self.level.speed;
        out.world_x = self.level.world_x;
        out.obstacles.clear();
        out.obstacles.extend(self.level.obstacles.iter().map(|&i| {
            let o = &self.pool[i];
            ObstacleView {
                id: o.id,
                kind: o.kind,
                x: o.x,
                width: o.width,
                top_y: o.top_y,
                bottom_y: o.bottom_y,
                mine_y: o.mine.map(|m| m.y),
            }
        }));
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut out = Snapshot::default();
        self.fill_snapshot(&mut out);
        out
    }
}
