//! Frame loop driver
//!
//! Called once per display frame with the real frame delta. Feeds the delta
//! into an accumulator and runs fixed simulation ticks, then hands the
//! tick's events to the collaborator.

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, SpeedTier, TickInput, tick};

/// Haptic pulse strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticKind {
    /// Gravity flip
    Light,
    /// Death
    Heavy,
}

/// Everything outside the simulation: HUD, persistence, platform bridge.
/// All methods default to no-ops.
pub trait RunObserver {
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_tier_changed(&mut self, _tier: SpeedTier) {}
    fn on_coins_earned(&mut self, _amount: u32) {}
    /// Fired once per entry into the dead phase
    fn on_death(&mut self, _score: u32, _tier: SpeedTier) {}
    fn haptic(&mut self, _kind: HapticKind) {}

    /// Gate for `haptic` calls
    fn haptics_enabled(&self) -> bool {
        false
    }

    /// Gate for resuming a dead run (e.g. after a rewarded ad)
    fn may_continue(&self) -> bool {
        false
    }

    /// Player skin color (hex). Presentation only.
    fn skin_color(&self) -> Option<&str> {
        None
    }

    /// Player trail color (hex). Presentation only.
    fn trail_color(&self) -> Option<&str> {
        None
    }
}

/// Result of one display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not started yet
    Idle,
    Running,
    Paused,
    /// Run ended; no further stepping until continue or restart
    Dead,
    /// Loop torn down
    Stopped,
}

/// Owns a run and drives it from display frames
pub struct FrameDriver {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    /// Loop registered; cleared by `stop`
    active: bool,
    snapshot: Snapshot,
}

impl FrameDriver {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            state: GameState::new(settings.field, settings.tuning, seed),
            input: TickInput::default(),
            accumulator: 0.0,
            active: true,
            snapshot: Snapshot::default(),
        }
    }

    /// Start or retry the run
    pub fn start(&mut self, observer: &mut impl RunObserver) {
        self.state.start();
        self.accumulator = 0.0;
        self.input.flip = false;
        self.active = true;
        self.dispatch(observer);
    }

    /// Queue a gravity flip for the next tick. Ignored unless running.
    pub fn flip(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.input.flip = true;
        }
    }

    pub fn pause(&mut self) {
        self.state.pause();
        self.input.flip = false;
    }

    pub fn resume(&mut self) {
        self.state.resume();
        // No catch-up burst for time spent paused
        self.accumulator = 0.0;
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Resume a dead run in place if the observer allows it
    pub fn try_continue(&mut self, observer: &mut impl RunObserver) -> bool {
        let resumed = self.state.try_continue(observer.may_continue());
        if resumed {
            self.accumulator = 0.0;
            self.dispatch(observer);
        }
        resumed
    }

    /// Tear down the loop. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.active {
            log::debug!("Frame loop stopped at tick {}", self.state.time_ticks);
        }
        self.active = false;
        self.accumulator = 0.0;
        self.input = TickInput::default();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run the ticks owed for `dt` seconds of real time
    pub fn frame(&mut self, dt: f32, observer: &mut impl RunObserver) -> FrameOutcome {
        if !self.active {
            return FrameOutcome::Stopped;
        }
        match self.state.phase {
            GamePhase::Idle => return FrameOutcome::Idle,
            GamePhase::Paused => return FrameOutcome::Paused,
            GamePhase::Dead => return FrameOutcome::Dead,
            GamePhase::Running => {}
        }

        // A non-finite delta would poison the accumulator for good
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.flip = false;

            self.dispatch(observer);
            if self.state.phase == GamePhase::Dead {
                self.accumulator = 0.0;
                return FrameOutcome::Dead;
            }
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        FrameOutcome::Running
    }

    fn dispatch(&mut self, observer: &mut impl RunObserver) {
        for event in self.state.drain_events() {
            match event {
                // Fresh run: collaborators drop whatever the last run showed
                GameEvent::Started => {
                    observer.on_score_changed(0);
                    observer.on_tier_changed(SpeedTier::Easy);
                }
                GameEvent::Continued => {}
                GameEvent::Flipped { .. } => {
                    if observer.haptics_enabled() {
                        observer.haptic(HapticKind::Light);
                    }
                }
                GameEvent::ScoreChanged { score } => observer.on_score_changed(score),
                GameEvent::TierChanged { tier } => observer.on_tier_changed(tier),
                GameEvent::CoinsEarned { amount } => observer.on_coins_earned(amount),
                GameEvent::Died { score, tier } => {
                    observer.on_death(score, tier);
                    if observer.haptics_enabled() {
                        observer.haptic(HapticKind::Heavy);
                    }
                }
            }
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current frame copied for the renderer
    pub fn snapshot(&mut self) -> &Snapshot {
        self.state.fill_snapshot(&mut self.snapshot);
        &self.snapshot
    }
}
