//! Fixed timestep simulation tick
//!
//! Per-tick order is fixed: flip, step and clamp the body, advance the level
//! (scroll, spawn, mines), test collision, then either die or score.

use super::body::Gravity;
use super::collision::{find_collision, score_obstacles, update_mines};
use super::state::{GameEvent, GamePhase, GameState};
use super::tier::SpeedTier;
use crate::consts::{COIN_EVERY, GRAVITY_SCALE, SIM_DT_MS};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flip gravity (tap)
    pub flip: bool,
    /// Idle/demo mode - autopilot decides flips
    pub idle_mode: bool,
}

/// Advance the run by one fixed timestep of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Nothing steps unless running; flips while paused or dead are dropped
    if state.phase != GamePhase::Running {
        return;
    }

    let dt_ms = dt * 1000.0;
    state.time_ticks += 1;
    state.elapsed_ms += f64::from(dt_ms);

    let flip = input.flip || (input.idle_mode && autopilot_wants_flip(state));
    if flip {
        state.body.flip();
        let gravity = state.body.gravity;
        state.push_event(GameEvent::Flipped { gravity });
    }

    state.body.step(dt_ms);
    state.body.clamp(&state.field);

    state
        .level
        .update(&mut state.pool, &state.field, &mut state.rng);
    update_mines(state.pool.records_mut(), state.elapsed_ms);

    let radius = state.tuning.hit_radius();
    if let Some(index) = find_collision(state.pool.records(), state.body.pos, radius) {
        state.phase = GamePhase::Dead;
        let score = state.level.score;
        let tier = SpeedTier::for_score(score);
        state.push_event(GameEvent::Died { score, tier });
        log::info!(
            "Died on {:?} #{} at score {} ({}), tick {}",
            state.pool[index].kind,
            state.pool[index].id,
            score,
            tier.label(),
            state.time_ticks
        );
        return;
    }

    let passed = score_obstacles(state.pool.records_mut(), state.body.pos.x);
    if passed > 0 {
        let old = state.level.score;
        let score = old.saturating_add(passed);
        state.level.score = score;
        state.push_event(GameEvent::ScoreChanged { score });

        let coins = score / COIN_EVERY - old / COIN_EVERY;
        if coins > 0 {
            state.push_event(GameEvent::CoinsEarned { amount: coins });
        }

        let old_tier = SpeedTier::for_score(old);
        let tier = SpeedTier::for_score(score);
        state.level.tier = tier;
        state.level.speed = tier.speed();
        if tier != old_tier {
            state.push_event(GameEvent::TierChanged { tier });
            log::debug!("Tier {old_tier:?} -> {tier:?} at score {score}");
        }
    }
}

/// Dead zone around the target y where the autopilot leaves gravity alone
const AUTOPILOT_DEAD_ZONE: f32 = 12.0;
/// Per-tick speed below which the dead zone applies
const AUTOPILOT_SETTLE_SPEED: f32 = 3.0;
/// How far the autopilot keeps from a mine's center
const AUTOPILOT_MINE_CLEARANCE: f32 = 90.0;

/// Steer toward the next obstacle's safe y. Brakes by flipping early when
/// the body would overshoot the target under the current pull.
fn autopilot_wants_flip(state: &GameState) -> bool {
    let body = &state.body;
    let (min_y, max_y) = body.bounds(&state.field);
    let target = autopilot_target(state).clamp(min_y, max_y);

    let error = target - body.pos.y;
    // Per-tick units
    let v = body.vel_y * SIM_DT_MS;
    let accel = state.tuning.gravity * GRAVITY_SCALE * SIM_DT_MS * SIM_DT_MS;

    if error.abs() < AUTOPILOT_DEAD_ZONE && v.abs() < AUTOPILOT_SETTLE_SPEED {
        return false;
    }

    let wanted = if v * error > 0.0 && accel > 0.0 && v * v / (2.0 * accel) >= error.abs() {
        // Moving toward the target but too fast to stop: pull the other way
        if v > 0.0 {
            Gravity::Inverted
        } else {
            Gravity::Normal
        }
    } else if error > 0.0 {
        Gravity::Normal
    } else {
        Gravity::Inverted
    };

    wanted != body.gravity
}

fn autopilot_target(state: &GameState) -> f32 {
    let px = state.body.pos.x;
    let r = state.body.radius;
    let next = state
        .level
        .obstacles
        .iter()
        .map(|&i| &state.pool[i])
        .filter(|o| o.active && !o.scored && o.right() + r >= px)
        .min_by(|a, b| a.x.total_cmp(&b.x));

    match next {
        Some(o) if o.mine.is_some() => {
            let mine_y = o.mine_y();
            if mine_y < state.field.height / 2.0 {
                mine_y + AUTOPILOT_MINE_CLEARANCE
            } else {
                mine_y - AUTOPILOT_MINE_CLEARANCE
            }
        }
        Some(o) => o.gap_mid(),
        None => state.field.height / 2.0,
    }
}
