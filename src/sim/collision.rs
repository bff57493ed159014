//! Scrolling, mine motion, collision and scoring
//!
//! All functions walk pooled records and skip inactive ones, so they work on
//! the whole pool or on any subset.

use glam::Vec2;

use super::obstacle::{Obstacle, ObstacleKind};
use crate::consts::{MINE_RADIUS, OFFSCREEN_X};

/// Move every active obstacle left by `dx`. Indices of obstacles that passed
/// `OFFSCREEN_X` are appended to `off_screen`; the caller releases them.
/// Returns how many were appended.
pub fn scroll_obstacles(obstacles: &mut [Obstacle], dx: f32, off_screen: &mut Vec<usize>) -> usize {
    let before = off_screen.len();
    for (i, o) in obstacles.iter_mut().enumerate() {
        if !o.active {
            continue;
        }
        o.x -= dx;
        if o.x < OFFSCREEN_X {
            off_screen.push(i);
        }
    }
    off_screen.len() - before
}

/// Place each active mine on its oscillation curve at `elapsed_ms`.
/// Depends only on elapsed time, never on accumulated deltas.
pub fn update_mines(obstacles: &mut [Obstacle], elapsed_ms: f64) {
    let t = elapsed_ms / 1000.0;
    for o in obstacles.iter_mut() {
        if !o.active || o.kind != ObstacleKind::Mine {
            continue;
        }
        let mid = o.gap_mid();
        if let Some(m) = o.mine.as_mut() {
            let angle = t * f64::from(m.frequency) * std::f64::consts::TAU + f64::from(m.phase);
            m.y = mid + angle.sin() as f32 * m.amplitude;
        }
    }
}

/// Circle vs. an obstacle's solid parts
pub fn collides(o: &Obstacle, player: Vec2, radius: f32) -> bool {
    match o.kind {
        ObstacleKind::Laser | ObstacleKind::Corridor => {
            let overlaps_x = player.x + radius > o.x && player.x - radius < o.right();
            overlaps_x && (player.y - radius < o.top_y || player.y + radius > o.bottom_y)
        }
        ObstacleKind::Mine => {
            let center = Vec2::new(o.x, o.mine_y());
            let reach = radius + MINE_RADIUS;
            player.distance_squared(center) < reach * reach
        }
    }
}

/// Index of the first active obstacle the player overlaps
pub fn find_collision(obstacles: &[Obstacle], player: Vec2, radius: f32) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| o.active && collides(o, player, radius))
}

/// True if the player overlaps any active obstacle. Any hit is fatal.
#[inline]
pub fn check_collision(obstacles: &[Obstacle], player: Vec2, radius: f32) -> bool {
    find_collision(obstacles, player, radius).is_some()
}

/// Mark obstacles the player has fully passed. Each scores once.
/// Returns the number newly scored.
pub fn score_obstacles(obstacles: &mut [Obstacle], player_x: f32) -> u32 {
    let mut count = 0;
    for o in obstacles.iter_mut() {
        if !o.active || o.scored {
            continue;
        }
        if player_x > o.right() {
            o.scored = true;
            count += 1;
        }
    }
    count
}
