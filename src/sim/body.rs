//! The player body
//!
//! One circle at a fixed x with a single vertical degree of freedom.
//! A constant force (not mass-scaled) pulls it toward the floor or the
//! ceiling; a flip toggles the sign.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BODY_DENSITY, GRAVITY_SCALE, SIM_DT_MS};
use crate::settings::{PlayField, Tuning};

/// Direction of the constant force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gravity {
    /// Pulls toward the floor (+y)
    #[default]
    Normal,
    /// Pulls toward the ceiling (-y)
    Inverted,
}

impl Gravity {
    /// +1 for normal, -1 for inverted
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Gravity::Normal => 1.0,
            Gravity::Inverted => -1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Gravity::Normal => Gravity::Inverted,
            Gravity::Inverted => Gravity::Normal,
        }
    }
}

/// The simulated player body. Velocity is in units/ms.
#[derive(Debug, Clone)]
pub struct GravityBody {
    pub pos: Vec2,
    pub vel_y: f32,
    pub gravity: Gravity,
    pub radius: f32,
    force: f32,
    drag: f32,
    flip_kick: f32,
    mass: f32,
}

impl GravityBody {
    /// Create a body centered vertically at `player_x_ratio` of the field width
    pub fn new(field: &PlayField, tuning: &Tuning) -> Self {
        let radius = tuning.player_radius;
        Self {
            pos: Vec2::new(field.width * tuning.player_x_ratio, field.height / 2.0),
            vel_y: 0.0,
            gravity: Gravity::Normal,
            radius,
            force: tuning.gravity,
            drag: tuning.drag,
            flip_kick: tuning.flip_kick,
            mass: BODY_DENSITY * std::f32::consts::PI * radius * radius,
        }
    }

    /// Toggle the force sign and kick the body toward the new direction,
    /// so the flip reads immediately instead of waiting for gravity to win.
    pub fn flip(&mut self) {
        self.gravity = self.gravity.flipped();
        if self.mass > 0.0 {
            self.vel_y += self.gravity.sign() * self.flip_kick / self.mass * SIM_DT_MS;
        }
    }

    /// Integrate one step of `dt_ms` milliseconds
    pub fn step(&mut self, dt_ms: f32) {
        let accel = self.gravity.sign() * self.force * GRAVITY_SCALE;
        self.vel_y += accel * dt_ms;
        self.vel_y *= 1.0 - self.drag;
        self.pos.y += self.vel_y * dt_ms;
    }

    /// Vertical bounds for the body center
    #[inline]
    pub fn bounds(&self, field: &PlayField) -> (f32, f32) {
        let min = field.wall_thickness + self.radius;
        let max = (field.height - field.wall_thickness - self.radius).max(min);
        (min, max)
    }

    /// Hard-clamp into the play field, zeroing velocity on contact.
    /// Runs every frame: a single step can overshoot a wall.
    pub fn clamp(&mut self, field: &PlayField) {
        let (min, max) = self.bounds(field);
        if self.pos.y < min {
            self.pos.y = min;
            self.vel_y = 0.0;
        } else if self.pos.y > max {
            self.pos.y = max;
            self.vel_y = 0.0;
        }
    }

    #[inline]
    pub fn is_gravity_normal(&self) -> bool {
        self.gravity == Gravity::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body() -> (GravityBody, PlayField) {
        let field = PlayField::default();
        (GravityBody::new(&field, &Tuning::default()), field)
    }

    #[test]
    fn test_starts_centered_with_normal_gravity() {
        let (body, field) = body();
        assert_eq!(body.pos, Vec2::new(field.width * 0.2, field.height / 2.0));
        assert_eq!(body.vel_y, 0.0);
        assert!(body.is_gravity_normal());
    }

    #[test]
    fn test_falls_toward_floor() {
        let (mut body, _) = body();
        let start = body.pos.y;
        for _ in 0..10 {
            body.step(SIM_DT_MS);
        }
        assert!(body.pos.y > start);
        assert!(body.vel_y > 0.0);
    }

    #[test]
    fn test_flip_reverses_and_kicks() {
        let (mut body, _) = body();
        body.flip();
        assert_eq!(body.gravity, Gravity::Inverted);
        assert!(body.vel_y < 0.0, "kick should point toward the ceiling");
        let start = body.pos.y;
        for _ in 0..10 {
            body.step(SIM_DT_MS);
        }
        assert!(body.pos.y < start);

        body.flip();
        assert!(body.is_gravity_normal());
    }

    #[test]
    fn test_drag_caps_velocity() {
        let (mut body, _) = body();
        for _ in 0..1000 {
            body.step(SIM_DT_MS);
        }
        // Terminal velocity: a*dt*(1-d)/d
        let a = GRAVITY_SCALE * 1.4 * SIM_DT_MS;
        let terminal = a * 0.96 / 0.04;
        assert!((body.vel_y - terminal).abs() < 1e-3);
    }

    #[test]
    fn test_clamp_zeroes_velocity() {
        let (mut body, field) = body();
        body.pos.y = field.height + 50.0;
        body.vel_y = 3.0;
        body.clamp(&field);
        let floor = field.height - field.wall_thickness - body.radius;
        assert_eq!(body.pos.y, floor);
        assert_eq!(body.vel_y, 0.0);

        body.pos.y = -10.0;
        body.vel_y = -3.0;
        body.clamp(&field);
        assert_eq!(body.pos.y, field.wall_thickness + body.radius);
        assert_eq!(body.vel_y, 0.0);
    }

    #[test]
    fn test_clamp_leaves_interior_alone() {
        let (mut body, field) = body();
        body.vel_y = 0.2;
        body.clamp(&field);
        assert_eq!(body.vel_y, 0.2);
    }

    proptest! {
        #[test]
        fn prop_clamp_keeps_body_in_bounds(
            flips in proptest::collection::vec(any::<bool>(), 1..400),
        ) {
            let (mut body, field) = body();
            let (min, max) = body.bounds(&field);
            for flip in flips {
                if flip {
                    body.flip();
                }
                body.step(SIM_DT_MS);
                body.clamp(&field);
                prop_assert!(body.pos.y >= min && body.pos.y <= max);
            }
        }
    }
}
