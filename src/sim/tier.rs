//! Speed tiers
//!
//! Score maps to one of five tiers; each tier fixes the scroll speed.
//! Labels and colors are for the HUD only.

use serde::{Deserialize, Serialize};

/// Discrete speed/difficulty bracket
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum SpeedTier {
    #[default]
    Easy,
    Normal,
    Fast,
    Hyper,
    Void,
}

/// Static properties of a tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierInfo {
    pub tier: SpeedTier,
    pub label: &'static str,
    /// Lowest score in this tier
    pub min_score: u32,
    /// Scroll speed in units per tick
    pub speed: f32,
    pub color: &'static str,
    pub bg_color: &'static str,
}

/// Ordered by `min_score`
pub const SPEED_TIERS: [TierInfo; 5] = [
    TierInfo {
        tier: SpeedTier::Easy,
        label: "EASY",
        min_score: 0,
        speed: 2.0,
        color: "#36E27B",
        bg_color: "rgba(54,226,123,0.15)",
    },
    TierInfo {
        tier: SpeedTier::Normal,
        label: "NORMAL",
        min_score: 10,
        speed: 2.8,
        color: "#00D4FF",
        bg_color: "rgba(0,212,255,0.15)",
    },
    TierInfo {
        tier: SpeedTier::Fast,
        label: "FAST",
        min_score: 25,
        speed: 3.6,
        color: "#FFD700",
        bg_color: "rgba(255,215,0,0.15)",
    },
    TierInfo {
        tier: SpeedTier::Hyper,
        label: "HYPER",
        min_score: 50,
        speed: 4.6,
        color: "#FF6B00",
        bg_color: "rgba(255,107,0,0.15)",
    },
    TierInfo {
        tier: SpeedTier::Void,
        label: "VOID",
        min_score: 80,
        speed: 5.8,
        color: "#FF3A5C",
        bg_color: "rgba(255,58,92,0.20)",
    },
];

impl SpeedTier {
    /// Tier for a cumulative score. Total over all scores.
    pub fn for_score(score: u32) -> Self {
        SPEED_TIERS
            .iter()
            .rev()
            .find(|info| score >= info.min_score)
            .map(|info| info.tier)
            .unwrap_or_default()
    }

    /// Tier index 0..=4
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn info(self) -> &'static TierInfo {
        &SPEED_TIERS[self as usize]
    }

    #[inline]
    pub fn speed(self) -> f32 {
        self.info().speed
    }

    #[inline]
    pub fn label(self) -> &'static str {
        self.info().label
    }
}

/// Scroll speed for a score
#[inline]
pub fn speed_for_score(score: u32) -> f32 {
    SpeedTier::for_score(score).speed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(SpeedTier::for_score(0), SpeedTier::Easy);
        assert_eq!(SpeedTier::for_score(9), SpeedTier::Easy);
        assert_eq!(SpeedTier::for_score(10), SpeedTier::Normal);
        assert_eq!(SpeedTier::for_score(24), SpeedTier::Normal);
        assert_eq!(SpeedTier::for_score(25), SpeedTier::Fast);
        assert_eq!(SpeedTier::for_score(49), SpeedTier::Fast);
        assert_eq!(SpeedTier::for_score(50), SpeedTier::Hyper);
        assert_eq!(SpeedTier::for_score(79), SpeedTier::Hyper);
        assert_eq!(SpeedTier::for_score(80), SpeedTier::Void);
        assert_eq!(SpeedTier::for_score(u32::MAX), SpeedTier::Void);
    }

    #[test]
    fn test_speeds_and_indices() {
        let speeds: Vec<f32> = SPEED_TIERS.iter().map(|t| t.speed).collect();
        assert_eq!(speeds, vec![2.0, 2.8, 3.6, 4.6, 5.8]);
        for (i, info) in SPEED_TIERS.iter().enumerate() {
            assert_eq!(info.tier.index() as usize, i);
            assert_eq!(info.tier.info(), info);
        }
        assert_eq!(speed_for_score(60), 4.6);
        assert_eq!(SpeedTier::Void.label(), "VOID");
    }

    proptest! {
        #[test]
        fn prop_tier_monotonic(a in 0u32..10_000, b in 0u32..10_000) {
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(SpeedTier::for_score(lo) <= SpeedTier::for_score(hi));
            prop_assert!(speed_for_score(lo) <= speed_for_score(hi));
        }
    }
}
