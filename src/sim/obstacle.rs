//! Obstacles, the reuse pool, and the difficulty-driven spawner
//!
//! Records are allocated once and recycled in place. Releasing an obstacle
//! only clears its `active` flag; the next `acquire` reinitializes it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::PlayField;

/// Gap height at score 0
pub const MAX_GAP: f32 = 280.0;
/// Gap never shrinks below this
pub const MIN_GAP: f32 = 140.0;
/// Gap shrink per point
pub const GAP_SHRINK_PER_POINT: f32 = 1.2;

pub const LASER_WIDTH: f32 = 12.0;
pub const CORRIDOR_WIDTH: f32 = 40.0;

/// Mine amplitude as a fraction of half the gap
pub const MINE_AMPLITUDE_RATIO: f32 = 0.55;
/// Mine frequency range (cycles/second)
pub const MINE_FREQ_MIN: f32 = 1.2;
pub const MINE_FREQ_MAX: f32 = 2.0;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Thin solid wall with a gap
    #[default]
    Laser,
    /// Point hazard oscillating inside the gap
    Mine,
    /// Wide solid wall with a gap
    Corridor,
}

impl ObstacleKind {
    /// Body width for this kind (mines are points)
    pub fn width(self) -> f32 {
        match self {
            ObstacleKind::Laser => LASER_WIDTH,
            ObstacleKind::Mine => 0.0,
            ObstacleKind::Corridor => CORRIDOR_WIDTH,
        }
    }
}

/// Oscillation of a mine around its gap midpoint. Fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineMotion {
    pub amplitude: f32,
    /// Cycles per second
    pub frequency: f32,
    /// Radians
    pub phase: f32,
    /// Current center y
    pub y: f32,
}

impl MineMotion {
    /// Period in seconds
    #[inline]
    pub fn period(&self) -> f32 {
        1.0 / self.frequency
    }
}

/// A pooled obstacle record
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Left edge in world space
    pub x: f32,
    pub width: f32,
    /// Bottom edge of the top solid part
    pub top_y: f32,
    /// Top edge of the bottom solid part
    pub bottom_y: f32,
    /// Passable height between `top_y` and `bottom_y`
    pub gap: f32,
    /// Set for mines only
    pub mine: Option<MineMotion>,
    /// Player has passed it
    pub scored: bool,
    pub active: bool,
}

impl Obstacle {
    fn blank(id: u32) -> Self {
        Self {
            id,
            kind: ObstacleKind::Laser,
            x: 0.0,
            width: 0.0,
            top_y: 0.0,
            bottom_y: 0.0,
            gap: 0.0,
            mine: None,
            scored: false,
            active: true,
        }
    }

    /// Midpoint of the gap
    #[inline]
    pub fn gap_mid(&self) -> f32 {
        self.top_y + self.gap / 2.0
    }

    /// Right edge in world space
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Center y of a mine (gap midpoint until first update)
    #[inline]
    pub fn mine_y(&self) -> f32 {
        self.mine.map(|m| m.y).unwrap_or_else(|| self.gap_mid())
    }
}

/// Growable arena of obstacle records. Never shrinks.
#[derive(Debug, Default)]
pub struct ObstaclePool {
    records: Vec<Obstacle>,
    next_id: u32,
}

impl ObstaclePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of the first free record, reactivated.
    /// Appends a new record only when every record is in use.
    pub fn acquire(&mut self) -> usize {
        if let Some(index) = self.records.iter().position(|o| !o.active) {
            let o = &mut self.records[index];
            o.active = true;
            o.scored = false;
            return index;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(Obstacle::blank(id));
        self.records.len() - 1
    }

    /// Mark a record free for reuse
    #[inline]
    pub fn release(&mut self, index: usize) {
        if let Some(o) = self.records.get_mut(index) {
            o.active = false;
        }
    }

    /// Free every record (keeps allocations)
    pub fn release_all(&mut self) {
        for o in &mut self.records {
            o.active = false;
        }
    }

    /// Total records ever allocated
    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|o| o.active).count()
    }

    #[inline]
    pub fn records(&self) -> &[Obstacle] {
        &self.records
    }

    #[inline]
    pub fn records_mut(&mut self) -> &mut [Obstacle] {
        &mut self.records
    }
}

impl std::ops::Index<usize> for ObstaclePool {
    type Output = Obstacle;

    fn index(&self, index: usize) -> &Obstacle {
        &self.records[index]
    }
}

/// Gap height for a score: shrinks 1.2/point from 280, floored at 140
#[inline]
pub fn gap_for_score(score: u32) -> f32 {
    (MAX_GAP - score as f32 * GAP_SHRINK_PER_POINT).max(MIN_GAP)
}

/// Draw an obstacle kind for a score band
pub fn kind_for_score(score: u32, rng: &mut impl Rng) -> ObstacleKind {
    // First 20 points: lasers only
    if score < 20 {
        return ObstacleKind::Laser;
    }
    let r: f32 = rng.random();
    if score < 50 {
        if r < 0.70 {
            ObstacleKind::Laser
        } else {
            ObstacleKind::Mine
        }
    } else if r < 0.40 {
        ObstacleKind::Laser
    } else if r < 0.75 {
        ObstacleKind::Mine
    } else {
        ObstacleKind::Corridor
    }
}

/// Acquire a record and initialize it as a new obstacle at `spawn_x`.
/// Returns the pool index.
pub fn spawn_obstacle(
    pool: &mut ObstaclePool,
    score: u32,
    field: &PlayField,
    spawn_x: f32,
    rng: &mut impl Rng,
) -> usize {
    let kind = kind_for_score(score, rng);
    let playable = field.playable_height();

    let mut gap = gap_for_score(score);
    if gap > playable - 1.0 {
        let clamped = (playable - 1.0).max(0.0);
        log::warn!("Gap {gap} clamped to {clamped} (playable {playable})");
        gap = clamped;
    }

    let slack = (playable - gap).max(0.0);
    let top_y = field.wall_thickness + rng.random_range(0.0..=slack);
    let bottom_y = top_y + gap;

    let mine = if kind == ObstacleKind::Mine {
        Some(MineMotion {
            amplitude: (gap / 2.0) * MINE_AMPLITUDE_RATIO,
            frequency: rng.random_range(MINE_FREQ_MIN..MINE_FREQ_MAX),
            phase: rng.random_range(0.0..std::f32::consts::TAU),
            y: top_y + gap / 2.0,
        })
    } else {
        None
    };

    let index = pool.acquire();
    let o = &mut pool.records_mut()[index];
    o.kind = kind;
    o.x = spawn_x;
    o.width = kind.width();
    o.top_y = top_y;
    o.bottom_y = bottom_y;
    o.gap = gap;
    o.mine = mine;

    log::debug!("Spawned {kind:?} #{} at x={spawn_x} gap={gap}", o.id);
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_score_zero_is_wide_laser() {
        let mut pool = ObstaclePool::new();
        let mut rng = rng();
        let field = PlayField::default();
        for _ in 0..50 {
            let i = spawn_obstacle(&mut pool, 0, &field, 450.0, &mut rng);
            let o = &pool[i];
            assert_eq!(o.kind, ObstacleKind::Laser);
            assert_eq!(o.gap, 280.0);
            assert_eq!(o.width, LASER_WIDTH);
            assert!(o.mine.is_none());
            pool.release(i);
        }
    }

    #[test]
    fn test_gap_floor_at_high_score() {
        assert_eq!(gap_for_score(100), 140.0);
        assert_eq!(gap_for_score(u32::MAX), 140.0);
        assert!((gap_for_score(50) - 220.0).abs() < 1e-4);
    }

    #[test]
    fn test_placement_stays_between_walls() {
        let mut pool = ObstaclePool::new();
        let mut rng = rng();
        let field = PlayField::default();
        for score in 0..200 {
            let i = spawn_obstacle(&mut pool, score, &field, 450.0, &mut rng);
            let o = &pool[i];
            assert!(o.top_y >= field.wall_thickness);
            assert!(o.bottom_y <= field.height - field.wall_thickness + 1e-3);
            assert!((o.bottom_y - o.top_y - o.gap).abs() < 1e-3);
            pool.release(i);
        }
    }

    fn count(kinds: &[ObstacleKind], kind: ObstacleKind) -> usize {
        kinds.iter().filter(|k| **k == kind).count()
    }

    #[test]
    fn test_band_mix() {
        let mut rng = rng();
        let mid: Vec<_> = (0..2000).map(|_| kind_for_score(30, &mut rng)).collect();
        assert_eq!(count(&mid, ObstacleKind::Corridor), 0);
        // ~30% mines
        let mines = count(&mid, ObstacleKind::Mine);
        assert!((450..750).contains(&mines), "mines: {mines}");

        // ~25% corridors
        let late: Vec<_> = (0..2000).map(|_| kind_for_score(60, &mut rng)).collect();
        let corridors = count(&late, ObstacleKind::Corridor);
        assert!((350..650).contains(&corridors), "corridors: {corridors}");
    }

    #[test]
    fn test_mine_motion_ranges() {
        let mut pool = ObstaclePool::new();
        let mut rng = rng();
        let field = PlayField::default();
        let mut seen = 0;
        for _ in 0..200 {
            let i = spawn_obstacle(&mut pool, 60, &field, 450.0, &mut rng);
            let o = pool[i].clone();
            pool.release(i);
            let Some(m) = o.mine else { continue };
            seen += 1;
            assert_eq!(o.width, 0.0);
            assert!((m.amplitude - o.gap / 2.0 * 0.55).abs() < 1e-4);
            assert!(m.frequency >= 1.2 && m.frequency < 2.0);
            assert!(m.phase >= 0.0 && m.phase < std::f32::consts::TAU);
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_reused_record_drops_mine_data() {
        let mut pool = ObstaclePool::new();
        let mut rng = rng();
        let field = PlayField::default();
        // Spawn at score 60 until a mine appears, then recycle the record as a laser
        let i = loop {
            let i = spawn_obstacle(&mut pool, 60, &field, 450.0, &mut rng);
            if pool[i].kind == ObstacleKind::Mine {
                break i;
            }
            pool.release(i);
        };
        pool.release(i);
        let j = spawn_obstacle(&mut pool, 0, &field, 450.0, &mut rng);
        assert_eq!(i, j);
        assert!(pool[j].mine.is_none());
    }

    #[test]
    fn test_acquire_reuses_first_free() {
        let mut pool = ObstaclePool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        let c = pool.acquire();
        assert_eq!((a, b, c), (0, 1, 2));
        pool.records_mut()[b].scored = true;
        pool.release(b);
        assert_eq!(pool.active_count(), 2);

        let d = pool.acquire();
        assert_eq!(d, b);
        assert_eq!(pool[d].id, 1);
        assert!(!pool[d].scored);
        assert_eq!(pool.capacity(), 3);

        let e = pool.acquire();
        assert_eq!(e, 3);
        assert_eq!(pool[e].id, 3);
    }

    #[test]
    fn test_degenerate_field_clamps_gap() {
        let mut pool = ObstaclePool::new();
        let mut rng = rng();
        let field = PlayField::new(400.0, 164.0, 32.0); // playable 100
        let i = spawn_obstacle(&mut pool, 0, &field, 460.0, &mut rng);
        let o = &pool[i];
        assert_eq!(o.gap, 99.0);
        assert!(o.top_y >= 32.0 && o.top_y <= 33.0);
    }

    proptest! {
        #[test]
        fn prop_gap_within_band(score in any::<u32>()) {
            let gap = gap_for_score(score);
            prop_assert!((MIN_GAP..=MAX_GAP).contains(&gap));
        }
    }
}
