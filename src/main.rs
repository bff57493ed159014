//! G-VOID headless runner
//!
//! Drives one autopilot run through the frame driver and records the
//! result on the best-score board.
//!
//! Usage: `g-void [seed] [max_seconds]`
//!
//! `GVOID_SETTINGS` points at a settings JSON file, `GVOID_SCORES` at the
//! high score file (created on first death).

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use g_void::consts::SIM_DT;
use g_void::sim::SpeedTier;
use g_void::{FrameDriver, FrameOutcome, HapticKind, HighScores, RunObserver, Settings};

const SCORES_ENV: &str = "GVOID_SCORES";
const DEFAULT_MAX_SECONDS: f32 = 120.0;

/// Observer that reports run progress through the log
#[derive(Default)]
struct LogObserver {
    coins: u32,
    haptics: bool,
    skin: String,
    trail: String,
    death: Option<(u32, SpeedTier)>,
}

impl RunObserver for LogObserver {
    fn on_score_changed(&mut self, score: u32) {
        log::debug!("Score: {score}");
    }

    fn on_tier_changed(&mut self, tier: SpeedTier) {
        log::info!("Tier: {} ({})", tier.label(), tier.info().color);
    }

    fn on_coins_earned(&mut self, amount: u32) {
        self.coins += amount;
    }

    fn on_death(&mut self, score: u32, tier: SpeedTier) {
        self.death = Some((score, tier));
    }

    fn haptic(&mut self, kind: HapticKind) {
        log::trace!("Haptic: {kind:?}");
    }

    fn haptics_enabled(&self) -> bool {
        self.haptics
    }

    fn skin_color(&self) -> Option<&str> {
        Some(&self.skin)
    }

    fn trail_color(&self) -> Option<&str> {
        Some(&self.trail)
    }
}

fn load_settings() -> anyhow::Result<Settings> {
    let Some(path) = std::env::var_os(Settings::ENV_PATH).map(PathBuf::from) else {
        return Ok(Settings::default());
    };
    Settings::load(&path)
        .with_context(|| format!("loading settings from {}", path.display()))
}

fn load_scores(path: &Path) -> anyhow::Result<HighScores> {
    if !path.exists() {
        return Ok(HighScores::new());
    }
    let json = std::fs::read_to_string(path)?;
    HighScores::from_json(&json)
        .with_context(|| format!("parsing {}", path.display()))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn main() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(env).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed: {s}"))?,
        None => g_void::random_seed(),
    };
    let max_seconds = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid duration: {s}"))?,
        None => DEFAULT_MAX_SECONDS,
    };

    let settings = load_settings()?;
    log::info!("G-VOID starting with seed: {seed}");

    let mut observer = LogObserver {
        haptics: settings.haptics,
        skin: settings.skin_color.clone(),
        trail: settings.trail_color.clone(),
        ..Default::default()
    };
    log::debug!(
        "Skin {} trail {}",
        observer.skin_color().unwrap_or("-"),
        observer.trail_color().unwrap_or("-")
    );
    let mut driver = FrameDriver::new(&settings, seed);
    driver.set_idle_mode(true);
    driver.start(&mut observer);

    let max_frames = (max_seconds / SIM_DT).ceil() as u64;
    let mut frames = 0u64;
    while frames < max_frames {
        frames += 1;
        if driver.frame(SIM_DT, &mut observer) == FrameOutcome::Dead {
            break;
        }
    }
    driver.stop();

    let state = driver.state();
    log::info!(
        "Run over after {:.1}s: score {}, tier {}, coins {}",
        state.elapsed_ms / 1000.0,
        state.score(),
        state.tier().label(),
        observer.coins
    );

    let Some((score, tier)) = observer.death else {
        log::info!("Autopilot survived the time limit");
        return Ok(());
    };

    let Some(path) = std::env::var_os(SCORES_ENV).map(PathBuf::from) else {
        return Ok(());
    };
    let mut scores = load_scores(&path)?;
    if scores.is_empty() {
        log::info!("Starting a new high score board at {}", path.display());
    }
    if let Some(rank) = scores.add_score(score, tier, now_ms()) {
        std::fs::write(&path, scores.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Saved rank {rank} to {}", path.display());
    }
    Ok(())
}
