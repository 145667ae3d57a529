//! Wave pacing configuration for the encounter orchestrator.
//!
//! Parses `data/config/encounter.toml`. The numeric values here are tuned
//! balance, not structural invariants; the orchestrator only depends on the
//! mechanisms (threshold advance, wave cap, elite cadence).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncounterTuning {
    /// Score at which the first encounter becomes eligible.
    pub first_threshold: u32,
    /// Score distance between wave-size steps and successive thresholds.
    pub score_interval: u32,
    /// Hard cap on bosses queued per wave.
    pub wave_cap: u32,
    /// Every Nth encounter is forced to the elite archetype.
    pub elite_interval: u32,
    /// Waves whose highest tier reaches this cutoff push the next threshold
    /// out by `high_tier_bonus` on top of the normal advance.
    pub high_tier_cutoff: u32,
    pub high_tier_bonus: u32,
    /// Score granted on wave completion per reward tier.
    pub reward_per_tier: u32,
    /// Warning banner countdown before the first spawn of a wave.
    pub warning_s: f32,
    /// Queue drains only while fewer than this many bosses are active.
    pub max_active: usize,
    /// Max health multiplier step per tier above 1.
    pub hp_per_tier_factor: f32,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            first_threshold: 300,
            score_interval: 300,
            wave_cap: 4,
            elite_interval: 5,
            high_tier_cutoff: 5,
            high_tier_bonus: 300,
            reward_per_tier: 50,
            warning_s: 2.5,
            max_active: 2,
            hp_per_tier_factor: 0.5,
        }
    }
}

fn data_root() -> PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

impl EncounterTuning {
    /// Load `data/config/encounter.toml`, or compiled defaults when absent.
    pub fn load_default() -> Result<Self> {
        let path = data_root().join("config/encounter.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let cfg: Self = toml::from_str(&txt).context("parse encounter.toml")?;
            Ok(cfg)
        } else {
            Ok(Self::default())
        }
    }
}
