//! In-memory boss-kill record book.
//!
//! Per-category ranked list, capped at ten entries, ascending for
//! time-based categories. Entries are written with a placeholder name and
//! patched later by run id once the player names the run.

use std::collections::{HashMap, HashSet};

use crate::context::EncounterHooks;

pub const MAX_ENTRIES: usize = 10;
pub const PLACEHOLDER_NAME: &str = "???";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordCategory {
    /// Time from spawn to defeat of an elite boss.
    EliteKillTime,
    /// Time from spawn to defeat of the first boss at this tier in a run.
    TierClearTime(u32),
}

impl RecordCategory {
    /// Lower-is-better ordering. Both current categories are time-based;
    /// score-style categories would rank descending.
    pub fn ascending(self) -> bool {
        match self {
            RecordCategory::EliteKillTime | RecordCategory::TierClearTime(_) => true,
        }
    }
}

/// Run statistics frozen at record time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    pub score: u32,
    pub waves_cleared: u32,
    pub bosses_defeated: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordEntry {
    pub name: String,
    pub value: f32,
    /// Gameplay time at which the record was written.
    pub timestamp: f32,
    pub stats: StatsSnapshot,
    pub run_id: u64,
}

#[derive(Debug, Default)]
pub struct RecordBook {
    categories: HashMap<RecordCategory, Vec<RecordEntry>>,
    tiers_recorded: HashSet<u32>,
    gameplay_time_s: f32,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the gameplay clock; the frame driver calls this once per
    /// frame before updating the orchestrator.
    pub fn advance(&mut self, dt: f32) {
        self.gameplay_time_s += dt;
    }

    pub fn entries(&self, category: RecordCategory) -> &[RecordEntry] {
        self.categories.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Whether `value` would rank among the kept entries for `category`.
    pub fn would_record(&self, category: RecordCategory, value: f32) -> bool {
        let entries = self.entries(category);
        if entries.len() < MAX_ENTRIES {
            return true;
        }
        let worst = entries.last().map(|e| e.value).unwrap_or(f32::INFINITY);
        if category.ascending() { value < worst } else { value > worst }
    }

    fn insert(&mut self, category: RecordCategory, entry: RecordEntry) {
        let entries = self.categories.entry(category).or_default();
        let pos = if category.ascending() {
            entries.partition_point(|e| e.value <= entry.value)
        } else {
            entries.partition_point(|e| e.value >= entry.value)
        };
        entries.insert(pos, entry);
        entries.truncate(MAX_ENTRIES);
    }

    /// Patch the placeholder name on every entry written by `run_id`.
    pub fn set_name_for_run(&mut self, run_id: u64, name: &str) {
        for entries in self.categories.values_mut() {
            for e in entries.iter_mut() {
                if e.run_id == run_id && e.name == PLACEHOLDER_NAME {
                    e.name = name.to_string();
                }
            }
        }
    }

    /// New run: per-run dedup flags clear, records persist.
    pub fn begin_run(&mut self) {
        self.tiers_recorded.clear();
    }
}

impl EncounterHooks for RecordBook {
    fn gameplay_time(&self) -> f32 {
        self.gameplay_time_s
    }

    fn tier_time_recorded(&self, tier: u32) -> bool {
        self.tiers_recorded.contains(&tier)
    }

    fn mark_tier_time_recorded(&mut self, tier: u32) {
        let _ = self.tiers_recorded.insert(tier);
    }

    fn best_record(&self, category: RecordCategory) -> Option<f32> {
        self.entries(category).first().map(|e| e.value)
    }

    fn record_boss_kill(
        &mut self,
        category: RecordCategory,
        value: f32,
        stats: StatsSnapshot,
        run_id: u64,
    ) {
        if !self.would_record(category, value) {
            return;
        }
        self.insert(
            category,
            RecordEntry {
                name: PLACEHOLDER_NAME.to_string(),
                value,
                timestamp: self.gameplay_time_s,
                stats,
                run_id,
            },
        );
    }
}
