//! Per-frame context lent to the encounter subsystem by the frame driver.

use rand_chacha::ChaCha8Rng;

use crate::events::EncounterEvent;
use crate::projectile::Projectile;
use crate::records::{RecordCategory, StatsSnapshot};

/// Everything a boss may read or write during one `update` call. Narrow by
/// design: the driver owns the projectile pool, the RNG (seeded, so runs
/// replay deterministically), and the event bus.
pub struct FrameCtx<'a> {
    pub dt: f32,
    pub arena_w: f32,
    pub arena_h: f32,
    pub projectiles: &'a mut Vec<Projectile>,
    pub events: &'a mut Vec<EncounterEvent>,
    pub rng: &'a mut ChaCha8Rng,
    pub hooks: &'a mut dyn EncounterHooks,
}

/// Cross-run callbacks the orchestrator needs from the outer game: the
/// gameplay clock and the boss-kill record store.
pub trait EncounterHooks {
    /// Seconds of gameplay elapsed this run.
    fn gameplay_time(&self) -> f32;
    /// Whether a tier-clear time was already recorded this run.
    fn tier_time_recorded(&self, tier: u32) -> bool;
    fn mark_tier_time_recorded(&mut self, tier: u32);
    /// Current best value in a category, if any entry exists. Drivers use
    /// it for "new record" banners; the core itself never reads it.
    fn best_record(&self, category: RecordCategory) -> Option<f32>;
    /// Submit a kill-time candidate; the store decides whether it ranks.
    fn record_boss_kill(
        &mut self,
        category: RecordCategory,
        value: f32,
        stats: StatsSnapshot,
        run_id: u64,
    );
}

/// Hooks that ignore every callback; used by tools and tests that do not
/// care about records.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl EncounterHooks for NoopHooks {
    fn gameplay_time(&self) -> f32 {
        0.0
    }
    fn tier_time_recorded(&self, _tier: u32) -> bool {
        false
    }
    fn mark_tier_time_recorded(&mut self, _tier: u32) {}
    fn best_record(&self, _category: RecordCategory) -> Option<f32> {
        None
    }
    fn record_boss_kill(
        &mut self,
        _category: RecordCategory,
        _value: f32,
        _stats: StatsSnapshot,
        _run_id: u64,
    ) {
    }
}
