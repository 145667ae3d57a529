//! Wave orchestration: decides when an encounter starts, which archetypes
//! and tiers populate it, sequences spawning, and settles rewards.
//!
//! One orchestrator instance owns the active boss set, the spawn queue,
//! and the per-archetype tier map for the run; `reset` is the only
//! cancellation primitive and returns everything to initial state. Per
//! frame the orchestrator advances its own warning/queue transitions
//! first, then delegates to each active boss, then settles defeats by
//! reverse-index sweep so removal never invalidates a live index.

use std::collections::{HashMap, VecDeque};

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use data_runtime::configs::bosses::BossSpecDb;
use data_runtime::configs::encounter::EncounterTuning;

use crate::boss::{Boss, BossClass, BossId};
use crate::context::FrameCtx;
use crate::events::EncounterEvent;
use crate::player::{PlayerView, Upgrade};
use crate::projectile::Faction;
use crate::records::{RecordCategory, StatsSnapshot};

const LOOT_CHOICES: usize = 3;

#[derive(Debug, Clone, Copy)]
struct QueuedBoss {
    class: BossClass,
    tier: u32,
}

/// Bookkeeping for the wave in progress.
#[derive(Debug, Clone, Copy)]
struct WaveState {
    expected: u32,
    defeated: u32,
    /// Tier of the first boss queued; drives the completion reward.
    reward_tier: u32,
}

pub struct WaveOrchestrator {
    tuning: EncounterTuning,
    db: BossSpecDb,
    bosses: Vec<Boss>,
    queue: VecDeque<QueuedBoss>,
    warning_s: f32,
    wave: Option<WaveState>,
    /// Highest tier spawned per archetype this run; next spawn is +1.
    tiers: HashMap<BossClass, u32>,
    encounter_count: u32,
    next_threshold: u32,
    next_id: u32,
    first_loot_granted: bool,
    run_id: u64,
    last_score: u32,
    waves_cleared: u32,
    bosses_defeated: u32,
}

impl WaveOrchestrator {
    pub fn new(tuning: EncounterTuning, db: BossSpecDb, run_id: u64) -> Self {
        let first_threshold = tuning.first_threshold;
        Self {
            tuning,
            db,
            bosses: Vec::new(),
            queue: VecDeque::new(),
            warning_s: 0.0,
            wave: None,
            tiers: HashMap::new(),
            encounter_count: 0,
            next_threshold: first_threshold,
            next_id: 0,
            first_loot_granted: false,
            run_id,
            last_score: 0,
            waves_cleared: 0,
            bosses_defeated: 0,
        }
    }

    pub fn bosses(&self) -> &[Boss] {
        &self.bosses
    }

    /// Mutable access for the frame driver's own damage paths (ram
    /// resolution, debug tooling). Removal still goes through the defeat
    /// sweep, never through this slice.
    pub fn bosses_mut(&mut self) -> &mut [Boss] {
        &mut self.bosses
    }

    pub fn db(&self) -> &BossSpecDb {
        &self.db
    }

    /// A wave is in flight: bosses active, entries queued, or the warning
    /// banner still counting down.
    pub fn is_sequence_active(&self) -> bool {
        self.wave.is_some()
            || !self.bosses.is_empty()
            || !self.queue.is_empty()
            || self.warning_s > 0.0
    }

    pub fn is_warning_active(&self) -> bool {
        self.warning_s > 0.0
    }

    pub fn is_queue_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Name and tier of the next boss to spawn, for the warning banner.
    pub fn next_boss_info(&self) -> Option<(&'static str, u32)> {
        self.queue.front().map(|q| (q.class.display_name(), q.tier))
    }

    fn next_tier_for(&self, class: BossClass) -> u32 {
        self.tiers.get(&class).copied().unwrap_or(0) + 1
    }

    /// Begin an encounter if the score has crossed the next threshold and
    /// nothing is in flight. Idempotent under repeated calls with an
    /// unchanged score.
    pub fn try_spawn_boss(
        &mut self,
        score: u32,
        events: &mut Vec<EncounterEvent>,
        rng: &mut ChaCha8Rng,
    ) {
        self.last_score = score;
        if self.is_sequence_active() || score < self.next_threshold {
            return;
        }
        self.encounter_count += 1;
        let elite = self.tuning.elite_interval > 0
            && self.encounter_count.is_multiple_of(self.tuning.elite_interval);

        if elite {
            let class = BossClass::ELITE;
            self.queue.push_back(QueuedBoss { class, tier: self.next_tier_for(class) });
        } else {
            let overflow = score - self.next_threshold;
            let size = (1 + overflow / self.tuning.score_interval).min(self.tuning.wave_cap);
            for _ in 0..size {
                let class = BossClass::STANDARD[rng.random_range(0..BossClass::STANDARD.len())];
                self.queue.push_back(QueuedBoss { class, tier: self.next_tier_for(class) });
            }
        }

        let size = self.queue.len() as u32;
        let highest = self.queue.iter().map(|q| q.tier).max().unwrap_or(1);
        let mut advance = self.tuning.score_interval * size;
        if highest >= self.tuning.high_tier_cutoff {
            advance += self.tuning.high_tier_bonus;
        }
        self.next_threshold += advance;

        let first = self.queue[0];
        self.wave = Some(WaveState { expected: size, defeated: 0, reward_tier: first.tier });
        self.warning_s = self.tuning.warning_s;
        events.push(EncounterEvent::BossAnnounced {
            class: first.class,
            name: first.class.display_name(),
            tier: first.tier,
        });
        log::info!(
            "encounter {} queued: {} boss(es), lead {} tier {}, next threshold {}",
            self.encounter_count,
            size,
            first.class.display_name(),
            first.tier,
            self.next_threshold
        );
        metrics::counter!("encounter_waves_started").increment(1);
    }

    /// Debug/test entry: force one boss into the queue, bypassing score
    /// thresholds but not the in-flight guard.
    pub fn force_spawn(&mut self, class: BossClass, events: &mut Vec<EncounterEvent>) {
        if self.is_sequence_active() {
            return;
        }
        let tier = self.next_tier_for(class);
        self.queue.push_back(QueuedBoss { class, tier });
        self.wave = Some(WaveState { expected: 1, defeated: 0, reward_tier: tier });
        self.warning_s = self.tuning.warning_s;
        events.push(EncounterEvent::BossAnnounced {
            class,
            name: class.display_name(),
            tier,
        });
    }

    /// Dequeue one entry: bump the archetype tier high-water mark and
    /// materialize the boss near top-center.
    fn process_spawn_queue(&mut self, ctx: &mut FrameCtx) {
        let Some(q) = self.queue.pop_front() else { return };
        let mark = self.tiers.entry(q.class).or_insert(0);
        *mark = (*mark).max(q.tier);

        let x = ctx.arena_w * ctx.rng.random_range(0.35..0.65);
        let y = ctx.arena_h * 0.12;
        self.next_id += 1;
        let boss = Boss::spawn(
            BossId(self.next_id),
            q.class,
            q.tier,
            Vec2::new(x, y),
            &self.db,
            self.tuning.hp_per_tier_factor,
            ctx.hooks.gameplay_time(),
            ctx.rng,
        );
        log::info!(
            "spawned {} tier {} ({} hp) at ({x:.0}, {y:.0})",
            q.class.display_name(),
            q.tier,
            boss.body.max_hp
        );
        self.bosses.push(boss);
        metrics::counter!("encounter_bosses_spawned").increment(1);
    }

    /// Per-frame drive: queue/warning transitions first, then projectile
    /// routing, then every active boss, then defeat settlement.
    pub fn update(&mut self, player: &PlayerView, ctx: &mut FrameCtx) {
        if self.warning_s > 0.0 {
            self.warning_s -= ctx.dt;
            if self.warning_s <= 0.0 {
                self.warning_s = 0.0;
                self.process_spawn_queue(ctx);
            }
        } else {
            while !self.queue.is_empty() && self.bosses.len() < self.tuning.max_active {
                self.process_spawn_queue(ctx);
            }
        }

        // Player rays against bosses. The pool is taken for the pass so a
        // boss can still push spawns through ctx during its own update;
        // captured rays are inert ammunition and skip this pass.
        let mut pool = std::mem::take(ctx.projectiles);
        for p in pool.iter_mut() {
            if !p.active || p.faction != Faction::Player || p.capture.is_some() {
                continue;
            }
            for boss in self.bosses.iter_mut() {
                boss.on_projectile(p, &self.db, player, ctx);
                if !p.active || p.faction != Faction::Player {
                    break;
                }
            }
        }
        *ctx.projectiles = pool;

        for boss in self.bosses.iter_mut() {
            if boss.defeated() {
                continue;
            }
            boss.update(player, &self.db, ctx);
        }

        // Reverse sweep keeps remaining indices valid across removals.
        for index in (0..self.bosses.len()).rev() {
            if self.bosses[index].defeated() {
                let id = self.bosses[index].body.id;
                self.handle_boss_defeat(index, id, player, ctx);
            }
        }
    }

    /// Remove a defeated boss and settle records and wave bookkeeping.
    /// Index-first with an identity fallback: a stale index is recovered by
    /// searching for the boss id, never by trusting the position.
    fn handle_boss_defeat(
        &mut self,
        index: usize,
        id: BossId,
        player: &PlayerView,
        ctx: &mut FrameCtx,
    ) {
        let index = match self.bosses.get(index) {
            Some(b) if b.body.id == id => index,
            _ => {
                log::warn!("defeat index {index} stale for boss {id:?}, searching by identity");
                match self.bosses.iter().position(|b| b.body.id == id) {
                    Some(found) => found,
                    None => {
                        log::error!("defeated boss {id:?} missing from active set");
                        return;
                    }
                }
            }
        };
        let mut boss = self.bosses.remove(index);
        boss.force_teardown(ctx.projectiles);
        self.bosses_defeated += 1;

        let elapsed = ctx.hooks.gameplay_time() - boss.body.spawned_at;
        let stats = StatsSnapshot {
            score: self.last_score,
            waves_cleared: self.waves_cleared,
            bosses_defeated: self.bosses_defeated,
        };
        if boss.body.class == BossClass::ELITE {
            ctx.hooks
                .record_boss_kill(RecordCategory::EliteKillTime, elapsed, stats, self.run_id);
        }
        if !ctx.hooks.tier_time_recorded(boss.body.tier) {
            ctx.hooks.mark_tier_time_recorded(boss.body.tier);
            ctx.hooks.record_boss_kill(
                RecordCategory::TierClearTime(boss.body.tier),
                elapsed,
                stats,
                self.run_id,
            );
        }
        log::info!(
            "{} tier {} defeated after {elapsed:.1}s",
            boss.body.class.display_name(),
            boss.body.tier
        );
        metrics::counter!("encounter_bosses_defeated").increment(1);
        metrics::histogram!("encounter_boss_kill_seconds").record(elapsed as f64);

        let Some(wave) = &mut self.wave else {
            log::warn!("boss defeated with no wave in progress");
            return;
        };
        wave.defeated += 1;
        let complete = wave.defeated >= wave.expected
            && self.bosses.is_empty()
            && self.queue.is_empty()
            && self.warning_s <= 0.0;
        if complete {
            let reward = wave.reward_tier * self.tuning.reward_per_tier;
            self.wave = None;
            self.waves_cleared += 1;
            ctx.events.push(EncounterEvent::ScoreAwarded { amount: reward });
            self.settle_loot(player, ctx);
            log::info!("wave {} complete, reward {reward}", self.waves_cleared);
            metrics::counter!("encounter_waves_cleared").increment(1);
        }
    }

    /// Exactly one of: the one-time first-clear loot, a drawn set of
    /// upgrade choices, or nothing when the player already holds every
    /// upgrade. Evolution eligibility is checked either way, told whether
    /// loot was withheld so it can compensate.
    fn settle_loot(&mut self, player: &PlayerView, ctx: &mut FrameCtx) {
        let loot_generated = if !self.first_loot_granted {
            self.first_loot_granted = true;
            ctx.events.push(EncounterEvent::FirstBossLoot);
            true
        } else {
            let mut pool: Vec<Upgrade> = Upgrade::ALL
                .into_iter()
                .filter(|u| !player.held.contains(u))
                .collect();
            if pool.is_empty() {
                false
            } else {
                // Partial Fisher-Yates: draw without replacement.
                let picks = pool.len().min(LOOT_CHOICES);
                for i in 0..picks {
                    let j = ctx.rng.random_range(i..pool.len());
                    pool.swap(i, j);
                }
                pool.truncate(picks);
                ctx.events.push(EncounterEvent::LootChoices { options: pool });
                true
            }
        };
        ctx.events.push(EncounterEvent::EvolutionCheck { loot_denied: !loot_generated });
    }

    /// Rout every weaver family on the field; standard bosses ignore fear.
    pub fn apply_fear(&mut self, duration_s: f32, from: Vec2) {
        for boss in self.bosses.iter_mut() {
            boss.apply_fear(duration_s, from);
        }
    }

    /// Force-detonate any charging gravity rays (player ram resolution).
    pub fn force_detonate_wells(&mut self, ctx: &mut FrameCtx) {
        let db = self.db.clone();
        for boss in self.bosses.iter_mut() {
            boss.force_detonate(&db, ctx);
        }
    }

    /// Full teardown back to initial state: the only cancellation
    /// primitive. Tier history, counters, and the first-loot flag all
    /// clear; captured projectiles deactivate without detonating.
    pub fn reset(&mut self, projectiles: &mut Vec<crate::projectile::Projectile>) {
        for boss in self.bosses.iter_mut() {
            boss.force_teardown(projectiles);
        }
        self.bosses.clear();
        self.queue.clear();
        self.warning_s = 0.0;
        self.wave = None;
        self.tiers.clear();
        self.encounter_count = 0;
        self.next_threshold = self.tuning.first_threshold;
        self.first_loot_granted = false;
        self.last_score = 0;
        self.waves_cleared = 0;
        self.bosses_defeated = 0;
        log::info!("encounter state reset");
    }

    /// New run against the same tuning: fresh run id, clean state.
    pub fn begin_run(&mut self, run_id: u64, projectiles: &mut Vec<crate::projectile::Projectile>) {
        self.reset(projectiles);
        self.run_id = run_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn tier_map_starts_at_one() {
        let orch =
            WaveOrchestrator::new(EncounterTuning::default(), BossSpecDb::default(), 1);
        assert_eq!(orch.next_tier_for(BossClass::Chaser), 1);
    }

    #[test]
    fn threshold_advances_by_wave_size() {
        let mut orch =
            WaveOrchestrator::new(EncounterTuning::default(), BossSpecDb::default(), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut events = Vec::new();
        // Overflow of one interval: wave of two, threshold moves by two
        // intervals.
        orch.try_spawn_boss(600, &mut events, &mut rng);
        assert_eq!(orch.queue.len(), 2);
        assert_eq!(orch.next_threshold, 300 + 600);
    }
}
