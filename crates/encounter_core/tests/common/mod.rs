#![allow(dead_code)]

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use data_runtime::configs::bosses::BossSpecDb;
use data_runtime::configs::encounter::EncounterTuning;
use encounter_core::{
    EncounterEvent, FrameCtx, PlayerView, Projectile, RecordBook, WaveOrchestrator,
};

pub const DT: f32 = 1.0 / 60.0;
pub const ARENA_W: f32 = 800.0;
pub const ARENA_H: f32 = 600.0;

/// Minimal frame driver for scenario tests: owns everything the
/// orchestrator borrows per frame.
pub struct World {
    pub orch: WaveOrchestrator,
    pub records: RecordBook,
    pub rng: ChaCha8Rng,
    pub projectiles: Vec<Projectile>,
    pub events: Vec<EncounterEvent>,
    pub player: PlayerView,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self {
            orch: WaveOrchestrator::new(EncounterTuning::default(), BossSpecDb::default(), seed),
            records: RecordBook::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            projectiles: Vec::new(),
            events: Vec::new(),
            // Far corner by default so pursuit does not reach contact
            // within short scenarios.
            player: PlayerView { pos: Vec2::new(40.0, ARENA_H - 40.0), ..PlayerView::default() },
        }
    }

    pub fn step(&mut self) {
        self.records.advance(DT);
        let mut ctx = FrameCtx {
            dt: DT,
            arena_w: ARENA_W,
            arena_h: ARENA_H,
            projectiles: &mut self.projectiles,
            events: &mut self.events,
            rng: &mut self.rng,
            hooks: &mut self.records,
        };
        self.orch.update(&self.player, &mut ctx);
    }

    pub fn step_n(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// Run out a warning countdown, with slack for float drift in the
    /// per-frame decrement plus the queue-drain frames that follow.
    pub fn elapse_warning(&mut self) {
        let frames = (EncounterTuning::default().warning_s / DT).ceil() as usize + 3;
        self.step_n(frames);
    }

    pub fn try_spawn(&mut self, score: u32) {
        let mut events = std::mem::take(&mut self.events);
        self.orch.try_spawn_boss(score, &mut events, &mut self.rng);
        self.events = events;
    }

    /// Zero out every active boss; the next step settles the defeats.
    pub fn kill_active(&mut self) {
        for boss in self.orch.bosses_mut() {
            boss.body.hp = 0;
        }
    }

    /// Drive the current wave to completion by killing whatever spawns.
    pub fn clear_wave(&mut self) {
        let mut guard = 0;
        while self.orch.is_sequence_active() {
            self.kill_active();
            self.step();
            guard += 1;
            assert!(guard < 10_000, "wave failed to complete");
        }
    }

    pub fn drain_events(&mut self) -> Vec<EncounterEvent> {
        std::mem::take(&mut self.events)
    }
}
