//! Headless encounter driver: runs the orchestrator for a fixed number of
//! frames with a scripted player and prints a run summary. Deterministic
//! for a given seed, so it doubles as a quick balance/regression check.
//!
//! Usage: `encounter-harness [seed] [frames]`

use std::env;
use std::f32::consts::TAU;

use anyhow::Result;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use data_runtime::configs::bosses::BossSpecDb;
use data_runtime::configs::encounter::EncounterTuning;
use encounter_core::{
    EncounterEvent, EncounterHooks, FrameCtx, PlayerView, Projectile, RecordBook,
    RecordCategory, WaveOrchestrator,
};

const ARENA_W: f32 = 960.0;
const ARENA_H: f32 = 720.0;
const DT: f32 = 1.0 / 60.0;
/// Passive score trickle, points per second.
const SCORE_RATE: f32 = 40.0;
const FIRE_INTERVAL_S: f32 = 0.25;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed: u64 = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(7);
    let frames: u32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(7200);

    let tuning = EncounterTuning::load_default()?;
    let db = BossSpecDb::load_default()?;
    let mut orch = WaveOrchestrator::new(tuning, db, seed);
    let mut records = RecordBook::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut projectiles: Vec<Projectile> = Vec::new();
    let mut events: Vec<EncounterEvent> = Vec::new();
    let mut player = PlayerView {
        pos: Vec2::new(ARENA_W * 0.5, ARENA_H * 0.75),
        ..PlayerView::default()
    };

    let mut score = 0.0f32;
    let mut fire_cd = 0.0f32;
    let mut player_damage_taken = 0i64;
    let mut waves_cleared = 0u32;
    let mut bosses_announced = 0u32;

    for frame in 0..frames {
        records.advance(DT);
        let t = frame as f32 * DT;
        score += SCORE_RATE * DT;

        // Scripted orbit around the arena center keeps contact pressure on.
        let angle = (t * 0.1) * TAU;
        player.pos = Vec2::new(
            ARENA_W * 0.5 + angle.cos() * 220.0,
            ARENA_H * 0.5 + angle.sin() * 180.0,
        );
        player.immunity_s = (player.immunity_s - DT).max(0.0);

        orch.try_spawn_boss(score as u32, &mut events, &mut rng);

        // Fire at the nearest live boss on a fixed cadence.
        fire_cd -= DT;
        if fire_cd <= 0.0
            && let Some(target) = orch
                .bosses()
                .iter()
                .min_by(|a, b| {
                    let da = a.body.pos.distance_squared(player.pos);
                    let db = b.body.pos.distance_squared(player.pos);
                    da.total_cmp(&db)
                })
        {
            let dir = (target.body.pos - player.pos).normalize_or_zero();
            if dir != Vec2::ZERO {
                projectiles.push(Projectile::player(player.pos, dir * 420.0, 10, 2.0));
            }
            fire_cd = FIRE_INTERVAL_S;
        }

        {
            let mut ctx = FrameCtx {
                dt: DT,
                arena_w: ARENA_W,
                arena_h: ARENA_H,
                projectiles: &mut projectiles,
                events: &mut events,
                rng: &mut rng,
                hooks: &mut records,
            };
            orch.update(&player, &mut ctx);
        }

        // Age the free-flying pool; captured rays are boss-managed.
        for p in projectiles.iter_mut() {
            if !p.active || p.capture.is_some() {
                continue;
            }
            p.pos += p.vel * DT;
            p.age_s += DT;
            if p.age_s >= p.life_s
                || p.pos.x < 0.0
                || p.pos.x > ARENA_W
                || p.pos.y < 0.0
                || p.pos.y > ARENA_H
            {
                p.deactivate();
            }
        }
        projectiles.retain(|p| p.active);

        // Settle the frame's cross-cutting effects.
        for ev in events.drain(..) {
            match ev {
                EncounterEvent::BossAnnounced { name, tier, .. } => {
                    bosses_announced += 1;
                    log::info!("[{t:.1}s] incoming: {name} (tier {tier})");
                }
                EncounterEvent::PlayerBossCollision { damage, .. }
                | EncounterEvent::PlayerMinionCollision { damage, .. }
                | EncounterEvent::BossAttackHit { damage, .. } => {
                    player_damage_taken += damage as i64;
                    player.immunity_s = 0.8;
                }
                EncounterEvent::Detonation { damage, radius, pos } => {
                    if player.pos.distance(pos) <= radius {
                        player_damage_taken += damage as i64;
                        player.immunity_s = 0.8;
                    }
                }
                EncounterEvent::ScoreAwarded { amount } => {
                    score += amount as f32;
                    waves_cleared += 1;
                }
                EncounterEvent::RamCollision { .. }
                | EncounterEvent::FirstBossLoot
                | EncounterEvent::LootChoices { .. }
                | EncounterEvent::EvolutionCheck { .. }
                | EncounterEvent::ScreenShake { .. }
                | EncounterEvent::Vfx { .. } => {}
            }
        }
    }

    println!("frames:           {frames}");
    println!("gameplay time:    {:.1}s", records.gameplay_time());
    println!("final score:      {}", score as u32);
    println!("waves announced:  {bosses_announced}");
    println!("waves cleared:    {waves_cleared}");
    println!("bosses active:    {}", orch.bosses().len());
    println!("damage taken:     {player_damage_taken}");
    let elite = records.entries(RecordCategory::EliteKillTime);
    if let Some(best) = elite.first() {
        println!("best elite kill:  {:.1}s", best.value);
    }
    Ok(())
}
