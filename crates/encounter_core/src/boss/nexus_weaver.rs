//! Nexus weaver: elite summoner. Kites the player, telegraphs and spawns
//! tier-scaled minion waves, and at high tier answers sustained pressure
//! with an expanding pulse-nova ring.
//!
//! Minions are owned by the weaver and cleared with it on teardown. Fear
//! routs the whole family: weaver and minions flee the fear point and the
//! spawn cycle pauses until it wears off.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use data_runtime::configs::bosses::{BossSpecDb, NexusWeaverSpec, StatusTuning};

use crate::context::FrameCtx;
use crate::events::{EncounterEvent, VfxKind};
use crate::player::PlayerView;
use crate::projectile::Projectile;

use super::minion::Minion;
use super::{default_projectile_hit, resolve_player_contact, BossBody};

/// Kiting band: back off inside the near edge, close in beyond the far one.
const PREFERRED_RANGE_NEAR: f32 = 300.0;
const PREFERRED_RANGE_FAR: f32 = 450.0;

#[derive(Debug, Clone)]
pub struct NovaState {
    pub radius: f32,
    hit_player: bool,
}

#[derive(Debug, Clone)]
pub struct WeaverState {
    spawn_timer_s: f32,
    /// Telegraph countdown between the cue and the actual spawn.
    telegraph_s: Option<f32>,
    pub minions: Vec<Minion>,
    pub nova: Option<NovaState>,
    /// Time the player has continuously held inside nova proximity.
    proximity_s: f32,
    fear_s: f32,
    fear_from: Vec2,
}

fn spawn_interval(tier: u32, spec: &NexusWeaverSpec) -> f32 {
    (spec.spawn_interval_s - spec.interval_tier_step * tier.saturating_sub(1) as f32)
        .max(spec.interval_min_s)
}

/// Tier-scaled wave composition. Lancers and orbiters only join above
/// their minimum tiers.
pub fn wave_counts(tier: u32, spec: &NexusWeaverSpec) -> (u32, u32, u32) {
    let drones = spec.drone_base + (tier as f32 * spec.drone_per_tier).floor() as u32;
    let lancers = if tier >= spec.lancer_min_tier {
        spec.lancer_base + ((tier - 1) as f32 * spec.lancer_per_tier).floor() as u32
    } else {
        0
    };
    let orbiters = if tier >= spec.orbiter_min_tier {
        spec.orbiter_base + ((tier - 2) as f32 * spec.orbiter_per_tier).floor() as u32
    } else {
        0
    };
    (drones, lancers, orbiters)
}

impl WeaverState {
    pub fn new(tier: u32, spec: &NexusWeaverSpec) -> Self {
        Self {
            spawn_timer_s: spawn_interval(tier, spec),
            telegraph_s: None,
            minions: Vec::new(),
            nova: None,
            proximity_s: 0.0,
            fear_s: 0.0,
            fear_from: Vec2::ZERO,
        }
    }

    pub fn apply_fear(&mut self, duration_s: f32, from: Vec2) {
        self.fear_s = self.fear_s.max(duration_s);
        self.fear_from = from;
    }

    #[inline]
    pub fn feared(&self) -> bool {
        self.fear_s > 0.0
    }
}

pub fn update(
    body: &mut BossBody,
    st: &mut WeaverState,
    db: &BossSpecDb,
    player: &PlayerView,
    ctx: &mut FrameCtx,
) {
    let spec = &db.weaver;
    st.fear_s = (st.fear_s - ctx.dt).max(0.0);
    let fear_from = st.feared().then_some(st.fear_from);

    if !body.in_contact_stun() {
        if let Some(from) = fear_from {
            let away = (body.pos - from).normalize_or_zero();
            let away = if away == Vec2::ZERO { Vec2::Y } else { away };
            body.pos += away * body.speed * ctx.dt;
        } else {
            let to_player = player.pos - body.pos;
            let dist = to_player.length();
            let speed = body.speed;
            if dist < PREFERRED_RANGE_NEAR && dist > 1e-4 {
                body.pos -= to_player / dist * speed * ctx.dt;
            } else if dist > PREFERRED_RANGE_FAR {
                body.seek(player.pos, speed, ctx.dt);
            }
        }
    }

    // Spawn cycle pauses while feared; an in-flight telegraph holds.
    if !st.feared() {
        match &mut st.telegraph_s {
            Some(remaining) => {
                *remaining -= ctx.dt;
                if *remaining <= 0.0 {
                    st.telegraph_s = None;
                    spawn_wave(body, st, db, ctx);
                    st.spawn_timer_s = spawn_interval(body.tier, spec);
                }
            }
            None => {
                st.spawn_timer_s -= ctx.dt;
                if st.spawn_timer_s <= 0.0 {
                    st.telegraph_s = Some(spec.telegraph_s);
                    ctx.events.push(EncounterEvent::Vfx {
                        kind: VfxKind::Telegraph,
                        pos: body.pos,
                        radius: body.radius * 2.0,
                    });
                }
            }
        }
    }

    step_nova(body, st, spec, player, ctx);

    let weaver_pos = body.pos;
    let tier = body.tier;
    for m in st.minions.iter_mut() {
        m.update(weaver_pos, tier, fear_from, player, db, ctx);
    }
    st.minions.retain(Minion::alive);

    let _ = resolve_player_contact(body, &db.nexus_weaver, player, ctx.events);
}

fn spawn_wave(body: &BossBody, st: &mut WeaverState, db: &BossSpecDb, ctx: &mut FrameCtx) {
    let spec = &db.weaver;
    let (drones, lancers, orbiters) = wave_counts(body.tier, spec);
    log::debug!(
        "weaver tier {} spawning wave: {drones} drones, {lancers} lancers, {orbiters} orbiters",
        body.tier
    );
    #[derive(Clone, Copy)]
    enum Slot {
        Drone,
        Lancer,
        Orbiter(u32),
    }
    // Interleave the kinds so the wave does not always lead with drones.
    let mut order: Vec<Slot> = Vec::with_capacity((drones + lancers + orbiters) as usize);
    order.extend((0..drones).map(|_| Slot::Drone));
    order.extend((0..lancers).map(|_| Slot::Lancer));
    order.extend((0..orbiters).map(Slot::Orbiter));
    order.shuffle(ctx.rng);
    for slot in order {
        let heading = ctx.rng.random_range(0.0..std::f32::consts::TAU);
        let dist = ctx.rng.random_range(body.radius..spec.spawn_scatter);
        let pos = body.pos + Vec2::from_angle(heading) * dist;
        let (minion, radius) = match slot {
            Slot::Drone => (Minion::drone(pos, &db.drone), db.drone.radius),
            Slot::Lancer => (Minion::lancer(pos, &db.lancer), db.lancer.radius),
            Slot::Orbiter(i) => {
                // Spread orbit slots evenly so orbiters do not bunch up.
                let angle = i as f32 * std::f32::consts::TAU / orbiters as f32;
                (
                    Minion::orbiter(pos, body.tier, &db.orbiter, angle),
                    db.orbiter.radius,
                )
            }
        };
        st.minions.push(minion);
        ctx.events.push(EncounterEvent::Vfx {
            kind: VfxKind::SpawnFlash,
            pos,
            radius: radius * 2.0,
        });
    }
    metrics::counter!("encounter_minions_spawned").increment((drones + lancers + orbiters) as u64);
}

fn step_nova(
    body: &BossBody,
    st: &mut WeaverState,
    spec: &NexusWeaverSpec,
    player: &PlayerView,
    ctx: &mut FrameCtx,
) {
    let nova = &spec.nova;
    if let Some(active) = &mut st.nova {
        active.radius += nova.max_radius / nova.duration_s * ctx.dt;
        let dist = body.pos.distance(player.pos);
        if !active.hit_player
            && player.immunity_s <= 0.0
            && dist <= active.radius
            && dist >= active.radius - nova.band
        {
            active.hit_player = true;
            let damage = if player.shield_overcharge { 0 } else { nova.damage };
            ctx.events.push(EncounterEvent::BossAttackHit { damage, pos: player.pos });
        }
        if active.radius >= nova.max_radius {
            st.nova = None;
        }
        return;
    }
    if body.tier < nova.min_tier || st.feared() {
        return;
    }

    if body.pos.distance(player.pos) < nova.proximity {
        st.proximity_s += ctx.dt;
    } else {
        st.proximity_s = 0.0;
    }
    // Trigger odds are tuned per 16.67ms reference frame and scaled by dt.
    let chance = nova.chance_per_frame * body.tier as f32 * (ctx.dt * 60.0);
    let triggered = st.proximity_s >= nova.sustain_s || ctx.rng.random::<f32>() < chance;
    if triggered {
        st.proximity_s = 0.0;
        st.nova = Some(NovaState { radius: body.radius, hit_player: false });
        ctx.events.push(EncounterEvent::Vfx {
            kind: VfxKind::NovaRing,
            pos: body.pos,
            radius: nova.max_radius,
        });
        ctx.events.push(EncounterEvent::ScreenShake { magnitude: 3.0, duration_s: 0.25 });
    }
}

pub fn on_projectile(
    body: &mut BossBody,
    st: &mut WeaverState,
    status: &StatusTuning,
    player: &PlayerView,
    p: &mut Projectile,
    ctx: &mut FrameCtx,
) {
    let reach = body.radius + p.radius;
    if (p.pos - body.pos).length_squared() < reach * reach {
        default_projectile_hit(body, status, player, p, ctx.rng);
        return;
    }
    for m in st.minions.iter_mut() {
        let reach = m.radius + p.radius;
        if (p.pos - m.pos).length_squared() < reach * reach {
            let _ = m.take_damage(p.damage);
            p.deactivate();
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{Boss, BossClass, BossId, BossKind};
    use crate::context::NoopHooks;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn(tier: u32, rng: &mut ChaCha8Rng, db: &BossSpecDb) -> Boss {
        Boss::spawn(
            BossId(9),
            BossClass::NexusWeaver,
            tier,
            Vec2::new(400.0, 300.0),
            db,
            0.5,
            0.0,
            rng,
        )
    }

    fn weaver_state(boss: &mut Boss) -> &mut WeaverState {
        match &mut boss.kind {
            BossKind::NexusWeaver(st) => st,
            _ => unreachable!(),
        }
    }

    #[test]
    fn tier_four_wave_is_five_two_one() {
        let spec = NexusWeaverSpec::default();
        assert_eq!(wave_counts(4, &spec), (5, 2, 1));
        // Below minimum tiers the advanced minions stay out.
        assert_eq!(wave_counts(1, &spec), (2, 0, 0));
        assert_eq!(wave_counts(2, &spec), (3, 1, 0));
    }

    #[test]
    fn telegraph_precedes_spawn() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut boss = spawn(1, &mut rng, &db);
        weaver_state(&mut boss).spawn_timer_s = 0.0;
        let player = PlayerView {
            pos: Vec2::new(40.0, 40.0),
            ..PlayerView::default()
        };
        let (mut projectiles, mut events, mut hooks) = (Vec::new(), Vec::new(), NoopHooks);
        let mut ctx = FrameCtx {
            dt: 1.0 / 60.0,
            arena_w: 800.0,
            arena_h: 600.0,
            projectiles: &mut projectiles,
            events: &mut events,
            rng: &mut rng,
            hooks: &mut hooks,
        };
        boss.update(&player, &db, &mut ctx);
        assert!(events.iter().any(|e| matches!(
            e,
            EncounterEvent::Vfx { kind: VfxKind::Telegraph, .. }
        )));
        assert!(weaver_state(&mut boss).minions.is_empty());

        // Run out the telegraph; the wave appears.
        let frames = (db.weaver.telegraph_s * 60.0) as usize + 2;
        for _ in 0..frames {
            let mut ctx = FrameCtx {
                dt: 1.0 / 60.0,
                arena_w: 800.0,
                arena_h: 600.0,
                projectiles: &mut projectiles,
                events: &mut events,
                rng: &mut rng,
                hooks: &mut hooks,
            };
            boss.update(&player, &db, &mut ctx);
        }
        let (d, l, o) = wave_counts(1, &db.weaver);
        assert_eq!(weaver_state(&mut boss).minions.len(), (d + l + o) as usize);
    }

    #[test]
    fn wave_spawn_order_is_shuffled() {
        use crate::boss::minion::MinionKind;
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(33);
        let mut boss = spawn(4, &mut rng, &db);
        let player = PlayerView {
            pos: Vec2::new(40.0, 40.0),
            ..PlayerView::default()
        };
        let (mut projectiles, mut events, mut hooks) = (Vec::new(), Vec::new(), NoopHooks);
        // Across several waves at least one must interleave kinds instead
        // of grouping drones, then lancers, then orbiters.
        let mut interleaved = false;
        for _ in 0..6 {
            weaver_state(&mut boss).minions.clear();
            weaver_state(&mut boss).spawn_timer_s = 0.0;
            let frames = (db.weaver.telegraph_s * 60.0) as usize + 3;
            for _ in 0..frames {
                let mut ctx = FrameCtx {
                    dt: 1.0 / 60.0,
                    arena_w: 800.0,
                    arena_h: 600.0,
                    projectiles: &mut projectiles,
                    events: &mut events,
                    rng: &mut rng,
                    hooks: &mut hooks,
                };
                boss.update(&player, &db, &mut ctx);
            }
            let ranks: Vec<u8> = weaver_state(&mut boss)
                .minions
                .iter()
                .map(|m| match m.kind {
                    MinionKind::Drone => 0,
                    MinionKind::Lancer(_) => 1,
                    MinionKind::Orbiter(_) => 2,
                })
                .collect();
            let (d, l, o) = wave_counts(4, &db.weaver);
            assert_eq!(ranks.len(), (d + l + o) as usize);
            if ranks.windows(2).any(|w| w[0] > w[1]) {
                interleaved = true;
            }
        }
        assert!(interleaved, "spawn order never deviated from grouped kinds");
    }

    #[test]
    fn fear_pauses_spawns_and_routs_weaver() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut boss = spawn(1, &mut rng, &db);
        weaver_state(&mut boss).spawn_timer_s = 0.0;
        boss.apply_fear(2.0, Vec2::new(500.0, 300.0));
        let player = PlayerView {
            pos: Vec2::new(500.0, 300.0),
            ..PlayerView::default()
        };
        let (mut projectiles, mut events, mut hooks) = (Vec::new(), Vec::new(), NoopHooks);
        let x0 = boss.body.pos.x;
        let mut ctx = FrameCtx {
            dt: 1.0 / 60.0,
            arena_w: 800.0,
            arena_h: 600.0,
            projectiles: &mut projectiles,
            events: &mut events,
            rng: &mut rng,
            hooks: &mut hooks,
        };
        boss.update(&player, &db, &mut ctx);
        // No telegraph fired, and the weaver moved away from the fear point.
        assert!(!events.iter().any(|e| matches!(
            e,
            EncounterEvent::Vfx { kind: VfxKind::Telegraph, .. }
        )));
        assert!(boss.body.pos.x < x0);
    }

    #[test]
    fn sustained_proximity_forces_nova_and_band_hits_once() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut boss = spawn(db.weaver.nova.min_tier, &mut rng, &db);
        weaver_state(&mut boss).proximity_s = db.weaver.nova.sustain_s;
        let player = PlayerView {
            pos: boss.body.pos + Vec2::new(60.0, 0.0),
            ..PlayerView::default()
        };
        let (mut projectiles, mut events, mut hooks) = (Vec::new(), Vec::new(), NoopHooks);
        let mut ctx = FrameCtx {
            dt: 1.0 / 60.0,
            arena_w: 800.0,
            arena_h: 600.0,
            projectiles: &mut projectiles,
            events: &mut events,
            rng: &mut rng,
            hooks: &mut hooks,
        };
        boss.update(&player, &db, &mut ctx);
        assert!(weaver_state(&mut boss).nova.is_some());
        assert!(events.iter().any(|e| matches!(
            e,
            EncounterEvent::Vfx { kind: VfxKind::NovaRing, .. }
        )));

        // Expand until the band sweeps past the player; exactly one hit.
        events.clear();
        let frames = (db.weaver.nova.duration_s * 60.0) as usize + 2;
        for _ in 0..frames {
            let mut ctx = FrameCtx {
                dt: 1.0 / 60.0,
                arena_w: 800.0,
                arena_h: 600.0,
                projectiles: &mut projectiles,
                events: &mut events,
                rng: &mut rng,
                hooks: &mut hooks,
            };
            boss.update(&player, &db, &mut ctx);
        }
        let hits = events
            .iter()
            .filter(|e| matches!(e, EncounterEvent::BossAttackHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert!(weaver_state(&mut boss).nova.is_none());
    }

    #[test]
    fn nova_never_fires_below_min_tier() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut boss = spawn(db.weaver.nova.min_tier - 1, &mut rng, &db);
        weaver_state(&mut boss).proximity_s = db.weaver.nova.sustain_s + 10.0;
        let player = PlayerView {
            pos: boss.body.pos + Vec2::new(60.0, 0.0),
            ..PlayerView::default()
        };
        let (mut projectiles, mut events, mut hooks) = (Vec::new(), Vec::new(), NoopHooks);
        for _ in 0..120 {
            let mut ctx = FrameCtx {
                dt: 1.0 / 60.0,
                arena_w: 800.0,
                arena_h: 600.0,
                projectiles: &mut projectiles,
                events: &mut events,
                rng: &mut rng,
                hooks: &mut hooks,
            };
            boss.update(&player, &db, &mut ctx);
        }
        assert!(weaver_state(&mut boss).nova.is_none());
    }

    #[test]
    fn stray_ray_damages_minion_not_weaver() {
        let db = BossSpecDb::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut boss = spawn(1, &mut rng, &db);
        weaver_state(&mut boss)
            .minions
            .push(Minion::drone(Vec2::new(600.0, 300.0), &db.drone));
        let mut p = Projectile::player(Vec2::new(602.0, 300.0), Vec2::new(-300.0, 0.0), 5, 1.0);
        let player = PlayerView::default();
        let (mut projectiles, mut events, mut hooks) = (Vec::new(), Vec::new(), NoopHooks);
        let hp0 = boss.body.hp;
        let mut ctx = FrameCtx {
            dt: 1.0 / 60.0,
            arena_w: 800.0,
            arena_h: 600.0,
            projectiles: &mut projectiles,
            events: &mut events,
            rng: &mut rng,
            hooks: &mut hooks,
        };
        boss.on_projectile(&mut p, &db, &player, &mut ctx);
        assert_eq!(boss.body.hp, hp0);
        assert!(!p.active);
        assert_eq!(weaver_state(&mut boss).minions[0].hp, db.drone.hp - 5);
    }
}
