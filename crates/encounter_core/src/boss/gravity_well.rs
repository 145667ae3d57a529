//! Gravity well: periodically launches a slow gravity ray that captures
//! player rays into orbit, then detonates.
//!
//! The well ray itself is boss-owned state, not a pool projectile; the
//! captured player rays stay in the pool, tagged with a [`Capture`] keyed
//! by this boss's id so teardown can find them. Captured rays are inert
//! against the boss and are spent as detonation ammunition: each one adds
//! area damage, is flung back out as a hostile ray, and scatters extra
//! fresh hostiles.

use glam::Vec2;
use rand::Rng;

use data_runtime::configs::bosses::{BossSpec, GravityWellSpec};

use crate::context::FrameCtx;
use crate::events::{EncounterEvent, VfxKind};
use crate::player::PlayerView;
use crate::projectile::{Capture, Faction, Projectile};

use super::{BossBody, BossId};

/// Base angular velocity of captured rays; ramps up inside the final-spin
/// window before detonation.
const CAPTURE_SPIN_RAD_S: f32 = 2.4;
const CAPTURE_EASE_RATE: f32 = 6.0;

#[derive(Debug, Clone)]
enum Phase {
    Roam,
    /// Backing away from the player before launching.
    Initiate { remaining_s: f32 },
}

#[derive(Debug, Clone)]
pub struct WellRay {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age_s: f32,
    pub life_s: f32,
}

#[derive(Debug, Clone)]
pub struct WellState {
    phase: Phase,
    cooldown_s: f32,
    pub ray: Option<WellRay>,
    /// Captured rays alternate orbit direction.
    next_clockwise: bool,
}

fn scaled_cooldown(tier: u32, spec: &GravityWellSpec) -> f32 {
    let scale = spec.cooldown_tier_scale.powi(tier.saturating_sub(1) as i32);
    (spec.spawn_cooldown_s * scale).max(spec.cooldown_min_s)
}

impl WellState {
    pub fn new(tier: u32, spec: &GravityWellSpec) -> Self {
        Self {
            phase: Phase::Roam,
            cooldown_s: scaled_cooldown(tier, spec),
            ray: None,
            next_clockwise: false,
        }
    }
}

pub fn update(
    body: &mut BossBody,
    st: &mut WellState,
    base: &BossSpec,
    spec: &GravityWellSpec,
    player: &PlayerView,
    ctx: &mut FrameCtx,
) {
    match &mut st.phase {
        Phase::Roam => {
            if !body.in_contact_stun() {
                let speed = body.speed;
                body.seek(player.pos, speed, ctx.dt);
            }
            if st.ray.is_none() {
                st.cooldown_s -= ctx.dt;
                if st.cooldown_s <= 0.0 {
                    st.phase = Phase::Initiate { remaining_s: spec.initiate_s };
                    ctx.events.push(EncounterEvent::Vfx {
                        kind: VfxKind::Telegraph,
                        pos: body.pos,
                        radius: body.radius * 1.5,
                    });
                }
            }
        }
        Phase::Initiate { remaining_s } => {
            *remaining_s -= ctx.dt;
            let away = (body.pos - player.pos).normalize_or_zero();
            body.pos += away * spec.backoff_speed * ctx.dt;
            if *remaining_s <= 0.0 {
                let dir = (player.pos - body.pos).normalize_or_zero();
                let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
                st.ray = Some(WellRay {
                    pos: body.pos + dir * (body.radius + spec.ray_radius),
                    vel: dir * spec.ray_speed,
                    age_s: 0.0,
                    life_s: spec.ray_life_s,
                });
                st.cooldown_s = scaled_cooldown(body.tier, spec);
                st.phase = Phase::Roam;
            }
        }
    }

    step_ray(body, st, spec, ctx);
    resolve_contact(body, base, player, ctx.events);
}

/// Advance the live gravity ray: drift, pull, orbit, and timed detonation.
fn step_ray(body: &BossBody, st: &mut WellState, spec: &GravityWellSpec, ctx: &mut FrameCtx) {
    let Some(ray) = &mut st.ray else { return };
    ray.age_s += ctx.dt;
    ray.pos += ray.vel * ctx.dt;
    ray.pos.x = ray.pos.x.clamp(spec.ray_radius, (ctx.arena_w - spec.ray_radius).max(spec.ray_radius));
    ray.pos.y = ray.pos.y.clamp(spec.ray_radius, (ctx.arena_h - spec.ray_radius).max(spec.ray_radius));

    let remaining = ray.life_s - ray.age_s;
    // Spin-up toward detonation: accelerates over the ray's whole life
    // and steepens again inside the final window.
    let t = (ray.age_s / ray.life_s).clamp(0.0, 1.0);
    let mut spin = CAPTURE_SPIN_RAD_S * (1.0 + t);
    if remaining < spec.final_spin_s {
        spin += CAPTURE_SPIN_RAD_S * 2.0 * (1.0 - remaining.max(0.0) / spec.final_spin_s);
    }

    for p in ctx.projectiles.iter_mut() {
        if !p.active || p.faction != Faction::Player {
            continue;
        }
        match &mut p.capture {
            Some(c) if c.owner == body.id => {
                c.dist += (c.orbit_radius - c.dist) * (CAPTURE_EASE_RATE * ctx.dt).min(1.0);
                let dir = if c.clockwise { -1.0 } else { 1.0 };
                c.angle += dir * spin * ctx.dt;
                p.pos = ray.pos + Vec2::from_angle(c.angle) * c.dist;
                p.vel = Vec2::from_angle(c.angle + dir * std::f32::consts::FRAC_PI_2) * spin * c.dist;
                // Captured rays never age out; the detonation spends them.
                p.age_s = 0.0;
            }
            Some(_) => {}
            None => {
                let to_ray = ray.pos - p.pos;
                let dist = to_ray.length();
                if dist < spec.ray_radius + p.radius {
                    // Actual contact: the ray is absorbed into orbit.
                    let (angle, dist) = polar_about(ray.pos, p.pos);
                    p.capture = Some(Capture {
                        owner: body.id,
                        orbit_radius: ctx
                            .rng
                            .random_range(spec.orbit_radius_min..spec.orbit_radius_max),
                        clockwise: st.next_clockwise,
                        angle,
                        dist,
                    });
                    st.next_clockwise = !st.next_clockwise;
                } else if dist < spec.pull_radius {
                    p.vel += to_ray / dist * spec.pull_accel * ctx.dt;
                }
            }
        }
    }

    if ray.age_s >= ray.life_s {
        detonate(body, st, spec, ctx);
    }
}

/// Spend captured rays: area damage, each original flung back out as a
/// hostile, plus extra scatter hostiles per capture. Clears the well ray
/// and restarts the cooldown. With nothing captured the ray just goes
/// away, no effect, no sound.
fn detonate(body: &BossBody, st: &mut WellState, spec: &GravityWellSpec, ctx: &mut FrameCtx) {
    let Some(ray) = st.ray.take() else { return };
    let mut origins = Vec::new();
    for p in ctx.projectiles.iter_mut() {
        let owned = matches!(&p.capture, Some(c) if c.owner == body.id);
        if p.active && owned {
            origins.push(p.pos);
            // The original leaves on a jittered outward heading.
            let out = p.pos - ray.pos;
            let base = if out.length_squared() > 1e-6 {
                out.y.atan2(out.x)
            } else {
                ctx.rng.random_range(0.0..std::f32::consts::TAU)
            };
            let heading = base + ctx.rng.random_range(-0.4..0.4);
            p.scatter(
                Vec2::from_angle(heading) * spec.scatter_speed,
                spec.scatter_damage,
                spec.scatter_life_s,
            );
        }
    }
    let captured = origins.len() as u32;
    for origin in origins {
        for _ in 0..spec.rays_per_captured {
            let heading = ctx.rng.random_range(0.0..std::f32::consts::TAU);
            ctx.projectiles.push(Projectile::hostile(
                origin,
                Vec2::from_angle(heading) * spec.scatter_speed,
                spec.scatter_damage,
                spec.scatter_life_s,
            ));
        }
    }
    if captured > 0 {
        ctx.events.push(EncounterEvent::Vfx {
            kind: VfxKind::DetonationBurst,
            pos: ray.pos,
            radius: spec.pull_radius,
        });
        ctx.events.push(EncounterEvent::Detonation {
            pos: ray.pos,
            radius: spec.pull_radius,
            damage: spec.area_damage_per_captured * captured as i32,
        });
        ctx.events.push(EncounterEvent::ScreenShake {
            magnitude: 4.0 + captured as f32,
            duration_s: 0.3,
        });
    }
    log::debug!("gravity ray detonated with {captured} captured rays");
}

/// Externally forced early detonation (player ram on the charging well).
pub fn force_detonate(
    body: &BossBody,
    st: &mut WellState,
    spec: &GravityWellSpec,
    ctx: &mut FrameCtx,
) {
    if st.ray.is_some() {
        detonate(body, st, spec, ctx);
    }
}

/// Silent cleanup on defeat or reset: captured rays deactivate without
/// detonating.
pub fn teardown(id: BossId, st: &mut WellState, projectiles: &mut Vec<Projectile>) {
    st.ray = None;
    for p in projectiles.iter_mut() {
        if matches!(&p.capture, Some(c) if c.owner == id) {
            p.deactivate();
        }
    }
}

/// Bulwark-aware contact: a ready ram turns the exchange around, a spent
/// bulwark still blunts the knockback, otherwise standard contact rules.
fn resolve_contact(
    body: &mut BossBody,
    base: &BossSpec,
    player: &PlayerView,
    events: &mut Vec<EncounterEvent>,
) {
    if body.in_contact_stun() || player.immunity_s > 0.0 {
        return;
    }
    let delta = player.pos - body.pos;
    let reach = body.radius + player.radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-4 { delta / dist } else { Vec2::X };

    if player.has_bulwark && player.ram_cooldown_s <= 0.0 {
        events.push(EncounterEvent::RamCollision { class: body.class, pos: body.pos });
    } else if player.has_bulwark {
        events.push(EncounterEvent::PlayerBossCollision {
            class: body.class,
            damage: 0,
            knockback: normal * base.knock_force * 0.4,
        });
    } else {
        let damage = if player.shield_overcharge { 0 } else { base.contact_damage };
        events.push(EncounterEvent::PlayerBossCollision {
            class: body.class,
            damage,
            knockback: normal * base.knock_force,
        });
    }
    body.pos -= normal * (reach - dist);
    body.contact.vel = -normal * base.recoil_speed;
    body.contact.stun_s = base.self_stun_s;
}

fn polar_about(center: Vec2, point: Vec2) -> (f32, f32) {
    let d = point - center;
    (d.y.atan2(d.x), d.length())
}
