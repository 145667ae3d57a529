//! Mirror shield: slow drifter with a tracking reflective arc.
//!
//! The arc rotates toward the player at a capped rate, so fast orbiting
//! outruns it. Player rays that strike the arc from the front are
//! reflected back as hostile rays; strikes from behind the arc plane are
//! absorbed harmlessly; anything outside the arc damages the body.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use data_runtime::configs::bosses::{BossSpec, MirrorShieldSpec, StatusTuning};

use crate::context::FrameCtx;
use crate::events::{EncounterEvent, VfxKind};
use crate::player::PlayerView;
use crate::projectile::{Faction, Projectile};

use super::{default_projectile_hit, resolve_player_contact, BossBody};

#[derive(Debug, Clone)]
pub struct ShieldState {
    /// Center angle of the shield arc, in radians about the body.
    pub shield_angle: f32,
    drift_heading: f32,
    retarget_s: f32,
}

impl ShieldState {
    pub fn new(rng: &mut ChaCha8Rng) -> Self {
        Self {
            shield_angle: rng.random_range(0.0..TAU),
            drift_heading: rng.random_range(0.0..TAU),
            retarget_s: 0.0,
        }
    }
}

/// Smallest signed angle from `from` to `to`.
fn angle_delta(from: f32, to: f32) -> f32 {
    let mut d = (to - from) % TAU;
    if d > PI {
        d -= TAU;
    } else if d < -PI {
        d += TAU;
    }
    d
}

pub fn update(
    body: &mut BossBody,
    st: &mut ShieldState,
    base: &BossSpec,
    spec: &MirrorShieldSpec,
    player: &PlayerView,
    ctx: &mut FrameCtx,
) {
    // Shield tracking, rate-capped so a fast orbit can get behind it.
    let to_player = player.pos - body.pos;
    if to_player.length_squared() > 1e-6 {
        let target = to_player.y.atan2(to_player.x);
        let delta = angle_delta(st.shield_angle, target);
        let max_step = spec.turn_rate_rad_s * ctx.dt;
        st.shield_angle += delta.clamp(-max_step, max_step);
        st.shield_angle = st.shield_angle.rem_euclid(TAU);
    }

    // Drift on a heading re-rolled at a fixed cadence.
    st.retarget_s -= ctx.dt;
    if st.retarget_s <= 0.0 {
        st.drift_heading = ctx.rng.random_range(0.0..TAU);
        st.retarget_s = spec.drift_retarget_s;
    }
    if !body.in_contact_stun() {
        let dir = Vec2::from_angle(st.drift_heading);
        body.pos += dir * body.speed * ctx.dt;
    }

    let _ = resolve_player_contact(body, base, player, ctx.events);
}

pub fn on_projectile(
    body: &mut BossBody,
    st: &ShieldState,
    spec: &MirrorShieldSpec,
    status: &StatusTuning,
    player: &PlayerView,
    p: &mut Projectile,
    ctx: &mut FrameCtx,
) {
    let to_hit = p.pos - body.pos;
    let dist = to_hit.length();
    let reach = body.radius + p.radius;
    if dist >= reach {
        return;
    }
    let hit_angle = to_hit.y.atan2(to_hit.x);
    let within_arc = angle_delta(st.shield_angle, hit_angle).abs() <= spec.arc_width_rad * 0.5;
    if within_arc && dist > spec.shield_min_frac * body.radius {
        let normal = Vec2::from_angle(st.shield_angle);
        if p.vel.dot(normal) < 0.0 {
            // Front strike: mirror the ray back at the player.
            ctx.events.push(EncounterEvent::Vfx {
                kind: VfxKind::ShieldSpark,
                pos: p.pos,
                radius: p.radius * 3.0,
            });
            p.reflect(normal, spec.reflect_speed, spec.reflect_life_s);
            debug_assert_eq!(p.faction, Faction::Hostile);
        } else {
            // Grazing strike traveling with the shield plane: absorbed.
            p.deactivate();
        }
        return;
    }
    default_projectile_hit(body, status, player, p, ctx.rng);
}
