//! Nexus weaver minions: drone, lancer, orbiter.
//!
//! Minions are owned by their weaver and die with it. They share a small
//! body plus a per-kind state machine; the lancer is the only one with a
//! real FSM (roam, aim, dash, cooldown).

use glam::Vec2;
use rand::Rng;

use data_runtime::configs::bosses::{BossSpecDb, DroneSpec, LancerSpec, OrbiterSpec};

use crate::context::FrameCtx;
use crate::events::EncounterEvent;
use crate::player::PlayerView;
use crate::projectile::Projectile;

/// Lancer begins lining up a dash inside this range.
const LANCER_ENGAGE_RANGE: f32 = 260.0;
/// Orbiter slot-chasing ease rate.
const ORBITER_EASE_RATE: f32 = 4.0;
const HIT_FLASH_S: f32 = 0.1;

#[derive(Debug, Clone)]
pub enum LancerPhase {
    /// Wandering toward a random point near the player, re-picked on
    /// arrival.
    Roam { target: Option<Vec2> },
    Aim { remaining_s: f32, heading: Vec2 },
    Dash { remaining_s: f32, heading: Vec2 },
    Cooldown { remaining_s: f32 },
}

#[derive(Debug, Clone)]
pub struct OrbiterState {
    pub angle: f32,
    pub fire_cooldown_s: f32,
}

#[derive(Debug, Clone)]
pub enum MinionKind {
    Drone,
    Lancer(LancerPhase),
    Orbiter(OrbiterState),
}

#[derive(Debug, Clone)]
pub struct Minion {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: i32,
    pub contact_damage: i32,
    pub hit_flash_s: f32,
    pub kind: MinionKind,
}

fn orbiter_cooldown(tier: u32, spec: &OrbiterSpec) -> f32 {
    (spec.fire_cooldown_s - spec.cooldown_tier_step * tier.saturating_sub(1) as f32)
        .max(spec.cooldown_min_s)
}

impl Minion {
    pub fn drone(pos: Vec2, spec: &DroneSpec) -> Self {
        Self {
            pos,
            radius: spec.radius,
            hp: spec.hp,
            contact_damage: spec.contact_damage,
            hit_flash_s: 0.0,
            kind: MinionKind::Drone,
        }
    }

    pub fn lancer(pos: Vec2, spec: &LancerSpec) -> Self {
        Self {
            pos,
            radius: spec.radius,
            hp: spec.hp,
            contact_damage: spec.contact_damage,
            hit_flash_s: 0.0,
            kind: MinionKind::Lancer(LancerPhase::Roam { target: None }),
        }
    }

    pub fn orbiter(pos: Vec2, tier: u32, spec: &OrbiterSpec, angle: f32) -> Self {
        Self {
            pos,
            radius: spec.radius,
            hp: spec.hp,
            contact_damage: spec.contact_damage,
            hit_flash_s: 0.0,
            kind: MinionKind::Orbiter(OrbiterState {
                angle,
                fire_cooldown_s: orbiter_cooldown(tier, spec),
            }),
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    /// Returns true when damage landed (false once dead).
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.hp <= 0 || amount <= 0 {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        self.hit_flash_s = HIT_FLASH_S;
        true
    }

    pub fn update(
        &mut self,
        weaver_pos: Vec2,
        tier: u32,
        fear_from: Option<Vec2>,
        player: &PlayerView,
        db: &BossSpecDb,
        ctx: &mut FrameCtx,
    ) {
        self.hit_flash_s = (self.hit_flash_s - ctx.dt).max(0.0);

        if let Some(from) = fear_from {
            self.flee(from, db, ctx.dt);
        } else {
            match &mut self.kind {
                MinionKind::Drone => {
                    let to = player.pos - self.pos;
                    let dist = to.length();
                    if dist > 1e-4 {
                        self.pos += to / dist * (db.drone.speed * ctx.dt).min(dist);
                    }
                }
                MinionKind::Lancer(phase) => {
                    step_lancer(&mut self.pos, self.radius, phase, &db.lancer, player, ctx);
                }
                MinionKind::Orbiter(st) => {
                    step_orbiter(&mut self.pos, st, tier, weaver_pos, &db.orbiter, player, ctx);
                }
            }
        }

        self.pos.x = self.pos.x.clamp(self.radius, (ctx.arena_w - self.radius).max(self.radius));
        self.pos.y = self.pos.y.clamp(self.radius, (ctx.arena_h - self.radius).max(self.radius));

        self.resolve_contact(player, ctx);
    }

    fn flee(&mut self, from: Vec2, db: &BossSpecDb, dt: f32) {
        let speed = match &self.kind {
            MinionKind::Drone => db.drone.speed,
            MinionKind::Lancer(_) => db.lancer.roam_speed,
            MinionKind::Orbiter(_) => db.orbiter.shot_speed * 0.4,
        };
        let away = (self.pos - from).normalize_or_zero();
        let away = if away == Vec2::ZERO { Vec2::Y } else { away };
        self.pos += away * speed * dt;
    }

    fn resolve_contact(&mut self, player: &PlayerView, ctx: &mut FrameCtx) {
        if self.hp <= 0 || player.immunity_s > 0.0 {
            return;
        }
        let delta = player.pos - self.pos;
        let reach = self.radius + player.radius;
        if delta.length_squared() >= reach * reach {
            return;
        }
        let normal = delta.normalize_or_zero();
        let normal = if normal == Vec2::ZERO { Vec2::X } else { normal };
        let damage = if player.shield_overcharge { 0 } else { self.contact_damage };
        ctx.events.push(EncounterEvent::PlayerMinionCollision {
            damage,
            knockback: normal * 180.0,
        });
        // Minions are one-shot: contact spends them.
        self.hp = 0;
    }
}

fn step_lancer(
    pos: &mut Vec2,
    radius: f32,
    phase: &mut LancerPhase,
    spec: &LancerSpec,
    player: &PlayerView,
    ctx: &mut FrameCtx,
) {
    let dt = ctx.dt;
    match phase {
        LancerPhase::Roam { target } => {
            let to_player = player.pos - *pos;
            if to_player.length() < LANCER_ENGAGE_RANGE {
                *phase = LancerPhase::Aim {
                    remaining_s: spec.aim_s,
                    heading: to_player.normalize_or_zero(),
                };
                return;
            }
            // Wander toward a point near the player rather than beelining.
            let goal = match target {
                Some(t) if t.distance(*pos) > 12.0 => *t,
                _ => {
                    let heading = ctx.rng.random_range(0.0..std::f32::consts::TAU);
                    let offset = Vec2::from_angle(heading) * ctx.rng.random_range(40.0..140.0);
                    let t = player.pos + offset;
                    *target = Some(t);
                    t
                }
            };
            let to = goal - *pos;
            let dist = to.length();
            if dist > 1e-4 {
                *pos += to / dist * (spec.roam_speed * dt).min(dist);
            }
        }
        LancerPhase::Aim { remaining_s, heading } => {
            *remaining_s -= dt;
            // Track slowly; the dash commits to the last aimed heading.
            let target = (player.pos - *pos).normalize_or_zero();
            if target != Vec2::ZERO {
                let current = heading.y.atan2(heading.x);
                let want = target.y.atan2(target.x);
                let mut d = (want - current) % std::f32::consts::TAU;
                if d > std::f32::consts::PI {
                    d -= std::f32::consts::TAU;
                } else if d < -std::f32::consts::PI {
                    d += std::f32::consts::TAU;
                }
                let step = (spec.aim_turn_rate_rad_s * dt).min(d.abs());
                *heading = Vec2::from_angle(current + d.signum() * step);
            }
            if *remaining_s <= 0.0 {
                *phase = LancerPhase::Dash {
                    remaining_s: spec.dash_s,
                    heading: *heading,
                };
            }
        }
        LancerPhase::Dash { remaining_s, heading } => {
            *remaining_s -= dt;
            *pos += *heading * spec.dash_speed * dt;
            // Expiry or hitting the arena edge ends the dash.
            let hit_wall = pos.x <= radius
                || pos.x >= ctx.arena_w - radius
                || pos.y <= radius
                || pos.y >= ctx.arena_h - radius;
            if *remaining_s <= 0.0 || hit_wall {
                *phase = LancerPhase::Cooldown { remaining_s: spec.cooldown_s };
            }
        }
        LancerPhase::Cooldown { remaining_s } => {
            *remaining_s -= dt;
            if *remaining_s <= 0.0 {
                *phase = LancerPhase::Roam { target: None };
            }
        }
    }
}

fn step_orbiter(
    pos: &mut Vec2,
    st: &mut OrbiterState,
    tier: u32,
    weaver_pos: Vec2,
    spec: &OrbiterSpec,
    player: &PlayerView,
    ctx: &mut FrameCtx,
) {
    st.angle = (st.angle + spec.angular_vel_rad_s * ctx.dt).rem_euclid(std::f32::consts::TAU);
    let slot = weaver_pos + Vec2::from_angle(st.angle) * spec.orbit_radius;
    *pos += (slot - *pos) * (ORBITER_EASE_RATE * ctx.dt).min(1.0);

    st.fire_cooldown_s -= ctx.dt;
    if st.fire_cooldown_s <= 0.0 {
        let dir = (player.pos - *pos).normalize_or_zero();
        let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
        // Small heading jitter keeps a stationary player from eating every shot.
        let jitter = ctx.rng.random_range(-0.12..0.12f32);
        let dir = Vec2::from_angle(dir.y.atan2(dir.x) + jitter);
        ctx.projectiles.push(Projectile::hostile(
            *pos,
            dir * spec.shot_speed,
            spec.shot_damage,
            spec.shot_life_s,
        ));
        st.fire_cooldown_s = orbiter_cooldown(tier, spec);
    }
}
