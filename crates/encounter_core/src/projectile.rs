//! Live projectile ("ray") entries as the encounter subsystem sees them.
//!
//! The pool engine itself is external; the frame driver lends the live
//! collection through [`crate::context::FrameCtx`] and this module only
//! defines the fields the bosses read and write: reflection re-tagging,
//! gravity capture, hostile spawns, and in-place deactivation.

use glam::Vec2;

use crate::boss::BossId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Hostile,
}

/// Orbit bookkeeping for a ray captured by a gravity well.
#[derive(Debug, Clone, Copy)]
pub struct Capture {
    pub owner: BossId,
    pub orbit_radius: f32,
    pub clockwise: bool,
    /// Current polar angle about the well ray's center.
    pub angle: f32,
    /// Current polar distance, eased toward `orbit_radius`.
    pub dist: f32,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: i32,
    pub faction: Faction,
    pub age_s: f32,
    pub life_s: f32,
    pub active: bool,
    pub capture: Option<Capture>,
}

impl Projectile {
    pub fn player(pos: Vec2, vel: Vec2, damage: i32, life_s: f32) -> Self {
        Self {
            pos,
            vel,
            radius: 4.0,
            damage,
            faction: Faction::Player,
            age_s: 0.0,
            life_s,
            active: true,
            capture: None,
        }
    }

    pub fn hostile(pos: Vec2, vel: Vec2, damage: i32, life_s: f32) -> Self {
        Self {
            faction: Faction::Hostile,
            ..Self::player(pos, vel, damage, life_s)
        }
    }

    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
        self.capture = None;
    }

    /// Fling out as a hostile ray with fresh damage and lifetime; a
    /// gravity detonation spends each captured ray this way. Clears the
    /// capture.
    pub fn scatter(&mut self, vel: Vec2, damage: i32, life_s: f32) {
        self.vel = vel;
        self.damage = damage;
        self.faction = Faction::Hostile;
        self.age_s = 0.0;
        self.life_s = life_s;
        self.capture = None;
    }

    /// Reflect about `normal` and re-tag as a hostile ray with a fresh
    /// speed and lifetime. `normal` must be unit length.
    pub fn reflect(&mut self, normal: Vec2, speed: f32, life_s: f32) {
        let v = self.vel;
        let bounced = v - 2.0 * v.dot(normal) * normal;
        self.vel = bounced.normalize_or_zero() * speed;
        if self.vel == Vec2::ZERO {
            self.vel = normal * speed;
        }
        self.faction = Faction::Hostile;
        self.age_s = 0.0;
        self.life_s = life_s;
    }
}
