//! Shared boss state and the closed archetype set.
//!
//! Every boss is a [`BossBody`] (tier-scaled health, status timers, contact
//! recoil bookkeeping) plus a [`BossKind`] variant carrying archetype state.
//! Dispatch is a plain `match`; there is no trait-object dynamic here.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use data_runtime::configs::bosses::{BossSpec, BossSpecDb, StatusTuning};

use crate::context::FrameCtx;
use crate::events::EncounterEvent;
use crate::player::{PlayerView, Upgrade};
use crate::projectile::Projectile;

pub mod chaser;
pub mod gravity_well;
pub mod minion;
pub mod mirror_shield;
pub mod nexus_weaver;

/// Bleed applied when the player holds serrated rays and lands a hit.
const SERRATED_BLEED_DPS: f32 = 6.0;
const SERRATED_BLEED_S: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BossId(pub u32);

/// Closed archetype set; also the key for the per-archetype tier map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossClass {
    Chaser,
    MirrorShield,
    GravityWell,
    NexusWeaver,
}

impl BossClass {
    /// Pool regular waves draw from. The weaver only appears as the forced
    /// elite encounter.
    pub const STANDARD: [BossClass; 3] =
        [BossClass::Chaser, BossClass::MirrorShield, BossClass::GravityWell];
    pub const ELITE: BossClass = BossClass::NexusWeaver;

    pub fn display_name(self) -> &'static str {
        match self {
            BossClass::Chaser => "Riftchaser",
            BossClass::MirrorShield => "Mirror Warden",
            BossClass::GravityWell => "Gravity Maw",
            BossClass::NexusWeaver => "Nexus Weaver",
        }
    }

    pub fn base(self, db: &BossSpecDb) -> &BossSpec {
        match self {
            BossClass::Chaser => &db.chaser,
            BossClass::MirrorShield => &db.mirror_shield,
            BossClass::GravityWell => &db.gravity_well,
            BossClass::NexusWeaver => &db.nexus_weaver,
        }
    }
}

/// `max_hp = floor(base_hp * (1 + (tier - 1) * per_tier))`.
pub fn max_health(base_hp: i32, tier: u32, per_tier: f32) -> i32 {
    let t = tier.max(1);
    (base_hp as f32 * (1.0 + (t - 1) as f32 * per_tier)).floor() as i32
}

#[derive(Debug, Clone, Copy)]
pub struct HitStun {
    pub remaining_s: f32,
    stored_speed: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Bleed {
    pub dps: f32,
    pub remaining_s: f32,
    /// Fractional damage held back until a whole point accumulates.
    carry: f32,
}

/// Post-contact recoil: a short self-stun during which the same contact
/// cannot re-trigger, plus a decaying push-away velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactRecoil {
    pub stun_s: f32,
    pub vel: Vec2,
}

#[derive(Debug, Clone)]
pub struct BossBody {
    pub id: BossId,
    pub class: BossClass,
    pub tier: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: i32,
    pub max_hp: i32,
    /// Current speed; halved while hit-stunned, restored on expiry.
    pub speed: f32,
    pub hit_flash_s: f32,
    pub stun: Option<HitStun>,
    pub bleed: Option<Bleed>,
    pub contact: ContactRecoil,
    /// Gameplay time stamped at spawn; kill-time records measure from here.
    pub spawned_at: f32,
}

impl BossBody {
    fn new(
        id: BossId,
        class: BossClass,
        tier: u32,
        pos: Vec2,
        base: &BossSpec,
        hp_per_tier: f32,
        spawned_at: f32,
    ) -> Self {
        let max_hp = max_health(base.base_hp, tier, hp_per_tier);
        Self {
            id,
            class,
            tier,
            pos,
            radius: base.radius,
            hp: max_hp,
            max_hp,
            speed: base.speed,
            hit_flash_s: 0.0,
            stun: None,
            bleed: None,
            contact: ContactRecoil::default(),
            spawned_at,
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    /// Contact self-stun blocks pursuit; hit-stun only slows it.
    #[inline]
    pub fn in_contact_stun(&self) -> bool {
        self.contact.stun_s > 0.0
    }

    /// Apply `amount` damage. No-op once defeated. Rolls the hit-stun
    /// chance (base plus the player's bonus) on qualifying hits. Returns
    /// whether damage was applied so callers can gate on-hit effects.
    pub fn take_damage(
        &mut self,
        amount: i32,
        status: &StatusTuning,
        stun_bonus: f32,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        if self.hp <= 0 || amount <= 0 {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        self.hit_flash_s = status.hit_flash_s;
        if self.stun.is_none() {
            let chance = status.stun_base_chance + stun_bonus;
            if rng.random::<f32>() < chance {
                self.stun = Some(HitStun {
                    remaining_s: status.stun_s,
                    stored_speed: self.speed,
                });
                self.speed *= status.stun_slow_factor;
            }
        }
        true
    }

    /// Stack bleed damage-per-second up to `cap`; duration refreshes to the
    /// max of current and new, never the sum.
    pub fn apply_bleed(&mut self, dps: f32, duration_s: f32, cap: f32) {
        match &mut self.bleed {
            Some(b) => {
                b.dps = (b.dps + dps).min(cap);
                b.remaining_s = b.remaining_s.max(duration_s);
            }
            None => {
                self.bleed = Some(Bleed {
                    dps: dps.min(cap),
                    remaining_s: duration_s,
                    carry: 0.0,
                });
            }
        }
    }

    /// Tick flash, bleed, hit-stun, and contact recoil. Archetype updates
    /// run after this each frame.
    pub fn tick_status(&mut self, dt: f32) {
        self.hit_flash_s = (self.hit_flash_s - dt).max(0.0);

        if let Some(b) = &mut self.bleed {
            b.remaining_s -= dt;
            b.carry += b.dps * dt;
            // Whole-point increments only; no sub-visible chip damage.
            let whole = b.carry.floor();
            if whole >= 1.0 {
                b.carry -= whole;
                self.hp = (self.hp - whole as i32).max(0);
            }
            if b.remaining_s <= 0.0 {
                self.bleed = None;
            }
        }

        if let Some(s) = &mut self.stun {
            s.remaining_s -= dt;
            if s.remaining_s <= 0.0 {
                self.speed = s.stored_speed;
                self.stun = None;
            }
        }

        self.contact.stun_s = (self.contact.stun_s - dt).max(0.0);
        self.pos += self.contact.vel * dt;
        self.contact.vel *= (1.0 - 4.0 * dt).max(0.0);
    }

    /// Step directly toward `target` at `speed`.
    pub(crate) fn seek(&mut self, target: Vec2, speed: f32, dt: f32) {
        let to = target - self.pos;
        let dist = to.length();
        if dist > 1e-4 {
            let step = (speed * dt).min(dist);
            self.pos += to / dist * step;
        }
    }

    pub(crate) fn clamp_to_arena(&mut self, w: f32, h: f32) {
        self.pos.x = self.pos.x.clamp(self.radius, (w - self.radius).max(self.radius));
        self.pos.y = self.pos.y.clamp(self.radius, (h - self.radius).max(self.radius));
    }
}

/// Standard body-contact resolution shared by the contact archetypes:
/// knock the player along the contact normal, push the boss out of overlap,
/// start its recoil and self-stun. Returns whether a contact fired.
pub(crate) fn resolve_player_contact(
    body: &mut BossBody,
    base: &BossSpec,
    player: &PlayerView,
    events: &mut Vec<EncounterEvent>,
) -> bool {
    if body.in_contact_stun() || player.immunity_s > 0.0 {
        return false;
    }
    let delta = player.pos - body.pos;
    let reach = body.radius + player.radius;
    let dist_sq = delta.length_squared();
    if dist_sq >= reach * reach {
        return false;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-4 { delta / dist } else { Vec2::X };
    let damage = if player.shield_overcharge { 0 } else { base.contact_damage };
    events.push(EncounterEvent::PlayerBossCollision {
        class: body.class,
        damage,
        knockback: normal * base.knock_force,
    });
    body.pos -= normal * (reach - dist);
    body.contact.vel = -normal * base.recoil_speed;
    body.contact.stun_s = base.self_stun_s;
    true
}

/// Default projectile-vs-body hit: apply damage, roll player on-hit
/// effects, consume the ray.
pub(crate) fn default_projectile_hit(
    body: &mut BossBody,
    status: &StatusTuning,
    player: &PlayerView,
    p: &mut Projectile,
    rng: &mut ChaCha8Rng,
) {
    if body.take_damage(p.damage, status, player.stun_bonus, rng)
        && player.held.contains(&Upgrade::SerratedRays)
    {
        body.apply_bleed(SERRATED_BLEED_DPS, SERRATED_BLEED_S, status.bleed_cap_dps);
    }
    p.deactivate();
}

/// Archetype state. Chaser carries none beyond the shared body.
#[derive(Debug, Clone)]
pub enum BossKind {
    Chaser,
    MirrorShield(mirror_shield::ShieldState),
    GravityWell(gravity_well::WellState),
    NexusWeaver(nexus_weaver::WeaverState),
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub body: BossBody,
    pub kind: BossKind,
}

impl Boss {
    pub fn spawn(
        id: BossId,
        class: BossClass,
        tier: u32,
        pos: Vec2,
        db: &BossSpecDb,
        hp_per_tier: f32,
        spawned_at: f32,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let body = BossBody::new(id, class, tier, pos, class.base(db), hp_per_tier, spawned_at);
        let kind = match class {
            BossClass::Chaser => BossKind::Chaser,
            BossClass::MirrorShield => {
                BossKind::MirrorShield(mirror_shield::ShieldState::new(rng))
            }
            BossClass::GravityWell => {
                BossKind::GravityWell(gravity_well::WellState::new(tier, &db.well))
            }
            BossClass::NexusWeaver => {
                BossKind::NexusWeaver(nexus_weaver::WeaverState::new(tier, &db.weaver))
            }
        };
        Self { body, kind }
    }

    #[inline]
    pub fn defeated(&self) -> bool {
        !self.body.alive()
    }

    pub fn update(&mut self, player: &PlayerView, db: &BossSpecDb, ctx: &mut FrameCtx) {
        self.body.tick_status(ctx.dt);
        match &mut self.kind {
            BossKind::Chaser => chaser::update(&mut self.body, &db.chaser, player, ctx),
            BossKind::MirrorShield(st) => {
                mirror_shield::update(&mut self.body, st, &db.mirror_shield, &db.shield, player, ctx)
            }
            BossKind::GravityWell(st) => {
                gravity_well::update(&mut self.body, st, &db.gravity_well, &db.well, player, ctx)
            }
            BossKind::NexusWeaver(st) => {
                nexus_weaver::update(&mut self.body, st, db, player, ctx)
            }
        }
        self.body.clamp_to_arena(ctx.arena_w, ctx.arena_h);
    }

    /// Route a player ray against this boss. Each archetype gates its own
    /// reach; the mirror shield may reflect or absorb instead of taking
    /// damage, and the weaver also covers its minions.
    pub fn on_projectile(
        &mut self,
        p: &mut Projectile,
        db: &BossSpecDb,
        player: &PlayerView,
        ctx: &mut FrameCtx,
    ) {
        match &mut self.kind {
            BossKind::MirrorShield(st) => {
                mirror_shield::on_projectile(&mut self.body, st, &db.shield, &db.status, player, p, ctx)
            }
            BossKind::NexusWeaver(st) => {
                nexus_weaver::on_projectile(&mut self.body, st, &db.status, player, p, ctx)
            }
            BossKind::Chaser | BossKind::GravityWell(_) => {
                let reach = self.body.radius + p.radius;
                if (p.pos - self.body.pos).length_squared() < reach * reach {
                    default_projectile_hit(&mut self.body, &db.status, player, p, ctx.rng);
                }
            }
        }
    }

    /// Fear is a transient forced-flee status; only the weaver family
    /// honors it.
    pub fn apply_fear(&mut self, duration_s: f32, from: Vec2) {
        if let BossKind::NexusWeaver(st) = &mut self.kind {
            st.apply_fear(duration_s, from);
        }
    }

    /// Externally forced detonation of a charging gravity ray.
    pub fn force_detonate(&mut self, db: &BossSpecDb, ctx: &mut FrameCtx) {
        if let BossKind::GravityWell(st) = &mut self.kind {
            gravity_well::force_detonate(&self.body, st, &db.well, ctx);
        }
    }

    /// One-time teardown on defeat or reset: no detonation, no events.
    pub fn force_teardown(&mut self, projectiles: &mut Vec<Projectile>) {
        match &mut self.kind {
            BossKind::GravityWell(st) => gravity_well::teardown(self.body.id, st, projectiles),
            BossKind::NexusWeaver(st) => st.minions.clear(),
            BossKind::Chaser | BossKind::MirrorShield(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn status() -> StatusTuning {
        StatusTuning::default()
    }

    #[test]
    fn max_health_follows_tier_formula() {
        assert_eq!(max_health(120, 1, 0.5), 120);
        assert_eq!(max_health(120, 2, 0.5), 180);
        assert_eq!(max_health(120, 5, 0.5), 360);
        // Fractional factors floor.
        assert_eq!(max_health(100, 2, 0.33), 133);
    }

    fn body() -> BossBody {
        BossBody::new(
            BossId(1),
            BossClass::Chaser,
            1,
            Vec2::ZERO,
            &BossSpec::default(),
            0.5,
            0.0,
        )
    }

    #[test]
    fn damage_floors_at_zero_and_noops_when_dead() {
        let mut b = body();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(b.take_damage(b.max_hp + 50, &status(), 0.0, &mut rng));
        assert_eq!(b.hp, 0);
        assert!(!b.take_damage(10, &status(), 0.0, &mut rng));
    }

    #[test]
    fn guaranteed_stun_halves_speed_and_restores() {
        let mut b = body();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let base_speed = b.speed;
        // Bonus pushes the roll past certainty.
        assert!(b.take_damage(5, &status(), 1.0, &mut rng));
        assert!(b.stun.is_some());
        assert!((b.speed - base_speed * 0.5).abs() < 1e-3);
        b.tick_status(status().stun_s + 0.01);
        assert!(b.stun.is_none());
        assert!((b.speed - base_speed).abs() < 1e-3);
    }

    #[test]
    fn bleed_stacks_capped_and_keeps_longest_duration() {
        let mut b = body();
        b.apply_bleed(20.0, 4.0, 30.0);
        b.apply_bleed(20.0, 2.0, 30.0);
        let bleed = b.bleed.expect("bleeding");
        assert_eq!(bleed.dps, 30.0);
        assert_eq!(bleed.remaining_s, 4.0);
    }

    #[test]
    fn bleed_applies_whole_points_only() {
        let mut b = body();
        let hp0 = b.hp;
        b.apply_bleed(10.0, 5.0, 30.0);
        // 0.05s at 10 dps is half a point; nothing visible yet.
        b.tick_status(0.05);
        assert_eq!(b.hp, hp0);
        b.tick_status(0.05);
        assert_eq!(b.hp, hp0 - 1);
    }
}
