//! Cross-cutting signals raised while the encounter subsystem updates.
//!
//! Bosses and the orchestrator push into the frame's event bus; the frame
//! driver drains it after every boss has updated and applies the effects
//! (player damage, score, loot UI, camera shake). Contact events are rare
//! and idempotent per frame, so last-write-wins resolution is acceptable.

use glam::Vec2;

use crate::boss::BossClass;
use crate::player::Upgrade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfxKind {
    SpawnFlash,
    Telegraph,
    NovaRing,
    DetonationBurst,
    ShieldSpark,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EncounterEvent {
    /// Announcement cue for the first queued boss of a wave.
    BossAnnounced {
        class: BossClass,
        name: &'static str,
        tier: u32,
    },
    /// Body contact between a boss and the player.
    PlayerBossCollision {
        class: BossClass,
        damage: i32,
        knockback: Vec2,
    },
    /// Body contact between a minion and the player.
    PlayerMinionCollision { damage: i32, knockback: Vec2 },
    /// A boss attack (nova ring band) connected with the player.
    BossAttackHit { damage: i32, pos: Vec2 },
    /// Gravity well contact resolved as a player ram exchange instead of
    /// standard contact damage.
    RamCollision { class: BossClass, pos: Vec2 },
    /// Gravity detonation area effect; radius and damage scale with the
    /// number of captured rays.
    Detonation { pos: Vec2, radius: f32, damage: i32 },
    ScoreAwarded { amount: u32 },
    /// One-time special reward for the first boss wave ever cleared.
    FirstBossLoot,
    /// Up to three upgrade choices drawn without replacement from the
    /// eligibility-filtered pool.
    LootChoices { options: Vec<Upgrade> },
    /// Ask the outer game to consider an evolution offer. `loot_denied` is
    /// true when no loot was generated for the completed wave.
    EvolutionCheck { loot_denied: bool },
    ScreenShake { magnitude: f32, duration_s: f32 },
    Vfx { kind: VfxKind, pos: Vec2, radius: f32 },
}
