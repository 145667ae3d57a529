//! Read-only view of the player fields the encounter subsystem consumes.

use glam::Vec2;
use std::collections::HashSet;

/// Closed set of loot upgrades the wave orchestrator can offer. Eligibility
/// filtering only needs identity, so the encounter core carries no effect
/// logic for these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upgrade {
    PiercingRounds,
    TwinRay,
    Lifesteal,
    BulwarkPlating,
    RamOvercharge,
    SwiftTreads,
    StunRounds,
    SerratedRays,
}

impl Upgrade {
    pub const ALL: [Upgrade; 8] = [
        Upgrade::PiercingRounds,
        Upgrade::TwinRay,
        Upgrade::Lifesteal,
        Upgrade::BulwarkPlating,
        Upgrade::RamOvercharge,
        Upgrade::SwiftTreads,
        Upgrade::StunRounds,
        Upgrade::SerratedRays,
    ];
}

/// Per-frame snapshot of the player. Built by the frame driver; the
/// encounter core never mutates the player directly, it raises events.
#[derive(Debug, Clone)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining damage-immunity window; contact signals are suppressed
    /// while positive.
    pub immunity_s: f32,
    /// Shield overcharge absorbs contact damage but not knockback.
    pub shield_overcharge: bool,
    /// Added on top of the base hit-stun chance when the player lands a hit.
    pub stun_bonus: f32,
    /// Bulwark plating changes how the gravity well resolves body contact.
    pub has_bulwark: bool,
    pub ram_cooldown_s: f32,
    /// Upgrades the player already holds; excluded from loot rolls.
    pub held: HashSet<Upgrade>,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            radius: 14.0,
            immunity_s: 0.0,
            shield_overcharge: false,
            stun_bonus: 0.0,
            has_bulwark: false,
            ram_cooldown_s: 0.0,
            held: HashSet::new(),
        }
    }
}
