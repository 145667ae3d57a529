//! Per-archetype boss and minion parameters.
//!
//! Parses `data/config/bosses.toml` into a spec database used to seed boss
//! state on spawn. Keep this crate free of simulation types; the encounter
//! crate converts these into live state as needed.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Fields every boss archetype shares.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BossSpec {
    pub base_hp: i32,
    pub speed: f32,
    pub radius: f32,
    pub contact_damage: i32,
    /// Knockback force applied to the player on contact.
    pub knock_force: f32,
    /// Initial recoil speed the boss takes away from the contact.
    pub recoil_speed: f32,
    /// Self-stun after a contact, during which the same contact cannot
    /// re-trigger.
    pub self_stun_s: f32,
}

impl Default for BossSpec {
    fn default() -> Self {
        Self {
            base_hp: 120,
            speed: 140.0,
            radius: 26.0,
            contact_damage: 10,
            knock_force: 420.0,
            recoil_speed: 260.0,
            self_stun_s: 0.45,
        }
    }
}

/// Tuning for the shared status-effect machinery (hit-stun, flash, bleed).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatusTuning {
    /// Base probability a qualifying hit stuns; the player's stun bonus is
    /// added on top.
    pub stun_base_chance: f32,
    pub stun_s: f32,
    /// Speed multiplier while hit-stunned.
    pub stun_slow_factor: f32,
    pub hit_flash_s: f32,
    /// Bleed damage-per-second stacks additively up to this cap.
    pub bleed_cap_dps: f32,
}

impl Default for StatusTuning {
    fn default() -> Self {
        Self {
            stun_base_chance: 0.15,
            stun_s: 0.7,
            stun_slow_factor: 0.5,
            hit_flash_s: 0.12,
            bleed_cap_dps: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MirrorShieldSpec {
    /// Angular width of the shield arc in radians.
    pub arc_width_rad: f32,
    /// Max angular velocity while tracking the player.
    pub turn_rate_rad_s: f32,
    /// Hits inside the arc beyond this fraction of the body radius strike
    /// the shield rather than the body.
    pub shield_min_frac: f32,
    pub reflect_speed: f32,
    pub reflect_life_s: f32,
    /// The body drifts on a random heading re-rolled at this cadence.
    pub drift_retarget_s: f32,
}

impl Default for MirrorShieldSpec {
    fn default() -> Self {
        Self {
            arc_width_rad: 1.9,
            turn_rate_rad_s: 2.2,
            shield_min_frac: 0.8,
            reflect_speed: 380.0,
            reflect_life_s: 2.0,
            drift_retarget_s: 2.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GravityWellSpec {
    /// Cooldown between gravity-ray launches at tier 1; each further tier
    /// multiplies by `cooldown_tier_scale` down to `cooldown_min_s`.
    pub spawn_cooldown_s: f32,
    pub cooldown_tier_scale: f32,
    pub cooldown_min_s: f32,
    /// Fixed back-away duration before launching.
    pub initiate_s: f32,
    pub backoff_speed: f32,
    pub ray_speed: f32,
    pub ray_life_s: f32,
    pub ray_radius: f32,
    pub pull_radius: f32,
    pub pull_accel: f32,
    pub orbit_radius_min: f32,
    pub orbit_radius_max: f32,
    /// Captured rays spin up over the ray's remaining life, fastest inside
    /// this final window.
    pub final_spin_s: f32,
    /// Fresh hostile rays spawned per captured ray on detonation.
    pub rays_per_captured: u32,
    pub scatter_speed: f32,
    pub scatter_life_s: f32,
    pub scatter_damage: i32,
    pub area_damage_per_captured: i32,
}

impl Default for GravityWellSpec {
    fn default() -> Self {
        Self {
            spawn_cooldown_s: 7.0,
            cooldown_tier_scale: 0.9,
            cooldown_min_s: 3.0,
            initiate_s: 0.9,
            backoff_speed: 120.0,
            ray_speed: 60.0,
            ray_life_s: 9.0,
            ray_radius: 16.0,
            pull_radius: 170.0,
            pull_accel: 240.0,
            orbit_radius_min: 24.0,
            orbit_radius_max: 60.0,
            final_spin_s: 2.0,
            rays_per_captured: 2,
            scatter_speed: 320.0,
            scatter_life_s: 2.5,
            scatter_damage: 8,
            area_damage_per_captured: 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PulseNovaSpec {
    pub min_tier: u32,
    pub duration_s: f32,
    pub max_radius: f32,
    /// Width of the damaging band at the ring's leading edge.
    pub band: f32,
    /// Range the player must hold within, and for how long, to force a nova.
    pub proximity: f32,
    pub sustain_s: f32,
    /// Per-reference-frame trigger probability, scaled by tier and by
    /// dt/16.67ms. Note the trigger rate tracks frame rate.
    pub chance_per_frame: f32,
    pub damage: i32,
}

impl Default for PulseNovaSpec {
    fn default() -> Self {
        Self {
            min_tier: 3,
            duration_s: 1.6,
            max_radius: 260.0,
            band: 26.0,
            proximity: 150.0,
            sustain_s: 2.5,
            chance_per_frame: 0.002,
            damage: 14,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NexusWeaverSpec {
    /// Telegraph delay between announcing a minion wave and spawning it.
    pub telegraph_s: f32,
    /// Seconds between minion waves at tier 1, shrinking per tier.
    pub spawn_interval_s: f32,
    pub interval_tier_step: f32,
    pub interval_min_s: f32,
    /// Spawn offsets are drawn within this distance of the body.
    pub spawn_scatter: f32,
    pub drone_base: u32,
    pub drone_per_tier: f32,
    pub lancer_base: u32,
    pub lancer_per_tier: f32,
    pub lancer_min_tier: u32,
    pub orbiter_base: u32,
    pub orbiter_per_tier: f32,
    pub orbiter_min_tier: u32,
    pub nova: PulseNovaSpec,
}

impl Default for NexusWeaverSpec {
    fn default() -> Self {
        Self {
            telegraph_s: 1.1,
            spawn_interval_s: 6.5,
            interval_tier_step: 0.4,
            interval_min_s: 3.5,
            spawn_scatter: 80.0,
            drone_base: 2,
            drone_per_tier: 0.8,
            lancer_base: 1,
            lancer_per_tier: 0.5,
            lancer_min_tier: 2,
            orbiter_base: 1,
            orbiter_per_tier: 0.4,
            orbiter_min_tier: 3,
            nova: PulseNovaSpec::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DroneSpec {
    pub hp: i32,
    pub speed: f32,
    pub radius: f32,
    pub contact_damage: i32,
}

impl Default for DroneSpec {
    fn default() -> Self {
        Self { hp: 8, speed: 170.0, radius: 10.0, contact_damage: 6 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LancerSpec {
    pub hp: i32,
    pub radius: f32,
    pub roam_speed: f32,
    /// Fixed aiming duration; the lancer tracks the player slowly, then
    /// commits to the last aimed heading.
    pub aim_s: f32,
    pub aim_turn_rate_rad_s: f32,
    pub dash_speed: f32,
    pub dash_s: f32,
    pub cooldown_s: f32,
    pub contact_damage: i32,
}

impl Default for LancerSpec {
    fn default() -> Self {
        Self {
            hp: 14,
            radius: 12.0,
            roam_speed: 120.0,
            aim_s: 0.8,
            aim_turn_rate_rad_s: 1.4,
            dash_speed: 520.0,
            dash_s: 0.55,
            cooldown_s: 1.2,
            contact_damage: 9,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrbiterSpec {
    pub hp: i32,
    pub radius: f32,
    pub orbit_radius: f32,
    pub angular_vel_rad_s: f32,
    /// Shot cooldown at tier 1, shrinking per tier.
    pub fire_cooldown_s: f32,
    pub cooldown_tier_step: f32,
    pub cooldown_min_s: f32,
    pub shot_speed: f32,
    pub shot_damage: i32,
    pub shot_life_s: f32,
    pub contact_damage: i32,
}

impl Default for OrbiterSpec {
    fn default() -> Self {
        Self {
            hp: 10,
            radius: 11.0,
            orbit_radius: 90.0,
            angular_vel_rad_s: 1.6,
            fire_cooldown_s: 2.4,
            cooldown_tier_step: 0.2,
            cooldown_min_s: 1.2,
            shot_speed: 260.0,
            shot_damage: 7,
            shot_life_s: 3.0,
            contact_damage: 6,
        }
    }
}

/// Spec database for all boss and minion archetypes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BossSpecDb {
    pub status: StatusTuning,
    pub chaser: BossSpec,
    pub mirror_shield: BossSpec,
    pub shield: MirrorShieldSpec,
    pub gravity_well: BossSpec,
    pub well: GravityWellSpec,
    pub nexus_weaver: BossSpec,
    pub weaver: NexusWeaverSpec,
    pub drone: DroneSpec,
    pub lancer: LancerSpec,
    pub orbiter: OrbiterSpec,
}

impl Default for BossSpecDb {
    fn default() -> Self {
        Self {
            status: StatusTuning::default(),
            chaser: BossSpec::default(),
            mirror_shield: BossSpec {
                base_hp: 150,
                speed: 90.0,
                radius: 30.0,
                contact_damage: 8,
                knock_force: 300.0,
                recoil_speed: 200.0,
                self_stun_s: 0.3,
            },
            shield: MirrorShieldSpec::default(),
            gravity_well: BossSpec {
                base_hp: 200,
                speed: 70.0,
                radius: 34.0,
                contact_damage: 12,
                knock_force: 380.0,
                recoil_speed: 220.0,
                self_stun_s: 0.5,
            },
            well: GravityWellSpec::default(),
            nexus_weaver: BossSpec {
                base_hp: 240,
                speed: 80.0,
                radius: 36.0,
                contact_damage: 10,
                knock_force: 340.0,
                recoil_speed: 200.0,
                self_stun_s: 0.4,
            },
            weaver: NexusWeaverSpec::default(),
            drone: DroneSpec::default(),
            lancer: LancerSpec::default(),
            orbiter: OrbiterSpec::default(),
        }
    }
}

fn data_root() -> PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

impl BossSpecDb {
    /// Load `data/config/bosses.toml`, or compiled defaults when absent.
    pub fn load_default() -> Result<Self> {
        let path = data_root().join("config/bosses.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let db: Self = toml::from_str(&txt).context("parse bosses.toml")?;
            Ok(db)
        } else {
            Ok(Self::default())
        }
    }
}
