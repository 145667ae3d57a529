//! Boss encounter subsystem for the arena game: wave orchestration, the
//! four boss archetypes, weaver minions, and the kill-record book.
//!
//! Single-threaded and frame-stepped. The frame driver calls
//! [`WaveOrchestrator::try_spawn_boss`] when the score changes and
//! [`WaveOrchestrator::update`] once per frame with a [`FrameCtx`], then
//! drains the event bus and applies the cross-cutting effects.

pub mod boss;
pub mod context;
pub mod events;
pub mod player;
pub mod projectile;
pub mod records;
pub mod wave;

pub use boss::{Boss, BossClass, BossId};
pub use context::{EncounterHooks, FrameCtx, NoopHooks};
pub use events::{EncounterEvent, VfxKind};
pub use player::{PlayerView, Upgrade};
pub use projectile::{Faction, Projectile};
pub use records::{RecordBook, RecordCategory, StatsSnapshot};
pub use wave::WaveOrchestrator;
