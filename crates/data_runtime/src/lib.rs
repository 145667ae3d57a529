//! data_runtime: balance schemas and loaders for the encounter subsystem.
//!
//! Keeps gameplay tuning out of code: wave pacing and per-archetype boss
//! parameters live in `data/config/*.toml` and deserialize into the structs
//! here. Every loader falls back to compiled defaults when the file is
//! missing so tests and tools run from any directory.

pub mod configs {
    pub mod bosses;
    pub mod encounter;
}
