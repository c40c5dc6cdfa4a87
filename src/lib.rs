//! Blocktris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name:
//! `blocktris::{types, core, engine}`.

pub use blocktris_core as core;
pub use blocktris_engine as engine;
pub use blocktris_types as types;
