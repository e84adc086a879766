//! Configuration loading for the synchronization engine.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Missing or invalid entries fall back to
//! defaults so playback can still start.

pub(crate) mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{EngineConfig, LogLevel, TimingConfig};
