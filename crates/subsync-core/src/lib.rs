//! Media/subtitle synchronization engine.
//!
//! Keeps a playback clock aligned with a sorted list of timed subtitles:
//! per-frame highlighting and auto-scroll, bounded single-segment playback
//! and a sentence-repeat loop.

pub mod bindings;
pub mod clock;
pub mod config;
pub mod frame;
pub mod locator;
pub mod lookup;
pub mod loop_controller;
pub mod player;
pub mod policy;
pub mod render;
pub mod scheduler;
pub mod state;
pub mod subtitle;
pub mod tokens;
pub mod trap;

pub use bindings::export_ts_bindings;
pub use clock::{ClockEvent, ManualClock, MediaClock};
pub use config::{EngineConfig, LogLevel, TimingConfig, load_config};
pub use frame::{FrameId, FrameLoop, FrameRequester};
pub use lookup::{Glossary, LookupRecord, LookupTable};
pub use player::{Player, PlayerCommand, PlayerEvent, PlayerSnapshot, PracticeHooks};
pub use policy::{PlaybackPolicy, PolicyPatch};
pub use render::{HighlightRenderer, RenderTarget, RowTable};
pub use scheduler::{FrameScheduler, TickOutcome};
pub use subtitle::{SubtitleId, SubtitleInterval, SubtitleTrack};
pub use tokens::{Token, TokenKind};
