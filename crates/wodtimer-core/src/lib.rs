//! # wodtimer Core Library
//!
//! This library provides the core logic for an interval workout timer:
//! alternating workout and rest countdowns after a short get-ready phase,
//! cycling through a list of exercises. The CLI binary is a thin driver
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Session Engine**: A whole-second state machine that requires the caller
//!   to invoke `tick()` once per second while a session runs
//! - **Exercise Schedule**: Looping exercise list that rotates when a rest ends
//! - **Sound Cues**: Queued by the engine, mapped to sounds by a dispatcher
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core session state machine
//! - [`ExerciseSchedule`]: Exercise rotation
//! - [`SoundDispatcher`]: Cue-to-sound delivery
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod sound;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, SoundError, ValidationError};
pub use events::{Event, SoundCue};
pub use sound::{CueDispatch, CuePlayer, DispatchStatus, SoundDispatcher, SoundSettings};
pub use storage::Config;
pub use timer::{
    Durations, ExerciseSchedule, FeedbackSnapshot, PausedSnapshot, Phase, SessionEngine,
    SessionStats,
};
