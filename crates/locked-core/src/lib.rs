//! # Locked Core Library
//!
//! Business logic for the Locked focus timer: a work/rest countdown that
//! credits every whole elapsed minute to a per-mode history, plus the
//! read-only analytics built on that history.
//!
//! ## Architecture
//!
//! - **Session Engine**: A tick-driven state machine. The caller delivers one
//!   `tick()` per elapsed second under the live subscription
//! - **Progress Logger**: Wall-clock minute crediting into `{date: bucket}`
//!   ledgers, persisted through a key-value store
//! - **Driver**: A single-task tokio loop that owns the engine and turns
//!   intervals and operator commands into engine calls
//! - **Storage**: SQLite key-value store and TOML configuration
//! - **Stats**: Period totals, week heatmap and duration formatting
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core timer state machine
//! - [`ProgressLogger`]: Minute crediting and persistence
//! - [`Database`]: History and preference persistence
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod driver;
pub mod error;
pub mod events;
pub mod history;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{Command, Output, RuntimeClock};
pub use error::{ConfigError, CoreError, DurationError, Result, StorageError, TransitionError};
pub use events::Event;
pub use history::{Granularity, History, KvStore, MemoryStore, ProgressLogger};
pub use stats::{HeatmapRow, StatsReport};
pub use storage::{Config, Database, Theme};
pub use timer::{CompletionAction, EngineConfig, Mode, RunState, SessionEngine};
