//! Threaded engine - runs a [`Game`](crate::core::Game) against a background
//! fall scheduler
//!
//! - [`scheduler`]: pausable, reschedulable, cancelable periodic timer thread
//! - [`engine`]: the move lock, command dispatch and notification channel
//! - [`config`]: per-match settings
//! - [`error`]: thread-level failures
//!
//! # Example
//!
//! ```no_run
//! use blocktris_engine::{EngineConfig, GameEngine};
//! use blocktris_types::{Command, GameEvent};
//!
//! let (engine, events) = GameEngine::start(EngineConfig::with_seed(7))?;
//!
//! engine.apply(Command::MoveLeft);
//! engine.apply(Command::HardDrop);
//!
//! for event in events.try_iter() {
//!     if event == GameEvent::Redraw {
//!         let _snapshot = engine.snapshot();
//!     }
//! }
//!
//! engine.quit()?;
//! # Ok::<(), blocktris_engine::EngineError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use config::EngineConfig;
pub use engine::GameEngine;
pub use error::{EngineError, Result};
pub use scheduler::{Scheduler, SchedulerControl, SchedulerState};
