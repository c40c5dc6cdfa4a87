use std::fmt;
use std::io;

/// Failures of the threaded engine.
///
/// Game rules never fail: blocked moves and ignored commands are plain `false`
/// results. Only the fall thread itself can go wrong.
#[derive(Debug)]
pub enum EngineError {
    /// The fall scheduler thread could not be spawned
    Spawn(io::Error),
    /// The fall scheduler thread panicked before it could be joined
    WorkerPanicked,
    /// `join` was called from the scheduler's own thread
    JoinFromWorker,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Spawn(err) => write!(f, "failed to spawn fall scheduler: {err}"),
            EngineError::WorkerPanicked => f.write_str("fall scheduler thread panicked"),
            EngineError::JoinFromWorker => {
                f.write_str("fall scheduler cannot join itself from its own thread")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Spawn(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
