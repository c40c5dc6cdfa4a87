use std::time::{SystemTime, UNIX_EPOCH};

/// Engine settings.
///
/// Board size, fall speed and scoring are fixed game constants; only the
/// piece bag seed varies between matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub seed: u32,
}

impl EngineConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    /// Read `TETRIS_SEED`, falling back to a clock-derived seed
    pub fn from_env() -> Self {
        std::env::var("TETRIS_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .map(Self::with_seed)
            .unwrap_or_default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(1);
        Self { seed }
    }
}
