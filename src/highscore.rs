//! High score record
//!
//! The only value that outlives a reset. Serializes as a bare number so a
//! storage collaborator can keep it under a single key.

use serde::{Deserialize, Serialize};

/// Best score seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key used by the persistence collaborator
    pub const STORAGE_KEY: &'static str = "stick-bridge-highscore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a finished run. Returns true only if it strictly beat the record.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        true
    }

    pub fn clear(&mut self) {
        self.best = 0;
    }

    /// Parse a stored value, starting fresh if it is missing or corrupt
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScore>(json.trim()) {
            Ok(score) => {
                log::info!("Loaded high score {}", score.best);
                score
            }
            Err(e) => {
                log::warn!("Discarding stored high score: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        self.best.to_string()
    }
}
