//! High score persistence
//!
//! A single best score, saved to a small JSON file next to the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persistent best score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScore {
    pub score: u64,
}

impl HighScore {
    /// Default save location
    pub const DEFAULT_PATH: &'static str = "spider_hunt_highscore.json";

    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Fold in a finished run, returns true if it set a new record
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.score {
            self.score = score;
            true
        } else {
            false
        }
    }

    /// Load from disk, falling back to zero on a missing or corrupt file
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScore>(&json) {
                Ok(hs) => {
                    log::info!("Loaded high score {} from {}", hs.score, path.display());
                    hs
                }
                Err(e) => {
                    log::warn!("Corrupt high score file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No high score file at {}, starting fresh", path.display());
                Self::default()
            }
        }
    }

    /// Save to disk, best-effort
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to save high score to {}: {}", path.display(), e);
                } else {
                    log::info!("High score {} saved to {}", self.score, path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize high score: {}", e),
        }
    }
}
