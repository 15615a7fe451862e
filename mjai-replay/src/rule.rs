use serde::{Deserialize, Serialize};

/// Replay parameters that are not carried by the log itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplayRule {
    /// Approximate live-wall size at round start. MJAI logs do not report
    /// the wall, so the last-tile condition is derived from counting draws
    /// down from this value.
    pub initial_wall_tiles: u32,
    /// Whether red fives count as bonus tiles when a log omits `aka_flag`.
    pub default_aka_enabled: bool,
}

impl Default for ReplayRule {
    fn default() -> Self {
        Self::default_tenhou()
    }
}

impl ReplayRule {
    pub fn default_tenhou() -> Self {
        Self {
            initial_wall_tiles: 70,
            default_aka_enabled: true,
        }
    }
}
