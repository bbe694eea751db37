use serde::{Deserialize, Serialize};

/// Penalty values for cards left in hand when a round ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PointRules {
    pub face_points: u32,
    pub wild_points: u32,
    pub joker_points: u32,
}

impl Default for PointRules {
    fn default() -> Self {
        Self {
            face_points: 10,
            wild_points: 20,
            joker_points: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// How many initial meld choices the combination search tries, best first.
    pub restart_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { restart_limit: 16 }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    pub points: PointRules,
    pub search: SearchConfig,
}
