use crowns_core::{Card, Rank};
use serde::{Deserialize, Serialize};

pub use crowns_core::{PointRules, RulesConfig, SearchConfig};

/// On-disk shape of a saved hand: cards are written as tokens (`7H`, `JK`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandFile {
    pub round: u32,
    pub hand: Vec<String>,
    #[serde(default)]
    pub melds: Vec<Vec<String>>,
}

/// A hand file after its tokens and round have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedHand {
    pub round: u32,
    pub wild: Rank,
    pub hand: Vec<Card>,
    pub melds: Vec<Vec<Card>>,
}
