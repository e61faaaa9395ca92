use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Cumulative record for one player. Names are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlayerStats {
    pub player_name: String,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerStats {
    /// A fresh record with no games played
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            wins: 0,
            losses: 0,
        }
    }

    pub fn games_played(&self) -> u64 {
        u64::from(self.wins) + u64::from(self.losses)
    }
}
