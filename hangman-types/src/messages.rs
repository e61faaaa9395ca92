use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GuessOutcome, TerminalOutcome, ViewModel};

/// Query string for `GET /api/player` and the game lookup endpoints.
/// The name is optional so a missing value maps to 400 instead of a rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlayerQuery {
    pub player_name: Option<String>,
}

/// Body carrying only a player name (`POST /api/players`, game start/new round)
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlayerRequest {
    pub player_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdatePlayerRequest {
    pub player_name: Option<String>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GuessRequest {
    pub player_name: Option<String>,
    #[serde(default)]
    pub guess: String,
}

/// Result of a guess. `view` always shows the round the guess was applied to,
/// so a terminal round is rendered once; `next_round` is the fresh round that
/// replaced it when `terminal` is set.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GuessResponse {
    pub outcome: GuessOutcome,
    pub terminal: Option<TerminalOutcome>,
    pub view: ViewModel,
    pub next_round: Option<ViewModel>,
}
