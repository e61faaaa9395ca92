use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hangman_types::{PlayerStats, TerminalOutcome};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::HangmanError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsPortError {
    #[error("Player not found: {0}")]
    NotFound(String),

    #[error("Player already exists: {0}")]
    AlreadyExists(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Storage boundary for per-player win/loss counters.
/// Names passed in are already lowercased.
#[async_trait]
pub trait StatsPort: Send + Sync {
    async fn fetch_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError>;

    /// Create a 0/0 record. Reports [`StatsPortError::AlreadyExists`] if the
    /// name is taken, including when another caller created it first.
    async fn create_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError>;

    /// Overwrite the stored counters and return the stored record
    async fn update_player(
        &self,
        player_name: &str,
        wins: u32,
        losses: u32,
    ) -> Result<PlayerStats, StatsPortError>;
}

/// Trim and lowercase a player name, rejecting blanks
pub fn normalize_player_name(raw: &str) -> Result<String, HangmanError> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(HangmanError::InvalidPlayerName(raw.to_string()));
    }
    Ok(name)
}

/// `stats` with exactly one counter bumped for `outcome`
pub fn record_outcome(stats: &PlayerStats, outcome: TerminalOutcome) -> PlayerStats {
    let mut updated = stats.clone();
    match outcome {
        TerminalOutcome::Won => updated.wins += 1,
        TerminalOutcome::Lost => updated.losses += 1,
    }
    updated
}

/// Wins as a percentage of games played, one decimal place. 0.0 with no games.
pub fn win_percentage(stats: &PlayerStats) -> f64 {
    let played = stats.games_played();
    if played == 0 {
        return 0.0;
    }
    let percent = f64::from(stats.wins) / played as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

/// Stats for the logged-in player plus the port they sync to
pub struct StatsTracker {
    stats: PlayerStats,
    port: Arc<dyn StatsPort>,
    /// Bumped on every recorded outcome
    generation: u64,
    /// Generation of the newest counters the port has accepted. Held across
    /// the write so syncs from one tracker never overlap.
    synced: Arc<Mutex<Option<u64>>>,
}

impl StatsTracker {
    pub fn new(stats: PlayerStats, port: Arc<dyn StatsPort>) -> Self {
        Self {
            stats,
            port,
            generation: 0,
            synced: Arc::new(Mutex::new(None)),
        }
    }

    /// Look the player up, creating them on first login. A creation race with
    /// another session resolves to whichever record was stored first.
    pub async fn login(raw_name: &str, port: Arc<dyn StatsPort>) -> Result<Self, HangmanError> {
        let player_name = normalize_player_name(raw_name)?;

        let stats = match port.fetch_player(&player_name).await {
            Ok(stats) => stats,
            Err(StatsPortError::NotFound(_)) => match port.create_player(&player_name).await {
                Ok(stats) => {
                    info!("Created new player {}", player_name);
                    stats
                }
                Err(StatsPortError::AlreadyExists(_)) => port.fetch_player(&player_name).await?,
                Err(err) => return Err(err.into()),
            },
            Err(err) => return Err(err.into()),
        };

        info!(
            "Player {} logged in ({} wins, {} losses)",
            stats.player_name, stats.wins, stats.losses
        );
        Ok(Self::new(stats, port))
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn player_name(&self) -> &str {
        &self.stats.player_name
    }

    pub fn win_percentage(&self) -> f64 {
        win_percentage(&self.stats)
    }

    /// Count one finished round. Callers gate this on the one-shot terminal
    /// signal from [`crate::apply_guess`].
    pub fn record_outcome(&mut self, outcome: TerminalOutcome) -> PlayerStats {
        self.stats = record_outcome(&self.stats, outcome);
        self.generation += 1;
        self.stats.clone()
    }

    /// Push the current counters to the port on a background task.
    ///
    /// Never blocks and never fails: errors are logged and dropped. Returns
    /// `None` when called outside a tokio runtime, in which case nothing is
    /// sent. Syncs run one at a time and a sync that finds newer counters
    /// already stored is skipped, so the store never moves backwards.
    pub fn publish(&self) -> Option<JoinHandle<()>> {
        let sync = self.pending_sync();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(sync.run())),
            Err(_) => {
                warn!(
                    "No async runtime available, skipping stats sync for {}",
                    sync.stats.player_name
                );
                None
            }
        }
    }

    /// Same best-effort sync as [`Self::publish`], awaited in place
    pub async fn publish_and_wait(&self) {
        self.pending_sync().run().await;
    }

    fn pending_sync(&self) -> StatsSync {
        StatsSync {
            port: self.port.clone(),
            stats: self.stats.clone(),
            generation: self.generation,
            synced: self.synced.clone(),
        }
    }
}

/// One snapshot of a tracker's counters on its way to the port
struct StatsSync {
    port: Arc<dyn StatsPort>,
    stats: PlayerStats,
    generation: u64,
    synced: Arc<Mutex<Option<u64>>>,
}

impl StatsSync {
    async fn run(self) {
        let mut synced = self.synced.lock().await;
        if matches!(*synced, Some(newest) if newest >= self.generation) {
            debug!(
                "Skipping superseded stats sync for {}",
                self.stats.player_name
            );
            return;
        }

        let stats = &self.stats;
        match self
            .port
            .update_player(&stats.player_name, stats.wins, stats.losses)
            .await
        {
            Ok(stored) => {
                *synced = Some(self.generation);
                debug!(
                    "Synced stats for {}: {} wins, {} losses",
                    stored.player_name, stored.wins, stored.losses
                );
            }
            Err(err) => warn!("Failed to sync stats for {}: {}", stats.player_name, err),
        }
    }
}

/// Process-local [`StatsPort`], used for offline play and tests
#[derive(Debug, Default)]
pub struct InMemoryStatsPort {
    players: RwLock<HashMap<String, PlayerStats>>,
}

impl InMemoryStatsPort {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsPort for InMemoryStatsPort {
    async fn fetch_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError> {
        let players = self.players.read().await;
        players
            .get(player_name)
            .cloned()
            .ok_or_else(|| StatsPortError::NotFound(player_name.to_string()))
    }

    async fn create_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError> {
        let mut players = self.players.write().await;
        if players.contains_key(player_name) {
            return Err(StatsPortError::AlreadyExists(player_name.to_string()));
        }
        let stats = PlayerStats::new(player_name);
        players.insert(player_name.to_string(), stats.clone());
        Ok(stats)
    }

    async fn update_player(
        &self,
        player_name: &str,
        wins: u32,
        losses: u32,
    ) -> Result<PlayerStats, StatsPortError> {
        let mut players = self.players.write().await;
        let stats = PlayerStats {
            player_name: player_name.to_string(),
            wins,
            losses,
        };
        players.insert(player_name.to_string(), stats.clone());
        Ok(stats)
    }
}
