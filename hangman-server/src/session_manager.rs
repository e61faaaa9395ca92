use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hangman_core::{
    GameConfig, GameSession, HangmanError, LoggingEventHandler, StatsPort, StatsTracker,
    normalize_player_name,
};
use hangman_types::{GuessResponse, ViewModel};
use tokio::sync::RwLock;
use tracing::info;

struct ActiveSession {
    session: GameSession,
    last_activity: Instant,
}

impl ActiveSession {
    fn new(session: GameSession) -> Self {
        Self {
            session,
            last_activity: Instant::now(),
        }
    }

    fn update_activity(&mut self) {
        self.last_activity = Instant::now();
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Game sessions for logged-in players, keyed by lowercased name
pub struct SessionManager {
    sessions: RwLock<HashMap<String, ActiveSession>>,
    config: GameConfig,
    stats_port: Arc<dyn StatsPort>,
}

impl SessionManager {
    pub fn new(config: GameConfig, stats_port: Arc<dyn StatsPort>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
            stats_port,
        }
    }

    /// Log the player in and return their game. An existing session is
    /// resumed as is.
    pub async fn start_session(&self, raw_name: &str) -> Result<ViewModel, HangmanError> {
        let player_name = normalize_player_name(raw_name)?;

        if let Some(active) = self.sessions.write().await.get_mut(&player_name) {
            active.update_activity();
            return Ok(active.session.view());
        }

        // Stats lookup happens without holding the lock
        let tracker = StatsTracker::login(&player_name, self.stats_port.clone()).await?;
        let mut session = GameSession::new(self.config.clone(), tracker)?;
        session.add_event_handler(Box::new(LoggingEventHandler::new()));

        let mut sessions = self.sessions.write().await;
        let view = {
            let active = sessions
                .entry(player_name.clone())
                .or_insert_with(|| ActiveSession::new(session));
            active.update_activity();
            active.session.view()
        };

        info!("Started session for {} ({} active)", player_name, sessions.len());
        Ok(view)
    }

    pub async fn view(&self, raw_name: &str) -> Option<ViewModel> {
        let player_name = normalize_player_name(raw_name).ok()?;
        let sessions = self.sessions.read().await;
        sessions.get(&player_name).map(|active| active.session.view())
    }

    /// Apply a guess. When it ends the round the next round is started right
    /// away; the response still carries the finished round in `view`.
    pub async fn submit_guess(&self, raw_name: &str, guess: &str) -> Option<GuessResponse> {
        let player_name = normalize_player_name(raw_name).ok()?;
        let mut sessions = self.sessions.write().await;
        let active = sessions.get_mut(&player_name)?;
        active.update_activity();

        let update = active.session.submit_guess(guess);
        let next_round = update.terminal.map(|_| active.session.new_round());

        Some(GuessResponse {
            outcome: update.outcome,
            terminal: update.terminal,
            view: update.view,
            next_round,
        })
    }

    pub async fn new_round(&self, raw_name: &str) -> Option<ViewModel> {
        let player_name = normalize_player_name(raw_name).ok()?;
        let mut sessions = self.sessions.write().await;
        let active = sessions.get_mut(&player_name)?;
        active.update_activity();
        Some(active.session.new_round())
    }

    /// Log out. Returns false if there was no session.
    pub async fn end_session(&self, raw_name: &str) -> bool {
        let Ok(player_name) = normalize_player_name(raw_name) else {
            return false;
        };
        let removed = self.sessions.write().await.remove(&player_name).is_some();
        if removed {
            info!("Ended session for {}", player_name);
        }
        removed
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than `timeout`, returning how many went
    pub async fn cleanup_idle_sessions(&self, timeout: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, active| !active.is_expired(timeout));

        let removed = before - sessions.len();
        if removed > 0 {
            info!("Cleaned up {} idle sessions", removed);
        }
        removed
    }
}
