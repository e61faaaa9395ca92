use std::sync::Arc;

use async_trait::async_trait;
use hangman_core::{StatsPort, StatsPortError};
use hangman_persistence::repositories::PlayerRepository;
use hangman_types::{PlayerRequest, PlayerStats, UpdatePlayerRequest};
use reqwest::StatusCode;

/// Stats stored directly in the server's own database
pub struct RepositoryStatsPort {
    repository: Arc<PlayerRepository>,
}

impl RepositoryStatsPort {
    pub fn new(repository: Arc<PlayerRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl StatsPort for RepositoryStatsPort {
    async fn fetch_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError> {
        self.repository
            .find_by_name(player_name)
            .await
            .map_err(|err| StatsPortError::Persistence(err.to_string()))?
            .ok_or_else(|| StatsPortError::NotFound(player_name.to_string()))
    }

    async fn create_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError> {
        match self.repository.create_player(player_name).await {
            Ok(Some(stats)) => Ok(stats),
            Ok(None) => Err(StatsPortError::AlreadyExists(player_name.to_string())),
            Err(err) => Err(StatsPortError::Persistence(err.to_string())),
        }
    }

    async fn update_player(
        &self,
        player_name: &str,
        wins: u32,
        losses: u32,
    ) -> Result<PlayerStats, StatsPortError> {
        self.repository
            .update_player(player_name, wins, losses)
            .await
            .map_err(|err| StatsPortError::Persistence(err.to_string()))
    }
}

/// Stats kept by a remote player API speaking the same JSON routes this
/// server exposes under `/api`
pub struct HttpStatsPort {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatsPort {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_stats(
        player_name: &str,
        response: reqwest::Response,
    ) -> Result<PlayerStats, StatsPortError> {
        match response.status() {
            status if status.is_success() => response
                .json::<PlayerStats>()
                .await
                .map_err(|err| StatsPortError::Persistence(err.to_string())),
            StatusCode::NOT_FOUND => Err(StatsPortError::NotFound(player_name.to_string())),
            StatusCode::CONFLICT => Err(StatsPortError::AlreadyExists(player_name.to_string())),
            status => Err(StatsPortError::Persistence(format!(
                "stats API answered {} for {}",
                status, player_name
            ))),
        }
    }
}

fn transport_error(err: reqwest::Error) -> StatsPortError {
    StatsPortError::Persistence(err.to_string())
}

#[async_trait]
impl StatsPort for HttpStatsPort {
    async fn fetch_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError> {
        let response = self
            .client
            .get(self.url("/api/player"))
            .query(&[("playerName", player_name)])
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_stats(player_name, response).await
    }

    async fn create_player(&self, player_name: &str) -> Result<PlayerStats, StatsPortError> {
        let body = PlayerRequest {
            player_name: Some(player_name.to_string()),
        };
        let response = self
            .client
            .post(self.url("/api/players"))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_stats(player_name, response).await
    }

    async fn update_player(
        &self,
        player_name: &str,
        wins: u32,
        losses: u32,
    ) -> Result<PlayerStats, StatsPortError> {
        let body = UpdatePlayerRequest {
            player_name: Some(player_name.to_string()),
            wins,
            losses,
        };
        let response = self
            .client
            .put(self.url("/api/player"))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_stats(player_name, response).await
    }
}
