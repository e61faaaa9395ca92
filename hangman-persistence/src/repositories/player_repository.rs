use anyhow::Result;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, SqlErr};

use crate::entities::{players, prelude::*};
use hangman_types::PlayerStats;

pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_stats(model: players::Model) -> PlayerStats {
        PlayerStats {
            player_name: model.player_name,
            wins: u32::try_from(model.wins).unwrap_or_default(),
            losses: u32::try_from(model.losses).unwrap_or_default(),
        }
    }

    pub async fn find_by_name(&self, player_name: &str) -> Result<Option<PlayerStats>> {
        let model = Players::find_by_id(player_name.to_string())
            .one(&self.db)
            .await?;

        Ok(model.map(Self::model_to_stats))
    }

    /// Insert a 0/0 record. Returns `None` if the name is already taken,
    /// relying on the primary key so concurrent creates cannot both succeed.
    pub async fn create_player(&self, player_name: &str) -> Result<Option<PlayerStats>> {
        let now = chrono::Utc::now().into();

        let player_model = players::ActiveModel {
            player_name: ActiveValue::Set(player_name.to_string()),
            wins: ActiveValue::Set(0),
            losses: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        match Players::insert(player_model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => {}
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }

        let created = self
            .find_by_name(player_name)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created player"))?;

        Ok(Some(created))
    }

    /// Overwrite the counters, creating the record if it does not exist yet
    pub async fn update_player(
        &self,
        player_name: &str,
        wins: u32,
        losses: u32,
    ) -> Result<PlayerStats> {
        let wins = i32::try_from(wins)?;
        let losses = i32::try_from(losses)?;
        let now = chrono::Utc::now().into();

        let existing = Players::find_by_id(player_name.to_string())
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                let mut player: players::ActiveModel = model.into();
                player.wins = ActiveValue::Set(wins);
                player.losses = ActiveValue::Set(losses);
                player.updated_at = ActiveValue::Set(now);
                let saved = player.update(&self.db).await?;
                Ok(Self::model_to_stats(saved))
            }
            None => {
                let player = players::ActiveModel {
                    player_name: ActiveValue::Set(player_name.to_string()),
                    wins: ActiveValue::Set(wins),
                    losses: ActiveValue::Set(losses),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                };
                Players::insert(player)
                    .exec_without_returning(&self.db)
                    .await?;

                self.find_by_name(player_name)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Failed to retrieve updated player"))
            }
        }
    }
}
