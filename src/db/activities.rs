//! Legacy activity log.
//!
//! The `activities` table stores the computed calories but not the distance.
//! Rows therefore load with `distance_km == 0.0`, and `calories()` on a loaded
//! activity reads as zero. Updating a loaded activity writes that zero back.

use async_trait::async_trait;
use log::{debug, info};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::repository::{changed_one_row, Repository};
use super::ConnectionProvider;
use crate::errors::PersistenceError;
use crate::models::activity::{ActivityKind, FitnessActivity, NewActivity};

#[derive(Clone, Debug)]
pub struct ActivityRepository {
    provider: ConnectionProvider,
}

impl ActivityRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<FitnessActivity>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let rows = sqlx::query(
            "SELECT id, user_id, type, duration, date_logged FROM activities \
             WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&mut conn)
        .await?;

        debug!("Loaded {} activities for user {}", rows.len(), user_id);
        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }
}

#[async_trait]
impl Repository for ActivityRepository {
    type Entity = FitnessActivity;
    type Draft = NewActivity;

    async fn create(&self, draft: NewActivity) -> Result<FitnessActivity, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "INSERT INTO activities (user_id, type, duration, calories, date_logged) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(draft.user_id)
        .bind(draft.kind.tag())
        .bind(draft.duration_minutes)
        .bind(draft.calories())
        .bind(draft.date)
        .fetch_optional(&mut conn)
        .await?
        .ok_or_else(|| PersistenceError::NoRowsAffected("Saving activity failed".to_string()))?;

        let activity = draft.into_activity(row.try_get("id")?);
        info!(
            "Saved {} activity {} for user {} ({} kcal)",
            activity.kind,
            activity.id,
            activity.user_id,
            activity.calories()
        );
        Ok(activity)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<FitnessActivity>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "SELECT id, user_id, type, duration, date_logged FROM activities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;

        Ok(row.as_ref().map(map_row).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<FitnessActivity>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let rows = sqlx::query(
            "SELECT id, user_id, type, duration, date_logged FROM activities ORDER BY id",
        )
        .fetch_all(&mut conn)
        .await?;

        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn update(&self, activity: &FitnessActivity) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query(
            "UPDATE activities SET user_id = $1, type = $2, duration = $3, calories = $4, \
             date_logged = $5 WHERE id = $6",
        )
        .bind(activity.user_id)
        .bind(activity.kind.tag())
        .bind(activity.duration_minutes)
        .bind(activity.calories())
        .bind(activity.date)
        .bind(activity.id)
        .execute(&mut conn)
        .await?;

        Ok(changed_one_row(result))
    }

    async fn delete(&self, id: i32) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&mut conn)
            .await?;

        Ok(changed_one_row(result))
    }
}

fn map_row(row: &PgRow) -> Result<FitnessActivity, sqlx::Error> {
    let tag: String = row.try_get("type")?;
    Ok(FitnessActivity {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: ActivityKind::from_tag(&tag),
        duration_minutes: row.try_get("duration")?,
        distance_km: 0.0,
        date: row.try_get("date_logged")?,
    })
}
