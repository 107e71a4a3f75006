use async_trait::async_trait;
use log::{debug, info};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::repository::{changed_one_row, Repository};
use super::ConnectionProvider;
use crate::errors::PersistenceError;
use crate::models::progress::{NewProgress, Progress};

#[derive(Clone, Debug)]
pub struct ProgressRepository {
    provider: ConnectionProvider,
}

impl ProgressRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// A user's progress rows, most recent day first.
    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Progress>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let rows = sqlx::query(
            "SELECT progress_id, user_id, day, steps, sleep_hours, notes \
             FROM progress WHERE user_id = $1 ORDER BY day DESC, progress_id DESC",
        )
        .bind(user_id)
        .fetch_all(&mut conn)
        .await?;

        debug!("Loaded {} progress rows for user {}", rows.len(), user_id);
        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }
}

#[async_trait]
impl Repository for ProgressRepository {
    type Entity = Progress;
    type Draft = NewProgress;

    async fn create(&self, draft: NewProgress) -> Result<Progress, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "INSERT INTO progress (user_id, day, steps, sleep_hours, notes) \
             VALUES ($1, $2, $3, $4, $5) RETURNING progress_id",
        )
        .bind(draft.user_id)
        .bind(draft.day)
        .bind(draft.steps)
        .bind(draft.sleep_hours)
        .bind(&draft.notes)
        .fetch_optional(&mut conn)
        .await?
        .ok_or_else(|| PersistenceError::NoRowsAffected("Creating progress failed".to_string()))?;

        let progress = draft.into_progress(row.try_get("progress_id")?);
        info!("Saved progress {} for user {}", progress.progress_id, progress.user_id);
        Ok(progress)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Progress>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "SELECT progress_id, user_id, day, steps, sleep_hours, notes \
             FROM progress WHERE progress_id = $1",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;

        Ok(row.as_ref().map(map_row).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<Progress>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let rows = sqlx::query(
            "SELECT progress_id, user_id, day, steps, sleep_hours, notes \
             FROM progress ORDER BY progress_id",
        )
        .fetch_all(&mut conn)
        .await?;

        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn update(&self, progress: &Progress) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query(
            "UPDATE progress SET day = $1, steps = $2, sleep_hours = $3, notes = $4 \
             WHERE progress_id = $5",
        )
        .bind(progress.day)
        .bind(progress.steps)
        .bind(progress.sleep_hours)
        .bind(&progress.notes)
        .bind(progress.progress_id)
        .execute(&mut conn)
        .await?;

        Ok(changed_one_row(result))
    }

    async fn delete(&self, id: i32) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query("DELETE FROM progress WHERE progress_id = $1")
            .bind(id)
            .execute(&mut conn)
            .await?;

        Ok(changed_one_row(result))
    }
}

// A NULL column maps to None, never to the type's zero value.
fn map_row(row: &PgRow) -> Result<Progress, sqlx::Error> {
    Ok(Progress {
        progress_id: row.try_get("progress_id")?,
        user_id: row.try_get("user_id")?,
        day: row.try_get("day")?,
        steps: row.try_get::<Option<i32>, _>("steps")?,
        sleep_hours: row.try_get::<Option<f64>, _>("sleep_hours")?,
        notes: row.try_get::<Option<String>, _>("notes")?,
    })
}
