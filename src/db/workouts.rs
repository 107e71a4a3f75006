use async_trait::async_trait;
use log::{debug, info};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::repository::{changed_one_row, Repository};
use super::ConnectionProvider;
use crate::errors::PersistenceError;
use crate::models::workout::{NewWorkout, Workout};

#[derive(Clone, Debug)]
pub struct WorkoutRepository {
    provider: ConnectionProvider,
}

impl WorkoutRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// A user's workouts, most recent first.
    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Workout>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let rows = sqlx::query(
            "SELECT workout_id, user_id, type, duration_minutes, calories_burned, workout_date \
             FROM workouts WHERE user_id = $1 ORDER BY workout_date DESC, workout_id DESC",
        )
        .bind(user_id)
        .fetch_all(&mut conn)
        .await?;

        debug!("Loaded {} workouts for user {}", rows.len(), user_id);
        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }
}

#[async_trait]
impl Repository for WorkoutRepository {
    type Entity = Workout;
    type Draft = NewWorkout;

    async fn create(&self, draft: NewWorkout) -> Result<Workout, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "INSERT INTO workouts (user_id, type, duration_minutes, calories_burned, workout_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING workout_id",
        )
        .bind(draft.user_id)
        .bind(&draft.workout_type)
        .bind(draft.duration_minutes)
        .bind(draft.calories_burned)
        .bind(draft.workout_date)
        .fetch_optional(&mut conn)
        .await?
        .ok_or_else(|| PersistenceError::NoRowsAffected("Creating workout failed".to_string()))?;

        let workout = draft.into_workout(row.try_get("workout_id")?);
        info!("Saved workout {} for user {}", workout.workout_id, workout.user_id);
        Ok(workout)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Workout>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "SELECT workout_id, user_id, type, duration_minutes, calories_burned, workout_date \
             FROM workouts WHERE workout_id = $1",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;

        Ok(row.as_ref().map(map_row).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<Workout>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let rows = sqlx::query(
            "SELECT workout_id, user_id, type, duration_minutes, calories_burned, workout_date \
             FROM workouts ORDER BY workout_id",
        )
        .fetch_all(&mut conn)
        .await?;

        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn update(&self, workout: &Workout) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query(
            "UPDATE workouts SET type = $1, duration_minutes = $2, calories_burned = $3, \
             workout_date = $4 WHERE workout_id = $5",
        )
        .bind(&workout.workout_type)
        .bind(workout.duration_minutes)
        .bind(workout.calories_burned)
        .bind(workout.workout_date)
        .bind(workout.workout_id)
        .execute(&mut conn)
        .await?;

        Ok(changed_one_row(result))
    }

    async fn delete(&self, id: i32) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query("DELETE FROM workouts WHERE workout_id = $1")
            .bind(id)
            .execute(&mut conn)
            .await?;

        Ok(changed_one_row(result))
    }
}

fn map_row(row: &PgRow) -> Result<Workout, sqlx::Error> {
    Ok(Workout {
        workout_id: row.try_get("workout_id")?,
        user_id: row.try_get("user_id")?,
        workout_type: row.try_get("type")?,
        duration_minutes: row.try_get("duration_minutes")?,
        calories_burned: row.try_get("calories_burned")?,
        workout_date: row.try_get("workout_date")?,
    })
}
