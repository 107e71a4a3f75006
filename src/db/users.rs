use async_trait::async_trait;
use log::{debug, info};
use sqlx::postgres::PgRow;
use sqlx::Row;

use super::repository::{changed_one_row, Repository};
use super::ConnectionProvider;
use crate::errors::PersistenceError;
use crate::models::user::{NewUser, User};

#[derive(Clone, Debug)]
pub struct UserRepository {
    provider: ConnectionProvider,
}

impl UserRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "SELECT id, name, email, age, height_cm, weight_kg, membership_type, created_at \
             FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&mut conn)
        .await?;

        Ok(row.as_ref().map(map_row).transpose()?)
    }
}

#[async_trait]
impl Repository for UserRepository {
    type Entity = User;
    type Draft = NewUser;

    async fn create(&self, draft: NewUser) -> Result<User, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "INSERT INTO users (name, email, age, height_cm, weight_kg, membership_type) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at",
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(draft.age)
        .bind(draft.height_cm)
        .bind(draft.weight_kg)
        .bind(&draft.membership_type)
        .fetch_optional(&mut conn)
        .await?
        .ok_or_else(|| PersistenceError::NoRowsAffected("Creating user failed".to_string()))?;

        let user = User {
            id: row.try_get("id")?,
            name: draft.name,
            email: draft.email,
            age: draft.age,
            height_cm: draft.height_cm,
            weight_kg: draft.weight_kg,
            membership_type: draft.membership_type,
            created_at: row.try_get("created_at")?,
        };
        info!("Created user {} ({})", user.id, user.email);
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let row = sqlx::query(
            "SELECT id, name, email, age, height_cm, weight_kg, membership_type, created_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;

        Ok(row.as_ref().map(map_row).transpose()?)
    }

    async fn find_all(&self) -> Result<Vec<User>, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let rows = sqlx::query(
            "SELECT id, name, email, age, height_cm, weight_kg, membership_type, created_at \
             FROM users ORDER BY id",
        )
        .fetch_all(&mut conn)
        .await?;

        debug!("Loaded {} users", rows.len());
        Ok(rows.iter().map(map_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn update(&self, user: &User) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query(
            "UPDATE users SET name = $1, email = $2, age = $3, height_cm = $4, weight_kg = $5, \
             membership_type = $6 WHERE id = $7",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .bind(user.height_cm)
        .bind(user.weight_kg)
        .bind(&user.membership_type)
        .bind(user.id)
        .execute(&mut conn)
        .await?;

        Ok(changed_one_row(result))
    }

    async fn delete(&self, id: i32) -> Result<bool, PersistenceError> {
        let mut conn = self.provider.connect().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut conn)
            .await?;

        Ok(changed_one_row(result))
    }
}

fn map_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        age: row.try_get::<Option<i32>, _>("age")?,
        height_cm: row.try_get::<Option<f64>, _>("height_cm")?,
        weight_kg: row.try_get::<Option<f64>, _>("weight_kg")?,
        membership_type: row.try_get::<Option<String>, _>("membership_type")?,
        created_at: row.try_get("created_at")?,
    })
}
