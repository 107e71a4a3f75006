//! Connection handling and the repositories built on top of it.
//!
//! There is no pool: every repository call opens its own connection through
//! [`ConnectionProvider::connect`] and drops it before returning.

pub mod activities;
pub mod config;
pub mod progress;
pub mod repository;
pub mod users;
pub mod workouts;

use log::{debug, warn, LevelFilter};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;

use crate::errors::PersistenceError;
pub use config::DbConfig;
pub use repository::Repository;

use activities::ActivityRepository;
use progress::ProgressRepository;
use users::UserRepository;
use workouts::WorkoutRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const SUPPORTED_DRIVERS: [&str; 2] = ["postgres", "postgresql"];

#[derive(Clone, Debug)]
pub struct ConnectionProvider {
    options: PgConnectOptions,
}

impl ConnectionProvider {
    pub fn new(config: &DbConfig) -> Result<Self, PersistenceError> {
        if !SUPPORTED_DRIVERS.contains(&config.driver.to_ascii_lowercase().as_str()) {
            return Err(PersistenceError::Config(format!(
                "Unsupported driver: {}",
                config.driver
            )));
        }

        let mut options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| PersistenceError::Config(e.to_string()))?;
        if let Some(username) = &config.username {
            options = options.username(username);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }
        let options = options.log_statements(LevelFilter::Debug);

        Ok(Self { options })
    }

    /// Opens a fresh connection. It is closed when the caller drops it.
    pub async fn connect(&self) -> Result<PgConnection, PersistenceError> {
        debug!("Opening database connection");
        PgConnection::connect_with(&self.options).await.map_err(|e| {
            warn!("Database connection failed: {}", e);
            PersistenceError::Connection(e.to_string())
        })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), PersistenceError> {
        let mut conn = self.connect().await?;
        MIGRATOR.run(&mut conn).await?;
        Ok(())
    }
}

/// One repository per entity, all sharing the same provider.
#[derive(Clone, Debug)]
pub struct Repositories {
    pub users: UserRepository,
    pub workouts: WorkoutRepository,
    pub progress: ProgressRepository,
    pub activities: ActivityRepository,
}

impl Repositories {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            users: UserRepository::new(provider.clone()),
            workouts: WorkoutRepository::new(provider.clone()),
            progress: ProgressRepository::new(provider.clone()),
            activities: ActivityRepository::new(provider),
        }
    }
}
