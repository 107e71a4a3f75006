use std::env;
use std::time::Duration;

use crate::tasks::auto_sync::SyncSchedule;

/// Server settings read from the environment. Database settings live in
/// [`crate::db::DbConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub bind_address: String,
    pub web_user_id: i32,
    pub sync: SyncSchedule,
    pub summary_delay: Duration,
    pub run_migrations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            web_user_id: 101,
            sync: SyncSchedule::default(),
            summary_delay: Duration::from_millis(500),
            run_migrations: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            web_user_id: lookup("FITTRACK_WEB_USER_ID")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.web_user_id),
            sync: SyncSchedule {
                initial_delay: parsed("FITTRACK_SYNC_DELAY_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.sync.initial_delay),
                period: parsed("FITTRACK_SYNC_PERIOD_SECS")
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.sync.period),
            },
            summary_delay: parsed("FITTRACK_SUMMARY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.summary_delay),
            run_migrations: lookup("FITTRACK_MIGRATE")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(defaults.run_migrations),
        }
    }
}
