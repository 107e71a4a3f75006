use std::env;

use crate::errors::PersistenceError;

/// Where and how to connect. Built once at startup and handed to
/// [`super::ConnectionProvider`].
#[derive(Clone, Debug, PartialEq)]
pub struct DbConfig {
    pub url: String,
    pub driver: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, PersistenceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("FITTRACK_DB_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                PersistenceError::Config("FITTRACK_DB_URL or DATABASE_URL must be set".to_string())
            })?;

        Ok(Self {
            url,
            driver: lookup("FITTRACK_DB_DRIVER").unwrap_or_else(|| "postgres".to_string()),
            username: lookup("FITTRACK_DB_USER").filter(|v| !v.is_empty()),
            password: lookup("FITTRACK_DB_PASSWORD").filter(|v| !v.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn prefers_fittrack_url_over_database_url() {
        let cfg = DbConfig::from_lookup(lookup(&[
            ("FITTRACK_DB_URL", "postgres://a/fit"),
            ("DATABASE_URL", "postgres://b/other"),
        ]))
        .unwrap();
        assert_eq!(cfg.url, "postgres://a/fit");
        assert_eq!(cfg.driver, "postgres");
        assert_eq!(cfg.username, None);
    }

    #[test]
    fn falls_back_to_database_url() {
        let cfg = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://b/other"),
            ("FITTRACK_DB_USER", "root"),
            ("FITTRACK_DB_PASSWORD", ""),
        ]))
        .unwrap();
        assert_eq!(cfg.url, "postgres://b/other");
        assert_eq!(cfg.username.as_deref(), Some("root"));
        assert_eq!(cfg.password, None);
    }

    #[test]
    fn missing_url_is_a_config_error() {
        let err = DbConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, PersistenceError::Config(_)));
    }
}
