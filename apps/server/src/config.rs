// [apps/server/src/config.rs]
use std::env;

use anyhow::{Context, Result};

/// Startup configuration read once from the environment. Fails fast if a
/// required value is missing or malformed rather than limping along with a
/// guessed default for anything security-relevant.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub turso_auth_token: Option<String>,
    pub session_signing_secret: String,
    pub session_token_ttl_seconds: i64,
    pub cors_allowed_origin: Option<String>,
    pub port: u16,
    pub presence_ttl_seconds: i64,
    pub presence_heartbeat_seconds: i64,
    pub focus_throttle_millis: i64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let turso_auth_token = env::var("TURSO_AUTH_TOKEN").ok().and_then(non_empty);

        let session_signing_secret =
            env::var("SESSION_SIGNING_SECRET").context("SESSION_SIGNING_SECRET must be set")?;
        if !cfg!(debug_assertions) && session_signing_secret.len() < 32 {
            anyhow::bail!("SESSION_SIGNING_SECRET must be at least 32 bytes outside debug builds");
        }

        let session_token_ttl_seconds = int_from_env("SESSION_TOKEN_TTL_SECONDS", 7 * 24 * 60 * 60)?;
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN").ok().and_then(non_empty);
        let port = int_from_env("PORT", 3000)? as u16;
        let presence_ttl_seconds = int_from_env("PRESENCE_TTL_SECONDS", 300)?;
        let presence_heartbeat_seconds = int_from_env("PRESENCE_HEARTBEAT_SECONDS", 60)?;
        let focus_throttle_millis = int_from_env("FOCUS_THROTTLE_MILLIS", 100)?;

        Ok(Self {
            database_url,
            turso_auth_token,
            session_signing_secret,
            session_token_ttl_seconds,
            cors_allowed_origin,
            port,
            presence_ttl_seconds,
            presence_heartbeat_seconds,
            focus_throttle_millis,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn int_from_env(key: &str, default: i64) -> Result<i64> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<i64>()
            .with_context(|| format!("{key} must be an integer")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_from_env_falls_back_to_default_when_unset() {
        env::remove_var("WARROOM_TEST_INT");
        assert_eq!(int_from_env("WARROOM_TEST_INT", 42).unwrap(), 42);
    }

    #[test]
    fn int_from_env_parses_a_set_value() {
        env::set_var("WARROOM_TEST_INT_SET", "17");
        assert_eq!(int_from_env("WARROOM_TEST_INT_SET", 42).unwrap(), 17);
        env::remove_var("WARROOM_TEST_INT_SET");
    }

    #[test]
    fn non_empty_rejects_whitespace_only_values() {
        assert_eq!(non_empty("   ".to_string()), None);
        assert_eq!(non_empty("value".to_string()), Some("value".to_string()));
    }
}
