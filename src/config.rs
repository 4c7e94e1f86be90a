// src/config.rs
//! Process configuration: one explicit struct built from the environment at
//! startup and passed by reference into the component constructors.

use std::time::Duration;

// --- env names & defaults ---
pub const ENV_API_KEY: &str = "EXTERNAL_API_KEY";
pub const ENV_CACHE_TTL_MS: &str = "NEWS_CACHE_TTL_MS";
pub const ENV_CACHE_REFRESH_MS: &str = "NEWS_CACHE_REFRESH_MS";
pub const ENV_HISTORY_LIMIT: &str = "NEWS_HISTORY_LIMIT";

pub const DEFAULT_CACHE_TTL_MS: u64 = 600_000;
pub const DEFAULT_CACHE_REFRESH_MS: u64 = 60_000;
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// NewsAPI credential. Absence is surfaced per request as a fetch
    /// failure, not at boot.
    pub api_key: Option<String>,
    /// Hard expiry for cached responses.
    pub cache_ttl: Duration,
    /// Window before expiry in which cached entries are flagged stale-soon.
    pub refresh_threshold: Duration,
    /// Maximum number of retained history records.
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            refresh_threshold: Duration::from_millis(DEFAULT_CACHE_REFRESH_MS),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment. Call once at
    /// startup, after `dotenvy` has run.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(ENV_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty()),
            cache_ttl: Duration::from_millis(parse_env_u64(ENV_CACHE_TTL_MS, DEFAULT_CACHE_TTL_MS)),
            refresh_threshold: Duration::from_millis(parse_env_u64(
                ENV_CACHE_REFRESH_MS,
                DEFAULT_CACHE_REFRESH_MS,
            )),
            history_limit: parse_env_u64(ENV_HISTORY_LIMIT, DEFAULT_HISTORY_LIMIT as u64) as usize,
        }
    }
}

// parse optional integer env; missing or malformed values fall back to the default
fn parse_env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[serial_test::serial]
    #[test]
    fn defaults_apply_when_env_is_absent() {
        env::remove_var(ENV_API_KEY);
        env::remove_var(ENV_CACHE_TTL_MS);
        env::remove_var(ENV_CACHE_REFRESH_MS);
        env::remove_var(ENV_HISTORY_LIMIT);

        let cfg = AppConfig::from_env();
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.cache_ttl, Duration::from_millis(DEFAULT_CACHE_TTL_MS));
        assert_eq!(
            cfg.refresh_threshold,
            Duration::from_millis(DEFAULT_CACHE_REFRESH_MS)
        );
        assert_eq!(cfg.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_are_picked_up() {
        env::set_var(ENV_API_KEY, "k-123");
        env::set_var(ENV_CACHE_TTL_MS, "1500");
        env::set_var(ENV_CACHE_REFRESH_MS, "300");
        env::set_var(ENV_HISTORY_LIMIT, "7");

        let cfg = AppConfig::from_env();
        assert_eq!(cfg.api_key.as_deref(), Some("k-123"));
        assert_eq!(cfg.cache_ttl, Duration::from_millis(1500));
        assert_eq!(cfg.refresh_threshold, Duration::from_millis(300));
        assert_eq!(cfg.history_limit, 7);

        env::remove_var(ENV_API_KEY);
        env::remove_var(ENV_CACHE_TTL_MS);
        env::remove_var(ENV_CACHE_REFRESH_MS);
        env::remove_var(ENV_HISTORY_LIMIT);
    }

    #[serial_test::serial]
    #[test]
    fn malformed_numbers_and_blank_key_fall_back() {
        env::set_var(ENV_API_KEY, "   ");
        env::set_var(ENV_CACHE_TTL_MS, "ten minutes");
        env::set_var(ENV_HISTORY_LIMIT, "-5");

        let cfg = AppConfig::from_env();
        assert_eq!(cfg.api_key, None, "blank credential counts as absent");
        assert_eq!(cfg.cache_ttl, Duration::from_millis(DEFAULT_CACHE_TTL_MS));
        assert_eq!(cfg.history_limit, DEFAULT_HISTORY_LIMIT);

        env::remove_var(ENV_API_KEY);
        env::remove_var(ENV_CACHE_TTL_MS);
        env::remove_var(ENV_HISTORY_LIMIT);
    }
}
