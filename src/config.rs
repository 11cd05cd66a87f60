use crate::game::player::Chips;
use std::time::Duration;

/// Server-wide configuration, read from environment variables rather than
/// a config file — there's no persistence layer to configure.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub default_small_blind: Chips,
    pub default_big_blind: Chips,
    pub decision_timeout: Duration,
    pub showdown_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            default_small_blind: 1,
            default_big_blind: 2,
            decision_timeout: Duration::from_secs(10),
            showdown_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Reads overrides from the environment, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            default_small_blind: env_chips("DEFAULT_SMALL_BLIND").unwrap_or(defaults.default_small_blind),
            default_big_blind: env_chips("DEFAULT_BIG_BLIND").unwrap_or(defaults.default_big_blind),
            decision_timeout: env_secs("DECISION_TIMEOUT_SECS").unwrap_or(defaults.decision_timeout),
            showdown_timeout: env_secs("SHOWDOWN_TIMEOUT_SECS").unwrap_or(defaults.showdown_timeout),
        }
    }
}

fn env_chips(key: &str) -> Option<Chips> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_blinds_are_one_and_two() {
        let config = Config::default();
        assert_eq!(config.default_small_blind, 1);
        assert_eq!(config.default_big_blind, 2);
    }
}
