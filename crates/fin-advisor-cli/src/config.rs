use std::env;

use fin_advisor_core::health::policy::ScoringPolicy;
use thiserror::Error;

use crate::input;

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Runtime settings for the `fina` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub log_level: String,
    /// Scoring policy file applied by `fina health` when `--policy` is absent.
    pub policy_path: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load scoring policy '{path}': {reason}")]
    Policy { path: String, reason: String },
}

impl CliConfig {
    /// Read `.env` (if present) and the `FINA_*` environment variables.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_level = lookup("FINA_LOG_LEVEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let policy_path = lookup("FINA_POLICY").filter(|v| !v.trim().is_empty());

        Self {
            log_level,
            policy_path,
        }
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, log_level: Option<String>, policy: Option<String>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if policy.is_some() {
            self.policy_path = policy;
        }
        self
    }
}

/// Load and validate a YAML or JSON scoring policy file.
pub fn load_policy(path: &str) -> Result<ScoringPolicy, ConfigError> {
    let policy: ScoringPolicy =
        input::file::read_yaml(path).map_err(|e| ConfigError::Policy {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    check_policy(path, policy)
}

fn check_policy(path: &str, policy: ScoringPolicy) -> Result<ScoringPolicy, ConfigError> {
    policy.validate().map_err(|e| ConfigError::Policy {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn parse_policy(contents: &str) -> Result<ScoringPolicy, ConfigError> {
        let policy: ScoringPolicy =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Policy {
                path: "<inline>".into(),
                reason: e.to_string(),
            })?;
        check_policy("<inline>", policy)
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_warn_without_policy() {
        let config = CliConfig::from_lookup(lookup(&[]));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.policy_path, None);
    }

    #[test]
    fn reads_env_and_flags_override() {
        let config = CliConfig::from_lookup(lookup(&[
            ("FINA_LOG_LEVEL", "debug"),
            ("FINA_POLICY", "policy.yaml"),
        ]));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.policy_path.as_deref(), Some("policy.yaml"));

        let config = config.with_overrides(Some("info".into()), None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.policy_path.as_deref(), Some("policy.yaml"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = CliConfig::from_lookup(lookup(&[("FINA_LOG_LEVEL", " "), ("FINA_POLICY", "")]));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.policy_path, None);
    }

    #[test]
    fn partial_yaml_policy_keeps_defaults() {
        let policy = parse_policy("clamp_subscores: true\npreferred_banks: [sbi]\n").unwrap();
        assert!(policy.clamp_subscores);
        assert!(policy.is_preferred_bank("SBI"));
        assert!(!policy.is_preferred_bank("HDFC"));
        assert_eq!(policy.eligibility_multiplier, dec!(1.2));
    }

    #[test]
    fn json_policy_is_accepted() {
        let policy = parse_policy(r#"{"investments_bonus": 10}"#).unwrap();
        assert_eq!(policy.investments_bonus, dec!(10));
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let err = parse_policy("eligibility_multiplier: -1\n").unwrap_err();
        assert!(err.to_string().contains("eligibility_multiplier"));
    }
}
