//! Workflow tuning: concurrency window, per-call timeout, identifier
//! resolution backoff and the two policy switches.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a selected category with no checked subcategory means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// File under the category's first catalog subcategory.
    #[default]
    FirstSubcategory,
    /// Reject the submission until a subcategory is checked.
    RequireExplicit,
}

impl FromStr for FallbackPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first-subcategory" => Ok(Self::FirstSubcategory),
            "require-explicit" => Ok(Self::RequireExplicit),
            other => Err(ConfigError::InvalidValue {
                var: "fallback policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Where created-document identifiers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierStrategy {
    /// Ignore create-response payloads; match every created row in a
    /// refreshed list by name and target.
    #[default]
    ListLookup,
    /// Trust an identifier parsed from the create response, and list-match
    /// only the rows whose response carried none.
    PreferResponse,
}

impl FromStr for IdentifierStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "list-lookup" => Ok(Self::ListLookup),
            "prefer-response" => Ok(Self::PreferResponse),
            other => Err(ConfigError::InvalidValue {
                var: "identifier strategy",
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for [`crate::DocumentLinker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkingConfig {
    /// Maximum number of create or link calls in flight at once.
    pub max_concurrency: usize,
    /// Upper bound on a single API call. An expired call is a failure of
    /// that call only.
    pub call_timeout: Duration,
    /// Wait before the first identifier-resolution refetch. Doubles before
    /// each further attempt.
    pub settle_delay: Duration,
    /// Number of list refetches while created rows remain unmatched.
    pub resolve_attempts: u32,
    /// Selected-category fallback policy.
    pub fallback: FallbackPolicy,
    /// Identifier source.
    pub id_strategy: IdentifierStrategy,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            call_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(1000),
            resolve_attempts: 3,
            fallback: FallbackPolicy::default(),
            id_strategy: IdentifierStrategy::default(),
        }
    }
}

impl LinkingConfig {
    /// Load configuration from environment variables, falling back to
    /// [`LinkingConfig::default`] for anything unset.
    ///
    /// Variables:
    /// - `IMS_LINK_MAX_CONCURRENCY` (default: 4, minimum 1)
    /// - `IMS_LINK_CALL_TIMEOUT_SECS` (default: 30)
    /// - `IMS_LINK_SETTLE_DELAY_MS` (default: 1000)
    /// - `IMS_LINK_RESOLVE_ATTEMPTS` (default: 3, minimum 1)
    /// - `IMS_LINK_FALLBACK` (`first-subcategory` | `require-explicit`)
    /// - `IMS_LINK_ID_STRATEGY` (`list-lookup` | `prefer-response`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_concurrency: env_parse("IMS_LINK_MAX_CONCURRENCY")?
                .unwrap_or(defaults.max_concurrency)
                .max(1),
            call_timeout: env_parse("IMS_LINK_CALL_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.call_timeout),
            settle_delay: env_parse("IMS_LINK_SETTLE_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.settle_delay),
            resolve_attempts: env_parse("IMS_LINK_RESOLVE_ATTEMPTS")?
                .unwrap_or(defaults.resolve_attempts)
                .max(1),
            fallback: env_parse("IMS_LINK_FALLBACK")?.unwrap_or(defaults.fallback),
            id_strategy: env_parse("IMS_LINK_ID_STRATEGY")?.unwrap_or(defaults.id_strategy),
        })
    }
}

fn env_parse<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
            var,
            value: raw,
        }),
        Err(_) => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: \"{value}\"")]
    InvalidValue { var: &'static str, value: String },
}
