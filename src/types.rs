//! Core types and structures for handle-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{HandleForgeError, Result};
use crate::metrics::MetricsSnapshot;

/// Default endpoint of the bulk username check API
pub const DEFAULT_BULK_API_URL: &str = "https://api.namechk.com/services/bulk_check.json";

/// Maximum number of usernames sent in one bulk API call
pub const BULK_GROUP_SIZE: usize = 5;

/// Placeholder replaced by the candidate inside a URL template
pub const CANDIDATE_PLACEHOLDER: &str = "{}";

/// How a verdict was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMethod {
    Profile,
    Redirect,
    Bulk,
    None,
}

impl std::fmt::Display for CheckMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckMethod::Profile => write!(f, "profile"),
            CheckMethod::Redirect => write!(f, "redirect"),
            CheckMethod::Bulk => write!(f, "bulk"),
            CheckMethod::None => write!(f, "none"),
        }
    }
}

/// Per-site probing strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Strategy {
    /// `GET <template>`; 404 means the name is free.
    Profile { url_template: String },
    /// `GET <template>` without following redirects; 302 means the name is free.
    Redirect { url_template: String },
}

impl Strategy {
    /// Build the probe URL for a candidate
    pub fn url_for(&self, candidate: &str) -> String {
        self.url_template().replace(CANDIDATE_PLACEHOLDER, candidate)
    }

    pub fn url_template(&self) -> &str {
        match self {
            Strategy::Profile { url_template } | Strategy::Redirect { url_template } => url_template,
        }
    }

    pub fn method(&self) -> CheckMethod {
        match self {
            Strategy::Profile { .. } => CheckMethod::Profile,
            Strategy::Redirect { .. } => CheckMethod::Redirect,
        }
    }
}

/// The remote namespace being checked, fixed for a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub strategy: Option<Strategy>,
}

impl Target {
    /// Resolve a site name through the built-in registry.
    ///
    /// Unknown names are still valid targets; they simply have no strategy.
    pub fn named(name: &str) -> Result<Self> {
        let name = name.trim().to_lowercase();
        Self::validate_name(&name)?;
        let strategy = crate::check::registry::site_strategy(&name);
        Ok(Self { name, strategy })
    }

    /// Build a target with an explicit strategy
    pub fn custom(name: impl Into<String>, strategy: Strategy) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        if !strategy.url_template().contains(CANDIDATE_PLACEHOLDER) {
            return Err(HandleForgeError::invalid_config(format!(
                "URL template for '{}' has no '{}' placeholder",
                name, CANDIDATE_PLACEHOLDER
            )));
        }
        Ok(Self {
            name,
            strategy: Some(strategy),
        })
    }

    /// The name doubles as the log file stem, so it must stay a plain file name.
    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(HandleForgeError::invalid_config("target name cannot be empty"));
        }
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(HandleForgeError::invalid_config(format!(
                "target name '{}' must not contain path separators",
                name
            )));
        }
        Ok(())
    }

    /// Log file name for this target (`<name>.log`)
    pub fn log_file_name(&self) -> String {
        format!("{}.log", self.name)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Configuration for candidate generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub alphabet: Vec<char>,
    pub min_length: usize,
    pub max_length: usize,
    /// Regular expression every candidate must match; `None` accepts everything
    pub pattern: Option<String>,
    pub result_cap: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            alphabet: ('a'..='z').collect(),
            min_length: 3,
            max_length: 3,
            pattern: None,
            result_cap: 10_000,
        }
    }
}

impl GenerationConfig {
    /// Convenience constructor from an alphabet string
    pub fn new(alphabet: &str, min_length: usize, max_length: usize) -> Self {
        Self {
            alphabet: alphabet.chars().collect(),
            min_length,
            max_length,
            ..Default::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_cap(mut self, result_cap: usize) -> Self {
        self.result_cap = result_cap;
        self
    }

    /// Check the numeric and alphabet constraints (the pattern is compiled by the generator)
    pub fn validate(&self) -> Result<()> {
        if self.alphabet.is_empty() {
            return Err(HandleForgeError::invalid_config("alphabet cannot be empty"));
        }
        if self.min_length == 0 {
            return Err(HandleForgeError::invalid_config("min_length must be at least 1"));
        }
        if self.max_length < self.min_length {
            return Err(HandleForgeError::invalid_config(format!(
                "max_length {} is smaller than min_length {}",
                self.max_length, self.min_length
            )));
        }
        if self.result_cap == 0 {
            return Err(HandleForgeError::invalid_config("result_cap must be at least 1"));
        }
        Ok(())
    }
}

/// Which checking protocol a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// One request per candidate using the target's site strategy
    #[default]
    Probe,
    /// Groups of candidates checked through the bulk API
    Bulk,
}

impl FromStr for CheckMode {
    type Err = HandleForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "probe" => Ok(CheckMode::Probe),
            "bulk" => Ok(CheckMode::Bulk),
            other => Err(HandleForgeError::invalid_config(format!(
                "unknown check mode '{}' (expected 'probe' or 'bulk')",
                other
            ))),
        }
    }
}

/// Configuration for availability checking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub mode: CheckMode,
    pub bulk_api_url: String,
    pub api_token: Option<String>,
    pub log_dir: PathBuf,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout: Duration::from_secs(15),
            user_agent: format!("handle-forge/{}", env!("CARGO_PKG_VERSION")),
            mode: CheckMode::Probe,
            bulk_api_url: DEFAULT_BULK_API_URL.to_string(),
            api_token: None,
            log_dir: PathBuf::from("."),
        }
    }
}

impl CheckConfig {
    /// Build a configuration from `HANDLE_FORGE_*` and `NAMECHK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("HANDLE_FORGE_CONCURRENCY") {
            config.concurrency = parse_env_number("HANDLE_FORGE_CONCURRENCY", &value)?;
        }
        if let Ok(value) = std::env::var("HANDLE_FORGE_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_env_number("HANDLE_FORGE_TIMEOUT_SECS", &value)?);
        }
        if let Ok(value) = std::env::var("HANDLE_FORGE_MODE") {
            config.mode = value.parse()?;
        }
        if let Ok(value) = std::env::var("HANDLE_FORGE_LOG_DIR") {
            config.log_dir = PathBuf::from(value);
        }
        if let Ok(token) = std::env::var("NAMECHK_TOKEN") {
            if !token.trim().is_empty() {
                config.api_token = Some(token.trim().to_string());
            }
        }
        if let Ok(url) = std::env::var("NAMECHK_API_URL") {
            config.bulk_api_url = url;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(HandleForgeError::invalid_config("concurrency must be at least 1"));
        }
        if self.mode == CheckMode::Bulk && self.api_token.is_none() {
            return Err(HandleForgeError::invalid_config(
                "bulk mode requires an API token (set NAMECHK_TOKEN)",
            ));
        }
        Ok(())
    }
}

fn parse_env_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        HandleForgeError::invalid_config(format!("{} must be a positive number, got '{}'", key, value))
    })
}

/// Outcome of checking one candidate against one target
#[derive(Debug, Clone)]
pub struct Verdict {
    pub candidate: String,
    pub available: bool,
    pub error: Option<HandleForgeError>,
    pub method: CheckMethod,
    pub checked_at: DateTime<Utc>,
    pub check_duration: Option<Duration>,
}

impl Verdict {
    pub fn available(candidate: impl Into<String>, method: CheckMethod) -> Self {
        Self::new(candidate.into(), true, None, method)
    }

    pub fn unavailable(candidate: impl Into<String>, method: CheckMethod) -> Self {
        Self::new(candidate.into(), false, None, method)
    }

    /// A check that could not reach a decision
    pub fn failed(candidate: impl Into<String>, method: CheckMethod, error: HandleForgeError) -> Self {
        Self::new(candidate.into(), false, Some(error), method)
    }

    fn new(candidate: String, available: bool, error: Option<HandleForgeError>, method: CheckMethod) -> Self {
        Self {
            candidate,
            available,
            error,
            method,
            checked_at: Utc::now(),
            check_duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.check_duration = Some(duration);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A per-candidate failure reported alongside the results
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateError {
    pub candidate: String,
    pub error: HandleForgeError,
}

/// Aggregate outcome of a sweep
#[derive(Debug, Clone)]
pub struct RunReport {
    pub target: String,
    /// Available usernames in verdict-arrival order
    pub available: Vec<String>,
    pub errors: Vec<CandidateError>,
    pub checked: usize,
    pub duration: Duration,
    pub metrics: MetricsSnapshot,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_mode_parse() {
        assert_eq!("bulk".parse::<CheckMode>().unwrap(), CheckMode::Bulk);
        assert_eq!(" Probe ".parse::<CheckMode>().unwrap(), CheckMode::Probe);
        assert!("scrape".parse::<CheckMode>().is_err());
    }

    #[test]
    fn test_strategy_url() {
        let strategy = Strategy::Redirect {
            url_template: "https://{}.example.com".to_string(),
        };
        assert_eq!(strategy.url_for("abc"), "https://abc.example.com");
        assert_eq!(strategy.method(), CheckMethod::Redirect);
    }

    #[test]
    fn test_target_log_file_name() {
        let target = Target::named("GitHub").unwrap();
        assert_eq!(target.name, "github");
        assert_eq!(target.log_file_name(), "github.log");
        assert!(target.strategy.is_some());
    }

    #[test]
    fn test_generation_defaults_are_valid() {
        let config = GenerationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alphabet.len(), 26);
        assert_eq!((config.min_length, config.max_length), (3, 3));
    }

    #[test]
    fn test_check_config_validation() {
        assert!(CheckConfig::default().validate().is_ok());

        let zero = CheckConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_verdict_constructors() {
        let ok = Verdict::available("abc", CheckMethod::Profile).with_duration(Duration::from_millis(12));
        assert!(ok.available && !ok.is_error());
        assert_eq!(ok.check_duration, Some(Duration::from_millis(12)));

        let failed = Verdict::failed("abd", CheckMethod::Bulk, HandleForgeError::timeout("bulk", 15));
        assert!(!failed.available && failed.is_error());
    }
}
