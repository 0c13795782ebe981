//! Availability checking module
//!
//! Each strategy turns a candidate into a [`Verdict`]. Failures never escape a
//! check: they come back as error verdicts so one bad request cannot stop a sweep.

pub mod bulk;
pub mod probe;
pub mod registry;

pub use bulk::BulkApiCheck;
pub use probe::{NoopCheck, ProfileProbe, RedirectProbe};

use crate::error::{HandleForgeError, Result};
use crate::types::{CheckConfig, CheckMethod, CheckMode, Strategy, Target, Verdict};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;

/// Trait for availability checking strategies
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    /// Check a single candidate
    async fn check(&self, candidate: &str) -> Verdict;

    /// Check a group of candidates, one verdict per candidate.
    ///
    /// The default runs the per-candidate checks side by side.
    async fn check_group(&self, candidates: &[String]) -> Vec<Verdict> {
        join_all(candidates.iter().map(|candidate| self.check(candidate))).await
    }

    /// How many candidates one dispatch unit carries
    fn group_size(&self) -> usize {
        1
    }

    /// Get the method name
    fn method(&self) -> CheckMethod;
}

/// Create the checker for a target.
///
/// Bulk mode applies to any target. In probe mode a target without a known
/// strategy gets [`NoopCheck`], which reports every candidate as unavailable.
pub fn create_checker(target: &Target, config: &CheckConfig) -> Result<Box<dyn AvailabilityCheck>> {
    config.validate()?;

    match (config.mode, &target.strategy) {
        (CheckMode::Bulk, _) => Ok(Box::new(BulkApiCheck::new(&target.name, config)?)),
        (CheckMode::Probe, Some(strategy @ Strategy::Profile { .. })) => {
            Ok(Box::new(ProfileProbe::new(strategy.clone(), config)?))
        }
        (CheckMode::Probe, Some(strategy @ Strategy::Redirect { .. })) => {
            Ok(Box::new(RedirectProbe::new(strategy.clone(), config)?))
        }
        (CheckMode::Probe, None) => {
            tracing::warn!(
                target_site = %target.name,
                known = %registry::known_sites().join(", "),
                "No probe strategy for target; every candidate will be reported unavailable"
            );
            Ok(Box::new(NoopCheck))
        }
    }
}

/// Shared HTTP client setup for all strategies
fn build_client(config: &CheckConfig, follow_redirects: bool) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .pool_max_idle_per_host(config.concurrency)
        .pool_idle_timeout(Duration::from_secs(90));

    if !follow_redirects {
        builder = builder.redirect(reqwest::redirect::Policy::none());
    }

    builder
        .build()
        .map_err(|e| HandleForgeError::network(format!("Failed to create HTTP client: {}", e), None, None))
}

/// Map a transport failure, keeping the configured timeout in the message
fn request_error(err: reqwest::Error, operation: &str, timeout: Duration) -> HandleForgeError {
    if err.is_timeout() {
        HandleForgeError::timeout(operation, timeout.as_secs())
    } else {
        let url = err.url().map(|u| u.to_string());
        HandleForgeError::network(format!("{} failed: {}", operation, err), None, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_target_gets_noop() {
        let target = Target::named("no-such-site").unwrap();
        let checker = create_checker(&target, &CheckConfig::default()).unwrap();
        assert_eq!(checker.method(), CheckMethod::None);
        assert_eq!(checker.group_size(), 1);
    }

    #[test]
    fn test_known_targets_pick_their_strategy() {
        let config = CheckConfig::default();

        let github = create_checker(&Target::named("github").unwrap(), &config).unwrap();
        assert_eq!(github.method(), CheckMethod::Profile);

        let tumblr = create_checker(&Target::named("tumblr").unwrap(), &config).unwrap();
        assert_eq!(tumblr.method(), CheckMethod::Redirect);
    }

    #[test]
    fn test_bulk_mode_requires_token() {
        let target = Target::named("github").unwrap();
        let mut config = CheckConfig {
            mode: CheckMode::Bulk,
            ..Default::default()
        };
        assert!(matches!(
            create_checker(&target, &config).err(),
            Some(HandleForgeError::InvalidConfig { .. })
        ));

        config.api_token = Some("token".to_string());
        let checker = create_checker(&target, &config).unwrap();
        assert_eq!(checker.method(), CheckMethod::Bulk);
        assert_eq!(checker.group_size(), crate::types::BULK_GROUP_SIZE);
    }
}
