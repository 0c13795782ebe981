//! Per-candidate site probes

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};

use super::{build_client, request_error, AvailabilityCheck};
use crate::error::{HandleForgeError, Result};
use crate::types::{CheckConfig, CheckMethod, Strategy, Verdict};

/// Profile page probe: a missing profile (404) means the name is free
pub struct ProfileProbe {
    client: Client,
    strategy: Strategy,
    timeout: Duration,
}

impl ProfileProbe {
    pub fn new(strategy: Strategy, config: &CheckConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config, true)?,
            strategy,
            timeout: config.timeout,
        })
    }

    fn classify(candidate: &str, status: StatusCode, url: String) -> Verdict {
        if status == StatusCode::NOT_FOUND {
            Verdict::available(candidate, CheckMethod::Profile)
        } else if status.is_success() {
            Verdict::unavailable(candidate, CheckMethod::Profile)
        } else {
            Verdict::failed(
                candidate,
                CheckMethod::Profile,
                HandleForgeError::network(
                    format!("Unexpected status {} from profile page", status),
                    Some(status.as_u16()),
                    Some(url),
                ),
            )
        }
    }
}

#[async_trait]
impl AvailabilityCheck for ProfileProbe {
    async fn check(&self, candidate: &str) -> Verdict {
        let start = Instant::now();
        let url = self.strategy.url_for(candidate);

        let verdict = match self.client.get(&url).send().await {
            Ok(response) => Self::classify(candidate, response.status(), url),
            Err(e) => Verdict::failed(
                candidate,
                CheckMethod::Profile,
                request_error(e, "Profile probe", self.timeout),
            ),
        };

        verdict.with_duration(start.elapsed())
    }

    fn method(&self) -> CheckMethod {
        CheckMethod::Profile
    }
}

/// Redirect probe: sites that send unknown subdomains to a signup page answer 302
pub struct RedirectProbe {
    client: Client,
    strategy: Strategy,
    timeout: Duration,
}

impl RedirectProbe {
    pub fn new(strategy: Strategy, config: &CheckConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config, false)?,
            strategy,
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl AvailabilityCheck for RedirectProbe {
    async fn check(&self, candidate: &str) -> Verdict {
        let start = Instant::now();
        let url = self.strategy.url_for(candidate);

        let verdict = match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::FOUND => {
                Verdict::available(candidate, CheckMethod::Redirect)
            }
            Ok(_) => Verdict::unavailable(candidate, CheckMethod::Redirect),
            Err(e) => Verdict::failed(
                candidate,
                CheckMethod::Redirect,
                request_error(e, "Redirect probe", self.timeout),
            ),
        };

        verdict.with_duration(start.elapsed())
    }

    fn method(&self) -> CheckMethod {
        CheckMethod::Redirect
    }
}

/// Fallback for targets nobody knows how to check
pub struct NoopCheck;

#[async_trait]
impl AvailabilityCheck for NoopCheck {
    async fn check(&self, candidate: &str) -> Verdict {
        Verdict::unavailable(candidate, CheckMethod::None)
    }

    fn method(&self) -> CheckMethod {
        CheckMethod::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_status_mapping() {
        let url = "https://example.test/ab".to_string();

        let free = ProfileProbe::classify("ab", StatusCode::NOT_FOUND, url.clone());
        assert!(free.available && !free.is_error());

        let taken = ProfileProbe::classify("ab", StatusCode::OK, url.clone());
        assert!(!taken.available && !taken.is_error());

        let odd = ProfileProbe::classify("ab", StatusCode::TOO_MANY_REQUESTS, url);
        assert!(!odd.available);
        assert!(matches!(
            odd.error,
            Some(HandleForgeError::Network { status_code: Some(429), .. })
        ));
    }

    #[test]
    fn test_noop_is_unavailable_without_error() {
        let verdict = tokio_test::block_on(NoopCheck.check("abc"));
        assert_eq!(verdict.candidate, "abc");
        assert!(!verdict.available);
        assert!(verdict.error.is_none());

        let group = tokio_test::block_on(NoopCheck.check_group(&["a".to_string(), "b".to_string()]));
        assert_eq!(group.len(), 2);
        assert!(group.iter().all(|v| !v.available && !v.is_error()));
    }
}
