//! Bulk check API client: one request answers a whole group of usernames

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::{build_client, request_error, AvailabilityCheck};
use crate::error::{HandleForgeError, Result};
use crate::types::{CheckConfig, CheckMethod, Verdict, BULK_GROUP_SIZE};

/// Bulk API checker, sends up to [`BULK_GROUP_SIZE`] usernames per call
pub struct BulkApiCheck {
    client: Client,
    endpoint: String,
    token: String,
    site: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct BulkRequest<'a> {
    site: &'a str,
    usernames: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BulkEntry {
    username: String,
    #[serde(default)]
    available: bool,
}

impl BulkApiCheck {
    pub fn new(site: &str, config: &CheckConfig) -> Result<Self> {
        let token = config
            .api_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| HandleForgeError::invalid_config("bulk mode requires an API token (set NAMECHK_TOKEN)"))?;

        Ok(Self {
            client: build_client(config, true)?,
            endpoint: config.bulk_api_url.clone(),
            token,
            site: site.to_string(),
            timeout: config.timeout,
        })
    }

    async fn request(&self, usernames: &[String]) -> Result<HashMap<String, bool>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.api.v1+json")
            .json(&BulkRequest {
                site: &self.site,
                usernames,
            })
            .send()
            .await
            .map_err(|e| request_error(e, "Bulk check", self.timeout))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(HandleForgeError::authentication(format!(
                "bulk check API rejected the token ({})",
                status
            )));
        }
        if !status.is_success() {
            return Err(HandleForgeError::network(
                format!("Bulk check failed with status {}", status),
                Some(status.as_u16()),
                Some(self.endpoint.clone()),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| request_error(e, "Bulk check body", self.timeout))?;

        let entries: Vec<BulkEntry> = serde_json::from_str(&text)
            .map_err(|e| HandleForgeError::parse(format!("Invalid bulk check response: {}", e), Some(text)))?;

        Ok(entries
            .into_iter()
            .map(|entry| (entry.username, entry.available))
            .collect())
    }
}

#[async_trait]
impl AvailabilityCheck for BulkApiCheck {
    async fn check(&self, candidate: &str) -> Verdict {
        let group = [candidate.to_string()];
        self.check_group(&group)
            .await
            .pop()
            .unwrap_or_else(|| {
                Verdict::failed(
                    candidate,
                    CheckMethod::Bulk,
                    HandleForgeError::parse("bulk check returned no verdict", None),
                )
            })
    }

    async fn check_group(&self, candidates: &[String]) -> Vec<Verdict> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let outcome = self.request(candidates).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(results) => candidates
                .iter()
                .map(|candidate| match results.get(candidate) {
                    Some(true) => Verdict::available(candidate.as_str(), CheckMethod::Bulk),
                    Some(false) => Verdict::unavailable(candidate.as_str(), CheckMethod::Bulk),
                    None => Verdict::failed(
                        candidate.as_str(),
                        CheckMethod::Bulk,
                        HandleForgeError::parse(format!("'{}' missing from bulk check response", candidate), None),
                    ),
                })
                .map(|verdict| verdict.with_duration(elapsed))
                .collect(),
            Err(error) => {
                tracing::warn!(
                    site = %self.site,
                    group = ?candidates,
                    error = %error,
                    "Bulk check failed for whole group"
                );
                candidates
                    .iter()
                    .map(|candidate| {
                        Verdict::failed(candidate.as_str(), CheckMethod::Bulk, error.clone()).with_duration(elapsed)
                    })
                    .collect()
            }
        }
    }

    fn group_size(&self) -> usize {
        BULK_GROUP_SIZE
    }

    fn method(&self) -> CheckMethod {
        CheckMethod::Bulk
    }
}
