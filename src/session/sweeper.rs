//! Sweep orchestration: generator → bounded concurrent checks → session log

use futures::stream::{self, StreamExt};
use std::time::Instant;

use super::log::SessionLog;
use crate::check::{create_checker, AvailabilityCheck};
use crate::error::{HandleForgeError, Result};
use crate::generate::{generate, CombinationGenerator};
use crate::metrics::PerformanceMetrics;
use crate::types::{CandidateError, CheckConfig, GenerationConfig, RunReport, Target, Verdict};

/// A verdict plus the outcome of persisting it
struct Outcome {
    verdict: Verdict,
    log_error: Option<HandleForgeError>,
}

/// Drives candidates through a checker and records what is available
pub struct Sweeper {
    target: Target,
    config: CheckConfig,
    checker: Box<dyn AvailabilityCheck>,
}

impl Sweeper {
    /// Create a sweeper using the checker that matches the target and mode
    pub fn new(target: Target, config: CheckConfig) -> Result<Self> {
        let checker = create_checker(&target, &config)?;
        Ok(Self::with_checker(target, config, checker))
    }

    /// Create a sweeper around any checker
    pub fn with_checker(target: Target, config: CheckConfig, checker: Box<dyn AvailabilityCheck>) -> Self {
        Self {
            target,
            config,
            checker,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Run a full sweep
    pub async fn run(&self, generation: &GenerationConfig) -> Result<RunReport> {
        self.run_with_progress(generation, |_| {}).await
    }

    /// Run a full sweep, calling `on_verdict` once per verdict as it arrives
    pub async fn run_with_progress<F>(&self, generation: &GenerationConfig, on_verdict: F) -> Result<RunReport>
    where
        F: Fn(&Verdict) + Send + Sync,
    {
        // Configuration problems surface before any file or network I/O.
        let plan = generate(generation)?;
        if self.config.concurrency == 0 {
            return Err(HandleForgeError::invalid_config("concurrency must be at least 1"));
        }

        let log = SessionLog::open(&self.config.log_dir, &self.target)?;

        tracing::info!(
            target_site = %self.target,
            method = %self.checker.method(),
            min_length = generation.min_length,
            max_length = generation.max_length,
            result_cap = generation.result_cap,
            concurrency = self.config.concurrency,
            log = %log.path().display(),
            "Starting sweep"
        );

        self.sweep(&plan, log, on_verdict).await
    }

    /// Check every candidate of `plan`, recording into an already open `log`
    async fn sweep<F>(&self, plan: &CombinationGenerator, log: SessionLog, on_verdict: F) -> Result<RunReport>
    where
        F: Fn(&Verdict) + Send + Sync,
    {
        let metrics = PerformanceMetrics::new();
        let start = Instant::now();
        let group_size = self.checker.group_size().max(1);

        let mut candidates = plan.iter();
        let groups = std::iter::from_fn(move || {
            let group: Vec<String> = candidates.by_ref().take(group_size).collect();
            if group.is_empty() {
                None
            } else {
                Some(group)
            }
        });

        let mut available = Vec::new();
        let mut errors = Vec::new();
        let mut checked = 0usize;

        {
            let log = &log;
            let metrics = &metrics;
            let mut outcomes = stream::iter(groups)
                .map(move |group| self.check_and_record(group, log, metrics))
                .buffer_unordered(self.config.concurrency);

            while let Some(batch) = outcomes.next().await {
                for Outcome { verdict, log_error } in batch {
                    checked += 1;
                    on_verdict(&verdict);

                    if let Some(error) = &verdict.error {
                        errors.push(CandidateError {
                            candidate: verdict.candidate.clone(),
                            error: error.clone(),
                        });
                    }
                    if let Some(error) = log_error {
                        errors.push(CandidateError {
                            candidate: verdict.candidate.clone(),
                            error,
                        });
                    }
                    if verdict.available {
                        available.push(verdict.candidate);
                    }
                }
            }
        }

        // Every dispatched check and record has finished by now.
        log.close()?;

        let duration = start.elapsed();
        let snapshot = metrics.get_stats();
        tracing::info!(
            target_site = %self.target,
            checked,
            available = available.len(),
            errors = errors.len(),
            duration_ms = %duration.as_millis(),
            avg_check_ms = snapshot.avg_check_time_ms(),
            "Sweep completed"
        );

        Ok(RunReport {
            target: self.target.name.clone(),
            available,
            errors,
            checked,
            duration,
            metrics: snapshot,
        })
    }

    /// Check one dispatch group and persist its available names
    async fn check_and_record(
        &self,
        group: Vec<String>,
        log: &SessionLog,
        metrics: &PerformanceMetrics,
    ) -> Vec<Outcome> {
        let verdicts = self.checker.check_group(&group).await;

        verdicts
            .into_iter()
            .map(|verdict| {
                metrics.increment_checked();
                if let Some(duration) = verdict.check_duration {
                    metrics.add_check_time(duration);
                }

                tracing::debug!(
                    candidate = %verdict.candidate,
                    target_site = %self.target,
                    method = %verdict.method,
                    available = verdict.available,
                    duration_ms = verdict.check_duration.map(|d| d.as_millis() as u64),
                    "Candidate checked"
                );

                if let Some(error) = &verdict.error {
                    metrics.increment_errors();
                    tracing::warn!(candidate = %verdict.candidate, error = %error, "Candidate check failed");
                }

                let log_error = if verdict.available {
                    metrics.increment_available();
                    log.record(&verdict.candidate).err().map(|error| {
                        metrics.increment_log_failures();
                        tracing::warn!(candidate = %verdict.candidate, error = %error, "Failed to record available name");
                        error
                    })
                } else {
                    None
                };

                Outcome { verdict, log_error }
            })
            .collect()
    }
}
