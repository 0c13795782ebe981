//! Sweep sessions - orchestration and the per-target result log

mod log;
mod sweeper;

pub use log::SessionLog;
pub use sweeper::Sweeper;

use crate::error::Result;
use crate::types::{CheckConfig, GenerationConfig, RunReport, Target};

/// Generate candidates for `generation` and check them all against `target`
pub async fn run(generation: &GenerationConfig, target: &Target, config: &CheckConfig) -> Result<RunReport> {
    Sweeper::new(target.clone(), config.clone())?.run(generation).await
}
