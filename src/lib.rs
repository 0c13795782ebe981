//! Handle Forge - username combination generation and availability sweeping
//!
//! Enumerates candidate usernames from an alphabet under length and pattern
//! constraints, checks each one against a remote site and appends the free
//! ones to a per-site log.

pub mod check;
pub mod error;
pub mod generate;
pub mod metrics;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{HandleForgeError, Result};
pub use metrics::{MetricsSnapshot, PerformanceMetrics};
pub use types::{
    CandidateError, CheckConfig, CheckMethod, CheckMode, GenerationConfig, RunReport, Strategy,
    Target, Verdict,
};

// Re-export main functionality
pub use check::{create_checker, AvailabilityCheck};
pub use generate::{generate, Charset, CombinationGenerator};
pub use session::{run, SessionLog, Sweeper};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
