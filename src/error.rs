//! Error handling for handle-forge

use thiserror::Error;

/// Main error type for handle-forge
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandleForgeError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl HandleForgeError {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// Whether this error ends a whole run rather than a single candidate.
    ///
    /// Network, authentication, timeout and parse failures belong to one
    /// check and are reported next to the other verdicts.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::Io { .. } | Self::Internal { .. } | Self::Cli { .. }
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidConfig { message } => {
                format!("❌ Invalid configuration: {}\n💡 Check lengths, alphabet, pattern and cap", message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Authentication { message } => {
                format!("❌ Authentication failed: {}\n💡 Verify NAMECHK_TOKEN is correct", message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try increasing timeout or reducing concurrency", operation, timeout_secs)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 The remote service may have changed its response format", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

impl From<regex::Error> for HandleForgeError {
    fn from(err: regex::Error) -> Self {
        Self::invalid_config(format!("invalid pattern: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HandleForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! invalid_config {
    ($msg:expr) => {
        $crate::error::HandleForgeError::invalid_config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::HandleForgeError::invalid_config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::HandleForgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::HandleForgeError::internal(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(HandleForgeError::invalid_config("bad").is_fatal());
        assert!(HandleForgeError::io("disk full", Some("github.log".to_string())).is_fatal());
        assert!(!HandleForgeError::network("reset", None, None).is_fatal());
        assert!(!HandleForgeError::timeout("probe", 10).is_fatal());
        assert!(!HandleForgeError::parse("missing username", None).is_fatal());
    }

    #[test]
    fn test_regex_error_is_invalid_config() {
        let err: HandleForgeError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, HandleForgeError::InvalidConfig { .. }));
        assert!(err.to_string().contains("invalid pattern"));
    }

    #[test]
    fn test_macros() {
        let err = invalid_config!("min_length {} exceeds max_length {}", 4, 2);
        assert_eq!(err.to_string(), "Invalid configuration: min_length 4 exceeds max_length 2");

        let err = internal_error!("oops");
        assert!(err.user_message().contains("oops"));
    }
}
