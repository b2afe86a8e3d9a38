use std::fmt;
use std::time::Duration;

pub type HarnessResult<T> = Result<T, HarnessError>;

#[derive(Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// The request never produced a response (connection refused, timeout, ...).
    Transport {
        context: String,
        reason: String,
    },
    /// The host answered with a non-2xx status.
    ErrorResponse {
        method: String,
        endpoint: String,
        status: u16,
        body: String,
    },
    Decode {
        context: String,
        reason: String,
    },
    Assertion {
        message: String,
    },
    Config {
        context: String,
        reason: String,
    },
    Timeout {
        context: String,
        waited: Duration,
    },
}

/// Discriminant of [`HarnessError`], used to match expected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    ErrorResponse,
    Decode,
    Assertion,
    Config,
    Timeout,
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Transport { context, reason } => {
                write!(f, "Transport error in {context}: {reason}")
            }
            HarnessError::ErrorResponse {
                method,
                endpoint,
                status,
                body,
            } => {
                let reason = reqwest::StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|code| code.canonical_reason())
                    .unwrap_or("Unknown");
                write!(
                    f,
                    "method [{method}], URI [{endpoint}], status line [{status} {reason}]\n{body}"
                )
            }
            HarnessError::Decode { context, reason } => {
                write!(f, "Failed to decode {context}: {reason}")
            }
            HarnessError::Assertion { message } => write!(f, "Assertion failed: {message}"),
            HarnessError::Config { context, reason } => {
                write!(f, "Invalid configuration in {context}: {reason}")
            }
            HarnessError::Timeout { context, waited } => {
                write!(f, "Timed out after {}ms waiting for {context}", waited.as_millis())
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Transport => "transport-error",
            ErrorKind::ErrorResponse => "error-response",
            ErrorKind::Decode => "decode-error",
            ErrorKind::Assertion => "assertion-mismatch",
            ErrorKind::Config => "config-error",
            ErrorKind::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

impl std::error::Error for HarnessError {}

impl HarnessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HarnessError::Transport { .. } => ErrorKind::Transport,
            HarnessError::ErrorResponse { .. } => ErrorKind::ErrorResponse,
            HarnessError::Decode { .. } => ErrorKind::Decode,
            HarnessError::Assertion { .. } => ErrorKind::Assertion,
            HarnessError::Config { .. } => ErrorKind::Config,
            HarnessError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        HarnessError::Assertion {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HarnessError::ErrorResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn from_reqwest_error(e: reqwest::Error, context: &str) -> Self {
        if e.is_decode() {
            HarnessError::Decode {
                context: context.to_string(),
                reason: e.to_string(),
            }
        } else {
            HarnessError::Transport {
                context: context.to_string(),
                reason: e.to_string(),
            }
        }
    }

    pub fn from_parse_error(e: impl fmt::Display, context: &str) -> Self {
        HarnessError::Decode {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }

    pub fn from_io_error(e: std::io::Error, context: &str) -> Self {
        HarnessError::Config {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }
}
