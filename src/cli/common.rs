//! Shared types for CLI command handlers.

use std::fmt;

/// Result type for CLI command execution.
pub type CliResult<T> = Result<T, CliError>;

/// Process exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed successfully.
    Success = 0,
    /// Input or state validation failed.
    Validation = 1,
    /// An I/O or environment error occurred.
    Io = 2,
}

/// Error raised by a CLI command, carrying its exit code.
#[derive(Debug)]
pub struct CliError {
    /// Exit code to terminate with.
    pub code: ExitCode,
    /// Human-readable message printed to stderr.
    pub message: String,
}

impl CliError {
    /// A validation failure (bad input, illegal state transition).
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// An I/O or environment failure.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::Io,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success as i32, 0);
        assert_eq!(CliError::validation("bad").code as i32, 1);
        assert_eq!(CliError::io("broken").code as i32, 2);
    }

    #[test]
    fn test_display() {
        let err = CliError::validation("Width must be a whole number");
        assert_eq!(err.to_string(), "Width must be a whole number");
    }
}
