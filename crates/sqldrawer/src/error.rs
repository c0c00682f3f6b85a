//! Error types for sqldrawer

use thiserror::Error;

/// Result type alias for sqldrawer operations
pub type DrawerResult<T> = Result<T, DrawerError>;

/// An error reported by the underlying database driver.
///
/// The message is carried verbatim from the driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DriverError {
    /// Driver specific error code (SQLSTATE or vendor code), if any.
    pub code: Option<String>,
    /// Driver message.
    pub message: String,
}

impl DriverError {
    /// Create a driver error without a code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Create a driver error with a vendor or SQLSTATE code.
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Error types for statement compilation and execution
#[derive(Debug, Clone, Error)]
pub enum DrawerError {
    /// Programmer mistake detected before any driver interaction
    /// (unsupported operator, join type, aggregate name, malformed operand).
    #[error("Usage error: {0}")]
    Usage(String),

    /// The dialect declares no clause set for an operation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection acquisition failed
    #[error("Connection error: {0}")]
    Connection(#[source] DriverError),

    /// Beginning, committing or rolling back a transaction failed
    #[error("Transaction error: {0}")]
    Transaction(#[source] DriverError),

    /// The driver refused to prepare the statement
    #[error("Preparation error: {0}")]
    Preparation(#[source] DriverError),

    /// A value could not be bound to its placeholder
    #[error("Binding error: {0}")]
    Binding(#[source] DriverError),

    /// Statement execution failed
    #[error("Execution error: {0}")]
    Execution(#[source] DriverError),

    /// Reading results (rows, affected count, last insert id) failed
    #[error("Fetch error: {0}")]
    Fetch(#[source] DriverError),
}

impl DrawerError {
    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this is a usage error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Check if this error was reported by the driver
    pub fn is_driver(&self) -> bool {
        self.driver_error().is_some()
    }

    /// The driver error behind this error, if any
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            Self::Connection(e)
            | Self::Transaction(e)
            | Self::Preparation(e)
            | Self::Binding(e)
            | Self::Execution(e)
            | Self::Fetch(e) => Some(e),
            Self::Usage(_) | Self::Configuration(_) => None,
        }
    }
}
