//! Structured error types for the ZenThera runtime.
//!
//! Domain errors stay HTTP-agnostic here; the web layer converts them into
//! response envelopes via `api_errors::ApiError`.

use thiserror::Error;

/// Main error type for the ZenThera runtime
#[derive(Error, Debug)]
pub enum ZentheraError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },

    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: String },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Shorthand Result used throughout the crate
pub type ZenResult<T> = Result<T, ZentheraError>;

impl ZentheraError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Helper trait for safe RwLock read operations
pub trait SafeRead<T: ?Sized> {
    /// Safely acquire a read lock, returning a ZentheraError on poison
    fn safe_read(&self) -> ZenResult<std::sync::RwLockReadGuard<'_, T>>;
}

impl<T: ?Sized> SafeRead<T> for std::sync::RwLock<T> {
    fn safe_read(&self) -> ZenResult<std::sync::RwLockReadGuard<'_, T>> {
        self.read().map_err(|_| ZentheraError::LockPoisoned {
            resource: "rwlock_read".to_string(),
        })
    }
}

/// Helper trait for safe RwLock write operations
pub trait SafeWrite<T: ?Sized> {
    /// Safely acquire a write lock, returning a ZentheraError on poison
    fn safe_write(&self) -> ZenResult<std::sync::RwLockWriteGuard<'_, T>>;
}

impl<T: ?Sized> SafeWrite<T> for std::sync::RwLock<T> {
    fn safe_write(&self) -> ZenResult<std::sync::RwLockWriteGuard<'_, T>> {
        self.write().map_err(|_| ZentheraError::LockPoisoned {
            resource: "rwlock_write".to_string(),
        })
    }
}

impl From<serde_json::Error> for ZentheraError {
    fn from(err: serde_json::Error) -> Self {
        ZentheraError::serialization("json_operation", err)
    }
}

impl From<std::io::Error> for ZentheraError {
    fn from(err: std::io::Error) -> Self {
        ZentheraError::io("io_operation", err)
    }
}

impl From<String> for ZentheraError {
    fn from(err: String) -> Self {
        ZentheraError::Internal { message: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = ZentheraError::config("missing configuration file");
        assert!(config_err.to_string().contains("Configuration error"));

        let nf = ZentheraError::not_found("alert", "alert_001");
        assert!(nf.to_string().contains("alert_001"));
    }

    #[test]
    fn test_safe_lock_on_healthy_lock() {
        let lock = std::sync::RwLock::new(5u32);
        assert_eq!(*lock.safe_read().unwrap(), 5);
        *lock.safe_write().unwrap() = 7;
        assert_eq!(*lock.safe_read().unwrap(), 7);
    }
}
