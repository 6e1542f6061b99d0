//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the planning domain.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Kinds are kept distinguishable so the host boundary can map them
/// (`NotFound` to 404, `InsufficientData`/`InvalidParameter` to 422).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No historical series exists for the item.
    #[error("no demand history for item {item}")]
    NotFound { item: ItemId },

    /// The series is too short for the requested operation.
    #[error("{operation} needs at least {required} observation(s), got {available}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        available: usize,
    },

    /// A caller-supplied parameter is outside the supported range or set.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The historical series store failed to answer.
    #[error("series store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn not_found(item: ItemId) -> Self {
        Self::NotFound { item }
    }

    pub fn insufficient(operation: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            operation,
            required,
            available,
        }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// `true` for failures caused by the item's data rather than the request.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InsufficientData { .. })
    }
}

/// Fail with `InsufficientData` unless `available >= required`.
pub fn ensure_observations(
    operation: &'static str,
    required: usize,
    available: usize,
) -> DomainResult<()> {
    if available < required {
        return Err(DomainError::insufficient(operation, required, available));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_operation() {
        let err = DomainError::insufficient("linear regression", 2, 1);
        assert_eq!(
            err.to_string(),
            "linear regression needs at least 2 observation(s), got 1"
        );
        assert!(err.is_data_error());
    }

    #[test]
    fn ensure_observations_accepts_exact_minimum() {
        assert!(ensure_observations("seasonal", 4, 4).is_ok());
        assert!(matches!(
            ensure_observations("seasonal", 4, 3),
            Err(DomainError::InsufficientData { required: 4, available: 3, .. })
        ));
    }

    #[test]
    fn invalid_parameter_is_not_a_data_error() {
        assert!(!DomainError::invalid_parameter("periods_ahead must be >= 1").is_data_error());
        assert!(!DomainError::store("connection reset").is_data_error());
    }
}
