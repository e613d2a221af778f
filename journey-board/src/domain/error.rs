//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from provider/IO errors and never abort a batch: callers log
//! them and drop the offending record.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Invalid leg construction (e.g., arrival before departure)
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// A connection does not follow on from the first leg
    #[error("invalid connection: {0}")]
    InvalidConnection(&'static str),

    /// A one-change journey was built with nothing to change onto
    #[error("one-change journey must have at least one connection")]
    NoConnections,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidLeg("arrival must be after departure");
        assert_eq!(
            err.to_string(),
            "invalid leg: arrival must be after departure"
        );

        let err = DomainError::InvalidConnection("departs before arrival");
        assert_eq!(err.to_string(), "invalid connection: departs before arrival");

        let err = DomainError::NoConnections;
        assert_eq!(
            err.to_string(),
            "one-change journey must have at least one connection"
        );
    }
}
