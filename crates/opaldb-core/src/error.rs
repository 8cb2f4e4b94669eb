use std::fmt;
use thiserror::Error as ThisError;

///
/// StoreError
///
/// Structured runtime error with a stable internal classification.
/// Every failure surfaced by the engine carries an [`ErrorClass`] (what went
/// wrong) and an [`ErrorOrigin`] (which subsystem raised it).
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{origin}:{class}: {message}")]
pub struct StoreError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl StoreError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a data error: an invalid key, range, or query shape.
    pub(crate) fn data(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Data, origin, message)
    }

    /// Construct a conflict error: a duplicate primary or unique-index key.
    pub(crate) fn conflict(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Conflict, origin, message)
    }

    /// Construct a missing-parameter error for a named required argument.
    pub(crate) fn missing_parameter(origin: ErrorOrigin, name: &str) -> Self {
        Self::new(
            ErrorClass::MissingParameter,
            origin,
            format!("required parameter missing: {name}"),
        )
    }

    /// Construct an invalid-state error: operation on a finished or torn-down
    /// target.
    pub(crate) fn invalid_state(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidState, origin, message)
    }

    /// Construct an access error: a call routed around an active lease.
    pub(crate) fn access(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Access, origin, message)
    }

    /// Construct a read-only error: a write attempted under a readonly mode.
    pub(crate) fn read_only(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::ReadOnly, origin, message)
    }

    /// Construct a transaction-inactive error.
    pub(crate) fn transaction_inactive(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::TransactionInactive,
            ErrorOrigin::Transaction,
            message,
        )
    }

    /// Construct a not-found error for a hard-failure lookup.
    pub(crate) fn not_found(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, origin, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.class, ErrorClass::Conflict)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///
/// Failure taxonomy. Data-dependent classes (`Conflict`) abort only the
/// single operation that triggered them; the rest are boundary-contract
/// violations and fail fast. Nothing is retried internally.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Access,
    Conflict,
    Data,
    InvalidState,
    MissingParameter,
    NotFound,
    ReadOnly,
    TransactionInactive,
}

impl fmt::Display for ErrorClass {
    #[remain::check]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[sorted]
        match self {
            Self::Access => write!(f, "access"),
            Self::Conflict => write!(f, "conflict"),
            Self::Data => write!(f, "data"),
            Self::InvalidState => write!(f, "invalid_state"),
            Self::MissingParameter => write!(f, "missing_parameter"),
            Self::NotFound => write!(f, "not_found"),
            Self::ReadOnly => write!(f, "read_only"),
            Self::TransactionInactive => write!(f, "transaction_inactive"),
        }
    }
}

///
/// ErrorOrigin
///
/// Subsystem taxonomy for runtime classification.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Index,
    Key,
    Path,
    Query,
    Store,
    Transaction,
    Value,
}

impl fmt::Display for ErrorOrigin {
    #[remain::check]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[sorted]
        match self {
            Self::Index => write!(f, "index"),
            Self::Key => write!(f, "key"),
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Store => write!(f, "store"),
            Self::Transaction => write!(f, "transaction"),
            Self::Value => write!(f, "value"),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_origin_and_class() {
        let err = StoreError::conflict(ErrorOrigin::Index, "duplicate index key");
        assert_eq!(err.to_string(), "index:conflict: duplicate index key");
        assert_eq!(err.display_with_class(), err.to_string());
    }

    #[test]
    fn classification_predicates() {
        assert!(StoreError::not_found(ErrorOrigin::Store, "missing").is_not_found());
        assert!(StoreError::conflict(ErrorOrigin::Store, "dup").is_conflict());
        assert!(!StoreError::data(ErrorOrigin::Key, "bad key").is_conflict());
    }
}
