//! Typed errors for Rust-level construction failures.
//!
//! Most operations in this core report predictable failure as `bool`
//! (immutability rejection) or `Option` (absent key), and most embedder-
//! facing contract violations surface as a `Value` (see
//! [`crate::value::Value::error`]), never by panicking. `CoreError` covers
//! the remaining case: a handful of constructors, such as
//! [`crate::hashtable::HashTable::new`], are not handed a `Value` to build
//! an error into and reject a bad argument before any `Value` exists, so
//! they return a plain `Result<_, CoreError>` instead.
//!
//! Internal invariant breaches (the Custom-equivalence identity guard) are
//! not representable as `CoreError` at all: they indicate a bug in the
//! embedder, not a recoverable argument error, and are fatal (`panic!`).

use std::fmt;

use crate::value::ValueType;

/// A rejected constructor argument: wrong type, or otherwise out of the
/// range an operation's precondition requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreError {
    pub message: String,
    pub offending_type: Option<ValueType>,
}

impl CoreError {
    pub fn new(message: impl Into<String>) -> Self {
        CoreError {
            message: message.into(),
            offending_type: None,
        }
    }

    pub fn wrong_type(expected: &str, got: ValueType) -> Self {
        CoreError {
            message: format!("expected {expected}, got {got}"),
            offending_type: Some(got),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_type_carries_offending_type() {
        let err = CoreError::wrong_type("number", ValueType::Pair);
        assert_eq!(err.offending_type, Some(ValueType::Pair));
        assert!(err.message.contains("number"));
    }
}
