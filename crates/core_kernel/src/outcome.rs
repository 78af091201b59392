//! Result-with-warning for partially-completed operations
//!
//! Some operations must never be rolled back once the first write lands:
//! a recorded payment survives a failed allocation insert, a generated
//! document survives a failed upload. `Outcome` carries the completed value
//! together with an independent advisory warning so callers see the partial
//! state instead of losing it behind a hard error.

use serde::{Deserialize, Serialize};

/// A successful value, optionally accompanied by an advisory warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// The completed (possibly partially-completed) result
    pub value: T,
    /// Advisory warning describing any follow-up the caller should make
    pub warning: Option<String>,
}

impl<T> Outcome<T> {
    /// Creates a clean outcome with no warning
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// Creates an outcome carrying an advisory warning
    pub fn with_warning(value: T, warning: impl Into<String>) -> Self {
        Self {
            value,
            warning: Some(warning.into()),
        }
    }

    /// Returns true if the operation completed without advisories
    pub fn is_clean(&self) -> bool {
        self.warning.is_none()
    }

    /// Maps the value, preserving any warning
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warning: self.warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_outcome() {
        let outcome = Outcome::ok(7);
        assert!(outcome.is_clean());
        assert_eq!(outcome.value, 7);
    }

    #[test]
    fn test_outcome_with_warning() {
        let outcome = Outcome::with_warning(7, "allocation insert failed");
        assert!(!outcome.is_clean());
        assert_eq!(outcome.warning.as_deref(), Some("allocation insert failed"));
    }

    #[test]
    fn test_outcome_map_preserves_warning() {
        let outcome = Outcome::with_warning(7, "partial").map(|v| v * 2);
        assert_eq!(outcome.value, 14);
        assert_eq!(outcome.warning.as_deref(), Some("partial"));
    }
}
