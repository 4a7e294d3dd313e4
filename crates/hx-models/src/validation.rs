//! Structured validation errors with field paths

use serde::Serialize;
use std::fmt;

/// A single failed check, anchored to the field that failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path to the offending field, e.g. `items[3].language`
    pub path: String,

    /// Human-readable description of the failure
    pub message: String,
}

/// Every validation failure found in a record or collection.
///
/// Checks are not short-circuited: a record with three bad fields reports
/// all three, and a collection prefixes each record's errors with its index
/// so callers can render them for user display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    /// Accumulated field errors, in the order the checks ran
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { path: path.into(), message: message.into() });
    }

    /// Absorb another aggregate, prefixing each of its paths
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for err in other.errors {
            let path =
                if err.path.is_empty() { prefix.to_string() } else { format!("{prefix}.{}", err.path) };
            self.errors.push(FieldError { path, message: err.message });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Resolve to `value` when no check failed, otherwise to `self`
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "the input contained the following problems:")?;
        for err in &self.errors {
            writeln!(f, "  * {} - {}", err.path, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_display() {
        let mut errors = ValidationErrors::new();
        errors.push("language", "field required");
        errors.push("contents", "too long");
        let rendered = errors.to_string();
        assert!(rendered.contains("* language - field required"));
        assert!(rendered.contains("* contents - too long"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_extend_prefixed() {
        let mut inner = ValidationErrors::new();
        inner.push("date", "could not parse");
        let mut outer = ValidationErrors::new();
        outer.extend_prefixed("items[3]", inner);
        assert_eq!(outer.errors[0].path, "items[3].date");
    }

    #[test]
    fn test_into_result() {
        let clean = ValidationErrors::new();
        assert_eq!(clean.into_result(42).unwrap(), 42);

        let mut dirty = ValidationErrors::new();
        dirty.push("guid", "duplicate");
        assert!(dirty.into_result(42).is_err());
    }
}
