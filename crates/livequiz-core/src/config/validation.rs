//! Configuration validation utilities

use crate::errors::QuizError;
use std::fmt;

/// Configuration validation result
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is out of acceptable range
    OutOfRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
        actual: f64,
    },
    /// Custom validation failed
    Custom { field: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                let range_desc = match (min, max) {
                    (Some(min), Some(max)) => format!("between {min} and {max}"),
                    (Some(min), None) => format!("at least {min}"),
                    (None, Some(max)) => format!("at most {max}"),
                    (None, None) => "in valid range".to_string(),
                };
                write!(f, "Field '{field}' must be {range_desc} (got {actual})")
            }
            ValidationError::Custom { field, message } => {
                write!(f, "Field '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for QuizError {
    fn from(err: ValidationError) -> Self {
        QuizError::config(err.to_string())
    }
}

/// Configuration validator that accumulates validation rules
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that a number is within range
    pub fn range<T>(&mut self, field_name: &str, value: T, min: Option<T>, max: Option<T>) -> &mut Self
    where
        T: PartialOrd + Copy + Into<f64>,
    {
        let below = min.is_some_and(|min| value < min);
        let above = max.is_some_and(|max| value > max);

        if below || above {
            self.errors.push(ValidationError::OutOfRange {
                field: field_name.to_string(),
                min: min.map(Into::into),
                max: max.map(Into::into),
                actual: value.into(),
            });
        }

        self
    }

    /// Validate using a custom predicate
    pub fn custom<T, F>(&mut self, field_name: &str, value: &T, predicate: F, message: &str) -> &mut Self
    where
        T: ?Sized,
        F: FnOnce(&T) -> bool,
    {
        if !predicate(value) {
            self.errors.push(ValidationError::Custom {
                field: field_name.to_string(),
                message: message.to_string(),
            });
        }
        self
    }

    /// Get validation result with every accumulated error
    pub fn result(self) -> ValidationResult {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_all_errors() {
        let mut validator = ConfigValidator::new();
        validator
            .range("allocation_attempts", 0u32, Some(1), None)
            .range("publish_timeout_ms", 10u32, Some(1), Some(100))
            .custom("question_event", "", |s: &str| !s.is_empty(), "must not be empty");

        let errors = validator.result().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "Field 'allocation_attempts' must be at least 1 (got 0)"
        );
        assert_eq!(
            errors[1].to_string(),
            "Field 'question_event': must not be empty"
        );
    }
}
