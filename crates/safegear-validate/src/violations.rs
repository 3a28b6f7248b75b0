//! Structured validation violations.

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    /// Field the violation refers to ("__all__" for cross-field rules).
    pub field: String,
    /// Machine-readable violation code.
    pub code: String,
    /// Human-readable message for display.
    pub message: String,
}

/// Validate a payload, collecting failures into a sorted violation list.
pub fn check<T: Validate>(payload: &T) -> Result<(), Vec<Violation>> {
    match payload.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(collect(&errors)),
    }
}

/// Flatten `ValidationErrors` into violations, sorted by field then code
/// so the output is stable for display and tests.
fn collect(errors: &ValidationErrors) -> Vec<Violation> {
    let mut out: Vec<Violation> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| Violation {
                field: field.to_string(),
                code: e.code.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
    out
}

/// Build a `ValidationError` with a fixed code and message.
pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
        #[validate(range(min = 0.0))]
        amount: f64,
    }

    #[test]
    fn test_ok_payload_has_no_violations() {
        let sample = Sample {
            name: "gloves".into(),
            amount: 12.5,
        };
        assert!(check(&sample).is_ok());
    }

    #[test]
    fn test_violations_are_structured_and_sorted() {
        let sample = Sample {
            name: "ab".into(),
            amount: -1.0,
        };
        let violations = check(&sample).unwrap_err();
        assert_eq!(violations.len(), 2);

        assert_eq!(violations[0].field, "amount");
        assert_eq!(violations[0].code, "range");

        assert_eq!(violations[1].field, "name");
        assert_eq!(violations[1].code, "length");
        assert_eq!(violations[1].message, "too short");
    }
}
