//! Bridge from `validator` derive output to [`CoreError::Validation`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run `validator` checks on `input`, flattening failures into one message.
pub fn validate<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(flatten(&errors)))
}

/// Render field errors as `field: message; field: message`, sorted by field.
fn flatten(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| match &err.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Trim `value`, mapping an empty result to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email)]
        email: Option<String>,
    }

    #[test]
    fn valid_input_passes() {
        let sample = Sample {
            name: "Oak Street".into(),
            email: Some("owner@example.com".into()),
        };
        assert!(validate(&sample).is_ok());
    }

    #[test]
    fn failures_are_flattened_and_sorted() {
        let sample = Sample {
            name: String::new(),
            email: Some("nope".into()),
        };
        let err = validate(&sample).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg == "email: email; name: Name is required");
    }

    #[test]
    fn non_blank_trims_and_drops_empty() {
        assert_eq!(non_blank(Some("  hi ".into())), Some("hi".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}
