/// Input validation helpers shared by the request DTOs
use validator::ValidationErrors;

/// Flatten validator's per-field error map into the single comma-joined
/// message string the API returns in its 400 envelope.
pub fn join_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |err| match &err.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid value ({})", field, err.code),
            })
        })
        .collect();

    // HashMap iteration order is unstable; keep messages deterministic
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(email(message = "must be a valid email"))]
        email: String,

        #[validate(length(max = 25, message = "must be at most 25 characters"))]
        name: String,
    }

    #[test]
    fn test_valid_input_passes() {
        let probe = Probe {
            email: "user@example.com".into(),
            name: "Ada".into(),
        };
        assert!(probe.validate().is_ok());
    }

    #[test]
    fn test_messages_are_joined_and_sorted() {
        let probe = Probe {
            email: "nope".into(),
            name: "x".repeat(30),
        };
        let errors = probe.validate().unwrap_err();
        let joined = join_validation_errors(&errors);

        assert_eq!(
            joined,
            "email: must be a valid email, name: must be at most 25 characters"
        );
    }

    #[test]
    fn test_single_error_has_no_separator() {
        let probe = Probe {
            email: "nope".into(),
            name: "Ada".into(),
        };
        let errors = probe.validate().unwrap_err();
        assert_eq!(join_validation_errors(&errors), "email: must be a valid email");
    }
}
