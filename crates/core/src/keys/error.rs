use thiserror::Error;

/// Errors raised while decoding a key from its canonical string form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown key prefix: {0}")]
    UnknownPrefix(String),
    #[error("invalid {prefix} payload: {reason}")]
    InvalidPayload {
        prefix: &'static str,
        reason: String,
    },
    #[error("{key} is not permitted as {expected}")]
    NotPermitted { key: String, expected: &'static str },
}

impl KeyError {
    pub(crate) fn invalid(prefix: &'static str, reason: impl Into<String>) -> Self {
        KeyError::InvalidPayload {
            prefix,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_prefix_display() {
        let error = KeyError::UnknownPrefix("NOPE#1".to_string());
        assert_eq!(error.to_string(), "unknown key prefix: NOPE#1");
    }

    #[test]
    fn test_invalid_payload_display() {
        let error = KeyError::invalid("SCHEDULEDDAY#", "not a date");
        assert_eq!(
            error.to_string(),
            "invalid SCHEDULEDDAY# payload: not a date"
        );
    }

    #[test]
    fn test_not_permitted_display() {
        let error = KeyError::NotPermitted {
            key: "ATTORNEY#a".to_string(),
            expected: "lpa owner",
        };
        assert_eq!(error.to_string(), "ATTORNEY#a is not permitted as lpa owner");
    }
}
