use std::fmt;

use serde_json::Value;

// =========================================================
// Error classification
// =========================================================

/// Error classes surfaced by the access layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No HTTP response was obtained (DNS, connection refused, timeout).
    Network,
    /// The server answered with a non-success status code.
    Http,
    /// A success response carried a body we could not decode.
    Decode,
    /// A request was rejected locally before any call was made.
    Invalid,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Http => "API_ERROR",
            ErrorKind::Decode => "DECODE_ERROR",
            ErrorKind::Invalid => "INVALID_REQUEST",
        }
    }
}

// =========================================================
// Core error type
// =========================================================

/// Error returned by every operation of the access layer.
///
/// - `status` is `Some` only for `Http` errors; callers distinguish
///   network failures from API failures by its absence.
/// - `details` carries the parsed server body, when one existed, so
///   callers can reach field-level validation messages.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub details: Option<Value>,
}

impl ApiError {
    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            kind: ErrorKind::Http,
            message: message.into(),
            status: Some(status),
            details,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    /// Session-invalid / expired-token class.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Validation failure carrying field-level messages.
    pub fn is_validation(&self) -> bool {
        self.status == Some(422)
    }

    /// Field-level messages from a validation response, if the server
    /// provided an `errors` array.
    pub fn validation_errors(&self) -> Vec<String> {
        self.details
            .as_ref()
            .and_then(|d| d.get("errors"))
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}] {} ({})", self.error_code(), self.message, status),
            None => write!(f, "[{}] {}", self.error_code(), self.message),
        }
    }
}

impl std::error::Error for ApiError {}

pub type Result<T> = std::result::Result<T, ApiError>;

// =========================================================
// Server message probing
// =========================================================

/// Pick the best available human-readable message out of an
/// inconsistently shaped error body.
///
/// Probe order: `message`, `error.message`, `errors[0]`. Returns `None`
/// when no probe yields a non-empty string.
pub fn extract_message(body: &Value) -> Option<String> {
    let probes = [
        body.get("message"),
        body.get("error").and_then(|e| e.get("message")),
        body.get("errors").and_then(|e| e.get(0)),
    ];

    probes
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probes_top_level_message() {
        let body = json!({ "message": "Trip not found" });
        assert_eq!(extract_message(&body).as_deref(), Some("Trip not found"));
    }

    #[test]
    fn probes_nested_error_message() {
        let body = json!({ "error": { "message": "Invalid token" } });
        assert_eq!(extract_message(&body).as_deref(), Some("Invalid token"));
    }

    #[test]
    fn probes_first_errors_entry() {
        let body = json!({ "errors": ["Email is taken", "Name is blank"] });
        assert_eq!(extract_message(&body).as_deref(), Some("Email is taken"));
    }

    #[test]
    fn message_wins_over_errors_array() {
        let body = json!({ "message": "Validation failed", "errors": ["Email is taken"] });
        assert_eq!(extract_message(&body).as_deref(), Some("Validation failed"));
    }

    #[test]
    fn empty_and_non_string_probes_are_skipped() {
        let body = json!({ "message": "   ", "errors": ["Fallback"] });
        assert_eq!(extract_message(&body).as_deref(), Some("Fallback"));

        let body = json!({ "message": 42 });
        assert_eq!(extract_message(&body), None);

        assert_eq!(extract_message(&json!({})), None);
        assert_eq!(extract_message(&Value::Null), None);
    }

    #[test]
    fn validation_errors_pass_through() {
        let err = ApiError::http(
            422,
            "Validation failed",
            Some(json!({ "errors": ["Email is taken", "Name is blank"] })),
        );
        assert!(err.is_validation());
        assert_eq!(err.validation_errors(), vec!["Email is taken", "Name is blank"]);
    }

    #[test]
    fn network_errors_carry_no_status() {
        let err = ApiError::network("connection refused");
        assert_eq!(err.status, None);
        assert_eq!(err.error_code(), "NETWORK_ERROR");
    }
}
