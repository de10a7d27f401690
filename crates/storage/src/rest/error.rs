use reqwest::StatusCode;
use serde::Deserialize;

use crate::repository::StorageError;

/// Postgres `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// Postgres `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// Table API: a single-object request matched no rows.
pub const NO_ROWS: &str = "PGRST116";

/// Error body returned by the table API.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Map a failed response to a `StorageError`, keeping the backend's message.
pub(crate) fn from_response(status: StatusCode, body: &str) -> StorageError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback_message(status, body));

    if let Some(details) = parsed.details.as_deref().or(parsed.hint.as_deref()) {
        log::debug!("backend error details: {details}");
    }

    match parsed.code.as_deref() {
        Some(UNIQUE_VIOLATION) => return StorageError::UniqueViolation(message),
        Some(NO_ROWS | FOREIGN_KEY_VIOLATION) => return StorageError::NotFound,
        _ => {}
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return StorageError::Unauthorized(message);
    }
    StorageError::Backend {
        code: parsed.code,
        message,
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_keeps_message() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint \"newsletter_subscribers_email_key\"","details":null,"hint":null}"#;
        let err = from_response(StatusCode::CONFLICT, body);
        match err {
            StorageError::UniqueViolation(msg) => assert!(msg.starts_with("duplicate key")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_rows_is_not_found() {
        let body = r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#;
        assert!(matches!(
            from_response(StatusCode::NOT_ACCEPTABLE, body),
            StorageError::NotFound
        ));
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        let body = r#"{"code":"42501","message":"permission denied for table books"}"#;
        assert!(matches!(
            from_response(StatusCode::FORBIDDEN, body),
            StorageError::Unauthorized(msg) if msg == "permission denied for table books"
        ));
    }

    #[test]
    fn other_errors_surface_raw_message() {
        let err = from_response(StatusCode::BAD_REQUEST, r#"{"code":"22P02","message":"invalid input syntax for type uuid"}"#);
        assert_eq!(err.to_string(), "invalid input syntax for type uuid");

        let plain = from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(plain.to_string(), "upstream down");

        let empty = from_response(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(empty.to_string(), "503 Service Unavailable");
    }
}
