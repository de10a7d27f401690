use std::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown after an action.
///
/// Errors carry the backend's own text; friendlier wording, where there is
/// any, is already part of the service error's `Display`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: err.to_string(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::NewsletterServiceError;
    use storage::repository::StorageError;

    #[test]
    fn duplicate_subscription_is_friendly() {
        let err = NewsletterServiceError::from(StorageError::UniqueViolation(
            "duplicate key value violates unique constraint".into(),
        ));
        let notice = Notice::from_error(&err);
        assert!(notice.is_error());
        assert_eq!(notice.text, "this email is already subscribed to the newsletter");
    }

    #[test]
    fn other_errors_keep_backend_text() {
        let err = StorageError::Backend {
            code: None,
            message: "JWT expired".into(),
        };
        assert_eq!(Notice::from_error(&err).text, "JWT expired");
    }
}
