use std::sync::Arc;

use shelf_core::model::NewsletterSubscription;
use storage::repository::NewsletterRepository;

use crate::Clock;
use crate::error::NewsletterServiceError;

/// Newsletter signups. No account is needed.
#[derive(Clone)]
pub struct NewsletterService {
    clock: Clock,
    subscribers: Arc<dyn NewsletterRepository>,
}

impl NewsletterService {
    #[must_use]
    pub fn new(clock: Clock, subscribers: Arc<dyn NewsletterRepository>) -> Self {
        Self { clock, subscribers }
    }

    /// Subscribe `email`, returning the normalized address.
    ///
    /// # Errors
    ///
    /// Returns `NewsletterServiceError::Invalid` for malformed addresses,
    /// `NewsletterServiceError::AlreadySubscribed` for duplicates, or storage errors.
    pub async fn subscribe(&self, email: &str) -> Result<String, NewsletterServiceError> {
        let subscription = NewsletterSubscription::new(email, self.clock.now())?;
        self.subscribers.subscribe(&subscription).await?;
        log::info!("newsletter subscription added");
        Ok(subscription.email().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn duplicate_email_is_friendly() {
        let svc = NewsletterService::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        assert_eq!(
            svc.subscribe("Reader@Example.com").await.unwrap(),
            "reader@example.com"
        );
        let err = svc.subscribe("reader@example.com ").await.unwrap_err();
        assert!(matches!(err, NewsletterServiceError::AlreadySubscribed));
    }

    #[tokio::test]
    async fn malformed_email_never_reaches_storage() {
        let svc = NewsletterService::new(fixed_clock(), Arc::new(InMemoryRepository::new()));
        assert!(matches!(
            svc.subscribe("not-an-email").await,
            Err(NewsletterServiceError::Invalid(_))
        ));
    }
}
