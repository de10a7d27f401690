use shelf_core::model::NewsletterSubscription;

use super::SqliteRepository;
use super::mapping::db_err;
use crate::repository::{NewsletterRepository, StorageError};

#[async_trait::async_trait]
impl NewsletterRepository for SqliteRepository {
    async fn subscribe(&self, subscription: &NewsletterSubscription) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO newsletter_subscribers (email, subscribed_at) VALUES (?1, ?2)")
            .bind(subscription.email())
            .bind(subscription.subscribed_at())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
