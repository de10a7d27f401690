use shelf_core::model::{Profile, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, map_profile_row};
use crate::repository::{ProfileRepository, StorageError};

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn upsert_profile(&self, profile: &Profile) -> Result<Profile, StorageError> {
        sqlx::query(
            r"
            INSERT INTO profiles (id, first_name, last_name, country, gender, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                country = excluded.country,
                gender = excluded.gender,
                updated_at = excluded.updated_at
            ",
        )
        .bind(profile.id().to_string())
        .bind(profile.first_name())
        .bind(profile.last_name())
        .bind(profile.country())
        .bind(profile.gender())
        .bind(profile.updated_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(profile.clone())
    }

    async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, first_name, last_name, country, gender, updated_at
            FROM profiles WHERE id = ?1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_profile_row).transpose()
    }
}
