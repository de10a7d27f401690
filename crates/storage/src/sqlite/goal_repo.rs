use shelf_core::model::{ReadingGoal, UserId};

use super::SqliteRepository;
use super::mapping::{db_err, map_goal_row};
use crate::repository::{ReadingGoalRepository, StorageError};

#[async_trait::async_trait]
impl ReadingGoalRepository for SqliteRepository {
    async fn upsert_goal(&self, goal: &ReadingGoal) -> Result<ReadingGoal, StorageError> {
        sqlx::query(
            r"
            INSERT INTO reading_goals (user_id, target_pages, period, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                target_pages = excluded.target_pages,
                period = excluded.period,
                created_at = excluded.created_at
            ",
        )
        .bind(goal.user_id().to_string())
        .bind(i64::from(goal.target_pages()))
        .bind(goal.period().as_str())
        .bind(goal.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(goal.clone())
    }

    async fn goal_for_user(&self, user_id: UserId) -> Result<Option<ReadingGoal>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, target_pages, period, created_at
            FROM reading_goals WHERE user_id = ?1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_goal_row).transpose()
    }
}
