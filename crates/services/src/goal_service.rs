use std::sync::Arc;

use shelf_core::model::{ReadingGoal, ReadingGoalDraft, UserId};
use shelf_core::progress::GoalPace;
use storage::repository::ReadingGoalRepository;

use crate::Clock;
use crate::auth::SessionState;
use crate::error::GoalServiceError;

/// The signed-in user's single reading goal.
#[derive(Clone)]
pub struct GoalService {
    clock: Clock,
    session: SessionState,
    goals: Arc<dyn ReadingGoalRepository>,
}

impl GoalService {
    #[must_use]
    pub fn new(clock: Clock, session: SessionState, goals: Arc<dyn ReadingGoalRepository>) -> Self {
        Self {
            clock,
            session,
            goals,
        }
    }

    fn user_id(&self) -> Result<UserId, GoalServiceError> {
        self.session.user_id().ok_or(GoalServiceError::NotSignedIn)
    }

    /// Replace the goal wholesale; `created_at` is reset to now.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::Goal` for invalid fields, or storage errors.
    pub async fn set_goal(&self, draft: ReadingGoalDraft) -> Result<ReadingGoal, GoalServiceError> {
        let user_id = self.user_id()?;
        let goal = draft.validate(user_id, self.clock.now())?;
        let stored = self.goals.upsert_goal(&goal).await?;
        log::info!(
            "reading goal set: {} pages per {}",
            stored.target_pages(),
            stored.period()
        );
        Ok(stored)
    }

    /// The current goal translated into a daily pace, if one is set.
    ///
    /// # Errors
    ///
    /// Returns `GoalServiceError::Storage` on failures.
    pub async fn current_goal(&self) -> Result<Option<GoalPace>, GoalServiceError> {
        let user_id = self.user_id()?;
        let goal = self.goals.goal_for_user(user_id).await?;
        Ok(goal.as_ref().map(GoalPace::from_goal))
    }
}
