use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{FieldError, FieldErrors};
use crate::model::form::{self, Positive};
use crate::model::ids::UserId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GoalError {
    #[error("target pages must be a positive number")]
    NonPositiveTarget,

    #[error("please select a period")]
    MissingPeriod,

    #[error("invalid goal period: {0}")]
    InvalidPeriod(String),
}

impl FieldError for GoalError {
    fn field(&self) -> &'static str {
        match self {
            GoalError::NonPositiveTarget => "target_pages",
            GoalError::MissingPeriod | GoalError::InvalidPeriod(_) => "period",
        }
    }
}

//
// ─── PERIOD ────────────────────────────────────────────────────────────────────
//

/// Time window a reading goal is spread over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Week,
    Month,
}

impl GoalPeriod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GoalPeriod::Week => "week",
            GoalPeriod::Month => "month",
        }
    }

    /// Days the target is spread over; a month is a flat 30 days.
    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            GoalPeriod::Week => 7,
            GoalPeriod::Month => 30,
        }
    }
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalPeriod {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "week" => Ok(GoalPeriod::Week),
            "month" => Ok(GoalPeriod::Month),
            "" => Err(GoalError::MissingPeriod),
            other => Err(GoalError::InvalidPeriod(other.to_owned())),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Raw input of the reading-goal form. Both fields start empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadingGoalDraft {
    pub target_pages: String,
    pub period: Option<String>,
}

impl ReadingGoalDraft {
    /// Validate the draft into the goal for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns every failing field: non-positive target, missing or unknown period.
    pub fn validate(
        self,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<ReadingGoal, FieldErrors<GoalError>> {
        let mut errors = FieldErrors::new();

        let target_pages = match form::parse_positive(Some(&self.target_pages)) {
            Positive::Value(v) => v,
            Positive::Missing | Positive::Invalid => {
                errors.push(GoalError::NonPositiveTarget);
                0
            }
        };
        let period = match self.period.as_deref().unwrap_or("").parse::<GoalPeriod>() {
            Ok(period) => Some(period),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        errors.finish(|| ReadingGoal {
            user_id,
            target_pages,
            period: period.unwrap_or(GoalPeriod::Week),
            created_at,
        })
    }
}

//
// ─── GOAL ──────────────────────────────────────────────────────────────────────
//

/// A user's single reading goal. Setting a new one replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingGoal {
    user_id: UserId,
    target_pages: u32,
    period: GoalPeriod,
    created_at: DateTime<Utc>,
}

impl ReadingGoal {
    /// Rehydrate a goal from storage.
    ///
    /// # Errors
    ///
    /// Returns `GoalError::NonPositiveTarget` when `target_pages` is zero.
    pub fn from_persisted(
        user_id: UserId,
        target_pages: u32,
        period: GoalPeriod,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GoalError> {
        if target_pages == 0 {
            return Err(GoalError::NonPositiveTarget);
        }
        Ok(Self {
            user_id,
            target_pages,
            period,
            created_at,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn target_pages(&self) -> u32 {
        self.target_pages
    }

    #[must_use]
    pub fn period(&self) -> GoalPeriod {
        self.period
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn period_days() {
        assert_eq!(GoalPeriod::Week.days(), 7);
        assert_eq!(GoalPeriod::Month.days(), 30);
    }

    #[test]
    fn empty_draft_reports_both_fields() {
        let errors = ReadingGoalDraft::default()
            .validate(UserId::random(), fixed_now())
            .unwrap_err();
        assert_eq!(
            errors.errors(),
            &[GoalError::NonPositiveTarget, GoalError::MissingPeriod]
        );
    }

    #[test]
    fn unknown_period_is_rejected() {
        let draft = ReadingGoalDraft {
            target_pages: "300".into(),
            period: Some("year".into()),
        };
        let errors = draft.validate(UserId::random(), fixed_now()).unwrap_err();
        assert_eq!(
            errors.for_field("period"),
            Some(&GoalError::InvalidPeriod("year".into()))
        );
    }

    #[test]
    fn valid_draft_builds_goal() {
        let user = UserId::random();
        let goal = ReadingGoalDraft {
            target_pages: "700".into(),
            period: Some("month".into()),
        }
        .validate(user, fixed_now())
        .unwrap();
        assert_eq!(goal.user_id(), user);
        assert_eq!(goal.target_pages(), 700);
        assert_eq!(goal.period(), GoalPeriod::Month);
        assert_eq!(goal.created_at(), fixed_now());
    }
}
