use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::error::{FieldError, FieldErrors};
use crate::model::form;
use crate::model::ids::UserId;

/// Gender options offered by the profile form.
pub const GENDER_OPTIONS: [&str; 4] = ["male", "female", "other", "prefer-not-to-say"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("invalid gender option: {0}")]
    InvalidGender(String),
}

impl FieldError for ProfileError {
    fn field(&self) -> &'static str {
        match self {
            ProfileError::InvalidGender(_) => "gender",
        }
    }
}

/// Raw input of the profile form. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
}

impl ProfileDraft {
    /// Prefill from the stored profile.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            country: profile.country.clone(),
            gender: profile.gender.clone(),
        }
    }

    /// Validate into the full profile row that replaces the stored one.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidGender` when gender is not one of [`GENDER_OPTIONS`].
    pub fn validate(
        self,
        id: UserId,
        updated_at: DateTime<Utc>,
    ) -> Result<Profile, FieldErrors<ProfileError>> {
        let mut errors = FieldErrors::new();
        let gender = form::normalize_optional(self.gender);
        if let Some(value) = gender.as_deref() {
            if !GENDER_OPTIONS.contains(&value) {
                errors.push(ProfileError::InvalidGender(value.to_owned()));
            }
        }

        errors.finish(|| Profile {
            id,
            first_name: form::normalize_optional(self.first_name),
            last_name: form::normalize_optional(self.last_name),
            country: form::normalize_optional(self.country),
            gender,
            updated_at: Some(updated_at),
        })
    }
}

/// Personal details attached to a user. Upserted as a whole row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    id: UserId,
    first_name: Option<String>,
    last_name: Option<String>,
    country: Option<String>,
    gender: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    #[must_use]
    pub fn from_persisted(
        id: UserId,
        first_name: Option<String>,
        last_name: Option<String>,
        country: Option<String>,
        gender: Option<String>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            first_name: form::normalize_optional(first_name),
            last_name: form::normalize_optional(last_name),
            country: form::normalize_optional(country),
            gender: form::normalize_optional(gender),
            updated_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[must_use]
    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// `"first last"` when at least one name is set.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name(), self.last_name()) {
            (None, None) => None,
            (first, last) => Some(
                format!("{} {}", first.unwrap_or(""), last.unwrap_or(""))
                    .trim()
                    .to_owned(),
            ),
        }
    }
}
