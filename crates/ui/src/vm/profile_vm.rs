use services::ProfileOverview;
use shelf_core::model::Profile;

use crate::vm::time_fmt::format_datetime;

/// Avatar initials: first letters of first and last name, else the
/// upper-cased first letter of the email, else `U`.
#[must_use]
pub fn initials(profile: Option<&Profile>, email: Option<&str>) -> String {
    let names = profile.and_then(|p| Some((p.first_name()?, p.last_name()?)));
    if let Some((first, last)) = names {
        let mut out = String::new();
        out.extend(first.chars().next());
        out.extend(last.chars().next());
        return out;
    }
    email
        .and_then(|e| e.chars().next())
        .map_or_else(|| "U".to_owned(), |c| c.to_uppercase().collect())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileStatsVm {
    pub heading: String,
    pub display_name: String,
    pub initials: String,
    pub email: Option<String>,
    pub country: Option<String>,
    pub updated_at_str: Option<String>,
    pub read: usize,
    pub reading: usize,
    pub to_read: usize,
}

impl From<&ProfileOverview> for ProfileStatsVm {
    fn from(overview: &ProfileOverview) -> Self {
        let profile = overview.profile.as_ref();
        let first_name = profile.and_then(Profile::first_name).unwrap_or("User");
        let display_name = profile
            .and_then(Profile::full_name)
            .or_else(|| overview.email.clone())
            .unwrap_or_else(|| "User".to_owned());

        Self {
            heading: format!("{first_name} Profile"),
            display_name,
            initials: initials(profile, overview.email.as_deref()),
            email: overview.email.clone(),
            country: profile.and_then(Profile::country).map(str::to_owned),
            updated_at_str: profile.and_then(Profile::updated_at).map(format_datetime),
            read: overview.counts.read,
            reading: overview.counts.reading,
            to_read: overview.counts.to_read,
        }
    }
}
