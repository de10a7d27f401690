//! Table query builder for the hosted table API.
//!
//! Produces `/rest/v1/{table}` paths plus query parameters such as
//! `select=*`, `user_id=eq.<uuid>`, `order=created_at.desc` and `limit=1`.

use std::fmt::Display;

use reqwest::Url;

use crate::repository::StorageError;

pub(crate) const REST_PREFIX: &str = "rest/v1/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: &'static str,
    params: Vec<(String, String)>,
}

impl TableQuery {
    #[must_use]
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.into()));
        self
    }

    /// Equality filter, `column=eq.value`.
    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.into(), format!("eq.{value}")));
        self
    }

    /// Descending order; repeated calls add tie-breakers.
    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        let term = format!("{column}.desc");
        match self.params.iter_mut().find(|(k, _)| k == "order") {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&term);
            }
            None => self.params.push(("order".into(), term)),
        }
        self
    }

    #[must_use]
    pub fn limit(mut self, n: u32) -> Self {
        self.params.push(("limit".into(), n.to_string()));
        self
    }

    /// Conflict target for upserts.
    #[must_use]
    pub fn on_conflict(mut self, column: &str) -> Self {
        self.params.push(("on_conflict".into(), column.into()));
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &'static str {
        self.table
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Full request URL against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if `base_url` is not a valid URL.
    pub fn to_url(&self, base_url: &str) -> Result<Url, StorageError> {
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .and_then(|b| b.join(&format!("{REST_PREFIX}{}", self.table)))
            .map_err(|e| StorageError::Connection(format!("invalid backend url: {e}")))?;
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(self.params.iter());
        }
        Ok(url)
    }
}
