//! Repositories backed by the hosted table API.
//!
//! Every request carries the project's anon key as `apikey` and the signed-in
//! user's access token as bearer auth. Row-level security on the backend is
//! what actually scopes rows to the user; the `user_id` filters sent here only
//! narrow the result.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{Storage, StorageError};

mod error;
mod query;
mod repos;
mod rows;

pub use error::{FOREIGN_KEY_VIOLATION, NO_ROWS, UNIQUE_VIOLATION};
pub use query::TableQuery;

/// Supplies the bearer token for table requests.
///
/// Implemented by the session state so storage never sees the auth flow.
pub trait AccessTokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// No session: requests go out with the anon key only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl AccessTokenSource for Anonymous {
    fn access_token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub anon_key: String,
}

/// `Prefer` header values understood by the table API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prefer {
    Representation,
    Minimal,
    MergeDuplicates,
}

impl Prefer {
    fn header_value(self) -> &'static str {
        match self {
            Prefer::Representation => "return=representation",
            Prefer::Minimal => "return=minimal",
            Prefer::MergeDuplicates => "resolution=merge-duplicates,return=representation",
        }
    }
}

#[derive(Clone)]
pub struct RestRepository {
    client: Client,
    config: RestConfig,
    tokens: Arc<dyn AccessTokenSource>,
}

impl RestRepository {
    #[must_use]
    pub fn new(config: RestConfig, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            client: Client::new(),
            config,
            tokens,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn auth_headers(&self) -> Result<HeaderMap, StorageError> {
        let bearer = self
            .tokens
            .access_token()
            .unwrap_or_else(|| self.config.anon_key.clone());
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.config.anon_key)
                .map_err(|e| StorageError::Connection(format!("invalid anon key: {e}")))?,
        );
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {bearer}"))
                .map_err(|e| StorageError::Connection(format!("invalid access token: {e}")))?,
        );
        Ok(headers)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        query: &TableQuery,
        prefer: Option<Prefer>,
    ) -> Result<RequestBuilder, StorageError> {
        let url = query.to_url(&self.config.base_url)?;
        log::debug!("{method} {}", url.as_str());
        let mut builder = self
            .client
            .request(method, url)
            .headers(self.auth_headers()?);
        if let Some(prefer) = prefer {
            builder = builder.header("Prefer", prefer.header_value());
        }
        Ok(builder)
    }

    async fn checked(builder: RequestBuilder) -> Result<Response, StorageError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = error::from_response(status, &body);
        log::debug!("table request failed with {status}: {err}");
        Err(err)
    }

    /// Send and decode a JSON array of rows.
    pub(crate) async fn fetch_rows<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<Vec<T>, StorageError> {
        Self::checked(builder)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Send and decode rows, expecting at most one.
    pub(crate) async fn fetch_optional<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<Option<T>, StorageError> {
        Ok(Self::fetch_rows(builder).await?.into_iter().next())
    }

    /// Send with a JSON body and decode the returned representation.
    pub(crate) async fn write_rows<B: Serialize + ?Sized, T: DeserializeOwned>(
        builder: RequestBuilder,
        body: &B,
    ) -> Result<Vec<T>, StorageError> {
        Self::fetch_rows(builder.json(body)).await
    }

    pub(crate) async fn send_empty(builder: RequestBuilder) -> Result<(), StorageError> {
        Self::checked(builder).await.map(|_| ())
    }
}

impl Storage {
    /// Build a `Storage` backed by the hosted table API.
    #[must_use]
    pub fn rest(config: RestConfig, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self::from_repository(RestRepository::new(config, tokens))
    }
}
