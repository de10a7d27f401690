use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use shelf_core::Clock;
use shelf_core::model::{Credentials, UserId};
use storage::rest::RestConfig;

use super::backend::{AuthBackend, SignUpOutcome};
use super::session::{AuthUser, Session};
use crate::error::AuthError;

/// HTTP client for the hosted auth API (`/auth/v1`).
#[derive(Clone)]
pub struct GoTrueAuth {
    client: Client,
    config: RestConfig,
    clock: Clock,
}

impl GoTrueAuth {
    #[must_use]
    pub fn new(config: RestConfig, clock: Clock) -> Self {
        Self {
            client: Client::new(),
            config,
            clock,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        log::debug!("POST /auth/v1/{path}");
        self.client
            .post(self.url(path))
            .header("apikey", &self.config.anon_key)
    }

    async fn checked(response: Response) -> Result<Response, AuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AuthError::Rejected(error_message(status, &body)))
    }
}

#[async_trait]
impl AuthBackend for GoTrueAuth {
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let response = self
            .post("token?grant_type=password")
            .json(&PasswordBody::from(credentials))
            .send()
            .await?;
        let body: TokenResponse = Self::checked(response).await?.json().await?;
        Ok(body.into_session(self.clock.now()))
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .post("signup")
            .json(&PasswordBody::from(credentials))
            .send()
            .await?;
        let body: serde_json::Value = Self::checked(response).await?.json().await?;
        parse_sign_up(body, self.clock.now())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .post("logout")
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::checked(response).await.map(|_| ())
    }

    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        log::debug!("GET /auth/v1/user");
        let response = self
            .client
            .get(self.url("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let user: UserBody = Self::checked(response).await?.json().await?;
        Ok(user.into())
    }
}

//
// ─── WIRE ──────────────────────────────────────────────────────────────────────
//

#[derive(Serialize)]
struct PasswordBody<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a Credentials> for PasswordBody<'a> {
    fn from(c: &'a Credentials) -> Self {
        Self {
            email: c.email(),
            password: c.password(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: UserId,
    email: Option<String>,
}

impl From<UserBody> for AuthUser {
    fn from(u: UserBody) -> Self {
        AuthUser {
            id: u.id,
            email: u.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    expires_at: Option<i64>,
    user: UserBody,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

/// Sign-up answers with a session when confirmation is off, or with the bare
/// user (sometimes wrapped in `user`) when a confirmation email was sent.
fn parse_sign_up(body: serde_json::Value, now: DateTime<Utc>) -> Result<SignUpOutcome, AuthError> {
    if body.get("access_token").is_some() {
        let token: TokenResponse =
            serde_json::from_value(body).map_err(|e| AuthError::Response(e.to_string()))?;
        return Ok(SignUpOutcome::SignedIn(token.into_session(now)));
    }
    let user_value = match body.get("user") {
        Some(user) => user.clone(),
        None => body,
    };
    let user: UserBody =
        serde_json::from_value(user_value).map_err(|e| AuthError::Response(e.to_string()))?;
    Ok(SignUpOutcome::ConfirmationSent(user.into()))
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .msg
        .or(parsed.error_description)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status.to_string())
}
