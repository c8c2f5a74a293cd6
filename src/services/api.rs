// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Race tracker API boundary.
//!
//! The session core only needs three calls: login, password-reset request,
//! and password reset. [`AuthApi`] is the seam; [`HttpAuthApi`] is the real
//! implementation. No retries happen here: a failure is surfaced once, as an
//! [`AppError::Network`] carrying a displayable message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Credential, LoginSession, RaceEnrollment, UserProfile};

/// Shown when the server cannot be reached at all.
const UNREACHABLE_MESSAGE: &str = "Could not reach the server. Check your connection.";

/// Login payload as returned by the API.
///
/// A failed login may come back as a success status carrying only `msg`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default, alias = "signedRaces")]
    pub signed_races: Vec<Value>,
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}

impl LoginResponse {
    /// Convert into a storable session, or the server's refusal.
    ///
    /// Enrollments are normalized here; entries without a race id are
    /// dropped.
    pub fn into_session(self) -> Result<LoginSession> {
        let access_token = self.access_token.filter(|t| !t.trim().is_empty());
        let (Some(access_token), Some(user)) = (access_token, self.user) else {
            return Err(AppError::Network(self.msg.unwrap_or_default()));
        };

        let signed_races = self
            .signed_races
            .into_iter()
            .filter_map(|entry| match RaceEnrollment::try_from(entry) {
                Ok(race) => Some(race),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping race enrollment from login response");
                    None
                }
            })
            .collect();

        Ok(LoginSession {
            credential: Credential {
                access_token,
                refresh_token: self.refresh_token.unwrap_or_default(),
            },
            user,
            signed_races,
        })
    }
}

/// Optional server message returned by the password endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}

/// Network calls used by the auth flows.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    async fn request_password_reset(&self, email: &str) -> Result<ApiMessage>;

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<ApiMessage>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ForgotPasswordBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordBody<'a> {
    token: &'a str,
    password: &'a str,
}

/// HTTP client for the race tracker API.
#[derive(Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// POST a JSON body and parse the JSON reply.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: for<'de> Deserialize<'de> + Default,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Request failed");
            AppError::Network(UNREACHABLE_MESSAGE.to_string())
        })?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the body, extracting `msg` on failure.
    async fn check_response_json<T>(&self, response: reqwest::Response) -> Result<T>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "API request rejected");
            let message = serde_json::from_str::<ApiMessage>(&body)
                .ok()
                .and_then(|m| m.msg)
                .unwrap_or_default();
            return Err(AppError::Network(message));
        }

        // Some endpoints answer 204 / an empty body on success
        if body.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Unexpected API response body");
            AppError::Network(String::new())
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        self.post_json("/auth/login", &LoginBody { email, password })
            .await
    }

    async fn request_password_reset(&self, email: &str) -> Result<ApiMessage> {
        self.post_json("/auth/forgot-password", &ForgotPasswordBody { email })
            .await
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<ApiMessage> {
        self.post_json(
            "/auth/reset-password",
            &ResetPasswordBody {
                token,
                password: new_password,
            },
        )
        .await
    }
}
