use std::env;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use signlearn_core::model::{ActivityRecord, AuthUser, UserId};

use crate::contract::{
    ActivityLog, IdentityProvider, LessonViewRow, ObjectStore, PlatformError, PrivilegeCheck,
    ProgressStore, QuizResultRow,
};

/// Connection settings for the managed backend.
#[derive(Clone, Debug)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    /// Bucket holding lesson videos.
    pub video_bucket: String,
}

impl RestConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("SIGNLEARN_PLATFORM_URL").ok()?;
        let api_key = env::var("SIGNLEARN_PLATFORM_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let video_bucket =
            env::var("SIGNLEARN_VIDEO_BUCKET").unwrap_or_else(|_| "lesson-videos".into());
        Some(Self {
            base_url,
            api_key,
            video_bucket,
        })
    }
}

/// HTTP adapter for every platform contract, speaking the managed backend's
/// auth, RPC, storage-signing, and table APIs.
pub struct RestPlatform {
    client: Client,
    config: RestConfig,
    access_token: Mutex<Option<String>>,
}

impl RestPlatform {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            access_token: Mutex::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> Option<String> {
        self.access_token.lock().ok().and_then(|token| token.clone())
    }

    fn store_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.lock() {
            *guard = token;
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("apikey", &self.config.api_key);
        match self.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder.bearer_auth(&self.config.api_key),
        }
    }

    async fn check(response: Response) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                let body: ErrorBody = response.json().await.unwrap_or_default();
                Err(PlatformError::Unauthorized(body.message()))
            }
            StatusCode::NOT_FOUND => Err(PlatformError::NotFound),
            _ => {
                warn!(%status, "platform request failed");
                Err(PlatformError::Connection(format!(
                    "unexpected status {status}"
                )))
            }
        }
    }
}

fn transport(err: reqwest::Error) -> PlatformError {
    PlatformError::Connection(err.to_string())
}

fn decode(err: reqwest::Error) -> PlatformError {
    PlatformError::Serialization(err.to_string())
}

#[async_trait]
impl IdentityProvider for RestPlatform {
    async fn current_session(&self) -> Result<Option<AuthUser>, PlatformError> {
        if self.bearer().is_none() {
            return Ok(None);
        }
        let response = self
            .authorized(self.client.get(self.endpoint("auth/v1/user")))
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            // Token expired between runs; not an error, just no session.
            debug!("stored access token expired; starting anonymous");
            self.store_token(None);
            return Ok(None);
        }
        let body: WireUser = Self::check(response).await?.json().await.map_err(decode)?;
        Ok(Some(body.into_user()?))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, PlatformError> {
        let response = self
            .authorized(
                self.client
                    .post(self.endpoint("auth/v1/token?grant_type=password")),
            )
            .json(&CredentialsBody { email, password })
            .send()
            .await
            .map_err(transport)?;

        let body: TokenResponse = Self::check(response).await?.json().await.map_err(decode)?;
        self.store_token(Some(body.access_token));
        body.user.into_user()
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<AuthUser, PlatformError> {
        let response = self
            .authorized(self.client.post(self.endpoint("auth/v1/signup")))
            .json(&SignUpBody {
                email,
                password,
                data: metadata,
            })
            .send()
            .await
            .map_err(transport)?;

        let body: WireUser = Self::check(response).await?.json().await.map_err(decode)?;
        body.into_user()
    }

    async fn sign_out(&self) -> Result<(), PlatformError> {
        let response = self
            .authorized(self.client.post(self.endpoint("auth/v1/logout")))
            .send()
            .await
            .map_err(transport)?;
        self.store_token(None);
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PrivilegeCheck for RestPlatform {
    async fn is_current_user_admin(&self) -> Result<bool, PlatformError> {
        let response = self
            .authorized(self.client.post(self.endpoint("rest/v1/rpc/is_admin")))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(transport)?;

        let is_admin: bool = Self::check(response).await?.json().await.map_err(decode)?;
        Ok(is_admin)
    }
}

#[async_trait]
impl ObjectStore for RestPlatform {
    async fn signed_url(&self, asset: &str, ttl_secs: u32) -> Result<Url, PlatformError> {
        let path = format!(
            "storage/v1/object/sign/{}/{}",
            self.config.video_bucket, asset
        );
        let response = self
            .authorized(self.client.post(self.endpoint(&path)))
            .json(&SignBody {
                expires_in: ttl_secs,
            })
            .send()
            .await
            .map_err(transport)?;

        let body: SignResponse = Self::check(response).await?.json().await.map_err(decode)?;

        // The signing endpoint answers with a path relative to the API root.
        let base: Url = format!("{}/", self.config.base_url.trim_end_matches('/'))
            .parse()
            .map_err(|e: url::ParseError| PlatformError::Serialization(e.to_string()))?;
        base.join(body.signed_url.trim_start_matches('/'))
            .map_err(|e| PlatformError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl ActivityLog for RestPlatform {
    async fn record(&self, record: &ActivityRecord) -> Result<(), PlatformError> {
        let response = self
            .authorized(self.client.post(self.endpoint("rest/v1/user_activity")))
            .json(&ActivityBody {
                activity_type: record.kind.as_str(),
                activity_details: &record.details,
                user_id: record.user_id,
            })
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for RestPlatform {
    async fn upsert_lesson_view(&self, row: LessonViewRow) -> Result<(), PlatformError> {
        let response = self
            .authorized(self.client.post(self.endpoint("rest/v1/lesson_views")))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upsert_quiz_result(&self, row: QuizResultRow) -> Result<(), PlatformError> {
        let response = self
            .authorized(self.client.post(self.endpoint("rest/v1/quiz_results")))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&row)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct SignBody {
    #[serde(rename = "expiresIn")]
    expires_in: u32,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[derive(Debug, Serialize)]
struct ActivityBody<'a> {
    activity_type: &'static str,
    activity_details: &'a serde_json::Value,
    user_id: UserId,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: WireUser,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: String,
}

impl WireUser {
    fn into_user(self) -> Result<AuthUser, PlatformError> {
        let id: UserId = self
            .id
            .parse()
            .map_err(|_| PlatformError::Serialization(format!("invalid user id: {}", self.id)))?;
        Ok(AuthUser::new(id, self.email))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .unwrap_or_else(|| "request rejected".to_owned())
    }
}
