use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use tycoon_api_types::{ActionAck, ActionBody, ActionEnvelope, UserId, UserState};
use tycoon_transport::{Delivery, StateSource, Transport, TransportKind};

pub const DEFAULT_API_BASE: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const ACTION_PATH: &str = "/api/action";
pub const USER_PATH: &str = "/api/user";

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("economy client build failed: {0}")]
    Build(#[source] reqwest::Error),
    #[error("economy request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("economy HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("economy response decode failed: {message}")]
    Decode { message: String },
}

/// HTTP client for the economy service.
///
/// Serves both as the request/response action transport
/// (`POST /api/action`) and as the source of user state
/// (`GET /api/user/{user_id}`).
#[derive(Debug, Clone)]
pub struct EconomyClient {
    base_url: String,
    http: reqwest::Client,
}

impl EconomyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let base_url: String = base_url.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpError::Build)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    pub async fn post_action(&self, body: &ActionBody) -> Result<ActionAck, HttpError> {
        let url = format!("{}{}", self.base_url, ACTION_PATH);
        debug!(action = %body.action, %url, "posting action");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(HttpError::Request)?;

        read_json(response).await
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<UserState, HttpError> {
        let url = format!("{}{}/{}", self.base_url, USER_PATH, user_id);
        debug!(%user_id, "fetching user state");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(HttpError::Request)?;

        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpError> {
    let status = response.status();
    let text = response.text().await.map_err(HttpError::Request)?;

    if !status.is_success() {
        warn!(%status, "economy service rejected request");
        return Err(HttpError::Status { status, body: text });
    }

    serde_json::from_str(&text).map_err(|err| HttpError::Decode {
        message: format!("{err}; raw: {text}"),
    })
}

#[async_trait]
impl Transport for EconomyClient {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn deliver(&self, envelope: &ActionEnvelope) -> anyhow::Result<Delivery> {
        let ack = self
            .post_action(&envelope.http_body())
            .await
            .with_context(|| format!("economy action {}", envelope.action))?;
        Ok(Delivery::Acknowledged(ack))
    }
}

#[async_trait]
impl StateSource for EconomyClient {
    async fn fetch_user_state(&self, user_id: UserId) -> anyhow::Result<UserState> {
        let state = self
            .get_user(user_id)
            .await
            .with_context(|| format!("economy user {user_id}"))?;
        Ok(state)
    }
}
