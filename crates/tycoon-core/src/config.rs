use std::time::Duration;
use thiserror::Error;
use tycoon_http::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_MS, HttpError};
use tycoon_transport::TransportKind;

pub const ENV_API_BASE: &str = "TYCOON_API_BASE";
pub const ENV_TRANSPORT: &str = "TYCOON_TRANSPORT";
pub const ENV_TIMEOUT_MS: &str = "TYCOON_TIMEOUT_MS";
pub const ENV_REFRESH_ORDERING: &str = "TYCOON_REFRESH_ORDERING";

/// Which refresh completion is allowed to reach the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshOrdering {
    /// Only a refresh newer than the last published one is shown.
    #[default]
    Initiation,
    /// Whatever completes last is shown.
    Completion,
}

impl RefreshOrdering {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "initiation" => Some(RefreshOrdering::Initiation),
            "completion" => Some(RefreshOrdering::Completion),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown transport '{0}', expected http or bridge")]
    UnknownTransport(String),
    #[error("invalid timeout '{0}', expected milliseconds")]
    InvalidTimeout(String),
    #[error("unknown refresh ordering '{0}', expected initiation or completion")]
    UnknownOrdering(String),
    #[error("bridge transport selected but the host runtime provides no channel")]
    BridgeUnavailable,
    #[error(transparent)]
    Http(#[from] HttpError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub transport: TransportKind,
    pub timeout_ms: u64,
    pub refresh_ordering: RefreshOrdering,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_owned(),
            transport: TransportKind::Http,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            refresh_ordering: RefreshOrdering::default(),
        }
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_refresh_ordering(mut self, ordering: RefreshOrdering) -> Self {
        self.refresh_ordering = ordering;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::new(get(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_owned()));

        if let Some(raw) = get(ENV_TRANSPORT) {
            config.transport =
                TransportKind::parse(&raw).ok_or(ConfigError::UnknownTransport(raw))?;
        }

        if let Some(raw) = get(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
        }

        if let Some(raw) = get(ENV_REFRESH_ORDERING) {
            config.refresh_ordering =
                RefreshOrdering::parse(&raw).ok_or(ConfigError::UnknownOrdering(raw))?;
        }

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
