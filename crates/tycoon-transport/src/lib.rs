use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use tycoon_api_types::{ActionAck, ActionEnvelope, UserId, UserState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// One-way message through the host runtime; no response is observed.
    Bridge,
    /// Request/response against the economy service HTTP API.
    Http,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Bridge => "bridge",
            TransportKind::Http => "http",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bridge" => Some(TransportKind::Bridge),
            "http" => Some(TransportKind::Http),
            _ => None,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Handed off; the outcome is not observable.
    Sent,
    /// The service answered.
    Acknowledged(ActionAck),
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;
    async fn deliver(&self, envelope: &ActionEnvelope) -> Result<Delivery>;
}

#[async_trait]
pub trait StateSource: Send + Sync {
    async fn fetch_user_state(&self, user_id: UserId) -> Result<UserState>;
}

/// Outbound channel supplied by the host runtime.
pub trait HostBridge: Send + Sync {
    fn send_data(&self, payload: &str) -> Result<()>;
}

pub struct BridgeTransport {
    host: Arc<dyn HostBridge>,
}

impl BridgeTransport {
    pub fn new(host: Arc<dyn HostBridge>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl Transport for BridgeTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Bridge
    }

    async fn deliver(&self, envelope: &ActionEnvelope) -> Result<Delivery> {
        let payload = serde_json::to_string(&envelope.bridge_payload())
            .context("bridge payload encode")?;
        debug!(action = %envelope.action, bytes = payload.len(), "bridge send");
        self.host
            .send_data(&payload)
            .with_context(|| format!("host bridge rejected {}", envelope.action))?;
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use tycoon_api_types::{ActionName, ActionParams, Identity};

    #[derive(Default)]
    struct RecordingHost {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    impl HostBridge for RecordingHost {
        fn send_data(&self, payload: &str) -> Result<()> {
            if self.fail {
                return Err(anyhow!("channel closed"));
            }
            self.sent.lock().unwrap().push(payload.to_owned());
            Ok(())
        }
    }

    fn rob_bob() -> ActionEnvelope {
        let mut params = ActionParams::new();
        params.insert("target".to_owned(), "bob".into());
        ActionEnvelope {
            identity: Identity::new(Some(UserId(42)), "alice"),
            action: ActionName::Rob,
            params,
        }
    }

    #[tokio::test]
    async fn bridge_sends_single_json_string() -> Result<()> {
        let host = Arc::new(RecordingHost::default());
        let transport = BridgeTransport::new(host.clone());

        let delivery = transport.deliver(&rob_bob()).await?;
        assert_eq!(delivery, Delivery::Sent);

        let sent = host.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        let payload: Value = serde_json::from_str(&sent[0])?;
        assert_eq!(
            payload,
            json!({"action": "rob", "user_id": 42, "username": "alice", "target": "bob"})
        );
        Ok(())
    }

    #[tokio::test]
    async fn bridge_surfaces_host_errors() {
        let host = Arc::new(RecordingHost {
            fail: true,
            ..Default::default()
        });
        let transport = BridgeTransport::new(host);

        let err = transport.deliver(&rob_bob()).await.unwrap_err();
        assert!(err.to_string().contains("rob"));
    }

    #[test]
    fn transport_kind_parses_config_values() {
        assert_eq!(TransportKind::parse("HTTP"), Some(TransportKind::Http));
        assert_eq!(TransportKind::parse(" bridge "), Some(TransportKind::Bridge));
        assert_eq!(TransportKind::parse("carrier-pigeon"), None);
    }
}
