use crate::command::{CommandInterpreter, CommandOutcome};
use crate::config::ConfigError;
use crate::display::DisplaySink;
use crate::gateway::{ActionGateway, DispatchOutcome};
use crate::session::Session;
use crate::sync::{RefreshOutcome, StateSynchronizer};
use std::sync::Arc;
use tycoon_api_types::{ActionName, ActionParams};
use tycoon_http::EconomyClient;
use tycoon_transport::{BridgeTransport, HostBridge, StateSource, Transport, TransportKind};

/// Gateway, synchronizer and command interpreter wired for one session.
pub struct TycoonClient {
    gateway: Arc<ActionGateway>,
    commands: CommandInterpreter,
    sync: Arc<StateSynchronizer>,
}

impl TycoonClient {
    /// Wire the action transport named by the session config. State always
    /// comes from the economy HTTP API; slash commands always go through the
    /// host bridge when there is one.
    pub fn connect(
        session: Session,
        host: Option<Arc<dyn HostBridge>>,
        display: Arc<dyn DisplaySink>,
    ) -> Result<Self, ConfigError> {
        let economy = Arc::new(EconomyClient::new(
            &session.config.api_base,
            session.config.timeout(),
        )?);

        let bridge: Option<Arc<dyn Transport>> = host
            .map(|host| Arc::new(BridgeTransport::new(host)) as Arc<dyn Transport>);

        let transport: Arc<dyn Transport> = match session.config.transport {
            TransportKind::Http => economy.clone(),
            TransportKind::Bridge => bridge.clone().ok_or(ConfigError::BridgeUnavailable)?,
        };

        Ok(Self::from_parts(session, transport, bridge, economy, display))
    }

    /// `command_transport` is the bridge used for slash commands; `None`
    /// leaves commands unavailable.
    pub fn from_parts(
        session: Session,
        transport: Arc<dyn Transport>,
        command_transport: Option<Arc<dyn Transport>>,
        source: Arc<dyn StateSource>,
        display: Arc<dyn DisplaySink>,
    ) -> Self {
        let session = Arc::new(session);
        let sync = Arc::new(StateSynchronizer::new(
            session.clone(),
            source,
            display.clone(),
        ));
        let gateway = Arc::new(ActionGateway::new(
            session.clone(),
            transport,
            sync.clone(),
            display.clone(),
        ));
        let commands = match command_transport {
            Some(bridge) => {
                let bridge_gateway = Arc::new(ActionGateway::new(
                    session,
                    bridge,
                    sync.clone(),
                    display.clone(),
                ));
                CommandInterpreter::new(bridge_gateway, display)
            }
            None => CommandInterpreter::unavailable(display),
        };

        Self {
            gateway,
            commands,
            sync,
        }
    }

    pub fn gateway(&self) -> &ActionGateway {
        &self.gateway
    }

    pub async fn dispatch(&self, action: ActionName, params: ActionParams) -> DispatchOutcome {
        self.gateway.dispatch(action, params).await
    }

    pub async fn dispatch_form(&self, action: ActionName, fields: &[(&str, &str)]) -> DispatchOutcome {
        self.gateway.dispatch_form(action, fields).await
    }

    pub async fn command(&self, text: &str) -> CommandOutcome {
        self.commands.submit(text).await
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.sync.refresh().await
    }
}
