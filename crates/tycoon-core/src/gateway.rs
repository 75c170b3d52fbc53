use crate::display::DisplaySink;
use crate::request::{ActionRequest, ValidationError};
use crate::session::Session;
use crate::sync::{RefreshOutcome, StateSynchronizer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tycoon_api_types::{ActionName, ActionParams};
use tycoon_transport::{Delivery, Transport};

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Validation failed; no transport was touched and no refresh issued.
    Rejected(ValidationError),
    Delivered {
        delivery: Delivery,
        refresh: RefreshOutcome,
    },
    /// The transport failed; the error was logged and a refresh still ran.
    Failed {
        error: String,
        refresh: RefreshOutcome,
    },
}

/// Single entry point for user actions, independent of the transport in use.
pub struct ActionGateway {
    session: Arc<Session>,
    transport: Arc<dyn Transport>,
    sync: Arc<StateSynchronizer>,
    display: Arc<dyn DisplaySink>,
}

impl ActionGateway {
    pub fn new(
        session: Arc<Session>,
        transport: Arc<dyn Transport>,
        sync: Arc<StateSynchronizer>,
        display: Arc<dyn DisplaySink>,
    ) -> Self {
        Self {
            session,
            transport,
            sync,
            display,
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub async fn dispatch(&self, action: ActionName, params: ActionParams) -> DispatchOutcome {
        match ActionRequest::new(action, params) {
            Ok(request) => self.submit(request).await,
            Err(err) => self.reject(action, err),
        }
    }

    /// Dispatch from raw form text; amounts are parsed and validated.
    pub async fn dispatch_form(&self, action: ActionName, fields: &[(&str, &str)]) -> DispatchOutcome {
        match ActionRequest::from_form(action, fields) {
            Ok(request) => self.submit(request).await,
            Err(err) => self.reject(action, err),
        }
    }

    pub async fn submit(&self, request: ActionRequest) -> DispatchOutcome {
        let action = request.action();
        let acknowledgement = request.acknowledgement();
        let envelope = request.into_envelope(self.session.identity.clone());

        info!(
            %action,
            transport = %self.transport.kind(),
            user_id = ?envelope.identity.user_id,
            "dispatching action"
        );

        match self.transport.deliver(&envelope).await {
            Ok(delivery) => {
                match &delivery {
                    Delivery::Acknowledged(ack) => self.display.show_output(&ack.response),
                    Delivery::Sent => self.display.show_output(&acknowledgement),
                }
                let refresh = self.sync.refresh().await;
                DispatchOutcome::Delivered { delivery, refresh }
            }
            Err(err) => {
                error!(%action, "action delivery failed: {err:#}");
                let refresh = self.sync.refresh().await;
                DispatchOutcome::Failed {
                    error: err.to_string(),
                    refresh,
                }
            }
        }
    }

    fn reject(&self, action: ActionName, err: ValidationError) -> DispatchOutcome {
        warn!(%action, "rejected before dispatch: {err}");
        self.display.show_output(&err.to_string());
        DispatchOutcome::Rejected(err)
    }
}
