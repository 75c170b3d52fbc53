use crate::display::DisplaySink;
use crate::gateway::{ActionGateway, DispatchOutcome};
use crate::request::{COMMAND_PREFIX, ValidationError};
use std::sync::Arc;
use tracing::warn;
use tycoon_api_types::{ActionName, ActionParams, Primitive};

pub const COMMANDS_UNAVAILABLE: &str = "Commands are only available inside the chat app";

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Rejected(ValidationError),
    /// No host bridge exists, so there is nowhere to forward the command.
    Unavailable,
    Dispatched(DispatchOutcome),
}

/// Forwards free-text slash commands as a single opaque `command` field.
///
/// Only the host bridge understands commands, so the gateway given here
/// must deliver through a bridge transport whatever the session config says.
pub struct CommandInterpreter {
    gateway: Option<Arc<ActionGateway>>,
    display: Arc<dyn DisplaySink>,
}

impl CommandInterpreter {
    pub fn new(gateway: Arc<ActionGateway>, display: Arc<dyn DisplaySink>) -> Self {
        Self {
            gateway: Some(gateway),
            display,
        }
    }

    /// Interpreter for sessions without a host bridge; every command is refused.
    pub fn unavailable(display: Arc<dyn DisplaySink>) -> Self {
        Self {
            gateway: None,
            display,
        }
    }

    /// The text is forwarded exactly as typed.
    pub async fn submit(&self, text: &str) -> CommandOutcome {
        if !text.starts_with(COMMAND_PREFIX) {
            let err = ValidationError::CommandPrefix;
            warn!("rejected command without leading slash");
            self.display.show_output(&err.to_string());
            return CommandOutcome::Rejected(err);
        }

        let Some(gateway) = &self.gateway else {
            warn!("no host bridge to forward command to");
            self.display.show_output(COMMANDS_UNAVAILABLE);
            return CommandOutcome::Unavailable;
        };

        let mut params = ActionParams::new();
        params.insert("command".to_owned(), Primitive::text(text));
        CommandOutcome::Dispatched(gateway.dispatch(ActionName::Command, params).await)
    }
}
