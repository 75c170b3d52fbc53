//! Action dispatch and state synchronization for the Crypto Tycoon mini-app.
//!
//! User intents enter through [`ActionGateway`] (or [`CommandInterpreter`]
//! for raw slash commands), are stamped with the session [`Identity`] and
//! delivered over the configured [`Transport`]. Every delivery attempt is
//! followed by a [`StateSynchronizer`] refresh that republishes balance and
//! holdings to the [`DisplaySink`].
//!
//! [`Identity`]: tycoon_api_types::Identity
//! [`Transport`]: tycoon_transport::Transport

pub mod client;
pub mod command;
pub mod config;
pub mod display;
pub mod gateway;
pub mod request;
pub mod session;
pub mod sync;

#[cfg(test)]
mod testing;

pub use client::TycoonClient;
pub use command::{CommandInterpreter, CommandOutcome};
pub use config::{ClientConfig, ConfigError, RefreshOrdering};
pub use display::DisplaySink;
pub use gateway::{ActionGateway, DispatchOutcome};
pub use request::{ActionRequest, ValidationError, parse_amount};
pub use session::Session;
pub use sync::{RefreshOutcome, StateSynchronizer};
