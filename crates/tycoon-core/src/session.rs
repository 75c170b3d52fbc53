use crate::config::ClientConfig;
use tycoon_api_types::Identity;

/// Per-session context handed to the gateway and the synchronizer.
///
/// Identity is resolved once by the caller and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub identity: Identity,
    pub config: ClientConfig,
}

impl Session {
    pub fn new(identity: Identity, config: ClientConfig) -> Self {
        Self { identity, config }
    }
}
