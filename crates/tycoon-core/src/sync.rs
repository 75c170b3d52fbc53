use crate::config::RefreshOrdering;
use crate::display::{self, DisplaySink, LOAD_ERROR};
use crate::session::Session;
use anyhow::anyhow;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};
use tycoon_api_types::{UserId, UserState};
use tycoon_transport::StateSource;

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Published(UserState),
    /// The load-error literal was shown in place of the balance.
    Failed(String),
    /// A newer refresh had already been published; nothing was shown.
    Stale { seq: u64 },
}

/// Fetches the authoritative balance and holdings and republishes them.
pub struct StateSynchronizer {
    session: Arc<Session>,
    source: Arc<dyn StateSource>,
    display: Arc<dyn DisplaySink>,
    issued: AtomicU64,
    last_published: Mutex<u64>,
}

impl StateSynchronizer {
    pub fn new(
        session: Arc<Session>,
        source: Arc<dyn StateSource>,
        display: Arc<dyn DisplaySink>,
    ) -> Self {
        Self {
            session,
            source,
            display,
            issued: AtomicU64::new(0),
            last_published: Mutex::new(0),
        }
    }

    /// Refresh the session user.
    pub fn refresh(&self) -> impl Future<Output = RefreshOutcome> + Send + '_ {
        self.refresh_user(self.session.identity.user_id)
    }

    /// The sequence number is taken when this is called, not when the
    /// returned future is first polled.
    pub fn refresh_user(
        &self,
        user_id: Option<UserId>,
    ) -> impl Future<Output = RefreshOutcome> + Send + '_ {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            let result = match user_id {
                Some(user_id) => self.source.fetch_user_state(user_id).await,
                None => Err(anyhow!("no user id to refresh")),
            };
            self.complete(seq, result)
        }
    }

    pub fn publish(&self, state: &UserState) {
        self.display.show_balance(&display::balance_text(state.balance));
        self.display.show_tokens(&display::tokens_text(&state.tokens));
    }

    fn complete(&self, seq: u64, result: anyhow::Result<UserState>) -> RefreshOutcome {
        let mut last = self
            .last_published
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.session.config.refresh_ordering == RefreshOrdering::Initiation && seq < *last {
            debug!(seq, last = *last, "discarding stale refresh");
            return RefreshOutcome::Stale { seq };
        }
        *last = seq;

        match result {
            Ok(state) => {
                debug!(seq, balance = state.balance, tokens = state.tokens.len(), "publishing user state");
                self.publish(&state);
                RefreshOutcome::Published(state)
            }
            Err(err) => {
                warn!(seq, "state refresh failed: {err:#}");
                self.display.show_balance(LOAD_ERROR);
                RefreshOutcome::Failed(err.to_string())
            }
        }
    }
}
