use crate::display::DisplaySink;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tycoon_api_types::{ActionAck, ActionEnvelope, TokenHolding, UserId, UserState};
use tycoon_transport::{Delivery, StateSource, Transport, TransportKind};

/// Shared call log so tests can assert ordering across fakes.
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

pub(crate) fn state(balance: f64, tokens: &[(&str, f64)]) -> UserState {
    UserState {
        balance,
        tokens: tokens
            .iter()
            .map(|(name, amount)| TokenHolding {
                name: (*name).to_owned(),
                amount: *amount,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shown {
    Output(String),
    Balance(String),
    Tokens(String),
}

#[derive(Default)]
pub(crate) struct RecordingDisplay {
    shown: Mutex<Vec<Shown>>,
}

impl RecordingDisplay {
    pub(crate) fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    pub(crate) fn outputs(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|shown| match shown {
                Shown::Output(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_balance(&self) -> Option<String> {
        self.shown().into_iter().rev().find_map(|shown| match shown {
            Shown::Balance(text) => Some(text),
            _ => None,
        })
    }

    pub(crate) fn last_tokens(&self) -> Option<String> {
        self.shown().into_iter().rev().find_map(|shown| match shown {
            Shown::Tokens(text) => Some(text),
            _ => None,
        })
    }
}

impl DisplaySink for RecordingDisplay {
    fn show_output(&self, text: &str) {
        self.shown.lock().unwrap().push(Shown::Output(text.to_owned()));
    }

    fn show_balance(&self, text: &str) {
        self.shown.lock().unwrap().push(Shown::Balance(text.to_owned()));
    }

    fn show_tokens(&self, text: &str) {
        self.shown.lock().unwrap().push(Shown::Tokens(text.to_owned()));
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Sent,
    Ack(String),
    Fail(String),
}

pub(crate) struct RecordingTransport {
    kind: TransportKind,
    reply: Reply,
    journal: Journal,
    delivered: Mutex<Vec<ActionEnvelope>>,
}

impl RecordingTransport {
    pub(crate) fn new(kind: TransportKind, reply: Reply, journal: Journal) -> Self {
        Self {
            kind,
            reply,
            journal,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn delivered(&self) -> Vec<ActionEnvelope> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn deliver(&self, envelope: &ActionEnvelope) -> Result<Delivery> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("deliver:{}", envelope.action));
        self.delivered.lock().unwrap().push(envelope.clone());
        match &self.reply {
            Reply::Sent => Ok(Delivery::Sent),
            Reply::Ack(response) => Ok(Delivery::Acknowledged(ActionAck {
                response: response.clone(),
            })),
            Reply::Fail(message) => Err(anyhow!("{message}")),
        }
    }
}

pub(crate) struct ScriptedSource {
    journal: Journal,
    states: HashMap<UserId, std::result::Result<UserState, String>>,
}

impl ScriptedSource {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            journal,
            states: HashMap::new(),
        }
    }

    pub(crate) fn with_state(mut self, user_id: i64, state: UserState) -> Self {
        self.states.insert(UserId(user_id), Ok(state));
        self
    }

    pub(crate) fn failing(mut self, user_id: i64, message: &str) -> Self {
        self.states.insert(UserId(user_id), Err(message.to_owned()));
        self
    }
}

#[async_trait]
impl StateSource for ScriptedSource {
    async fn fetch_user_state(&self, user_id: UserId) -> Result<UserState> {
        self.journal.lock().unwrap().push(format!("fetch:{user_id}"));
        match self.states.get(&user_id) {
            Some(Ok(state)) => Ok(state.clone()),
            Some(Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("economy HTTP 404 Not Found: User not found")),
        }
    }
}

type Gate = oneshot::Receiver<std::result::Result<UserState, String>>;

/// State source whose responses are released by the test, so several
/// fetches can be in flight at once and complete in a chosen order.
#[derive(Default)]
pub(crate) struct GatedSource {
    gates: Mutex<HashMap<UserId, Gate>>,
    started: AtomicUsize,
}

impl GatedSource {
    pub(crate) fn gate(
        &self,
        user_id: i64,
    ) -> oneshot::Sender<std::result::Result<UserState, String>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(UserId(user_id), rx);
        tx
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateSource for GatedSource {
    async fn fetch_user_state(&self, user_id: UserId) -> Result<UserState> {
        let gate = self.gates.lock().unwrap().remove(&user_id);
        let Some(gate) = gate else {
            return Err(anyhow!("no gate for user {user_id}"));
        };
        self.started.fetch_add(1, Ordering::SeqCst);
        match gate.await {
            Ok(Ok(state)) => Ok(state),
            Ok(Err(message)) => Err(anyhow!("{message}")),
            Err(_) => Err(anyhow!("gate for user {user_id} dropped")),
        }
    }
}
