use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Username substituted when the host runtime does not supply one.
pub const UNKNOWN_USERNAME: &str = "unknown";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    CreateCoin,
    Buy,
    Sell,
    Dice,
    DiceBot,
    Rob,
    Give,
    BuyItem,
    Command,
}

impl ActionName {
    pub const ALL: [ActionName; 9] = [
        ActionName::CreateCoin,
        ActionName::Buy,
        ActionName::Sell,
        ActionName::Dice,
        ActionName::DiceBot,
        ActionName::Rob,
        ActionName::Give,
        ActionName::BuyItem,
        ActionName::Command,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::CreateCoin => "create_coin",
            ActionName::Buy => "buy",
            ActionName::Sell => "sell",
            ActionName::Dice => "dice",
            ActionName::DiceBot => "dice_bot",
            ActionName::Rob => "rob",
            ActionName::Give => "give",
            ActionName::BuyItem => "buy_item",
            ActionName::Command => "command",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == value)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single action parameter value. Integers stay integers on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Number(Number),
    Text(String),
}

impl Primitive {
    pub fn text(value: impl Into<String>) -> Self {
        Primitive::Text(value.into())
    }

    pub fn float(value: f64) -> Option<Self> {
        Number::from_f64(value).map(Primitive::Number)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Primitive::Text(text) => Some(text),
            Primitive::Number(_) => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Number(number) => write!(f, "{number}"),
            Primitive::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::Text(value.to_owned())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::Text(value)
    }
}

impl From<u64> for Primitive {
    fn from(value: u64) -> Self {
        Primitive::Number(value.into())
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Number(value.into())
    }
}

impl From<Primitive> for Value {
    fn from(value: Primitive) -> Self {
        match value {
            Primitive::Number(number) => Value::Number(number),
            Primitive::Text(text) => Value::String(text),
        }
    }
}

pub type ActionParams = BTreeMap<String, Primitive>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The acting user. `user_id` is absent for anonymous sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Option<UserId>,
    pub username: String,
}

impl Identity {
    pub fn new(user_id: Option<UserId>, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(None, UNKNOWN_USERNAME)
    }
}

/// A validated action bound to the identity that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEnvelope {
    pub identity: Identity,
    pub action: ActionName,
    pub params: ActionParams,
}

impl ActionEnvelope {
    /// Flat host-bridge payload: `{action, user_id, username, ...params}`.
    pub fn bridge_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("action".to_owned(), Value::String(self.action.as_str().to_owned()));
        if let Some(user_id) = self.identity.user_id {
            payload.insert("user_id".to_owned(), Value::from(user_id.0));
        }
        payload.insert(
            "username".to_owned(),
            Value::String(self.identity.username.clone()),
        );
        for (key, value) in &self.params {
            payload.insert(key.clone(), value.clone().into());
        }
        Value::Object(payload)
    }

    pub fn http_body(&self) -> ActionBody {
        ActionBody {
            user_id: self.identity.user_id,
            action: self.action,
            params: self.params.clone(),
        }
    }
}

/// Body of `POST /api/action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub action: ActionName,
    #[serde(default)]
    pub params: ActionParams,
}

/// Response of `POST /api/action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionAck {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub name: String,
    pub amount: f64,
}

/// Response of `GET /api/user/{user_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub balance: f64,
    #[serde(default)]
    pub tokens: Vec<TokenHolding>,
}
