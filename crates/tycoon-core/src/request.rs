use serde_json::Number;
use thiserror::Error;
use tycoon_api_types::{ActionEnvelope, ActionName, ActionParams, Identity, Primitive};

pub const COMMAND_PREFIX: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be text")]
    NotText { field: &'static str },
    #[error("{field} must be a number")]
    NotNumeric { field: &'static str },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} is not accepted by {action}")]
    Unexpected { action: ActionName, field: String },
    #[error("Command must start with /")]
    CommandPrefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Amount,
}

#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

const fn text(name: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Text,
        required: true,
    }
}

const fn amount(name: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Amount,
        required: true,
    }
}

const fn optional(field: Field) -> Field {
    Field {
        required: false,
        ..field
    }
}

fn contract(action: ActionName) -> &'static [Field] {
    const CREATE_COIN: &[Field] = &[text("name")];
    const TRADE: &[Field] = &[text("name"), amount("amount")];
    const DICE: &[Field] = &[amount("amount"), optional(text("target"))];
    const DICE_BOT: &[Field] = &[amount("amount")];
    const ROB: &[Field] = &[text("target")];
    const GIVE: &[Field] = &[amount("amount"), text("target")];
    const BUY_ITEM: &[Field] = &[text("item")];
    const COMMAND: &[Field] = &[text("command")];

    match action {
        ActionName::CreateCoin => CREATE_COIN,
        ActionName::Buy | ActionName::Sell => TRADE,
        ActionName::Dice => DICE,
        ActionName::DiceBot => DICE_BOT,
        ActionName::Rob => ROB,
        ActionName::Give => GIVE,
        ActionName::BuyItem => BUY_ITEM,
        ActionName::Command => COMMAND,
    }
}

/// Parse a user-typed amount. Whole numbers stay integers on the wire.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Primitive, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Missing { field });
    }

    if let Ok(whole) = raw.parse::<i64>() {
        if whole <= 0 {
            return Err(ValidationError::NotPositive { field });
        }
        return Ok(Primitive::Number(Number::from(whole)));
    }

    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::NotNumeric { field })?;
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Primitive::float(value).ok_or(ValidationError::NotNumeric { field })
}

/// An action whose parameters satisfy its field contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    action: ActionName,
    params: ActionParams,
}

impl ActionRequest {
    pub fn new(action: ActionName, params: ActionParams) -> Result<Self, ValidationError> {
        let fields = contract(action);

        if let Some(unexpected) = params
            .keys()
            .find(|key| !fields.iter().any(|field| field.name == key.as_str()))
        {
            return Err(ValidationError::Unexpected {
                action,
                field: unexpected.clone(),
            });
        }

        for field in fields {
            match params.get(field.name) {
                None if field.required => {
                    return Err(ValidationError::Missing { field: field.name });
                }
                None => {}
                Some(value) => check_field(field, value)?,
            }
        }

        if action == ActionName::Command {
            let command = params.get("command").and_then(Primitive::as_text).unwrap_or_default();
            if !command.starts_with(COMMAND_PREFIX) {
                return Err(ValidationError::CommandPrefix);
            }
        }

        Ok(Self { action, params })
    }

    /// Build from raw form text, parsing amount fields as numbers.
    /// Blank optional fields are dropped.
    pub fn from_form(action: ActionName, fields: &[(&str, &str)]) -> Result<Self, ValidationError> {
        let contract = contract(action);
        let mut params = ActionParams::new();

        for (name, raw) in fields {
            let Some(field) = contract.iter().find(|field| field.name == *name) else {
                return Err(ValidationError::Unexpected {
                    action,
                    field: (*name).to_owned(),
                });
            };
            if !field.required && raw.trim().is_empty() {
                continue;
            }
            let value = match field.kind {
                FieldKind::Amount => parse_amount(field.name, raw)?,
                FieldKind::Text => Primitive::text(*raw),
            };
            params.insert(field.name.to_owned(), value);
        }

        Self::new(action, params)
    }

    /// Names of the fields `action` accepts, in positional order.
    pub fn field_names(action: ActionName) -> Vec<&'static str> {
        contract(action).iter().map(|field| field.name).collect()
    }

    pub fn action(&self) -> ActionName {
        self.action
    }

    pub fn params(&self) -> &ActionParams {
        &self.params
    }

    pub fn into_envelope(self, identity: Identity) -> ActionEnvelope {
        ActionEnvelope {
            identity,
            action: self.action,
            params: self.params,
        }
    }

    /// Optimistic confirmation shown when the transport reports nothing back.
    pub fn acknowledgement(&self) -> String {
        let param = |key: &str| {
            self.params
                .get(key)
                .map(ToString::to_string)
                .unwrap_or_default()
        };

        match self.action {
            ActionName::CreateCoin => format!("Token {} created!", param("name")),
            ActionName::Buy => format!("Bought {} {}", param("amount"), param("name")),
            ActionName::Sell => format!("Sold {} {}", param("amount"), param("name")),
            ActionName::Dice => match self.params.get("target") {
                Some(target) => format!("Challenged {target} to dice for {}", param("amount")),
                None => "Playing dice!".to_owned(),
            },
            ActionName::DiceBot => "Playing against the bot!".to_owned(),
            ActionName::Rob => format!("Trying to rob {}", param("target")),
            ActionName::Give => format!("Gave {} to {}", param("amount"), param("target")),
            ActionName::BuyItem => format!("Bought {}", param("item")),
            ActionName::Command => format!("Command sent: {}", param("command")),
        }
    }
}

fn check_field(field: &Field, value: &Primitive) -> Result<(), ValidationError> {
    match (field.kind, value) {
        (FieldKind::Text, Primitive::Text(text)) if text.trim().is_empty() => {
            Err(ValidationError::Missing { field: field.name })
        }
        (FieldKind::Text, Primitive::Text(_)) => Ok(()),
        (FieldKind::Text, Primitive::Number(_)) => Err(ValidationError::NotText { field: field.name }),
        (FieldKind::Amount, Primitive::Number(number)) => match number.as_f64() {
            Some(value) if value > 0.0 => Ok(()),
            _ => Err(ValidationError::NotPositive { field: field.name }),
        },
        (FieldKind::Amount, Primitive::Text(_)) => {
            Err(ValidationError::NotNumeric { field: field.name })
        }
    }
}
