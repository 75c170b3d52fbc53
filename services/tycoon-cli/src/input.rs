use tycoon_api_types::ActionName;
use tycoon_core::ActionRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Intent {
    Empty,
    Help,
    Refresh,
    Quit,
    /// Raw slash command for the command interpreter.
    Command(String),
    Action {
        action: ActionName,
        fields: Vec<(&'static str, String)>,
    },
    Unknown(String),
}

/// Map one input line to an intent. Arguments fill the action's fields in
/// order; surplus words are joined into the last field.
pub(crate) fn parse_line(line: &str) -> Intent {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Intent::Empty;
    }
    if line.starts_with('/') {
        return Intent::Command(line.to_owned());
    }

    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    match verb {
        "help" => return Intent::Help,
        "refresh" => return Intent::Refresh,
        "quit" | "exit" => return Intent::Quit,
        _ => {}
    }

    let Some(action) = ActionName::parse(verb).filter(|action| *action != ActionName::Command) else {
        return Intent::Unknown(verb.to_owned());
    };

    let names = ActionRequest::field_names(action);
    let args: Vec<&str> = words.collect();
    let mut fields = Vec::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        let value = if index + 1 == names.len() {
            args.get(index..).map(|rest| rest.join(" ")).unwrap_or_default()
        } else {
            args.get(index).map(|arg| (*arg).to_owned()).unwrap_or_default()
        };
        if !value.is_empty() {
            fields.push((*name, value));
        }
    }

    Intent::Action { action, fields }
}

pub(crate) const HELP: &str = "\
Commands:
  create_coin <name>
  buy <name> <amount>
  sell <name> <amount>
  dice <amount> [target]
  dice_bot <amount>
  rob <target>
  give <amount> <target>
  buy_item <item>
  /<anything>   forward a raw slash command
  refresh | help | quit";
