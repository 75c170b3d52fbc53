use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use tycoon_api_types::{Identity, UNKNOWN_USERNAME, UserId};

#[derive(Debug, Default, Deserialize)]
struct InitData {
    #[serde(default)]
    user: Option<InitUser>,
}

#[derive(Debug, Default, Deserialize)]
struct InitUser {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    username: Option<String>,
}

/// Resolve the acting user from host-supplied init data
/// (`{"user": {"id": .., "username": ..}}`).
///
/// Never fails: a missing or non-integer id leaves `user_id` unset and a
/// missing or blank username becomes [`UNKNOWN_USERNAME`].
pub fn resolve(init_data: &Value) -> Identity {
    let init = InitData::deserialize(init_data).unwrap_or_else(|err| {
        warn!("init data has unexpected shape: {err}");
        InitData::default()
    });
    let user = init.user.unwrap_or_default();

    let user_id = user.id.as_ref().and_then(Value::as_i64).map(UserId);
    let username = user
        .username
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_owned());

    if user_id.is_none() {
        debug!("host init data carries no user id; continuing anonymously");
    }

    Identity { user_id, username }
}

/// Same as [`resolve`] for raw JSON text. Unparseable text resolves to the
/// anonymous identity.
pub fn resolve_str(raw: &str) -> Identity {
    if raw.trim().is_empty() {
        return Identity::anonymous();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => resolve(&value),
        Err(err) => {
            warn!("init data is not valid JSON: {err}");
            Identity::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_id_and_username() {
        let identity = resolve(&json!({"user": {"id": 42, "username": "alice", "first_name": "A"}}));
        assert_eq!(identity, Identity::new(Some(UserId(42)), "alice"));
    }

    #[test]
    fn missing_user_is_anonymous() {
        assert_eq!(resolve(&json!({})), Identity::anonymous());
        assert_eq!(resolve(&json!({"user": null})), Identity::anonymous());
    }

    #[test]
    fn missing_username_falls_back_to_unknown() {
        let identity = resolve(&json!({"user": {"id": 7}}));
        assert_eq!(identity.user_id, Some(UserId(7)));
        assert_eq!(identity.username, "unknown");

        let blank = resolve(&json!({"user": {"id": 7, "username": ""}}));
        assert_eq!(blank.username, "unknown");
    }

    #[test]
    fn id_is_left_unset_rather_than_defaulted() {
        let identity = resolve(&json!({"user": {"id": "42", "username": "alice"}}));
        assert_eq!(identity.user_id, None);
        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn malformed_text_is_anonymous() {
        assert_eq!(resolve_str("{not json"), Identity::anonymous());
        assert_eq!(resolve_str(""), Identity::anonymous());
        assert_eq!(resolve_str("[1, 2]"), Identity::anonymous());
        assert_eq!(
            resolve_str(r#"{"user":{"id":99,"username":"bob"}}"#),
            Identity::new(Some(UserId(99)), "bob")
        );
    }
}
