//! JSON shapes specific to the v4 API.

use crate::entry::{EntryField, EntryFields};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub message: String,
}

/// Builds the JSON object sent to create and update.
///
/// The API wants `project_id` as a number; an integral value is converted,
/// anything else is sent as the caller wrote it so the service can reject it.
pub(super) fn entry_payload(fields: &EntryFields) -> Value {
    let mut map = Map::new();
    for (field, value) in fields.iter() {
        let json = match field {
            EntryField::ProjectId => match value.trim().parse::<u64>() {
                Ok(n) => Value::from(n),
                Err(_) => Value::from(value),
            },
            _ => Value::from(value),
        };
        map.insert(field.as_str().to_string(), json);
    }
    Value::Object(map)
}

/// Extracts the human-readable message from an error body.
pub(super) fn error_message(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    Some(parsed.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_id_sent_as_number() {
        let fields = EntryFields::new()
            .with(EntryField::Name, "db")
            .with(EntryField::ProjectId, "4");
        assert_eq!(entry_payload(&fields), json!({"name": "db", "project_id": 4}));

        let fields = EntryFields::new().with(EntryField::ProjectId, "infra");
        assert_eq!(entry_payload(&fields), json!({"project_id": "infra"}));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error": true, "type": "Not Found", "message": "Password not found"}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("Password not found")
        );

        assert_eq!(error_message("<html>oops</html>"), None);
    }
}
