//! Shallow merge of a partial JSON update over a record.

use serde_json::{Map, Value};

/// Top-level keys a client may never overwrite.
const PROTECTED_FIELDS: &[&str] = &["id"];

/// Overwrites every top-level field present in `patch` and adds the ones
/// `fields` lacks. Values are taken as given, whatever their type.
pub fn merge(fields: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if PROTECTED_FIELDS.contains(&key.as_str()) {
            tracing::debug!(field = %key, "ignoring protected field in update");
            continue;
        }
        fields.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn overwrites_only_supplied_fields() {
        let mut guest = object(json!({"name": "John", "email": "john@example.com", "status": "pending"}));
        merge(&mut guest, object(json!({"status": "confirmed"})));

        assert_eq!(guest["status"], "confirmed");
        assert_eq!(guest["name"], "John");
        assert_eq!(guest["email"], "john@example.com");
    }

    #[test]
    fn unknown_fields_are_added() {
        let mut task = object(json!({"id": 1, "title": "Book AV"}));
        merge(&mut task, object(json!({"assignee": "Mike"})));
        assert_eq!(task["assignee"], "Mike");
    }

    #[test]
    fn id_cannot_be_overwritten() {
        let mut task = object(json!({"id": 3, "completed": false}));
        merge(&mut task, object(json!({"id": 99, "completed": true})));
        assert_eq!(task["id"], 3);
        assert_eq!(task["completed"], true);
    }

    #[test]
    fn values_of_any_type_replace_the_old_ones() {
        let mut event = object(json!({"date": "2024-03-15", "budget": 100, "status": "planning"}));
        merge(
            &mut event,
            object(json!({"date": 20240315, "budget": "lots", "status": null})),
        );
        assert_eq!(event["date"], 20240315);
        assert_eq!(event["budget"], "lots");
        assert_eq!(event["status"], Value::Null);
    }
}
