use serde_json::{Map, Value};
use uuid::Uuid;

use crate::matching::{id_key, strict_eq};

/// An open-ended JSON object. Field order is kept as submitted.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "id";

/// A record lacks an id when the field is missing or falsy
/// (`null`, `false`, `0` or the empty string).
pub fn lacks_id(record: &Record) -> bool {
    match record.get(ID_FIELD) {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Give the record a fresh v4 UUID if it lacks an id. Returns whether one was generated.
pub fn ensure_id(record: &mut Record) -> bool {
    if !lacks_id(record) {
        return false;
    }
    record.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
    true
}

/// The record's id in canonical string form, if it has a usable one.
pub fn record_key(record: &Record) -> Option<String> {
    record.get(ID_FIELD).and_then(id_key).map(|k| k.into_owned())
}

pub fn has_key(record: &Record, key: &str) -> bool {
    record.get(ID_FIELD).is_some_and(|id| strict_eq(id, key))
}

/// Shallow merge: fields of `partial` override same-named fields of `base`,
/// fields only in `base` are kept.
pub fn merge(base: Record, partial: Record) -> Record {
    let mut merged = base;
    for (field, value) in partial {
        merged.insert(field, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn falsy_ids_count_as_missing() {
        for id in [json!(null), json!(false), json!(0), json!("")] {
            assert!(lacks_id(&obj(json!({ "id": id }))));
        }
        assert!(lacks_id(&obj(json!({ "name": "Ann" }))));
        assert!(!lacks_id(&obj(json!({ "id": 7 }))));
        assert!(!lacks_id(&obj(json!({ "id": "x" }))));
    }

    #[test]
    fn ensure_id_generates_uuid_only_when_missing() {
        let mut fresh = obj(json!({ "name": "Ann" }));
        assert!(ensure_id(&mut fresh));
        let id = fresh["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let mut explicit = obj(json!({ "id": "abc" }));
        assert!(!ensure_id(&mut explicit));
        assert_eq!(explicit["id"], "abc");
    }

    #[test]
    fn merge_overrides_named_fields_and_keeps_the_rest() {
        let base = obj(json!({ "id": "1", "name": "Ann", "age": 30 }));
        let merged = merge(base, obj(json!({ "name": "Annie", "city": "Oslo" })));
        assert_eq!(merged, obj(json!({ "id": "1", "name": "Annie", "age": 30, "city": "Oslo" })));
        let keys: Vec<_> = merged.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name", "age", "city"]);
    }

    #[test]
    fn merge_over_empty_base_is_the_partial() {
        let partial = obj(json!({ "name": "Ghost" }));
        assert_eq!(merge(Record::new(), partial.clone()), partial);
    }

    #[test]
    fn record_key_renders_numbers() {
        assert_eq!(record_key(&obj(json!({ "id": 5 }))).as_deref(), Some("5"));
        assert_eq!(record_key(&obj(json!({ "id": null }))), None);
        assert!(has_key(&obj(json!({ "id": 5 })), "5"));
        assert_eq!(record_key(&obj(json!({ "id": 5.0 }))).as_deref(), Some("5"));
        assert_eq!(record_key(&obj(json!({ "id": true }))).as_deref(), Some("true"));
    }
}
