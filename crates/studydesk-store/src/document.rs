use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Store-assigned document identifier (UUID v4).
pub type DocId = Uuid;

/// Path of a collection, e.g. `users/42/notes` or `quizzes`.
pub type CollectionPath = String;

/// Field map of a document.
pub type Payload = BTreeMap<String, Value>;

/// Dynamic value type for payload fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Ordering used by queries. Numbers compare across `Int`/`Float`;
    /// values of different kinds are unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

/// Fields supplied by the client when creating a document.
///
/// The store assigns the id; timestamps are stamped by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    pub payload: Payload,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl NewDocument {
    pub fn new(payload: Payload, at: DateTime<Utc>) -> Self {
        Self {
            payload,
            created: at,
            modified: at,
        }
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub collection: CollectionPath,
    pub payload: Payload,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Document {
    /// Resolve a field path: `id`, `created`, `modified`, `payload.<name>`
    /// or a bare payload field name.
    pub fn field(&self, path: &str) -> Option<Value> {
        match path {
            "id" => Some(Value::String(self.id.to_string())),
            "created" => Some(Value::Int(self.created.timestamp_millis())),
            "modified" => Some(Value::Int(self.modified.timestamp_millis())),
            p => {
                let name = p.strip_prefix("payload.").unwrap_or(p);
                self.payload.get(name).cloned()
            }
        }
    }
}

/// Build a per-user sub-collection path (`users/{uid}/{kind}`).
pub fn user_collection(user_id: &str, kind: &str) -> CollectionPath {
    format!("users/{}/{}", user_id, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> Document {
        let mut payload = Payload::new();
        payload.insert("title".into(), Value::String("Direito Civil".into()));
        payload.insert("progress".into(), Value::Int(40));
        Document {
            id: Uuid::new_v4(),
            collection: user_collection("u1", "studyPlans"),
            payload,
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    #[test]
    fn json_conversion_keeps_integers_integral() {
        let json = serde_json::json!({"score": 80, "ratio": 0.5, "tags": ["a"]});
        let value = Value::from(json.clone());
        match &value {
            Value::Object(map) => {
                assert_eq!(map.get("score"), Some(&Value::Int(80)));
                assert_eq!(map.get("ratio"), Some(&Value::Float(0.5)));
            }
            other => panic!("expected object, got {:?}", other),
        }
        assert_eq!(serde_json::Value::from(value), json);
    }

    #[test]
    fn compare_mixes_int_and_float() {
        assert_eq!(Value::Int(2).compare(&Value::Float(2.5)), Some(Ordering::Less));
        assert_eq!(
            Value::String("b".into()).compare(&Value::String("a".into())),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Int(1).compare(&Value::String("1".into())), None);
    }

    #[test]
    fn field_resolution() {
        let doc = sample_doc();
        assert_eq!(doc.field("title"), Some(Value::String("Direito Civil".into())));
        assert_eq!(doc.field("payload.progress"), Some(Value::Int(40)));
        assert_eq!(
            doc.field("created"),
            Some(Value::Int(doc.created.timestamp_millis()))
        );
        assert!(doc.field("missing").is_none());
    }

    #[test]
    fn user_collection_path() {
        assert_eq!(user_collection("abc", "notes"), "users/abc/notes");
    }
}
