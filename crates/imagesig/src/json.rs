//! Paranoid JSON decoding for untrusted signature data.
//!
//! Standard decoders accept duplicate keys ("last key wins"), silently ignore
//! unknown fields and default missing ones. Any of those lets an attacker
//! shape a payload that different parsers read differently, so every
//! untrusted JSON document in this crate goes through [`Fields`]:
//!
//! - the input must be exactly one syntactically valid JSON value
//! - objects must not contain duplicate keys, at any nesting level
//! - [`Fields::exact`] requires exactly the expected keys, no more, no less
//! - [`Fields::lenient`] accepts any keys, for sub-objects where forward
//!   compatibility is wanted; fields are then looked up on demand
//! - each field is decoded into its destination type with no coercion
//!
//! ```
//! use imagesig::json::Fields;
//!
//! let mut fields = Fields::parse_exact(br#"{"name":"a","size":1}"#, &["name", "size"]).unwrap();
//! let name: String = fields.take("name").unwrap();
//! let size: u64 = fields.take("size").unwrap();
//! assert_eq!((name.as_str(), size), ("a", 1));
//!
//! assert!(Fields::parse_exact(br#"{"name":"a","name":"b"}"#, &["name"]).is_err());
//! assert!(Fields::parse_exact(br#"{"name":"a","extra":1}"#, &["name"]).is_err());
//! ```

use std::cell::RefCell;
use std::fmt;

use serde::de::{DeserializeOwned, DeserializeSeed, Error as _, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

/// JSON does not match the expected format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonFormatError {
    /// Not syntactically valid JSON.
    #[error("invalid JSON: {message}")]
    Syntax { message: String },

    /// A JSON object was expected.
    #[error("JSON value is not an object")]
    NotAnObject,

    /// The same key appears twice in one object.
    #[error("duplicate key {key:?} in a JSON object")]
    DuplicateKey { key: String },

    /// A required key is absent.
    #[error("key {key:?} missing in a JSON object")]
    MissingKey { key: String },

    /// A key outside the expected set is present.
    #[error("unexpected key {key:?} in a JSON object")]
    UnexpectedKey { key: String },

    /// A field value has the wrong type.
    #[error("field {key:?} has an unexpected value: {message}")]
    FieldType { key: String, message: String },
}

/// Parses `data` as a single JSON value, rejecting duplicate object keys.
pub fn parse_strict(data: &[u8]) -> Result<Value, JsonFormatError> {
    let duplicate = RefCell::new(None);
    let mut de = serde_json::Deserializer::from_slice(data);
    let parsed = StrictSeed {
        duplicate: &duplicate,
    }
    .deserialize(&mut de)
    .and_then(|value| de.end().map(|()| value));

    match parsed {
        Ok(value) => Ok(value),
        Err(e) => match duplicate.into_inner() {
            Some(key) => Err(JsonFormatError::DuplicateKey { key }),
            None => Err(JsonFormatError::Syntax {
                message: e.to_string(),
            }),
        },
    }
}

/// The members of one JSON object, consumed field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    object: Map<String, Value>,
}

impl Fields {
    /// Requires `value` to be an object with exactly the `expected` keys.
    ///
    /// `expected` must be pairwise distinct.
    pub fn exact(value: Value, expected: &[&str]) -> Result<Self, JsonFormatError> {
        let object = into_object(value)?;
        if let Some(key) = object.keys().find(|k| !expected.contains(&k.as_str())) {
            return Err(JsonFormatError::UnexpectedKey { key: key.clone() });
        }
        if let Some(key) = expected.iter().find(|k| !object.contains_key(**k)) {
            return Err(JsonFormatError::MissingKey {
                key: (*key).to_string(),
            });
        }
        Ok(Self { object })
    }

    /// Requires `value` to be an object; any keys are accepted.
    pub fn lenient(value: Value) -> Result<Self, JsonFormatError> {
        into_object(value).map(|object| Self { object })
    }

    /// [`parse_strict`] followed by [`Fields::exact`].
    pub fn parse_exact(data: &[u8], expected: &[&str]) -> Result<Self, JsonFormatError> {
        Self::exact(parse_strict(data)?, expected)
    }

    /// [`parse_strict`] followed by [`Fields::lenient`].
    pub fn parse_lenient(data: &[u8]) -> Result<Self, JsonFormatError> {
        Self::lenient(parse_strict(data)?)
    }

    /// Removes and decodes a required field.
    pub fn take<T: DeserializeOwned>(&mut self, key: &str) -> Result<T, JsonFormatError> {
        let value = self
            .object
            .remove(key)
            .ok_or_else(|| JsonFormatError::MissingKey {
                key: key.to_string(),
            })?;
        decode_field(key, value)
    }

    /// Removes and decodes a field if present; `None` means the key was absent.
    pub fn take_optional<T: DeserializeOwned>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, JsonFormatError> {
        match self.object.remove(key) {
            Some(value) => decode_field(key, value).map(Some),
            None => Ok(None),
        }
    }

    /// Removes a required field that must itself be an object with exactly `expected` keys.
    pub fn take_exact(&mut self, key: &str, expected: &[&str]) -> Result<Fields, JsonFormatError> {
        let value: Value = self.take(key)?;
        Fields::exact(value, expected).map_err(|e| nested(key, e))
    }

    /// Removes a required field without decoding it.
    pub fn take_raw(&mut self, key: &str) -> Result<Value, JsonFormatError> {
        self.take(key)
    }

    /// Whether a key is (still) present.
    pub fn contains(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>, JsonFormatError> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(JsonFormatError::NotAnObject),
    }
}

fn decode_field<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, JsonFormatError> {
    serde_json::from_value(value).map_err(|e| JsonFormatError::FieldType {
        key: key.to_string(),
        message: e.to_string(),
    })
}

// Prefixes the parent key so errors in nested objects point at the full path.
fn nested(parent: &str, err: JsonFormatError) -> JsonFormatError {
    match err {
        JsonFormatError::NotAnObject => JsonFormatError::FieldType {
            key: parent.to_string(),
            message: "not a JSON object".to_string(),
        },
        JsonFormatError::MissingKey { key } => JsonFormatError::MissingKey {
            key: format!("{parent}.{key}"),
        },
        JsonFormatError::UnexpectedKey { key } => JsonFormatError::UnexpectedKey {
            key: format!("{parent}.{key}"),
        },
        other => other,
    }
}

/// Builds a `serde_json::Value`, recording the first duplicate key it meets.
#[derive(Clone, Copy)]
struct StrictSeed<'a> {
    duplicate: &'a RefCell<Option<String>>,
}

impl<'de> DeserializeSeed<'de> for StrictSeed<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for StrictSeed<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Value, E> {
        Number::from_f64(v)
            .map(Value::Number)
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(self)? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if object.contains_key(&key) {
                let message = format!("duplicate key {key:?}");
                self.duplicate.borrow_mut().get_or_insert(key);
                return Err(A::Error::custom(message));
            }
            let value = map.next_value_seed(self)?;
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }
}
