//! User record payload and the user identifier read from the form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name the remote store uses for the record identifier.
pub const ID_ATTRIBUTE: &str = "user-id";

/// Key of the checkbox-backed admin flag.
pub const ADMIN_ROLE: &str = "admin_role";

/// Value stored under `admin_role` when the checkbox is checked.
pub const ADMIN_ROLE_ON: &str = "on";

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern"));

/// Flat mapping from field name to field value, rebuilt on every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord {
    fields: BTreeMap<String, Option<String>>,
}

impl UserRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous one (last write wins).
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        self.fields.insert(key.into(), value);
    }

    /// Value under `key`; `None` both when the key is missing and when it is null.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.fields.iter()
    }

    /// JSON body sent to the store. Updates also carry the identifier attribute.
    pub fn to_payload(&self, id: Option<u64>) -> Value {
        let mut body = Map::new();
        if let Some(id) = id {
            body.insert(ID_ATTRIBUTE.to_string(), Value::from(id));
        }
        for (key, value) in &self.fields {
            let value = match value {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            };
            body.insert(key.clone(), value);
        }
        Value::Object(body)
    }

    /// Build a record from a store response. Non-string scalars are stringified,
    /// the identifier attribute is skipped.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut record = Self::new();
        for (key, value) in object {
            if key == ID_ATTRIBUTE {
                continue;
            }
            let value = match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                Value::Bool(b) => Some(b.to_string()),
                Value::Number(n) => Some(n.to_string()),
                other => Some(other.to_string()),
            };
            record.set(key.clone(), value);
        }
        Some(record)
    }
}

/// Identifier read from the `user_id` input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserId {
    /// Negative sentinel: the user has not been created yet.
    New,
    /// Update the user with this identifier.
    Existing(u64),
    /// The input held no leading integer.
    Unparsed,
}

impl UserId {
    /// Parse with leading-integer semantics: surrounding whitespace, an optional
    /// sign and leading digits; trailing text is ignored.
    pub fn parse(input: &str) -> Self {
        let Some(caps) = LEADING_INT.captures(input) else {
            return UserId::Unparsed;
        };
        let digits = &caps[1];
        if digits.starts_with('-') {
            // "-0" is zero, not the sentinel
            if digits[1..].bytes().all(|b| b == b'0') {
                return UserId::Existing(0);
            }
            return UserId::New;
        }
        match digits.trim_start_matches('+').parse::<u64>() {
            Ok(id) => UserId::Existing(id),
            Err(_) => UserId::Unparsed,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, UserId::New)
    }

    /// Identifier to address an update with, if any.
    pub fn existing(&self) -> Option<u64> {
        match self {
            UserId::Existing(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::New => write!(f, "-1"),
            UserId::Existing(id) => write!(f, "{}", id),
            UserId::Unparsed => write!(f, "?"),
        }
    }
}
