//! # Entity Records
//!
//! The [`EntityRecord`] trait is the contract between the page controller and
//! the record type of one entity kind. Well-known attributes should be
//! concrete struct fields on the entity kind's own record type; the
//! user-defined-fields sub-map is the one deliberately dynamic region.
//!
//! [`DynamicRecord`] is a ready-made implementation backed by a JSON object,
//! for entity kinds that are dynamic end to end (and for tests).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Key prefix addressing the dynamic user-defined-fields sub-map of a record.
pub const USER_DEFINED_FIELDS: &str = "userDefinedFields";

/// Record type of one entity kind, as seen by the page controller.
///
/// The controller replaces records wholesale on successful load/create/update
/// and mutates them field-by-field on user edits; it never inspects anything
/// beyond the operations below.
pub trait EntityRecord: Clone + Debug + Send + Sync + 'static {
    /// The persisted unique identifier (the entity kind's "code property"),
    /// or `None` while the record has not been persisted yet.
    fn code(&self) -> Option<String>;

    /// Set a top-level attribute.
    fn set_attribute(&mut self, key: &str, value: Value);

    /// Merge one entry into the user-defined-fields sub-map, leaving every
    /// other entry of that sub-map untouched.
    fn set_user_defined(&mut self, name: &str, value: Value);

    /// Apply one field edit addressed by a registration key. Dotted
    /// `userDefinedFields.X` keys merge into the user-defined sub-map only;
    /// anything else sets the top-level attribute directly.
    fn apply_field(&mut self, key: &str, value: Value) {
        match key.split_once('.') {
            Some((prefix, name)) if prefix == USER_DEFINED_FIELDS => {
                self.set_user_defined(name, value);
            }
            _ => self.set_attribute(key, value),
        }
    }
}

/// A fully dynamic record: an open key-value mapping with a configurable
/// code property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicRecord {
    code_property: String,
    fields: Map<String, Value>,
}

impl DynamicRecord {
    pub fn new(code_property: impl Into<String>) -> Self {
        Self {
            code_property: code_property.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn user_defined(&self, name: &str) -> Option<&Value> {
        self.fields
            .get(USER_DEFINED_FIELDS)
            .and_then(Value::as_object)
            .and_then(|udf| udf.get(name))
    }
}

impl EntityRecord for DynamicRecord {
    fn code(&self) -> Option<String> {
        self.fields
            .get(&self.code_property)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn set_attribute(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_owned(), value);
    }

    fn set_user_defined(&mut self, name: &str, value: Value) {
        let sub = self
            .fields
            .entry(USER_DEFINED_FIELDS.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = sub {
            map.insert(name.to_owned(), value);
        }
    }
}
