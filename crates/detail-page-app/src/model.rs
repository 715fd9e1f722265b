//! # Asset Model
//!
//! The record type managed by the asset detail page. Well-known attributes
//! are plain struct fields; `user_defined_fields` is the one dynamic region,
//! merged entry by entry through the dotted `userDefinedFields.X` keys.

use detail_page::EntityRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// A physical asset (a pump, a valve, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Persisted identifier; absent until the asset is created.
    pub code: Option<String>,
    pub description: String,
    pub department: String,
    #[serde(default)]
    pub user_defined_fields: BTreeMap<String, Value>,
}

impl EntityRecord for Asset {
    fn code(&self) -> Option<String> {
        self.code.clone()
    }

    fn set_attribute(&mut self, key: &str, value: Value) {
        let text = || value.as_str().unwrap_or_default().to_owned();
        match key {
            "code" => self.code = value.as_str().map(str::to_owned),
            "description" => self.description = text(),
            "department" => self.department = text(),
            _ => debug!(attribute = key, "Edit of unknown asset attribute dropped"),
        }
    }

    fn set_user_defined(&mut self, name: &str, value: Value) {
        self.user_defined_fields.insert(name.to_owned(), value);
    }
}
