use crate::condition::FieldValue;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// Live data of the record a workflow instance runs for, keyed by field name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct EntityData {
    pub fields: AHashMap<String, serde_json::Value>,
}

impl EntityData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load record data from a JSON object file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let data = serde_json::from_str(&content)?;
        Ok(data)
    }

    pub fn with(mut self, field: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: serde_json::Value) {
        self.fields.insert(field.into(), value);
    }

    /// The typed value of `field`; missing fields are `Null`.
    pub fn field_value(&self, field: &str) -> FieldValue {
        self.fields
            .get(field)
            .map_or(FieldValue::Null, FieldValue::from_json)
    }
}
