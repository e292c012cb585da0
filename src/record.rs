//! # Record Module
//!
//! Record values handed to the form builder. A [`Record`] is a plain map of
//! attribute name to JSON value; associations are nested objects
//! (`belongs_to`) or arrays of objects (`has_many`). The identity key is the
//! `id` attribute.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::schema::read_document;

/// One data record: attribute name → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Value of `field`, or `Null` when absent.
    pub fn value(&self, field: &str) -> Value {
        self.attributes.get(field).cloned().unwrap_or(Value::Null)
    }

    pub fn has(&self, field: &str) -> bool {
        self.attributes.contains_key(field)
    }

    /// Identity key as a string.
    pub fn id(&self) -> Option<String> {
        self.attributes
            .get("id")
            .filter(|v| !v.is_null())
            .map(value_to_string)
    }

    /// Fallback label when no display attribute is available.
    pub fn to_label(&self) -> String {
        match self.id() {
            Some(id) => format!("#{id}"),
            None => Value::Object(self.attributes.clone()).to_string(),
        }
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl From<Map<String, Value>> for Record {
    fn from(attributes: Map<String, Value>) -> Self {
        Record { attributes }
    }
}

/// Render a JSON value as plain text.
///
/// Objects render as their `id`, arrays as a comma-joined list.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => match map.get("id") {
            Some(id) if !id.is_null() => value_to_string(id),
            _ => value.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Truthiness of a boolean-ish column value.
///
/// `null`, `false`, `0`, `""`, `"0"`, `"f"`, `"false"` and `"no"` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "f" | "false" | "no"
        ),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Supplies every instance of a model, used as the default candidate list of
/// association widgets.
pub trait RecordSource {
    fn all(&self, model: &str) -> Vec<Record>;
}

/// A source with no records at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecords;

impl RecordSource for NoRecords {
    fn all(&self, _model: &str) -> Vec<Record> {
        Vec::new()
    }
}

/// In-memory record fixtures keyed by model name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: BTreeMap<String, Vec<Record>>,
}

impl RecordStore {
    pub fn insert(&mut self, model: impl Into<String>, record: Record) {
        self.records.entry(model.into()).or_default().push(record);
    }

    pub fn first(&self, model: &str) -> Option<&Record> {
        self.records.get(model).and_then(|r| r.first())
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSource for RecordStore {
    fn all(&self, model: &str) -> Vec<Record> {
        self.records.get(model).cloned().unwrap_or_default()
    }
}

/// Load record fixtures (`{ Model: [ {..}, {..} ] }`) from YAML or JSON.
pub fn load_records(path: &Path) -> anyhow::Result<RecordStore> {
    read_document(path)
}

/// Load a single record from YAML or JSON.
pub fn load_record(path: &Path) -> anyhow::Result<Record> {
    read_document(path)
}
