use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{value_to_string, Record};

/// Display accessors tried, in order, when a record has no explicit `show`.
pub const DEFAULT_SHOWERS: &[&str] = &["name"];

/// One `(label, value)` entry of a choice list.
///
/// Serialized as a two-element array, `["Label", "value"]`. The value may be
/// any scalar on input and is kept as its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, Value)", into = "(String, String)")]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Choice {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl From<(String, Value)> for Choice {
    fn from((label, value): (String, Value)) -> Self {
        Choice {
            label,
            value: value_to_string(&value),
        }
    }
}

impl From<Choice> for (String, String) {
    fn from(choice: Choice) -> Self {
        (choice.label, choice.value)
    }
}

/// Candidate values for a choice-driven widget, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceSource {
    /// Already paired `(label, value)` entries
    Pairs(Vec<Choice>),
    /// Bare strings used as both label and value
    Labels(Vec<String>),
    /// Domain objects; label and value are derived from their attributes
    Records(Vec<Record>),
}

impl ChoiceSource {
    pub fn len(&self) -> usize {
        match self {
            ChoiceSource::Pairs(c) => c.len(),
            ChoiceSource::Labels(c) => c.len(),
            ChoiceSource::Records(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Choice>> for ChoiceSource {
    fn from(choices: Vec<Choice>) -> Self {
        ChoiceSource::Pairs(choices)
    }
}

impl From<Vec<Record>> for ChoiceSource {
    fn from(records: Vec<Record>) -> Self {
        ChoiceSource::Records(records)
    }
}

/// Pick the attribute used to label `record`.
///
/// An explicit `show` always wins; otherwise the first of `showers` the
/// record carries. `None` means "stringify the record".
pub fn shower_for<'a>(record: &Record, show: Option<&'a str>, showers: &'a [String]) -> Option<&'a str> {
    if let Some(show) = show {
        return Some(show);
    }
    showers
        .iter()
        .map(String::as_str)
        .find(|s| record.has(s))
}

/// Display name of a single record.
pub fn record_label(record: &Record, show: Option<&str>, showers: &[String]) -> String {
    match shower_for(record, show, showers) {
        Some(attr) => value_to_string(&record.value(attr)),
        None => record.to_label(),
    }
}

/// Normalize a choice source into `(label, value)` pairs.
///
/// Pairs pass through unchanged, so normalizing an already normalized list
/// is a no-op. For records the display accessor is chosen once, from the
/// first record, and applied to all of them.
pub fn as_choices(source: &ChoiceSource, show: Option<&str>, showers: &[String]) -> Vec<Choice> {
    match source {
        ChoiceSource::Pairs(pairs) => pairs.clone(),
        ChoiceSource::Labels(labels) => labels
            .iter()
            .map(|l| Choice::new(l.clone(), l.clone()))
            .collect(),
        ChoiceSource::Records(records) => {
            let Some(first) = records.first() else {
                return Vec::new();
            };
            let shower = shower_for(first, show, showers);
            records
                .iter()
                .filter_map(|r| {
                    let label = match shower {
                        Some(attr) => value_to_string(&r.value(attr)),
                        None => r.to_label(),
                    };
                    let Some(id) = r.id() else {
                        tracing::warn!(label = %label, "skipping choice record without an id");
                        return None;
                    };
                    Some(Choice::new(label, id))
                })
                .collect()
        }
    }
}

/// Label of the choice whose value matches `value`.
pub fn option_text<'a>(choices: &'a [Choice], value: &str) -> Option<&'a str> {
    choices
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.label.as_str())
}

/// Default showers as owned strings.
pub fn default_showers() -> Vec<String> {
    DEFAULT_SHOWERS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            Record::new().with("id", 1).with("name", "Tools").with("code", "T"),
            Record::new().with("id", 2).with("name", "Toys").with("code", "Y"),
        ]
    }

    #[test]
    fn test_pairs_pass_through() {
        let pairs = vec![Choice::new("One", "1"), Choice::new("Two", "2")];
        let out = as_choices(&ChoiceSource::Pairs(pairs.clone()), None, &default_showers());
        assert_eq!(out, pairs);
    }

    #[test]
    fn test_records_use_preferred_shower() {
        let out = as_choices(&records().into(), None, &default_showers());
        assert_eq!(out, vec![Choice::new("Tools", "1"), Choice::new("Toys", "2")]);
    }

    #[test]
    fn test_records_explicit_show_wins() {
        let out = as_choices(&records().into(), Some("code"), &default_showers());
        assert_eq!(out, vec![Choice::new("T", "1"), Choice::new("Y", "2")]);
    }

    #[test]
    fn test_records_without_shower_are_stringified() {
        let recs = vec![Record::new().with("id", 9).with("title", "x")];
        let out = as_choices(&recs.into(), None, &default_showers());
        assert_eq!(out, vec![Choice::new("#9", "9")]);
    }

    #[test]
    fn test_records_without_id_are_skipped() {
        let recs = vec![
            Record::new().with("name", "Orphan"),
            Record::new().with("id", 3).with("name", "Kept"),
            Record::new().with("id", Value::Null).with("name", "Blank"),
        ];
        let out = as_choices(&recs.into(), None, &default_showers());
        assert_eq!(out, vec![Choice::new("Kept", "3")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(as_choices(&ChoiceSource::Records(vec![]), None, &[]).is_empty());
        assert!(as_choices(&ChoiceSource::Pairs(vec![]), None, &[]).is_empty());
    }

    #[test]
    fn test_deserialize_shapes() {
        let pairs: ChoiceSource = serde_json::from_value(json!([["No", 0], ["Yes", 1]])).unwrap();
        assert_eq!(
            pairs,
            ChoiceSource::Pairs(vec![Choice::new("No", "0"), Choice::new("Yes", "1")])
        );
        let labels: ChoiceSource = serde_json::from_value(json!(["red", "green"])).unwrap();
        assert_eq!(labels.len(), 2);
        assert!(matches!(labels, ChoiceSource::Labels(_)));
        let recs: ChoiceSource =
            serde_json::from_value(json!([{"id": 1, "name": "Tools"}])).unwrap();
        assert!(matches!(recs, ChoiceSource::Records(_)));
    }

    #[test]
    fn test_option_text() {
        let choices = vec![Choice::new("One", "1"), Choice::new("Two", "2")];
        assert_eq!(option_text(&choices, "2"), Some("Two"));
        assert_eq!(option_text(&choices, "3"), None);
    }
}
