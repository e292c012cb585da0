use serde::{Deserialize, Serialize};
use std::path::Path;

use super::options::RenderOptions;
use crate::naming::to_snake_case;
use crate::schema::read_document;

/// What kind of row a layout entry produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Widget chosen from the field's type
    #[default]
    Field,
    /// Password input
    Password,
}

fn is_default_kind(kind: &FieldKind) -> bool {
    *kind == FieldKind::Field
}

/// One row of a form layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_default_kind")]
    pub kind: FieldKind,
    #[serde(flatten)]
    pub options: RenderOptions,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        FieldSpec {
            name: name.into(),
            kind: FieldKind::Field,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }
}

/// A whole form: the model it edits and its rows, in order.
///
/// ```yaml
/// model: Product
/// fields:
///   - name: title
///     required: true
///   - name: category
///     show: name
///   - name: description
///     rows: 6
/// submit: Save
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormLayout {
    pub model: String,
    /// Prefix of input names; defaults to the snake-cased model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    pub fields: Vec<FieldSpec>,
    /// Caption of the submit button; no button when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<String>,
}

impl FormLayout {
    pub fn new(model: impl Into<String>) -> Self {
        FormLayout {
            model: model.into(),
            object_name: None,
            read_only: false,
            fields: Vec::new(),
            submit: None,
        }
    }

    pub fn object_name(&self) -> String {
        self.object_name
            .clone()
            .unwrap_or_else(|| to_snake_case(&self.model))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Load a form layout from YAML or JSON.
pub fn load_layout(path: &Path) -> anyhow::Result<FormLayout> {
    let layout: FormLayout = read_document(path)?;
    tracing::debug!(
        path = %path.display(),
        model = %layout.model,
        fields = layout.fields.len(),
        "loaded form layout"
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LAYOUT: &str = r#"
model: Product
fields:
  - name: title
    required: true
  - name: secret
    kind: password
  - name: color
    radio: true
    choices: [[Red, r], [Green, g]]
submit: Save
"#;

    #[test]
    fn test_parse_layout() {
        let layout: FormLayout = serde_yaml::from_str(LAYOUT).unwrap();
        assert_eq!(layout.object_name(), "product");
        assert_eq!(layout.fields.len(), 3);
        assert!(layout.fields[0].options.required);
        assert_eq!(layout.fields[1].kind, FieldKind::Password);
        assert!(layout.fields[2].options.radio);
        assert_eq!(layout.fields[2].options.choices.as_ref().map(|c| c.len()), Some(2));
        assert_eq!(layout.submit.as_deref(), Some("Save"));
    }

    #[test]
    fn test_load_layout_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"model": "Product", "object_name": "item", "read_only": true, "fields": [{{"name": "title"}}]}}"#
        )
        .unwrap();
        let layout = load_layout(file.path()).unwrap();
        assert_eq!(layout.object_name(), "item");
        assert!(layout.read_only);
        assert_eq!(layout.field_names().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn test_serialize_skips_defaults() {
        let mut layout = FormLayout::new("Product");
        layout.fields.push(FieldSpec::new("title"));
        let yaml = serde_yaml::to_string(&layout).unwrap();
        assert!(!yaml.contains("kind"));
        assert!(!yaml.contains("read_only"));
        assert!(yaml.contains("- name: title"));
    }
}
