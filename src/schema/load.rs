use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

use super::types::SchemaCatalog;

/// Parse a YAML or JSON document, choosing the format by file extension.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);
    if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))
    }
}

/// Load a schema catalog from a YAML or JSON file.
///
/// The file has a single `models` map; each model's `name` is taken from its
/// key when not given explicitly.
///
/// ```yaml
/// models:
///   Product:
///     display: name
///     columns:
///       - { name: name, type: string }
///       - { name: price, type: decimal }
///     relations:
///       - { name: category, kind: belongs_to }
/// ```
pub fn load_schema(path: &Path) -> anyhow::Result<SchemaCatalog> {
    let mut catalog: SchemaCatalog = read_document(path)?;
    for (key, model) in catalog.models.iter_mut() {
        if model.name.is_empty() {
            model.name = key.clone();
        }
    }
    tracing::debug!(
        path = %path.display(),
        models = catalog.models.len(),
        "loaded schema catalog"
    );
    Ok(catalog)
}

/// Parse a schema catalog from an in-memory YAML string.
pub fn load_schema_from_str(yaml: &str) -> anyhow::Result<SchemaCatalog> {
    let mut catalog: SchemaCatalog = serde_yaml::from_str(yaml)?;
    for (key, model) in catalog.models.iter_mut() {
        if model.name.is_empty() {
            model.name = key.clone();
        }
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RelationKind, SchemaProvider, TypeTag};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
models:
  Product:
    display: name
    columns:
      - { name: name, type: string }
      - { name: published_on, type: date }
    relations:
      - { name: category, kind: belongs_to }
      - { name: tags, kind: has_many, class_name: Tag }
"#;

    #[test]
    fn test_load_yaml_file() {
        let mut temp = NamedTempFile::with_suffix(".yaml").unwrap();
        temp.write_all(YAML.as_bytes()).unwrap();
        temp.flush().unwrap();
        let catalog = load_schema(temp.path()).unwrap();
        let product = catalog.model("Product").unwrap();
        assert_eq!(product.name, "Product");
        assert_eq!(product.column("published_on").unwrap().ty, TypeTag::Date);
        assert_eq!(product.relation("tags").unwrap().target(), "Tag");
        assert_eq!(
            product.relation("category").unwrap().kind,
            RelationKind::BelongsTo
        );
    }

    #[test]
    fn test_load_json_file() {
        let mut temp = NamedTempFile::with_suffix(".json").unwrap();
        temp.write_all(
            br#"{"models": {"Tag": {"columns": [{"name": "label", "type": "string"}]}}}"#,
        )
        .unwrap();
        temp.flush().unwrap();
        let catalog = load_schema(temp.path()).unwrap();
        assert_eq!(catalog.model("Tag").unwrap().columns.len(), 1);
    }

    #[test]
    fn test_load_rejects_unknown_type() {
        let err = load_schema_from_str(
            "models:\n  Tag:\n    columns:\n      - { name: x, type: blob }\n",
        );
        assert!(err.is_err());
    }
}
