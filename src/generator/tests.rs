#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::config::FormboxConfig;
use crate::form::{FieldKind, FieldSpec};
use crate::record::{NoRecords, Record, RecordStore};
use crate::schema::{load_schema_from_str, ModelSchema, RelationKind, SchemaCatalog, TypeTag};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("gen_test_{}_{}", std::process::id(), nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const SCHEMA: &str = r#"
models:
  Product:
    columns:
      - { name: id, type: integer }
      - { name: title, type: string }
      - { name: description, type: text }
      - { name: price, type: decimal }
      - { name: released_on, type: date }
      - { name: photo, type: binary }
      - { name: category_id, type: integer }
      - { name: created_at, type: timestamp }
    relations:
      - { name: category, kind: belongs_to }
      - { name: tags, kind: has_many }
      - { name: manual, kind: has_one }
  Category:
    columns:
      - { name: name, type: string }
  Tag:
    columns:
      - { name: name, type: string }
"#;

fn catalog() -> SchemaCatalog {
    load_schema_from_str(SCHEMA).unwrap()
}

fn options(output: PathBuf) -> ScaffoldOptions {
    ScaffoldOptions {
        output,
        ..Default::default()
    }
}

#[test]
fn test_scaffold_layout_fields() {
    let catalog = catalog();
    let model = &catalog.models["Product"];
    let layout = scaffold_layout(model, &FormboxConfig::default());
    let names: Vec<&str> = layout.field_names().collect();
    assert_eq!(
        names,
        vec!["title", "description", "price", "released_on", "category", "tags"]
    );
    assert_eq!(layout.fields[1].options.rows, Some(6));
    assert_eq!(layout.submit.as_deref(), Some("Save"));
}

#[test]
fn test_scaffold_layout_password() {
    let model = ModelSchema::new("User")
        .with_column("login", TypeTag::String)
        .with_column("password", TypeTag::String);
    let layout = scaffold_layout(&model, &FormboxConfig::default());
    assert_eq!(layout.fields[1].kind, FieldKind::Password);
}

#[test]
fn test_generate_writes_all_files() {
    let dir = temp_dir();
    let catalog = catalog();
    let mut store = RecordStore::default();
    store.insert("Category", Record::new().with("id", 1).with("name", "Tools"));
    store.insert(
        "Product",
        Record::new()
            .with("id", 7)
            .with("title", "Hammer")
            .with("category_id", 1)
            .with("tags", json!([])),
    );

    let report = generate_scaffold(
        &catalog,
        "Product",
        &store,
        &FormboxConfig::default(),
        &options(dir.clone()),
    )
    .unwrap();

    assert_eq!(report.model, "Product");
    assert_eq!(report.dir, dir.join("products"));
    for file in ["form.yaml", "new.html", "edit.html", "show.html", "index.html"] {
        assert!(dir.join("products").join(file).exists(), "missing {file}");
    }
    assert!(dir.join("stylesheets/form_box.css").exists());
    assert_eq!(report.files.written.len(), 6);
    assert!(report.field_errors.is_empty());

    let new_page = fs::read_to_string(dir.join("products/new.html")).unwrap();
    assert!(new_page.contains("<form action=\"/products\" method=\"post\">"));
    assert!(new_page.contains("irow_product_title"));
    assert!(new_page.contains("Calendar.setup"));
    assert!(new_page.contains("<option value=\"1\">Tools</option>"));

    let edit_page = fs::read_to_string(dir.join("products/edit.html")).unwrap();
    assert!(edit_page.contains("action=\"/products/7\""));
    assert!(edit_page.contains("value=\"put\""));
    assert!(edit_page.contains("value=\"Hammer\""));

    let show_page = fs::read_to_string(dir.join("products/show.html")).unwrap();
    assert!(!show_page.contains("<form"));
    assert!(show_page.contains("Hammer"));
    assert!(show_page.contains("Tools"));

    let index = fs::read_to_string(dir.join("products/index.html")).unwrap();
    assert!(index.contains("<th>Title</th>"));
    assert!(index.contains("<td>Hammer</td>"));
    assert!(index.contains("href=\"/products/7/edit\""));

    let layout: crate::form::FormLayout =
        serde_yaml::from_str(&fs::read_to_string(dir.join("products/form.yaml")).unwrap()).unwrap();
    assert_eq!(layout.model, "Product");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_existing_files_skipped_unless_forced() {
    let dir = temp_dir();
    let catalog = catalog();
    let config = FormboxConfig::default();
    generate_scaffold(&catalog, "Product", &NoRecords, &config, &options(dir.clone())).unwrap();

    let form = dir.join("products/new.html");
    let css = dir.join("stylesheets/form_box.css");
    fs::write(&form, "custom").unwrap();
    fs::write(&css, "custom css").unwrap();

    let report =
        generate_scaffold(&catalog, "Product", &NoRecords, &config, &options(dir.clone())).unwrap();
    assert!(report.files.written.is_empty());
    assert_eq!(report.files.skipped.len(), 6);
    assert_eq!(fs::read_to_string(&form).unwrap(), "custom");

    let forced = ScaffoldOptions {
        force: true,
        ..options(dir.clone())
    };
    generate_scaffold(&catalog, "Product", &NoRecords, &config, &forced).unwrap();
    assert_ne!(fs::read_to_string(&form).unwrap(), "custom");
    // The stylesheet is never replaced
    assert_eq!(fs::read_to_string(&css).unwrap(), "custom css");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = temp_dir();
    let dry = ScaffoldOptions {
        dry_run: true,
        ..options(dir.clone())
    };
    let report =
        generate_scaffold(&catalog(), "Product", &NoRecords, &FormboxConfig::default(), &dry)
            .unwrap();
    assert_eq!(report.files.written.len(), 6);
    assert!(!dir.join("products").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_plural_model_name_is_singularized() {
    let dir = temp_dir();
    let report = generate_scaffold(
        &catalog(),
        "products",
        &NoRecords,
        &FormboxConfig::default(),
        &ScaffoldOptions {
            dry_run: true,
            ..options(dir.clone())
        },
    )
    .unwrap();
    assert_eq!(report.model, "Product");

    let err = generate_scaffold(
        &catalog(),
        "products",
        &NoRecords,
        &FormboxConfig::default(),
        &ScaffoldOptions {
            dry_run: true,
            force_plural: true,
            ..options(dir.clone())
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("Products"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_known_model_name_is_not_singularized() {
    let dir = temp_dir();
    let mut catalog = catalog();
    catalog.insert(ModelSchema::new("Status").with_column("label", TypeTag::String));
    for name in ["Status", "status"] {
        let report = generate_scaffold(
            &catalog,
            name,
            &NoRecords,
            &FormboxConfig::default(),
            &ScaffoldOptions {
                dry_run: true,
                ..options(dir.clone())
            },
        )
        .unwrap();
        assert_eq!(report.model, "Status");
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_unknown_model() {
    let dir = temp_dir();
    let err = generate_scaffold(
        &SchemaCatalog::default(),
        "Widget",
        &NoRecords,
        &FormboxConfig::default(),
        &options(dir.clone()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_layout_round_trips_through_builder() {
    let mut catalog = SchemaCatalog::default();
    catalog.insert(
        ModelSchema::new("Note")
            .with_column("body", TypeTag::Text)
            .with_relation("author", RelationKind::BelongsTo),
    );
    let layout = scaffold_layout(&catalog.models["Note"], &FormboxConfig::default());
    assert_eq!(
        layout.fields,
        vec![
            FieldSpec::new("body").with_options(crate::form::RenderOptions::new().rows(6)),
            FieldSpec::new("author"),
        ]
    );
}
