use askama::Template;
use std::path::PathBuf;

use super::templates::{
    write_file, write_stylesheet, IndexRow, IndexTemplateData, PageLink, PageTemplateData,
    WriteLog,
};
use crate::config::FormboxConfig;
use crate::form::{
    type_for_field, FieldError, FieldKind, FieldSpec, FormBuilder, FormLayout, RenderOptions,
};
use crate::naming::{humanize, is_plural, pluralize, singularize, to_camel_case, to_snake_case};
use crate::record::{Record, RecordSource};
use crate::schema::{ModelSchema, SchemaCatalog, SchemaProvider, TypeTag};

/// Columns managed by the persistence layer, never put in a form.
const BOOKKEEPING_COLUMNS: &[&str] = &[
    "id",
    "created_at",
    "updated_at",
    "created_on",
    "updated_on",
    "lock_version",
];

/// Options of a scaffold run
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOptions {
    /// Directory receiving `<plural>/` and `stylesheets/`
    pub output: PathBuf,
    /// Overwrite existing files (the stylesheet excepted)
    pub force: bool,
    /// Report what would be written without touching the filesystem
    pub dry_run: bool,
    /// Keep a plural model name instead of singularizing it
    pub force_plural: bool,
}

/// Outcome of a scaffold run
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    /// Model the scaffold was generated for
    pub model: String,
    /// `<output>/<plural>`
    pub dir: PathBuf,
    pub files: WriteLog,
    /// Fields skipped while rendering the pages
    pub field_errors: Vec<FieldError>,
}

fn is_password(name: &str) -> bool {
    name == "password" || name == "password_confirmation"
}

/// Infer a form layout for `model`: every column except bookkeeping
/// columns, foreign keys of declared `belongs_to` relations and binary
/// columns, then every renderable relation. Text columns get
/// `config.text_rows` rows.
pub fn scaffold_layout(model: &ModelSchema, config: &FormboxConfig) -> FormLayout {
    let foreign_keys: Vec<String> = model
        .relations
        .iter()
        .filter(|r| r.kind.type_tag() == Some(TypeTag::BelongsTo))
        .map(|r| r.foreign_key())
        .collect();

    let mut layout = FormLayout::new(model.name.clone());
    layout.submit = Some("Save".to_string());

    for column in &model.columns {
        let name = column.name.as_str();
        if BOOKKEEPING_COLUMNS.contains(&name) || foreign_keys.iter().any(|fk| fk == name) {
            continue;
        }
        match type_for_field(Some(model), name).map(|t| t.tag) {
            Ok(TypeTag::Binary) | Err(_) => {
                tracing::warn!(model = %model.name, field = name, "leaving unrenderable column out of layout");
                continue;
            }
            Ok(tag) => {
                let mut spec = FieldSpec::new(name);
                if is_password(name) {
                    spec.kind = FieldKind::Password;
                } else if tag == TypeTag::Text {
                    spec.options = RenderOptions::new().rows(config.text_rows);
                }
                layout.fields.push(spec);
            }
        }
    }

    for relation in &model.relations {
        if relation.kind.type_tag().is_some() {
            layout.fields.push(FieldSpec::new(relation.name.clone()));
        } else {
            tracing::warn!(
                model = %model.name,
                relation = %relation.name,
                kind = %relation.kind,
                "leaving unsupported relation out of layout"
            );
        }
    }
    layout
}

/// Normalize a model name the catalog does not know verbatim.
///
/// Plural names are singularized with a warning unless `force_plural`.
fn model_key(name: &str, force_plural: bool) -> String {
    let snake = to_snake_case(name);
    if is_plural(&snake) && !force_plural {
        let singular = singularize(&snake);
        println!(
            "⚠️  Model name '{name}' looks plural, using '{}' (pass --force-plural to keep it)",
            to_camel_case(&singular)
        );
        return to_camel_case(&singular);
    }
    to_camel_case(&snake)
}

/// Generate the form layout, the CRUD page skeletons and the stylesheet for
/// one model of `catalog`.
///
/// ```text
/// <output>/
/// ├── products/
/// │   ├── form.yaml    # inferred layout
/// │   ├── new.html
/// │   ├── edit.html
/// │   ├── show.html
/// │   └── index.html
/// └── stylesheets/
///     └── form_box.css
/// ```
///
/// Candidate and listed records come from `records`; the edit and show
/// pages use the model's first record, or an empty one.
pub fn generate_scaffold(
    catalog: &SchemaCatalog,
    model: &str,
    records: &dyn RecordSource,
    config: &FormboxConfig,
    options: &ScaffoldOptions,
) -> anyhow::Result<ScaffoldReport> {
    let schema = match catalog.model(model) {
        Some(schema) => schema,
        None => {
            let key = model_key(model, options.force_plural);
            catalog
                .model(&key)
                .ok_or_else(|| anyhow::anyhow!("Model '{key}' not found in schema"))?
        }
    };

    let singular = to_snake_case(&schema.name);
    let plural = pluralize(&singular);
    let dir = options.output.join(&plural);
    let stylesheet_dir = options.output.join("stylesheets");
    let stylesheet = "../stylesheets/form_box.css".to_string();
    let base_path = format!("/{plural}");

    let layout = scaffold_layout(schema, config);
    let has_calendar = layout.fields.iter().any(|f| {
        type_for_field(Some(schema), &f.name)
            .map(|t| t.tag.is_temporal())
            .unwrap_or(false)
    });
    let listed = records.all(&schema.name);
    let sample = listed.first().cloned().unwrap_or_default();
    let sample_id = sample.id().unwrap_or_else(|| ":id".to_string());

    let mut files = WriteLog::default();
    let mut field_errors = Vec::new();
    let mut render = |record: Record, read_only: bool| -> String {
        let rendered = FormBuilder::for_layout(&layout, record, catalog, config)
            .with_records(records)
            .read_only(read_only)
            .render_layout(&layout);
        for err in rendered.errors {
            if !field_errors.contains(&err) {
                field_errors.push(err);
            }
        }
        rendered.html
    };

    let new_body = render(Record::new(), false);
    let edit_body = render(sample.clone(), false);
    let show_body = render(sample, true);

    let layout_yaml = serde_yaml::to_string(&layout)?;
    write_file(&dir.join("form.yaml"), &layout_yaml, options.force, options.dry_run, &mut files)?;

    let human = humanize(&singular);
    let index_link = PageLink::new("Back", base_path.clone());
    let pages = [
        (
            "new.html",
            PageTemplateData {
                title: format!("New {}", human.to_lowercase()),
                stylesheet: stylesheet.clone(),
                calendar: has_calendar,
                action: Some(base_path.clone()),
                method_override: None,
                body: new_body,
                links: vec![index_link.clone()],
            },
        ),
        (
            "edit.html",
            PageTemplateData {
                title: format!("Editing {}", human.to_lowercase()),
                stylesheet: stylesheet.clone(),
                calendar: has_calendar,
                action: Some(format!("{base_path}/{sample_id}")),
                method_override: Some("put".to_string()),
                body: edit_body,
                links: vec![
                    PageLink::new("Show", format!("{base_path}/{sample_id}")),
                    index_link.clone(),
                ],
            },
        ),
        (
            "show.html",
            PageTemplateData {
                title: human.clone(),
                stylesheet: stylesheet.clone(),
                calendar: false,
                action: None,
                method_override: None,
                body: show_body,
                links: vec![
                    PageLink::new("Edit", format!("{base_path}/{sample_id}/edit")),
                    index_link,
                ],
            },
        ),
    ];
    for (file, page) in pages {
        let rendered = page.render()?;
        write_file(&dir.join(file), &rendered, options.force, options.dry_run, &mut files)?;
    }

    let index = index_page(&layout, catalog, records, config, &listed, &human, &plural, stylesheet)?;
    write_file(&dir.join("index.html"), &index, options.force, options.dry_run, &mut files)?;

    write_stylesheet(&stylesheet_dir, options.dry_run, &mut files)?;

    tracing::info!(
        model = %schema.name,
        written = files.written.len(),
        skipped = files.skipped.len(),
        field_errors = field_errors.len(),
        "scaffold generated"
    );
    Ok(ScaffoldReport {
        model: schema.name.clone(),
        dir,
        files,
        field_errors,
    })
}

/// Listing of `listed` with one read-only cell per layout field.
#[allow(clippy::too_many_arguments)]
fn index_page(
    layout: &FormLayout,
    catalog: &SchemaCatalog,
    records: &dyn RecordSource,
    config: &FormboxConfig,
    listed: &[Record],
    human: &str,
    plural: &str,
    stylesheet: String,
) -> anyhow::Result<String> {
    let columns: Vec<&FieldSpec> = layout
        .fields
        .iter()
        .filter(|f| f.kind == FieldKind::Field)
        .collect();
    let rows = listed
        .iter()
        .map(|record| {
            let builder = FormBuilder::for_layout(layout, record.clone(), catalog, config)
                .with_records(records)
                .read_only(true);
            let cells = columns
                .iter()
                .map(|f| {
                    builder
                        .widget(&f.name, &f.options)
                        .ok()
                        .and_then(|w| w.constant_text().map(str::to_string))
                        .unwrap_or_default()
                })
                .collect();
            let id = record.id().unwrap_or_default();
            IndexRow {
                cells,
                show: format!("/{plural}/{id}"),
                edit: format!("/{plural}/{id}/edit"),
            }
        })
        .collect();

    let rendered = IndexTemplateData {
        title: humanize(plural),
        stylesheet,
        singular: human.to_lowercase(),
        headers: columns
            .iter()
            .map(|f| f.options.label.clone().unwrap_or_else(|| config.label_for(&f.name)))
            .collect(),
        rows,
        new_link: format!("/{plural}/new"),
    }
    .render()?;
    Ok(rendered)
}
