//! # Form Builder
//!
//! Renders the rows of a form for one record. For each field the builder
//! asks the schema for the declared type, snapshots the current value from
//! the record, gathers association candidates from a [`RecordSource`],
//! resolves a [`Widget`] and renders it inside an `irow` div together with
//! its label:
//!
//! ```html
//! <div class="irow" id="irow_product_title">
//!   <div class="label"><label for="product_title">Title</label></div>
//!   <div class="input"><input type="text" id="product_title" name="product[title]" value="" /></div>
//!   <div style="clear:left"></div>
//! </div>
//! ```
//!
//! A whole [`FormLayout`] can be rendered at once with
//! [`FormBuilder::render_layout`]; fields that fail are skipped and their
//! [`FieldError`]s returned next to the markup.

use serde_json::Value;
use std::collections::BTreeMap;

use super::choices::{as_choices, ChoiceSource};
use super::descriptor::{type_for_field, FieldDescriptor, RelationTarget};
use super::error::FieldError;
use super::layout::{FieldKind, FormLayout};
use super::options::RenderOptions;
use super::render::{
    field_id, render_form, render_label, render_password, render_row, render_submit,
    render_widget, LabelParts,
};
use super::resolve::resolve_with;
use super::widget::Widget;
use crate::config::FormboxConfig;
use crate::naming::{singularize, to_camel_case, to_snake_case};
use crate::record::{NoRecords, Record, RecordSource};
use crate::schema::{ModelSchema, SchemaProvider, TypeTag};

static NO_RECORDS: NoRecords = NoRecords;

/// Markup of a rendered layout plus the fields that could not be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedForm {
    pub html: String,
    pub errors: Vec<FieldError>,
}

impl RenderedForm {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Builds form rows for a single record.
#[derive(Clone)]
pub struct FormBuilder<'a> {
    object_name: String,
    record: Record,
    model: Option<&'a ModelSchema>,
    schema: Option<&'a dyn SchemaProvider>,
    records: &'a dyn RecordSource,
    config: &'a FormboxConfig,
    read_only: bool,
    errors: BTreeMap<String, Vec<String>>,
}

impl<'a> FormBuilder<'a> {
    /// Builder for `record`, with input names prefixed by `object_name`.
    pub fn new(object_name: impl Into<String>, record: Record, config: &'a FormboxConfig) -> Self {
        FormBuilder {
            object_name: object_name.into(),
            record,
            model: None,
            schema: None,
            records: &NO_RECORDS,
            config,
            read_only: false,
            errors: BTreeMap::new(),
        }
    }

    /// Builder for the model and record a layout describes.
    pub fn for_layout(
        layout: &FormLayout,
        record: Record,
        schema: &'a dyn SchemaProvider,
        config: &'a FormboxConfig,
    ) -> Self {
        FormBuilder::new(layout.object_name(), record, config)
            .with_schema(schema, &layout.model)
            .read_only(layout.read_only)
    }

    /// Look field types up in `schema` under `model`. Also used to find the
    /// models of nested `fields_for` builders.
    pub fn with_schema(mut self, schema: &'a dyn SchemaProvider, model: &str) -> Self {
        self.model = schema.model(model);
        if self.model.is_none() {
            tracing::warn!(model, "model not found in schema, fields default to string");
        }
        self.schema = Some(schema);
        self
    }

    pub fn with_model(mut self, model: &'a ModelSchema) -> Self {
        self.model = Some(model);
        self
    }

    /// Candidate instances for association widgets.
    pub fn with_records(mut self, records: &'a dyn RecordSource) -> Self {
        self.records = records;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Validation errors of the record, keyed by field; their labels get
    /// the `error` class.
    pub fn with_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
        self.errors = errors;
        self
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    fn has_errors(&self, field: &str) -> bool {
        let base = field.strip_suffix("_id").unwrap_or(field);
        [field, base]
            .iter()
            .any(|f| self.errors.get(*f).is_some_and(|e| !e.is_empty()))
    }

    /// Label attribute for candidates of a relation: explicit `show`, else
    /// the target model's `display`.
    fn relation_show(&self, relation: Option<&RelationTarget>, opts: &RenderOptions) -> Option<String> {
        opts.show.clone().or_else(|| {
            let target = relation?.target.as_str();
            self.schema?.model(target)?.display.clone()
        })
    }

    fn current_value(&self, field: &str, tag: TypeTag, relation: Option<&RelationTarget>) -> Value {
        let present = self.record.get(field).filter(|v| !v.is_null()).cloned();
        match (tag, relation) {
            (TypeTag::BelongsTo, Some(rel)) => {
                present.unwrap_or_else(|| self.record.value(&rel.foreign_key))
            }
            (TypeTag::HasMany, _) => present
                .unwrap_or_else(|| self.record.value(&format!("{}_ids", singularize(field)))),
            _ => present.unwrap_or(Value::Null),
        }
    }

    /// Describe `field`: declared type, relation target, current value and,
    /// for associations without explicit choices, every instance of the
    /// target model as candidates.
    pub fn describe(&self, field: &str, opts: &RenderOptions) -> Result<FieldDescriptor, FieldError> {
        let resolved = type_for_field(self.model, field)?;
        let mut desc = FieldDescriptor::new(field, resolved.tag);
        desc.value = self.current_value(field, resolved.tag, resolved.relation.as_ref());
        if let Some(relation) = &resolved.relation {
            if opts.choices.is_none() {
                let show = self.relation_show(Some(relation), opts);
                let candidates = ChoiceSource::Records(self.records.all(&relation.target));
                desc.choices = Some(as_choices(&candidates, show.as_deref(), &self.config.showers));
            }
        }
        desc.relation = resolved.relation;
        Ok(desc)
    }

    /// Resolve the widget for `field` without rendering it.
    pub fn widget(&self, field: &str, opts: &RenderOptions) -> Result<Widget, FieldError> {
        let desc = self.describe(field, opts)?;
        let show = self.relation_show(desc.relation.as_ref(), opts);
        if show != opts.show {
            let opts = RenderOptions {
                show,
                ..opts.clone()
            };
            return resolve_with(&desc, &opts, self.read_only, self.config);
        }
        resolve_with(&desc, opts, self.read_only, self.config)
    }

    /// Label cell for `field`, empty when `no_label` is set.
    ///
    /// Read-only forms append `:`; required editable fields get a
    /// `<span class="required"> *</span>` marker.
    pub fn label_for_field(&self, field: &str, opts: &RenderOptions) -> Result<String, FieldError> {
        self.label_cell(field, field, opts)
    }

    fn label_cell(&self, field: &str, target: &str, opts: &RenderOptions) -> Result<String, FieldError> {
        if opts.no_label {
            return Ok(String::new());
        }
        let read_only = self.read_only || opts.read_only;
        let text = opts
            .label
            .clone()
            .unwrap_or_else(|| self.config.label_for(field));
        render_label(
            field,
            LabelParts {
                target: &field_id(&self.object_name, target),
                text: &text,
                read_only,
                required: opts.required && !read_only,
                error: self.has_errors(field),
            },
        )
    }

    /// Render the full row for `field`.
    pub fn field(&self, field: &str, opts: &RenderOptions) -> Result<String, FieldError> {
        let widget = self.widget(field, opts)?;
        let input = render_widget(&self.object_name, field, &widget, self.config)?;
        let target = match &widget {
            Widget::AssociationSelect { foreign_key, .. } => foreign_key.as_str(),
            _ => field,
        };
        let label = self.label_cell(field, target, opts)?;
        tracing::debug!(
            object = %self.object_name,
            field,
            widget = %widget.kind(),
            "rendered field"
        );
        render_row(field, &field_id(&self.object_name, field), &label, &input)
    }

    /// Password row. The current value is never rendered; read-only forms
    /// show a mask instead.
    pub fn password(&self, field: &str, opts: &RenderOptions) -> Result<String, FieldError> {
        let input = if self.read_only || opts.read_only {
            render_widget(
                &self.object_name,
                field,
                &Widget::ConstantDisplay {
                    text: "********".to_string(),
                    icon: None,
                },
                self.config,
            )?
        } else {
            render_password(&self.object_name, field, opts.width())?
        };
        let label = self.label_cell(field, field, opts)?;
        render_row(field, &field_id(&self.object_name, field), &label, &input)
    }

    /// Submit button; "Update" for persisted records, "Create" otherwise.
    /// Read-only forms have none.
    pub fn submit(&self, caption: Option<&str>) -> Result<String, FieldError> {
        if self.read_only {
            return Ok(String::new());
        }
        let default = if self.record.id().is_some() { "Update" } else { "Create" };
        render_submit(caption.unwrap_or(default))
    }

    /// Row with a label for `name` and caller-supplied markup.
    pub fn block(&self, name: &str, content: &str) -> Result<String, FieldError> {
        let key = to_snake_case(name);
        let label = self.label_cell(&key, &key, &RenderOptions::default())?;
        render_row(&key, &field_id(&self.object_name, &key), &label, content)
    }

    /// Run `build` with a builder for the nested `association` record.
    ///
    /// Inputs are named `obj[association][field]`; the nested record is the
    /// object stored under `association`, or an empty record.
    pub fn fields_for<R>(&self, association: &str, build: impl FnOnce(&FormBuilder<'a>) -> R) -> R {
        let record = match self.record.get(association) {
            Some(Value::Object(map)) => Record::from(map.clone()),
            _ => Record::new(),
        };
        let target = self
            .model
            .and_then(|m| m.relation(association))
            .map(|r| r.target())
            .unwrap_or_else(|| to_camel_case(association));
        let nested = FormBuilder {
            object_name: format!("{}[{}]", self.object_name, association),
            record,
            model: self.schema.and_then(|s| s.model(&target)),
            schema: self.schema,
            records: self.records,
            config: self.config,
            read_only: self.read_only,
            errors: BTreeMap::new(),
        };
        build(&nested)
    }

    /// Render every row of `layout`, then the submit button and the form
    /// container. A layout marked `read_only` renders read-only even when
    /// this builder is editable.
    pub fn render_layout(&self, layout: &FormLayout) -> RenderedForm {
        let builder = if layout.read_only && !self.read_only {
            self.clone().read_only(true)
        } else {
            self.clone()
        };
        let mut rows = Vec::with_capacity(layout.fields.len() + 1);
        let mut errors = Vec::new();

        for spec in &layout.fields {
            let row = match spec.kind {
                FieldKind::Field => builder.field(&spec.name, &spec.options),
                FieldKind::Password => builder.password(&spec.name, &spec.options),
            };
            match row {
                Ok(html) => rows.push(html),
                Err(err) => {
                    tracing::warn!(
                        field = err.field(),
                        kind = err.kind(),
                        error = %err,
                        "skipping field"
                    );
                    errors.push(err);
                }
            }
        }

        if let Some(caption) = &layout.submit {
            match builder.submit(Some(caption)) {
                Ok(html) if !html.is_empty() => rows.push(html),
                Ok(_) => {}
                Err(err) => errors.push(err),
            }
        }

        let html = match render_form(&builder.object_name, builder.read_only, &rows) {
            Ok(html) => html,
            Err(err) => {
                errors.push(err);
                rows.join("\n")
            }
        };
        tracing::info!(
            object = %builder.object_name,
            rows = rows.len(),
            errors = errors.len(),
            "rendered form"
        );
        RenderedForm { html, errors }
    }
}
