//! # formbox
//!
//! **formbox** is a metadata-driven form builder: given what a schema says
//! about a model's columns and relations, it picks the right input widget
//! for every field and renders it to HTML, editable or read-only.
//!
//! ## Overview
//!
//! A form is described field by field. For each field formbox works out a
//! [`TypeTag`](schema::TypeTag) (from the model's `meta_fields` overrides,
//! its columns or its relations), normalizes any choice list with
//! [`as_choices`](form::as_choices), and resolves a [`Widget`](form::Widget)
//! from the type, the [`RenderOptions`](form::RenderOptions) and the
//! read-only flag. Fields that cannot be rendered produce a
//! [`FieldError`](form::FieldError) instead of failing the whole form.
//!
//! ## Architecture
//!
//! - **[`schema`]** - Model metadata: columns, relations, field type overrides
//! - **[`record`]** - The object being edited and the candidates for association choices
//! - **[`form`]** - Type resolution, choice normalization, widget resolution and rendering
//! - **[`generator`]** - Scaffolds form layouts and CRUD page skeletons
//! - **[`linter`]** - Finds fields a schema declares but formbox cannot render
//! - **[`config`]** - `formbox.toml` presentation settings
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `formbox-gen` command line
//!
//! ### Resolution Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Builder as form::FormBuilder
//!     participant Schema as schema::SchemaCatalog
//!     participant Choices as form::as_choices
//!     participant Resolve as form::resolve
//!     participant Render as form::render_widget
//!
//!     Caller->>Builder: field("category", &opts)
//!     Builder->>Schema: type_for_field(model, "category")
//!     Schema-->>Builder: BelongsTo → Category
//!     Builder->>Choices: candidates of Category
//!     Choices-->>Builder: Vec<Choice>
//!     Builder->>Resolve: resolve(&descriptor, &opts, read_only)
//!     Resolve-->>Builder: Widget::AssociationSelect
//!     Builder->>Render: render_widget(object, field, &widget)
//!     Render-->>Caller: labelled HTML row
//! ```
//!
//! ## Example
//!
//! ```rust
//! use formbox::form::{resolve, FieldDescriptor, RenderOptions, Widget};
//! use formbox::schema::TypeTag;
//!
//! let desc = FieldDescriptor::new("active", TypeTag::Boolean).with_value(true);
//! let widget = resolve(&desc, &RenderOptions::default(), true).unwrap();
//! assert_eq!(widget, Widget::ConstantDisplay { text: "Yes".into(), icon: None });
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! formbox-gen generate --schema models.yaml --model Product --output views
//! formbox-gen render --schema models.yaml --layout views/products/form.yaml --record product.yaml
//! formbox-gen lint --schema models.yaml --fail-on-error
//! ```

pub mod cli;
pub mod config;
pub mod form;
pub mod generator;
pub mod linter;
pub mod logging;
pub mod naming;
pub mod record;
pub mod schema;

pub use config::FormboxConfig;
pub use form::{
    as_choices, resolve, Choice, ChoiceSource, FieldDescriptor, FieldError, FormBuilder,
    RenderOptions, Widget,
};
pub use record::{Record, RecordSource, RecordStore};
pub use schema::{load_schema, ModelSchema, RelationKind, SchemaCatalog, TypeTag};
