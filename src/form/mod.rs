//! # Form Module
//!
//! Field-widget resolution and HTML rendering.
//!
//! - [`type_for_field`] determines a field's declared type from its model
//! - [`resolve`] / [`resolve_with`] pick a [`Widget`] from a
//!   [`FieldDescriptor`], the [`RenderOptions`] and the read-only flag
//! - [`as_choices`] normalizes candidate lists into `(label, value)` pairs
//! - [`FormBuilder`] renders labelled `irow` rows and whole [`FormLayout`]s

mod builder;
mod choices;
mod descriptor;
mod display;
mod error;
mod layout;
mod options;
mod render;
mod resolve;
mod widget;

pub use builder::{FormBuilder, RenderedForm};
pub use choices::{
    as_choices, default_showers, option_text, record_label, shower_for, Choice, ChoiceSource,
    DEFAULT_SHOWERS,
};
pub use descriptor::{type_for_field, FieldDescriptor, RelationTarget, ResolvedType};
pub use display::{format_date, format_datetime, format_time, is_valid_format};
pub use error::FieldError;
pub use layout::{load_layout, FieldKind, FieldSpec, FormLayout};
pub use options::RenderOptions;
pub use render::{field_id, render_widget, FieldNames};
pub use resolve::{resolve, resolve_with};
pub use widget::{Checkable, GridLayout, Widget, WidgetKind};
