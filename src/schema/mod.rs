//! # Schema Module
//!
//! Column and relationship metadata for record types: the *Schema Provider*
//! side of the widget resolution engine.
//!
//! A [`SchemaCatalog`] is normally loaded from a YAML or JSON file with
//! [`load_schema`], but anything implementing [`SchemaProvider`] can feed the
//! form builder.

mod load;
mod types;

pub(crate) use load::read_document;
pub use load::{load_schema, load_schema_from_str};
pub use types::*;
