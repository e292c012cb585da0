use std::fmt;

use crate::schema::{RelationKind, TypeTag};

/// Field-scoped rendering error
///
/// Every variant names the field it belongs to, so a caller rendering a
/// whole form can skip or report the single broken field and keep going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The declared type has no editable or displayable widget (`binary`)
    UnsupportedFieldType {
        /// Field name
        field: String,
        /// The offending type
        ty: TypeTag,
    },
    /// A relationship other than `belongs_to` / `has_many`
    UnsupportedRelationKind {
        /// Field name
        field: String,
        /// The offending relationship kind
        kind: RelationKind,
    },
    /// A choice list with the wrong shape, e.g. a boolean radio group
    /// that does not have exactly two choices
    InvalidChoiceSet {
        /// Field name
        field: String,
        /// Number of choices the widget needs
        expected: usize,
        /// Number of choices given
        found: usize,
    },
    /// The widget markup could not be rendered
    Render {
        /// Field name
        field: String,
        /// Template error message
        message: String,
    },
}

impl FieldError {
    /// Name of the field the error belongs to.
    pub fn field(&self) -> &str {
        match self {
            FieldError::UnsupportedFieldType { field, .. }
            | FieldError::UnsupportedRelationKind { field, .. }
            | FieldError::InvalidChoiceSet { field, .. }
            | FieldError::Render { field, .. } => field,
        }
    }

    /// Short machine-readable kind, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::UnsupportedFieldType { .. } => "unsupported_field_type",
            FieldError::UnsupportedRelationKind { .. } => "unsupported_relation_kind",
            FieldError::InvalidChoiceSet { .. } => "invalid_choice_set",
            FieldError::Render { .. } => "render",
        }
    }

    pub(crate) fn render(field: &str, err: askama::Error) -> Self {
        FieldError::Render {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::UnsupportedFieldType { field, ty } => {
                write!(f, "field '{field}': unsupported field type '{ty}'")
            }
            FieldError::UnsupportedRelationKind { field, kind } => {
                write!(
                    f,
                    "field '{field}': relationship kind '{kind}' is not supported \
                    (expected belongs_to or has_many)"
                )
            }
            FieldError::InvalidChoiceSet {
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "field '{field}': invalid choice set, expected {expected} choices but got {found}"
                )
            }
            FieldError::Render { field, message } => {
                write!(f, "field '{field}': failed to render widget: {message}")
            }
        }
    }
}

impl std::error::Error for FieldError {}
