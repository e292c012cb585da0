use serde_json::Value;

use super::choices::Choice;
use super::error::FieldError;
use crate::schema::{ModelSchema, RelationKind, RelationMeta, TypeTag};

/// Where an association field points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTarget {
    pub kind: RelationKind,
    /// Target model name
    pub target: String,
    /// Column holding the target id (belongs-to)
    pub foreign_key: String,
}

impl RelationTarget {
    fn from_meta(meta: &RelationMeta) -> Self {
        RelationTarget {
            kind: meta.kind,
            target: meta.target(),
            foreign_key: meta.foreign_key(),
        }
    }

    /// Conventional target for a field typed as a relation without a
    /// declared relationship: CamelCase model, `<field>_id` key.
    fn conventional(field: &str, kind: RelationKind) -> Self {
        RelationTarget {
            kind,
            target: kind.default_target(field),
            foreign_key: format!("{field}_id"),
        }
    }
}

/// Normalized description of one renderable field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: TypeTag,
    pub relation: Option<RelationTarget>,
    /// Normalized candidates, when the field has any
    pub choices: Option<Vec<Choice>>,
    /// Current value snapshot
    pub value: Value,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: TypeTag) -> Self {
        FieldDescriptor {
            name: name.into(),
            declared_type,
            relation: None,
            choices: None,
            value: Value::Null,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn with_relation(mut self, kind: RelationKind, target: impl Into<String>) -> Self {
        let foreign_key = format!("{}_id", self.name);
        self.relation = Some(RelationTarget {
            kind,
            target: target.into(),
            foreign_key,
        });
        self
    }

    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }

    pub fn relation_kind(&self) -> Option<RelationKind> {
        self.relation.as_ref().map(|r| r.kind)
    }
}

/// Declared type of a field plus its relation target, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub tag: TypeTag,
    pub relation: Option<RelationTarget>,
}

impl ResolvedType {
    fn plain(tag: TypeTag) -> Self {
        ResolvedType {
            tag,
            relation: None,
        }
    }
}

/// Determine the type of `field` on `model`, first match wins:
///
/// 1. the model's `meta_fields` override table, when it has one; fields
///    missing from the table are `String`
/// 2. a column with that name
/// 3. a relationship with that name (`belongs_to` / `has_many` only)
/// 4. `String`
///
/// Without a model schema every field is a `String`.
pub fn type_for_field(model: Option<&ModelSchema>, field: &str) -> Result<ResolvedType, FieldError> {
    let Some(model) = model else {
        return Ok(ResolvedType::plain(TypeTag::String));
    };

    if let Some(overrides) = &model.meta_fields {
        let tag = overrides.get(field).copied().unwrap_or(TypeTag::String);
        return match tag {
            TypeTag::BelongsTo | TypeTag::HasMany => {
                let kind = if tag == TypeTag::BelongsTo {
                    RelationKind::BelongsTo
                } else {
                    RelationKind::HasMany
                };
                let relation = model
                    .relation(field)
                    .filter(|r| r.kind == kind)
                    .map(RelationTarget::from_meta)
                    .unwrap_or_else(|| RelationTarget::conventional(field, kind));
                Ok(ResolvedType {
                    tag,
                    relation: Some(relation),
                })
            }
            _ => Ok(ResolvedType::plain(tag)),
        };
    }

    if let Some(column) = model.column(field) {
        return Ok(ResolvedType::plain(column.ty));
    }

    if let Some(relation) = model.relation(field) {
        let tag = relation
            .kind
            .type_tag()
            .ok_or_else(|| FieldError::UnsupportedRelationKind {
                field: field.to_string(),
                kind: relation.kind,
            })?;
        return Ok(ResolvedType {
            tag,
            relation: Some(RelationTarget::from_meta(relation)),
        });
    }

    Ok(ResolvedType::plain(TypeTag::String))
}
