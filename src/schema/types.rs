use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::naming::{singularize, to_camel_case};

/// Declared type of a renderable field.
///
/// Column types map onto the scalar variants; relationships map onto
/// [`TypeTag::BelongsTo`] and [`TypeTag::HasMany`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    #[serde(rename = "datetime", alias = "date_time")]
    DateTime,
    Time,
    Timestamp,
    BelongsTo,
    HasMany,
    Binary,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 13] = [
        TypeTag::String,
        TypeTag::Text,
        TypeTag::Integer,
        TypeTag::Float,
        TypeTag::Decimal,
        TypeTag::Boolean,
        TypeTag::Date,
        TypeTag::DateTime,
        TypeTag::Time,
        TypeTag::Timestamp,
        TypeTag::BelongsTo,
        TypeTag::HasMany,
        TypeTag::Binary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Text => "text",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Decimal => "decimal",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::DateTime => "datetime",
            TypeTag::Time => "time",
            TypeTag::Timestamp => "timestamp",
            TypeTag::BelongsTo => "belongs_to",
            TypeTag::HasMany => "has_many",
            TypeTag::Binary => "binary",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Integer | TypeTag::Float | TypeTag::Decimal)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            TypeTag::Date | TypeTag::DateTime | TypeTag::Time | TypeTag::Timestamp
        )
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, TypeTag::BelongsTo | TypeTag::HasMany)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        TypeTag::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized || (normalized == "date_time" && *t == TypeTag::DateTime))
            .ok_or_else(|| anyhow::anyhow!("unknown field type '{s}'"))
    }
}

/// Kind of a declared relationship.
///
/// Only `BelongsTo` and `HasMany` can be rendered; the other kinds are
/// accepted in a schema so they can be linted and reported per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasAndBelongsToMany,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs_to",
            RelationKind::HasOne => "has_one",
            RelationKind::HasMany => "has_many",
            RelationKind::HasAndBelongsToMany => "has_and_belongs_to_many",
        }
    }

    /// Conventional target model for a relationship called `name`.
    pub fn default_target(&self, name: &str) -> String {
        match self {
            RelationKind::HasMany | RelationKind::HasAndBelongsToMany => {
                to_camel_case(&singularize(name))
            }
            RelationKind::BelongsTo | RelationKind::HasOne => to_camel_case(name),
        }
    }

    /// The type tag a supported relationship resolves to.
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            RelationKind::BelongsTo => Some(TypeTag::BelongsTo),
            RelationKind::HasMany => Some(TypeTag::HasMany),
            RelationKind::HasOne | RelationKind::HasAndBelongsToMany => None,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table column as reported by the metadata layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeTag,
}

/// A declared relationship on a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMeta {
    pub name: String,
    pub kind: RelationKind,
    /// Target model; defaults to the CamelCase relation name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Foreign key column; defaults to `<name>_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

impl RelationMeta {
    /// Target model: `class_name`, else the CamelCase relation name,
    /// singularized for collection relationships (`tags` → `Tag`).
    pub fn target(&self) -> String {
        self.class_name
            .clone()
            .unwrap_or_else(|| self.kind.default_target(&self.name))
    }

    pub fn foreign_key(&self) -> String {
        self.foreign_key
            .clone()
            .unwrap_or_else(|| format!("{}_id", self.name))
    }
}

/// Column and relationship metadata for one record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Filled from the catalog key when loaded
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
    #[serde(default)]
    pub relations: Vec<RelationMeta>,
    /// Field-type override table. When present it is authoritative for
    /// every field, including fields that have no column backing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_fields: Option<BTreeMap<String, TypeTag>>,
    /// Attribute used to label instances of this model in choice lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        ModelSchema {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.columns.push(ColumnMeta {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_relation(mut self, name: impl Into<String>, kind: RelationKind) -> Self {
        self.relations.push(RelationMeta {
            name: name.into(),
            kind,
            class_name: None,
            foreign_key: None,
        });
        self
    }

    pub fn with_meta_field(mut self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.meta_fields
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), ty);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationMeta> {
        self.relations.iter().find(|r| r.name == name)
    }
}

/// Source of model metadata.
pub trait SchemaProvider {
    fn model(&self, name: &str) -> Option<&ModelSchema>;
}

/// A set of models keyed by name, as loaded from a schema file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default)]
    pub models: BTreeMap<String, ModelSchema>,
}

impl SchemaCatalog {
    pub fn insert(&mut self, model: ModelSchema) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

impl SchemaProvider for SchemaCatalog {
    /// Exact name first, then the CamelCase form (`line_item` → `LineItem`).
    fn model(&self, name: &str) -> Option<&ModelSchema> {
        self.models
            .get(name)
            .or_else(|| self.models.get(&to_camel_case(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_parse() {
        assert_eq!("string".parse::<TypeTag>().unwrap(), TypeTag::String);
        assert_eq!("DateTime".parse::<TypeTag>().unwrap(), TypeTag::DateTime);
        assert_eq!("date_time".parse::<TypeTag>().unwrap(), TypeTag::DateTime);
        assert_eq!("has_many".parse::<TypeTag>().unwrap(), TypeTag::HasMany);
        assert!("blob".parse::<TypeTag>().is_err());
    }

    #[test]
    fn test_relation_defaults() {
        let rel = RelationMeta {
            name: "line_item".into(),
            kind: RelationKind::BelongsTo,
            class_name: None,
            foreign_key: None,
        };
        assert_eq!(rel.target(), "LineItem");
        assert_eq!(rel.foreign_key(), "line_item_id");
        assert_eq!(RelationKind::HasMany.default_target("tags"), "Tag");
        assert_eq!(RelationKind::HasMany.default_target("categories"), "Category");
    }

    #[test]
    fn test_catalog_lookup_camel_case() {
        let mut catalog = SchemaCatalog::default();
        catalog.insert(ModelSchema::new("LineItem").with_column("qty", TypeTag::Integer));
        assert!(catalog.model("LineItem").is_some());
        assert!(catalog.model("line_item").is_some());
        assert!(catalog.model("order").is_none());
    }
}
