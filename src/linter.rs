//! # Schema Linter Module
//!
//! Checks a schema catalog for fields the form builder cannot render and for
//! metadata that is probably a mistake, before any form is generated.
//!
//! ## Checks Performed
//!
//! | Kind | Severity |
//! |---|---|
//! | `unsupported_relation_kind` | error |
//! | `duplicate_field` | error |
//! | `binary_column` | warning |
//! | `invalid_field_name` | warning |
//! | `missing_relation_target` | warning |
//! | `meta_field_without_backing` | info |
//! | `empty_model` | info |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use formbox::linter::{lint_schema, print_lint_issues};
//! use std::path::Path;
//!
//! let issues = lint_schema(Path::new("models.yaml"))?;
//! print_lint_issues(&issues);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{load_schema, ModelSchema, SchemaCatalog, SchemaProvider, TypeTag};


/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// The field cannot be rendered; generation would skip or fail on it
    Error,
    /// Renders, but probably not as intended
    Warning,
    /// Worth a look
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        f.write_str(s)
    }
}

/// A lint issue found in a schema catalog
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// Where the issue occurred (e.g. "Product", "Product.category")
    pub location: String,
    pub severity: LintSeverity,
    /// Type of lint issue (e.g. "binary_column")
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Field names that survive the trip through `object[field]` parameter
/// names and DOM ids unchanged.
static FIELD_NAME: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").ok());

fn is_valid_field_name(field: &str) -> bool {
    FIELD_NAME.as_ref().map_or(true, |re| re.is_match(field))
}

/// Lint a schema file (YAML or JSON).
pub fn lint_schema(schema_path: &Path) -> anyhow::Result<Vec<LintIssue>> {
    let catalog = load_schema(schema_path)?;
    let issues = lint_catalog(&catalog);
    tracing::debug!(
        path = %schema_path.display(),
        issues = issues.len(),
        "linted schema"
    );
    Ok(issues)
}

/// Lint every model of an already loaded catalog.
pub fn lint_catalog(catalog: &SchemaCatalog) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    for model in catalog.models.values() {
        lint_model(catalog, model, &mut issues);
    }
    issues
}

fn lint_model(catalog: &SchemaCatalog, model: &ModelSchema, issues: &mut Vec<LintIssue>) {
    let name = &model.name;

    if model.columns.is_empty() && model.relations.is_empty() {
        issues.push(
            LintIssue::new(
                name.as_str(),
                LintSeverity::Info,
                "empty_model",
                format!("Model '{name}' has no columns or relations"),
            )
            .with_suggestion("Every field of this model will render as a text input"),
        );
    }

    let mut seen = HashSet::new();
    let field_names = model
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .chain(model.relations.iter().map(|r| r.name.as_str()));
    for field in field_names {
        if !is_valid_field_name(field) {
            issues.push(
                LintIssue::new(
                    format!("{name}.{field}"),
                    LintSeverity::Warning,
                    "invalid_field_name",
                    format!("Field '{field}' is not a lowercase snake_case identifier"),
                )
                .with_suggestion("Its DOM id and parameter name will not match the field name"),
            );
        }
        if !seen.insert(field) {
            issues.push(
                LintIssue::new(
                    format!("{name}.{field}"),
                    LintSeverity::Error,
                    "duplicate_field",
                    format!("Field '{field}' is declared more than once"),
                )
                .with_suggestion("Keep a single column or relation with this name"),
            );
        }
    }

    for column in model.columns.iter().filter(|c| c.ty == TypeTag::Binary) {
        issues.push(
            LintIssue::new(
                format!("{name}.{}", column.name),
                LintSeverity::Warning,
                "binary_column",
                format!("Column '{}' is binary and has no form widget", column.name),
            )
            .with_suggestion("Leave it out of form layouts or override its type in meta_fields"),
        );
    }

    for relation in &model.relations {
        let location = format!("{name}.{}", relation.name);
        if relation.kind.type_tag().is_none() {
            issues.push(
                LintIssue::new(
                    location.as_str(),
                    LintSeverity::Error,
                    "unsupported_relation_kind",
                    format!(
                        "Relation '{}' is {}; only belongs_to and has_many can be rendered",
                        relation.name, relation.kind
                    ),
                )
                .with_suggestion("Edit it through fields_for, or leave it out of form layouts"),
            );
        }
        let target = relation.target();
        if catalog.model(&target).is_none() {
            issues.push(
                LintIssue::new(
                    location,
                    LintSeverity::Warning,
                    "missing_relation_target",
                    format!(
                        "Relation '{}' points to model '{target}', which is not in the schema",
                        relation.name
                    ),
                )
                .with_suggestion(format!("Add '{target}' to the schema or set class_name")),
            );
        }
    }

    if let Some(overrides) = &model.meta_fields {
        for (field, ty) in overrides {
            let location = format!("{name}.{field}");
            if *ty == TypeTag::Binary {
                issues.push(LintIssue::new(
                    location.as_str(),
                    LintSeverity::Warning,
                    "binary_column",
                    format!("meta_fields declares '{field}' as binary, which has no form widget"),
                ));
            }
            if model.column(field).is_none() && model.relation(field).is_none() {
                issues.push(LintIssue::new(
                    location,
                    LintSeverity::Info,
                    "meta_field_without_backing",
                    format!("meta_fields entry '{field}' has no column or relation behind it"),
                ));
            }
        }
    }
}

/// Whether any issue is an error.
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

/// Print lint issues grouped by severity
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let by_severity = |severity: LintSeverity| -> Vec<&LintIssue> {
        issues.iter().filter(|i| i.severity == severity).collect()
    };
    let errors = by_severity(LintSeverity::Error);
    let warnings = by_severity(LintSeverity::Warning);
    let infos = by_severity(LintSeverity::Info);

    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    for (heading, group) in [
        ("❌ Errors (must fix):", errors),
        ("⚠️  Warnings (should fix):", warnings),
        ("ℹ️  Info:", infos),
    ] {
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {}", suggestion);
            }
        }
        println!();
    }
}

/// Exit with error code if there are any error-level lint issues
pub fn fail_if_errors(issues: &[LintIssue]) {
    if has_errors(issues) {
        print_lint_issues(issues);
        std::process::exit(1);
    }
}
