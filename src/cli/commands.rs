use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::FormboxConfig;
use crate::form::{load_layout, FormBuilder, RenderOptions, Widget};
use crate::generator::{generate_scaffold, ScaffoldOptions};
use crate::linter::{fail_if_errors, lint_schema, print_lint_issues, LintSeverity};
use crate::logging::{init_logging, LogConfig};
use crate::record::{load_record, load_records, Record, RecordStore};
use crate::schema::{load_schema, ModelSchema, SchemaCatalog, SchemaProvider};

/// Command-line interface for formbox
///
/// Scaffolds form layouts and page skeletons from a schema, renders forms
/// and lints schemas.
#[derive(Parser)]
#[command(name = "formbox-gen")]
#[command(about = "Form widget resolution and scaffolding", long_about = None)]
pub struct Cli {
    /// Settings file (default: formbox.toml next to the schema)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a form layout and CRUD page skeletons for a model
    Generate {
        /// Path to the schema file (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Model to scaffold
        #[arg(short, long)]
        model: String,

        /// Output directory
        #[arg(short, long, default_value = "views")]
        output: PathBuf,

        /// Record fixtures used for association choices and the listing
        #[arg(long)]
        records: Option<PathBuf>,

        /// Overwrite existing files (the stylesheet is never overwritten)
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Perform a dry run: show what would be written without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Keep a plural model name instead of singularizing it
        #[arg(long, default_value_t = false)]
        force_plural: bool,
    },
    /// Show the resolved type and widget of every field of a model
    Inspect {
        /// Path to the schema file (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Model to inspect
        #[arg(short, long)]
        model: String,

        /// Inspect the fields of this layout instead of the model's fields
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Record supplying current values
        #[arg(long)]
        record: Option<PathBuf>,

        /// Record fixtures used for association choices
        #[arg(long)]
        records: Option<PathBuf>,

        /// Resolve read-only widgets
        #[arg(long, default_value_t = false)]
        read_only: bool,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render a form layout to HTML on stdout
    Render {
        /// Path to the schema file (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Form layout (YAML or JSON)
        #[arg(short, long)]
        layout: PathBuf,

        /// Record supplying current values
        #[arg(long)]
        record: Option<PathBuf>,

        /// Record fixtures used for association choices
        #[arg(long)]
        records: Option<PathBuf>,

        /// Render read-only regardless of the layout
        #[arg(long, default_value_t = false)]
        read_only: bool,

        /// Fail if any field could not be rendered
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Lint a schema for fields that cannot be rendered
    Lint {
        /// Path to the schema file (YAML or JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

/// Resolution outcome for one field, as printed by `inspect`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FieldReport {
    pub field: String,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub widget: Option<Widget>,
    pub error: Option<String>,
}

/// Every field name of a model: columns, relations and override entries.
pub(crate) fn model_fields(model: &ModelSchema) -> Vec<String> {
    let mut fields: Vec<String> = model
        .columns
        .iter()
        .map(|c| c.name.clone())
        .chain(model.relations.iter().map(|r| r.name.clone()))
        .collect();
    if let Some(overrides) = &model.meta_fields {
        for name in overrides.keys() {
            if !fields.contains(name) {
                fields.push(name.clone());
            }
        }
    }
    fields
}

pub(crate) fn inspect_fields(
    builder: &FormBuilder<'_>,
    fields: &[(String, RenderOptions)],
) -> Vec<FieldReport> {
    fields
        .iter()
        .map(|(field, opts)| {
            let described = builder.describe(field, opts);
            let ty = described.as_ref().ok().map(|d| d.declared_type.to_string());
            match builder.widget(field, opts) {
                Ok(widget) => FieldReport {
                    field: field.clone(),
                    ty,
                    widget: Some(widget),
                    error: None,
                },
                Err(err) => FieldReport {
                    field: field.clone(),
                    ty,
                    widget: None,
                    error: Some(err.to_string()),
                },
            }
        })
        .collect()
}

fn print_reports(reports: &[FieldReport]) {
    let width = reports.iter().map(|r| r.field.len()).max().unwrap_or(5).max(5);
    println!("{:<width$}  {:<11}  WIDGET", "FIELD", "TYPE");
    for report in reports {
        let ty = report.ty.as_deref().unwrap_or("-");
        match (&report.widget, &report.error) {
            (Some(widget), _) => {
                println!("{:<width$}  {:<11}  {}", report.field, ty, widget.kind())
            }
            (None, Some(err)) => println!("{:<width$}  {:<11}  ❌ {}", report.field, ty, err),
            (None, None) => println!("{:<width$}  {:<11}  -", report.field, ty),
        }
    }
}

fn load_optional_records(path: Option<&Path>) -> anyhow::Result<RecordStore> {
    match path {
        Some(path) => load_records(path),
        None => Ok(RecordStore::default()),
    }
}

fn load_optional_record(path: Option<&Path>) -> anyhow::Result<Record> {
    match path {
        Some(path) => load_record(path),
        None => Ok(Record::new()),
    }
}

fn find_model<'a>(catalog: &'a SchemaCatalog, name: &str) -> anyhow::Result<&'a ModelSchema> {
    catalog
        .model(name)
        .ok_or_else(|| anyhow::anyhow!("Model '{name}' not found in schema"))
}

/// Parse the command line, set up logging and run the command.
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env().with_verbosity(cli.verbose))?;
    execute(&cli)?;
    Ok(())
}

/// Run a parsed command.
pub fn execute(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Generate {
            schema,
            model,
            output,
            records,
            force,
            dry_run,
            force_plural,
        } => {
            let catalog = load_schema(schema)?;
            let config = FormboxConfig::resolve(cli.config.as_deref(), Some(schema.as_path()))?;
            let records = load_optional_records(records.as_deref())?;
            let options = ScaffoldOptions {
                output: output.clone(),
                force: *force,
                dry_run: *dry_run,
                force_plural: *force_plural,
            };
            let report = generate_scaffold(&catalog, model, &records, &config, &options)?;
            for err in &report.field_errors {
                println!("⚠️  Skipped field {}: {}", err.field(), err);
            }
            println!(
                "✨ Scaffold for {} in {:?}: {} written, {} skipped",
                report.model,
                report.dir,
                report.files.written.len(),
                report.files.skipped.len()
            );
            Ok(())
        }
        Commands::Inspect {
            schema,
            model,
            layout,
            record,
            records,
            read_only,
            json,
        } => {
            let catalog = load_schema(schema)?;
            let config = FormboxConfig::resolve(cli.config.as_deref(), Some(schema.as_path()))?;
            let records = load_optional_records(records.as_deref())?;
            let record = load_optional_record(record.as_deref())?;

            let fields: Vec<(String, RenderOptions)> = match layout {
                Some(path) => load_layout(path)?
                    .fields
                    .into_iter()
                    .map(|f| (f.name, f.options))
                    .collect(),
                None => model_fields(find_model(&catalog, model)?)
                    .into_iter()
                    .map(|f| (f, RenderOptions::default()))
                    .collect(),
            };
            let builder = FormBuilder::new(crate::naming::to_snake_case(model), record, &config)
                .with_schema(&catalog, model)
                .with_records(&records)
                .read_only(*read_only);
            let reports = inspect_fields(&builder, &fields);
            if *json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print_reports(&reports);
            }
            Ok(())
        }
        Commands::Render {
            schema,
            layout,
            record,
            records,
            read_only,
            strict,
        } => {
            let catalog = load_schema(schema)?;
            let config = FormboxConfig::resolve(cli.config.as_deref(), Some(schema.as_path()))?;
            let records = load_optional_records(records.as_deref())?;
            let record = load_optional_record(record.as_deref())?;
            let layout = load_layout(layout)?;

            let builder = FormBuilder::for_layout(&layout, record, &catalog, &config)
                .with_records(&records);
            let builder = if *read_only { builder.read_only(true) } else { builder };
            let rendered = builder.render_layout(&layout);
            println!("{}", rendered.html);
            for err in &rendered.errors {
                eprintln!("⚠️  Skipped field {}: {}", err.field(), err);
            }
            if *strict && !rendered.errors.is_empty() {
                anyhow::bail!("{} field(s) could not be rendered", rendered.errors.len());
            }
            Ok(())
        }
        Commands::Lint {
            schema,
            fail_on_error,
            errors_only,
        } => {
            let issues = lint_schema(schema)?;
            let shown: Vec<_> = if *errors_only {
                issues
                    .into_iter()
                    .filter(|i| i.severity == LintSeverity::Error)
                    .collect()
            } else {
                issues
            };
            print_lint_issues(&shown);
            if *fail_on_error {
                fail_if_errors(&shown);
            }
            Ok(())
        }
    }
}
