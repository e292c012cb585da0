use askama::Template;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// A link rendered under a scaffold page
#[derive(Debug, Clone)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}

impl PageLink {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        PageLink {
            text: text.into(),
            href: href.into(),
        }
    }
}

/// Template data for the new/edit/show pages
#[derive(Template)]
#[template(path = "scaffold/page.html")]
pub struct PageTemplateData {
    /// Page heading and `<title>`
    pub title: String,
    /// Relative path to `form_box.css`
    pub stylesheet: String,
    /// Include the calendar scripts (the form has date pickers)
    pub calendar: bool,
    /// Form action; `None` renders the body without a `<form>`
    pub action: Option<String>,
    /// Hidden `_method` value, e.g. `put` for updates
    pub method_override: Option<String>,
    /// Pre-rendered form markup
    pub body: String,
    pub links: Vec<PageLink>,
}

/// One listed record on the index page
#[derive(Debug, Clone)]
pub struct IndexRow {
    pub cells: Vec<String>,
    pub show: String,
    pub edit: String,
}

/// Template data for the index page
#[derive(Template)]
#[template(path = "scaffold/index.html")]
pub struct IndexTemplateData {
    pub title: String,
    pub stylesheet: String,
    /// Singular human name, for the "New ..." link
    pub singular: String,
    pub headers: Vec<String>,
    pub rows: Vec<IndexRow>,
    pub new_link: String,
}

/// Shared stylesheet for rendered forms
#[derive(Template)]
#[template(path = "scaffold/form_box.css", escape = "none")]
pub struct StylesheetTemplate;

/// Files written (or, in a dry run, that would be written) and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteLog {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write `contents` to `path`, creating parent directories.
///
/// Existing files are kept unless `force` is set. With `dry_run` nothing is
/// touched; the file is only reported.
pub fn write_file(
    path: &Path,
    contents: &str,
    force: bool,
    dry_run: bool,
    log: &mut WriteLog,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        println!("⚠️  Skipping existing file: {path:?}");
        log.skipped.push(path.to_path_buf());
        return Ok(());
    }
    if dry_run {
        println!("📝 Would write {path:?}");
        log.written.push(path.to_path_buf());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {parent:?}"))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {path:?}"))?;
    println!("✅ Generated {path:?}");
    log.written.push(path.to_path_buf());
    Ok(())
}

/// Write the shared stylesheet. An existing stylesheet is never replaced,
/// even with `force`, since it is meant to be customized.
pub fn write_stylesheet(dir: &Path, dry_run: bool, log: &mut WriteLog) -> anyhow::Result<()> {
    let rendered = StylesheetTemplate.render()?;
    write_file(&dir.join("form_box.css"), &rendered, false, dry_run, log)
}
