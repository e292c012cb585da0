//! # Configuration Module
//!
//! Rendering settings for the form builder and scaffold generator.
//!
//! ## Sources
//!
//! Settings are layered, later sources winning:
//!
//! 1. Built-in defaults ([`FormboxConfig::default`])
//! 2. A `formbox.toml` file, given explicitly or auto-detected next to the
//!    schema file
//! 3. `FORMBOX_*` environment variables
//!
//! ## Example `formbox.toml`
//!
//! ```toml
//! date_format = "%d/%m/%Y"
//! time_format = "%d/%m/%Y %H:%M"
//! showers = ["name", "title"]
//! numeric_size = 8
//!
//! [labels]
//! field_published_on = "Publication date"
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Setting |
//! |---|---|
//! | `FORMBOX_DATE_FORMAT` | `date_format` |
//! | `FORMBOX_TIME_FORMAT` | `time_format` |
//! | `FORMBOX_CALENDAR_ICON` | `calendar_icon` |
//! | `FORMBOX_ICON_DIR` | `icon_dir` |
//! | `FORMBOX_NUMERIC_SIZE` | `numeric_size` (decimal) |
//! | `FORMBOX_SHOWERS` | `showers` (comma-separated) |

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::form::is_valid_format;
use crate::naming::humanize;

/// File name looked up next to the schema file.
pub const CONFIG_FILE_NAME: &str = "formbox.toml";

/// Rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormboxConfig {
    /// `strftime` format for read-only dates
    pub date_format: String,
    /// `strftime` format for read-only datetimes and timestamps
    pub time_format: String,
    /// `strftime` format for read-only time-of-day values
    pub time_of_day_format: String,
    /// Format string handed to the calendar script (`ifFormat`)
    pub calendar_format: String,
    /// Image used as the calendar trigger
    pub calendar_icon: String,
    /// Directory holding `true.png` / `false.png` boolean icons
    pub icon_dir: String,
    /// Default width of numeric inputs
    pub numeric_size: u32,
    /// Default width of date inputs
    pub date_size: u32,
    /// Rows given to text areas in generated layouts
    pub text_rows: u32,
    /// Record attributes tried, in order, to label a record
    pub showers: Vec<String>,
    /// Label translations keyed by `field_<name>`
    pub labels: BTreeMap<String, String>,
}

impl Default for FormboxConfig {
    fn default() -> Self {
        FormboxConfig {
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%Y-%m-%d %H:%M".to_string(),
            time_of_day_format: "%H:%M".to_string(),
            calendar_format: "%Y/%m/%d".to_string(),
            calendar_icon: "/images/calendar.png".to_string(),
            icon_dir: "/images".to_string(),
            numeric_size: 10,
            date_size: 10,
            text_rows: 6,
            showers: crate::form::default_showers(),
            labels: BTreeMap::new(),
        }
    }
}

impl FormboxConfig {
    /// Apply `FORMBOX_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable numbers are ignored and the current value kept.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("FORMBOX_DATE_FORMAT") {
            self.date_format = v;
        }
        if let Some(v) = lookup("FORMBOX_TIME_FORMAT") {
            self.time_format = v;
        }
        if let Some(v) = lookup("FORMBOX_CALENDAR_ICON") {
            self.calendar_icon = v;
        }
        if let Some(v) = lookup("FORMBOX_ICON_DIR") {
            self.icon_dir = v;
        }
        if let Some(size) = lookup("FORMBOX_NUMERIC_SIZE").and_then(|v| v.trim().parse().ok()) {
            self.numeric_size = size;
        }
        if let Some(v) = lookup("FORMBOX_SHOWERS") {
            let showers: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !showers.is_empty() {
                self.showers = showers;
            }
        }
        self
    }

    /// Label text for a field: the `field_<name>` translation, or the
    /// humanized name. A trailing `_id` is ignored either way.
    pub fn label_for(&self, field: &str) -> String {
        let base = field.strip_suffix("_id").unwrap_or(field);
        self.labels
            .get(&format!("field_{base}"))
            .cloned()
            .unwrap_or_else(|| humanize(base))
    }

    /// Image path for a boolean icon.
    pub fn boolean_icon(&self, value: bool) -> String {
        format!("{}/{}.png", self.icon_dir.trim_end_matches('/'), value)
    }

    /// Load settings: explicit file if given, else `formbox.toml` next to
    /// `schema_path` when present, then environment overrides.
    pub fn resolve(explicit: Option<&Path>, schema_path: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| schema_path.and_then(detect_config));
        let base = match path {
            Some(p) => {
                let loaded = load_config(&p)?;
                if loaded.is_none() {
                    tracing::warn!(path = %p.display(), "config file not found, using defaults");
                }
                loaded.unwrap_or_default()
            }
            None => FormboxConfig::default(),
        };
        let config = base.with_env();
        config.validate()?;
        Ok(config)
    }

    /// Reject `strftime` patterns chrono cannot format.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, format) in [
            ("date_format", &self.date_format),
            ("time_format", &self.time_format),
            ("time_of_day_format", &self.time_of_day_format),
            ("calendar_format", &self.calendar_format),
        ] {
            if !is_valid_format(format) {
                anyhow::bail!("Invalid {key} pattern: {format:?}");
            }
        }
        Ok(())
    }
}

/// Load settings from a TOML file.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but
/// fails to parse.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<FormboxConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config: FormboxConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "loaded formbox config");
    Ok(Some(config))
}

/// `formbox.toml` in the same directory as the schema file, if present.
pub fn detect_config(schema_path: &Path) -> Option<PathBuf> {
    let candidate = schema_path.parent()?.join(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = FormboxConfig::default();
        assert_eq!(config.numeric_size, 10);
        assert_eq!(config.showers, vec!["name".to_string()]);
        assert_eq!(config.boolean_icon(true), "/images/true.png");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FORMBOX_NUMERIC_SIZE", "8"),
            ("FORMBOX_SHOWERS", "title, name"),
            ("FORMBOX_DATE_FORMAT", "%d/%m/%Y"),
        ]);
        let config = FormboxConfig::default()
            .with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.numeric_size, 8);
        assert_eq!(config.showers, vec!["title".to_string(), "name".to_string()]);
        assert_eq!(config.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_bad_number_is_ignored() {
        let config = FormboxConfig::default().with_overrides(|k| {
            (k == "FORMBOX_NUMERIC_SIZE").then(|| "wide".to_string())
        });
        assert_eq!(config.numeric_size, 10);
    }

    #[test]
    fn test_label_for() {
        let mut config = FormboxConfig::default();
        config
            .labels
            .insert("field_category".into(), "Product category".into());
        assert_eq!(config.label_for("category_id"), "Product category");
        assert_eq!(config.label_for("published_on"), "Published on");
    }

    #[test]
    fn test_load_and_detect() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("models.yaml");
        fs::write(&schema, "models: {}\n").unwrap();
        assert!(detect_config(&schema).is_none());

        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "numeric_size = 6\n[labels]\nfield_name = \"Title\"\n",
        )
        .unwrap();
        let detected = detect_config(&schema).unwrap();
        let config = load_config(&detected).unwrap().unwrap();
        assert_eq!(config.numeric_size, 6);
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.label_for("name"), "Title");
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn test_load_invalid_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "numeric_size = \"wide\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_invalid_date_pattern_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "date_format = \"%Q\"\n").unwrap();
        let err = FormboxConfig::resolve(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("date_format"));
        assert!(FormboxConfig::default().validate().is_ok());
    }
}
