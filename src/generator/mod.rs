//! # Generator Module
//!
//! Scaffolds the form layout and CRUD page skeletons for a model, using the
//! same widget resolution as the form builder.
//!
//! ## Overview
//!
//! For a model of the schema catalog the generator writes:
//! - **Form layout** - `form.yaml`, every editable column and renderable
//!   relation, ready to be tweaked and fed back to `formbox-gen render`
//! - **Pages** - `new.html`, `edit.html`, `show.html` (read-only) and
//!   `index.html`, rendered with Askama templates around the form markup
//! - **Stylesheet** - `stylesheets/form_box.css`, written once and never
//!   overwritten
//!
//! ## Usage
//!
//! ```bash
//! formbox-gen generate --schema models.yaml --model Product --output views
//! ```
//!
//! ```rust,ignore
//! use formbox::generator::{generate_scaffold, ScaffoldOptions};
//!
//! let options = ScaffoldOptions {
//!     output: "views".into(),
//!     ..Default::default()
//! };
//! generate_scaffold(&catalog, "Product", &records, &config, &options)?;
//! ```
//!
//! Existing files are skipped unless `force` is set; `dry_run` only
//! reports what would be written. A plural model name (`products`) is
//! singularized with a warning unless `force_plural` is set.

mod scaffold;
mod templates;
#[cfg(test)]
mod tests;

pub use scaffold::{generate_scaffold, scaffold_layout, ScaffoldOptions, ScaffoldReport};
pub use templates::{write_file, WriteLog};
