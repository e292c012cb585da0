//! # CLI Module
//!
//! The `formbox-gen` command line.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Scaffold a form layout, page skeletons and the stylesheet for a model:
//!
//! ```bash
//! formbox-gen generate --schema models.yaml --model Product --output views
//! ```
//!
//! Options:
//! - `--records <FILE>` - Record fixtures for association choices and the listing
//! - `--force` - Overwrite existing files
//! - `--dry-run` - Show what would be written
//! - `--force-plural` - Keep a plural model name
//!
//! ### `inspect`
//!
//! Print the resolved type and widget of every field:
//!
//! ```bash
//! formbox-gen inspect --schema models.yaml --model Product --read-only
//! ```
//!
//! ### `render`
//!
//! Render a layout for a record to HTML on stdout:
//!
//! ```bash
//! formbox-gen render --schema models.yaml --layout views/products/form.yaml \
//!     --record product.yaml --records fixtures.yaml
//! ```
//!
//! ### `lint`
//!
//! ```bash
//! formbox-gen lint --schema models.yaml --fail-on-error
//! ```
//!
//! Global options: `--config <FILE>` (default: `formbox.toml` next to the
//! schema) and `-v` / `-vv` for debug / trace logging.

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
