//! PUCOTI, a purposeful countdown timer, and the schema-driven
//! configuration system it runs on.
//!
//! The configuration side is the interesting part. A [`Schema`] declares
//! every setting explicitly: its name, its type, its default, and its doc
//! line. Everything else derives from that one declaration:
//!
//! - [`codec`] renders the schema as a commented YAML document, so the
//!   generated config file documents itself.
//! - [`loader`] reads such a document back, coercing each value to its
//!   declared type and rejecting unknown keys with the list of valid ones.
//! - [`merge`] applies partial updates as patches: a key absent from a
//!   document or the command line keeps its previous value.
//! - [`cli`] flattens the schema into one flag per leaf field, with help
//!   text and defaults pulled from the same declaration.
//! - [`resolve`] stacks the layers: schema defaults, then the persisted
//!   file, then flags the user explicitly passed.
//!
//! Records nest arbitrarily, so a `window.initial_size` setting is declared
//! once and shows up in the file, the errors, and the CLI under that path.
//!
//! The timer itself lives in [`countdown`] and [`app`]: a per-second loop
//! with a bell cadence, timed shell commands, and a JSONL purpose log.

pub mod error;
pub mod schema;
pub mod value;

pub mod app;
pub mod cli;
pub mod codec;
pub mod config;
pub mod countdown;
pub mod duration;
pub mod history;
pub mod loader;
pub mod merge;
pub mod resolve;

#[cfg(test)]
mod fixtures;

pub use config::PucotiConfig;
pub use error::ConfigError;
pub use schema::{FieldDef, FieldType, Schema};
pub use value::Value;
