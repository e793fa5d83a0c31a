//! Resolution pipeline: defaults, then the persisted document, then CLI
//! overrides — strictly increasing precedence.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, so the full
//! pipeline is testable with synthetic inputs. Steps:
//!
//! 1. Validate the schema definition (programmer errors fail here)
//! 2. Build the all-defaults tree
//! 3. Parse and load the document, merge its overrides (if a document exists)
//! 4. Merge CLI overrides on top (highest priority)

use std::path::PathBuf;

use crate::codec;
use crate::error::ConfigError;
use crate::loader;
use crate::merge::merge;
use crate::schema::Schema;
use crate::value::Value;

/// All pre-loaded data needed to resolve a configuration. No I/O happens here.
pub struct ResolveInput<'a> {
    pub schema: &'a Schema,
    /// Pre-read document content, if a config file exists: (origin, text).
    /// The origin path is only used in error messages.
    pub document: Option<(PathBuf, String)>,
    /// Typed CLI overrides as `(dotted path, value)` pairs — only flags the
    /// user explicitly passed.
    pub cli_overrides: Vec<(String, Value)>,
}

/// Resolve the final configuration tree from pre-loaded inputs.
pub fn resolve(input: ResolveInput) -> Result<Value, ConfigError> {
    input.schema.validate()?;
    let mut tree = input.schema.defaults()?;

    if let Some((origin, text)) = &input.document {
        let raw = codec::parse(text, origin)?;
        // An empty file parses to null; treat it like no document at all.
        if !raw.is_null() {
            let overrides = loader::load_overrides(&raw, input.schema)?;
            tree = merge(&tree, &overrides)?;
        }
    }

    merge(&tree, &input.cli_overrides)
}
