//! Document codec: configuration trees to and from an editable YAML document.
//!
//! The generator direction is written by hand so that field docs become `#`
//! comments and fields keep declaration order. The parser direction is
//! delegated entirely to `serde_yaml`; it produces raw, untyped data with no
//! knowledge of the schema (the loader takes it from there). Comments only
//! survive the generate direction — parsing discards them.

use std::path::Path;

use crate::error::ConfigError;
use crate::schema::{FieldType, Schema};
use crate::value::Value;

/// Serialize a configuration tree against its schema.
///
/// One line per leaf (`name: value`, flow-style literal), one indented block
/// per record field. A schema's own doc and each field's doc are emitted as
/// `# ` comment lines immediately above what they document. The output is
/// valid YAML and feeds back into [`parse`].
pub fn serialize(tree: &Value, schema: &Schema) -> Result<String, ConfigError> {
    let mut lines = Vec::new();
    serialize_into(tree, schema, "", "", &mut lines)?;
    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

/// Serialize the schema's all-defaults tree: the starter document.
pub fn generate_document(schema: &Schema) -> Result<String, ConfigError> {
    serialize(&schema.defaults()?, schema)
}

fn serialize_into(
    tree: &Value,
    schema: &Schema,
    prefix: &str,
    indent: &str,
    out: &mut Vec<String>,
) -> Result<(), ConfigError> {
    if let Some(doc) = schema.doc {
        push_comment(doc, indent, out);
    }
    for field in &schema.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        let value = tree.field(field.name).ok_or_else(|| ConfigError::Shape {
            path: dotted.clone(),
            expected: field.ty.name(),
            actual: "no value".into(),
        })?;
        if let Some(doc) = field.doc {
            push_comment(doc, indent, out);
        }
        match &field.ty {
            FieldType::Record(sub) => {
                out.push(format!("{indent}{}:", field.name));
                let deeper = format!("{indent}  ");
                serialize_into(value, sub, &dotted, &deeper, out)?;
            }
            _ => out.push(format!("{indent}{}: {}", field.name, value.flow())),
        }
    }
    Ok(())
}

fn push_comment(doc: &str, indent: &str, out: &mut Vec<String>) {
    for line in doc.lines() {
        let line = line.trim();
        if line.is_empty() {
            out.push(format!("{indent}#"));
        } else {
            out.push(format!("{indent}# {line}"));
        }
    }
}

/// Parse a document into raw nested data. The grammar is `serde_yaml`'s;
/// `origin` is only used to name the source in errors.
pub fn parse(text: &str, origin: &Path) -> Result<serde_yaml::Value, ConfigError> {
    serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}
