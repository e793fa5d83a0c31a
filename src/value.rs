//! The configuration tree: an immutable, fully-typed instance of a record
//! schema. Every transformation (loading a document, merging overrides)
//! produces a new tree; nothing is ever mutated in place.

use std::path::{Path, PathBuf};

/// One node of a configuration tree.
///
/// Records keep their fields in declaration order, so document output and
/// CLI listings match the schema as written rather than sorting keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Path(PathBuf),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Record(Vec<(String, Value)>),
}

impl Value {
    /// Look up an immediate field of a record.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Navigate by dotted path (e.g. `"window.initial_size"`).
    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in dotted_path.split('.') {
            current = current.field(segment)?;
        }
        Some(current)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// The elements of a tuple or list.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    /// Short name of the value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Path(_) => "path",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Render as a flow-style YAML literal: scalars verbatim (strings quoted
    /// only when YAML would reinterpret them), sequences bracketed.
    pub fn flow(&self) -> String {
        match self {
            Value::Str(s) => yaml_scalar(s),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Bool(b) => b.to_string(),
            Value::Path(p) => yaml_scalar(&p.display().to_string()),
            Value::Tuple(items) | Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::flow).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Record(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", value.flow()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
        }
    }
}

/// Render a string as a YAML scalar, quoting only when the plain form would
/// parse back as something else (a number, a bool, flow syntax, a comment).
fn yaml_scalar(s: &str) -> String {
    if needs_quoting(s) {
        let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        s.to_string()
    }
}

fn needs_quoting(s: &str) -> bool {
    if s.is_empty() || s.trim() != s || s.contains('\n') {
        return true;
    }
    let first = s.chars().next().unwrap_or(' ');
    if "#&*!|>'\"%@`?".contains(first) {
        return true;
    }
    // Flow indicators split the string when it is rendered inside [..] or
    // {..}, so they force quoting wherever they appear.
    if s.contains(['[', ']', '{', '}', ',']) {
        return true;
    }
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return true;
    }
    // Plain scalars that YAML types as something other than a string.
    if matches!(s, "true" | "false" | "null" | "~" | "yes" | "no") {
        return true;
    }
    s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok()
}
