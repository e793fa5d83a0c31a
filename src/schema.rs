//! Explicit schema description for configuration records.
//!
//! A [`Schema`] is an ordinary value built once at startup: a named, ordered
//! list of typed fields, each with an optional doc string and a default.
//! Every other part of the config system — document generation, loading,
//! merging, the CLI surface — is a recursive walk over this one description,
//! so adding a field in one place updates all of them.

use crate::error::ConfigError;
use crate::value::Value;

/// The declared type of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
    FilePath,
    /// Fixed-arity heterogeneous sequence, e.g. a color triplet.
    Tuple(Vec<FieldType>),
    /// Homogeneous sequence, replaced wholesale on load (never patched
    /// element-by-element) and excluded from the CLI surface.
    List(Box<FieldType>),
    /// A nested record with its own schema.
    Record(Schema),
}

impl FieldType {
    /// Human-readable name for error messages.
    pub fn name(&self) -> String {
        match self {
            FieldType::Str => "string".into(),
            FieldType::Int => "integer".into(),
            FieldType::Float => "float".into(),
            FieldType::Bool => "boolean".into(),
            FieldType::FilePath => "path".into(),
            FieldType::Tuple(items) => format!("a sequence of {} elements", items.len()),
            FieldType::List(_) => "a list".into(),
            FieldType::Record(schema) => format!("a '{}' record", schema.name),
        }
    }
}

/// One field of a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
    /// Required for every non-record field; record fields derive their
    /// default from their own schema.
    pub default: Option<Value>,
    /// Surfaced as a document comment and as CLI help text.
    pub doc: Option<&'static str>,
}

impl FieldDef {
    /// A leaf field with a concrete default.
    pub fn new(name: &'static str, ty: FieldType, default: Value) -> Self {
        Self {
            name,
            ty,
            default: Some(default),
            doc: None,
        }
    }

    /// A nested record field.
    pub fn record(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            ty: FieldType::Record(schema),
            default: None,
            doc: None,
        }
    }

    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }
}

/// A record type: named, documented, ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: &'static str,
    pub doc: Option<&'static str>,
    pub fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new(name: &'static str, fields: Vec<FieldDef>) -> Self {
        Self {
            name,
            doc: None,
            fields,
        }
    }

    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Check the definition itself: every leaf field must carry a default.
    /// This is a programmer error, surfaced at startup or test time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in &self.fields {
            match &field.ty {
                FieldType::Record(sub) => sub.validate()?,
                _ => {
                    if field.default.is_none() {
                        return Err(ConfigError::MissingDefault {
                            record: self.name.into(),
                            field: field.name.into(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field definition by dotted path.
    pub fn field_at(&self, dotted_path: &str) -> Option<&FieldDef> {
        let (head, rest) = match dotted_path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (dotted_path, None),
        };
        let field = self.field(head)?;
        match rest {
            None => Some(field),
            Some(rest) => match &field.ty {
                FieldType::Record(sub) => sub.field_at(rest),
                _ => None,
            },
        }
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.to_string()).collect()
    }

    /// The all-defaults configuration tree for this schema.
    pub fn defaults(&self) -> Result<Value, ConfigError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = match (&field.ty, &field.default) {
                (FieldType::Record(sub), _) => sub.defaults()?,
                (_, Some(default)) => default.clone(),
                (_, None) => {
                    return Err(ConfigError::MissingDefault {
                        record: self.name.into(),
                        field: field.name.into(),
                    });
                }
            };
            fields.push((field.name.to_string(), value));
        }
        Ok(Value::Record(fields))
    }

    /// Flatten every leaf field into `(dotted path, type)` pairs, in
    /// declaration order. List-typed fields are skipped: they cannot be set
    /// from a single CLI flag and are only reachable through the document.
    pub fn leaf_paths(&self) -> Vec<(String, &FieldType)> {
        let mut out = Vec::new();
        self.collect_leaf_paths("", &mut out);
        out
    }

    fn collect_leaf_paths<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a FieldType)>) {
        for field in &self.fields {
            let dotted = if prefix.is_empty() {
                field.name.to_string()
            } else {
                format!("{prefix}.{}", field.name)
            };
            match &field.ty {
                FieldType::Record(sub) => sub.collect_leaf_paths(&dotted, out),
                FieldType::List(_) => {}
                _ => out.push((dotted, &field.ty)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{nested_schema, small_schema};

    #[test]
    fn validate_accepts_complete_schema() {
        assert!(nested_schema().validate().is_ok());
    }

    #[test]
    fn validate_rejects_leaf_without_default() {
        let schema = Schema::new(
            "Broken",
            vec![FieldDef {
                name: "age",
                ty: FieldType::Int,
                default: None,
                doc: None,
            }],
        );
        let err = schema.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingDefault { .. }));
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn validate_recurses_into_records() {
        let broken_inner = Schema::new(
            "Inner",
            vec![FieldDef {
                name: "x",
                ty: FieldType::Str,
                default: None,
                doc: None,
            }],
        );
        let schema = Schema::new("Outer", vec![FieldDef::record("inner", broken_inner)]);
        assert!(schema.validate().is_err());
    }

    #[test]
    fn defaults_build_full_tree() {
        let tree = small_schema().defaults().unwrap();
        assert_eq!(tree.get("name").unwrap().as_str().unwrap(), "Joe");
        assert_eq!(tree.get("age").unwrap().as_int().unwrap(), -1);
    }

    #[test]
    fn defaults_recurse_into_records() {
        let tree = nested_schema().defaults().unwrap();
        assert_eq!(tree.get("small.age").unwrap().as_int().unwrap(), -1);
        assert_eq!(
            tree.get("lists.rect").unwrap(),
            &Value::Tuple(vec![Value::Int(3), Value::Int(4)])
        );
    }

    #[test]
    fn leaf_paths_are_dotted_and_ordered() {
        let schema = nested_schema();
        let paths: Vec<String> = schema.leaf_paths().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["small.name", "small.age", "lists.rect"]);
    }

    #[test]
    fn leaf_paths_exclude_lists() {
        let schema = nested_schema();
        assert!(
            schema
                .leaf_paths()
                .iter()
                .all(|(p, _)| p != "lists.names")
        );
    }

    #[test]
    fn field_lookup() {
        let schema = small_schema();
        assert!(schema.field("age").is_some());
        assert!(schema.field("bogus").is_none());
        assert_eq!(schema.field_names(), vec!["name", "age"]);
    }

    #[test]
    fn field_at_walks_dotted_paths() {
        let schema = nested_schema();
        assert_eq!(schema.field_at("small.age").unwrap().name, "age");
        assert_eq!(
            schema.field_at("small.age").unwrap().doc,
            Some("Pass -1 if you don't want to tell")
        );
        assert!(schema.field_at("small.bogus").is_none());
        assert!(schema.field_at("small.age.deeper").is_none());
    }
}
