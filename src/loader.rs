//! Type coercion: raw parsed data against a schema, producing typed values.
//!
//! The walk mirrors the document structure: records recurse, tuples check
//! arity, lists are replaced wholesale, scalars are coerced to their declared
//! primitive. The current dotted path is threaded through purely for error
//! messages, and every leaf present in the raw data is recorded as a
//! `(path, value)` override — absent keys mean "keep the current value", so
//! a sparse document is a patch and a total document is just a bigger one.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::schema::{FieldType, Schema};
use crate::value::Value;

/// Walk raw data against a record schema and collect the typed overrides it
/// names. Unknown keys fail with the offending dotted path and the valid
/// field names at that level.
pub fn load_overrides(
    raw: &serde_yaml::Value,
    schema: &Schema,
) -> Result<Vec<(String, Value)>, ConfigError> {
    let mut touched = Vec::new();
    load_record(raw, schema, "", &mut touched)?;
    Ok(touched)
}

fn load_record(
    raw: &serde_yaml::Value,
    schema: &Schema,
    prefix: &str,
    touched: &mut Vec<(String, Value)>,
) -> Result<(), ConfigError> {
    let mapping = raw.as_mapping().ok_or_else(|| ConfigError::Shape {
        path: display_path(prefix),
        expected: format!("a mapping for '{}'", schema.name),
        actual: yaml_kind(raw).into(),
    })?;

    for (key, value) in mapping {
        let name = key.as_str().ok_or_else(|| ConfigError::Shape {
            path: display_path(prefix),
            expected: "a string key".into(),
            actual: yaml_kind(key).into(),
        })?;
        let dotted = join(prefix, name);
        let field = schema.field(name).ok_or_else(|| ConfigError::UnknownField {
            path: dotted.clone(),
            valid: schema.field_names(),
        })?;
        match &field.ty {
            FieldType::Record(sub) => load_record(value, sub, &dotted, touched)?,
            ty => {
                let typed = load_value(value, ty, &dotted)?;
                touched.push((dotted, typed));
            }
        }
    }
    Ok(())
}

/// Coerce one raw value to a declared type.
pub fn load_value(
    raw: &serde_yaml::Value,
    ty: &FieldType,
    path: &str,
) -> Result<Value, ConfigError> {
    match ty {
        FieldType::Str => match raw {
            serde_yaml::Value::String(s) => Ok(Value::Str(s.clone())),
            serde_yaml::Value::Number(n) => Ok(Value::Str(n.to_string())),
            serde_yaml::Value::Bool(b) => Ok(Value::Str(b.to_string())),
            _ => Err(conversion(raw, ty, path)),
        },
        FieldType::Int => match raw {
            serde_yaml::Value::Number(n) if n.as_i64().is_some() => {
                Ok(Value::Int(n.as_i64().unwrap_or_default()))
            }
            serde_yaml::Value::String(s) if s.parse::<i64>().is_ok() => {
                Ok(Value::Int(s.parse().unwrap_or_default()))
            }
            _ => Err(conversion(raw, ty, path)),
        },
        FieldType::Float => match raw {
            serde_yaml::Value::Number(n) => match n.as_f64() {
                Some(f) => Ok(Value::Float(f)),
                None => Err(conversion(raw, ty, path)),
            },
            serde_yaml::Value::String(s) if s.parse::<f64>().is_ok() => {
                Ok(Value::Float(s.parse().unwrap_or_default()))
            }
            _ => Err(conversion(raw, ty, path)),
        },
        FieldType::Bool => match raw {
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_yaml::Value::String(s) if s.eq_ignore_ascii_case("true") => {
                Ok(Value::Bool(true))
            }
            serde_yaml::Value::String(s) if s.eq_ignore_ascii_case("false") => {
                Ok(Value::Bool(false))
            }
            _ => Err(conversion(raw, ty, path)),
        },
        FieldType::FilePath => match raw {
            serde_yaml::Value::String(s) => Ok(Value::Path(PathBuf::from(s))),
            _ => Err(conversion(raw, ty, path)),
        },
        FieldType::Tuple(elem_types) => {
            let seq = raw.as_sequence().ok_or_else(|| ConfigError::Shape {
                path: path.into(),
                expected: ty.name(),
                actual: yaml_kind(raw).into(),
            })?;
            if seq.len() != elem_types.len() {
                return Err(ConfigError::Shape {
                    path: path.into(),
                    expected: ty.name(),
                    actual: format!("{} elements", seq.len()),
                });
            }
            let items = seq
                .iter()
                .zip(elem_types)
                .enumerate()
                .map(|(i, (elem, elem_ty))| load_value(elem, elem_ty, &join(path, &i.to_string())))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Tuple(items))
        }
        FieldType::List(elem_ty) => {
            let seq = raw.as_sequence().ok_or_else(|| ConfigError::Shape {
                path: path.into(),
                expected: ty.name(),
                actual: yaml_kind(raw).into(),
            })?;
            let items = seq
                .iter()
                .enumerate()
                .map(|(i, elem)| load_value(elem, elem_ty, &join(path, &i.to_string())))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        }
        // Records inside lists and tuples are materialized outright: their
        // own defaults patched with whatever keys are present.
        FieldType::Record(sub) => {
            let mapping = raw.as_mapping().ok_or_else(|| ConfigError::Shape {
                path: path.into(),
                expected: ty.name(),
                actual: yaml_kind(raw).into(),
            })?;
            let Value::Record(mut fields) = sub.defaults()? else {
                unreachable!("defaults of a schema is always a record");
            };
            for (key, value) in mapping {
                let name = key.as_str().ok_or_else(|| ConfigError::Shape {
                    path: path.into(),
                    expected: "a string key".into(),
                    actual: yaml_kind(key).into(),
                })?;
                let dotted = join(path, name);
                let field = sub.field(name).ok_or_else(|| ConfigError::UnknownField {
                    path: dotted.clone(),
                    valid: sub.field_names(),
                })?;
                let typed = load_value(value, &field.ty, &dotted)?;
                if let Some(slot) = fields.iter_mut().find(|(n, _)| n == name) {
                    slot.1 = typed;
                }
            }
            Ok(Value::Record(fields))
        }
    }
}

fn conversion(raw: &serde_yaml::Value, ty: &FieldType, path: &str) -> ConfigError {
    ConfigError::Conversion {
        path: path.into(),
        value: yaml_display(raw),
        target: ty.name(),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn display_path(prefix: &str) -> String {
    if prefix.is_empty() {
        "<root>".into()
    } else {
        prefix.into()
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

fn yaml_display(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => "null".into(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => format!("\"{s}\""),
        other => yaml_kind(other).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{list_schema, nested_schema, small_schema};

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn scalar_fields_are_recorded_as_overrides() {
        let touched = load_overrides(&yaml("age: 12"), &small_schema()).unwrap();
        assert_eq!(touched, vec![("age".to_string(), Value::Int(12))]);
    }

    #[test]
    fn absent_fields_are_not_recorded() {
        let touched = load_overrides(&yaml("name: Ada"), &small_schema()).unwrap();
        assert_eq!(touched.len(), 1);
        assert_eq!(touched[0].0, "name");
    }

    #[test]
    fn nested_fields_get_dotted_paths() {
        let touched = load_overrides(&yaml("small:\n  age: 99"), &nested_schema()).unwrap();
        assert_eq!(touched, vec![("small.age".to_string(), Value::Int(99))]);
    }

    #[test]
    fn unknown_field_is_rejected_with_valid_names() {
        let err = load_overrides(&yaml("bogus: 1"), &small_schema()).unwrap_err();
        match err {
            ConfigError::UnknownField { path, valid } => {
                assert_eq!(path, "bogus");
                assert_eq!(valid, vec!["name", "age"]);
            }
            other => panic!("Expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn unknown_nested_field_names_full_path() {
        let err = load_overrides(&yaml("small:\n  typo: 1"), &nested_schema()).unwrap_err();
        match err {
            ConfigError::UnknownField { path, .. } => assert_eq!(path, "small.typo"),
            other => panic!("Expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn tuple_arity_mismatch_is_a_shape_error() {
        let err = load_overrides(&yaml("rect: [1, 2, 3]"), &list_schema()).unwrap_err();
        match err {
            ConfigError::Shape {
                path,
                expected,
                actual,
            } => {
                assert_eq!(path, "rect");
                assert!(expected.contains("2 elements"));
                assert!(actual.contains("3"));
            }
            other => panic!("Expected Shape, got {other:?}"),
        }
    }

    #[test]
    fn tuple_elements_are_coerced_positionally() {
        let touched = load_overrides(&yaml("rect: [7, 8]"), &list_schema()).unwrap();
        assert_eq!(
            touched,
            vec![(
                "rect".to_string(),
                Value::Tuple(vec![Value::Int(7), Value::Int(8)])
            )]
        );
    }

    #[test]
    fn list_is_replaced_wholesale() {
        let touched = load_overrides(&yaml("names: [a, b]"), &list_schema()).unwrap();
        assert_eq!(
            touched,
            vec![(
                "names".to_string(),
                Value::List(vec![Value::Str("a".into()), Value::Str("b".into())])
            )]
        );
    }

    #[test]
    fn scalar_where_sequence_expected_is_a_shape_error() {
        let err = load_overrides(&yaml("names: nope"), &list_schema()).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn bad_scalar_is_a_conversion_error() {
        let err = load_overrides(&yaml("age: soon"), &small_schema()).unwrap_err();
        match err {
            ConfigError::Conversion {
                path,
                value,
                target,
            } => {
                assert_eq!(path, "age");
                assert!(value.contains("soon"));
                assert_eq!(target, "integer");
            }
            other => panic!("Expected Conversion, got {other:?}"),
        }
    }

    #[test]
    fn numeric_string_coerces_to_int() {
        let touched = load_overrides(&yaml("age: \"42\""), &small_schema()).unwrap();
        assert_eq!(touched[0].1, Value::Int(42));
    }

    #[test]
    fn number_coerces_to_string() {
        let touched = load_overrides(&yaml("name: 5"), &small_schema()).unwrap();
        assert_eq!(touched[0].1, Value::Str("5".into()));
    }

    #[test]
    fn non_mapping_root_is_a_shape_error() {
        let err = load_overrides(&yaml("- 1\n- 2"), &small_schema()).unwrap_err();
        match err {
            ConfigError::Shape { path, .. } => assert_eq!(path, "<root>"),
            other => panic!("Expected Shape, got {other:?}"),
        }
    }

    #[test]
    fn record_in_list_fills_missing_fields_from_defaults() {
        use crate::schema::{FieldDef, Schema};

        let entry = Schema::new(
            "RunAt",
            vec![
                FieldDef::new("at", FieldType::Str, Value::Str("-1m".into())),
                FieldDef::new("cmd", FieldType::Str, Value::Str("notify-send hi".into())),
            ],
        );
        let schema = Schema::new(
            "Cfg",
            vec![FieldDef::new(
                "run_at",
                FieldType::List(Box::new(FieldType::Record(entry))),
                Value::List(vec![]),
            )],
        );

        let touched = load_overrides(&yaml("run_at:\n- at: 0s"), &schema).unwrap();
        let Value::List(items) = &touched[0].1 else {
            panic!("expected a list");
        };
        assert_eq!(items[0].get("at").unwrap().as_str().unwrap(), "0s");
        assert_eq!(
            items[0].get("cmd").unwrap().as_str().unwrap(),
            "notify-send hi"
        );
    }

    #[test]
    fn load_value_float_accepts_integer_literal() {
        let v = load_value(&yaml("3"), &FieldType::Float, "x").unwrap();
        assert_eq!(v, Value::Float(3.0));
    }

    #[test]
    fn load_value_path_from_string() {
        let v = load_value(&yaml("~/.pucoti_history"), &FieldType::FilePath, "x").unwrap();
        assert_eq!(v, Value::Path(PathBuf::from("~/.pucoti_history")));
    }
}
