//! CLI surface generator: one flag per leaf field, derived from the schema.
//!
//! The schema is flattened into a static list of [`CliOption`] records, each
//! describing one flag (or positional argument): its dotted path, its
//! normalized flag name (`.` becomes `_`), its help text (the field's doc),
//! its help-heading group (the title-cased top path segment), and its default
//! from the defaults tree. The list is then fed to clap's builder API.
//!
//! Defaults are shown in `--help`, but only flags the user explicitly passed
//! become overrides — checked via [`ArgMatches::value_source`] — so an
//! untouched flag keeps whatever the persisted document said instead of
//! silently reverting to the schema default.

use std::collections::HashMap;

use clap::parser::ValueSource;
use clap::{Arg, ArgMatches, Command};

use crate::error::ConfigError;
use crate::schema::{FieldType, Schema};
use crate::value::Value;

/// One entry of the generated CLI surface.
#[derive(Debug, Clone)]
pub struct CliOption {
    /// Dotted path into the configuration tree.
    pub path: String,
    /// Flag name: the path with `.` replaced by `_`.
    pub flag: String,
    pub ty: FieldType,
    /// Value from the defaults tree, shown in help text.
    pub default: Value,
    pub help: Option<String>,
    /// Help heading for nested fields, e.g. `window.initial_size` → "Window".
    pub group: Option<String>,
    pub positional: bool,
}

/// Flatten a schema into CLI options. Names in `positional` become
/// positional arguments instead of long flags.
///
/// Two distinct paths normalizing to the same flag name is a programmer
/// error, caught here rather than at parse time.
pub fn build_options(schema: &Schema, positional: &[&str]) -> Result<Vec<CliOption>, ConfigError> {
    schema.validate()?;
    let defaults = schema.defaults()?;

    let mut seen: HashMap<String, String> = HashMap::new();
    let mut options = Vec::new();
    for (path, ty) in schema.leaf_paths() {
        let flag = path.replace('.', "_");
        if let Some(first) = seen.insert(flag.clone(), path.clone()) {
            return Err(ConfigError::AmbiguousFlag {
                flag,
                first,
                second: path,
            });
        }
        let default = defaults
            .get(&path)
            .cloned()
            .unwrap_or_else(|| Value::Record(vec![]));
        let help = schema
            .field_at(&path)
            .and_then(|f| f.doc)
            .map(str::to_string);
        let group = path
            .split_once('.')
            .map(|(section, _)| title_case(section));
        options.push(CliOption {
            positional: positional.contains(&path.as_str()) || positional.contains(&flag.as_str()),
            path,
            flag,
            ty: ty.clone(),
            default,
            help,
            group,
        });
    }
    Ok(options)
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build the clap command for a list of options.
pub fn build_command(name: &'static str, about: &str, options: &[CliOption]) -> Command {
    let mut cmd = Command::new(name).about(about.to_string());
    for opt in options {
        let mut arg = Arg::new(opt.flag.clone());
        if opt.positional {
            arg = arg.required(false);
        } else {
            arg = arg.long(opt.flag.clone());
            if let Some(group) = &opt.group {
                arg = arg.help_heading(group.clone());
            }
        }
        if let Some(help) = &opt.help {
            arg = arg.help(help.clone());
        }
        arg = match &opt.ty {
            FieldType::Tuple(elems) => {
                let defaults: Vec<String> = opt
                    .default
                    .as_seq()
                    .unwrap_or_default()
                    .iter()
                    .map(Value::flow)
                    .collect();
                arg.num_args(elems.len()).default_values(defaults)
            }
            _ => arg.num_args(1).default_value(opt.default.flow()),
        };
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Extract typed overrides from parsed matches: only values the user
/// explicitly passed on the command line, converted back to dotted paths.
pub fn matches_to_overrides(
    matches: &ArgMatches,
    options: &[CliOption],
) -> Result<Vec<(String, Value)>, ConfigError> {
    let mut overrides = Vec::new();
    for opt in options {
        if matches.value_source(&opt.flag) != Some(ValueSource::CommandLine) {
            continue;
        }
        let value = match &opt.ty {
            FieldType::Tuple(elem_types) => {
                let raws: Vec<&String> = matches
                    .get_many::<String>(&opt.flag)
                    .map(Iterator::collect)
                    .unwrap_or_default();
                if raws.len() != elem_types.len() {
                    return Err(ConfigError::Shape {
                        path: opt.path.clone(),
                        expected: opt.ty.name(),
                        actual: format!("{} elements", raws.len()),
                    });
                }
                let items = raws
                    .iter()
                    .zip(elem_types)
                    .enumerate()
                    .map(|(i, (raw, ty))| parse_scalar(raw, ty, &format!("{}.{i}", opt.path)))
                    .collect::<Result<Vec<_>, _>>()?;
                Value::Tuple(items)
            }
            ty => {
                let Some(raw) = matches.get_one::<String>(&opt.flag) else {
                    continue;
                };
                parse_scalar(raw, ty, &opt.path)?
            }
        };
        overrides.push((opt.path.clone(), value));
    }
    Ok(overrides)
}

/// Coerce one CLI string to its declared scalar type.
fn parse_scalar(raw: &str, ty: &FieldType, path: &str) -> Result<Value, ConfigError> {
    let conversion = || ConfigError::Conversion {
        path: path.into(),
        value: format!("\"{raw}\""),
        target: ty.name(),
    };
    match ty {
        FieldType::Str => Ok(Value::Str(raw.to_string())),
        FieldType::Int => raw.parse().map(Value::Int).map_err(|_| conversion()),
        FieldType::Float => raw.parse().map(Value::Float).map_err(|_| conversion()),
        FieldType::Bool => match raw {
            _ if raw.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            _ if raw.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(conversion()),
        },
        FieldType::FilePath => Ok(Value::Path(raw.into())),
        FieldType::Tuple(_) | FieldType::List(_) | FieldType::Record(_) => Err(conversion()),
    }
}
