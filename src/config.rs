//! The application schema and its typed view.
//!
//! [`schema`] declares every setting, its default, and its doc line; the
//! doc lines surface both as comments in the generated config file and as
//! `--help` text. [`PucotiConfig::from_tree`] converts a resolved tree into
//! plain Rust types for the rest of the program.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::duration;
use crate::error::ConfigError;
use crate::schema::{FieldDef, FieldType, Schema};
use crate::value::Value;

pub type Color = (u8, u8, u8);

fn color(r: i64, g: i64, b: i64) -> Value {
    Value::Tuple(vec![Value::Int(r), Value::Int(g), Value::Int(b)])
}

fn pair(a: i64, b: i64) -> Value {
    Value::Tuple(vec![Value::Int(a), Value::Int(b)])
}

fn font_schema() -> Schema {
    Schema::new(
        "Font",
        vec![
            FieldDef::new(
                "timer",
                FieldType::FilePath,
                Value::Path("assets/Bevan-Regular.ttf".into()),
            )
            .doc("Font file for the big timer"),
            FieldDef::new(
                "rest",
                FieldType::FilePath,
                Value::Path("assets/Bevan-Regular.ttf".into()),
            )
            .doc("Font for everything else"),
        ],
    )
}

fn color_schema() -> Schema {
    let rgb = FieldType::Tuple(vec![FieldType::Int, FieldType::Int, FieldType::Int]);
    Schema::new(
        "Color",
        vec![
            FieldDef::new("timer", rgb.clone(), color(255, 224, 145)),
            FieldDef::new("timer_up", rgb.clone(), color(255, 0, 0)),
            FieldDef::new("purpose", rgb.clone(), color(183, 255, 183)),
            FieldDef::new("total_time", rgb.clone(), color(183, 183, 255)),
            FieldDef::new("background", rgb, color(0, 0, 0)),
        ],
    )
    .doc("Colors are triplets of numbers between 0 and 255")
}

fn window_schema() -> Schema {
    let xy = FieldType::Tuple(vec![FieldType::Int, FieldType::Int]);
    Schema::new(
        "Window",
        vec![
            FieldDef::new("initial_position", xy.clone(), pair(-5, -5)),
            FieldDef::new("initial_size", xy, pair(220, 80)),
        ],
    )
}

fn run_at_schema() -> Schema {
    Schema::new(
        "RunAt",
        vec![
            FieldDef::new("at", FieldType::Str, Value::Str("-1m".into())),
            FieldDef::new(
                "cmd",
                FieldType::Str,
                Value::Str("notify-send 'Time is up by one minute!'".into()),
            ),
        ],
    )
    .doc("Run commands at specific times")
}

/// The full application schema.
pub fn schema() -> Schema {
    Schema::new(
        "Pucoti",
        vec![
            FieldDef::new("initial_timer", FieldType::Str, Value::Str("5m".into()))
                .doc("The initial timer duration"),
            FieldDef::new(
                "bell",
                FieldType::FilePath,
                Value::Path("assets/bell.mp3".into()),
            )
            .doc("Path to the file played when time is up"),
            FieldDef::new("ring_every", FieldType::Int, Value::Int(20))
                .doc("Time between bells, in seconds"),
            FieldDef::new("ring_count", FieldType::Int, Value::Int(-1))
                .doc("Number of bells played when the time is up. -1 means no limit."),
            FieldDef::new("restart", FieldType::Bool, Value::Bool(false))
                .doc("Restart the timer when it reaches 0"),
            FieldDef::new(
                "history_file",
                FieldType::FilePath,
                Value::Path("~/.pucoti_history".into()),
            )
            .doc("Path to save the history of purposes"),
            FieldDef::record("font", font_schema()),
            FieldDef::record("color", color_schema()),
            FieldDef::record("window", window_schema()),
            FieldDef::new(
                "run_at",
                FieldType::List(Box::new(FieldType::Record(run_at_schema()))),
                Value::List(vec![]),
            ),
        ],
    )
    .doc("The main configuration for PUCOTI.\n\nThis file lives at ~/.config/pucoti/default.yaml.")
}

/// Location of the persisted configuration file, if the platform exposes
/// a config directory.
pub fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pucoti").map(|dirs| dirs.config_dir().join("default.yaml"))
}

/// One `run_at` entry: run `cmd` when the countdown crosses `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunAt {
    /// Offset from zero, e.g. `-1m` fires one minute after the timer ran out.
    pub at: i64,
    pub cmd: String,
}

/// Typed view over a resolved configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PucotiConfig {
    pub initial_timer: i64,
    pub bell: PathBuf,
    pub ring_every: i64,
    pub ring_count: i64,
    pub restart: bool,
    pub history_file: PathBuf,
    pub font_timer: PathBuf,
    pub font_rest: PathBuf,
    pub color_timer: Color,
    pub color_timer_up: Color,
    pub color_purpose: Color,
    pub color_total_time: Color,
    pub color_background: Color,
    pub window_position: (i64, i64),
    pub window_size: (i64, i64),
    pub run_at: Vec<RunAt>,
}

impl PucotiConfig {
    pub fn from_tree(tree: &Value) -> Result<Self, ConfigError> {
        let initial_timer = duration::parse_duration(get_str(tree, "initial_timer")?)?;
        let run_at = tree
            .get("run_at")
            .and_then(Value::as_seq)
            .unwrap_or_default()
            .iter()
            .map(|entry| {
                let at = entry.as_str_at("at", "run_at.at")?;
                let cmd = entry.as_str_at("cmd", "run_at.cmd")?;
                Ok(RunAt {
                    at: duration::parse_duration(at)?,
                    cmd: cmd.to_string(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self {
            initial_timer,
            bell: get_path(tree, "bell")?,
            ring_every: get_int(tree, "ring_every")?,
            ring_count: get_int(tree, "ring_count")?,
            restart: get_bool(tree, "restart")?,
            history_file: get_path(tree, "history_file")?,
            font_timer: get_path(tree, "font.timer")?,
            font_rest: get_path(tree, "font.rest")?,
            color_timer: get_color(tree, "color.timer")?,
            color_timer_up: get_color(tree, "color.timer_up")?,
            color_purpose: get_color(tree, "color.purpose")?,
            color_total_time: get_color(tree, "color.total_time")?,
            color_background: get_color(tree, "color.background")?,
            window_position: get_pair(tree, "window.initial_position")?,
            window_size: get_pair(tree, "window.initial_size")?,
            run_at,
        })
    }
}

trait StrAt {
    fn as_str_at(&self, field: &str, path: &str) -> Result<&str, ConfigError>;
}

impl StrAt for Value {
    fn as_str_at(&self, field: &str, path: &str) -> Result<&str, ConfigError> {
        self.field(field)
            .and_then(Value::as_str)
            .ok_or_else(|| shape(path, "string", self))
    }
}

fn shape(path: &str, expected: &str, actual: &Value) -> ConfigError {
    ConfigError::Shape {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: actual.kind().to_string(),
    }
}

fn lookup<'a>(tree: &'a Value, path: &str) -> Result<&'a Value, ConfigError> {
    tree.get(path).ok_or_else(|| ConfigError::UnknownOverridePath {
        path: path.to_string(),
    })
}

fn get_str<'a>(tree: &'a Value, path: &str) -> Result<&'a str, ConfigError> {
    let v = lookup(tree, path)?;
    v.as_str().ok_or_else(|| shape(path, "string", v))
}

fn get_int(tree: &Value, path: &str) -> Result<i64, ConfigError> {
    let v = lookup(tree, path)?;
    v.as_int().ok_or_else(|| shape(path, "integer", v))
}

fn get_bool(tree: &Value, path: &str) -> Result<bool, ConfigError> {
    let v = lookup(tree, path)?;
    v.as_bool().ok_or_else(|| shape(path, "boolean", v))
}

fn get_path(tree: &Value, path: &str) -> Result<PathBuf, ConfigError> {
    let v = lookup(tree, path)?;
    v.as_path()
        .map(PathBuf::from)
        .ok_or_else(|| shape(path, "file path", v))
}

fn get_pair(tree: &Value, path: &str) -> Result<(i64, i64), ConfigError> {
    let v = lookup(tree, path)?;
    match v.as_seq() {
        Some([a, b]) => match (a.as_int(), b.as_int()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(shape(path, "a pair of integers", v)),
        },
        _ => Err(shape(path, "a pair of integers", v)),
    }
}

fn get_color(tree: &Value, path: &str) -> Result<Color, ConfigError> {
    let v = lookup(tree, path)?;
    let component = |n: &Value| -> Option<u8> { n.as_int().and_then(|i| u8::try_from(i).ok()) };
    match v.as_seq() {
        Some([r, g, b]) => match (component(r), component(g), component(b)) {
            (Some(r), Some(g), Some(b)) => Ok((r, g, b)),
            _ => Err(shape(path, "three integers between 0 and 255", v)),
        },
        _ => Err(shape(path, "three integers between 0 and 255", v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge;
    use pretty_assertions::assert_eq;

    #[test]
    fn schema_is_well_formed() {
        schema().validate().unwrap();
    }

    #[test]
    fn defaults_convert_to_a_typed_config() {
        let tree = schema().defaults().unwrap();
        let config = PucotiConfig::from_tree(&tree).unwrap();
        assert_eq!(config.initial_timer, 300);
        assert_eq!(config.ring_every, 20);
        assert_eq!(config.ring_count, -1);
        assert!(!config.restart);
        assert_eq!(config.color_timer, (255, 224, 145));
        assert_eq!(config.window_size, (220, 80));
        assert!(config.run_at.is_empty());
    }

    #[test]
    fn run_at_entries_are_parsed_as_durations() {
        let tree = schema().defaults().unwrap();
        let tree = merge::merge(
            &tree,
            &[(
                "run_at".to_string(),
                Value::List(vec![Value::Record(vec![
                    ("at".to_string(), Value::Str("-1m".into())),
                    ("cmd".to_string(), Value::Str("true".into())),
                ])]),
            )],
        )
        .unwrap();
        let config = PucotiConfig::from_tree(&tree).unwrap();
        assert_eq!(
            config.run_at,
            vec![RunAt {
                at: -60,
                cmd: "true".to_string()
            }]
        );
    }

    #[test]
    fn out_of_range_color_is_a_shape_error() {
        let tree = schema().defaults().unwrap();
        let tree = merge::merge(
            &tree,
            &[(
                "color.timer".to_string(),
                Value::Tuple(vec![Value::Int(300), Value::Int(0), Value::Int(0)]),
            )],
        )
        .unwrap();
        let err = PucotiConfig::from_tree(&tree).unwrap_err();
        assert!(matches!(err, ConfigError::Shape { .. }));
    }

    #[test]
    fn nested_flags_keep_declaration_order_in_the_document() {
        let doc = crate::codec::generate_document(&schema()).unwrap();
        let name_pos = doc.find("initial_timer:").unwrap();
        let font_pos = doc.find("font:").unwrap();
        let run_at_pos = doc.find("run_at:").unwrap();
        assert!(name_pos < font_pos && font_pos < run_at_pos);
    }
}
