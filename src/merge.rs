//! Partial merge: apply a dotted-path override set to a configuration tree.
//!
//! The override set is first unflattened into a nested patch, then applied
//! structurally: record meets record recurses, a named leaf is replaced
//! outright (tuples and lists included — there is no element-wise patching),
//! and every untouched field is copied from the source tree. The source is
//! never mutated. Overrides are already-typed values; coercion of raw text
//! is the loader's job, not this module's.

use crate::error::ConfigError;
use crate::value::Value;

/// Merge typed overrides into `tree`, producing a new tree.
///
/// Paths that do not resolve to an existing field are an error, never a
/// silent no-op.
pub fn merge(tree: &Value, overrides: &[(String, Value)]) -> Result<Value, ConfigError> {
    let patch = unflatten(overrides)?;
    apply(tree, &patch, "")
}

enum Patch {
    Leaf(Value),
    Record(Vec<(String, Patch)>),
}

/// Expand `("window.initial_size", v)` pairs into nested patch records.
/// Later entries for the same path win.
fn unflatten(overrides: &[(String, Value)]) -> Result<Vec<(String, Patch)>, ConfigError> {
    let mut root: Vec<(String, Patch)> = Vec::new();
    for (dotted, value) in overrides {
        let segments: Vec<&str> = dotted.split('.').collect();
        let mut current = &mut root;
        for segment in &segments[..segments.len() - 1] {
            let position = match current.iter().position(|(n, _)| n == segment) {
                Some(i) => i,
                None => {
                    current.push((segment.to_string(), Patch::Record(Vec::new())));
                    current.len() - 1
                }
            };
            match &mut current[position].1 {
                Patch::Record(sub) => current = sub,
                Patch::Leaf(_) => {
                    // A path descends through another override's leaf.
                    return Err(ConfigError::UnknownOverridePath {
                        path: dotted.clone(),
                    });
                }
            }
        }
        let leaf = segments[segments.len() - 1];
        match current.iter_mut().find(|(n, _)| n == leaf) {
            Some(slot) => slot.1 = Patch::Leaf(value.clone()),
            None => current.push((leaf.to_string(), Patch::Leaf(value.clone()))),
        }
    }
    Ok(root)
}

fn apply(tree: &Value, patch: &[(String, Patch)], prefix: &str) -> Result<Value, ConfigError> {
    let Value::Record(fields) = tree else {
        return Err(ConfigError::UnknownOverridePath {
            path: prefix.to_string(),
        });
    };

    for (name, _) in patch {
        if !fields.iter().any(|(n, _)| n == name) {
            return Err(ConfigError::UnknownOverridePath {
                path: join(prefix, name),
            });
        }
    }

    let mut out = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let merged = match patch.iter().find(|(n, _)| n == name) {
            None => value.clone(),
            Some((_, Patch::Leaf(replacement))) => replacement.clone(),
            Some((_, Patch::Record(sub))) => {
                let dotted = join(prefix, name);
                if value.is_record() {
                    apply(value, sub, &dotted)?
                } else {
                    let deeper = sub.first().map(|(n, _)| join(&dotted, n));
                    return Err(ConfigError::UnknownOverridePath {
                        path: deeper.unwrap_or(dotted),
                    });
                }
            }
        };
        out.push((name.clone(), merged));
    }
    Ok(Value::Record(out))
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
