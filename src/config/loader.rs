use super::{ConfigOverrides, ConfigValue, CONFIG_DEST};
use crate::declare::argument::{Cardinality, ValueKind};
use crate::declare::registry::{ConfigTarget, Registry};
use crate::error::{Result, YaapError};
use serde_yaml::Value as YamlValue;
use std::path::Path;

/// Load a YAML config file into per-destination values.
pub(crate) fn load_config(path: &Path, registry: &Registry) -> Result<ConfigOverrides> {
    let content = std::fs::read_to_string(path).map_err(|source| YaapError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let overrides = parse_config(path, &content, registry)?;
    tracing::info!(
        "Loaded {} values from config file {}",
        overrides.len(),
        path.display()
    );
    Ok(overrides)
}

fn parse_config(path: &Path, content: &str, registry: &Registry) -> Result<ConfigOverrides> {
    let format_error = |reason: String| YaapError::ConfigFormat {
        path: path.to_path_buf(),
        reason,
    };

    let document: YamlValue =
        serde_yaml::from_str(content).map_err(|e| format_error(e.to_string()))?;
    let mapping = match document {
        YamlValue::Mapping(mapping) => mapping,
        YamlValue::Null => return Ok(ConfigOverrides::default()),
        _ => return Err(format_error("top level must be a mapping".to_string())),
    };

    let mut overrides = ConfigOverrides::default();
    for (key, value) in mapping {
        let key = match key {
            YamlValue::String(key) => key,
            other => return Err(format_error(format!("key {:?} is not a string", other))),
        };
        if key == CONFIG_DEST || value.is_null() {
            continue;
        }
        let target = registry
            .config_target(&key)
            .ok_or_else(|| YaapError::UnknownConfigKey {
                path: path.to_path_buf(),
                key: key.clone(),
            })?;

        match target {
            ConfigTarget::Argument(argument) => {
                let config = if argument.value_kind() == ValueKind::Flag {
                    match value {
                        YamlValue::Bool(true) => ConfigValue::Flag(true),
                        YamlValue::Bool(false) => continue,
                        _ => {
                            return Err(format_error(format!("'{}' must be true or false", key)))
                        }
                    }
                } else {
                    let values = scalars(&value).ok_or_else(|| {
                        format_error(format!("'{}' must be a scalar or a list", key))
                    })?;
                    if argument.value_cardinality() == Cardinality::Single && values.len() != 1 {
                        return Err(format_error(format!("'{}' takes a single value", key)));
                    }
                    ConfigValue::Values(values)
                };
                tracing::debug!("Config sets '{}' to {:?}", argument.dest(), config);
                overrides.insert(argument.dest(), config);
            }
            ConfigTarget::Switch { dest, flags } => {
                let selected = scalar(&value).unwrap_or_default();
                if !flags.iter().any(|flag| flag.name == selected) {
                    return Err(format_error(format!(
                        "'{}' is not an option of '{}'",
                        selected, dest
                    )));
                }
                tracing::debug!("Config selects '{}' for '{}'", selected, dest);
                select(&mut overrides, dest, ConfigValue::Choice(selected))
                    .map_err(format_error)?;
            }
            ConfigTarget::SwitchOption { dest, name } => match value {
                YamlValue::Bool(true) => {
                    tracing::debug!("Config selects '{}' for '{}'", name, dest);
                    select(&mut overrides, dest, ConfigValue::Choice(name.to_string()))
                        .map_err(format_error)?;
                }
                YamlValue::Bool(false) => {}
                _ => return Err(format_error(format!("'{}' must be true or false", key))),
            },
        }
    }
    Ok(overrides)
}

/// Record a switch selection; two different selections conflict.
fn select(
    overrides: &mut ConfigOverrides,
    dest: &str,
    choice: ConfigValue,
) -> std::result::Result<(), String> {
    if let Some(previous) = overrides.get(dest) {
        if *previous != choice {
            return Err(format!("'{}' is selected more than once", dest));
        }
    }
    overrides.insert(dest, choice);
    Ok(())
}

fn scalar(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalars(value: &YamlValue) -> Option<Vec<String>> {
    match value {
        YamlValue::Sequence(items) => items.iter().map(scalar).collect(),
        other => scalar(other).map(|s| vec![s]),
    }
}
