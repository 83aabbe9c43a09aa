pub mod argfile;
pub mod loader;

use std::collections::HashMap;

/// Destination of the `--config` argument registered by `allow_config`.
pub const CONFIG_DEST: &str = "config";

/// Construction-time options of an [`ArgParser`](crate::ArgParser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Register `--config <path>` and read argument values from that YAML file.
    pub allow_config: bool,
    /// Resolve relative path arguments against the config file's directory
    /// instead of the working directory when a config file was given.
    pub config_path_base: bool,
    /// Tokens starting with this character name argument files.
    pub from_file_prefix: Option<char>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_config: false,
            config_path_base: true,
            from_file_prefix: Some('@'),
        }
    }
}

/// A value read from the config file for one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Values(Vec<String>),
    Flag(bool),
    /// Selected option of a multi-flag switch.
    Choice(String),
}

/// Config file values keyed by destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    values: HashMap<String, ConfigValue>,
}

impl ConfigOverrides {
    pub fn get(&self, dest: &str) -> Option<&ConfigValue> {
        self.values.get(dest)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    pub fn choice(&self, dest: &str) -> Option<&str> {
        match self.values.get(dest) {
            Some(ConfigValue::Choice(name)) => Some(name),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, dest: &str, value: ConfigValue) -> Option<ConfigValue> {
        self.values.insert(dest.to_string(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_options_defaults() {
        let options = ParserOptions::default();
        assert!(!options.allow_config);
        assert!(options.config_path_base);
        assert_eq!(options.from_file_prefix, Some('@'));
    }

    #[test]
    fn test_choice_only_reads_switch_values() {
        let mut overrides = ConfigOverrides::default();
        overrides.insert("bar", ConfigValue::Choice("this".to_string()));
        overrides.insert("foo", ConfigValue::Values(vec!["a.txt".to_string()]));
        assert_eq!(overrides.choice("bar"), Some("this"));
        assert_eq!(overrides.choice("foo"), None);
        assert!(overrides.contains("foo"));
        assert_eq!(overrides.len(), 2);
    }
}
