use crate::config::ConfigValue;
use crate::error::{Result, YaapError};
use crate::parsed::Value;
use clap::builder::{OsStringValueParser, PossibleValuesParser, TypedValueParser, ValueParser};
use clap::{Arg, ArgAction, ArgMatches};
use std::path::PathBuf;

/// How a declared argument's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Text,
    /// Filesystem path, resolved to an absolute path after parsing.
    Path,
    Integer,
    Float,
    /// Boolean switch taking no value.
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    #[default]
    Single,
    /// One or more values, collected into a list.
    Many,
}

/// Declaration of a single argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    dest: String,
    long: Option<String>,
    short: Option<char>,
    kind: ValueKind,
    cardinality: Cardinality,
    defaults: Vec<String>,
    required: bool,
    choices: Option<Vec<String>>,
    help: Option<String>,
}

impl Argument {
    /// Option argument `--<dest>`; underscores in `dest` become hyphens.
    pub fn option(dest: impl Into<String>) -> Self {
        let dest = dest.into();
        let long = dest.replace('_', "-");
        Self::bare(dest, Some(long))
    }

    pub fn positional(dest: impl Into<String>) -> Self {
        Self::bare(dest.into(), None)
    }

    /// Boolean flag `--<dest>`.
    pub fn flag(dest: impl Into<String>) -> Self {
        Self::option(dest).kind(ValueKind::Flag)
    }

    fn bare(dest: String, long: Option<String>) -> Self {
        Self {
            dest,
            long,
            short: None,
            kind: ValueKind::Text,
            cardinality: Cardinality::Single,
            defaults: Vec::new(),
            required: false,
            choices: None,
            help: None,
        }
    }

    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for `kind(ValueKind::Path)`.
    pub fn path(self) -> Self {
        self.kind(ValueKind::Path)
    }

    pub fn cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Shorthand for `cardinality(Cardinality::Many)`.
    pub fn many(self) -> Self {
        self.cardinality(Cardinality::Many)
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.defaults = vec![value.into()];
        self
    }

    pub fn default_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    pub fn value_cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_positional(&self) -> bool {
        self.long.is_none() && self.short.is_none()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// How the argument is named in usage and error messages.
    pub(crate) fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{}", long),
            (None, Some(short)) => format!("-{}", short),
            (None, None) => format!("<{}>", self.dest),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.dest.is_empty() || self.dest.chars().any(char::is_whitespace) {
            return Err(YaapError::configuration(format!(
                "invalid destination name '{}'",
                self.dest
            )));
        }
        if let Some(long) = &self.long {
            if long.is_empty() || long.starts_with('-') {
                return Err(YaapError::configuration(format!(
                    "invalid long flag '{}' for '{}'",
                    long, self.dest
                )));
            }
        }
        if self.kind == ValueKind::Flag {
            if self.is_positional() {
                return Err(YaapError::configuration(format!(
                    "flag '{}' cannot be positional",
                    self.dest
                )));
            }
            if self.cardinality == Cardinality::Many
                || self.choices.is_some()
                || !self.defaults.is_empty()
            {
                return Err(YaapError::configuration(format!(
                    "flag '{}' takes no values, choices or defaults",
                    self.dest
                )));
            }
        }
        if self.required && !self.defaults.is_empty() {
            return Err(YaapError::configuration(format!(
                "required argument '{}' cannot have a default",
                self.dest
            )));
        }
        if self.cardinality == Cardinality::Single && self.defaults.len() > 1 {
            return Err(YaapError::configuration(format!(
                "single-valued argument '{}' has {} defaults",
                self.dest,
                self.defaults.len()
            )));
        }
        Ok(())
    }

    fn value_parser(&self) -> ValueParser {
        match (self.kind, self.choices.clone()) {
            // Accepts the empty string, which resolution leaves alone.
            (ValueKind::Path, None) => {
                ValueParser::new(OsStringValueParser::new().map(PathBuf::from))
            }
            (ValueKind::Path, Some(choices)) => {
                ValueParser::new(PossibleValuesParser::new(choices).map(PathBuf::from))
            }
            (ValueKind::Integer, None) => ValueParser::new(|s: &str| s.parse::<i64>()),
            (ValueKind::Integer, Some(choices)) => {
                ValueParser::new(PossibleValuesParser::new(choices).try_map(|s| s.parse::<i64>()))
            }
            (ValueKind::Float, None) => ValueParser::new(|s: &str| s.parse::<f64>()),
            (ValueKind::Float, Some(choices)) => {
                ValueParser::new(PossibleValuesParser::new(choices).try_map(|s| s.parse::<f64>()))
            }
            (_, Some(choices)) => ValueParser::new(PossibleValuesParser::new(choices)),
            (_, None) => ValueParser::string(),
        }
    }

    /// Build the clap argument, with config file values taking the place of defaults.
    pub(crate) fn to_clap(&self, heading: Option<&str>, config: Option<&ConfigValue>) -> Arg {
        let mut arg = Arg::new(self.dest.clone());
        if let Some(long) = &self.long {
            arg = arg.long(long.clone());
        }
        if let Some(short) = self.short {
            arg = arg.short(short);
        }

        if self.kind == ValueKind::Flag {
            arg = arg.action(ArgAction::SetTrue);
            if let Some(ConfigValue::Flag(true)) = config {
                arg = arg.default_value("true");
            }
        } else {
            arg = arg.value_parser(self.value_parser());
            arg = match self.cardinality {
                Cardinality::Single => arg.action(ArgAction::Set).num_args(1),
                Cardinality::Many => arg.action(ArgAction::Append).num_args(1..),
            };
            let defaults = match config {
                Some(ConfigValue::Values(values)) => values.as_slice(),
                _ => self.defaults.as_slice(),
            };
            if !defaults.is_empty() {
                arg = arg.default_values(defaults.to_vec());
            }
        }

        arg = arg.required(self.required && config.is_none());
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        if let Some(heading) = heading {
            arg = arg.help_heading(heading.to_string());
        }
        arg
    }

    /// Read this argument's value out of clap's matches.
    pub(crate) fn extract(&self, matches: &ArgMatches) -> Option<Value> {
        let id = self.dest.as_str();
        let values: Vec<Value> = match self.kind {
            ValueKind::Flag => return Some(Value::Bool(matches.get_flag(id))),
            ValueKind::Text => matches
                .get_many::<String>(id)?
                .map(|s| Value::Text(s.clone()))
                .collect(),
            ValueKind::Path => matches
                .get_many::<PathBuf>(id)?
                .map(|p| Value::Path(p.clone()))
                .collect(),
            ValueKind::Integer => matches
                .get_many::<i64>(id)?
                .map(|n| Value::Integer(*n))
                .collect(),
            ValueKind::Float => matches
                .get_many::<f64>(id)?
                .map(|n| Value::Float(*n))
                .collect(),
        };
        match self.cardinality {
            Cardinality::Single => values.into_iter().last(),
            Cardinality::Many => Some(Value::List(values)),
        }
    }
}
