//! Parsed result record, keyed by destination name.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single parsed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Path(PathBuf),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Result of one parse: destination name to value, in declaration order.
///
/// Destinations without a value (not supplied and no default) are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: Vec<(String, Value)>,
}

impl ParsedArgs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, dest: &str, value: Value) {
        match self.values.iter_mut().find(|(name, _)| name == dest) {
            Some(slot) => slot.1 = value,
            None => self.values.push((dest.to_string(), value)),
        }
    }

    pub(crate) fn get_mut(&mut self, dest: &str) -> Option<&mut Value> {
        self.values
            .iter_mut()
            .find(|(name, _)| name == dest)
            .map(|(_, value)| value)
    }

    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == dest)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.get(dest).is_some()
    }

    pub fn get_text(&self, dest: &str) -> Option<&str> {
        self.get(dest).and_then(Value::as_str)
    }

    pub fn get_path(&self, dest: &str) -> Option<&Path> {
        self.get(dest).and_then(Value::as_path)
    }

    /// All paths of a list-valued path destination.
    pub fn get_paths(&self, dest: &str) -> Option<Vec<&Path>> {
        self.get(dest)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_path).collect())
    }

    pub fn get_integer(&self, dest: &str) -> Option<i64> {
        match self.get(dest) {
            Some(Value::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get_float(&self, dest: &str) -> Option<f64> {
        match self.get(dest) {
            Some(Value::Float(n)) => Some(*n),
            _ => None,
        }
    }

    /// Flag state; an absent flag reads as `false`.
    pub fn get_flag(&self, dest: &str) -> bool {
        matches!(self.get(dest), Some(Value::Bool(true)))
    }

    pub fn get_list(&self, dest: &str) -> Option<&[Value]> {
        self.get(dest).and_then(Value::as_list)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for ParsedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}

impl Serialize for ParsedArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
