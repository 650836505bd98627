//! Ordered configuration section with typed getters.

use std::fs;
use std::path::Path;

use toml::{Table, Value};

use crate::ConfigError;

/// Join a diagnostic directory with a child key (`parent/key`).
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}/{key}")
    }
}

/// Classified view of a single value inside a section.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Integer or float, widened to `f64`.
    Number(f64),
    /// Nested section.
    Section(ConfigSection),
    /// Array made only of numbers.
    List(Vec<f64>),
    /// Anything else; carries the TOML type name for diagnostics.
    Other(&'static str),
}

impl Entry {
    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Section(_) => "section",
            Self::List(_) => "list",
            Self::Other(name) => name,
        }
    }
}

/// A nested key/value mapping. Key order follows the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSection {
    table: Table,
}

impl ConfigSection {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing TOML table.
    pub fn from_table(table: Table) -> Self {
        Self { table }
    }

    /// Parse a TOML document.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_table(input.parse::<Table>()?))
    }

    /// Read and parse a TOML document from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Render as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.table)?)
    }

    /// Write the section to disk as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    /// Borrow the underlying table.
    pub fn as_table(&self) -> &Table {
        &self.table
    }

    /// Shallow keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.keys().map(String::as_str)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Number of shallow keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the section has no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Classify the value stored under `key`.
    pub fn entry(&self, key: &str) -> Option<Entry> {
        self.table.get(key).map(classify)
    }

    /// Numeric value under `key`, if it is a number.
    pub fn double(&self, key: &str) -> Option<f64> {
        self.table.get(key).and_then(as_number)
    }

    /// Numeric value under `key`, or `default` when absent or not a number.
    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.double(key).unwrap_or(default)
    }

    /// String value under `key`.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.table.get(key).and_then(Value::as_str)
    }

    /// Copy of the nested section under `key`.
    pub fn subsection(&self, key: &str) -> Option<ConfigSection> {
        match self.table.get(key) {
            Some(Value::Table(table)) => Some(Self::from_table(table.clone())),
            _ => None,
        }
    }

    /// Store a number.
    pub fn set_double(&mut self, key: &str, value: f64) {
        self.table.insert(key.to_string(), Value::Float(value));
    }

    /// Store a string.
    pub fn set_string(&mut self, key: &str, value: &str) {
        self.table
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Store a nested section.
    pub fn set_section(&mut self, key: &str, section: ConfigSection) {
        self.table.insert(key.to_string(), Value::Table(section.table));
    }

    /// Store an array of numbers.
    pub fn set_list(&mut self, key: &str, values: &[f64]) {
        let values = values.iter().copied().map(Value::Float).collect();
        self.table.insert(key.to_string(), Value::Array(values));
    }

    /// Remove `key`, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.table.remove(key).is_some()
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

fn classify(value: &Value) -> Entry {
    match value {
        Value::Integer(v) => Entry::Number(*v as f64),
        Value::Float(v) => Entry::Number(*v),
        Value::Table(table) => Entry::Section(ConfigSection::from_table(table.clone())),
        Value::Array(items) => items
            .iter()
            .map(as_number)
            .collect::<Option<Vec<f64>>>()
            .map(Entry::List)
            .unwrap_or(Entry::Other("array")),
        other => Entry::Other(other.type_str()),
    }
}
