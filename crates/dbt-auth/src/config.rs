use dbt_common::{ErrorCode, FsResult, fs_err};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered view over the keys of a profile output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterConfig {
    entries: IndexMap<String, Value>,
}

impl AdapterConfig {
    pub fn new(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }

    /// Parses a single profile output given as YAML.
    pub fn from_yaml_str(yaml: &str) -> FsResult<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> FsResult<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            Value::Null => Ok(Self::default()),
            other => Err(fs_err!(
                ErrorCode::InvalidConfig,
                "Expected a mapping of profile keys, got: {other}"
            )),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|v| !v.is_null())
    }

    /// Returns the value as a string; numbers and booleans are stringified.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn require_string(&self, key: &str) -> FsResult<String> {
        self.get_string(key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                fs_err!(
                    ErrorCode::InvalidConfig,
                    "Required profile key '{key}' is missing or empty"
                )
            })
    }

    pub fn get_bool(&self, key: &str) -> FsResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(true)),
                "false" | "no" | "0" => Ok(Some(false)),
                _ => Err(fs_err!(
                    ErrorCode::InvalidConfig,
                    "Profile key '{key}' must be a boolean, got '{s}'"
                )),
            },
            Some(other) => Err(fs_err!(
                ErrorCode::InvalidConfig,
                "Profile key '{key}' must be a boolean, got {other}"
            )),
        }
    }

    pub fn get_u64(&self, key: &str) -> FsResult<Option<u64>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
                .map(Some)
                .ok_or_else(|| {
                    fs_err!(
                        ErrorCode::InvalidConfig,
                        "Profile key '{key}' must be a non-negative integer, got {value}"
                    )
                }),
        }
    }
}
