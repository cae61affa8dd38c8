use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Order-preserving document IR. Every mapping is backed by an `IndexMap`
/// so the key order of the source document survives load/transform/save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Seq(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn empty_map() -> Self {
        Value::Map(IndexMap::new())
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_seq_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; numeric strings count, anything else does not.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Seq(s) => !s.is_empty(),
            Value::Map(m) => !m.is_empty(),
        }
    }

    /// Map member lookup; `None` for non-maps.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProfileError> {
        let v: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        Self::try_from_yaml_value(&v)
    }

    fn try_from_yaml_value(v: &serde_yaml::Value) -> Result<Self, ProfileError> {
        Ok(match v {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(*b),
            serde_yaml::Value::Number(n) => Value::Number(
                n.as_f64()
                    .or_else(|| n.as_i64().map(|i| i as f64))
                    .or_else(|| n.as_u64().map(|u| u as f64))
                    .ok_or(ProfileError::YamlNumber)?,
            ),
            serde_yaml::Value::String(s) => Value::String(s.clone()),
            serde_yaml::Value::Sequence(seq) => Value::Seq(
                seq.iter()
                    .map(Self::try_from_yaml_value)
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Mapping(map) => {
                let mut out = IndexMap::new();
                for (k, vv) in map {
                    let serde_yaml::Value::String(key) = k else {
                        return Err(ProfileError::NonStringKey);
                    };
                    out.insert(key.clone(), Self::try_from_yaml_value(vv)?);
                }
                Value::Map(out)
            }
            _ => return Err(ProfileError::UnsupportedYamlValue),
        })
    }

    pub fn try_from_json_str(s: &str) -> Result<Self, ProfileError> {
        let v: serde_json::Value =
            serde_json::from_str(s).map_err(|e| ProfileError::Json(e.to_string()))?;
        Ok(Self::from_json_value(&v))
    }

    fn from_json_value(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(a) => {
                Value::Seq(a.iter().map(Self::from_json_value).collect())
            }
            serde_json::Value::Object(o) => {
                let mut m = IndexMap::new();
                for (k, v) in o {
                    m.insert(k.clone(), Self::from_json_value(v));
                }
                Value::Map(m)
            }
        }
    }

    /// Serialize back to YAML, mapping keys in stored (insertion) order.
    pub fn to_yaml_string(&self) -> Result<String, ProfileError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Canonical order-independent form: `serde_json`'s default object
    /// representation iterates keys sorted, so equal content serializes
    /// identically regardless of key order.
    #[must_use]
    pub fn to_sorted_json_string(&self) -> String {
        fn to_json(v: &Value) -> serde_json::Value {
            match v {
                Value::Null => serde_json::Value::Null,
                Value::Bool(b) => serde_json::Value::Bool(*b),
                Value::Number(n) => serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
                Value::String(s) => serde_json::Value::String(s.clone()),
                Value::Seq(seq) => serde_json::Value::Array(seq.iter().map(to_json).collect()),
                Value::Map(m) => serde_json::Value::Object(
                    m.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
                ),
            }
        }
        to_json(self).to_string()
    }

    /// Total number of mapping keys, recursively.
    #[must_use]
    pub fn count_keys(&self) -> usize {
        match self {
            Value::Map(m) => m.len() + m.values().map(Value::count_keys).sum::<usize>(),
            Value::Seq(s) => s.iter().map(Value::count_keys).sum(),
            _ => 0,
        }
    }
}
