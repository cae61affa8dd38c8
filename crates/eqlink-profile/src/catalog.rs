use indexmap::IndexMap;

use crate::error::ProfileError;
use crate::value::Value;

pub const EQUIPMENT_DEFINITIONS_KEY: &str = "equipment_definitions";

/// An in-memory catalog snapshot: the parsed document plus typed access to
/// its `equipment_definitions` sequence. Constructed explicitly by a loader
/// and passed to every operation; there is no ambient registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    doc: Value,
}

impl Catalog {
    /// Load from raw document text. An empty document yields an empty
    /// catalog; a non-mapping document is an error.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ProfileError> {
        let parsed = Value::from_yaml_str(raw)?;
        match parsed {
            Value::Null => Self::from_value(Value::empty_map()),
            other => Self::from_value(other),
        }
    }

    pub fn from_value(mut doc: Value) -> Result<Self, ProfileError> {
        let Some(map) = doc.as_map_mut() else {
            return Err(ProfileError::DocumentNotMap);
        };
        let defs = map
            .entry(EQUIPMENT_DEFINITIONS_KEY.to_string())
            .or_insert_with(|| Value::Seq(Vec::new()));
        if defs.as_seq().is_none() {
            *defs = Value::Seq(Vec::new());
        }
        Ok(Self { doc })
    }

    #[must_use]
    pub fn document(&self) -> &Value {
        &self.doc
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.doc
    }

    pub fn to_yaml_string(&self) -> Result<String, ProfileError> {
        self.doc.to_yaml_string()
    }

    #[must_use]
    pub fn definitions(&self) -> &[Value] {
        self.doc
            .get(EQUIPMENT_DEFINITIONS_KEY)
            .and_then(Value::as_seq)
            .unwrap_or(&[])
    }

    pub fn definitions_mut(&mut self) -> &mut Vec<Value> {
        self.doc
            .as_map_mut()
            .and_then(|m| m.get_mut(EQUIPMENT_DEFINITIONS_KEY))
            .and_then(Value::as_seq_mut)
            .expect("catalog construction guarantees the definitions sequence")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions().is_empty()
    }

    /// First definition whose `id` matches, trimmed and case-folded.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Value> {
        let target = normalize_key(id);
        if target.is_empty() {
            return None;
        }
        self.definitions().iter().find(|def| {
            def.get("id")
                .and_then(Value::as_str)
                .is_some_and(|v| normalize_key(v) == target)
        })
    }

    /// First definition whose display name matches, trimmed and case-folded.
    /// Records without a `name` fall back to their `id`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Value> {
        let target = normalize_key(name);
        if target.is_empty() {
            return None;
        }
        self.definitions()
            .iter()
            .find(|def| display_name(def).is_some_and(|v| normalize_key(&v) == target))
    }
}

/// Trim + case-fold, the comparison form for names and ids throughout.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `name` falling back to `id`; `None` when both are blank or missing.
#[must_use]
pub fn display_name(def: &Value) -> Option<String> {
    for key in ["name", "id"] {
        if let Some(s) = def.get(key).and_then(Value::as_str) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Build a single-definition catalog document around a definitions sequence.
#[must_use]
pub fn document_from_definitions(defs: Vec<Value>) -> Value {
    let mut map = IndexMap::new();
    map.insert(EQUIPMENT_DEFINITIONS_KEY.to_string(), Value::Seq(defs));
    Value::Map(map)
}
