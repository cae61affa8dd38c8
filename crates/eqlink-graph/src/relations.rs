use indexmap::IndexMap;
use thiserror::Error;

use eqlink_core::Offset;
use eqlink_profile::Value;

/// The fixed key equipment definitions carry their relation block under.
pub const RELATIONS_KEY: &str = "linked_relations";

#[derive(Debug, Error)]
pub enum RelationError {
    #[error("equipment definition must be a mapping")]
    NotARecord,
}

/// Guarantee the `linked_relations` block and its `parent`/`children`
/// sub-structures exist with the right shapes, and backfill the anchor keys
/// on child entries written before anchors existed.
pub fn ensure_relations(def: &mut Value) -> Result<(), RelationError> {
    let Some(map) = def.as_map_mut() else {
        return Err(RelationError::NotARecord);
    };
    let relations = map
        .entry(RELATIONS_KEY.to_string())
        .or_insert_with(Value::empty_map);
    if relations.as_map().is_none() {
        *relations = Value::empty_map();
    }
    let relations = relations.as_map_mut().expect("ensured above");

    let parent = relations
        .entry("parent".to_string())
        .or_insert_with(Value::empty_map);
    if parent.as_map().is_none() {
        *parent = Value::empty_map();
    }

    let children = relations
        .entry("children".to_string())
        .or_insert_with(|| Value::Seq(Vec::new()));
    if children.as_seq().is_none() {
        *children = Value::Seq(Vec::new());
    }
    for entry in children.as_seq_mut().expect("ensured above") {
        if let Some(child) = entry.as_map_mut() {
            child
                .entry("anchor_offsets".to_string())
                .or_insert_with(Value::empty_map);
            child.entry("anchor_led_id".to_string()).or_insert(Value::Null);
        }
    }
    Ok(())
}

fn relations_mut(def: &mut Value) -> Result<&mut IndexMap<String, Value>, RelationError> {
    ensure_relations(def)?;
    Ok(def
        .as_map_mut()
        .and_then(|m| m.get_mut(RELATIONS_KEY))
        .and_then(Value::as_map_mut)
        .expect("ensure_relations guarantees the block"))
}

fn children_mut(def: &mut Value) -> Result<&mut Vec<Value>, RelationError> {
    Ok(relations_mut(def)?
        .get_mut("children")
        .and_then(Value::as_seq_mut)
        .expect("ensure_relations guarantees the children sequence"))
}

/// The child entry list; empty for records without relations.
#[must_use]
pub fn children(def: &Value) -> &[Value] {
    def.get(RELATIONS_KEY)
        .and_then(|r| r.get("children"))
        .and_then(Value::as_seq)
        .unwrap_or(&[])
}

#[must_use]
pub fn get_parent_id(def: &Value) -> Option<String> {
    let id = def
        .get(RELATIONS_KEY)?
        .get("parent")?
        .get("equipment_id")?
        .as_str()?
        .trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Set (or, with an empty/`None` id, clear) the parent relation. The stored
/// record is always fully populated or exactly `{}`.
pub fn set_parent(
    def: &mut Value,
    equipment_id: Option<&str>,
    offsets: &Offset,
    parent_led_id: Option<&str>,
) -> Result<(), RelationError> {
    let relations = relations_mut(def)?;
    let parent = match equipment_id.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => {
            let mut entry = IndexMap::new();
            entry.insert("equipment_id".to_string(), Value::String(id.to_string()));
            entry.insert("offsets".to_string(), offset_to_value(offsets));
            if let Some(led) = parent_led_id.map(str::trim).filter(|s| !s.is_empty()) {
                entry.insert("parent_led_id".to_string(), Value::String(led.to_string()));
            }
            Value::Map(entry)
        }
        None => Value::empty_map(),
    };
    relations.insert("parent".to_string(), parent);
    Ok(())
}

/// Update the child entry keyed by `equipment_id` in place (keeping its list
/// position), or append a new one. Anchor fields are only overwritten when
/// supplied.
pub fn upsert_child(
    def: &mut Value,
    equipment_id: &str,
    offsets: &Offset,
    anchor_offsets: Option<&Offset>,
    anchor_led_id: Option<&str>,
) -> Result<(), RelationError> {
    let anchor_led = anchor_led_id.map(str::trim).filter(|s| !s.is_empty());
    let children = children_mut(def)?;
    for entry in children.iter_mut() {
        let Some(child) = entry.as_map_mut() else {
            continue;
        };
        if child.get("equipment_id").and_then(Value::as_str) != Some(equipment_id) {
            continue;
        }
        child.insert("offsets".to_string(), offset_to_value(offsets));
        if let Some(anchor) = anchor_offsets {
            child.insert("anchor_offsets".to_string(), offset_to_value(anchor));
        }
        if let Some(led) = anchor_led {
            child.insert("anchor_led_id".to_string(), Value::String(led.to_string()));
        }
        return Ok(());
    }

    let mut entry = IndexMap::new();
    entry.insert(
        "equipment_id".to_string(),
        Value::String(equipment_id.to_string()),
    );
    entry.insert("offsets".to_string(), offset_to_value(offsets));
    entry.insert(
        "anchor_offsets".to_string(),
        anchor_offsets.map(offset_to_value).unwrap_or_else(Value::empty_map),
    );
    entry.insert(
        "anchor_led_id".to_string(),
        anchor_led
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null),
    );
    children.push(Value::Map(entry));
    Ok(())
}

/// Remove every child entry keyed by `equipment_id`; no error when none match.
pub fn remove_child(def: &mut Value, equipment_id: &str) -> Result<(), RelationError> {
    let children = children_mut(def)?;
    children.retain(|entry| entry.get("equipment_id").and_then(Value::as_str) != Some(equipment_id));
    Ok(())
}

/// Store an offset as a relation-block mapping. Always a fresh copy; the
/// caller's offset is never aliased.
#[must_use]
pub fn offset_to_value(offset: &Offset) -> Value {
    let mut map = IndexMap::new();
    map.insert("x_inches".to_string(), Value::Number(offset.x_inches));
    map.insert("y_inches".to_string(), Value::Number(offset.y_inches));
    map.insert("z_inches".to_string(), Value::Number(offset.z_inches));
    map.insert("rotation_deg".to_string(), Value::Number(offset.rotation_deg));
    Value::Map(map)
}

/// Read an offset out of a relation block. Missing mappings and
/// missing/non-numeric components default to zero.
#[must_use]
pub fn offset_from_value(value: Option<&Value>) -> Offset {
    let Some(map) = value.and_then(Value::as_map) else {
        return Offset::default();
    };
    let component = |key: &str| map.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    Offset::new(
        component("x_inches"),
        component("y_inches"),
        component("z_inches"),
        component("rotation_deg"),
    )
}
