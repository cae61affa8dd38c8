use indexmap::IndexMap;

use crate::catalog::EQUIPMENT_DEFINITIONS_KEY;
use crate::error::ProfileError;
use crate::value::Value;

/// Canonical key sequences. Keys listed here come first, in this order; any
/// other keys follow in their original relative order. Reordering is the only
/// permitted change — values are never touched.
pub const EQUIPMENT_KEY_ORDER: &[&str] = &[
    "id",
    "name",
    "version",
    "schema_version",
    "allow_parentless",
    "allow_unmatched_parents",
    "prompt_on_parent_mismatch",
    "parent_filter",
    "equipment_properties",
    "linked_sets",
];

pub const PARENT_FILTER_KEY_ORDER: &[&str] = &[
    "category",
    "family_name_pattern",
    "type_name_pattern",
    "parameter_filters",
];

pub const LINKED_SET_KEY_ORDER: &[&str] = &["id", "name", "linked_element_definitions"];

pub const LED_KEY_ORDER: &[&str] = &[
    "id",
    "is_parent_anchor",
    "is_group",
    "label",
    "category",
    "parameters",
    "tags",
    "text_notes",
    "offsets",
];

pub const OFFSET_KEY_ORDER: &[&str] = &["x_inches", "y_inches", "z_inches", "rotation_deg"];

/// Stable reinsertion: canonical keys first, extras appended in their
/// original relative order. Non-maps pass through untouched.
fn reorder_value(value: &Value, key_order: &[&str]) -> Value {
    let Some(map) = value.as_map() else {
        return value.clone();
    };
    let mut ordered = IndexMap::new();
    for key in key_order {
        if let Some(v) = map.get(*key) {
            ordered.insert((*key).to_string(), v.clone());
        }
    }
    for (key, v) in map {
        if !ordered.contains_key(key) {
            ordered.insert(key.clone(), v.clone());
        }
    }
    Value::Map(ordered)
}

fn reorder_seq_of(value: &Value, reorder: impl Fn(&Value) -> Value) -> Value {
    match value.as_seq() {
        Some(items) => Value::Seq(items.iter().map(reorder).collect()),
        None => value.clone(),
    }
}

pub fn reorder_offset(offset: &Value) -> Value {
    reorder_value(offset, OFFSET_KEY_ORDER)
}

pub fn reorder_led(led: &Value) -> Value {
    let mut reordered = reorder_value(led, LED_KEY_ORDER);
    if let Some(map) = reordered.as_map_mut()
        && let Some(offsets) = map.get("offsets").filter(|v| v.as_seq().is_some())
    {
        let offsets = reorder_seq_of(offsets, reorder_offset);
        map.insert("offsets".to_string(), offsets);
    }
    reordered
}

pub fn reorder_linked_set(linked_set: &Value) -> Value {
    let mut reordered = reorder_value(linked_set, LINKED_SET_KEY_ORDER);
    if let Some(map) = reordered.as_map_mut()
        && let Some(leds) = map
            .get("linked_element_definitions")
            .filter(|v| v.as_seq().is_some())
    {
        let leds = reorder_seq_of(leds, reorder_led);
        map.insert("linked_element_definitions".to_string(), leds);
    }
    reordered
}

pub fn reorder_parent_filter(parent_filter: &Value) -> Value {
    reorder_value(parent_filter, PARENT_FILTER_KEY_ORDER)
}

pub fn reorder_equipment_definition(def: &Value) -> Value {
    let mut reordered = reorder_value(def, EQUIPMENT_KEY_ORDER);
    if let Some(map) = reordered.as_map_mut() {
        if let Some(pf) = map.get("parent_filter").filter(|v| v.as_map().is_some()) {
            let pf = reorder_parent_filter(pf);
            map.insert("parent_filter".to_string(), pf);
        }
        if let Some(sets) = map.get("linked_sets").filter(|v| v.as_seq().is_some()) {
            let sets = reorder_seq_of(sets, reorder_linked_set);
            map.insert("linked_sets".to_string(), sets);
        }
    }
    reordered
}

/// Reorder every equipment definition in a catalog document.
pub fn reorder_document(doc: &Value) -> Value {
    let Some(map) = doc.as_map() else {
        return doc.clone();
    };
    let mut out = IndexMap::new();
    for (key, v) in map {
        if key == EQUIPMENT_DEFINITIONS_KEY {
            out.insert(key.clone(), reorder_seq_of(v, reorder_equipment_definition));
        } else {
            out.insert(key.clone(), v.clone());
        }
    }
    Value::Map(out)
}

/// Confirm that a reorder pass changed nothing but key order: order-independent
/// content equality plus a recursive key-count match. A failure here must
/// abort the pass before anything is written.
pub fn validate_data_integrity(original: &Value, reordered: &Value) -> Result<(), ProfileError> {
    if original.to_sorted_json_string() != reordered.to_sorted_json_string() {
        return Err(ProfileError::Integrity {
            message: "document content changed during reordering".to_string(),
        });
    }
    let original_count = original.count_keys();
    let reordered_count = reordered.count_keys();
    if original_count != reordered_count {
        return Err(ProfileError::Integrity {
            message: format!("key count mismatch: {original_count} -> {reordered_count}"),
        });
    }
    Ok(())
}
