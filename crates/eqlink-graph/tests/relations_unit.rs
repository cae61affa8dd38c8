use eqlink_core::Offset;
use eqlink_graph::relations::{
    RELATIONS_KEY, children, ensure_relations, get_parent_id, offset_from_value, remove_child,
    set_parent, upsert_child,
};
use eqlink_profile::Value;

fn v(j: serde_json::Value) -> Value {
    Value::try_from_json_str(&j.to_string()).unwrap()
}

#[test]
fn ensure_relations_rejects_non_records() {
    let mut not_a_record = Value::String("oops".to_string());
    assert!(ensure_relations(&mut not_a_record).is_err());
}

#[test]
fn ensure_relations_backfills_anchor_keys_on_legacy_entries() {
    let mut def = v(serde_json::json!({
        "id": "EQ-001",
        "linked_relations": {
            "children": [
                {"equipment_id": "EQ-002", "offsets": {"x_inches": 1.0}}
            ]
        }
    }));
    ensure_relations(&mut def).unwrap();

    let relations = def.get(RELATIONS_KEY).unwrap();
    assert!(relations.get("parent").unwrap().as_map().unwrap().is_empty());
    let entry = &children(&def)[0];
    assert!(entry.get("anchor_offsets").unwrap().as_map().unwrap().is_empty());
    assert_eq!(entry.get("anchor_led_id"), Some(&Value::Null));
}

#[test]
fn set_parent_populates_and_clears_completely() {
    let mut def = v(serde_json::json!({"id": "EQ-002"}));
    let offsets = Offset::new(3.0, 4.0, 0.0, 45.0);
    set_parent(&mut def, Some("EQ-001"), &offsets, Some("SET-001-LED-002")).unwrap();

    assert_eq!(get_parent_id(&def).as_deref(), Some("EQ-001"));
    let parent = def.get(RELATIONS_KEY).unwrap().get("parent").unwrap();
    assert_eq!(
        parent.get("parent_led_id").and_then(Value::as_str),
        Some("SET-001-LED-002")
    );
    assert_eq!(offset_from_value(parent.get("offsets")), offsets);

    // An empty id clears the whole record, never leaves it half-populated.
    set_parent(&mut def, Some("   "), &offsets, None).unwrap();
    assert_eq!(get_parent_id(&def), None);
    let parent = def.get(RELATIONS_KEY).unwrap().get("parent").unwrap();
    assert!(parent.as_map().unwrap().is_empty());
}

#[test]
fn upsert_child_replaces_in_place_keeping_position() {
    let mut def = v(serde_json::json!({"id": "EQ-001"}));
    for id in ["EQ-010", "EQ-020", "EQ-030"] {
        upsert_child(&mut def, id, &Offset::default(), None, None).unwrap();
    }

    let updated = Offset::new(7.0, -2.0, 0.0, 180.0);
    upsert_child(&mut def, "EQ-020", &updated, None, Some("A1")).unwrap();

    let entries = children(&def);
    assert_eq!(entries.len(), 3);
    let ids: Vec<&str> = entries
        .iter()
        .map(|e| e.get("equipment_id").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(ids, vec!["EQ-010", "EQ-020", "EQ-030"]);
    assert_eq!(offset_from_value(entries[1].get("offsets")), updated);
    assert_eq!(
        entries[1].get("anchor_led_id").and_then(Value::as_str),
        Some("A1")
    );
}

#[test]
fn upsert_without_anchor_fields_leaves_them_untouched() {
    let mut def = v(serde_json::json!({"id": "EQ-001"}));
    let anchor = Offset::new(1.0, 1.0, 0.0, 0.0);
    upsert_child(&mut def, "EQ-010", &Offset::default(), Some(&anchor), Some("A1")).unwrap();

    upsert_child(&mut def, "EQ-010", &Offset::new(2.0, 0.0, 0.0, 0.0), None, None).unwrap();

    let entry = &children(&def)[0];
    assert_eq!(offset_from_value(entry.get("anchor_offsets")), anchor);
    assert_eq!(entry.get("anchor_led_id").and_then(Value::as_str), Some("A1"));
}

#[test]
fn attached_offsets_are_copies_not_aliases() {
    let mut def = v(serde_json::json!({"id": "EQ-001"}));
    let mut offsets = Offset::new(1.0, 2.0, 3.0, 4.0);
    upsert_child(&mut def, "EQ-010", &offsets, None, None).unwrap();

    offsets.x_inches = 99.0;

    let stored = offset_from_value(children(&def)[0].get("offsets"));
    assert_eq!(stored.x_inches, 1.0);
}

#[test]
fn remove_child_drops_all_matches_and_tolerates_misses() {
    let mut def = v(serde_json::json!({"id": "EQ-001"}));
    upsert_child(&mut def, "EQ-010", &Offset::default(), None, None).unwrap();
    upsert_child(&mut def, "EQ-020", &Offset::default(), None, None).unwrap();

    remove_child(&mut def, "EQ-010").unwrap();
    remove_child(&mut def, "EQ-404").unwrap();

    let ids: Vec<&str> = children(&def)
        .iter()
        .map(|e| e.get("equipment_id").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(ids, vec!["EQ-020"]);
}

#[test]
fn offset_from_value_defaults_bad_components_to_zero() {
    let entry = v(serde_json::json!({
        "x_inches": "12.5",
        "y_inches": "not a number",
        "rotation_deg": 90.0
    }));
    let offsets = offset_from_value(Some(&entry));
    assert_eq!(offsets.x_inches, 12.5);
    assert_eq!(offsets.y_inches, 0.0);
    assert_eq!(offsets.z_inches, 0.0);
    assert_eq!(offsets.rotation_deg, 90.0);

    assert_eq!(offset_from_value(None), Offset::default());
}
