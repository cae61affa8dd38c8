use std::collections::HashSet;

use eqlink_profile::Value;

use crate::MergeError;

/// Assign sequential identifiers in final catalog order: `EQ-{n:03}` for the
/// record, `SET-{n:03}` (the owner's `n`) for each of its linked-sets, and
/// `<set_id>-LED-{k:03}` for the non-anchor elements of each set, `k`
/// restarting at 1 per set. Anchor-flagged elements keep their existing ids.
pub fn renumber_ids(defs: &mut [Value]) {
    for (idx, def) in defs.iter_mut().enumerate() {
        let n = idx + 1;
        let Some(map) = def.as_map_mut() else {
            continue;
        };
        map.insert("id".to_string(), Value::String(format!("EQ-{n:03}")));

        let Some(sets) = map.get_mut("linked_sets").and_then(Value::as_seq_mut) else {
            continue;
        };
        for set in sets {
            let Some(set_map) = set.as_map_mut() else {
                continue;
            };
            let set_id = format!("SET-{n:03}");
            set_map.insert("id".to_string(), Value::String(set_id.clone()));

            let Some(leds) = set_map
                .get_mut("linked_element_definitions")
                .and_then(Value::as_seq_mut)
            else {
                continue;
            };
            let mut led_counter = 1;
            for led in leds {
                let Some(led_map) = led.as_map_mut() else {
                    continue;
                };
                let is_anchor = led_map
                    .get("is_parent_anchor")
                    .is_some_and(Value::is_truthy);
                if is_anchor {
                    continue;
                }
                led_map.insert(
                    "id".to_string(),
                    Value::String(format!("{set_id}-LED-{led_counter:03}")),
                );
                led_counter += 1;
            }
        }
    }
}

/// Duplicate surviving ids mean the pass produced an unusable catalog; the
/// output must not be written.
pub fn verify_unique_ids(defs: &[Value]) -> Result<(), MergeError> {
    let mut seen = HashSet::new();
    for def in defs {
        if let Some(id) = def.get("id").and_then(Value::as_str)
            && !seen.insert(id.to_string())
        {
            return Err(MergeError::DuplicateId { id: id.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(j: serde_json::Value) -> Vec<Value> {
        Value::try_from_json_str(&j.to_string())
            .unwrap()
            .as_seq()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn ids_follow_final_order_and_sets_share_the_owner_number() {
        let mut records = defs(serde_json::json!([
            {"id": "OLD-9", "name": "A", "linked_sets": [
                {"id": "OLD-SET", "name": "A Types", "linked_element_definitions": [
                    {"id": "keep-me", "is_parent_anchor": true},
                    {"id": "OLD-LED-1"},
                    {"id": "OLD-LED-2"}
                ]}
            ]},
            {"id": "OLD-3", "name": "B"}
        ]));

        renumber_ids(&mut records);

        assert_eq!(records[0].get("id").and_then(Value::as_str), Some("EQ-001"));
        assert_eq!(records[1].get("id").and_then(Value::as_str), Some("EQ-002"));

        let set = &records[0].get("linked_sets").and_then(Value::as_seq).unwrap()[0];
        assert_eq!(set.get("id").and_then(Value::as_str), Some("SET-001"));

        let leds = set
            .get("linked_element_definitions")
            .and_then(Value::as_seq)
            .unwrap();
        assert_eq!(leds[0].get("id").and_then(Value::as_str), Some("keep-me"));
        assert_eq!(
            leds[1].get("id").and_then(Value::as_str),
            Some("SET-001-LED-001")
        );
        assert_eq!(
            leds[2].get("id").and_then(Value::as_str),
            Some("SET-001-LED-002")
        );
    }

    #[test]
    fn renumbering_its_own_output_is_a_no_op() {
        let mut records = defs(serde_json::json!([
            {"id": "X", "name": "A", "linked_sets": [
                {"id": "Y", "name": "T", "linked_element_definitions": [{"id": "Z"}]}
            ]},
            {"id": "W", "name": "B"}
        ]));
        renumber_ids(&mut records);
        let first_pass = records.clone();
        renumber_ids(&mut records);
        assert_eq!(records, first_pass);
    }

    #[test]
    fn duplicate_ids_fail_verification() {
        let records = defs(serde_json::json!([
            {"id": "EQ-001", "name": "A"},
            {"id": "EQ-001", "name": "B"}
        ]));
        assert!(verify_unique_ids(&records).is_err());

        let records = defs(serde_json::json!([
            {"id": "EQ-001", "name": "A"},
            {"id": "EQ-002", "name": "B"}
        ]));
        assert!(verify_unique_ids(&records).is_ok());
    }
}
