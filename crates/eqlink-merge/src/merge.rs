use indexmap::IndexMap;

use eqlink_profile::{Value, display_name, normalize_key};

/// One merged duplicate group, for the report.
#[derive(Debug, Clone)]
pub struct MergeAction {
    pub name: String,
    pub original_count: usize,
    pub merged_led_count: usize,
}

fn group_key(def: &Value) -> String {
    display_name(def)
        .map(|name| normalize_key(&name))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Duplicate display names with their counts, largest group first (ties keep
/// encounter order).
#[must_use]
pub fn duplicate_name_counts(defs: &[Value]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, (String, usize)> = IndexMap::new();
    for def in defs {
        let key = group_key(def);
        let entry = counts.entry(key).or_insert_with(|| {
            (
                display_name(def).unwrap_or_else(|| "Unknown".to_string()),
                0,
            )
        });
        entry.1 += 1;
    }
    let mut duplicates: Vec<(String, usize)> = counts
        .into_values()
        .filter(|(_, count)| *count > 1)
        .collect();
    duplicates.sort_by(|a, b| b.1.cmp(&a.1));
    duplicates
}

/// Group records by normalized name and collapse each duplicate group into
/// one record. The first record of a group is the merge base; every group
/// member's linked elements concatenate, in encounter order, into a single
/// replacement linked-set named `"<name> Types"`. Later duplicates' other
/// fields are discarded. Groups emit sorted by normalized name.
#[must_use]
pub fn merge_definitions(defs: Vec<Value>) -> (Vec<Value>, Vec<MergeAction>) {
    let mut grouped: IndexMap<String, Vec<Value>> = IndexMap::new();
    for def in defs {
        grouped.entry(group_key(&def)).or_default().push(def);
    }
    grouped.sort_keys();

    let mut merged = Vec::with_capacity(grouped.len());
    let mut actions = Vec::new();

    for (_, mut group) in grouped {
        if group.len() == 1 {
            merged.push(group.pop().expect("group is non-empty"));
            continue;
        }

        let original_count = group.len();
        let all_leds: Vec<Value> = group.iter().flat_map(linked_elements_of).collect();
        let mut base = group.swap_remove(0);
        let name = display_name(&base).unwrap_or_else(|| "Unknown".to_string());

        let mut set = IndexMap::new();
        // Placeholder id; the renumbering pass assigns the real one.
        set.insert("id".to_string(), Value::String("SET-001".to_string()));
        set.insert("name".to_string(), Value::String(format!("{name} Types")));
        set.insert(
            "linked_element_definitions".to_string(),
            Value::Seq(all_leds.clone()),
        );
        base.as_map_mut()
            .expect("group members are mappings")
            .insert("linked_sets".to_string(), Value::Seq(vec![Value::Map(set)]));

        actions.push(MergeAction {
            name,
            original_count,
            merged_led_count: all_leds.len(),
        });
        merged.push(base);
    }

    (merged, actions)
}

fn linked_elements_of(def: &Value) -> Vec<Value> {
    let mut leds = Vec::new();
    for set in def.get("linked_sets").and_then(Value::as_seq).unwrap_or(&[]) {
        for led in set
            .get("linked_element_definitions")
            .and_then(Value::as_seq)
            .unwrap_or(&[])
        {
            leds.push(led.clone());
        }
    }
    leds
}
