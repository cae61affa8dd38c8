use approx::assert_abs_diff_eq;
use indexmap::IndexMap;

use eqlink_core::Point;
use eqlink_graph::resolver::{build_child_requests, resolve_descendants};
use eqlink_profile::{Catalog, Value};

fn catalog(j: serde_json::Value) -> Catalog {
    Catalog::from_value(Value::try_from_json_str(&j.to_string()).unwrap()).unwrap()
}

fn labels(names: &[&str]) -> IndexMap<String, Vec<String>> {
    names
        .iter()
        .map(|n| ((*n).to_string(), vec![format!("{n} : Default")]))
        .collect()
}

fn assert_point(p: Point, x: f64, y: f64, z: f64) {
    assert_abs_diff_eq!(p.x, x, epsilon = 1e-9);
    assert_abs_diff_eq!(p.y, y, epsilon = 1e-9);
    assert_abs_diff_eq!(p.z, z, epsilon = 1e-9);
}

#[test]
fn child_at_plain_offset_from_origin() {
    let cat = catalog(serde_json::json!({
        "equipment_definitions": [
            {
                "id": "EQ-001",
                "name": "Switchboard",
                "linked_relations": {
                    "parent": {},
                    "children": [{
                        "equipment_id": "EQ-002",
                        "offsets": {"x_inches": 12.0, "y_inches": 0.0, "z_inches": 0.0, "rotation_deg": 90.0},
                        "anchor_offsets": {},
                        "anchor_led_id": null
                    }]
                }
            },
            {"id": "EQ-002", "name": "Panelboard"}
        ]
    }));
    let parent = cat.find_by_id("EQ-001").unwrap().clone();

    let requests = build_child_requests(
        &cat,
        &labels(&["Panelboard"]),
        &parent,
        Point::origin(),
        0.0,
        None,
    );

    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.equipment_id, "EQ-002");
    assert_eq!(req.name, "Panelboard");
    assert_eq!(req.candidate_labels, vec!["Panelboard : Default"]);
    assert_point(req.target_point, 12.0, 0.0, 0.0);
    assert_abs_diff_eq!(req.rotation_deg, 90.0, epsilon = 1e-9);
}

#[test]
fn anchor_offsets_compose_in_the_parent_frame_at_both_stages() {
    let cat = catalog(serde_json::json!({
        "equipment_definitions": [
            {
                "id": "EQ-001",
                "name": "Switchboard",
                "linked_relations": {
                    "parent": {},
                    "children": [{
                        "equipment_id": "EQ-002",
                        "offsets": {"x_inches": 5.0, "y_inches": 0.0, "z_inches": 0.0, "rotation_deg": 30.0},
                        "anchor_offsets": {"x_inches": 10.0, "y_inches": 0.0, "z_inches": 2.0, "rotation_deg": 45.0},
                        "anchor_led_id": "A1"
                    }]
                }
            },
            {"id": "EQ-002", "name": "Panelboard"}
        ]
    }));
    let parent = cat.find_by_id("EQ-001").unwrap().clone();

    let requests = build_child_requests(
        &cat,
        &labels(&["Panelboard"]),
        &parent,
        Point::new(100.0, 0.0, 0.0),
        90.0,
        None,
    );

    // Anchor: (100,0,0) + rot90(10,0,0) = (100,10,2).
    // Target: anchor + rot90(5,0,0) = (100,15,2) — the parent's rotation is
    // used at both stages; the anchor's own rotation delta never enters.
    assert_eq!(requests.len(), 1);
    assert_point(requests[0].target_point, 100.0, 15.0, 2.0);
    assert_abs_diff_eq!(requests[0].rotation_deg, 120.0, epsilon = 1e-9);
}

fn anchored_catalog() -> Catalog {
    catalog(serde_json::json!({
        "equipment_definitions": [
            {
                "id": "EQ-001",
                "name": "Switchboard",
                "linked_relations": {
                    "parent": {},
                    "children": [
                        {"equipment_id": "EQ-002", "offsets": {}, "anchor_offsets": {}, "anchor_led_id": "A1"},
                        {"equipment_id": "EQ-003", "offsets": {}, "anchor_offsets": {}, "anchor_led_id": "A2"},
                        {"equipment_id": "EQ-004", "offsets": {}, "anchor_offsets": {}, "anchor_led_id": null}
                    ]
                }
            },
            {"id": "EQ-002", "name": "Panelboard"},
            {"id": "EQ-003", "name": "Transformer"},
            {"id": "EQ-004", "name": "Disconnect"}
        ]
    }))
}

#[test]
fn anchor_filter_is_trimmed_and_case_folded() {
    let cat = anchored_catalog();
    let parent = cat.find_by_id("EQ-001").unwrap().clone();
    let source = labels(&["Panelboard", "Transformer", "Disconnect"]);

    let requests =
        build_child_requests(&cat, &source, &parent, Point::origin(), 0.0, Some(" a1 "));
    let ids: Vec<&str> = requests.iter().map(|r| r.equipment_id.as_str()).collect();
    assert_eq!(ids, vec!["EQ-002"]);
}

#[test]
fn empty_anchor_filter_includes_every_child_in_order() {
    let cat = anchored_catalog();
    let parent = cat.find_by_id("EQ-001").unwrap().clone();
    let source = labels(&["Panelboard", "Transformer", "Disconnect"]);

    for filter in [None, Some("")] {
        let requests =
            build_child_requests(&cat, &source, &parent, Point::origin(), 0.0, filter);
        let ids: Vec<&str> = requests.iter().map(|r| r.equipment_id.as_str()).collect();
        assert_eq!(ids, vec!["EQ-002", "EQ-003", "EQ-004"]);
    }
}

#[test]
fn unresolved_references_and_missing_candidates_are_skipped() {
    let cat = catalog(serde_json::json!({
        "equipment_definitions": [
            {
                "id": "EQ-001",
                "name": "Switchboard",
                "linked_relations": {
                    "parent": {},
                    "children": [
                        {"equipment_id": "EQ-404", "offsets": {}, "anchor_offsets": {}, "anchor_led_id": null},
                        {"equipment_id": "EQ-002", "offsets": {}, "anchor_offsets": {}, "anchor_led_id": null},
                        {"equipment_id": "EQ-003", "offsets": {}, "anchor_offsets": {}, "anchor_led_id": null}
                    ]
                }
            },
            {"id": "EQ-002", "name": "Panelboard"},
            {"id": "EQ-003", "name": "Unmapped Gear"}
        ]
    }));
    let parent = cat.find_by_id("EQ-001").unwrap().clone();

    // EQ-404 is not in the catalog and "Unmapped Gear" has no candidates;
    // both entries drop silently.
    let requests = build_child_requests(
        &cat,
        &labels(&["Panelboard"]),
        &parent,
        Point::origin(),
        0.0,
        None,
    );
    let ids: Vec<&str> = requests.iter().map(|r| r.equipment_id.as_str()).collect();
    assert_eq!(ids, vec!["EQ-002"]);
}

#[test]
fn resolve_descendants_walks_the_chain_and_breaks_cycles() {
    let cat = catalog(serde_json::json!({
        "equipment_definitions": [
            {
                "id": "EQ-001",
                "name": "Switchboard",
                "linked_relations": {
                    "parent": {},
                    "children": [{
                        "equipment_id": "EQ-002",
                        "offsets": {"x_inches": 12.0, "y_inches": 0.0, "z_inches": 0.0, "rotation_deg": 90.0},
                        "anchor_offsets": {},
                        "anchor_led_id": null
                    }]
                }
            },
            {
                "id": "EQ-002",
                "name": "Panelboard",
                "linked_relations": {
                    "parent": {},
                    "children": [
                        {
                            "equipment_id": "EQ-003",
                            "offsets": {"x_inches": 1.0, "y_inches": 0.0, "z_inches": 0.0, "rotation_deg": 0.0},
                            "anchor_offsets": {},
                            "anchor_led_id": null
                        },
                        // Cyclic edge back to the root.
                        {"equipment_id": "EQ-001", "offsets": {}, "anchor_offsets": {}, "anchor_led_id": null}
                    ]
                }
            },
            {"id": "EQ-003", "name": "Disconnect"}
        ]
    }));
    let root = cat.find_by_id("EQ-001").unwrap().clone();
    let source = labels(&["Switchboard", "Panelboard", "Disconnect"]);

    let requests = resolve_descendants(&cat, &source, &root, Point::origin(), 0.0, None);

    let ids: Vec<&str> = requests.iter().map(|r| r.equipment_id.as_str()).collect();
    assert_eq!(ids, vec!["EQ-002", "EQ-003"]);

    // EQ-002 sits at (12,0,0) rotated 90; EQ-003's local +x becomes world +y.
    assert_point(requests[1].target_point, 12.0, 1.0, 0.0);
    assert_abs_diff_eq!(requests[1].rotation_deg, 90.0, epsilon = 1e-9);
}
