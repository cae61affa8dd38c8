use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use tracing::{debug, warn};

use eqlink_core::{Offset, Point, child_rotation_from_offset, target_point_from_offset};
use eqlink_profile::{Catalog, Value, display_name, normalize_key};

use crate::relations::{children, offset_from_value};

/// One placement target for a direct child of a resolved parent. Transient;
/// produced per invocation and never persisted.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    pub equipment: Value,
    pub equipment_id: String,
    pub name: String,
    pub candidate_labels: Vec<String>,
    pub target_point: Point,
    pub rotation_deg: f64,
    pub offsets: Offset,
}

/// Upstream lookup of the placement candidates (labels) available for a
/// child name. An empty answer means the child cannot be placed yet and its
/// entry is skipped.
pub trait CandidateSource {
    fn labels_for(&self, name: &str) -> Vec<String>;
}

impl CandidateSource for IndexMap<String, Vec<String>> {
    fn labels_for(&self, name: &str) -> Vec<String> {
        let want = normalize_key(name);
        self.iter()
            .find(|(key, _)| normalize_key(key) == want)
            .map(|(_, labels)| labels.clone())
            .unwrap_or_default()
    }
}

/// Placement requests for the direct children of one resolved parent.
///
/// Draft catalogs are expected: entries whose referenced definition is
/// missing, whose name is blank, or that have no upstream candidates are
/// dropped silently. With `anchor_led_id` set, only children tagged with
/// that anchor (trimmed, case-folded) are included; an empty filter includes
/// every child. Output order follows the stored child list.
///
/// Both composition stages rotate in the parent's frame: the anchor point is
/// `anchor_offsets` applied at the parent, and the target is `offsets`
/// applied at the anchor point with the parent's rotation again.
pub fn build_child_requests(
    catalog: &Catalog,
    candidates: &dyn CandidateSource,
    parent: &Value,
    parent_point: Point,
    parent_rotation_deg: f64,
    anchor_led_id: Option<&str>,
) -> Vec<PlacementRequest> {
    let anchor_filter = anchor_led_id.map(normalize_key).filter(|s| !s.is_empty());
    let mut requests = Vec::new();

    for entry in children(parent) {
        let Some(entry_map) = entry.as_map() else {
            continue;
        };
        let child_id = entry_map
            .get("equipment_id")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let Some(child_eq) = catalog.find_by_id(child_id) else {
            debug!(equipment_id = child_id, "child reference unresolved; skipping");
            continue;
        };
        if let Some(filter) = &anchor_filter {
            let entry_anchor = entry_map
                .get("anchor_led_id")
                .and_then(Value::as_str)
                .map(normalize_key)
                .unwrap_or_default();
            if entry_anchor != *filter {
                continue;
            }
        }
        let Some(name) = display_name(child_eq) else {
            continue;
        };
        let candidate_labels = candidates.labels_for(&name);
        if candidate_labels.is_empty() {
            debug!(name = %name, "no placement candidates; skipping child");
            continue;
        }

        let offsets = offset_from_value(entry_map.get("offsets"));
        let anchor_offsets = offset_from_value(entry_map.get("anchor_offsets"));
        let anchor_point =
            target_point_from_offset(Some(parent_point), parent_rotation_deg, &anchor_offsets);
        let target_point =
            target_point_from_offset(Some(anchor_point), parent_rotation_deg, &offsets);
        let rotation_deg = child_rotation_from_offset(parent_rotation_deg, &offsets);

        requests.push(PlacementRequest {
            equipment: child_eq.clone(),
            equipment_id: child_eq
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or(child_id)
                .to_string(),
            name,
            candidate_labels,
            target_point,
            rotation_deg,
            offsets,
        });
    }
    requests
}

/// Drive the level-by-level resolution the single-level resolver leaves to
/// its caller: each resolved child's pose is fed back in as a new parent.
/// The anchor filter applies to the root's direct children only.
///
/// A visited-id set guards against cyclic parent/child data; a repeated id
/// is treated as a data error and skipped with a warning.
pub fn resolve_descendants(
    catalog: &Catalog,
    candidates: &dyn CandidateSource,
    root: &Value,
    root_point: Point,
    root_rotation_deg: f64,
    anchor_led_id: Option<&str>,
) -> Vec<PlacementRequest> {
    let mut visited: HashSet<String> = HashSet::new();
    if let Some(id) = root.get("id").and_then(Value::as_str) {
        visited.insert(normalize_key(id));
    }

    let mut resolved = Vec::new();
    let mut queue: VecDeque<(Value, Point, f64, Option<String>)> = VecDeque::new();
    queue.push_back((
        root.clone(),
        root_point,
        root_rotation_deg,
        anchor_led_id.map(str::to_string),
    ));

    while let Some((node, point, rotation, filter)) = queue.pop_front() {
        for request in
            build_child_requests(catalog, candidates, &node, point, rotation, filter.as_deref())
        {
            if !visited.insert(normalize_key(&request.equipment_id)) {
                warn!(
                    equipment_id = %request.equipment_id,
                    "cyclic child relation; skipping"
                );
                continue;
            }
            queue.push_back((
                request.equipment.clone(),
                request.target_point,
                request.rotation_deg,
                None,
            ));
            resolved.push(request);
        }
    }
    resolved
}
