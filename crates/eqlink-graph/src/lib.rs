pub mod relations;
pub mod resolver;

pub use relations::{
    RELATIONS_KEY, RelationError, ensure_relations, get_parent_id, remove_child, set_parent,
    upsert_child,
};
pub use resolver::{CandidateSource, PlacementRequest, build_child_requests, resolve_descendants};
