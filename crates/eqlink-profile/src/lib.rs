pub mod canonical;
pub mod catalog;
pub mod error;
pub mod value;

pub use canonical::{reorder_document, reorder_equipment_definition, validate_data_integrity};
pub use catalog::{Catalog, EQUIPMENT_DEFINITIONS_KEY, display_name, normalize_key};
pub use error::ProfileError;
pub use value::Value;
