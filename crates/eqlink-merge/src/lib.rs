pub mod extract;
pub mod merge;
pub mod renumber;
pub mod report;

use thiserror::Error;
use tracing::warn;

use eqlink_profile::catalog::document_from_definitions;
use eqlink_profile::{Catalog, ProfileError, reorder_document, validate_data_integrity};

pub use extract::{extract_definition_blocks, parse_definition_block};
pub use merge::{MergeAction, duplicate_name_counts, merge_definitions};
pub use renumber::{renumber_ids, verify_unique_ids};
pub use report::MergeReport;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("duplicate identifier \"{id}\" survived renumbering")]
    DuplicateId { id: String },
}

/// Whether a merge pass found anything to collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// No duplicate groups; the catalog was renumbered and reordered only.
    Unchanged,
    /// This many duplicate groups were merged.
    Merged(usize),
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub output: String,
    pub report: MergeReport,
    pub status: MergeStatus,
}

/// The full merge pass: extract raw blocks (duplicate-preserving), parse each
/// independently, merge by normalized name, renumber, canonicalize, validate.
/// Nothing is returned unless the reordered document is content-equal to the
/// merged one and every surviving id is unique.
pub fn merge_document(raw: &str) -> Result<MergeOutcome, MergeError> {
    let blocks = extract_definition_blocks(raw);
    let mut defs = Vec::with_capacity(blocks.len());
    let mut dropped_blocks = 0usize;
    for (index, block) in blocks.iter().enumerate() {
        match parse_definition_block(block) {
            Ok(def) => defs.push(def),
            Err(err) => {
                warn!(block = index + 1, %err, "dropping unparseable equipment block");
                dropped_blocks += 1;
            }
        }
    }

    let parsed_count = defs.len();
    let duplicates = duplicate_name_counts(&defs);
    let (mut merged, merges) = merge_definitions(defs);
    renumber_ids(&mut merged);
    verify_unique_ids(&merged)?;
    let final_count = merged.len();

    let doc = document_from_definitions(merged);
    let reordered = reorder_document(&doc);
    validate_data_integrity(&doc, &reordered)?;
    let output = reordered.to_yaml_string().map_err(MergeError::Profile)?;

    let status = if merges.is_empty() {
        MergeStatus::Unchanged
    } else {
        MergeStatus::Merged(merges.len())
    };
    Ok(MergeOutcome {
        output,
        report: MergeReport {
            block_count: blocks.len(),
            parsed_count,
            dropped_blocks,
            duplicates,
            merges,
            final_count,
        },
        status,
    })
}

/// Reorder-only pass: whole-document parse, canonical key order, integrity
/// validation, serialize. Content is untouched; returns the new text and the
/// number of definitions seen.
pub fn reorder_document_text(raw: &str) -> Result<(String, usize), MergeError> {
    let catalog = Catalog::from_yaml_str(raw)?;
    let reordered = reorder_document(catalog.document());
    validate_data_integrity(catalog.document(), &reordered)?;
    let count = catalog.len();
    let output = reordered.to_yaml_string().map_err(MergeError::Profile)?;
    Ok((output, count))
}
