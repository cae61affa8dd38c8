use std::fmt::Write as _;

use crate::merge::MergeAction;

/// Batch reports show counts plus a bounded sample, never exhaustive dumps.
const SAMPLE_LIMIT: usize = 10;

/// What a merge pass found and did, for human review.
#[derive(Debug, Clone)]
pub struct MergeReport {
    pub block_count: usize,
    pub parsed_count: usize,
    pub dropped_blocks: usize,
    pub duplicates: Vec<(String, usize)>,
    pub merges: Vec<MergeAction>,
    pub final_count: usize,
}

impl MergeReport {
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Found {} equipment definition blocks in raw file",
            self.block_count
        );
        if self.dropped_blocks > 0 {
            let _ = writeln!(
                out,
                "Parsed {} equipment definitions ({} blocks dropped)",
                self.parsed_count, self.dropped_blocks
            );
        } else {
            let _ = writeln!(out, "Parsed {} equipment definitions", self.parsed_count);
        }

        if self.duplicates.is_empty() {
            let _ = writeln!(out, "No duplicates found");
        } else {
            let _ = writeln!(out, "Found {} names with duplicates:", self.duplicates.len());
            for (name, count) in self.duplicates.iter().take(SAMPLE_LIMIT) {
                let _ = writeln!(out, "  '{name}' x{count}");
            }
            if self.duplicates.len() > SAMPLE_LIMIT {
                let _ = writeln!(out, "  ... and {} more", self.duplicates.len() - SAMPLE_LIMIT);
            }
        }

        if !self.merges.is_empty() {
            let _ = writeln!(
                out,
                "Merged {} entries into {} unique definitions:",
                self.parsed_count, self.final_count
            );
            for action in self.merges.iter().take(SAMPLE_LIMIT) {
                let _ = writeln!(
                    out,
                    "  '{}': {} entries -> {} linked elements",
                    action.name, action.original_count, action.merged_led_count
                );
            }
            if self.merges.len() > SAMPLE_LIMIT {
                let _ = writeln!(out, "  ... and {} more merged", self.merges.len() - SAMPLE_LIMIT);
            }
        }

        if self.final_count > 0 {
            let _ = writeln!(
                out,
                "Assigned EQ-001 through EQ-{:03}",
                self.final_count
            );
        }
        let _ = writeln!(out, "Final unique ids: {}", self.final_count);
        out
    }
}
