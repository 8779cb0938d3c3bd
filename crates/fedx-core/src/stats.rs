//! # Statistics
//!
//! Row count and size estimates feeding the baseline cost model. Only the
//! derivations the sort/limit nodes need live here: a sort keeps its input's
//! cardinality, a limit caps it.

use serde::{Deserialize, Serialize};

/// Statistics for a relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub row_count: f64,
    pub total_size_bytes: f64,
}

impl Statistics {
    pub fn new(row_count: f64, total_size_bytes: f64) -> Self {
        Self {
            row_count,
            total_size_bytes,
        }
    }

    /// Average row width, falling back to 100 bytes when the relation is empty.
    pub fn avg_row_size(&self) -> f64 {
        if self.row_count > 0.0 {
            self.total_size_bytes / self.row_count
        } else {
            DEFAULT_ROW_SIZE
        }
    }
}

/// Assumed bytes per row when nothing better is known.
pub const DEFAULT_ROW_SIZE: f64 = 100.0;

/// Derive statistics for the output of a `LIMIT n`.
///
/// The output keeps at most `fetch` rows; the byte estimate shrinks
/// proportionally.
pub fn derive_limit_stats(input: &Statistics, fetch: u64) -> Statistics {
    let rows = input.row_count.min(fetch as f64);
    Statistics::new(rows, rows * input.avg_row_size())
}
