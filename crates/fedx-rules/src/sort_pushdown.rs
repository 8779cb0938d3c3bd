//! # Sort Pushdown Rule
//!
//! Implements a logical sort over a remote scan as a `SortPushdown` in the
//! scan's store.
//!
//! ```text
//! Before: LogicalSort(keys, fetch, RemoteScan[cassandra])
//! After:  SortPushdown[cassandra](keys, fetch, RemoteScan[cassandra])
//! ```
//!
//! ## When No Candidate Is Produced
//!
//! - The input is not a remote scan. A sort over an already pushed sort
//!   stays in the engine: merging both into one statement would turn the
//!   outer keys into tie-breakers and widen the inner limit.
//! - The sort has an offset. Offsets always stay in the engine.
//! - The collation uses a direction the store cannot express, a sort key falls
//!   outside the input row shape, or the limit is not a plan-time literal. The
//!   translation is checked here, up front, so the search never keeps a
//!   candidate that would fail later.
//! - The configuration disables this kind of pushdown.
//!
//! In every case the engine-side `LocalSort` produced by `ImplLocalSortRule`
//! remains available, so a rejected pushdown only removes one alternative.

use fedx_core::error::Result;
use fedx_core::pattern::Pattern;
use fedx_core::plan::{LogicalSort, PlanNode};
use fedx_core::properties::TraitSet;
use fedx_core::rule::{OptContext, Rule};
use fedx_core::sort_pushdown::{SortPushdown, SortPushdownPlanner};
use tracing::debug;

/// Push ORDER BY / LIMIT into the store that produces the sort's input.
pub struct SortPushdownRule;

impl SortPushdownRule {
    fn candidate(sort: &LogicalSort) -> Result<SortPushdown> {
        let input_traits = sort.input.traits();
        // The store's native order becomes the node's implicit collation.
        let node = SortPushdown::try_new(
            TraitSet {
                convention: input_traits.convention,
                collation: sort.collation.clone(),
            },
            sort.input.clone(),
            sort.collation.clone(),
            input_traits.collation,
            sort.fetch.clone(),
        )?;
        SortPushdownPlanner.translate(
            &sort.input.row_shape(),
            node.collation(),
            node.fetch(),
        )?;
        Ok(node)
    }
}

impl Rule for SortPushdownRule {
    fn name(&self) -> &str {
        "SortPushdown"
    }

    fn pattern(&self) -> Pattern {
        Pattern::sort_over_remote_scan()
    }

    fn apply(&self, node: &PlanNode, ctx: &OptContext) -> Vec<PlanNode> {
        let PlanNode::LogicalSort(sort) = node else {
            return vec![];
        };

        if sort.offset.is_some() {
            debug!(target: "fedx::rules", "Offset present, keeping sort in the engine");
            return vec![];
        }
        let ordered = !sort.collation.is_empty();
        if ordered && !ctx.config.enable_sort_pushdown {
            return vec![];
        }
        if !ordered && sort.fetch.is_some() && !ctx.config.enable_limit_pushdown {
            return vec![];
        }

        match Self::candidate(sort) {
            Ok(pushed) => vec![pushed.into()],
            Err(e) => {
                debug!(
                    target: "fedx::rules",
                    error = %e,
                    collation = %sort.collation,
                    "Dropping sort pushdown candidate"
                );
                vec![]
            }
        }
    }
}
