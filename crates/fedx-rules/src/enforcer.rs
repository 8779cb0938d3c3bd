//! # Local Sort Implementation Rule
//!
//! Maps every logical sort to an engine-side `LocalSort`, whatever its input.
//! This is the fallback that keeps planning total: when a sort cannot be pushed
//! (offsets, unsupported directions, dynamic limits, disabled pushdown) the
//! engine still sorts and limits the rows it receives.
//!
//! The local sort is priced at the full baseline, so whenever a pushdown
//! candidate exists it wins on cost.

use fedx_core::pattern::Pattern;
use fedx_core::plan::{LocalSort, PlanNode};
use fedx_core::rule::{OptContext, Rule};

/// Implement logical sort as an engine sort.
pub struct ImplLocalSortRule;

impl Rule for ImplLocalSortRule {
    fn name(&self) -> &str {
        "ImplLocalSort"
    }

    fn pattern(&self) -> Pattern {
        Pattern::sort()
    }

    fn apply(&self, node: &PlanNode, _ctx: &OptContext) -> Vec<PlanNode> {
        let PlanNode::LogicalSort(sort) = node else {
            return vec![];
        };

        vec![LocalSort::new(
            sort.input.clone(),
            sort.collation.clone(),
            sort.offset.clone(),
            sort.fetch.clone(),
        )
        .into()]
    }
}
