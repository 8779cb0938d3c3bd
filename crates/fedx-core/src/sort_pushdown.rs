//! # Sort/Limit Pushdown
//!
//! `SortPushdown` is the plan node for "order by these keys, optionally keep the
//! first N rows" executed inside a remote store. `SortPushdownPlanner` is the
//! stateless strategy that prices it, copies it, and translates it into the
//! store's `ORDER BY` / `LIMIT` fragments.
//!
//! ## Cost Policy
//!
//! The planner adjusts the baseline cost the generic model computes for a sort:
//!
//! | requested collation | limit   | cost                         |
//! |---------------------|---------|------------------------------|
//! | non-empty           | any     | `baseline * 0.05`            |
//! | empty               | none    | `baseline`                   |
//! | empty               | present | zero                         |
//!
//! An ordered remote read must beat any plan that sorts in the engine, so a
//! pushed sort costs a small fraction of the baseline. A bare remote limit is
//! free, which makes it strictly preferred over every positive-cost
//! alternative. With neither, the node is a pass-through and keeps the
//! baseline. These values decide which plan the search keeps; do not tune them.
//!
//! ## Translation
//!
//! Each collation entry becomes `"<column> ASC"` or `"<column> DESC"`, in
//! collation order, with the column name resolved against the input's row
//! shape. The limit must be a plan-time literal. Offsets are never pushed.
//!
//! ## Implicit Collation
//!
//! The node also records the order its input already delivers (for example a
//! store's clustering order). It is planning metadata only: copied along by
//! `reconstruct`, never consulted by cost or translation.

use crate::collation::{Collation, Direction};
use crate::cost::{Cost, CostModel};
use crate::error::{PushdownError, Result};
use crate::expr::{Expr, ScalarValue};
use crate::plan::{PlanNode, RowShape};
use crate::properties::TraitSet;
use crate::query::QueryBuilder;
use crate::stats::Statistics;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Fraction of the baseline cost charged for a sort executed by the store.
pub const SORT_PUSHDOWN_COST_FACTOR: f64 = 0.05;

/// Translated ORDER BY / LIMIT fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    /// `"<column> ASC|DESC"` terms, primary key first.
    pub ordered_clauses: Vec<String>,
    pub limit_text: Option<String>,
}

impl OrderSpec {
    /// Append the fragments to `builder`: ORDER BY terms first, then LIMIT.
    /// Each builder call happens at most once and only when there is
    /// something to add.
    pub fn apply_to(&self, builder: &mut QueryBuilder) {
        if !self.ordered_clauses.is_empty() {
            builder.add_order(self.ordered_clauses.clone());
        }
        if let Some(limit) = &self.limit_text {
            builder.set_limit(limit.clone());
        }
    }
}

/// Order/limit executed by a remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortPushdown {
    traits: TraitSet,
    input: Arc<PlanNode>,
    collation: Collation,
    implicit_collation: Collation,
    fetch: Option<Expr>,
}

impl SortPushdown {
    /// Build a pushdown node over `input`.
    ///
    /// Fails with `ConventionMismatch` unless `traits` and `input` share the
    /// same remote convention.
    pub fn try_new(
        traits: TraitSet,
        input: Arc<PlanNode>,
        collation: Collation,
        implicit_collation: Collation,
        fetch: Option<Expr>,
    ) -> Result<Self> {
        let input_convention = input.convention();
        if !traits.convention.is_remote() || traits.convention != input_convention {
            return Err(PushdownError::ConventionMismatch {
                node: traits.convention.to_string(),
                input: input_convention.to_string(),
            });
        }
        Ok(Self {
            traits,
            input,
            collation,
            implicit_collation,
            fetch,
        })
    }

    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }

    pub fn input(&self) -> &Arc<PlanNode> {
        &self.input
    }

    /// The requested ordering.
    pub fn collation(&self) -> &Collation {
        &self.collation
    }

    pub fn implicit_collation(&self) -> &Collation {
        &self.implicit_collation
    }

    pub fn fetch(&self) -> Option<&Expr> {
        self.fetch.as_ref()
    }

    /// Baseline cost from `model`, adjusted by the pushdown policy.
    pub fn compute_self_cost(&self, model: &dyn CostModel, input_stats: &Statistics) -> Cost {
        let node = PlanNode::SortPushdown(self.clone());
        let baseline = model.compute_cost(&node, input_stats);
        SortPushdownPlanner.estimate_cost(baseline, &self.collation, self.fetch())
    }

    /// Copy this node onto a new input/limit. See [`SortPushdownPlanner::reconstruct`].
    pub fn copy(
        &self,
        traits: TraitSet,
        input: Arc<PlanNode>,
        collation: &Collation,
        offset: Option<&Expr>,
        fetch: Option<Expr>,
    ) -> Result<SortPushdown> {
        SortPushdownPlanner.reconstruct(self, traits, input, collation, offset, fetch)
    }

    /// Translate the input, then append this node's ORDER BY and LIMIT.
    ///
    /// On error the builder is left untouched.
    pub fn implement(&self, builder: &mut QueryBuilder) -> Result<()> {
        let spec = SortPushdownPlanner.translate(
            &self.input.row_shape(),
            &self.collation,
            self.fetch(),
        )?;
        builder.visit_child(&self.input)?;
        spec.apply_to(builder);
        Ok(())
    }
}

/// Cost, copy and translation policy for [`SortPushdown`].
///
/// Stateless: every method is a pure function of its arguments, so one planner
/// can serve any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortPushdownPlanner;

impl SortPushdownPlanner {
    /// Adjust the generic baseline cost of a sort node for remote execution.
    pub fn estimate_cost(&self, baseline: Cost, collation: &Collation, fetch: Option<&Expr>) -> Cost {
        let cost = if !collation.is_empty() {
            baseline.multiply_by(SORT_PUSHDOWN_COST_FACTOR)
        } else if fetch.is_none() {
            baseline
        } else {
            // The store applies the limit for free.
            Cost::zero()
        };
        trace!(
            target: "fedx::sort_pushdown",
            baseline = baseline.total,
            cost = cost.total,
            keys = collation.len(),
            has_fetch = fetch.is_some(),
            "Adjusted sort cost"
        );
        cost
    }

    /// Produce a copy of `node` over `new_input` with `new_traits` and `new_fetch`.
    ///
    /// `new_collation` is accepted to match the generic sort copy protocol but
    /// ignored: the copy keeps `node`'s requested and implicit collations.
    /// Any offset is rejected with `UnsupportedOffset`.
    pub fn reconstruct(
        &self,
        node: &SortPushdown,
        new_traits: TraitSet,
        new_input: Arc<PlanNode>,
        _new_collation: &Collation,
        new_offset: Option<&Expr>,
        new_fetch: Option<Expr>,
    ) -> Result<SortPushdown> {
        if new_offset.is_some() {
            return Err(PushdownError::UnsupportedOffset);
        }
        SortPushdown::try_new(
            new_traits,
            new_input,
            node.collation.clone(),
            node.implicit_collation.clone(),
            new_fetch,
        )
    }

    /// Translate a collation and limit into ORDER BY / LIMIT fragments.
    pub fn translate(
        &self,
        row_shape: &RowShape,
        collation: &Collation,
        fetch: Option<&Expr>,
    ) -> Result<OrderSpec> {
        let ordered_clauses = collation
            .field_collations()
            .iter()
            .map(|key| {
                let name = row_shape.field_name(key.field_index).ok_or(
                    PushdownError::FieldIndexOutOfRange {
                        index: key.field_index,
                        width: row_shape.width(),
                    },
                )?;
                let direction = match key.direction {
                    Direction::Ascending => "ASC",
                    Direction::Descending => "DESC",
                    other => {
                        return Err(PushdownError::UnsupportedCollationDirection {
                            field_index: key.field_index,
                            direction: other,
                        })
                    }
                };
                Ok(format!("{} {}", name, direction))
            })
            .collect::<Result<Vec<_>>>()?;

        let limit_text = fetch
            .map(|f| literal_limit(f).map(|n| n.to_string()))
            .transpose()?;

        debug!(
            target: "fedx::sort_pushdown",
            order = ?ordered_clauses,
            limit = ?limit_text,
            "Translated sort"
        );
        Ok(OrderSpec {
            ordered_clauses,
            limit_text,
        })
    }
}

/// Extract a plan-time row limit from a fetch expression.
pub(crate) fn literal_limit(fetch: &Expr) -> Result<u64> {
    match fetch.as_literal() {
        None => Err(PushdownError::NonLiteralLimit(fetch.to_string())),
        Some(ScalarValue::Int64(n)) if *n >= 0 => Ok(*n as u64),
        Some(other) => Err(PushdownError::InvalidLimit(other.to_string())),
    }
}
