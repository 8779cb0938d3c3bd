//! # Cost Model
//!
//! This module defines the cost abstraction and the generic baseline cost model.
//!
//! ## Baseline vs. Pushdown Cost
//!
//! The `DefaultCostModel` knows nothing about pushdown. It prices each node shape
//! as if the engine executed it: a sort is `O(n log n)` CPU plus a materialized
//! buffer, a scan ships every byte over the network. Pushdown-aware nodes start
//! from that baseline and adjust it (see `sort_pushdown::SortPushdownPlanner`),
//! which keeps the two concerns separate: the baseline can be re-tuned without
//! touching pushdown policy, and vice versa.
//!
//! ## Weights
//!
//! ```text
//! cost = cpu_weight * cpu + memory_weight * memory + network_weight * network
//! ```
//!
//! The default weights (1.0, 1.0, 10.0) treat network transfer as the most
//! expensive dimension, since rows shipped out of a remote store dominate
//! federated query latency.

use crate::plan::PlanNode;
use crate::stats::{Statistics, DEFAULT_ROW_SIZE};
use serde::{Deserialize, Serialize};

/// A single comparable value representing the estimated expense of a plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cost {
    /// The total weighted cost. Lower is better. `f64::MAX` represents infinity
    /// (an infeasible or not-yet-costed plan).
    pub total: f64,
}

impl Cost {
    /// The zero-cost sentinel. Strictly preferred over any positive cost.
    pub fn zero() -> Self {
        Self { total: 0.0 }
    }

    pub fn new(total: f64) -> Self {
        Self { total }
    }

    pub fn infinite() -> Self {
        Self { total: f64::MAX }
    }

    pub fn is_infinite(&self) -> bool {
        self.total == f64::MAX
    }

    pub fn is_zero(&self) -> bool {
        self.total == 0.0
    }

    /// Scale this cost by `factor`. Infinity stays infinite.
    pub fn multiply_by(&self, factor: f64) -> Self {
        if self.is_infinite() {
            return *self;
        }
        Self::new(self.total * factor)
    }
}

/// Epsilon-based equality to handle floating-point imprecision in cost comparisons.
impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        (self.total - other.total).abs() < f64::EPSILON
    }
}

/// Costs within the equality epsilon order as `Equal`.
impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self == other {
            return Some(std::cmp::Ordering::Equal);
        }
        self.total.partial_cmp(&other.total)
    }
}

/// Trait for pluggable baseline cost models.
///
/// `input_stats` describes the node's input (or the table itself for leaves).
pub trait CostModel: Send + Sync {
    fn compute_cost(&self, node: &PlanNode, input_stats: &Statistics) -> Cost;
}

/// Default baseline cost model.
pub struct DefaultCostModel {
    /// Weight for CPU-bound work (row processing, comparisons).
    pub cpu_weight: f64,
    /// Weight for memory-bound work (sort buffers).
    pub memory_weight: f64,
    /// Weight for bytes shipped from a remote store.
    pub network_weight: f64,
}

impl Default for DefaultCostModel {
    fn default() -> Self {
        Self {
            cpu_weight: 1.0,
            memory_weight: 1.0,
            network_weight: 10.0,
        }
    }
}

impl DefaultCostModel {
    fn sort_cost(&self, ordered: bool, input_stats: &Statistics) -> f64 {
        let rows = input_stats.row_count;
        if !ordered {
            // Nothing to sort; rows only flow through.
            return self.cpu_weight * rows;
        }
        let n_log_n = if rows > 1.0 { rows * rows.log2() } else { 1.0 };
        self.cpu_weight * n_log_n + self.memory_weight * rows * DEFAULT_ROW_SIZE
    }
}

impl CostModel for DefaultCostModel {
    fn compute_cost(&self, node: &PlanNode, input_stats: &Statistics) -> Cost {
        let local = match node {
            PlanNode::RemoteScan(_) => self.network_weight * input_stats.total_size_bytes,
            PlanNode::LogicalSort(s) => self.sort_cost(!s.collation.is_empty(), input_stats),
            PlanNode::LocalSort(s) => self.sort_cost(!s.collation.is_empty(), input_stats),
            PlanNode::SortPushdown(s) => {
                self.sort_cost(!s.collation().is_empty(), input_stats)
            }
        };
        Cost::new(local)
    }
}
