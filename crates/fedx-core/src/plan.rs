//! # Plan Nodes
//!
//! Plan nodes are immutable values. A transformation never edits a node in
//! place; it builds a new node that shares the untouched children through
//! `Arc`. This makes nodes cheap to copy into alternative candidate plans and
//! safe to read from several planning threads at once.
//!
//! ## Node Variants
//!
//! - **`RemoteScan`**: a table read in a remote store. Leaf. Exposes the store's
//!   native row order as its collation trait.
//! - **`LogicalSort`**: the planner's request "order by these keys, optionally
//!   skip/keep N rows". Has no execution strategy of its own; rules turn it into
//!   one of the physical variants below.
//! - **`SortPushdown`**: ordering and limiting executed by the remote store.
//!   Costed and translated by `SortPushdownPlanner`.
//! - **`LocalSort`**: ordering and limiting executed by the engine. Always
//!   available as a fallback.
//!
//! ## Row Shape
//!
//! Sorts never change the row shape, so sort nodes answer `row_shape()` by
//! asking their input. The shape is computed on demand rather than cached at
//! construction, so an input swapped in by `copy` is always the one consulted.

use crate::collation::Collation;
use crate::error::{PushdownError, Result};
use crate::expr::{Expr, TableRef};
use crate::properties::{Convention, TraitSet};
use crate::query::QueryBuilder;
use crate::sort_pushdown::{literal_limit, SortPushdown};
use crate::stats::{self, Statistics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Ordered list of column names exposed by a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowShape {
    pub fields: Vec<String>,
}

impl RowShape {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// Kind discriminant for pattern matching (without data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanNodeKind {
    RemoteScan,
    LogicalSort,
    SortPushdown,
    LocalSort,
}

impl fmt::Display for PlanNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanNodeKind::RemoteScan => "RemoteScan",
            PlanNodeKind::LogicalSort => "LogicalSort",
            PlanNodeKind::SortPushdown => "SortPushdown",
            PlanNodeKind::LocalSort => "LocalSort",
        };
        write!(f, "{}", s)
    }
}

/// Table read inside a remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteScan {
    pub traits: TraitSet,
    pub table: TableRef,
    pub fields: Vec<String>,
}

impl RemoteScan {
    /// `implicit_collation` is the order in which the store enumerates rows
    /// (e.g. clustering keys), empty when the store gives no guarantee.
    pub fn new<S: Into<String>>(
        store: impl Into<String>,
        table: TableRef,
        fields: impl IntoIterator<Item = S>,
        implicit_collation: Collation,
    ) -> Self {
        Self {
            traits: TraitSet::remote(store).with_collation(implicit_collation),
            table,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    fn implement(&self, builder: &mut QueryBuilder) -> Result<()> {
        builder.set_table(self.table.clone());
        builder.add_select_fields(self.fields.clone());
        Ok(())
    }
}

/// Logical order/limit request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalSort {
    pub input: Arc<PlanNode>,
    pub collation: Collation,
    pub offset: Option<Expr>,
    pub fetch: Option<Expr>,
}

impl LogicalSort {
    pub fn new(
        input: Arc<PlanNode>,
        collation: Collation,
        offset: Option<Expr>,
        fetch: Option<Expr>,
    ) -> Self {
        Self {
            input,
            collation,
            offset,
            fetch,
        }
    }
}

/// Engine-side order/limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalSort {
    pub input: Arc<PlanNode>,
    pub collation: Collation,
    pub offset: Option<Expr>,
    pub fetch: Option<Expr>,
}

impl LocalSort {
    pub fn new(
        input: Arc<PlanNode>,
        collation: Collation,
        offset: Option<Expr>,
        fetch: Option<Expr>,
    ) -> Self {
        Self {
            input,
            collation,
            offset,
            fetch,
        }
    }
}

/// A node in a candidate plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlanNode {
    RemoteScan(RemoteScan),
    LogicalSort(LogicalSort),
    SortPushdown(SortPushdown),
    LocalSort(LocalSort),
}

impl PlanNode {
    pub fn kind(&self) -> PlanNodeKind {
        match self {
            PlanNode::RemoteScan(_) => PlanNodeKind::RemoteScan,
            PlanNode::LogicalSort(_) => PlanNodeKind::LogicalSort,
            PlanNode::SortPushdown(_) => PlanNodeKind::SortPushdown,
            PlanNode::LocalSort(_) => PlanNodeKind::LocalSort,
        }
    }

    pub fn traits(&self) -> TraitSet {
        match self {
            PlanNode::RemoteScan(s) => s.traits.clone(),
            PlanNode::LogicalSort(s) => TraitSet::engine().with_collation(s.collation.clone()),
            PlanNode::LocalSort(s) => TraitSet::engine().with_collation(s.collation.clone()),
            PlanNode::SortPushdown(s) => s.traits().clone(),
        }
    }

    pub fn convention(&self) -> Convention {
        self.traits().convention
    }

    pub fn inputs(&self) -> Vec<&Arc<PlanNode>> {
        match self {
            PlanNode::RemoteScan(_) => vec![],
            PlanNode::LogicalSort(s) => vec![&s.input],
            PlanNode::LocalSort(s) => vec![&s.input],
            PlanNode::SortPushdown(s) => vec![s.input()],
        }
    }

    /// Column names this node produces, resolved through its inputs.
    pub fn row_shape(&self) -> RowShape {
        match self {
            PlanNode::RemoteScan(s) => RowShape::new(s.fields.iter().cloned()),
            PlanNode::LogicalSort(s) => s.input.row_shape(),
            PlanNode::LocalSort(s) => s.input.row_shape(),
            PlanNode::SortPushdown(s) => s.input().row_shape(),
        }
    }

    /// Estimate output statistics from the statistics of this node's input.
    ///
    /// A plan-time limit caps the row count; everything else preserves it.
    pub fn output_stats(&self, input: &Statistics) -> Statistics {
        let fetch = match self {
            PlanNode::RemoteScan(_) => None,
            PlanNode::LogicalSort(s) => s.fetch.as_ref(),
            PlanNode::LocalSort(s) => s.fetch.as_ref(),
            PlanNode::SortPushdown(s) => s.fetch(),
        };
        match fetch.map(literal_limit) {
            Some(Ok(n)) => stats::derive_limit_stats(input, n),
            _ => input.clone(),
        }
    }

    /// Translate this node (and its inputs) into the remote query being built.
    pub fn implement(&self, builder: &mut QueryBuilder) -> Result<()> {
        match self {
            PlanNode::RemoteScan(s) => s.implement(builder),
            PlanNode::SortPushdown(s) => s.implement(builder),
            PlanNode::LogicalSort(_) | PlanNode::LocalSort(_) => {
                Err(PushdownError::NotPushdownCompatible(self.kind().to_string()))
            }
        }
    }

    /// Human-readable plan tree, one node per line.
    pub fn display(&self, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let mut out = match self {
            PlanNode::RemoteScan(s) => format!(
                "{}RemoteScan[{}] {} {:?}\n",
                pad, s.traits.convention, s.table, s.fields
            ),
            PlanNode::LogicalSort(s) => {
                format!("{}LogicalSort {}{}\n", pad, s.collation, fetch_suffix(&s.fetch))
            }
            PlanNode::LocalSort(s) => {
                format!("{}LocalSort {}{}\n", pad, s.collation, fetch_suffix(&s.fetch))
            }
            PlanNode::SortPushdown(s) => format!(
                "{}SortPushdown[{}] {}{}\n",
                pad,
                s.traits().convention,
                s.collation(),
                fetch_suffix(&s.fetch().cloned())
            ),
        };
        for input in self.inputs() {
            out.push_str(&input.display(indent + 1));
        }
        out
    }
}

fn fetch_suffix(fetch: &Option<Expr>) -> String {
    match fetch {
        Some(f) => format!(" fetch={}", f),
        None => String::new(),
    }
}

impl From<RemoteScan> for PlanNode {
    fn from(n: RemoteScan) -> Self {
        PlanNode::RemoteScan(n)
    }
}

impl From<LogicalSort> for PlanNode {
    fn from(n: LogicalSort) -> Self {
        PlanNode::LogicalSort(n)
    }
}

impl From<LocalSort> for PlanNode {
    fn from(n: LocalSort) -> Self {
        PlanNode::LocalSort(n)
    }
}

impl From<SortPushdown> for PlanNode {
    fn from(n: SortPushdown) -> Self {
        PlanNode::SortPushdown(n)
    }
}
