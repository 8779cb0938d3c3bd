//! # Remote Query Builder
//!
//! `QueryBuilder` accumulates the fragments of a single remote statement while
//! a pushed-down subtree is translated bottom-up. Each remote node contributes
//! its part through `PlanNode::implement`:
//!
//! ```text
//! SortPushdown.implement(b)
//!   +-> b.visit_child(input)      RemoteScan sets table and select list
//!   +-> b.add_order([...])        ORDER BY terms, in collation order
//!   +-> b.set_limit("n")          LIMIT token
//! b.build() -> "SELECT id, ts FROM ks.events ORDER BY ts DESC LIMIT 5"
//! ```
//!
//! The builder is owned by whoever drives the translation. Nodes borrow it
//! mutably for the duration of one `implement` call and never keep it.

use crate::error::{PushdownError, Result};
use crate::expr::TableRef;
use crate::plan::PlanNode;
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    table: Option<TableRef>,
    select_fields: Vec<String>,
    order: Vec<String>,
    limit: Option<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a child subtree into this builder.
    pub fn visit_child(&mut self, child: &PlanNode) -> Result<()> {
        trace!(target: "fedx::query", kind = %child.kind(), "Visiting child");
        child.implement(self)
    }

    pub fn set_table(&mut self, table: TableRef) {
        self.table = Some(table);
    }

    pub fn add_select_fields(&mut self, fields: Vec<String>) {
        self.select_fields.extend(fields);
    }

    /// Append ORDER BY terms (`"<col> ASC|DESC"`) after any existing ones.
    pub fn add_order(&mut self, clauses: Vec<String>) {
        self.order.extend(clauses);
    }

    /// Set the LIMIT token, replacing any earlier one.
    pub fn set_limit(&mut self, limit: String) {
        self.limit = Some(limit);
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }

    /// Render the accumulated fragments as one statement.
    pub fn build(&self) -> Result<String> {
        let table = self.table.as_ref().ok_or(PushdownError::MissingTable)?;

        let fields = if self.select_fields.is_empty() {
            "*".to_string()
        } else {
            self.select_fields.join(", ")
        };
        let mut query = format!("SELECT {} FROM {}", fields, table);
        if !self.order.is_empty() {
            query.push_str(" ORDER BY ");
            query.push_str(&self.order.join(", "));
        }
        if let Some(limit) = &self.limit {
            query.push_str(" LIMIT ");
            query.push_str(limit);
        }
        Ok(query)
    }
}
