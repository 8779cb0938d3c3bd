//! # Pushdown Errors
//!
//! Every failure in this crate is local to one candidate plan. A rule that hits
//! one of these errors drops the candidate it was building and the engine keeps
//! the equivalent work (sorting, limiting, offsetting) on its own side. None of
//! them abort planning.

use crate::collation::Direction;
use thiserror::Error;

/// Errors raised while building, copying, costing or translating pushdown nodes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PushdownError {
    /// The store can only order by `ASC` or `DESC`.
    #[error("Unsupported collation direction {direction:?} on field {field_index}")]
    UnsupportedCollationDirection {
        field_index: usize,
        direction: Direction,
    },

    /// The limit is not known at plan time (dynamic parameter, expression).
    #[error("Limit is not a literal: {0}")]
    NonLiteralLimit(String),

    /// The limit is a literal but not a non-negative integer.
    #[error("Invalid limit literal: {0}")]
    InvalidLimit(String),

    /// Offsets stay in the engine.
    #[error("Offset is not supported by sort pushdown")]
    UnsupportedOffset,

    #[error("Field index {index} out of range for row shape of width {width}")]
    FieldIndexOutOfRange { index: usize, width: usize },

    /// A pushdown node and its input must live in the same remote convention.
    #[error("Convention mismatch: node is {node}, input is {input}")]
    ConventionMismatch { node: String, input: String },

    /// `implement` was reached on a node that executes in the engine.
    #[error("Plan node '{0}' cannot be pushed down")]
    NotPushdownCompatible(String),

    #[error("Remote query has no source table")]
    MissingTable,

    #[error("Invalid pushdown configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PushdownError {
    fn from(e: serde_json::Error) -> Self {
        PushdownError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PushdownError>;
