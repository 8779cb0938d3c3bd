//! # fedx-core: Sort/Limit Pushdown for a Federated Optimizer
//!
//! This crate decides how an "order rows, optionally keep the first N" step is
//! costed and translated when it is pushed into a remote data store instead of
//! being executed by the local engine.
//!
//! ## Module Overview
//!
//! - **`sort_pushdown`**: the `SortPushdown` plan node and the
//!   `SortPushdownPlanner` strategy (cost adjustment, copy, translation).
//! - **`plan`**: immutable plan nodes as a tagged enum (`PlanNode`).
//! - **`query`**: `QueryBuilder`, the remote statement being assembled.
//! - **`cost`**: `Cost` and the baseline `CostModel`.
//! - **`collation`**: sort keys and directions.
//! - **`properties`**: conventions and trait sets.
//! - **`expr`**: scalar literals and expressions used by limits.
//! - **`stats`**: row count and size estimates.
//! - **`rule`** / **`pattern`**: rule trait, registry and pattern matching.
//! - **`config`**: `PushdownConfig`.
//! - **`error`**: `PushdownError`.

pub mod collation;
pub mod config;
pub mod cost;
pub mod error;
pub mod expr;
pub mod pattern;
pub mod plan;
pub mod properties;
pub mod query;
pub mod rule;
pub mod sort_pushdown;
pub mod stats;

pub use error::{PushdownError, Result};
