//! # Declarative Pattern Matching for Rules
//!
//! Each rule declares a `Pattern` describing the shape of plan it can handle.
//! The registry checks the pattern before calling `apply()`, so rules never see
//! nodes they do not understand.
//!
//! ## Pattern Language
//!
//! - `Pattern::Operator(matcher, children)`: the node satisfies `matcher` and its
//!   inputs match `children` position by position.
//! - `Pattern::Node(matcher)`: the node satisfies `matcher`; its inputs are not
//!   inspected.
//! - `Pattern::Any`: matches any node. The usual child pattern.
//! - `Pattern::Leaf`: matches nodes without inputs.
//!
//! Matchers test the node kind. Pushdown rules match the scan itself rather
//! than any remote input: a sort already pushed into the store cannot take a
//! second ORDER BY and LIMIT without changing which rows come back.

use crate::plan::{PlanNode, PlanNodeKind};

/// Pattern for matching plan nodes.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Match a node with child patterns.
    Operator(OpMatcher, Vec<Pattern>),
    /// Match a node regardless of its inputs.
    Node(OpMatcher),
    /// Match any subtree.
    Any,
    /// Match a node with no inputs.
    Leaf,
}

/// Matcher for a single node.
#[derive(Debug, Clone)]
pub enum OpMatcher {
    Kind(PlanNodeKind),
}

impl Pattern {
    /// Match a logical sort over any input.
    pub fn sort() -> Self {
        Pattern::Operator(
            OpMatcher::Kind(PlanNodeKind::LogicalSort),
            vec![Pattern::Any],
        )
    }

    /// Match a logical sort directly over a remote scan.
    pub fn sort_over_remote_scan() -> Self {
        Pattern::Operator(
            OpMatcher::Kind(PlanNodeKind::LogicalSort),
            vec![Pattern::Node(OpMatcher::Kind(PlanNodeKind::RemoteScan))],
        )
    }
}

impl OpMatcher {
    fn matches(&self, node: &PlanNode) -> bool {
        match self {
            OpMatcher::Kind(kind) => node.kind() == *kind,
        }
    }
}

/// Check if a plan node matches a pattern.
pub fn matches(node: &PlanNode, pattern: &Pattern) -> bool {
    match pattern {
        Pattern::Any => true,
        Pattern::Leaf => node.inputs().is_empty(),
        Pattern::Node(matcher) => matcher.matches(node),
        Pattern::Operator(matcher, child_patterns) => {
            if !matcher.matches(node) {
                return false;
            }

            let inputs = node.inputs();
            if inputs.len() != child_patterns.len() {
                return false;
            }

            inputs
                .iter()
                .zip(child_patterns.iter())
                .all(|(input, child_pattern)| matches(input, child_pattern))
        }
    }
}
