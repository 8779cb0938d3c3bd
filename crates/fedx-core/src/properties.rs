//! # Physical Traits
//!
//! Every plan node carries a `TraitSet` describing *where* it runs and *how* its
//! output is ordered.
//!
//! ## Convention
//!
//! The convention says which execution engine produces the node's rows:
//! - **Engine**: the general-purpose local engine.
//! - **Remote(store)**: the named remote store. A remote node can be translated
//!   into that store's query language; an engine node cannot.
//!
//! A pushdown node must have the same remote convention as its input. Mixing
//! conventions would mean asking the store to operate on rows it never
//! produced.
//!
//! ## Collation
//!
//! The collation trait is the ordering the node's output is known to satisfy.
//! For a remote scan this is the store's native row order (its implicit
//! collation); for a sort it is the requested order.

use crate::collation::Collation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution convention of a plan node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    #[default]
    Engine,
    Remote(String),
}

impl Convention {
    pub fn remote(store: impl Into<String>) -> Self {
        Convention::Remote(store.into())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Convention::Remote(_))
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Engine => write!(f, "ENGINE"),
            Convention::Remote(s) => write!(f, "REMOTE({})", s),
        }
    }
}

/// Physical traits of a plan node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitSet {
    pub convention: Convention,
    pub collation: Collation,
}

impl TraitSet {
    pub fn engine() -> Self {
        Self::default()
    }

    pub fn remote(store: impl Into<String>) -> Self {
        Self {
            convention: Convention::remote(store),
            collation: Collation::empty(),
        }
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::FieldCollation;

    #[test]
    fn test_trait_set_builders() {
        let t = TraitSet::remote("cassandra").with_collation(Collation::new(vec![
            FieldCollation::asc(0),
        ]));
        assert_eq!(t.convention, Convention::remote("cassandra"));
        assert_eq!(t.collation.len(), 1);
        assert!(!TraitSet::engine().convention.is_remote());
        assert_eq!(t.convention.to_string(), "REMOTE(cassandra)");
    }
}
