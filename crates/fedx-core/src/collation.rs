//! # Collations
//!
//! A collation is an ordered list of sort keys: the first entry is the primary
//! key, the second breaks ties in the first, and so on. Entries reference input
//! fields by position, never by name, so a collation stays valid when the input
//! is swapped for an equivalent one with the same row shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested direction of a sort key.
///
/// Remote stores generally only understand plain ascending and descending
/// order. The strict and clustered variants exist so that a collation coming
/// from the engine can be represented faithfully and rejected by translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
    /// Ascending with no duplicate values.
    StrictlyAscending,
    /// Descending with no duplicate values.
    StrictlyDescending,
    /// Equal values are adjacent but groups have no defined order.
    Clustered,
}

impl Direction {
    /// Short label used in plan displays.
    pub fn shortcut(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
            Direction::StrictlyAscending => "SASC",
            Direction::StrictlyDescending => "SDESC",
            Direction::Clustered => "CLU",
        }
    }
}

/// One sort key: a field position plus its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldCollation {
    pub field_index: usize,
    pub direction: Direction,
}

impl FieldCollation {
    pub fn new(field_index: usize, direction: Direction) -> Self {
        Self {
            field_index,
            direction,
        }
    }

    pub fn asc(field_index: usize) -> Self {
        Self::new(field_index, Direction::Ascending)
    }

    pub fn desc(field_index: usize) -> Self {
        Self::new(field_index, Direction::Descending)
    }
}

/// Ordered list of sort keys. May be empty (no ordering requested).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collation {
    keys: Vec<FieldCollation>,
}

impl Collation {
    pub fn new(keys: Vec<FieldCollation>) -> Self {
        Self { keys }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn field_collations(&self) -> &[FieldCollation] {
        &self.keys
    }
}

impl From<Vec<FieldCollation>> for Collation {
    fn from(keys: Vec<FieldCollation>) -> Self {
        Self::new(keys)
    }
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "${} {}", key.field_index, key.direction.shortcut())?;
        }
        write!(f, "]")
    }
}
