//! # Scalar Expressions
//!
//! The pushdown operators only need a thin slice of scalar expressions: enough
//! to tell a plan-time literal (`LIMIT 10`) apart from a value that is only known
//! at execution time (`LIMIT ?`, `LIMIT ? + 1`). Expressions are never evaluated
//! here; they are inspected and rendered.
//!
//! Sort keys refer to fields by position, not through `Expr`. Names are
//! resolved against the input row shape at translation time.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to a table in a remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub keyspace: String,
    pub name: String,
}

impl TableRef {
    pub fn new(keyspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyspace: keyspace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.keyspace, self.name)
    }
}

/// Scalar value for literals.
///
/// Uses `OrderedFloat` for `f64` so that plan nodes holding literals can be
/// compared and hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScalarValue {
    /// SQL NULL value.
    Null,
    Bool(bool),
    Int64(i64),
    Float64(OrderedFloat<f64>),
    Utf8(String),
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float64(a), Self::Float64(b)) => a == b,
            (Self::Utf8(a), Self::Utf8(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Int64(v) => v.hash(state),
            Self::Float64(v) => v.hash(state),
            Self::Utf8(v) => v.hash(state),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::Float64(v) => write!(f, "{}", v),
            Self::Utf8(v) => write!(f, "'{}'", v),
        }
    }
}

/// Scalar expressions appearing in sort/limit nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    /// Constant known at plan time.
    Literal(ScalarValue),
    /// Placeholder bound at execution time (`?`).
    DynamicParam(usize),
    /// Binary arithmetic (e.g. `? + 10`).
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: ScalarValue) -> Self {
        Expr::Literal(value)
    }

    /// Shorthand for an integer literal, the common shape of `LIMIT n`.
    pub fn int(value: i64) -> Self {
        Expr::Literal(ScalarValue::Int64(value))
    }

    /// The literal value of this expression, if it is statically known.
    pub fn as_literal(&self) -> Option<&ScalarValue> {
        match self {
            Expr::Literal(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::DynamicParam(i) => write!(f, "?{}", i),
            Expr::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

/// Arithmetic operators that may show up in a limit expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_literal() {
        assert_eq!(Expr::int(10).as_literal(), Some(&ScalarValue::Int64(10)));
        assert!(Expr::DynamicParam(0).as_literal().is_none());

        let sum = Expr::BinaryOp {
            op: BinaryOp::Add,
            left: Box::new(Expr::DynamicParam(0)),
            right: Box::new(Expr::int(1)),
        };
        assert!(sum.as_literal().is_none());
        assert_eq!(sum.to_string(), "(?0 + 1)");
    }

    #[test]
    fn test_float_literals_hash_consistently() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Expr::literal(ScalarValue::Float64(OrderedFloat(1.5))));
        assert!(set.contains(&Expr::literal(ScalarValue::Float64(OrderedFloat(1.5)))));
    }
}
