//! # Pushdown Configuration
//!
//! Switches that decide which pushdown candidates the rules generate. They never
//! change how a candidate is costed or translated.
//!
//! ```json
//! { "enable_sort_pushdown": true, "enable_limit_pushdown": false, "store": "cassandra" }
//! ```
//!
//! Missing fields take their defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushdownConfig {
    /// Generate remote candidates for sorts with a non-empty collation.
    pub enable_sort_pushdown: bool,
    /// Generate remote candidates for limits without ordering.
    pub enable_limit_pushdown: bool,
    /// Store name used to select store-specific rule sets.
    pub store: Option<String>,
}

impl Default for PushdownConfig {
    fn default() -> Self {
        Self {
            enable_sort_pushdown: true,
            enable_limit_pushdown: true,
            store: None,
        }
    }
}

impl PushdownConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
