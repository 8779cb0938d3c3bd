//! # Built-in Rules
//!
//! Implementation rules producing the physical alternatives for a logical sort:
//!
//! - **`SortPushdownRule`**: orders and limits inside the remote store that
//!   produces the sort's input (`SortPushdown`).
//! - **`ImplLocalSortRule`**: orders and limits in the engine (`LocalSort`).
//!   Always applicable.
//!
//! The search costs both and keeps the cheaper; the pushdown pricing makes the
//! remote alternative win whenever it exists.

pub mod enforcer;
pub mod sort_pushdown;

use fedx_core::rule::RuleRegistry;

/// Create a rule registry with all built-in rules.
///
/// The configuration is not consulted here; rules read it from `OptContext`
/// when they fire, so one registry serves any configuration.
pub fn default_rule_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();

    // Pushdown first so its candidate is listed ahead of the fallback.
    registry.add_rule(Box::new(sort_pushdown::SortPushdownRule));
    registry.add_rule(Box::new(enforcer::ImplLocalSortRule));

    registry
}
