//! # Rule System
//!
//! Rules turn a logical plan node into candidate physical nodes. Each rule
//! declares a `Pattern`; the registry only hands it nodes that match. A rule
//! may return zero, one or several candidates; an empty result means "not
//! applicable here", which is how an unsupported pushdown is expressed.
//!
//! Every rule here is an implementation rule: it maps a logical node to
//! physical candidates (e.g. `LogicalSort` to `SortPushdown` or `LocalSort`).
//! The caller costs each candidate and keeps the cheapest.
//!
//! ## Rule Registry
//!
//! The `RuleRegistry` holds base rules plus named rule sets for specific
//! stores. `PushdownConfig::store` selects which store set is active.

use crate::config::PushdownConfig;
use crate::pattern::{matches, Pattern};
use crate::plan::PlanNode;
use std::collections::HashMap;
use tracing::trace;

/// Context passed to rules during application.
pub struct OptContext<'a> {
    pub config: &'a PushdownConfig,
}

/// A rule implements logical plan nodes.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;

    fn pattern(&self) -> Pattern;

    /// Apply the rule to a matching node, producing candidate nodes.
    fn apply(&self, node: &PlanNode, ctx: &OptContext) -> Vec<PlanNode>;
}

/// A named set of rules (e.g., for a specific store).
pub struct RuleSet {
    pub name: String,
    pub rules: Vec<Box<dyn Rule>>,
}

/// Registry of rules.
pub struct RuleRegistry {
    pub base_rules: Vec<Box<dyn Rule>>,
    pub store_rules: HashMap<String, RuleSet>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            base_rules: Vec::new(),
            store_rules: HashMap::new(),
        }
    }

    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.base_rules.push(rule);
    }

    pub fn add_store_rule_set(&mut self, name: impl Into<String>, rule_set: RuleSet) {
        self.store_rules.insert(name.into(), rule_set);
    }

    /// Get all active rules for a given store.
    pub fn active_rules(&self, store: Option<&str>) -> Vec<&dyn Rule> {
        let mut rules: Vec<&dyn Rule> = self.base_rules.iter().map(|r| r.as_ref()).collect();
        if let Some(store) = store {
            if let Some(rs) = self.store_rules.get(store) {
                rules.extend(rs.rules.iter().map(|r| r.as_ref()));
            }
        }
        rules
    }

    /// Apply every matching rule to `node` and collect the candidates, in
    /// registration order.
    pub fn implement(&self, node: &PlanNode, ctx: &OptContext) -> Vec<PlanNode> {
        let mut candidates = Vec::new();
        for rule in self.active_rules(ctx.config.store.as_deref()) {
            if !matches(node, &rule.pattern()) {
                continue;
            }
            let produced = rule.apply(node, ctx);
            trace!(
                target: "fedx::rule",
                rule = rule.name(),
                candidates = produced.len(),
                "Applied implementation rule"
            );
            candidates.extend(produced);
        }
        candidates
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
