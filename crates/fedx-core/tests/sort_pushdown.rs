//! End-to-end tests for sort/limit pushdown.
//!
//! These tests build small plans over a remote `events` table, run the
//! built-in rules, cost the candidates and translate the winner into a remote
//! statement.
//!
//! ## What These Tests Verify
//! - The cost policy (discount, pass-through, free limit) against any baseline
//! - ORDER BY / LIMIT translation keeps key order and rejects what the store
//!   cannot express
//! - Copies keep their collations and translate identically
//! - Rules prefer the pushed sort and fall back to the engine when they must
//! - Nodes can be shared across planning threads

use fedx_core::collation::{Collation, Direction, FieldCollation};
use fedx_core::config::PushdownConfig;
use fedx_core::cost::{Cost, CostModel, DefaultCostModel};
use fedx_core::error::PushdownError;
use fedx_core::expr::{Expr, TableRef};
use fedx_core::plan::{LogicalSort, PlanNode, PlanNodeKind, RemoteScan, RowShape};
use fedx_core::properties::TraitSet;
use fedx_core::query::QueryBuilder;
use fedx_core::rule::OptContext;
use fedx_core::sort_pushdown::{OrderSpec, SortPushdown, SortPushdownPlanner};
use fedx_core::stats::Statistics;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fedx=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Baseline model that prices every node the same.
struct FixedCostModel(f64);

impl CostModel for FixedCostModel {
    fn compute_cost(&self, _node: &PlanNode, _input_stats: &Statistics) -> Cost {
        Cost::new(self.0)
    }
}

fn events_scan() -> Arc<PlanNode> {
    Arc::new(
        RemoteScan::new(
            "cassandra",
            TableRef::new("ks", "events"),
            ["id", "ts"],
            Collation::new(vec![FieldCollation::asc(0)]),
        )
        .into(),
    )
}

fn pushdown(input: Arc<PlanNode>, collation: Collation, fetch: Option<Expr>) -> SortPushdown {
    let input_traits = input.traits();
    SortPushdown::try_new(
        TraitSet {
            convention: input_traits.convention,
            collation: collation.clone(),
        },
        input,
        collation,
        input_traits.collation,
        fetch,
    )
    .unwrap()
}

fn logical_sort(collation: Collation, offset: Option<Expr>, fetch: Option<Expr>) -> PlanNode {
    LogicalSort::new(events_scan(), collation, offset, fetch).into()
}

fn candidates(node: &PlanNode, config: &PushdownConfig) -> Vec<PlanNode> {
    let registry = fedx_rules::default_rule_registry();
    let ctx = OptContext { config };
    registry.implement(node, &ctx)
}

fn self_cost(node: &PlanNode, model: &dyn CostModel, stats: &Statistics) -> Cost {
    match node {
        PlanNode::SortPushdown(s) => s.compute_self_cost(model, stats),
        other => model.compute_cost(other, stats),
    }
}

// ===========================================================================
// Cost policy
// ===========================================================================

#[test]
fn test_ordered_cost_is_five_percent_of_baseline() {
    let collation = Collation::new(vec![FieldCollation::desc(1)]);
    for baseline in [1.0, 100.0, 12_345.0] {
        for fetch in [None, Some(Expr::int(5)), Some(Expr::DynamicParam(0))] {
            let cost = SortPushdownPlanner.estimate_cost(
                Cost::new(baseline),
                &collation,
                fetch.as_ref(),
            );
            assert_eq!(cost, Cost::new(baseline).multiply_by(0.05));
        }
    }
}

#[test]
fn test_unordered_unlimited_cost_is_identity() {
    for baseline in [0.0, 7.5, 1e12] {
        let cost = SortPushdownPlanner.estimate_cost(Cost::new(baseline), &Collation::empty(), None);
        assert_eq!(cost, Cost::new(baseline));
    }
}

#[test]
fn test_unordered_limited_cost_is_zero() {
    for baseline in [0.0, 7.5, 1e12] {
        let cost = SortPushdownPlanner.estimate_cost(
            Cost::new(baseline),
            &Collation::empty(),
            Some(&Expr::int(10)),
        );
        assert_eq!(cost, Cost::zero());
    }
}

// ===========================================================================
// Translation
// ===========================================================================

#[test]
fn test_translation_keeps_collation_order() {
    let collation = Collation::new(vec![FieldCollation::desc(1), FieldCollation::asc(0)]);
    let spec = SortPushdownPlanner
        .translate(&RowShape::new(["a", "b", "c"]), &collation, None)
        .unwrap();
    assert_eq!(spec.ordered_clauses, vec!["b DESC", "a ASC"]);
}

#[test]
fn test_empty_collation_with_limit() {
    let spec = SortPushdownPlanner
        .translate(&RowShape::new(["a", "b", "c"]), &Collation::empty(), Some(&Expr::int(10)))
        .unwrap();
    assert!(spec.ordered_clauses.is_empty());
    assert_eq!(spec.limit_text.as_deref(), Some("10"));

    let err = SortPushdownPlanner
        .translate(
            &RowShape::new(["a"]),
            &Collation::empty(),
            Some(&Expr::DynamicParam(0)),
        )
        .unwrap_err();
    assert!(matches!(err, PushdownError::NonLiteralLimit(_)));
}

#[test]
fn test_reconstruct_with_offset_always_fails() {
    let node = pushdown(
        events_scan(),
        Collation::new(vec![FieldCollation::desc(1)]),
        Some(Expr::int(5)),
    );
    let traits = [TraitSet::remote("cassandra"), TraitSet::engine()];
    for t in traits {
        let err = SortPushdownPlanner
            .reconstruct(
                &node,
                t,
                events_scan(),
                &Collation::empty(),
                Some(&Expr::int(1)),
                None,
            )
            .unwrap_err();
        assert_eq!(err, PushdownError::UnsupportedOffset);
    }
}

#[test]
fn test_copy_translates_like_the_original() {
    let node = pushdown(
        events_scan(),
        Collation::new(vec![FieldCollation::desc(1), FieldCollation::asc(0)]),
        Some(Expr::int(20)),
    );
    let copy = node
        .copy(
            node.traits().clone(),
            events_scan(),
            node.collation(),
            None,
            node.fetch().cloned(),
        )
        .unwrap();
    assert_eq!(copy, node);

    let translate = |n: &SortPushdown| -> OrderSpec {
        SortPushdownPlanner
            .translate(&n.input().row_shape(), n.collation(), n.fetch())
            .unwrap()
    };
    assert_eq!(translate(&node), translate(&copy));
}

// ===========================================================================
// End to end: events ORDER BY ts DESC LIMIT 5
// ===========================================================================

#[test]
fn test_events_latest_five() {
    init_tracing();

    let node = pushdown(
        events_scan(),
        Collation::new(vec![FieldCollation::desc(1)]),
        Some(Expr::int(5)),
    );
    let stats = Statistics::new(1000.0, 100_000.0);

    let cost = node.compute_self_cost(&FixedCostModel(100.0), &stats);
    assert_eq!(cost, Cost::new(5.0));

    let spec = SortPushdownPlanner
        .translate(&node.input().row_shape(), node.collation(), node.fetch())
        .unwrap();
    assert_eq!(
        spec,
        OrderSpec {
            ordered_clauses: vec!["ts DESC".into()],
            limit_text: Some("5".into()),
        }
    );

    let mut builder = QueryBuilder::new();
    PlanNode::SortPushdown(node).implement(&mut builder).unwrap();
    assert_eq!(
        builder.build().unwrap(),
        "SELECT id, ts FROM ks.events ORDER BY ts DESC LIMIT 5"
    );
}

// ===========================================================================
// Rules
// ===========================================================================

#[test]
fn test_rules_prefer_pushed_sort() {
    init_tracing();

    let sort = logical_sort(
        Collation::new(vec![FieldCollation::desc(1)]),
        None,
        Some(Expr::int(5)),
    );
    let out = candidates(&sort, &PushdownConfig::default());
    let kinds: Vec<_> = out.iter().map(PlanNode::kind).collect();
    assert_eq!(kinds, vec![PlanNodeKind::SortPushdown, PlanNodeKind::LocalSort]);

    let model = DefaultCostModel::default();
    let stats = Statistics::new(1_000_000.0, 100_000_000.0);
    let best = out
        .iter()
        .min_by(|a, b| {
            self_cost(a, &model, &stats)
                .partial_cmp(&self_cost(b, &model, &stats))
                .unwrap()
        })
        .unwrap();
    assert_eq!(best.kind(), PlanNodeKind::SortPushdown);

    let PlanNode::SortPushdown(pushed) = best else {
        unreachable!()
    };
    assert_eq!(pushed.implicit_collation(), &Collation::new(vec![FieldCollation::asc(0)]));
    assert_eq!(pushed.traits().collation, *pushed.collation());
}

#[test]
fn test_pushed_limit_beats_every_positive_cost() {
    let sort = logical_sort(Collation::empty(), None, Some(Expr::int(10)));
    let model = DefaultCostModel::default();
    let stats = Statistics::new(10.0, 1000.0);

    let out = candidates(&sort, &PushdownConfig::default());
    let pushed = out
        .iter()
        .find(|n| n.kind() == PlanNodeKind::SortPushdown)
        .unwrap();
    let local = out
        .iter()
        .find(|n| n.kind() == PlanNodeKind::LocalSort)
        .unwrap();
    assert!(self_cost(pushed, &model, &stats).is_zero());
    assert!(self_cost(local, &model, &stats) > Cost::zero());
}

#[test]
fn test_rules_fall_back_to_local_sort() {
    init_tracing();
    let config = PushdownConfig::default();

    let with_offset = logical_sort(
        Collation::new(vec![FieldCollation::asc(0)]),
        Some(Expr::int(10)),
        Some(Expr::int(5)),
    );
    let dynamic_limit = logical_sort(Collation::empty(), None, Some(Expr::DynamicParam(0)));
    let clustered = logical_sort(
        Collation::new(vec![FieldCollation::new(1, Direction::Clustered)]),
        None,
        None,
    );

    for sort in [with_offset, dynamic_limit, clustered] {
        let kinds: Vec<_> = candidates(&sort, &config).iter().map(PlanNode::kind).collect();
        assert_eq!(kinds, vec![PlanNodeKind::LocalSort]);
    }
}

#[test]
fn test_sort_over_pushed_sort_stays_local() {
    init_tracing();

    // Latest five events by ts, then re-sorted by id with a wider limit.
    let latest_five: Arc<PlanNode> = Arc::new(
        pushdown(
            events_scan(),
            Collation::new(vec![FieldCollation::desc(1)]),
            Some(Expr::int(5)),
        )
        .into(),
    );
    let outer: PlanNode = LogicalSort::new(
        latest_five.clone(),
        Collation::new(vec![FieldCollation::asc(0)]),
        None,
        Some(Expr::int(10)),
    )
    .into();

    let out = candidates(&outer, &PushdownConfig::default());
    let kinds: Vec<_> = out.iter().map(PlanNode::kind).collect();
    assert_eq!(kinds, vec![PlanNodeKind::LocalSort]);

    // The inner statement is still emitted on its own, unchanged.
    let PlanNode::LocalSort(local) = &out[0] else {
        unreachable!()
    };
    assert!(Arc::ptr_eq(&local.input, &latest_five));
    let mut builder = QueryBuilder::new();
    local.input.implement(&mut builder).unwrap();
    assert_eq!(
        builder.build().unwrap(),
        "SELECT id, ts FROM ks.events ORDER BY ts DESC LIMIT 5"
    );
}

#[test]
fn test_config_disables_pushdown_kinds() {
    let config = PushdownConfig::from_json(r#"{"enable_sort_pushdown": false}"#).unwrap();
    let ordered = logical_sort(Collation::new(vec![FieldCollation::asc(0)]), None, None);
    let limited = logical_sort(Collation::empty(), None, Some(Expr::int(3)));

    let kinds: Vec<_> = candidates(&ordered, &config).iter().map(PlanNode::kind).collect();
    assert_eq!(kinds, vec![PlanNodeKind::LocalSort]);
    let kinds: Vec<_> = candidates(&limited, &config).iter().map(PlanNode::kind).collect();
    assert_eq!(kinds, vec![PlanNodeKind::SortPushdown, PlanNodeKind::LocalSort]);

    let config = PushdownConfig::from_json(r#"{"enable_limit_pushdown": false}"#).unwrap();
    let kinds: Vec<_> = candidates(&limited, &config).iter().map(PlanNode::kind).collect();
    assert_eq!(kinds, vec![PlanNodeKind::LocalSort]);
}

#[test]
fn test_display_shows_pushed_plan() {
    let node: PlanNode = pushdown(
        events_scan(),
        Collation::new(vec![FieldCollation::desc(1)]),
        Some(Expr::int(5)),
    )
    .into();
    let text = node.display(0);
    assert!(text.starts_with("SortPushdown[REMOTE(cassandra)] [$1 DESC] fetch=5\n"));
    assert!(text.contains("  RemoteScan[REMOTE(cassandra)] ks.events"));
}

// ===========================================================================
// Concurrency
// ===========================================================================

#[test]
fn test_nodes_are_shared_across_threads() {
    let node = Arc::new(pushdown(
        events_scan(),
        Collation::new(vec![FieldCollation::desc(1), FieldCollation::asc(0)]),
        Some(Expr::int(5)),
    ));

    let specs: Vec<OrderSpec> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let node = Arc::clone(&node);
                scope.spawn(move || {
                    let cost = node.compute_self_cost(&FixedCostModel(100.0), &Statistics::new(1.0, 1.0));
                    assert_eq!(cost, Cost::new(5.0));
                    SortPushdownPlanner
                        .translate(&node.input().row_shape(), node.collation(), node.fetch())
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(specs.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(specs[0].ordered_clauses, vec!["ts DESC", "id ASC"]);
}
