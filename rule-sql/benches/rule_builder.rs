//! Benchmarks for rule-sql fragment building.
//!
//! Run with: cargo bench -p rule-sql

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rule_sql::{
    Group, Node, Operator, RulePolicy, Rule, is_valid_sql_identifier, mysql, parse_rules,
    postgres, sqlite,
};
use std::hint::black_box;

fn eq(field: &str, v: i64) -> Node {
    Rule::value(field, Operator::Equal, v).into()
}

/// Balanced tree of `depth` levels alternating AND/OR, `width` children per group.
fn balanced(depth: usize, width: usize) -> Node {
    if depth == 0 {
        return eq("col_a", 1);
    }
    let children: Vec<Node> = (0..width).map(|_| balanced(depth - 1, width)).collect();
    if depth % 2 == 0 {
        Group::and(children).into()
    } else {
        Group::or(children).into()
    }
}

// =============================================================================
// Identifier Validation Benchmarks
// =============================================================================

fn bench_identifier_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifier_validation");

    let identifiers = [
        ("short", "id"),
        ("medium", "user_email_address"),
        ("qualified", "public.users.email"),
        ("invalid", "DROP TABLE users--"),
    ];

    for (name, ident) in identifiers {
        group.bench_with_input(BenchmarkId::new("identifier", name), ident, |b, s| {
            b.iter(|| is_valid_sql_identifier(black_box(s)))
        });
    }

    group.finish();
}

// =============================================================================
// Build Benchmarks
// =============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let builder = sqlite();

    let single = eq("status", 1);
    group.bench_function("single_rule", |b| b.iter(|| builder.build(black_box(&single))));

    let flat: Node = Group::and([
        Node::from(Rule::value("age", Operator::Greater, 18)),
        Node::from(Rule::value("status", Operator::Equal, "active")),
        Node::from(Rule::list("role", Operator::In, ["admin", "owner", "member"])),
        Node::from(Rule::value("name", Operator::Contains, "smith")),
        Node::from(Rule::unary("deleted_at", Operator::IsNull)),
    ])
    .into();
    group.bench_function("flat_five_rules", |b| b.iter(|| builder.build(black_box(&flat))));

    for depth in [2, 4, 6] {
        let tree = balanced(depth, 2);
        group.bench_with_input(BenchmarkId::new("balanced", depth), &tree, |b, tree| {
            b.iter(|| builder.build(black_box(tree)))
        });
    }

    group.finish();
}

// =============================================================================
// Dialect Comparison Benchmarks
// =============================================================================

fn bench_dialects(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialects");
    let tree = balanced(3, 3);

    let my = mysql();
    let pg = postgres();
    let lite = sqlite();

    group.bench_function("mysql", |b| b.iter(|| my.build(black_box(&tree))));
    group.bench_function("postgres", |b| b.iter(|| pg.build(black_box(&tree))));
    group.bench_function("sqlite", |b| b.iter(|| lite.build(black_box(&tree))));

    group.finish();
}

// =============================================================================
// Policy Benchmarks
// =============================================================================

fn bench_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy");

    let policy = RulePolicy::new().allow_fields(&["col_a", "status", "age", "email"]);
    let tree = balanced(4, 3);
    group.bench_function("validate_tree", |b| {
        b.iter(|| policy.validate_tree(black_box(&tree)))
    });

    let denied = eq("password", 1);
    group.bench_function("validate_denied_field", |b| {
        b.iter(|| policy.validate_tree(black_box(&denied)))
    });

    group.finish();
}

// =============================================================================
// Injection Rejection Benchmarks
// =============================================================================

fn bench_injection(c: &mut Criterion) {
    let mut group = c.benchmark_group("injection");
    let builder = mysql();

    let fields = [
        ("clean", "customer_reference_number"),
        ("token", "id; DROP TABLE users"),
        ("keyword", "x union select password"),
        ("keyword_substring", "order_updated_selection"),
    ];

    for (name, field) in fields {
        let node = eq(field, 1);
        group.bench_with_input(BenchmarkId::new("field", name), &node, |b, node| {
            b.iter(|| builder.build(black_box(node)))
        });
    }

    group.finish();
}

// =============================================================================
// JSON Parsing Benchmarks (Real-world payloads)
// =============================================================================

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");

    let payload = r#"{
        "condition": "AND",
        "rules": [
            {"id": "price", "field": "price", "type": "double", "operator": "less", "value": 10.25},
            {"condition": "OR", "rules": [
                {"id": "category", "field": "category", "type": "integer",
                 "operator": "equal", "value": 2},
                {"id": "category", "field": "category", "type": "integer",
                 "operator": "in", "value": [1, 3, 5]}
            ]},
            {"id": "name", "field": "name", "type": "string",
             "operator": "begins_with", "value": "Jo"}
        ]
    }"#;

    group.bench_function("parse", |b| b.iter(|| parse_rules(black_box(payload))));

    let builder = postgres();
    group.bench_function("parse_and_build", |b| {
        b.iter(|| builder.build_json(black_box(payload)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_identifier_validation,
    bench_build,
    bench_dialects,
    bench_policy,
    bench_injection,
    bench_json,
);
criterion_main!(benches);
