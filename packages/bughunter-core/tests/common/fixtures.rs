//! Reference scenarios
//!
//! Each fixture is the diff an external differ would emit for a small C
//! change, with every unchanged node mapped.

use super::builders::*;
use bughunter_core::Diff;

/// `if (x) { f(); }`  →  `if (x) { f(); g(); }`
pub fn scenario_a() -> Diff {
    let before = unit(vec![if_then(
        ident("x"),
        block(vec![expr_stmt(call("f", vec![]))]),
    )]);
    let after = unit(vec![if_then(
        ident("x"),
        block(vec![
            expr_stmt(call("f", vec![])),
            expr_stmt(call("g", vec![])),
        ]),
    )]);

    DiffBuilder::new(before.clone(), after)
        .map_same(&paths_of(&before))
        .insert_subtree("0/1/1")
        .build()
}

/// `if (x) foo();`  →  `if (x) foo(); else bar();`
pub fn scenario_b() -> Diff {
    let before = unit(vec![if_then(ident("x"), expr_stmt(call("foo", vec![])))]);
    let after = unit(vec![if_else(
        ident("x"),
        expr_stmt(call("foo", vec![])),
        expr_stmt(call("bar", vec![])),
    )]);

    DiffBuilder::new(before.clone(), after)
        .map_same(&paths_of(&before))
        .insert_subtree("0/2")
        .build()
}

/// `while (x < 10) { f(); }`  →  `while (x < 20) { f(); }`
pub fn scenario_c() -> Diff {
    let program = |bound| {
        unit(vec![while_loop(
            binary(ident("x"), "<", constant(bound)),
            block(vec![expr_stmt(call("f", vec![]))]),
        )])
    };
    let before = program("10");

    DiffBuilder::new(before.clone(), program("20"))
        .map_same(&paths_of(&before))
        .update("0/0/2", "0/0/2")
        .build()
}

/// `foo(a, b);`  →  `foo(a, b, c);`
pub fn scenario_d() -> Diff {
    let program = |args: &[&str]| {
        unit(vec![expr_stmt(call(
            "foo",
            args.iter().map(|a| ident(a)).collect(),
        ))])
    };
    let before = program(&["a", "b"]);

    DiffBuilder::new(before.clone(), program(&["a", "b", "c"]))
        .map_same(&paths_of(&before))
        .insert("0/0/1/2")
        .build()
}

/// `if (x) { s(); }`  →  `s();`
pub fn scenario_e() -> Diff {
    let before = unit(vec![if_then(
        ident("x"),
        block(vec![expr_stmt(call("s", vec![]))]),
    )]);
    let after = unit(vec![expr_stmt(call("s", vec![]))]);

    DiffBuilder::new(before, after)
        .map("/", "/")
        .map("0/1/0", "0")
        .map("0/1/0/0", "0/0")
        .map("0/1/0/0/0", "0/0/0")
        .map("0/1/0/0/1", "0/0/1")
        .delete("0")
        .delete("0/0")
        .delete("0/1")
        .move_node("0/1/0", "0")
        .build()
}

/// Every reference scenario, labelled
pub fn all_scenarios() -> Vec<(&'static str, Diff)> {
    vec![
        ("A", scenario_a()),
        ("B", scenario_b()),
        ("C", scenario_c()),
        ("D", scenario_d()),
        ("E", scenario_e()),
    ]
}
