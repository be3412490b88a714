//! Statement Executor (spec.md §4.4): executes a statement list in order,
//! threading `Flow` as an explicit return value in place of exceptions -
//! the non-local-control-flow strategy spec.md §9 calls for.

use crate::assign::write_simple;
use crate::context::Frame;
use crate::eval::{eval, values_equal};
use iecst_ast::{CaseLabel, Expr, Stmt};
use iecst_core::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return,
}

/// Executes a statement list, stopping early on any non-`Normal` flow so
/// the caller (a loop body, an IF branch, a POU's top level) can decide
/// what that flow means at its own scope.
pub fn exec_block(stmts: &[Stmt], frame: &mut Frame) -> Flow {
    for stmt in stmts {
        match exec_stmt(stmt, frame) {
            Flow::Normal => {}
            other => return other,
        }
    }
    Flow::Normal
}

fn exec_stmt(stmt: &Stmt, frame: &mut Frame) -> Flow {
    match stmt {
        Stmt::Assign { target, value } => {
            exec_assign(target, value, frame);
            Flow::Normal
        }
        Stmt::If { branches, else_branch } => exec_if(branches, else_branch, frame),
        Stmt::Case {
            selector,
            arms,
            else_branch,
        } => exec_case(selector, arms, else_branch, frame),
        Stmt::For {
            var,
            start,
            end,
            step,
            body,
        } => exec_for(var, start, end, step, body, frame),
        Stmt::While { cond, body } => exec_while(cond, body, frame),
        Stmt::Repeat { body, cond } => exec_repeat(body, cond, frame),
        Stmt::Exit => Flow::Break,
        Stmt::Continue => Flow::Continue,
        Stmt::Return => Flow::Return,
        Stmt::FbCall { name, args } => {
            crate::call::call_statement(name, args, frame);
            Flow::Normal
        }
        Stmt::ExprStmt(expr) => {
            eval(expr, frame);
            Flow::Normal
        }
    }
}

/// `target := expr`. A plain name routes through the registry; an FB field
/// target (`inst.field := …`) is always a silent no-op - outputs are owned
/// by the FB, and inputs are only writable through call-binding (spec.md
/// §4.4).
fn exec_assign(target: &Expr, value: &Expr, frame: &mut Frame) {
    let v = eval(value, frame);
    match target {
        Expr::Identifier(name) => write_simple(name, v, frame.store, frame.registry),
        Expr::MemberAccess { .. } => {
            tracing::warn!("assignment into an FB field ignored; use call-binding");
        }
        _ => {
            tracing::warn!("assignment target is not an identifier or member access; ignored");
        }
    }
}

fn exec_if(branches: &[(Expr, Vec<Stmt>)], else_branch: &Option<Vec<Stmt>>, frame: &mut Frame) -> Flow {
    for (cond, body) in branches {
        if eval(cond, frame).as_bool().unwrap_or(false) {
            return exec_block(body, frame);
        }
    }
    if let Some(body) = else_branch {
        return exec_block(body, frame);
    }
    Flow::Normal
}

fn exec_case(
    selector: &Expr,
    arms: &[iecst_ast::CaseArm],
    else_branch: &Option<Vec<Stmt>>,
    frame: &mut Frame,
) -> Flow {
    let selector_value = eval(selector, frame);
    for arm in arms {
        if arm.labels.iter().any(|label| case_label_matches(label, &selector_value, frame)) {
            return exec_block(&arm.body, frame);
        }
    }
    if let Some(body) = else_branch {
        return exec_block(body, frame);
    }
    Flow::Normal
}

fn case_label_matches(label: &CaseLabel, selector: &Value, frame: &mut Frame) -> bool {
    match label {
        CaseLabel::Const(expr) => values_equal(&eval(expr, frame), selector),
        CaseLabel::Range(lo, hi) => {
            let lo_v = eval(lo, frame).as_f64();
            let hi_v = eval(hi, frame).as_f64();
            let sel_v = selector.as_f64();
            match (lo_v, hi_v, sel_v) {
                (Some(lo), Some(hi), Some(sel)) => {
                    let (min, max) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                    sel >= min && sel <= max
                }
                _ => false,
            }
        }
    }
}

fn exec_for(
    var: &str,
    start: &Expr,
    end: &Expr,
    step: &Option<Expr>,
    body: &[Stmt],
    frame: &mut Frame,
) -> Flow {
    let start_v = eval(start, frame).floor_to_int();
    let end_v = eval(end, frame).floor_to_int();
    let step_v = step.as_ref().map(|e| eval(e, frame).floor_to_int()).unwrap_or(1);

    if step_v == 0 {
        tracing::debug!(var, "FOR step is 0; zero iterations");
        return Flow::Normal;
    }

    let ascending = step_v > 0;
    let mut i = start_v;
    loop {
        let in_range = if ascending { i <= end_v } else { i >= end_v };
        if !in_range {
            break;
        }
        frame.store.set_int(var, i);
        match exec_block(body, frame) {
            Flow::Break => break,
            Flow::Return => return Flow::Return,
            Flow::Continue | Flow::Normal => {}
        }
        i += step_v;
    }
    // Post-loop value is `end + step` on normal completion (spec.md §4.4);
    // on an EXIT-triggered break, `i` holds the value it had when the body
    // broke out, not yet advanced.
    frame.store.set_int(var, i);
    Flow::Normal
}

fn exec_while(cond: &Expr, body: &[Stmt], frame: &mut Frame) -> Flow {
    let mut iterations: u32 = 0;
    while eval(cond, frame).as_bool().unwrap_or(false) {
        if iterations >= frame.config.loop_safety_cap {
            tracing::warn!(cap = frame.config.loop_safety_cap, "WHILE loop runaway; terminated");
            break;
        }
        match exec_block(body, frame) {
            Flow::Break => break,
            Flow::Return => return Flow::Return,
            Flow::Continue | Flow::Normal => {}
        }
        iterations += 1;
    }
    Flow::Normal
}

fn exec_repeat(body: &[Stmt], cond: &Expr, frame: &mut Frame) -> Flow {
    let mut iterations: u32 = 0;
    loop {
        match exec_block(body, frame) {
            Flow::Break => break,
            Flow::Return => return Flow::Return,
            Flow::Continue | Flow::Normal => {}
        }
        iterations += 1;
        if eval(cond, frame).as_bool().unwrap_or(false) {
            break;
        }
        if iterations >= frame.config.loop_safety_cap {
            tracing::warn!(cap = frame.config.loop_safety_cap, "REPEAT loop runaway; terminated");
            break;
        }
    }
    Flow::Normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::registry::TypeRegistry;
    use crate::store::VariableStore;
    use iecst_ast::{AstProgram, BinaryOp, CaseArm, CaseLabel};

    fn run(stmts: &[Stmt]) -> VariableStore {
        let ast = AstProgram::default();
        let config = RuntimeConfig::default();
        let mut store = VariableStore::new();
        store.set_int("sum", 0);
        store.set_int("i", 0);
        store.set_int("r", 0);
        let mut registry = TypeRegistry::new();
        registry.insert("sum", crate::registry::DeclaredType::Int);
        registry.insert("i", crate::registry::DeclaredType::Int);
        registry.insert("r", crate::registry::DeclaredType::Int);
        let mut frame = Frame::new(&mut store, &registry, &ast, &config);
        exec_block(stmts, &mut frame);
        store
    }

    #[test]
    fn for_loop_sums_one_to_ten() {
        let body = vec![Stmt::assign(
            Expr::ident("sum"),
            Expr::bin(BinaryOp::Add, Expr::ident("sum"), Expr::ident("i")),
        )];
        let stmts = vec![Stmt::for_loop("i", Expr::int(1), Expr::int(10), None, body)];
        let store = run(&stmts);
        assert_eq!(store.get_int("sum"), 55);
    }

    #[test]
    fn for_loop_post_value_is_end_plus_step() {
        let stmts = vec![Stmt::for_loop("i", Expr::int(1), Expr::int(10), None, vec![])];
        let store = run(&stmts);
        assert_eq!(store.get_int("i"), 11);
    }

    #[test]
    fn for_loop_step_zero_runs_zero_times() {
        let body = vec![Stmt::assign(Expr::ident("sum"), Expr::int(1))];
        let stmts = vec![Stmt::for_loop("i", Expr::int(1), Expr::int(10), Some(Expr::int(0)), body)];
        let store = run(&stmts);
        assert_eq!(store.get_int("sum"), 0);
    }

    #[test]
    fn continue_skips_even_values() {
        let body = vec![
            Stmt::if_then(
                Expr::bin(
                    BinaryOp::Eq,
                    Expr::bin(BinaryOp::Mod, Expr::ident("i"), Expr::int(2)),
                    Expr::int(0),
                ),
                vec![Stmt::Continue],
            )
            .build(),
            Stmt::assign(
                Expr::ident("sum"),
                Expr::bin(BinaryOp::Add, Expr::ident("sum"), Expr::ident("i")),
            ),
        ];
        let stmts = vec![Stmt::for_loop("i", Expr::int(1), Expr::int(10), None, body)];
        let store = run(&stmts);
        assert_eq!(store.get_int("sum"), 25);
    }

    #[test]
    fn case_range_label_selects_matching_arm() {
        let stmts = vec![Stmt::Case {
            selector: Expr::int(7),
            arms: vec![
                CaseArm {
                    labels: vec![CaseLabel::Range(Expr::int(1), Expr::int(5))],
                    body: vec![Stmt::assign(Expr::ident("r"), Expr::int(1))],
                },
                CaseArm {
                    labels: vec![CaseLabel::Range(Expr::int(6), Expr::int(10))],
                    body: vec![Stmt::assign(Expr::ident("r"), Expr::int(2))],
                },
            ],
            else_branch: Some(vec![Stmt::assign(Expr::ident("r"), Expr::int(0))]),
        }];
        let store = run(&stmts);
        assert_eq!(store.get_int("r"), 2);
    }

    #[test]
    fn division_by_zero_does_not_stop_later_statements() {
        let stmts = vec![
            Stmt::assign(
                Expr::ident("sum"),
                Expr::bin(BinaryOp::Div, Expr::int(100), Expr::int(0)),
            ),
            Stmt::assign(Expr::ident("r"), Expr::int(999)),
        ];
        let store = run(&stmts);
        assert_eq!(store.get_int("sum"), 0);
        assert_eq!(store.get_int("r"), 999);
    }

    #[test]
    fn while_loop_respects_safety_cap() {
        let ast = AstProgram::default();
        let config = RuntimeConfig::default().with_loop_safety_cap(5);
        let mut store = VariableStore::new();
        store.set_bool("always", true);
        store.set_int("count", 0);
        let mut registry = TypeRegistry::new();
        registry.insert("always", crate::registry::DeclaredType::Bool);
        registry.insert("count", crate::registry::DeclaredType::Int);
        let mut frame = Frame::new(&mut store, &registry, &ast, &config);
        let body = vec![Stmt::assign(
            Expr::ident("count"),
            Expr::bin(BinaryOp::Add, Expr::ident("count"), Expr::int(1)),
        )];
        exec_block(&[Stmt::while_loop(Expr::ident("always"), body)], &mut frame);
        assert_eq!(store.get_int("count"), 5);
    }
}
