//! FB-call and FUNCTION-call dispatch (spec.md §4.4 "Function-block call
//! statement", §4.5 "User-defined FB call", §4.3 `FbCall` expression).
//!
//! A call's arguments may be positional or named; named dominates when both
//! are present (positional bindings are applied first, named bindings
//! applied after and overwrite). Each FB kind has a fixed positional order
//! matching its field table in spec.md §3.

use crate::assign::write_simple;
use crate::context::Frame;
use crate::eval::{eval, read_simple};
use crate::init;
use crate::registry::{DeclaredType, TypeRegistry};
use crate::store::VariableStore;
use iecst_ast::{Arg, PouKind};
use iecst_core::Value;

/// Dispatches a `Stmt::FbCall` / bare `Inst();` statement.
pub fn call_statement(name: &str, args: &[Arg], frame: &mut Frame) {
    match frame.registry.get(name) {
        DeclaredType::Timer(_) => {
            let in_value = arg_bool(args, &["IN", "PT"], 0, frame);
            let pt = arg_time_ms(args, &["IN", "PT"], 1, frame, frame.store.get_timer(name).map(|t| t.pt).unwrap_or(0));
            frame.store.set_timer_input(name, in_value, pt);
        }
        DeclaredType::Counter(kind) => {
            // Positional order matches each kind's argument list (spec.md
            // §3); a field a kind doesn't have (e.g. CTU has no `LD`) is
            // simply absent from `names`, so look-ups for it always miss
            // and fall back to `false`/the previous `PV`.
            let (names, pv_index): (&[&str], usize) = match kind {
                crate::fb::CounterKind::Ctu => (&["CU", "R", "PV"], 2),
                crate::fb::CounterKind::Ctd => (&["CD", "LD", "PV"], 2),
                crate::fb::CounterKind::Ctud => (&["CU", "CD", "R", "LD", "PV"], 4),
            };
            let cu = arg_value(args, names, name_index(names, "CU"), frame)
                .map(|v| v.as_bool().unwrap_or(false))
                .unwrap_or(false);
            let cd = arg_value(args, names, name_index(names, "CD"), frame)
                .map(|v| v.as_bool().unwrap_or(false))
                .unwrap_or(false);
            let r = arg_value(args, names, name_index(names, "R"), frame)
                .map(|v| v.as_bool().unwrap_or(false))
                .unwrap_or(false);
            let ld = arg_value(args, names, name_index(names, "LD"), frame)
                .map(|v| v.as_bool().unwrap_or(false))
                .unwrap_or(false);
            let existing_pv = frame.store.get_counter(name).map(|c| c.pv).unwrap_or(0);
            let pv = arg_int(args, names, pv_index, frame, existing_pv as i64) as i32;
            frame.store.pulse_counter(name, cu, cd, r, ld, pv);
        }
        DeclaredType::REdge | DeclaredType::FEdge => {
            let clk = arg_bool(args, &["CLK"], 0, frame);
            frame.store.update_edge(name, clk);
        }
        DeclaredType::Bistable(kind) => {
            let names: &[&str] = match kind {
                crate::fb::BistableKind::Sr => &["S1", "R"],
                crate::fb::BistableKind::Rs => &["S", "R1"],
            };
            let set = arg_bool(args, names, 0, frame);
            let reset = arg_bool(args, names, 1, frame);
            frame.store.update_bistable(name, set, reset);
        }
        DeclaredType::UserFb(fb_type) => call_user_fb(name, &fb_type, args, frame),
        DeclaredType::Bool | DeclaredType::Int | DeclaredType::Real | DeclaredType::Time => {
            tracing::warn!(name, "call statement targets a non-FB variable; ignored");
        }
        DeclaredType::Unknown => {
            tracing::warn!(name, "call statement targets an unrecognized instance; ignored");
        }
    }
}

fn call_user_fb(name: &str, fb_type: &str, args: &[Arg], frame: &mut Frame) {
    let Some(fb_pou) = frame.ast.find_pou(fb_type) else {
        tracing::warn!(name, fb_type, "FUNCTION_BLOCK definition missing at call time");
        return;
    };
    let input_names = fb_pou.input_names();

    if frame.store.get_user_fb(name).is_none() {
        tracing::warn!(name, "FB instance missing at call time");
        return;
    }

    // Bind args against the outer frame's values but the instance's own
    // registry. `ast`/`config` are copied out up front (cheap - both are
    // shared references) so the mutable borrow of the instance below
    // doesn't have to coexist with a borrow of `frame` itself.
    let bound: Vec<(String, Value)> = collect_bindings(args, &input_names, frame);
    let ast = frame.ast;
    let config = frame.config;

    let instance = frame.store.get_user_fb_mut(name).expect("checked above");
    for (target_name, value) in bound {
        write_simple(&target_name, value, &mut instance.store, &instance.registry);
    }

    let mut inner = Frame::new(&mut instance.store, &instance.registry, ast, config);
    crate::exec::exec_block(&fb_pou.statements, &mut inner);
}

/// Evaluates a call-site's arguments into `(target_name, value)` pairs
/// against `frame` (the caller's scope) - positional first, named second so
/// a later named argument against the same slot wins.
fn collect_bindings(args: &[Arg], positional_names: &[&str], frame: &Frame) -> Vec<(String, Value)> {
    let mut bound = Vec::new();
    let mut positional_index = 0;
    for arg in args {
        match &arg.name {
            None => {
                if let Some(target) = positional_names.get(positional_index) {
                    bound.push((target.to_string(), eval(&arg.value, frame)));
                }
                positional_index += 1;
            }
            Some(_) => {}
        }
    }
    for arg in args {
        if let Some(target) = &arg.name {
            bound.push((target.clone(), eval(&arg.value, frame)));
        }
    }
    bound
}

/// Index of `target` within `names`, or `names.len()` (an always-out-of-
/// range position `arg_value` treats as "absent") if this FB kind doesn't
/// have that field at all.
fn name_index(names: &[&str], target: &str) -> usize {
    names.iter().position(|n| *n == target).unwrap_or(names.len())
}

fn arg_bool(args: &[Arg], names: &[&str], position: usize, frame: &Frame) -> bool {
    arg_value(args, names, position, frame).map(|v| v.as_bool().unwrap_or(false)).unwrap_or(false)
}

fn arg_int(args: &[Arg], names: &[&str], position: usize, frame: &Frame, default: i64) -> i64 {
    arg_value(args, names, position, frame).map(|v| v.floor_to_int()).unwrap_or(default)
}

fn arg_time_ms(args: &[Arg], names: &[&str], position: usize, frame: &Frame, default: i64) -> i64 {
    arg_value(args, names, position, frame).map(|v| v.as_int().unwrap_or(default)).unwrap_or(default)
}

/// Looks up one logical argument (by its conventional name, e.g. `"IN"`) in
/// a call's argument list - a named arg with that name if present,
/// otherwise the positional arg at `names`'s index for it.
fn arg_value(args: &[Arg], names: &[&str], position: usize, frame: &Frame) -> Option<Value> {
    let target_name = names.get(position)?;
    if let Some(arg) = args.iter().find(|a| a.name.as_deref() == Some(*target_name)) {
        return Some(eval(&arg.value, frame));
    }
    let mut positional_index = 0;
    for arg in args {
        if arg.name.is_none() {
            if positional_index == position {
                return Some(eval(&arg.value, frame));
            }
            positional_index += 1;
        }
    }
    None
}

/// Evaluates `Expr::FbCall` - a stateless `FUNCTION` invocation. Builds an
/// ephemeral local store/registry for the call (spec.md §4.3's `FbCall`
/// expression kind is distinct from `Stmt::FbCall`'s stateful FB calls), runs
/// the function's body, and reads back the variable sharing the function's
/// own name as its return value, per IEC convention.
pub fn call_function(name: &str, args: &[Arg], frame: &Frame) -> Value {
    let Some(pou) = frame.ast.find_pou(name) else {
        tracing::warn!(name, "FUNCTION called as an expression but not found in the AST");
        return Value::Unit;
    };
    if pou.kind != PouKind::Function {
        tracing::warn!(name, "FbCall expression target is not a FUNCTION");
        return Value::Unit;
    }

    let mut warnings = Vec::new();
    let (mut local_store, local_registry) = init::init_pou_locals(pou, frame.ast, frame.config, &mut warnings);
    for w in &warnings {
        tracing::warn!(%w, "warning initializing FUNCTION locals");
    }

    let input_names = pou.input_names();
    let bound = collect_bindings(args, &input_names, frame);
    for (target_name, value) in bound {
        write_simple(&target_name, value, &mut local_store, &local_registry);
    }

    let mut inner = Frame::new(&mut local_store, &local_registry, frame.ast, frame.config);
    crate::exec::exec_block(&pou.statements, &mut inner);

    read_return_value(name, &local_store, &local_registry)
}

fn read_return_value(fn_name: &str, store: &VariableStore, registry: &TypeRegistry) -> Value {
    for (declared_name, _) in registry.iter() {
        if declared_name.eq_ignore_ascii_case(fn_name) {
            return read_simple(declared_name, store, registry);
        }
    }
    Value::Unit
}
