//! Expression Evaluator (spec.md §4.3): walks AST expression nodes to a
//! tagged `Value`. Read-only with respect to the store - the one exception,
//! a `FUNCTION` invoked as an expression, gets its own ephemeral store
//! (`crate::call::call_function`) rather than touching the caller's.
//!
//! Errors never propagate as exceptions here: arithmetic faults become
//! defined sentinel values and a `tracing::warn!`, per spec.md §7.

use crate::context::Frame;
use crate::registry::{DeclaredType, TypeRegistry};
use crate::store::VariableStore;
use crate::time_literal::parse_time_literal;
use iecst_ast::{BinaryOp, Expr, Literal, UnaryOp};
use iecst_core::Value;

pub fn eval(expr: &Expr, frame: &Frame) -> Value {
    match expr {
        Expr::Literal(lit) => eval_literal(lit),
        Expr::Identifier(name) => read_simple(name, frame.store, frame.registry),
        Expr::MemberAccess { .. } => match resolve_path(expr) {
            Some(path) => read_path(&path, frame.store, frame.registry),
            None => {
                tracing::warn!("member access base is not a resolvable path");
                Value::Unit
            }
        },
        Expr::UnaryExpr { op, operand } => eval_unary(*op, eval(operand, frame)),
        Expr::BinaryExpr { op, lhs, rhs } => eval_binary(*op, eval(lhs, frame), eval(rhs, frame)),
        Expr::FbCall { name, args } => crate::call::call_function(name, args, frame),
    }
}

fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::Int(*n),
        Literal::Real(r) => Value::Real(*r),
        Literal::Time(raw) => Value::Time(parse_time_literal(raw)),
        Literal::String(_) => Value::Unit,
    }
}

/// Flattens a chain of `Identifier`/`MemberAccess` nodes into a dotted path
/// (`["Acc", "Total"]` for `Acc.Total`). `None` if the base of a
/// `MemberAccess` isn't itself a plain path (e.g. a computed expression),
/// which the AST contract doesn't produce but a malformed tree might.
fn resolve_path(expr: &Expr) -> Option<Vec<String>> {
    match expr {
        Expr::Identifier(name) => Some(vec![name.clone()]),
        Expr::MemberAccess { base, field } => {
            let mut path = resolve_path(base)?;
            path.push(field.clone());
            Some(path)
        }
        _ => None,
    }
}

pub(crate) fn read_simple(name: &str, store: &VariableStore, registry: &TypeRegistry) -> Value {
    match registry.get(name) {
        DeclaredType::Bool => Value::Bool(store.get_bool(name)),
        DeclaredType::Int => Value::Int(store.get_int(name)),
        DeclaredType::Real => Value::Real(store.get_real(name)),
        DeclaredType::Time => Value::Time(store.get_time(name)),
        DeclaredType::Timer(_)
        | DeclaredType::Counter(_)
        | DeclaredType::REdge
        | DeclaredType::FEdge
        | DeclaredType::Bistable(_)
        | DeclaredType::UserFb(_) => {
            tracing::warn!(name, "FB instance read as a plain identifier; use inst.field");
            Value::Unit
        }
        DeclaredType::Unknown => {
            // Identifier fell through the registry (spec.md §4.3): try each
            // primitive lane in turn before giving up.
            if store.has_bool(name) {
                Value::Bool(store.get_bool(name))
            } else if store.has_int(name) {
                Value::Int(store.get_int(name))
            } else if store.has_real(name) {
                Value::Real(store.get_real(name))
            } else if store.has_time(name) {
                Value::Time(store.get_time(name))
            } else {
                tracing::debug!(name, "unknown identifier; reading as UNIT");
                Value::Unit
            }
        }
    }
}

/// Resolves a dotted path against a (store, registry) pair, recursing into
/// nested user-FB instance stores for each path segment beyond the first
/// (spec.md §9 "FB instance graph").
pub fn read_path(path: &[String], store: &VariableStore, registry: &TypeRegistry) -> Value {
    if path.len() == 1 {
        return read_simple(&path[0], store, registry);
    }
    let head = path[0].as_str();
    let field = path[1].to_ascii_uppercase();
    match registry.get(head) {
        DeclaredType::Timer(_) => match store.get_timer(head) {
            Some(t) => match field.as_str() {
                "Q" => Value::Bool(t.q),
                "ET" => Value::Time(t.et),
                "PT" => Value::Time(t.pt),
                "IN" => Value::Bool(t.in_state),
                _ => Value::Unit,
            },
            None => Value::Unit,
        },
        DeclaredType::Counter(_) => match store.get_counter(head) {
            Some(c) => match field.as_str() {
                "CV" => Value::Int(c.cv as i64),
                "PV" => Value::Int(c.pv as i64),
                "QU" => Value::Bool(c.qu),
                "QD" => Value::Bool(c.qd),
                _ => Value::Unit,
            },
            None => Value::Unit,
        },
        DeclaredType::REdge | DeclaredType::FEdge => match store.get_edge(head) {
            Some(e) => match field.as_str() {
                "Q" => Value::Bool(e.q),
                "M" => Value::Bool(e.m),
                _ => Value::Unit,
            },
            None => Value::Unit,
        },
        DeclaredType::Bistable(_) => match store.get_bistable(head) {
            Some(b) => match field.as_str() {
                "Q1" => Value::Bool(b.q1),
                _ => Value::Unit,
            },
            None => Value::Unit,
        },
        DeclaredType::UserFb(_) => match store.get_user_fb(head) {
            Some(inst) => read_path(&path[1..], &inst.store, &inst.registry),
            None => Value::Unit,
        },
        _ => {
            tracing::warn!(path = ?path, "member access on a non-FB identifier");
            Value::Unit
        }
    }
}

fn eval_unary(op: UnaryOp, operand: Value) -> Value {
    match op {
        UnaryOp::Not => match operand.as_bool() {
            Some(b) => Value::Bool(!b),
            None => {
                tracing::warn!(?operand, "NOT applied to a non-BOOL operand");
                Value::Bool(false)
            }
        },
        UnaryOp::Neg => match operand {
            Value::Int(n) => Value::Int(n.wrapping_neg()),
            Value::Real(r) => Value::Real(-r),
            Value::Time(ms) => Value::Time(-ms),
            _ => {
                tracing::warn!(?operand, "unary - applied to a non-numeric operand");
                Value::Unit
            }
        },
    }
}

/// Numeric operand classification shared by arithmetic and comparison:
/// `Real` widens everything to `f64`; `Int`/`Time` stay integral and track
/// whether the result should keep the `Time` tag.
enum NumKind {
    IntLike(i64, bool),
    Real(f64),
    NonNumeric,
}

fn classify(v: &Value) -> NumKind {
    match v {
        Value::Int(n) => NumKind::IntLike(*n, false),
        Value::Time(ms) => NumKind::IntLike(*ms, true),
        Value::Real(r) => NumKind::Real(*r),
        Value::Bool(_) | Value::Unit => NumKind::NonNumeric,
    }
}

fn eval_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Value {
    match op {
        BinaryOp::Add => arith(lhs, rhs, |a, b| a.wrapping_add(b), |a, b| a + b),
        BinaryOp::Sub => arith(lhs, rhs, |a, b| a.wrapping_sub(b), |a, b| a - b),
        BinaryOp::Mul => arith(lhs, rhs, |a, b| a.wrapping_mul(b), |a, b| a * b),
        BinaryOp::Div => div(lhs, rhs),
        BinaryOp::Mod => rem(lhs, rhs),
        BinaryOp::Pow => Value::Real(lhs.to_real().powf(rhs.to_real())),
        BinaryOp::Eq => Value::Bool(values_equal(&lhs, &rhs)),
        BinaryOp::Ne => Value::Bool(!values_equal(&lhs, &rhs)),
        BinaryOp::Lt => compare(lhs, rhs, |o| o == std::cmp::Ordering::Less),
        BinaryOp::Le => compare(lhs, rhs, |o| o != std::cmp::Ordering::Greater),
        BinaryOp::Gt => compare(lhs, rhs, |o| o == std::cmp::Ordering::Greater),
        BinaryOp::Ge => compare(lhs, rhs, |o| o != std::cmp::Ordering::Less),
        BinaryOp::And => logical(lhs, rhs, |a, b| a && b),
        BinaryOp::Or => logical(lhs, rhs, |a, b| a || b),
        BinaryOp::Xor => logical(lhs, rhs, |a, b| a ^ b),
    }
}

fn arith(lhs: Value, rhs: Value, int_op: fn(i64, i64) -> i64, real_op: fn(f64, f64) -> f64) -> Value {
    match (classify(&lhs), classify(&rhs)) {
        (NumKind::IntLike(a, a_time), NumKind::IntLike(b, b_time)) => {
            let result = int_op(a, b);
            if a_time || b_time {
                Value::Time(result)
            } else {
                Value::Int(result)
            }
        }
        (NumKind::NonNumeric, _) | (_, NumKind::NonNumeric) => {
            tracing::warn!(?lhs, ?rhs, "arithmetic on a non-numeric operand");
            Value::Unit
        }
        _ => Value::Real(real_op(lhs.to_real(), rhs.to_real())),
    }
}

fn div(lhs: Value, rhs: Value) -> Value {
    match (classify(&lhs), classify(&rhs)) {
        (NumKind::IntLike(a, a_time), NumKind::IntLike(b, b_time)) => {
            if b == 0 {
                tracing::warn!("integer division by zero; result = 0");
                return if a_time || b_time { Value::Time(0) } else { Value::Int(0) };
            }
            if a % b == 0 {
                let result = a.wrapping_div(b);
                if a_time || b_time {
                    Value::Time(result)
                } else {
                    Value::Int(result)
                }
            } else {
                // Integer division that is not exact produces REAL, per
                // spec.md §4.3 (avoids surprise truncation).
                Value::Real(a as f64 / b as f64)
            }
        }
        (NumKind::NonNumeric, _) | (_, NumKind::NonNumeric) => {
            tracing::warn!(?lhs, ?rhs, "division on a non-numeric operand");
            Value::Unit
        }
        _ => {
            let divisor = rhs.to_real();
            if divisor == 0.0 {
                tracing::warn!("real division by zero; result is an IEEE special");
            }
            Value::Real(lhs.to_real() / divisor)
        }
    }
}

fn rem(lhs: Value, rhs: Value) -> Value {
    match (classify(&lhs), classify(&rhs)) {
        (NumKind::IntLike(a, a_time), NumKind::IntLike(b, b_time)) => {
            if b == 0 {
                tracing::warn!("modulo by zero; result = 0");
                return if a_time || b_time { Value::Time(0) } else { Value::Int(0) };
            }
            let result = a.wrapping_rem(b);
            if a_time || b_time {
                Value::Time(result)
            } else {
                Value::Int(result)
            }
        }
        (NumKind::NonNumeric, _) | (_, NumKind::NonNumeric) => {
            tracing::warn!(?lhs, ?rhs, "modulo on a non-numeric operand");
            Value::Unit
        }
        _ => {
            let divisor = rhs.to_real();
            if divisor == 0.0 {
                tracing::warn!("real modulo by zero; result is an IEEE special");
            }
            Value::Real(lhs.to_real() % divisor)
        }
    }
}

pub(crate) fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => lhs == rhs,
    }
}

fn compare(lhs: Value, rhs: Value, pred: fn(std::cmp::Ordering) -> bool) -> Value {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => match a.partial_cmp(&b) {
            Some(ord) => Value::Bool(pred(ord)),
            None => {
                tracing::warn!(?lhs, ?rhs, "ordering comparison on NaN");
                Value::Bool(false)
            }
        },
        _ => {
            tracing::warn!(?lhs, ?rhs, "ordering comparison on non-numeric operands");
            Value::Bool(false)
        }
    }
}

fn logical(lhs: Value, rhs: Value, op: fn(bool, bool) -> bool) -> Value {
    match (lhs.as_bool(), rhs.as_bool()) {
        (Some(a), Some(b)) => Value::Bool(op(a, b)),
        _ => {
            tracing::warn!(?lhs, ?rhs, "logical operator on non-BOOL operand(s)");
            Value::Bool(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_division_by_zero_yields_zero_not_panic() {
        assert_eq!(eval_binary(BinaryOp::Div, Value::Int(100), Value::Int(0)), Value::Int(0));
    }

    #[test]
    fn real_division_by_zero_yields_infinity() {
        let v = eval_binary(BinaryOp::Div, Value::Real(1.0), Value::Real(0.0));
        assert_eq!(v, Value::Real(f64::INFINITY));
    }

    #[test]
    fn inexact_integer_division_promotes_to_real() {
        assert_eq!(eval_binary(BinaryOp::Div, Value::Int(7), Value::Int(2)), Value::Real(3.5));
    }

    #[test]
    fn exact_integer_division_stays_int() {
        assert_eq!(eval_binary(BinaryOp::Div, Value::Int(6), Value::Int(2)), Value::Int(3));
    }

    #[test]
    fn modulo_by_zero_yields_zero() {
        assert_eq!(eval_binary(BinaryOp::Mod, Value::Int(5), Value::Int(0)), Value::Int(0));
    }

    #[test]
    fn integer_overflow_wraps() {
        let v = eval_binary(BinaryOp::Add, Value::Int(i64::MAX), Value::Int(1));
        assert_eq!(v, Value::Int(i64::MIN));
    }

    #[test]
    fn mixed_int_real_promotes_to_real() {
        assert_eq!(eval_binary(BinaryOp::Add, Value::Int(1), Value::Real(0.5)), Value::Real(1.5));
    }

    #[test]
    fn logical_and_is_not_short_circuited_but_still_correct() {
        assert_eq!(eval_binary(BinaryOp::And, Value::Bool(true), Value::Bool(false)), Value::Bool(false));
        assert_eq!(eval_binary(BinaryOp::Or, Value::Bool(false), Value::Bool(true)), Value::Bool(true));
        assert_eq!(eval_binary(BinaryOp::Xor, Value::Bool(true), Value::Bool(true)), Value::Bool(false));
    }

    #[test]
    fn comparison_is_numeric_across_int_and_real() {
        assert_eq!(eval_binary(BinaryOp::Lt, Value::Int(1), Value::Real(1.5)), Value::Bool(true));
    }

    #[test]
    fn unary_neg_wraps_at_int_min() {
        assert_eq!(eval_unary(UnaryOp::Neg, Value::Int(i64::MIN)), Value::Int(i64::MIN));
    }
}
