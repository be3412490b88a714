//! Variable Initializer (spec.md §4.2): walks every VAR block of every
//! PROGRAM in the AST and every top-level VAR block into one flat global
//! store and registry. `FUNCTION`/`FUNCTION_BLOCK` POUs are not walked here
//! directly - a `FUNCTION_BLOCK`'s VAR blocks are only realized when a
//! variable of that type is declared (recursively, into that instance's own
//! private store), and a `FUNCTION`'s VAR blocks are realized per call.

use crate::config::RuntimeConfig;
use crate::error::{InitWarning, InitWarningReason};
use crate::fb::{EdgeKind, UserFbInstance};
use crate::registry::{classify_builtin, DeclaredType, TypeRegistry};
use crate::store::VariableStore;
use crate::time_literal::parse_time_literal;
use iecst_ast::{AstProgram, Declaration, Expr, Literal, PouKind, UnaryOp, VarBlock};
use iecst_core::Value;

pub struct InitResult {
    pub store: VariableStore,
    pub registry: TypeRegistry,
    pub warnings: Vec<InitWarning>,
}

/// Builds the global store and registry for an AST, per spec.md §4.2.
pub fn initialize(ast: &AstProgram, config: &RuntimeConfig) -> InitResult {
    let mut store = VariableStore::new();
    let mut registry = TypeRegistry::new();
    let mut warnings = Vec::new();

    for pou in ast.pous.iter().filter(|p| p.kind == PouKind::Program) {
        for block in &pou.var_blocks {
            init_var_block(&pou.name, block, ast, config, &mut store, &mut registry, &mut warnings);
        }
    }
    for block in &ast.top_level_var_blocks {
        init_var_block("<top-level>", block, ast, config, &mut store, &mut registry, &mut warnings);
    }

    InitResult {
        store,
        registry,
        warnings,
    }
}

pub(crate) fn init_var_block(
    pou_name: &str,
    block: &VarBlock,
    ast: &AstProgram,
    config: &RuntimeConfig,
    store: &mut VariableStore,
    registry: &mut TypeRegistry,
    warnings: &mut Vec<InitWarning>,
) {
    for decl in &block.declarations {
        init_declaration(pou_name, decl, ast, config, store, registry, warnings);
    }
}

fn init_declaration(
    pou_name: &str,
    decl: &Declaration,
    ast: &AstProgram,
    config: &RuntimeConfig,
    store: &mut VariableStore,
    registry: &mut TypeRegistry,
    warnings: &mut Vec<InitWarning>,
) {
    for name in &decl.names {
        if let Some(builtin) = classify_builtin(&decl.data_type) {
            init_builtin(pou_name, name, &builtin, decl, config, store, registry, warnings);
            continue;
        }

        // Not a primitive or standard FB name - try a FUNCTION_BLOCK POU.
        match ast.find_pou(&decl.data_type) {
            Some(fb_pou) if fb_pou.kind == PouKind::FunctionBlock => {
                if !config.enabled_fbs.user_fbs {
                    warnings.push(InitWarning {
                        pou_name: pou_name.to_string(),
                        var_name: name.clone(),
                        reason: InitWarningReason::FbKindDisabled(decl.data_type.clone()),
                    });
                    registry.insert(name.clone(), DeclaredType::Unknown);
                    continue;
                }
                let instance = instantiate_user_fb(fb_pou, ast, config, warnings);
                registry.insert(name.clone(), DeclaredType::UserFb(decl.data_type.clone()));
                store.init_user_fb(name.clone(), instance);
            }
            Some(_) => {
                // A PROGRAM or FUNCTION used as a type name: not a valid
                // variable type under this model.
                warnings.push(InitWarning {
                    pou_name: pou_name.to_string(),
                    var_name: name.clone(),
                    reason: InitWarningReason::UnknownType(decl.data_type.clone()),
                });
                registry.insert(name.clone(), DeclaredType::Unknown);
            }
            None => {
                warnings.push(InitWarning {
                    pou_name: pou_name.to_string(),
                    var_name: name.clone(),
                    reason: InitWarningReason::UnknownType(decl.data_type.clone()),
                });
                registry.insert(name.clone(), DeclaredType::Unknown);
            }
        }
    }
}

fn init_builtin(
    pou_name: &str,
    name: &str,
    ty: &DeclaredType,
    decl: &Declaration,
    config: &RuntimeConfig,
    store: &mut VariableStore,
    registry: &mut TypeRegistry,
    warnings: &mut Vec<InitWarning>,
) {
    match ty {
        DeclaredType::Bool => {
            let v = eval_static(decl.initializer.as_ref())
                .map(|v| v.as_bool().unwrap_or(false))
                .unwrap_or_else(|| warn_non_static(pou_name, name, &decl.initializer, warnings, false));
            store.set_bool(name, v);
            registry.insert(name, DeclaredType::Bool);
        }
        DeclaredType::Int => {
            let v = eval_static(decl.initializer.as_ref())
                .map(|v| v.floor_to_int())
                .unwrap_or_else(|| warn_non_static(pou_name, name, &decl.initializer, warnings, 0));
            store.set_int(name, v);
            registry.insert(name, DeclaredType::Int);
        }
        DeclaredType::Real => {
            let v = eval_static(decl.initializer.as_ref())
                .map(|v| v.to_real())
                .unwrap_or_else(|| warn_non_static(pou_name, name, &decl.initializer, warnings, 0.0));
            store.set_real(name, v);
            registry.insert(name, DeclaredType::Real);
        }
        DeclaredType::Time => {
            let v = eval_static(decl.initializer.as_ref())
                .map(|v| v.as_int().unwrap_or(0))
                .unwrap_or_else(|| warn_non_static(pou_name, name, &decl.initializer, warnings, 0));
            store.set_time(name, v);
            registry.insert(name, DeclaredType::Time);
        }
        DeclaredType::Timer(kind) => {
            if config.enabled_fbs.timers {
                store.init_timer(name, 0, *kind);
                registry.insert(name, DeclaredType::Timer(*kind));
            } else {
                warnings.push(disabled(pou_name, name, &decl.data_type));
                registry.insert(name, DeclaredType::Unknown);
            }
        }
        DeclaredType::Counter(kind) => {
            if config.enabled_fbs.counters {
                store.init_counter(name, 0, *kind);
                registry.insert(name, DeclaredType::Counter(*kind));
            } else {
                warnings.push(disabled(pou_name, name, &decl.data_type));
                registry.insert(name, DeclaredType::Unknown);
            }
        }
        DeclaredType::REdge => {
            if config.enabled_fbs.edges {
                store.init_edge(name, EdgeKind::Rising);
                registry.insert(name, DeclaredType::REdge);
            } else {
                warnings.push(disabled(pou_name, name, &decl.data_type));
                registry.insert(name, DeclaredType::Unknown);
            }
        }
        DeclaredType::FEdge => {
            if config.enabled_fbs.edges {
                store.init_edge(name, EdgeKind::Falling);
                registry.insert(name, DeclaredType::FEdge);
            } else {
                warnings.push(disabled(pou_name, name, &decl.data_type));
                registry.insert(name, DeclaredType::Unknown);
            }
        }
        DeclaredType::Bistable(kind) => {
            if config.enabled_fbs.bistables {
                store.init_bistable(name, *kind);
                registry.insert(name, DeclaredType::Bistable(*kind));
            } else {
                warnings.push(disabled(pou_name, name, &decl.data_type));
                registry.insert(name, DeclaredType::Unknown);
            }
        }
        DeclaredType::UserFb(_) | DeclaredType::Unknown => unreachable!(
            "classify_builtin never returns UserFb/Unknown"
        ),
    }
}

fn disabled(pou_name: &str, var_name: &str, type_name: &str) -> InitWarning {
    InitWarning {
        pou_name: pou_name.to_string(),
        var_name: var_name.to_string(),
        reason: InitWarningReason::FbKindDisabled(type_name.to_string()),
    }
}

fn warn_non_static<T>(
    pou_name: &str,
    name: &str,
    initializer: &Option<Expr>,
    warnings: &mut Vec<InitWarning>,
    default: T,
) -> T {
    if initializer.is_some() {
        warnings.push(InitWarning {
            pou_name: pou_name.to_string(),
            var_name: name.to_string(),
            reason: InitWarningReason::NonStaticInitializer,
        });
    }
    default
}

/// Recursively builds a `FUNCTION_BLOCK` instance's private store: every VAR
/// block of the FB's own POU (VAR, VAR_INPUT, VAR_OUTPUT, VAR_IN_OUT alike -
/// they all need a storage slot) is walked the same way the top level is.
pub fn instantiate_user_fb(
    fb_pou: &iecst_ast::Pou,
    ast: &AstProgram,
    config: &RuntimeConfig,
    warnings: &mut Vec<InitWarning>,
) -> UserFbInstance {
    let mut store = VariableStore::new();
    let mut registry = TypeRegistry::new();
    for block in &fb_pou.var_blocks {
        init_var_block(&fb_pou.name, block, ast, config, &mut store, &mut registry, warnings);
    }
    UserFbInstance::new(fb_pou.name.clone(), store, registry)
}

/// Builds a fresh store/registry from a single POU's own VAR blocks - the
/// same walk `instantiate_user_fb` does, generalized for `FUNCTION` POUs
/// called as expressions (`crate::call`), which need the identical
/// per-call-local store but no `UserFbInstance` wrapper.
pub(crate) fn init_pou_locals(
    pou: &iecst_ast::Pou,
    ast: &AstProgram,
    config: &RuntimeConfig,
    warnings: &mut Vec<InitWarning>,
) -> (VariableStore, TypeRegistry) {
    let mut store = VariableStore::new();
    let mut registry = TypeRegistry::new();
    for block in &pou.var_blocks {
        init_var_block(&pou.name, block, ast, config, &mut store, &mut registry, warnings);
    }
    (store, registry)
}

/// Statically evaluable initializer forms only: literal values, unary minus
/// of a literal, TIME literal text. Anything else (an identifier, a binary
/// expression, an FB call) is not evaluable before the store it would read
/// from exists, so it falls back to the type default with a warning.
fn eval_static(expr: Option<&Expr>) -> Option<Value> {
    match expr? {
        Expr::Literal(Literal::Bool(b)) => Some(Value::Bool(*b)),
        Expr::Literal(Literal::Int(n)) => Some(Value::Int(*n)),
        Expr::Literal(Literal::Real(r)) => Some(Value::Real(*r)),
        Expr::Literal(Literal::Time(raw)) => Some(Value::Time(parse_time_literal(raw))),
        Expr::Literal(Literal::String(_)) => None,
        Expr::UnaryExpr {
            op: UnaryOp::Neg,
            operand,
        } => match operand.as_ref() {
            Expr::Literal(Literal::Int(n)) => Some(Value::Int(n.wrapping_neg())),
            Expr::Literal(Literal::Real(r)) => Some(Value::Real(-r)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iecst_ast::{Declaration, Pou, VarBlock};

    #[test]
    fn absent_initializer_uses_type_default() {
        let ast = AstProgram::new(vec![Pou::program(
            "Main",
            vec![VarBlock::var(vec![Declaration::single("x", "INT", None)])],
            vec![],
        )]);
        let result = initialize(&ast, &RuntimeConfig::default());
        assert_eq!(result.store.get_int("x"), 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn literal_initializer_is_applied() {
        let ast = AstProgram::new(vec![Pou::program(
            "Main",
            vec![VarBlock::var(vec![Declaration::single(
                "x",
                "INT",
                Some(Expr::int(42)),
            )])],
            vec![],
        )]);
        let result = initialize(&ast, &RuntimeConfig::default());
        assert_eq!(result.store.get_int("x"), 42);
    }

    #[test]
    fn negative_literal_initializer() {
        let ast = AstProgram::new(vec![Pou::program(
            "Main",
            vec![VarBlock::var(vec![Declaration::single(
                "x",
                "REAL",
                Some(Expr::neg(Expr::real(2.5))),
            )])],
            vec![],
        )]);
        let result = initialize(&ast, &RuntimeConfig::default());
        assert_eq!(result.store.get_real("x"), -2.5);
    }

    #[test]
    fn time_literal_initializer_parses_to_milliseconds() {
        let ast = AstProgram::new(vec![Pou::program(
            "Main",
            vec![VarBlock::var(vec![Declaration::single(
                "t",
                "TIME",
                Some(Expr::time("T#1s")),
            )])],
            vec![],
        )]);
        let result = initialize(&ast, &RuntimeConfig::default());
        assert_eq!(result.store.get_time("t"), 1000);
    }

    #[test]
    fn timer_declaration_instantiates_with_zero_pt() {
        let ast = AstProgram::new(vec![Pou::program(
            "Main",
            vec![VarBlock::var(vec![Declaration::single("Timer1", "TON", None)])],
            vec![],
        )]);
        let result = initialize(&ast, &RuntimeConfig::default());
        let t = result.store.get_timer("Timer1").unwrap();
        assert_eq!(t.pt, 0);
    }

    #[test]
    fn user_fb_instance_gets_its_own_initialized_store() {
        let fb = Pou::function_block(
            "Accumulator",
            vec![
                VarBlock::var_input(vec![Declaration::single("AddValue", "INT", None)]),
                VarBlock::var_output(vec![Declaration::single("Total", "INT", None)]),
                VarBlock::var(vec![Declaration::single("Sum", "INT", Some(Expr::int(0)))]),
            ],
            vec![],
        );
        let ast = AstProgram::new(vec![
            fb,
            Pou::program(
                "Main",
                vec![VarBlock::var(vec![Declaration::single(
                    "Acc",
                    "Accumulator",
                    None,
                )])],
                vec![],
            ),
        ]);
        let result = initialize(&ast, &RuntimeConfig::default());
        let inst = result.store.get_user_fb("Acc").unwrap();
        assert_eq!(inst.fb_type, "Accumulator");
        assert_eq!(inst.store.get_int("Sum"), 0);
    }

    #[test]
    fn unknown_type_name_is_reported_and_classified_unknown() {
        let ast = AstProgram::new(vec![Pou::program(
            "Main",
            vec![VarBlock::var(vec![Declaration::single(
                "x",
                "NoSuchType",
                None,
            )])],
            vec![],
        )]);
        let result = initialize(&ast, &RuntimeConfig::default());
        assert_eq!(result.registry.get("x"), DeclaredType::Unknown);
        assert_eq!(result.warnings.len(), 1);
    }
}
