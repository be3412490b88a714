//! Scan-Cycle Orchestrator (spec.md §4.6): the engine's entry point. One
//! `scan()` call runs every PROGRAM's statement list, then the top-level
//! statements, then advances every timer's `ET` by the scan period -
//! "advancing simulated time happens exactly once per scan, after all user
//! code" (spec.md §4.6).

use crate::config::RuntimeConfig;
use crate::context::Frame;
use crate::exec::exec_block;
use crate::registry::TypeRegistry;
use crate::store::VariableStore;
use iecst_ast::{AstProgram, PouKind};

/// Observability only (SPEC_FULL.md §11 ADDED) - which scan this was, how
/// many PROGRAM POUs ran, how many timer instances were ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub scan_index: u64,
    pub programs_run: usize,
    pub timers_ticked: usize,
}

pub struct Orchestrator {
    config: RuntimeConfig,
    scan_index: u64,
}

impl Orchestrator {
    pub fn new(config: RuntimeConfig) -> Self {
        Orchestrator { config, scan_index: 0 }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Runs one scan against `store`/`registry`. A `RETURN` inside a
    /// PROGRAM's body exits only that program - `exec_block` already stops
    /// at the first non-`Normal` flow, and this loop simply moves on to the
    /// next program, which is exactly that behavior.
    pub fn scan(&mut self, ast: &AstProgram, store: &mut VariableStore, registry: &TypeRegistry) -> ScanReport {
        self.scan_index += 1;
        let mut programs_run = 0;

        for pou in ast.pous.iter().filter(|p| p.kind == PouKind::Program) {
            let mut frame = Frame::new(store, registry, ast, &self.config);
            exec_block(&pou.statements, &mut frame);
            programs_run += 1;
        }

        {
            let mut frame = Frame::new(store, registry, ast, &self.config);
            exec_block(&ast.top_level_statements, &mut frame);
        }

        let timers_ticked = store.tick_all_timers(self.config.scan_time_ms);

        ScanReport {
            scan_index: self.scan_index,
            programs_run,
            timers_ticked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::initialize;
    use iecst_ast::{BinaryOp, Declaration, Expr, Pou, Stmt, VarBlock};

    #[test]
    fn scan_runs_programs_then_ticks_timers() {
        let ast = AstProgram::new(vec![Pou::program(
            "Main",
            vec![
                VarBlock::var(vec![Declaration::single("Timer1", "TON", None)]),
                VarBlock::var(vec![Declaration::single("StartInput", "BOOL", Some(Expr::bool_(true)))]),
            ],
            vec![Stmt::fb_call(
                "Timer1",
                vec![
                    iecst_ast::Arg::named("IN", Expr::ident("StartInput")),
                    iecst_ast::Arg::named("PT", Expr::time("T#500ms")),
                ],
            )],
        )]);
        let config = RuntimeConfig::default().with_scan_time_ms(100);
        let init_result = initialize(&ast, &config);
        let mut store = init_result.store;
        let mut orchestrator = Orchestrator::new(config);

        let mut ets = Vec::new();
        for _ in 0..5 {
            orchestrator.scan(&ast, &mut store, &init_result.registry);
            ets.push(store.get_timer("Timer1").unwrap().et);
        }
        assert_eq!(ets, vec![100, 200, 300, 400, 500]);
        assert!(store.get_timer("Timer1").unwrap().q);
    }

    #[test]
    fn user_fb_accumulates_across_scans() {
        let fb = Pou::function_block(
            "Accumulator",
            vec![
                VarBlock::var_input(vec![Declaration::single("AddValue", "INT", None)]),
                VarBlock::var_output(vec![Declaration::single("Total", "INT", None)]),
                VarBlock::var(vec![Declaration::single("Sum", "INT", Some(Expr::int(0)))]),
            ],
            vec![
                Stmt::assign(
                    Expr::ident("Sum"),
                    Expr::bin(BinaryOp::Add, Expr::ident("Sum"), Expr::ident("AddValue")),
                ),
                Stmt::assign(Expr::ident("Total"), Expr::ident("Sum")),
            ],
        );
        let main = Pou::program(
            "Main",
            vec![
                VarBlock::var(vec![Declaration::single("Acc", "Accumulator", None)]),
                VarBlock::var(vec![Declaration::single("Result", "INT", None)]),
            ],
            vec![
                Stmt::fb_call("Acc", vec![iecst_ast::Arg::named("AddValue", Expr::int(5))]),
                Stmt::fb_call("Acc", vec![iecst_ast::Arg::named("AddValue", Expr::int(3))]),
                Stmt::assign(Expr::ident("Result"), Expr::member(Expr::ident("Acc"), "Total")),
            ],
        );
        let ast = AstProgram::new(vec![fb, main]);
        let config = RuntimeConfig::default();
        let init_result = initialize(&ast, &config);
        let mut store = init_result.store;
        let mut orchestrator = Orchestrator::new(config);

        orchestrator.scan(&ast, &mut store, &init_result.registry);
        assert_eq!(store.get_int("Result"), 8);

        orchestrator.scan(&ast, &mut store, &init_result.registry);
        assert_eq!(store.get_int("Result"), 16);
    }
}
