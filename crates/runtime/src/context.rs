//! The execution context threaded through the evaluator and executor:
//! spec.md §3's "runtime state (non-storage)" - the registry, the AST (for
//! resolving FB/function calls), and the config - bundled with a borrow of
//! whichever store is "current" (the program's own, or a user-FB instance's
//! private one once a call has rebased execution onto it, spec.md §4.5
//! step 3).

use crate::config::RuntimeConfig;
use crate::registry::TypeRegistry;
use crate::store::VariableStore;
use iecst_ast::AstProgram;

pub struct Frame<'a> {
    pub store: &'a mut VariableStore,
    pub registry: &'a TypeRegistry,
    pub ast: &'a AstProgram,
    pub config: &'a RuntimeConfig,
}

impl<'a> Frame<'a> {
    pub fn new(
        store: &'a mut VariableStore,
        registry: &'a TypeRegistry,
        ast: &'a AstProgram,
        config: &'a RuntimeConfig,
    ) -> Self {
        Frame {
            store,
            registry,
            ast,
            config,
        }
    }
}
