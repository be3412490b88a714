//! A user-defined `FUNCTION_BLOCK` instance: a private variable store plus
//! the type registry scoped to that FB's own declarations, so nested FB
//! instances inside it resolve member access the same way the top level
//! does (spec.md §3 "User FB instance", §9 "FB instance graph").

use crate::registry::TypeRegistry;
use crate::store::VariableStore;

#[derive(Debug, Clone, PartialEq)]
pub struct UserFbInstance {
    /// The `FUNCTION_BLOCK` POU name this instance was declared against -
    /// looked up in the AST again on every call to run its body.
    pub fb_type: String,
    pub store: VariableStore,
    pub registry: TypeRegistry,
}

impl UserFbInstance {
    pub fn new(fb_type: impl Into<String>, store: VariableStore, registry: TypeRegistry) -> Self {
        UserFbInstance {
            fb_type: fb_type.into(),
            store,
            registry,
        }
    }
}
