//! Shared write-side of identifier resolution: routes a `Value` into the
//! storage lane the type registry says a name belongs to. Used by plain
//! assignment (`crate::exec`) and by FB-call argument binding
//! (`crate::call`), which is itself just assignment into a different
//! store/registry pair (spec.md §4.4 "Assignment", §4.5 step 2).

use crate::registry::{DeclaredType, TypeRegistry};
use crate::store::VariableStore;
use iecst_core::Value;

/// Writes `value` into the lane `name` is declared as. An FB-typed name is
/// refused here - FB fields are never written as plain variables, only
/// through the FB-call mechanism (`crate::call`) - the caller is
/// responsible for routing to that path before reaching here.
pub(crate) fn write_simple(name: &str, value: Value, store: &mut VariableStore, registry: &TypeRegistry) {
    match registry.get(name) {
        DeclaredType::Bool => store.set_bool(name, value.as_bool().unwrap_or(false)),
        DeclaredType::Int => store.set_int(name, value.floor_to_int()),
        DeclaredType::Real => store.set_real(name, value.to_real()),
        DeclaredType::Time => store.set_time(name, value.as_int().unwrap_or(0)),
        DeclaredType::Timer(_)
        | DeclaredType::Counter(_)
        | DeclaredType::REdge
        | DeclaredType::FEdge
        | DeclaredType::Bistable(_)
        | DeclaredType::UserFb(_) => {
            tracing::warn!(name, "refusing to assign directly into an FB-typed name");
        }
        DeclaredType::Unknown => {
            // Not previously declared: create a slot. Best guess at which
            // lane from the value being written, matching "set_* creates
            // the slot on first write" (spec.md §4.1) for names the
            // initializer never saw (e.g. a FOR loop counter that was
            // never declared explicitly in a VAR block).
            match value {
                Value::Bool(b) => store.set_bool(name, b),
                Value::Int(n) => store.set_int(name, n),
                Value::Real(r) => store.set_real(name, r),
                Value::Time(ms) => store.set_time(name, ms),
                Value::Unit => {}
            }
        }
    }
}
