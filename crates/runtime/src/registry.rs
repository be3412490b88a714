//! Type Registry (spec.md §4.2): maps each variable name to its declared
//! type category, built once at initialization and immutable afterward
//! (spec.md §5). Assignment and identifier resolution both consult it.

use crate::fb::{BistableKind, CounterKind, TimerKind};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Bool,
    Int,
    Real,
    Time,
    Timer(TimerKind),
    Counter(CounterKind),
    REdge,
    FEdge,
    Bistable(BistableKind),
    /// Names a `FUNCTION_BLOCK` POU in the AST.
    UserFb(String),
    Unknown,
}

/// Recognizes a primitive or standard-FB type name. Does not attempt
/// `FUNCTION_BLOCK` classification - that needs the AST, which the
/// initializer has and this free function does not; a type name this
/// doesn't recognize is returned as a candidate user-FB name for the caller
/// to resolve.
pub fn classify_builtin(raw: &str) -> Option<DeclaredType> {
    let upper = raw.to_ascii_uppercase();
    match upper.as_str() {
        "BOOL" => Some(DeclaredType::Bool),
        "INT" | "DINT" | "SINT" | "LINT" | "UINT" | "UDINT" | "USINT" | "ULINT" => {
            Some(DeclaredType::Int)
        }
        "REAL" | "LREAL" => Some(DeclaredType::Real),
        "TIME" => Some(DeclaredType::Time),
        "TON" => Some(DeclaredType::Timer(TimerKind::Ton)),
        "TOF" => Some(DeclaredType::Timer(TimerKind::Tof)),
        "TP" => Some(DeclaredType::Timer(TimerKind::Tp)),
        "CTU" => Some(DeclaredType::Counter(CounterKind::Ctu)),
        "CTD" => Some(DeclaredType::Counter(CounterKind::Ctd)),
        "CTUD" => Some(DeclaredType::Counter(CounterKind::Ctud)),
        "R_TRIG" => Some(DeclaredType::REdge),
        "F_TRIG" => Some(DeclaredType::FEdge),
        "SR" => Some(DeclaredType::Bistable(BistableKind::Sr)),
        "RS" => Some(DeclaredType::Bistable(BistableKind::Rs)),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    types: HashMap<String, DeclaredType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: DeclaredType) {
        self.types.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> DeclaredType {
        self.types.get(name).cloned().unwrap_or(DeclaredType::Unknown)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeclaredType)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_family_collapses_to_int() {
        for name in ["INT", "DINT", "SINT", "LINT", "UINT", "UDINT", "USINT", "ULINT"] {
            assert_eq!(classify_builtin(name), Some(DeclaredType::Int));
        }
    }

    #[test]
    fn real_family_collapses_to_real() {
        assert_eq!(classify_builtin("REAL"), Some(DeclaredType::Real));
        assert_eq!(classify_builtin("LREAL"), Some(DeclaredType::Real));
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify_builtin("bool"), Some(DeclaredType::Bool));
        assert_eq!(classify_builtin("ton"), Some(DeclaredType::Timer(TimerKind::Ton)));
    }

    #[test]
    fn unrecognized_name_is_none() {
        assert_eq!(classify_builtin("MyAccumulator"), None);
    }

    #[test]
    fn registry_defaults_unknown_for_unbound_name() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.get("nope"), DeclaredType::Unknown);
    }
}
