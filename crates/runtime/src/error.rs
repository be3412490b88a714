//! Diagnostics for initialization. Nothing in this crate ever returns an
//! `Err` for a *user-code* fault once a scan is running - that's the
//! taxonomy in spec.md §7, handled by sentinel values and `tracing::warn!`
//! at the call site. This module only covers the one place a malformed AST
//! node needs a name: initialization, which walks declarations it did not
//! write and may find one it cannot classify.

use std::fmt;

/// A single declaration or FB type the Initializer could not make sense of.
/// Collected, never fatal - the rest of the AST still initializes.
#[derive(Debug, Clone, PartialEq)]
pub struct InitWarning {
    pub pou_name: String,
    pub var_name: String,
    pub reason: InitWarningReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitWarningReason {
    /// `data_type` names neither a primitive, a standard FB, nor a
    /// `FUNCTION_BLOCK` POU present in the AST.
    UnknownType(String),
    /// The declared FB kind is valid but disabled by `RuntimeConfig`.
    FbKindDisabled(String),
    /// An initializer expression exists but is not one of the statically
    /// evaluable forms (literal, or unary minus of a literal); the default
    /// value for the declared type was used instead.
    NonStaticInitializer,
    /// A `FUNCTION_BLOCK` POU referenced as a type could not itself be
    /// found when instantiating a nested instance.
    UndefinedFunctionBlock(String),
}

impl fmt::Display for InitWarningReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitWarningReason::UnknownType(t) => write!(f, "unrecognized type `{t}`"),
            InitWarningReason::FbKindDisabled(t) => write!(f, "function block `{t}` is disabled"),
            InitWarningReason::NonStaticInitializer => {
                write!(f, "initializer is not statically evaluable; using type default")
            }
            InitWarningReason::UndefinedFunctionBlock(t) => {
                write!(f, "no FUNCTION_BLOCK named `{t}` in the AST")
            }
        }
    }
}

impl fmt::Display for InitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}: {}", self.pou_name, self.var_name, self.reason)
    }
}

/// A structural problem severe enough that no store could be produced at
/// all - reserved for a completely empty/contradictory AST (e.g. a POU
/// referencing itself as its only VAR_INPUT type, infinitely). Initializing
/// a normal program, even one riddled with `InitWarning`s, never returns
/// this; it is here so the API has a place to put a true abort if an
/// embedder's AST layer ever needs one.
#[derive(Debug, Clone, PartialEq)]
pub struct InitError(pub String);

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "initialization failed: {}", self.0)
    }
}

impl std::error::Error for InitError {}
