//! iecst-ast: the AST contract this execution engine consumes.
//!
//! A structurally-defined tree - programs, VAR blocks, statements,
//! expressions - produced by an external parser this workspace does not
//! implement. The builder functions on each node type exist so embedders
//! (and this crate's own tests) can construct a tree directly, the same way
//! a parser would, without needing a grammar or a lexer.

pub mod expr;
pub mod pou;
pub mod stmt;

pub use expr::{Arg, BinaryOp, Expr, Literal, UnaryOp};
pub use pou::{AstProgram, Declaration, Pou, PouKind, VarBlock};
pub use stmt::{CaseArm, CaseLabel, Stmt};
