//! Statement nodes.

use crate::expr::{Arg, Expr};

/// One label group of a CASE arm: `1, 3, 5:` or `6..10:`. A label is a
/// single constant, a comma-separated list (modeled as multiple
/// `CaseLabel`s on the same arm), or an inclusive range.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabel {
    Const(Expr),
    Range(Expr, Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseArm {
    pub labels: Vec<CaseLabel>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign {
        target: Expr,
        value: Expr,
    },
    /// IF / ELSIF chain: each branch is `(condition, body)`, tested in
    /// order; `else_branch` runs if none matched.
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        else_branch: Option<Vec<Stmt>>,
    },
    Case {
        selector: Expr,
        arms: Vec<CaseArm>,
        else_branch: Option<Vec<Stmt>>,
    },
    For {
        var: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    Repeat {
        body: Vec<Stmt>,
        cond: Expr,
    },
    Exit,
    Continue,
    Return,
    /// A stateful FB instance call statement, e.g. `Timer1(IN := x, PT :=
    /// T#500ms);` or a bare `Timer1();`.
    FbCall {
        name: String,
        args: Vec<Arg>,
    },
    ExprStmt(Expr),
}

impl Stmt {
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }

    pub fn if_then(cond: Expr, body: Vec<Stmt>) -> IfBuilder {
        IfBuilder {
            branches: vec![(cond, body)],
            else_branch: None,
        }
    }

    pub fn for_loop(
        var: impl Into<String>,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Vec<Stmt>,
    ) -> Self {
        Stmt::For {
            var: var.into(),
            start,
            end,
            step,
            body,
        }
    }

    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While { cond, body }
    }

    pub fn repeat_until(body: Vec<Stmt>, cond: Expr) -> Self {
        Stmt::Repeat { body, cond }
    }

    pub fn fb_call(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Stmt::FbCall {
            name: name.into(),
            args,
        }
    }
}

/// Small fluent builder so tests can add ELSIF/ELSE without hand-nesting
/// the `branches` vector.
pub struct IfBuilder {
    branches: Vec<(Expr, Vec<Stmt>)>,
    else_branch: Option<Vec<Stmt>>,
}

impl IfBuilder {
    pub fn elsif(mut self, cond: Expr, body: Vec<Stmt>) -> Self {
        self.branches.push((cond, body));
        self
    }

    pub fn else_(mut self, body: Vec<Stmt>) -> Self {
        self.else_branch = Some(body);
        self
    }

    pub fn build(self) -> Stmt {
        Stmt::If {
            branches: self.branches,
            else_branch: self.else_branch,
        }
    }
}
