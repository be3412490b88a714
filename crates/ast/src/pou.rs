//! Program Organization Units: PROGRAM / FUNCTION / FUNCTION_BLOCK, their
//! VAR blocks, and the root of a consumed AST.

use crate::expr::Expr;
use crate::stmt::Stmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PouKind {
    Program,
    Function,
    FunctionBlock,
}

/// Which VAR section a block came from. The initializer and the FB-call
/// argument binder both need this to tell inputs from outputs; everything
/// else treats a block's declarations uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarBlockKind {
    #[default]
    Var,
    VarInput,
    VarOutput,
    VarInOut,
}

/// One `name1, name2 : TYPE [:= initializer];` declaration. Multiple names
/// sharing a type and initializer are kept together, matching how a VAR
/// block's declaration list is written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub names: Vec<String>,
    /// Raw type name as written (`"INT"`, `"TON"`, `"MyAccumulator"`, ...).
    /// Classifying this into a `DeclaredType` is the initializer's job
    /// (`iecst_runtime::registry`), not the AST's.
    pub data_type: String,
    pub initializer: Option<Expr>,
}

impl Declaration {
    pub fn new(
        names: Vec<impl Into<String>>,
        data_type: impl Into<String>,
        initializer: Option<Expr>,
    ) -> Self {
        Declaration {
            names: names.into_iter().map(Into::into).collect(),
            data_type: data_type.into(),
            initializer,
        }
    }

    pub fn single(
        name: impl Into<String>,
        data_type: impl Into<String>,
        initializer: Option<Expr>,
    ) -> Self {
        Declaration {
            names: vec![name.into()],
            data_type: data_type.into(),
            initializer,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarBlock {
    pub kind: VarBlockKind,
    pub declarations: Vec<Declaration>,
}

impl VarBlock {
    pub fn new(kind: VarBlockKind, declarations: Vec<Declaration>) -> Self {
        VarBlock { kind, declarations }
    }

    pub fn var(declarations: Vec<Declaration>) -> Self {
        VarBlock::new(VarBlockKind::Var, declarations)
    }

    pub fn var_input(declarations: Vec<Declaration>) -> Self {
        VarBlock::new(VarBlockKind::VarInput, declarations)
    }

    pub fn var_output(declarations: Vec<Declaration>) -> Self {
        VarBlock::new(VarBlockKind::VarOutput, declarations)
    }

    pub fn var_in_out(declarations: Vec<Declaration>) -> Self {
        VarBlock::new(VarBlockKind::VarInOut, declarations)
    }

    /// Declared names in this block, in source order, names within a
    /// multi-name declaration kept left to right.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations
            .iter()
            .flat_map(|d| d.names.iter().map(String::as_str))
    }
}

/// One Program Organization Unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Pou {
    pub name: String,
    pub kind: PouKind,
    pub var_blocks: Vec<VarBlock>,
    pub statements: Vec<Stmt>,
}

impl Pou {
    pub fn new(
        name: impl Into<String>,
        kind: PouKind,
        var_blocks: Vec<VarBlock>,
        statements: Vec<Stmt>,
    ) -> Self {
        Pou {
            name: name.into(),
            kind,
            var_blocks,
            statements,
        }
    }

    pub fn program(
        name: impl Into<String>,
        var_blocks: Vec<VarBlock>,
        statements: Vec<Stmt>,
    ) -> Self {
        Pou::new(name, PouKind::Program, var_blocks, statements)
    }

    pub fn function_block(
        name: impl Into<String>,
        var_blocks: Vec<VarBlock>,
        statements: Vec<Stmt>,
    ) -> Self {
        Pou::new(name, PouKind::FunctionBlock, var_blocks, statements)
    }

    pub fn function(
        name: impl Into<String>,
        var_blocks: Vec<VarBlock>,
        statements: Vec<Stmt>,
    ) -> Self {
        Pou::new(name, PouKind::Function, var_blocks, statements)
    }

    /// `VAR_INPUT` names in declaration order, flattened across blocks and
    /// multi-name declarations - the positional-argument order for a call.
    pub fn input_names(&self) -> Vec<&str> {
        self.var_blocks
            .iter()
            .filter(|b| b.kind == VarBlockKind::VarInput)
            .flat_map(VarBlock::names)
            .collect()
    }
}

/// The root of the AST contract consumed by the engine (spec.md §6).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AstProgram {
    pub pous: Vec<Pou>,
    pub top_level_var_blocks: Vec<VarBlock>,
    pub top_level_statements: Vec<Stmt>,
}

impl AstProgram {
    pub fn new(pous: Vec<Pou>) -> Self {
        AstProgram {
            pous,
            top_level_var_blocks: Vec::new(),
            top_level_statements: Vec::new(),
        }
    }

    pub fn find_pou(&self, name: &str) -> Option<&Pou> {
        self.pous.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
