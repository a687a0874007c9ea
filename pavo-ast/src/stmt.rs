use enum_as_inner::EnumAsInner;

use crate::expr::Expr;
use crate::span::Span;

/// Top-level syntax tree of one source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Suite,
}

/// Ordered list of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Suite {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new<K: Into<StmtKind>>(kind: K, span: Span) -> Stmt {
        Stmt {
            kind: kind.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum StmtKind {
    Import(Import),
    ImportFrom(ImportFrom),
    Expr(Expr),
    Assign(Assign),
    FunctionDef(FunctionDef),
    DocString(String),
    Return(Option<Expr>),
}

/// `import M [as N]`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub name: String,
    pub as_name: Option<String>,
}

/// `from M import x [as y], ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFrom {
    pub module: String,
    pub names: Vec<Alias>,
    /// Relative import level. Only 0 is evaluated.
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub name: String,
    pub as_name: Option<String>,
}

impl Alias {
    pub fn new(name: impl Into<String>) -> Alias {
        Alias {
            name: name.into(),
            as_name: None,
        }
    }

    /// Name the alias binds in the importing scope.
    pub fn bound_name(&self) -> &str {
        self.as_name.as_deref().unwrap_or(&self.name)
    }
}

/// Assignment statement. The target list is kept in grammar shape; the
/// evaluator only accepts a single target.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub targets: Vec<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    /// `*args` parameter name, if declared. Rejected at evaluation.
    pub vararg: Option<String>,
    /// `**kwargs` parameter name, if declared. Rejected at evaluation.
    pub kwarg: Option<String>,
    pub decorators: Vec<Expr>,
    pub body: Suite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Expr>,
    /// Default value, if declared. Rejected at evaluation.
    pub default: Option<Expr>,
    pub span: Span,
}

impl From<Import> for StmtKind {
    fn from(value: Import) -> Self {
        StmtKind::Import(value)
    }
}

impl From<ImportFrom> for StmtKind {
    fn from(value: ImportFrom) -> Self {
        StmtKind::ImportFrom(value)
    }
}

impl From<Assign> for StmtKind {
    fn from(value: Assign) -> Self {
        StmtKind::Assign(value)
    }
}

impl From<FunctionDef> for StmtKind {
    fn from(value: FunctionDef) -> Self {
        StmtKind::FunctionDef(value)
    }
}
