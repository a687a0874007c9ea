use enum_as_inner::EnumAsInner;

use crate::ops::{BinOp, BoolOp, CmpOp, UnaryOp};
use crate::span::Span;

/// Expr is anything that has a value when evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new<K: Into<ExprKind>>(kind: K, span: Span) -> Expr {
        Expr {
            kind: kind.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum ExprKind {
    Name(String),
    Number(Number),
    Str(String),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Slice>,
    },
    Call(Call),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Binary(BinaryExpr),
    Bool(BoolExpr),
    Compare(CompareExpr),
    Unary(UnaryExpr),
}

/// Numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Expression with two operands and an operator, such as `1 + 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinOp,
    pub right: Box<Expr>,
}

/// `and`/`or` over a value list. The evaluator accepts exactly two values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolExpr {
    pub op: BoolOp,
    pub values: Vec<Expr>,
}

/// Comparison with operator and comparator lists, as the host grammar
/// produces them. The evaluator accepts exactly one of each.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareExpr {
    pub left: Box<Expr>,
    pub ops: Vec<CmpOp>,
    pub comparators: Vec<Expr>,
}

/// Expression with one operand and an operator, such as `-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

/// Function call with positional and keyword arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
}

/// Subscript slice. Only plain indices are evaluated; ranges are rejected
/// with a diagnostic.
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Slice {
    Index(Expr),
    Range {
        lower: Option<Expr>,
        upper: Option<Expr>,
        step: Option<Expr>,
    },
}

impl From<Number> for ExprKind {
    fn from(value: Number) -> Self {
        ExprKind::Number(value)
    }
}

impl From<Call> for ExprKind {
    fn from(value: Call) -> Self {
        ExprKind::Call(value)
    }
}

impl From<BinaryExpr> for ExprKind {
    fn from(value: BinaryExpr) -> Self {
        ExprKind::Binary(value)
    }
}

impl From<BoolExpr> for ExprKind {
    fn from(value: BoolExpr) -> Self {
        ExprKind::Bool(value)
    }
}

impl From<CompareExpr> for ExprKind {
    fn from(value: CompareExpr) -> Self {
        ExprKind::Compare(value)
    }
}

impl From<UnaryExpr> for ExprKind {
    fn from(value: UnaryExpr) -> Self {
        ExprKind::Unary(value)
    }
}
