use enum_as_inner::EnumAsInner;
use pavo_ast::Span;

use crate::graph::NodeId;

/// Primitive data types of the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DataType {
    Bool,
    Int,
    Float,
    String,
    Time,
    Duration,
    #[strum(serialize = "uint128")]
    UInt128,
}

/// Opcode of a scalar function application. The name is what the planner
/// resolves against the platform function registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Negate,
    Not,
    Invert,
}

impl Opcode {
    pub fn fn_name(&self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Sub => "subtract",
            Opcode::Mult => "multiply",
            Opcode::Div => "divide",
            Opcode::Mod => "modulo",
            Opcode::Eq => "equal",
            Opcode::NotEq => "notEqual",
            Opcode::Lt => "lessThan",
            Opcode::LtEq => "lessThanEqual",
            Opcode::Gt => "greaterThan",
            Opcode::GtEq => "greaterThanEqual",
            Opcode::And => "logicalAnd",
            Opcode::Or => "logicalOr",
            Opcode::Negate => "negate",
            Opcode::Not => "logicalNot",
            Opcode::Invert => "invert",
        }
    }
}

/// A node in the IR graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Source location the node was created for.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum NodeKind {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Nanoseconds since the epoch.
    Time(i64),
    Column(Column),
    Func(Func),
    MemorySource(MemorySource),
    Map(Map),
    Filter(Filter),
    MemorySink(MemorySink),
}

/// Reference to a column of the relation the containing operator runs over.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
}

/// Scalar function application.
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub op: Opcode,
    pub args: Vec<NodeId>,
}

/// Scan of a named table.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySource {
    pub table: String,
    /// Column selection; empty means all columns.
    pub columns: Vec<String>,
}

/// Projects or augments the columns of its input relation.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub parent: NodeId,
    pub exprs: Vec<(String, NodeId)>,
    pub keep_input_columns: bool,
}

/// Keeps the rows of its input relation for which the condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub parent: NodeId,
    pub condition: NodeId,
}

/// Terminal operator naming an output table.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySink {
    pub parent: NodeId,
    pub name: String,
    pub columns: Vec<String>,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Bool(_) => "bool",
            NodeKind::Int(_) => "int",
            NodeKind::Float(_) => "float",
            NodeKind::String(_) => "string",
            NodeKind::Time(_) => "time",
            NodeKind::Column(_) => "column",
            NodeKind::Func(_) => "func",
            NodeKind::MemorySource(_) => "memory_source",
            NodeKind::Map(_) => "map",
            NodeKind::Filter(_) => "filter",
            NodeKind::MemorySink(_) => "memory_sink",
        }
    }

    /// Scalar expression, usable as a function operand or map column.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Bool(_)
                | NodeKind::Int(_)
                | NodeKind::Float(_)
                | NodeKind::String(_)
                | NodeKind::Time(_)
                | NodeKind::Column(_)
                | NodeKind::Func(_)
        )
    }

    /// Relational operator, usable as another operator's input.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            NodeKind::MemorySource(_)
                | NodeKind::Map(_)
                | NodeKind::Filter(_)
                | NodeKind::MemorySink(_)
        )
    }

    /// Data type of a literal. `None` when resolution is left to the
    /// planner (columns, function applications) or for operators.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            NodeKind::Bool(_) => Some(DataType::Bool),
            NodeKind::Int(_) => Some(DataType::Int),
            NodeKind::Float(_) => Some(DataType::Float),
            NodeKind::String(_) => Some(DataType::String),
            NodeKind::Time(_) => Some(DataType::Time),
            _ => None,
        }
    }

    /// Ids of every node this node references.
    pub fn operands(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Func(func) => func.args.clone(),
            NodeKind::Map(map) => {
                let mut ids = vec![map.parent];
                ids.extend(map.exprs.iter().map(|(_, id)| *id));
                ids
            }
            NodeKind::Filter(filter) => vec![filter.parent, filter.condition],
            NodeKind::MemorySink(sink) => vec![sink.parent],
            _ => Vec::new(),
        }
    }
}
