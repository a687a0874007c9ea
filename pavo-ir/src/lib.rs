//! Intermediate representation of the pavo query compiler.
//!
//! One compile owns one [Graph]. The graph is an arena: it owns node
//! storage and hands out stable [NodeId] handles. Expression nodes are
//! scalar computations; operator nodes are relational and form the plan
//! consumed by the downstream planner.

mod graph;
mod node;
mod printer;

pub use graph::{Graph, GraphError, NodeId};
pub use node::{
    Column, DataType, Filter, Func, Map, MemorySink, MemorySource, Node, NodeKind, Opcode,
};
pub use printer::print;
