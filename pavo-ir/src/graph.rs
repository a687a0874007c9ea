use std::fmt;

use pavo_ast::Span;

use crate::node::{Node, NodeKind};

/// Stable handle of a node in a [Graph]. Ids are never reused within a
/// compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} is not live")]
    Dangling(NodeId),

    #[error("{referenced} cannot be deleted: {consumer} still references it")]
    LiveConsumer { referenced: NodeId, consumer: NodeId },

    #[error("{operand} cannot be used as an {expected} operand of a {kind} node")]
    OperandKind {
        operand: NodeId,
        expected: &'static str,
        kind: &'static str,
    },
}

/// Arena owning every IR node of one compile.
///
/// Storage is a slot vector indexed by [NodeId]; deletion tombstones the
/// slot so ids stay stable. Everything referencing a node holds a handle,
/// not ownership.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    /// Creates a node and returns its handle. Fails when an operand is not
    /// live or has the wrong class for its position.
    pub fn add(&mut self, kind: NodeKind, span: Span) -> Result<NodeId, GraphError> {
        self.validate_operands(&kind)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node { kind, span }));
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Deletes a node. Fails while a live node still references it.
    pub fn delete(&mut self, id: NodeId) -> Result<(), GraphError> {
        if !self.contains(id) {
            return Err(GraphError::Dangling(id));
        }
        if let Some((consumer, _)) = self
            .iter()
            .find(|(_, node)| node.kind.operands().contains(&id))
        {
            return Err(GraphError::LiveConsumer {
                referenced: id,
                consumer,
            });
        }
        self.nodes[id.0] = None;
        Ok(())
    }

    /// Live nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate_operands(&self, kind: &NodeKind) -> Result<(), GraphError> {
        match kind {
            NodeKind::Func(func) => {
                for arg in &func.args {
                    self.expect_expression(*arg, kind.name())?;
                }
            }
            NodeKind::Map(map) => {
                self.expect_operator(map.parent, kind.name())?;
                for (_, expr) in &map.exprs {
                    self.expect_expression(*expr, kind.name())?;
                }
            }
            NodeKind::Filter(filter) => {
                self.expect_operator(filter.parent, kind.name())?;
                self.expect_expression(filter.condition, kind.name())?;
            }
            NodeKind::MemorySink(sink) => {
                self.expect_operator(sink.parent, kind.name())?;
            }
            _ => {}
        }
        Ok(())
    }

    fn expect_expression(&self, id: NodeId, kind: &'static str) -> Result<(), GraphError> {
        let node = self.get(id).ok_or(GraphError::Dangling(id))?;
        if !node.kind.is_expression() {
            return Err(GraphError::OperandKind {
                operand: id,
                expected: "expression",
                kind,
            });
        }
        Ok(())
    }

    fn expect_operator(&self, id: NodeId, kind: &'static str) -> Result<(), GraphError> {
        let node = self.get(id).ok_or(GraphError::Dangling(id))?;
        if !node.kind.is_operator() {
            return Err(GraphError::OperandKind {
                operand: id,
                expected: "operator",
                kind,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::{Filter, Func, Map, MemorySink, MemorySource, Opcode};

    fn span() -> Span {
        Span::new(1, 1)
    }

    #[test]
    fn test_add_and_get() {
        let mut graph = Graph::new();
        let a = graph.add(NodeKind::Int(1), span()).unwrap();
        let b = graph.add(NodeKind::Int(2), span()).unwrap();
        let f = graph
            .add(
                NodeKind::Func(Func {
                    op: Opcode::Add,
                    args: vec![a, b],
                }),
                span(),
            )
            .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get(f).unwrap().kind.operands(), vec![a, b]);
    }

    #[test]
    fn test_delete_with_live_consumer_fails() {
        let mut graph = Graph::new();
        let a = graph.add(NodeKind::Int(1), span()).unwrap();
        let f = graph
            .add(
                NodeKind::Func(Func {
                    op: Opcode::Negate,
                    args: vec![a],
                }),
                span(),
            )
            .unwrap();

        assert_eq!(
            graph.delete(a),
            Err(GraphError::LiveConsumer {
                referenced: a,
                consumer: f,
            })
        );

        // deleting the consumer first unblocks the operand
        graph.delete(f).unwrap();
        graph.delete(a).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut graph = Graph::new();
        let a = graph.add(NodeKind::Int(1), span()).unwrap();
        graph.delete(a).unwrap();

        let b = graph.add(NodeKind::Int(2), span()).unwrap();
        assert_ne!(a, b);
        assert!(graph.get(a).is_none());
        assert!(graph.contains(b));
    }

    #[test]
    fn test_operand_class_is_validated() {
        let mut graph = Graph::new();
        let source = graph
            .add(
                NodeKind::MemorySource(MemorySource {
                    table: "t".to_string(),
                    columns: Vec::new(),
                }),
                span(),
            )
            .unwrap();
        let lit = graph.add(NodeKind::Int(1), span()).unwrap();

        // operator where an expression is required
        assert_eq!(
            graph.add(
                NodeKind::Func(Func {
                    op: Opcode::Negate,
                    args: vec![source],
                }),
                span(),
            ),
            Err(GraphError::OperandKind {
                operand: source,
                expected: "expression",
                kind: "func",
            })
        );

        // expression where an operator is required
        assert_eq!(
            graph.add(
                NodeKind::Map(Map {
                    parent: lit,
                    exprs: Vec::new(),
                    keep_input_columns: true,
                }),
                span(),
            ),
            Err(GraphError::OperandKind {
                operand: lit,
                expected: "operator",
                kind: "map",
            })
        );
    }

    #[test]
    fn test_dangling_operand_is_rejected() {
        let mut graph = Graph::new();
        let a = graph.add(NodeKind::Int(1), span()).unwrap();
        graph.delete(a).unwrap();

        assert_eq!(
            graph.add(
                NodeKind::Func(Func {
                    op: Opcode::Negate,
                    args: vec![a],
                }),
                span(),
            ),
            Err(GraphError::Dangling(a))
        );
    }

    #[test]
    fn test_pipeline_of_operators() {
        let mut graph = Graph::new();
        let source = graph
            .add(
                NodeKind::MemorySource(MemorySource {
                    table: "events".to_string(),
                    columns: Vec::new(),
                }),
                span(),
            )
            .unwrap();
        let cond = graph.add(NodeKind::Bool(true), span()).unwrap();
        let filter = graph
            .add(
                NodeKind::Filter(Filter {
                    parent: source,
                    condition: cond,
                }),
                span(),
            )
            .unwrap();
        let sink = graph
            .add(
                NodeKind::MemorySink(MemorySink {
                    parent: filter,
                    name: "out".to_string(),
                    columns: Vec::new(),
                }),
                span(),
            )
            .unwrap();

        assert!(graph.get(sink).unwrap().kind.is_operator());
        assert_eq!(graph.delete(source), Err(GraphError::LiveConsumer {
            referenced: source,
            consumer: filter,
        }));
    }
}
