use pavo_ir as ir;

use crate::error::Diagnostic;
use crate::Result;

/// Primitive data-type marker, bound under `int`, `float` and friends in
/// the root scope and usable as a parameter annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeObject {
    data_type: ir::DataType,
}

impl TypeObject {
    pub fn new(data_type: ir::DataType) -> TypeObject {
        TypeObject { data_type }
    }

    pub fn data_type(&self) -> ir::DataType {
        self.data_type
    }

    pub fn type_name(&self) -> &str {
        self.data_type.as_ref()
    }

    /// Checks an expression node against this type. Nodes whose type the
    /// front-end cannot resolve yet (columns, function applications) pass;
    /// the planner re-checks them once column types are known.
    pub fn node_matches(&self, graph: &ir::Graph, node: ir::NodeId) -> Result<()> {
        let Some(n) = graph.get(node) else {
            return Err(Diagnostic::internal(format!(
                "type check against node {node} that is not live"
            )));
        };
        if !n.kind.is_expression() {
            return Err(Diagnostic::type_error(format!(
                "expected a '{}' expression, received a {}",
                self.type_name(),
                n.kind.name()
            )));
        }
        match n.kind.data_type() {
            None => Ok(()),
            Some(dt) if dt == self.data_type => Ok(()),
            // time literals satisfy duration annotations; both are
            // nanosecond counts until the planner distinguishes them
            Some(ir::DataType::Time) if self.data_type == ir::DataType::Duration => Ok(()),
            Some(dt) => Err(Diagnostic::type_error(format!(
                "expected '{}', received '{}'",
                self.type_name(),
                dt.as_ref()
            ))),
        }
    }
}

#[cfg(test)]
mod test {
    use pavo_ast::Span;
    use pavo_ir::{Column, NodeKind};

    use super::*;

    #[test]
    fn test_literal_matching() {
        let mut graph = ir::Graph::new();
        let int = graph.add(NodeKind::Int(3), Span::default()).unwrap();
        let float = graph.add(NodeKind::Float(3.0), Span::default()).unwrap();

        let ty = TypeObject::new(ir::DataType::Int);
        assert!(ty.node_matches(&graph, int).is_ok());

        let err = ty.node_matches(&graph, float).unwrap_err();
        assert!(err.message.contains("expected 'int', received 'float'"));
    }

    #[test]
    fn test_unresolved_nodes_pass() {
        let mut graph = ir::Graph::new();
        let column = graph
            .add(
                NodeKind::Column(Column {
                    name: "a".to_string(),
                }),
                Span::default(),
            )
            .unwrap();

        let ty = TypeObject::new(ir::DataType::Float);
        assert!(ty.node_matches(&graph, column).is_ok());
    }
}
