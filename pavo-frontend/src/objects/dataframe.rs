use std::rc::Rc;

use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::objects::{FuncObject, Object};
use crate::Result;

/// Script-visible handle over a relational operator node.
///
/// Attribute access yields column references. Subscripting is routed
/// through [Dataframe::subscript_func]; attribute assignment is forbidden
/// (map assignment rewrites go through the evaluator instead).
#[derive(Debug, Clone)]
pub struct Dataframe {
    op: ir::NodeId,
}

impl Dataframe {
    pub fn new(op: ir::NodeId) -> Dataframe {
        Dataframe { op }
    }

    /// The operator node this dataframe wraps.
    pub fn op(&self) -> ir::NodeId {
        self.op
    }

    /// Materializes a reference to one of this dataframe's columns.
    pub fn column(&self, graph: &mut ir::Graph, name: &str, span: ast::Span) -> Result<ir::NodeId> {
        let column = graph.add(
            ir::NodeKind::Column(ir::Column {
                name: name.to_string(),
            }),
            span,
        )?;
        Ok(column)
    }

    /// New dataframe with `name` added (or replaced), keeping the input
    /// columns. This is the map-assignment rewrite target.
    pub fn from_column_assignment(
        &self,
        graph: &mut ir::Graph,
        name: &str,
        value: ir::NodeId,
        span: ast::Span,
    ) -> Result<Dataframe> {
        let map = graph.add(
            ir::NodeKind::Map(ir::Map {
                parent: self.op,
                exprs: vec![(name.to_string(), value)],
                keep_input_columns: true,
            }),
            span,
        )?;
        Ok(Dataframe::new(map))
    }

    /// `df[...]`: a string key selects a column, a list of string keys
    /// projects, and a boolean expression filters.
    pub fn subscript_func(&self) -> FuncObject {
        let op = self.op;
        FuncObject::native(
            "__getitem__",
            &["key"],
            Rc::new(move |ev, span, args| {
                let key = args.get("key").clone();

                if let Some(node) = key.ir_node() {
                    // a string literal key is a column selection
                    let name = ev
                        .graph()
                        .get(node)
                        .and_then(|n| n.kind.as_string())
                        .cloned();
                    if let Some(name) = name {
                        let column = ev.graph_mut().add(
                            ir::NodeKind::Column(ir::Column { name }),
                            span,
                        )?;
                        return Ok(Object::expr(column));
                    }

                    // any other expression filters the rows
                    if ev.graph().get(node).is_some_and(|n| n.kind.is_expression()) {
                        let filter = ev.graph_mut().add(
                            ir::NodeKind::Filter(ir::Filter {
                                parent: op,
                                condition: node,
                            }),
                            span,
                        )?;
                        return Ok(Rc::new(Object::Dataframe(Dataframe::new(filter))));
                    }
                }

                if let Object::Collection(collection) = key.as_ref() {
                    let mut names = Vec::with_capacity(collection.items.len());
                    for item in &collection.items {
                        let name = item
                            .ir_node()
                            .and_then(|id| ev.graph().get(id))
                            .and_then(|n| n.kind.as_string())
                            .cloned();
                        let Some(name) = name else {
                            return Err(Diagnostic::type_error(
                                "dataframe projection requires a list of column name strings",
                            )
                            .with_span(Some(span)));
                        };
                        names.push(name);
                    }
                    let mut exprs = Vec::with_capacity(names.len());
                    for name in names {
                        let column = ev.graph_mut().add(
                            ir::NodeKind::Column(ir::Column { name: name.clone() }),
                            span,
                        )?;
                        exprs.push((name, column));
                    }
                    let map = ev.graph_mut().add(
                        ir::NodeKind::Map(ir::Map {
                            parent: op,
                            exprs,
                            keep_input_columns: false,
                        }),
                        span,
                    )?;
                    return Ok(Rc::new(Object::Dataframe(Dataframe::new(map))));
                }

                Err(Diagnostic::type_error(format!(
                    "expected a column name, a list of column names or a filter \
                     expression, received a '{}'",
                    key.kind_name()
                ))
                .with_span(Some(span)))
            }),
        )
    }
}
