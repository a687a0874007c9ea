use itertools::Itertools;

use crate::graph::Graph;
use crate::node::NodeKind;

/// Renders the live nodes of a graph in id order, one per line. The output
/// is deterministic and meant for logs and snapshot tests.
pub fn print(graph: &Graph) -> String {
    graph
        .iter()
        .map(|(id, node)| format!("{id} = {} @{}", print_kind(&node.kind), node.span))
        .join("\n")
}

fn print_kind(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Bool(v) => format!("bool {v}"),
        NodeKind::Int(v) => format!("int {v}"),
        NodeKind::Float(v) => format!("float {v:?}"),
        NodeKind::String(v) => format!("string {v:?}"),
        NodeKind::Time(v) => format!("time {v}"),
        NodeKind::Column(column) => format!("column {:?}", column.name),
        NodeKind::Func(func) => format!(
            "{}({})",
            func.op.fn_name(),
            func.args.iter().map(|id| id.to_string()).join(", ")
        ),
        NodeKind::MemorySource(source) => {
            let mut out = format!("memory_source {:?}", source.table);
            if !source.columns.is_empty() {
                out.push_str(&format!(" select=[{}]", source.columns.join(", ")));
            }
            out
        }
        NodeKind::Map(map) => {
            let exprs = map
                .exprs
                .iter()
                .map(|(name, id)| format!("{name:?}={id}"))
                .join(", ");
            let mut out = format!("map({}) {exprs}", map.parent);
            if map.keep_input_columns {
                out.push_str(" keep_input");
            }
            out
        }
        NodeKind::Filter(filter) => format!("filter({}) when={}", filter.parent, filter.condition),
        NodeKind::MemorySink(sink) => format!("memory_sink({}) {:?}", sink.parent, sink.name),
    }
}

#[cfg(test)]
mod test {
    use insta::assert_snapshot;
    use pavo_ast::Span;

    use super::*;
    use crate::node::{Column, Func, Map, MemorySink, MemorySource, Opcode};

    #[test]
    fn test_print() {
        let mut graph = Graph::new();
        let source = graph
            .add(
                NodeKind::MemorySource(MemorySource {
                    table: "http_events".to_string(),
                    columns: Vec::new(),
                }),
                Span::new(1, 6),
            )
            .unwrap();
        let col = graph
            .add(
                NodeKind::Column(Column {
                    name: "latency".to_string(),
                }),
                Span::new(2, 13),
            )
            .unwrap();
        let lit = graph.add(NodeKind::Int(2), Span::new(2, 28)).unwrap();
        let func = graph
            .add(
                NodeKind::Func(Func {
                    op: Opcode::Mult,
                    args: vec![col, lit],
                }),
                Span::new(2, 13),
            )
            .unwrap();
        let map = graph
            .add(
                NodeKind::Map(Map {
                    parent: source,
                    exprs: vec![("double".to_string(), func)],
                    keep_input_columns: true,
                }),
                Span::new(2, 1),
            )
            .unwrap();
        graph
            .add(
                NodeKind::MemorySink(MemorySink {
                    parent: map,
                    name: "out".to_string(),
                    columns: Vec::new(),
                }),
                Span::new(3, 1),
            )
            .unwrap();

        assert_snapshot!(print(&graph), @r#"
        %0 = memory_source "http_events" @1:6
        %1 = column "latency" @2:13
        %2 = int 2 @2:28
        %3 = multiply(%1, %2) @2:13
        %4 = map(%0) "double"=%3 keep_input @2:1
        %5 = memory_sink(%4) "out" @3:1
        "#);
    }

    #[test]
    fn test_print_skips_deleted_nodes() {
        let mut graph = Graph::new();
        let a = graph.add(NodeKind::Int(1), Span::new(1, 1)).unwrap();
        graph.add(NodeKind::Int(2), Span::new(1, 5)).unwrap();
        graph.delete(a).unwrap();

        assert_snapshot!(print(&graph), @"%1 = int 2 @1:5");
    }
}
