use std::rc::Rc;

use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::objects::{ModuleHandler, Object, ObjectRef, TypeObject};
use crate::semantic::ScopeRef;
use crate::Result;

mod expr;
mod functions;
mod ops;
mod stmt;

pub(crate) use stmt::SuiteKind;

/// Walks syntax trees, dispatching on node kind, and produces objects and
/// IR nodes. One evaluator frame per scope; nested frames share the graph
/// and the module handler.
pub struct Evaluator<'a> {
    graph: &'a mut ir::Graph,
    modules: &'a mut ModuleHandler,
    scope: ScopeRef,
    time_now: i64,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(
        graph: &'a mut ir::Graph,
        modules: &'a mut ModuleHandler,
        scope: ScopeRef,
        time_now: i64,
    ) -> Evaluator<'a> {
        Evaluator {
            graph,
            modules,
            scope,
            time_now,
        }
    }

    pub fn graph(&self) -> &ir::Graph {
        self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ir::Graph {
        self.graph
    }

    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// Compile-time clock, nanoseconds since the epoch.
    pub fn time_now(&self) -> i64 {
        self.time_now
    }

    /// Frame over the same graph and module handler, with its own scope.
    pub(crate) fn child(&mut self, scope: ScopeRef) -> Evaluator<'_> {
        Evaluator {
            graph: self.graph,
            modules: self.modules,
            scope,
            time_now: self.time_now,
        }
    }

    /// Seeds the root scope: type sentinels, `None` and the boolean
    /// literal singletons.
    pub(crate) fn init_globals(&mut self) -> Result<()> {
        let scope = self.scope.clone();
        let span = ast::Span::default();

        let mut scope = scope.borrow_mut();
        for (name, data_type) in [
            ("bool", ir::DataType::Bool),
            ("int", ir::DataType::Int),
            ("float", ir::DataType::Float),
            ("string", ir::DataType::String),
        ] {
            scope.add(name, Rc::new(Object::Type(TypeObject::new(data_type))));
        }
        scope.add("None", Object::none());

        let true_node = self.graph.add(ir::NodeKind::Bool(true), span)?;
        scope.add("True", Object::expr(true_node));
        let false_node = self.graph.add(ir::NodeKind::Bool(false), span)?;
        scope.add("False", Object::expr(false_node));
        Ok(())
    }

    /// The object's backing IR node, required to be a scalar expression.
    pub(crate) fn expr_node_of(
        &self,
        object: &ObjectRef,
        what: &str,
        span: ast::Span,
    ) -> Result<ir::NodeId> {
        object
            .ir_node()
            .filter(|id| self.graph.get(*id).is_some_and(|n| n.kind.is_expression()))
            .ok_or_else(|| {
                Diagnostic::type_error(format!(
                    "expected an expression for {what}, received a {}",
                    object.kind_name()
                ))
                .with_span(Some(span))
            })
    }

    /// Reads a string literal out of an argument object.
    pub fn str_literal_arg(
        &self,
        object: &ObjectRef,
        what: &str,
        span: ast::Span,
    ) -> Result<String> {
        object
            .ir_node()
            .and_then(|id| self.graph.get(id))
            .and_then(|n| n.kind.as_string())
            .cloned()
            .ok_or_else(|| {
                Diagnostic::type_error(format!(
                    "expected a string literal for '{what}', received a {}",
                    object.kind_name()
                ))
                .with_span(Some(span))
            })
    }

    pub(crate) fn lookup_name(&self, name: &str, span: ast::Span) -> Result<ObjectRef> {
        self.scope.borrow().lookup(name).ok_or_else(|| {
            Diagnostic::name_error(format!("name '{name}' is not defined")).with_span(Some(span))
        })
    }

    pub(crate) fn module(&self, name: &str) -> Option<ObjectRef> {
        self.modules.get(name).cloned()
    }

    pub(crate) fn bind_scope(&self, name: &str, value: ObjectRef) {
        self.scope.borrow_mut().add(name, value);
    }
}
