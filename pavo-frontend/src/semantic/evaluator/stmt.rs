use std::rc::Rc;

use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::objects::{Dataframe, Object, ObjectRef};
use crate::semantic::{ContextRole, OperatorContext};
use crate::Result;

/// Whether a suite is a module body or a function definition body. The
/// two differ in doc-string binding and in whether `return` is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SuiteKind {
    Module,
    FunctionBody,
}

impl super::Evaluator<'_> {
    /// Evaluates a statement suite. Yields the returned object inside
    /// function bodies; falling off the end yields a None.
    pub(crate) fn eval_suite(&mut self, suite: &ast::Suite, kind: SuiteKind) -> Result<ObjectRef> {
        let mut stmts = suite.stmts.as_slice();
        let Some(first) = stmts.first() else {
            return Err(Diagnostic::unsupported("no runnable code found"));
        };

        if let ast::StmtKind::DocString(doc) = &first.kind {
            if kind == SuiteKind::Module {
                let node = self
                    .graph_mut()
                    .add(ir::NodeKind::String(doc.clone()), first.span)?;
                self.bind_scope("__doc__", Object::expr(node));
            }
            // function doc strings are captured at definition time
            stmts = &stmts[1..];
        } else if kind == SuiteKind::Module {
            let node = self
                .graph_mut()
                .add(ir::NodeKind::String(String::new()), first.span)?;
            self.bind_scope("__doc__", Object::expr(node));
        }

        for stmt in stmts {
            match &stmt.kind {
                ast::StmtKind::Import(import) => self.eval_import(import, stmt.span)?,
                ast::StmtKind::ImportFrom(from) => self.eval_import_from(from, stmt.span)?,
                ast::StmtKind::Expr(expr) => {
                    self.eval_expr(expr, &OperatorContext::default())?;
                }
                ast::StmtKind::Assign(assign) => self.eval_assign(assign, stmt.span)?,
                ast::StmtKind::FunctionDef(def) => self.eval_function_def(def, stmt.span)?,
                ast::StmtKind::DocString(_) => {
                    return Err(Diagnostic::unsupported(
                        "doc strings are only allowed at the start of a module or function",
                    )
                    .with_span(Some(stmt.span)));
                }
                ast::StmtKind::Return(value) => {
                    if kind != SuiteKind::FunctionBody {
                        return Err(Diagnostic::unsupported("'return' outside function")
                            .with_span(Some(stmt.span)));
                    }
                    // the return value ends suite processing
                    return match value {
                        Some(expr) => self.eval_expr(expr, &OperatorContext::default()),
                        None => Ok(Object::none()),
                    };
                }
            }
        }
        Ok(Object::none())
    }

    fn eval_import(&mut self, import: &ast::Import, span: ast::Span) -> Result<()> {
        let Some(module) = self.module(&import.name) else {
            return Err(
                Diagnostic::import_error(format!("no module named '{}'", import.name))
                    .with_span(Some(span)),
            );
        };
        let bound = import.as_name.as_deref().unwrap_or(&import.name);
        log::debug!("importing '{}' as '{bound}'", import.name);
        self.bind_scope(bound, module);
        Ok(())
    }

    fn eval_import_from(&mut self, from: &ast::ImportFrom, span: ast::Span) -> Result<()> {
        if from.level != 0 {
            return Err(Diagnostic::unsupported(format!(
                "unexpected import level {}, only absolute imports are supported",
                from.level
            ))
            .with_span(Some(span)));
        }
        let Some(module) = self.module(&from.module) else {
            return Err(
                Diagnostic::import_error(format!("no module named '{}'", from.module))
                    .with_span(Some(span)),
            );
        };
        let Object::Module(module) = module.as_ref() else {
            return Err(Diagnostic::internal(format!(
                "module handler entry '{}' is not a module",
                from.module
            )));
        };

        for alias in &from.names {
            let Some(attr) = module.get_attribute(&alias.name) else {
                return Err(Diagnostic::import_error(format!(
                    "cannot import name '{}' from '{}'",
                    alias.name, from.module
                ))
                .with_span(Some(span)));
            };
            self.bind_scope(alias.bound_name(), attr);
        }
        Ok(())
    }

    fn eval_assign(&mut self, assign: &ast::Assign, span: ast::Span) -> Result<()> {
        let [target] = assign.targets.as_slice() else {
            return Err(
                Diagnostic::unsupported("only single target assignment is supported")
                    .with_span(Some(span)),
            );
        };

        match &target.kind {
            // df['foo'] = <expr> rewrites to a map expression
            ast::ExprKind::Subscript { value, .. } => {
                self.eval_subscript_assign(target, value, &assign.value)
            }
            ast::ExprKind::Attribute { value, .. } => {
                self.eval_attribute_assign(target, value, &assign.value)
            }
            ast::ExprKind::Name(name) => {
                let object = self.eval_expr(&assign.value, &OperatorContext::default())?;
                self.bind_scope(name, object);
                Ok(())
            }
            _ => Err(
                Diagnostic::type_error("assignment target must be a name, subscript or attribute")
                    .with_span(Some(target.span)),
            ),
        }
    }

    // Assignment by subscript is more restrictive than assignment by
    // attribute: it is only valid for map expressions on dataframes.
    fn eval_subscript_assign(
        &mut self,
        target: &ast::Expr,
        lvalue: &ast::Expr,
        rhs: &ast::Expr,
    ) -> Result<()> {
        let target_obj = self.eval_expr(target, &OperatorContext::default())?;
        let table_obj = self.eval_expr(lvalue, &OperatorContext::default())?;

        let Object::Dataframe(df) = table_obj.as_ref() else {
            return Err(Diagnostic::type_error(format!(
                "cannot assign via subscript to a '{}'",
                table_obj.kind_name()
            ))
            .with_span(Some(target.span)));
        };
        let df = df.clone();
        self.eval_map_assign(lvalue, &df, &target_obj, rhs)
    }

    fn eval_attribute_assign(
        &mut self,
        target: &ast::Expr,
        lvalue: &ast::Expr,
        rhs: &ast::Expr,
    ) -> Result<()> {
        let target_obj = self.eval_expr(lvalue, &OperatorContext::default())?;

        // `df.foo = <expr>` is a map assignment, like the subscript form
        if let Object::Dataframe(df) = target_obj.as_ref() {
            let df = df.clone();
            let column_obj = self.eval_expr(target, &OperatorContext::default())?;
            return self.eval_map_assign(lvalue, &df, &column_obj, rhs);
        }

        let ast::ExprKind::Attribute { attr, .. } = &target.kind else {
            return Err(Diagnostic::internal("attribute assignment without attribute target"));
        };
        let value = self.eval_expr(rhs, &OperatorContext::default())?;
        target_obj.assign_attribute(attr, value, target.span)
    }

    /// The restricted map-assignment rewrite: `df['foo'] = 1 + 2` becomes
    /// a new dataframe over a Map that adds column `foo`, bound to the
    /// source variable name. The column reference evaluated for the
    /// target is deleted afterwards.
    fn eval_map_assign(
        &mut self,
        assign_target: &ast::Expr,
        df: &Dataframe,
        target_obj: &ObjectRef,
        rhs: &ast::Expr,
    ) -> Result<()> {
        let ast::ExprKind::Name(assign_name) = &assign_target.kind else {
            return Err(Diagnostic::type_error(
                "can only assign to a dataframe column when the dataframe is a plain name",
            )
            .with_span(Some(assign_target.span)));
        };

        let column_id = target_obj.ir_node().ok_or_else(|| {
            Diagnostic::type_error("assignment target must be a column reference")
                .with_span(Some(assign_target.span))
        })?;
        let Some(column) = self.graph().get(column_id).and_then(|n| n.kind.as_column()) else {
            return Err(
                Diagnostic::type_error("assignment target must be a column reference")
                    .with_span(Some(assign_target.span)),
            );
        };
        let column_name = column.name.clone();

        // only the source dataframe's columns may appear on the right
        let ctx = OperatorContext::new(
            vec![df.op()],
            ContextRole::Map,
            vec![assign_name.clone()],
        );
        let value_obj = self.eval_expr(rhs, &ctx)?;
        let value = self.expr_node_of(&value_obj, "the assignment value", rhs.span)?;

        log::debug!("map assignment of column '{column_name}' on '{assign_name}'");
        let rewritten = df.from_column_assignment(self.graph_mut(), &column_name, value, rhs.span)?;
        self.bind_scope(assign_name, Rc::new(Object::Dataframe(rewritten)));

        self.graph_mut().delete(column_id)?;
        Ok(())
    }
}
