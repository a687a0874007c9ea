use std::rc::Rc;

use itertools::Itertools;
use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::objects::{ArgMap, Collection, CollectionKind, Object, ObjectRef};
use crate::semantic::{ContextRole, OperatorContext};
use crate::Result;

use super::ops;

impl super::Evaluator<'_> {
    /// Evaluates an expression node under the given operator context.
    pub(crate) fn eval_expr(
        &mut self,
        expr: &ast::Expr,
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        match &expr.kind {
            ast::ExprKind::Name(name) => self.lookup_name(name, expr.span),

            ast::ExprKind::Number(ast::Number::Int(value)) => {
                let node = self.graph_mut().add(ir::NodeKind::Int(*value), expr.span)?;
                Ok(Object::expr(node))
            }
            ast::ExprKind::Number(ast::Number::Float(value)) => {
                let node = self
                    .graph_mut()
                    .add(ir::NodeKind::Float(*value), expr.span)?;
                Ok(Object::expr(node))
            }
            ast::ExprKind::Str(value) => {
                let node = self
                    .graph_mut()
                    .add(ir::NodeKind::String(value.clone()), expr.span)?;
                Ok(Object::expr(node))
            }

            ast::ExprKind::List(items) => self.eval_collection(CollectionKind::List, items, ctx),
            ast::ExprKind::Tuple(items) => self.eval_collection(CollectionKind::Tuple, items, ctx),

            ast::ExprKind::Attribute { value, attr } => {
                let object = self.eval_expr(value, ctx)?;
                object.get_attribute(self.graph_mut(), attr, expr.span)
            }

            ast::ExprKind::Subscript { value, slice } => {
                self.eval_subscript(expr, value, slice, ctx)
            }

            ast::ExprKind::Call(call) => self.eval_call(expr, call, ctx),

            ast::ExprKind::Binary(binary) => self.eval_binary(binary, expr.span, ctx),
            ast::ExprKind::Bool(bool_expr) => self.eval_bool(bool_expr, expr.span, ctx),
            ast::ExprKind::Compare(compare) => self.eval_compare(compare, expr.span, ctx),
            ast::ExprKind::Unary(unary) => self.eval_unary(unary, expr.span, ctx),
        }
    }

    fn eval_collection(
        &mut self,
        kind: CollectionKind,
        items: &[ast::Expr],
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        let items: Vec<_> = items
            .iter()
            .map(|item| self.eval_expr(item, ctx))
            .try_collect()?;
        Ok(Rc::new(Object::Collection(Collection { kind, items })))
    }

    fn eval_subscript(
        &mut self,
        whole: &ast::Expr,
        value: &ast::Expr,
        slice: &ast::Slice,
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        self.validate_subscript_value(value, ctx)?;

        let object = self.eval_expr(value, ctx)?;
        let Some(func) = object.subscript_func() else {
            return Err(Diagnostic::type_error(format!(
                "'{}' object is not subscriptable",
                object.kind_name()
            ))
            .with_span(Some(whole.span)));
        };

        let ast::Slice::Index(index) = slice else {
            return Err(
                Diagnostic::unsupported("only index subscripts are supported, not ranges")
                    .with_span(Some(whole.span)),
            );
        };

        // the index may reference columns of the subscripted dataframe
        let index_ctx = match &value.kind {
            ast::ExprKind::Name(name) => ctx.with_referenceable(name),
            _ => ctx.clone(),
        };
        let key = self.eval_expr(index, &index_ctx)?;

        let mut args = ArgMap::default();
        args.args.push(key);
        self.call_function(&func, args, whole.span)
    }

    /// In map role, a subscripted name must be one of the reference-able
    /// dataframes.
    fn validate_subscript_value(&self, value: &ast::Expr, ctx: &OperatorContext) -> Result<()> {
        if ctx.role != ContextRole::Map {
            return Ok(());
        }
        match &value.kind {
            ast::ExprKind::Attribute { value, .. } => self.validate_subscript_value(value, ctx),
            ast::ExprKind::Name(name) => {
                if !ctx.referenceable_dataframes.iter().any(|df| df == name) {
                    return Err(Diagnostic::name_error(format!(
                        "name '{name}' is not available in this context"
                    ))
                    .with_span(Some(value.span)));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn eval_call(
        &mut self,
        whole: &ast::Expr,
        call: &ast::Call,
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        let callee = self.eval_expr(&call.func, ctx)?;

        if let Object::Expr(node) = callee.as_ref() {
            if let Some(column) = self.graph().get(*node).and_then(|n| n.kind.as_column()) {
                return Err(Diagnostic::type_error(format!(
                    "dataframe has no method '{}'",
                    column.name
                ))
                .with_span(Some(whole.span)));
            }
            return Err(Diagnostic::type_error("expression object is not callable")
                .with_span(Some(whole.span)));
        }

        let func = self.callable_of(&callee, whole.span)?;

        let mut args = ArgMap::default();
        for arg in &call.args {
            args.args.push(self.eval_expr(arg, ctx)?);
        }
        for keyword in &call.keywords {
            let value = self.eval_expr(&keyword.value, ctx)?;
            args.kwargs.push((keyword.name.clone(), value));
        }
        self.call_function(&func, args, whole.span)
    }

    fn eval_binary(
        &mut self,
        binary: &ast::BinaryExpr,
        span: ast::Span,
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        let left = self.eval_expr(&binary.left, ctx)?;
        let right = self.eval_expr(&binary.right, ctx)?;
        let left = self.expr_node_of(&left, "the left side of the operation", span)?;
        let right = self.expr_node_of(&right, "the right side of the operation", span)?;

        let op = ops::binary_opcode(binary.op);
        let node = self.graph_mut().add(
            ir::NodeKind::Func(ir::Func {
                op,
                args: vec![left, right],
            }),
            span,
        )?;
        Ok(Object::expr(node))
    }

    fn eval_bool(
        &mut self,
        bool_expr: &ast::BoolExpr,
        span: ast::Span,
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        let [left, right] = bool_expr.values.as_slice() else {
            return Err(Diagnostic::type_error(format!(
                "expected two arguments to '{}'",
                bool_expr.op.as_str()
            ))
            .with_span(Some(span)));
        };
        let left = self.eval_expr(left, ctx)?;
        let right = self.eval_expr(right, ctx)?;
        let left = self.expr_node_of(&left, "the left side of the operation", span)?;
        let right = self.expr_node_of(&right, "the right side of the operation", span)?;

        let op = ops::bool_opcode(bool_expr.op);
        let node = self.graph_mut().add(
            ir::NodeKind::Func(ir::Func {
                op,
                args: vec![left, right],
            }),
            span,
        )?;
        Ok(Object::expr(node))
    }

    fn eval_compare(
        &mut self,
        compare: &ast::CompareExpr,
        span: ast::Span,
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        let (&[op], [comparator]) = (compare.ops.as_slice(), compare.comparators.as_slice())
        else {
            return Err(
                Diagnostic::unsupported("chained comparisons are not supported")
                    .with_span(Some(span)),
            );
        };

        let left = self.eval_expr(&compare.left, ctx)?;
        let left = self.expr_node_of(&left, "the left side of the operation", span)?;
        let right = self.eval_expr(comparator, ctx)?;
        let right = self.expr_node_of(&right, "an argument to the operation", span)?;

        let node = self.graph_mut().add(
            ir::NodeKind::Func(ir::Func {
                op: ops::compare_opcode(op),
                args: vec![left, right],
            }),
            span,
        )?;
        Ok(Object::expr(node))
    }

    fn eval_unary(
        &mut self,
        unary: &ast::UnaryExpr,
        span: ast::Span,
        ctx: &OperatorContext,
    ) -> Result<ObjectRef> {
        let operand_obj = self.eval_expr(&unary.operand, ctx)?;
        let operand = self.expr_node_of(&operand_obj, "the operand of the unary operation", span)?;

        let Some(op) = ops::unary_opcode(unary.op) else {
            // unary plus is the identity
            return Ok(operand_obj);
        };
        let node = self.graph_mut().add(
            ir::NodeKind::Func(ir::Func {
                op,
                args: vec![operand],
            }),
            span,
        )?;
        Ok(Object::expr(node))
    }
}
