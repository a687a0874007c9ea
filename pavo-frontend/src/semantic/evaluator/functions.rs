use std::rc::Rc;

use indexmap::IndexMap;
use pavo_ast as ast;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::objects::{ArgMap, FuncBody, FuncObject, Object, ObjectRef};
use crate::semantic::{OperatorContext, VarTable};
use crate::Result;

use super::stmt::SuiteKind;

impl super::Evaluator<'_> {
    /// Invokes a callable with bound arguments. Native bodies receive the
    /// parsed arguments directly; user bodies run in a fresh child of
    /// their defining scope, after annotation checks.
    pub(crate) fn call_function(
        &mut self,
        func: &FuncObject,
        args: ArgMap,
        span: ast::Span,
    ) -> Result<ObjectRef> {
        log::debug!("calling '{}'", func.name());
        let parsed = func.bind_args(args, span)?;

        match func.body() {
            FuncBody::Native(native) => {
                let native = native.clone();
                native.as_ref()(self, span, &parsed)
            }
            FuncBody::User(user) => {
                for (name, value) in parsed.iter() {
                    if let Some(annotation) = func.annotations().get(name) {
                        self.check_annotation(value, annotation, span)?;
                    }
                }

                let scope = VarTable::create_child(&user.scope);
                {
                    let mut scope = scope.borrow_mut();
                    for (name, value) in parsed.iter() {
                        scope.add(name.clone(), value.clone());
                    }
                }
                let suite = user.suite.clone();
                let mut frame = self.child(scope);
                frame.eval_suite(&suite, SuiteKind::FunctionBody)
            }
        }
    }

    /// The callable behind an object: the object itself when it is a
    /// function, otherwise its `__call__` attribute.
    pub(crate) fn callable_of(&mut self, object: &ObjectRef, span: ast::Span) -> Result<FuncObject> {
        if let Object::Function(func) = object.as_ref() {
            return Ok(func.clone());
        }
        if object.has_attribute("__call__") {
            let attr = object.get_attribute(self.graph_mut(), "__call__", span)?;
            if let Object::Function(func) = attr.as_ref() {
                return Ok(func.clone());
            }
        }
        Err(
            Diagnostic::type_error(format!("'{}' object is not callable", object.kind_name()))
                .with_span(Some(span)),
        )
    }

    /// Checks one argument against its annotation object before a user
    /// body executes. Type annotations use the node-matches predicate;
    /// any other annotation requires the same object kind.
    fn check_annotation(
        &self,
        arg: &ObjectRef,
        annotation: &ObjectRef,
        span: ast::Span,
    ) -> Result<()> {
        if let Object::Type(ty) = annotation.as_ref() {
            let node = arg.ir_node().ok_or_else(|| {
                Diagnostic::type_error(format!(
                    "expected '{}', received a {}",
                    ty.type_name(),
                    arg.kind_name()
                ))
                .with_span(Some(span))
            })?;
            return ty
                .node_matches(self.graph(), node)
                .with_span_fallback(Some(span));
        }
        if annotation.kind_name() != arg.kind_name() {
            return Err(Diagnostic::type_error(format!(
                "expected a {}, received a {}",
                annotation.kind_name(),
                arg.kind_name()
            ))
            .with_span(Some(span)));
        }
        Ok(())
    }

    /// Defines a function: parameters and annotations are taken eagerly,
    /// the body is captured by reference together with the defining
    /// scope, then decorators apply outer-to-inner.
    pub(crate) fn eval_function_def(
        &mut self,
        def: &ast::FunctionDef,
        span: ast::Span,
    ) -> Result<()> {
        if def.vararg.is_some() {
            return Err(Diagnostic::unsupported(
                "variable length args are not supported in function definitions",
            )
            .with_span(Some(span)));
        }
        if def.kwarg.is_some() {
            return Err(Diagnostic::unsupported(
                "variable length kwargs are not supported in function definitions",
            )
            .with_span(Some(span)));
        }

        let mut params = Vec::with_capacity(def.params.len());
        let mut annotations: IndexMap<String, ObjectRef> = IndexMap::new();
        for param in &def.params {
            if param.default.is_some() {
                return Err(Diagnostic::unsupported(
                    "default values are not supported in function definitions",
                )
                .with_span(Some(param.span)));
            }
            if let Some(annotation) = &param.annotation {
                let object = self.eval_expr(annotation, &OperatorContext::default())?;
                annotations.insert(param.name.clone(), object);
            }
            params.push(param.name.clone());
        }

        log::debug!("defining function '{}'", def.name);
        let suite = Rc::new(def.body.clone());
        let mut defined: ObjectRef = Rc::new(Object::Function(FuncObject::user(
            def.name.clone(),
            params,
            annotations.clone(),
            suite,
            self.scope().clone(),
        )));

        for decorator in &def.decorators {
            let decorator_obj = self.eval_expr(decorator, &OperatorContext::default())?;
            let decorator_fn = self.callable_of(&decorator_obj, decorator.span)?;
            let mut args = ArgMap::default();
            args.args.push(defined);
            let decorated = self.call_function(&decorator_fn, args, decorator.span)?;
            // the decoration result replaces the bound name and must be
            // callable itself
            let func = self.callable_of(&decorated, decorator.span)?;
            defined = Rc::new(Object::Function(func));
        }

        // doc string and annotation resolution attach to the final object
        let Object::Function(final_fn) = defined.as_ref() else {
            return Err(Diagnostic::internal("decoration produced a non-function"));
        };
        final_fn.set_doc(suite_doc_string(&def.body));
        final_fn.resolve_annotation_types(&annotations);

        self.bind_scope(&def.name, defined.clone());
        Ok(())
    }
}

/// Doc string at the head of a function body, or an empty string.
fn suite_doc_string(body: &ast::Suite) -> String {
    match body.stmts.first() {
        Some(ast::Stmt {
            kind: ast::StmtKind::DocString(doc),
            ..
        }) => doc.clone(),
        _ => String::new(),
    }
}
