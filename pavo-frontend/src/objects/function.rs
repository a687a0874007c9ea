use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use itertools::Itertools;
use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::introspect::VisSpec;
use crate::objects::{Object, ObjectRef};
use crate::semantic::{Evaluator, ScopeRef};
use crate::Result;

/// Host closure implementing a native function.
pub type NativeImpl = Rc<dyn Fn(&mut Evaluator, ast::Span, &ParsedArgs) -> Result<ObjectRef>>;

/// Positional and keyword arguments of one call site.
#[derive(Default)]
pub struct ArgMap {
    pub args: Vec<ObjectRef>,
    pub kwargs: Vec<(String, ObjectRef)>,
}

/// Arguments bound to parameter names, in declaration order. Produced by
/// [FuncObject::bind_args], which guarantees every declared parameter is
/// present.
#[derive(Debug)]
pub struct ParsedArgs {
    bound: IndexMap<String, ObjectRef>,
}

impl ParsedArgs {
    pub fn get(&self, name: &str) -> &ObjectRef {
        &self.bound[name]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectRef)> {
        self.bound.iter()
    }
}

/// Named callable. The body is either a host closure or a captured syntax
/// subtree plus its defining lexical scope.
#[derive(Clone)]
pub struct FuncObject {
    name: String,
    params: Vec<String>,
    /// Annotation objects per parameter, evaluated at definition time.
    annotations: IndexMap<String, ObjectRef>,
    /// Data types resolved from Type annotations, attached after
    /// decoration.
    arg_types: RefCell<IndexMap<String, ir::DataType>>,
    doc: RefCell<String>,
    vis_spec: RefCell<Option<VisSpec>>,
    body: FuncBody,
}

#[derive(Clone)]
pub enum FuncBody {
    Native(NativeImpl),
    User(UserFunc),
}

#[derive(Clone)]
pub struct UserFunc {
    pub suite: Rc<ast::Suite>,
    pub scope: ScopeRef,
}

impl FuncObject {
    pub fn native(name: impl Into<String>, params: &[&str], body: NativeImpl) -> FuncObject {
        FuncObject {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            annotations: IndexMap::new(),
            arg_types: RefCell::new(IndexMap::new()),
            doc: RefCell::new(String::new()),
            vis_spec: RefCell::new(None),
            body: FuncBody::Native(body),
        }
    }

    pub fn user(
        name: impl Into<String>,
        params: Vec<String>,
        annotations: IndexMap<String, ObjectRef>,
        suite: Rc<ast::Suite>,
        scope: ScopeRef,
    ) -> FuncObject {
        FuncObject {
            name: name.into(),
            params,
            annotations,
            arg_types: RefCell::new(IndexMap::new()),
            doc: RefCell::new(String::new()),
            vis_spec: RefCell::new(None),
            body: FuncBody::User(UserFunc { suite, scope }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn annotations(&self) -> &IndexMap<String, ObjectRef> {
        &self.annotations
    }

    pub fn body(&self) -> &FuncBody {
        &self.body
    }

    pub fn doc(&self) -> String {
        self.doc.borrow().clone()
    }

    pub fn set_doc(&self, doc: String) {
        *self.doc.borrow_mut() = doc;
    }

    pub fn vis_spec(&self) -> Option<VisSpec> {
        self.vis_spec.borrow().clone()
    }

    pub fn set_vis_spec(&self, spec: VisSpec) {
        *self.vis_spec.borrow_mut() = Some(spec);
    }

    /// Resolved data type of an annotated parameter.
    pub fn arg_type(&self, name: &str) -> Option<ir::DataType> {
        self.arg_types.borrow().get(name).copied()
    }

    /// Records the data type of every parameter whose annotation object is
    /// a Type. Runs after decoration, against the final callable.
    pub fn resolve_annotation_types(&self, annotations: &IndexMap<String, ObjectRef>) {
        let mut arg_types = self.arg_types.borrow_mut();
        for (name, annotation) in annotations {
            if let Object::Type(ty) = annotation.as_ref() {
                arg_types.insert(name.clone(), ty.data_type());
            }
        }
    }

    /// Binds call-site arguments to the declared parameters: positionals
    /// in declaration order, then keywords on top.
    pub fn bind_args(&self, args: ArgMap, span: ast::Span) -> Result<ParsedArgs> {
        if args.args.len() > self.params.len() {
            return Err(Diagnostic::type_error(format!(
                "{}() takes {} arguments but {} were given",
                self.name,
                self.params.len(),
                args.args.len()
            ))
            .with_span(Some(span)));
        }

        let mut bound: IndexMap<String, ObjectRef> = IndexMap::new();
        for (name, value) in self.params.iter().zip(args.args) {
            bound.insert(name.clone(), value);
        }
        for (name, value) in args.kwargs {
            if !self.params.contains(&name) {
                return Err(Diagnostic::type_error(format!(
                    "{}() got an unexpected keyword argument '{name}'",
                    self.name
                ))
                .with_span(Some(span)));
            }
            if bound.contains_key(&name) {
                return Err(Diagnostic::type_error(format!(
                    "{}() got multiple values for argument '{name}'",
                    self.name
                ))
                .with_span(Some(span)));
            }
            bound.insert(name, value);
        }

        let missing = self
            .params
            .iter()
            .filter(|p| !bound.contains_key(p.as_str()))
            .join(", ");
        if !missing.is_empty() {
            return Err(Diagnostic::type_error(format!(
                "{}() missing arguments: {missing}",
                self.name
            ))
            .with_span(Some(span)));
        }

        // declaration order
        let bound = self
            .params
            .iter()
            .map(|p| (p.clone(), bound.shift_remove(p).unwrap()))
            .collect();
        Ok(ParsedArgs { bound })
    }
}

impl fmt::Debug for FuncObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncObject")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn func(params: &[&str]) -> FuncObject {
        FuncObject::native("f", params, Rc::new(|_, _, _| Ok(Object::none())))
    }

    fn span() -> ast::Span {
        ast::Span::new(3, 1)
    }

    #[test]
    fn test_bind_positional_then_keyword() {
        let f = func(&["a", "b", "c"]);
        let args = ArgMap {
            args: vec![Object::none(), Object::none()],
            kwargs: vec![("c".to_string(), Object::none())],
        };
        let parsed = f.bind_args(args, span()).unwrap();
        let names: Vec<_> = parsed.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_bind_rejects_unknown_keyword() {
        let f = func(&["a"]);
        let args = ArgMap {
            args: vec![Object::none()],
            kwargs: vec![("z".to_string(), Object::none())],
        };
        let err = f.bind_args(args, span()).unwrap_err();
        assert!(err.message.contains("unexpected keyword argument 'z'"));
    }

    #[test]
    fn test_bind_rejects_duplicate_binding() {
        let f = func(&["a"]);
        let args = ArgMap {
            args: vec![Object::none()],
            kwargs: vec![("a".to_string(), Object::none())],
        };
        let err = f.bind_args(args, span()).unwrap_err();
        assert!(err.message.contains("multiple values for argument 'a'"));
    }

    #[test]
    fn test_bind_rejects_missing_and_extra() {
        let f = func(&["a", "b"]);

        let err = f.bind_args(ArgMap::default(), span()).unwrap_err();
        assert!(err.message.contains("missing arguments: a, b"));

        let args = ArgMap {
            args: vec![Object::none(), Object::none(), Object::none()],
            kwargs: vec![],
        };
        let err = f.bind_args(args, span()).unwrap_err();
        assert!(err.message.contains("takes 2 arguments but 3 were given"));
    }
}
