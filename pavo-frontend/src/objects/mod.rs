//! Script-visible values and their capability surface.

mod dataframe;
mod function;
mod module;
mod platform;
mod types;

use std::rc::Rc;

use enum_as_inner::EnumAsInner;
use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::Result;

pub use dataframe::Dataframe;
pub use function::{ArgMap, FuncBody, FuncObject, NativeImpl, ParsedArgs, UserFunc};
pub use module::{ModuleHandler, ModuleObject};
pub use platform::{platform_module, PLATFORM_MODULE_NAME};
pub use types::TypeObject;

pub type ObjectRef = Rc<Object>;

/// A script-visible value.
#[derive(Debug, EnumAsInner)]
pub enum Object {
    /// Wraps an IR expression node.
    Expr(ir::NodeId),
    Function(FuncObject),
    Type(TypeObject),
    Collection(Collection),
    Module(ModuleObject),
    Dataframe(Dataframe),
    None,
}

/// Ordered sequence of objects. List and tuple differ only by tag.
#[derive(Debug, Clone)]
pub struct Collection {
    pub kind: CollectionKind,
    pub items: Vec<ObjectRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Tuple,
}

impl CollectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::List => "list",
            CollectionKind::Tuple => "tuple",
        }
    }
}

impl Object {
    pub fn none() -> ObjectRef {
        Rc::new(Object::None)
    }

    pub fn expr(node: ir::NodeId) -> ObjectRef {
        Rc::new(Object::Expr(node))
    }

    /// Variant name for user-facing messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Expr(_) => "expression",
            Object::Function(_) => "function",
            Object::Type(_) => "type",
            Object::Collection(collection) => collection.kind.name(),
            Object::Module(_) => "module",
            Object::Dataframe(_) => "dataframe",
            Object::None => "none",
        }
    }

    /// Backing IR node, when the object has one. Dataframes answer with
    /// their operator node.
    pub fn ir_node(&self) -> Option<ir::NodeId> {
        match self {
            Object::Expr(node) => Some(*node),
            Object::Dataframe(df) => Some(df.op()),
            _ => None,
        }
    }

    pub fn has_ir_node(&self) -> bool {
        self.ir_node().is_some()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        match self {
            Object::Module(module) => module.has_attribute(name),
            // any name resolves to a column reference
            Object::Dataframe(_) => true,
            _ => false,
        }
    }

    pub fn get_attribute(
        &self,
        graph: &mut ir::Graph,
        name: &str,
        span: ast::Span,
    ) -> Result<ObjectRef> {
        match self {
            Object::Module(module) => module.get_attribute(name).ok_or_else(|| {
                Diagnostic::type_error(format!(
                    "module '{}' has no attribute '{name}'",
                    module.name()
                ))
                .with_span(Some(span))
            }),
            Object::Dataframe(df) => {
                let column = df.column(graph, name, span)?;
                Ok(Object::expr(column))
            }
            _ => Err(Diagnostic::type_error(format!(
                "'{}' object has no attribute '{name}'",
                self.kind_name()
            ))
            .with_span(Some(span))),
        }
    }

    pub fn assign_attribute(&self, name: &str, value: ObjectRef, span: ast::Span) -> Result<()> {
        match self {
            Object::Module(module) => {
                module.assign_attribute(name, value);
                Ok(())
            }
            Object::Dataframe(_) => Err(Diagnostic::type_error(format!(
                "cannot assign attribute '{name}' to a dataframe; assign a column instead"
            ))
            .with_span(Some(span))),
            _ => Err(Diagnostic::type_error(format!(
                "cannot assign attribute '{name}' to a '{}' object",
                self.kind_name()
            ))
            .with_span(Some(span))),
        }
    }

    pub fn has_subscript(&self) -> bool {
        matches!(self, Object::Dataframe(_))
    }

    /// Function performing the indexing when called with the key.
    pub fn subscript_func(&self) -> Option<FuncObject> {
        match self {
            Object::Dataframe(df) => Some(df.subscript_func()),
            _ => None,
        }
    }
}
