//! The prebuilt platform module: the ambient API of the query language.
//!
//! The full built-in surface lives outside the front-end; this module
//! carries the loading contract plus the core constructors the evaluator
//! is exercised with.

use std::rc::Rc;

use indexmap::IndexMap;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::introspect::VisSpec;
use crate::objects::{Dataframe, FuncObject, ModuleObject, Object, ObjectRef};
use crate::Result;

/// Name the platform module is importable under.
pub const PLATFORM_MODULE_NAME: &str = "pavo";

/// Builds the platform module. Registered with the module handler before
/// evaluation starts.
pub fn platform_module() -> ObjectRef {
    let mut attrs: IndexMap<String, ObjectRef> = IndexMap::new();

    attrs.insert(
        "DataFrame".to_string(),
        Rc::new(Object::Function(FuncObject::native(
            "DataFrame",
            &["table"],
            Rc::new(|ev, span, args| {
                let table = ev.str_literal_arg(args.get("table"), "table", span)?;
                let source = ev.graph_mut().add(
                    ir::NodeKind::MemorySource(ir::MemorySource {
                        table,
                        columns: Vec::new(),
                    }),
                    span,
                )?;
                Ok(Rc::new(Object::Dataframe(Dataframe::new(source))))
            }),
        ))),
    );

    attrs.insert(
        "display".to_string(),
        Rc::new(Object::Function(FuncObject::native(
            "display",
            &["out", "name"],
            Rc::new(|ev, span, args| {
                let Object::Dataframe(df) = args.get("out").as_ref() else {
                    return Err(Diagnostic::type_error(format!(
                        "display() expects a dataframe, received a '{}'",
                        args.get("out").kind_name()
                    ))
                    .with_span(Some(span)));
                };
                let parent = df.op();
                let name = ev.str_literal_arg(args.get("name"), "name", span)?;
                ev.graph_mut().add(
                    ir::NodeKind::MemorySink(ir::MemorySink {
                        parent,
                        name,
                        columns: Vec::new(),
                    }),
                    span,
                )?;
                Ok(Object::none())
            }),
        ))),
    );

    attrs.insert(
        "now".to_string(),
        Rc::new(Object::Function(FuncObject::native(
            "now",
            &[],
            Rc::new(|ev, span, _args| {
                let now = ev.time_now();
                let node = ev.graph_mut().add(ir::NodeKind::Time(now), span)?;
                Ok(Object::expr(node))
            }),
        ))),
    );

    attrs.insert(
        "vis".to_string(),
        Rc::new(Object::Function(FuncObject::native(
            "vis",
            &["spec"],
            Rc::new(|ev, span, args| {
                let spec = ev.str_literal_arg(args.get("spec"), "spec", span)?;
                Ok(Rc::new(Object::Function(vis_decorator(spec))))
            }),
        ))),
    );

    Rc::new(Object::Module(ModuleObject::native(
        PLATFORM_MODULE_NAME,
        attrs,
    )))
}

/// Decorator produced by `vis(spec)`: returns a copy of the decorated
/// function carrying the visualization spec.
fn vis_decorator(spec: String) -> FuncObject {
    FuncObject::native(
        "vis_decorator",
        &["fn"],
        Rc::new(move |_ev, span, args| -> Result<ObjectRef> {
            let Object::Function(func) = args.get("fn").as_ref() else {
                return Err(Diagnostic::type_error(
                    "the 'vis' decorator must be applied to a function",
                )
                .with_span(Some(span)));
            };
            let tagged = func.clone();
            tagged.set_vis_spec(VisSpec {
                vega_spec: spec.clone(),
            });
            Ok(Rc::new(Object::Function(tagged)))
        }),
    )
}
