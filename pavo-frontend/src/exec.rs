//! Execution entrypoints: coerce externally supplied arguments, invoke
//! the named functions and wire their dataframe results to sinks.

use pavo_ast as ast;
use pavo_ir as ir;

use crate::error::{Diagnostic, WithErrorInfo};
use crate::objects::{ArgMap, FuncObject, Object, ObjectRef};
use crate::semantic::{Evaluator, ScopeRef};
use crate::Result;

/// Request to execute one script function and sink its outputs. The wire
/// shape of the external caller, as plain data.
#[derive(Debug, Clone, Default)]
pub struct FuncToExecute {
    pub func_name: String,
    pub output_table_prefix: String,
    pub arg_values: Vec<ArgValue>,
}

#[derive(Debug, Clone)]
pub struct ArgValue {
    pub name: String,
    pub value: String,
}

/// Declared arguments of an entrypoint, for external tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncArgsSpec {
    pub args: Vec<ArgSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    pub name: String,
    pub data_type: Option<ir::DataType>,
}

/// Name of the well-known entrypoint function.
pub const MAIN_FUNC_NAME: &str = "main";

impl Evaluator<'_> {
    pub(crate) fn exec_funcs(&mut self, funcs: &[FuncToExecute]) -> Result<()> {
        // exec descriptors carry no source text; errors point at 0:0
        let span = ast::Span::default();

        for func in funcs {
            if func.func_name.is_empty() {
                return Err(Diagnostic::value_error(
                    "func_name must be specified for each function to execute",
                ));
            }
            if func.output_table_prefix.is_empty() {
                return Err(Diagnostic::value_error(format!(
                    "output_table_prefix must be specified for function '{}'",
                    func.func_name
                )));
            }

            let object = self.scope().borrow().lookup(&func.func_name);
            let Some(object) = object else {
                return Err(Diagnostic::name_error(format!(
                    "function to execute, '{}', not found",
                    func.func_name
                )));
            };
            let Object::Function(func_obj) = object.as_ref() else {
                return Err(Diagnostic::type_error(format!(
                    "'{}' is a '{}', not a function",
                    func.func_name,
                    object.kind_name()
                )));
            };
            let func_obj = func_obj.clone();

            let args = self.exec_func_args(&func_obj, &func.arg_values, span)?;
            let returned = self.call_function(&func_obj, args, span)?;
            self.sink_exec_result(&func.func_name, &func.output_table_prefix, returned, span)?;
        }
        Ok(())
    }

    /// Coerces each descriptor argument against the parameter's
    /// annotation. All arguments are passed as keywords.
    fn exec_func_args(
        &mut self,
        func: &FuncObject,
        values: &[ArgValue],
        span: ast::Span,
    ) -> Result<ArgMap> {
        let mut args = ArgMap::default();
        for arg in values {
            if !func.params().contains(&arg.name) {
                return Err(Diagnostic::type_error(format!(
                    "function '{}' does not have an argument called '{}'",
                    func.name(),
                    arg.name
                )));
            }
            let Some(data_type) = func.arg_type(&arg.name) else {
                return Err(Diagnostic::type_error(format!(
                    "arg type annotation required, function: '{}', arg: '{}'",
                    func.name(),
                    arg.name
                )));
            };
            let node = self.parse_string_as_type(&arg.name, &arg.value, data_type, span)?;
            args.kwargs.push((arg.name.clone(), node));
        }
        Ok(args)
    }

    /// Coerces an externally supplied string to a typed literal, using
    /// permissive parsers.
    fn parse_string_as_type(
        &mut self,
        name: &str,
        value: &str,
        data_type: ir::DataType,
        span: ast::Span,
    ) -> Result<ObjectRef> {
        let parse_failure = |ty: &str| {
            Diagnostic::value_error(format!("failed to parse arg '{name}' as {ty}"))
                .push_hint(format!("the value was '{value}'"))
        };

        let kind = match data_type {
            ir::DataType::Bool => {
                let parsed = parse_bool_word(value).ok_or_else(|| parse_failure("bool"))?;
                ir::NodeKind::Bool(parsed)
            }
            ir::DataType::String => ir::NodeKind::String(value.to_string()),
            ir::DataType::Int => {
                let parsed = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| parse_failure("int"))?;
                ir::NodeKind::Int(parsed)
            }
            ir::DataType::Float => {
                let parsed = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| parse_failure("float"))?;
                ir::NodeKind::Float(parsed)
            }
            // time and duration arrive as integer nanoseconds
            ir::DataType::Time | ir::DataType::Duration => {
                let parsed = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| parse_failure("time"))?;
                ir::NodeKind::Time(parsed)
            }
            ir::DataType::UInt128 => {
                return Err(Diagnostic::value_error(format!(
                    "passing arg '{name}' of type uint128 is currently unsupported"
                )));
            }
        };
        let node = self.graph_mut().add(kind, span)?;
        Ok(Object::expr(node))
    }

    /// Wires the returned dataframe(s) to memory sinks under the output
    /// table prefix.
    fn sink_exec_result(
        &mut self,
        func_name: &str,
        prefix: &str,
        returned: ObjectRef,
        span: ast::Span,
    ) -> Result<()> {
        match returned.as_ref() {
            Object::Dataframe(df) => {
                self.graph_mut().add(
                    ir::NodeKind::MemorySink(ir::MemorySink {
                        parent: df.op(),
                        name: prefix.to_string(),
                        columns: Vec::new(),
                    }),
                    span,
                )?;
                Ok(())
            }
            Object::Collection(collection) => {
                for (i, item) in collection.items.iter().enumerate() {
                    let Object::Dataframe(df) = item.as_ref() else {
                        return Err(Diagnostic::type_error(format!(
                            "function '{func_name}' returns a '{}' at index {i}, all \
                             returned objects must be dataframes",
                            item.kind_name()
                        )));
                    };
                    self.graph_mut().add(
                        ir::NodeKind::MemorySink(ir::MemorySink {
                            parent: df.op(),
                            name: format!("{prefix}[{i}]"),
                            columns: Vec::new(),
                        }),
                        span,
                    )?;
                }
                Ok(())
            }
            _ => Err(Diagnostic::type_error(format!(
                "function '{func_name}' returns a '{}' but should return a dataframe",
                returned.kind_name()
            ))),
        }
    }
}

/// Parameters and annotations of the well-known `main` entrypoint, in
/// declaration order.
pub(crate) fn main_func_args_spec(scope: &ScopeRef) -> Result<FuncArgsSpec> {
    let Some(object) = scope.borrow().lookup(MAIN_FUNC_NAME) else {
        return Err(Diagnostic::name_error(format!(
            "could not find '{MAIN_FUNC_NAME}' function"
        )));
    };
    let Object::Function(func) = object.as_ref() else {
        return Err(Diagnostic::type_error(format!(
            "'{MAIN_FUNC_NAME}' is a '{}', not a function",
            object.kind_name()
        )));
    };
    Ok(func_args_spec(func))
}

pub(crate) fn func_args_spec(func: &FuncObject) -> FuncArgsSpec {
    FuncArgsSpec {
        args: func
            .params()
            .iter()
            .map(|name| ArgSpec {
                name: name.clone(),
                data_type: func.arg_type(name),
            })
            .collect(),
    }
}

fn parse_bool_word(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_bool_word() {
        assert_eq!(parse_bool_word("true"), Some(true));
        assert_eq!(parse_bool_word("Yes"), Some(true));
        assert_eq!(parse_bool_word(" 1 "), Some(true));
        assert_eq!(parse_bool_word("f"), Some(false));
        assert_eq!(parse_bool_word("NO"), Some(false));
        assert_eq!(parse_bool_word("maybe"), None);
    }
}
