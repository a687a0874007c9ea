//! Semantic front-end of the pavo query compiler.
//!
//! Ingests parsed syntax trees of the Python-syntax query language and
//! produces a typed IR graph of relational operators and scalar
//! expressions, ready for the downstream planner. The parser and the
//! planner are external collaborators.

mod compile;
mod error;
mod exec;
mod introspect;
mod objects;
mod parse;
mod semantic;

pub use compile::{compile, CompileParams, Compiler};
pub use error::{Diagnostic, DiagnosticCode, Error, Severity, WithErrorInfo};
pub use exec::{ArgSpec, ArgValue, FuncArgsSpec, FuncToExecute, MAIN_FUNC_NAME};
pub use introspect::{VisFuncsInfo, VisSpec};
pub use objects::{
    ArgMap, Collection, CollectionKind, Dataframe, FuncBody, FuncObject, ModuleObject, NativeImpl,
    Object, ObjectRef, ParsedArgs, TypeObject, UserFunc, PLATFORM_MODULE_NAME,
};
pub use parse::SourceParser;
pub use semantic::{ContextRole, Evaluator, OperatorContext, ScopeRef, VarTable};

type Result<T, E = error::Diagnostic> = core::result::Result<T, E>;
