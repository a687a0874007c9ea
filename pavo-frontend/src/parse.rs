use pavo_ast as ast;

use crate::error::Diagnostic;

/// Interface to the source-text parser.
///
/// Parsing is external to the front-end; module loading and
/// single-expression evaluation re-enter the parser through this trait.
pub trait SourceParser {
    /// Parses one source text into a module syntax tree.
    fn parse_module(&self, source: &str) -> Result<ast::Module, Diagnostic>;
}
