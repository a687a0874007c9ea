//! Semantic evaluator: walks syntax trees and produces objects and IR.

mod context;
mod evaluator;
mod scope;


pub use context::{ContextRole, OperatorContext};
pub use evaluator::Evaluator;
pub use scope::{ScopeRef, VarTable};

pub(crate) use evaluator::SuiteKind;
