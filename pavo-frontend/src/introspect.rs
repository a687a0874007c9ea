//! Per-function metadata for external tooling: doc strings,
//! visualization specs and argument specs.

use indexmap::IndexMap;

use crate::exec::{func_args_spec, FuncArgsSpec};
use crate::semantic::ScopeRef;

/// Rendering spec carried by a function decorated with `vis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisSpec {
    pub vega_spec: String,
}

/// Aggregate of per-function tooling metadata, keyed by binding name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisFuncsInfo {
    pub doc_string_map: IndexMap<String, String>,
    pub vis_spec_map: IndexMap<String, VisSpec>,
    pub fn_args_map: IndexMap<String, FuncArgsSpec>,
}

/// Collects metadata for every visualization function bound in the
/// scope.
pub(crate) fn vis_funcs_info(scope: &ScopeRef) -> VisFuncsInfo {
    let mut info = VisFuncsInfo::default();
    for (name, func) in scope.borrow().vis_funcs() {
        let Some(spec) = func.vis_spec() else {
            continue;
        };
        info.doc_string_map.insert(name.clone(), func.doc());
        info.vis_spec_map.insert(name.clone(), spec);
        info.fn_args_map.insert(name, func_args_spec(&func));
    }
    info
}
