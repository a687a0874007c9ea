use pavo_ir as ir;

/// Ambient state threaded by value through every evaluation entry point.
/// Governs which dataframes may be referenced as column sources at the
/// current syntactic position.
#[derive(Debug, Clone, Default)]
pub struct OperatorContext {
    pub parent_ops: Vec<ir::NodeId>,
    pub role: ContextRole,
    pub referenceable_dataframes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextRole {
    #[default]
    None,
    /// Right-hand side of a map assignment.
    Map,
}

impl OperatorContext {
    pub fn new(
        parent_ops: Vec<ir::NodeId>,
        role: ContextRole,
        referenceable_dataframes: Vec<String>,
    ) -> OperatorContext {
        OperatorContext {
            parent_ops,
            role,
            referenceable_dataframes,
        }
    }

    /// Same context with `name` added to the referenceable set.
    pub fn with_referenceable(&self, name: &str) -> OperatorContext {
        let mut ctx = self.clone();
        ctx.referenceable_dataframes.push(name.to_string());
        ctx
    }
}
