use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::objects::{FuncObject, ObjectRef};

pub type ScopeRef = Rc<RefCell<VarTable>>;

/// Lexically nested name table. Lookup walks parents; insertion writes
/// only to the current scope, shadowing any parent binding.
#[derive(Default)]
pub struct VarTable {
    parent: Option<ScopeRef>,
    names: IndexMap<String, ObjectRef>,
}

impl VarTable {
    pub fn create() -> ScopeRef {
        Rc::new(RefCell::new(VarTable::default()))
    }

    pub fn create_child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(VarTable {
            parent: Some(Rc::clone(parent)),
            names: IndexMap::new(),
        }))
    }

    /// Walks the scope chain.
    pub fn lookup(&self, name: &str) -> Option<ObjectRef> {
        if let Some(object) = self.names.get(name) {
            return Some(Rc::clone(object));
        }
        self.parent.as_ref().and_then(|p| p.borrow().lookup(name))
    }

    /// This scope only, parents not consulted.
    pub fn get_local(&self, name: &str) -> Option<ObjectRef> {
        self.names.get(name).cloned()
    }

    pub fn add(&mut self, name: impl Into<String>, value: ObjectRef) {
        self.names.insert(name.into(), value);
    }

    /// Visualization functions bound in this scope, in insertion order.
    pub fn vis_funcs(&self) -> Vec<(String, FuncObject)> {
        self.names
            .iter()
            .filter_map(|(name, object)| {
                let func = object.as_function()?;
                func.vis_spec()
                    .is_some()
                    .then(|| (name.clone(), func.clone()))
            })
            .collect()
    }
}

impl fmt::Debug for VarTable {
    // parents are elided: a scope can reach itself through a module object
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarTable")
            .field("names", &self.names.keys().collect::<Vec<_>>())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use crate::objects::Object;

    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let root = VarTable::create();
        root.borrow_mut().add("x", Object::none());

        let child = VarTable::create_child(&root);
        assert!(child.borrow().lookup("x").is_some());
        assert!(child.borrow().get_local("x").is_none());
    }

    #[test]
    fn test_child_binding_shadows_without_mutating_parent() {
        let root = VarTable::create();
        let one = Object::expr(pavo_ir::NodeId(1));
        root.borrow_mut().add("x", one);

        let child = VarTable::create_child(&root);
        child.borrow_mut().add("x", Object::none());

        assert!(child.borrow().lookup("x").unwrap().is_none());
        assert!(root.borrow().lookup("x").unwrap().is_expr());
    }
}
