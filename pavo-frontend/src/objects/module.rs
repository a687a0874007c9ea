use std::cell::RefCell;

use indexmap::IndexMap;

use crate::objects::ObjectRef;
use crate::semantic::ScopeRef;

/// Namespace object exposing attributes.
#[derive(Debug)]
pub enum ModuleObject {
    /// Prebuilt from native code.
    Native {
        name: String,
        attrs: RefCell<IndexMap<String, ObjectRef>>,
    },
    /// Produced by evaluating a user source text in a fresh child scope.
    User { name: String, scope: ScopeRef },
}

impl ModuleObject {
    pub fn native(name: impl Into<String>, attrs: IndexMap<String, ObjectRef>) -> ModuleObject {
        ModuleObject::Native {
            name: name.into(),
            attrs: RefCell::new(attrs),
        }
    }

    pub fn user(name: impl Into<String>, scope: ScopeRef) -> ModuleObject {
        ModuleObject::User {
            name: name.into(),
            scope,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ModuleObject::Native { name, .. } => name,
            ModuleObject::User { name, .. } => name,
        }
    }

    pub fn has_attribute(&self, attr: &str) -> bool {
        match self {
            ModuleObject::Native { attrs, .. } => attrs.borrow().contains_key(attr),
            // module attributes are local bindings only; enclosing scopes
            // do not leak through the module object
            ModuleObject::User { scope, .. } => scope.borrow().get_local(attr).is_some(),
        }
    }

    pub fn get_attribute(&self, attr: &str) -> Option<ObjectRef> {
        match self {
            ModuleObject::Native { attrs, .. } => attrs.borrow().get(attr).cloned(),
            ModuleObject::User { scope, .. } => scope.borrow().get_local(attr),
        }
    }

    pub fn assign_attribute(&self, attr: &str, value: ObjectRef) {
        match self {
            ModuleObject::Native { attrs, .. } => {
                attrs.borrow_mut().insert(attr.to_string(), value);
            }
            ModuleObject::User { scope, .. } => {
                scope.borrow_mut().add(attr, value);
            }
        }
    }
}

/// Registry of importable modules, initialized once per compile before
/// evaluation starts.
#[derive(Debug, Default)]
pub struct ModuleHandler {
    modules: IndexMap<String, ObjectRef>,
}

impl ModuleHandler {
    pub fn insert(&mut self, name: impl Into<String>, module: ObjectRef) {
        self.modules.insert(name.into(), module);
    }

    pub fn get(&self, name: &str) -> Option<&ObjectRef> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }
}
