use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::object::Object;

#[derive(Debug, Default)]
pub struct Scope {
    store: HashMap<String, Rc<Object>>,
    outer: Option<Rc<RefCell<Scope>>>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            store: HashMap::new(),
            outer: None,
        }
    }

    /// A fresh global scope, ready to be shared between evaluations
    pub fn new_global() -> Rc<RefCell<Scope>> {
        Rc::new(RefCell::new(Scope::new()))
    }

    /// Create a new scope that is enclosed by a given outer scope
    pub fn new_enclosed(outer: Rc<RefCell<Scope>>) -> Self {
        Scope {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<Object>> {
        match self.store.get(name) {
            Some(obj) => Some(Rc::clone(obj)),
            // If not found in this scope, look for it in the outer scope
            None => match self.outer {
                Some(ref outer) => outer.borrow().get(name),
                None => None,
            },
        }
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: String, value: Rc<Object>) -> Rc<Object> {
        self.store.insert(name, Rc::clone(&value));
        value
    }

    /// Bind `name` in the outermost scope of the chain.
    pub fn set_global(&mut self, name: String, value: Rc<Object>) -> Rc<Object> {
        match self.outer {
            Some(ref outer) => outer.borrow_mut().set_global(name, value),
            None => self.set(name, value),
        }
    }

    pub fn depth(&self) -> usize {
        match &self.outer {
            // Recursively add the depth
            Some(parent) => 1 + parent.borrow().depth(),
            None => 1,
        }
    }
}
