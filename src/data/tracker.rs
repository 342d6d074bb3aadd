use std::collections::HashMap;
use std::sync::Arc;

use super::function::{Function, Relation};
use super::symbol::{Constant, SkolemFunction, Symbol, Variable};

/// Registry of named symbols and source of fresh identifiers.
///
/// One tracker is shared by every statement in a session so that variable,
/// system variable and Skolem ids never collide between statements. Names
/// bound by quantifiers are kept on per-name stacks: the innermost binding
/// shadows outer ones and is popped when its scope closes.
#[derive(Debug, Default)]
pub struct SymbolTracker {
    bindings: HashMap<String, Vec<Variable>>,
    functions: HashMap<String, Arc<Function>>,
    relations: HashMap<String, Arc<Relation>>,
    constants: HashMap<String, Constant>,
    next_variable: usize,
    next_system_variable: usize,
    next_skolem: usize,
}

impl SymbolTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a variable and make it the current binding of `name`.
    pub fn new_variable(&mut self, name: &str) -> Variable {
        let variable = self.fresh_variable(name);
        self.bindings
            .entry(name.to_string())
            .or_default()
            .push(variable.clone());
        variable
    }

    /// Create a variable without binding its name.
    pub fn fresh_variable(&mut self, name: &str) -> Variable {
        let variable = Variable::new(name, self.next_variable);
        self.next_variable += 1;
        variable
    }

    /// The innermost binding of `name`, if any.
    pub fn variable_by_name(&self, name: &str) -> Option<&Variable> {
        self.bindings.get(name).and_then(|stack| stack.last())
    }

    /// Drop the innermost binding of `name`, exposing the one beneath it.
    pub fn pop_binding(&mut self, name: &str) -> Option<Variable> {
        let stack = self.bindings.get_mut(name)?;
        let popped = stack.pop();
        if stack.is_empty() {
            self.bindings.remove(name);
        }
        popped
    }

    pub fn new_system_variable(&mut self, name: &str, universal: bool) -> Variable {
        let variable =
            Variable::system(name, self.next_system_variable, universal);
        self.next_system_variable += 1;
        variable
    }

    pub fn new_skolem(&mut self, args: Vec<Variable>) -> SkolemFunction {
        let skolem = SkolemFunction {
            id: self.next_skolem,
            args,
        };
        self.next_skolem += 1;
        skolem
    }

    /// Register a function, replacing any previous one with the same name.
    pub fn add_function(&mut self, function: Function) -> Arc<Function> {
        let function = Arc::new(function);
        self.functions
            .insert(function.name().to_string(), Arc::clone(&function));
        function
    }

    pub fn add_relation(&mut self, relation: Relation) -> Arc<Relation> {
        let relation = Arc::new(relation);
        self.relations
            .insert(relation.name().to_string(), Arc::clone(&relation));
        relation
    }

    pub fn add_constant(&mut self, constant: Constant) {
        self.constants.insert(constant.name.clone(), constant);
    }

    pub fn function(&self, name: &str) -> Option<Arc<Function>> {
        self.functions.get(name).cloned()
    }

    pub fn relation(&self, name: &str) -> Option<Arc<Relation>> {
        self.relations.get(name).cloned()
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.get(name)
    }

    /// Resolve a declared name: relations first, then functions, then
    /// constants.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        if let Some(relation) = self.relation(name) {
            return Some(Symbol::Relation(relation));
        }
        if let Some(function) = self.function(name) {
            return Some(Symbol::Function(function));
        }
        self.constant(name).cloned().map(Symbol::Constant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::value::Value;

    #[test]
    fn bindings_shadow_and_unshadow() {
        let mut tracker = SymbolTracker::new();
        let outer = tracker.new_variable("x");
        let inner = tracker.new_variable("x");
        assert_ne!(outer, inner);
        assert_eq!(tracker.variable_by_name("x"), Some(&inner));

        assert_eq!(tracker.pop_binding("x"), Some(inner));
        assert_eq!(tracker.variable_by_name("x"), Some(&outer));
        assert_eq!(tracker.pop_binding("x"), Some(outer));
        assert!(tracker.variable_by_name("x").is_none());
        assert!(tracker.pop_binding("x").is_none());
    }

    #[test]
    fn counters_are_independent_and_monotonic() {
        let mut tracker = SymbolTracker::new();
        let parsed = tracker.new_variable("x");
        let system_a = tracker.new_system_variable("x", true);
        let system_b = tracker.new_system_variable("y", false);
        assert_eq!(parsed.id, 0);
        assert_eq!(system_a.id, 0);
        assert_eq!(system_b.id, 1);
        assert!(system_a.universal && !system_b.universal);

        assert_eq!(tracker.new_skolem(Vec::new()).id, 0);
        assert_eq!(tracker.new_skolem(vec![system_a]).id, 1);
    }

    #[test]
    fn lookup_resolves_declared_names() {
        let mut tracker = SymbolTracker::new();
        tracker.add_relation(Relation::opaque("Human", 1));
        tracker.add_function(Function::opaque("father", 1));
        tracker.add_constant(Constant::new("Socrates", Value::Text("Socrates".into())));

        assert!(matches!(tracker.lookup("Human"), Some(Symbol::Relation(_))));
        assert!(matches!(tracker.lookup("father"), Some(Symbol::Function(_))));
        assert!(matches!(tracker.lookup("Socrates"), Some(Symbol::Constant(_))));
        assert!(tracker.lookup("Plato").is_none());
    }
}
