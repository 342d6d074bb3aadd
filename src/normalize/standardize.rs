use std::collections::HashMap;

use crate::data::{Quantifier, QuantifierList, Symbol, SymbolTracker, Variable};
use crate::parser::ExpressionNode;

/// Give every quantifier its own fresh system variables.
///
/// Bound occurrences are rewritten to the variable of the innermost
/// quantifier binding their name. A free variable gets one system
/// variable on first occurrence, in pre-order, left to right, and keeps
/// it for the rest of the statement. Free variables are not universal.
pub fn standardize(node: ExpressionNode, tracker: &mut SymbolTracker) -> ExpressionNode {
    let mut standardizer = Standardizer {
        tracker,
        scopes: Vec::new(),
        free: HashMap::new(),
    };
    standardizer.visit(node)
}

struct Standardizer<'t> {
    tracker: &'t mut SymbolTracker,
    scopes: Vec<HashMap<String, Variable>>,
    free: HashMap<String, Variable>,
}

impl Standardizer<'_> {
    fn visit(&mut self, mut node: ExpressionNode) -> ExpressionNode {
        match &node.value {
            Symbol::QuantifierList(list) => {
                let universal = list.kind == Quantifier::Forall;
                let mut frame = HashMap::new();
                let mut renamed = Vec::with_capacity(list.variables.len());
                for variable in &list.variables {
                    let fresh = self.tracker.new_system_variable(&variable.name, universal);
                    frame.insert(variable.name.clone(), fresh.clone());
                    renamed.push(fresh);
                }
                node.value = Symbol::QuantifierList(QuantifierList::new(list.kind, renamed));

                self.scopes.push(frame);
                node.children = self.visit_children(node.children);
                self.scopes.pop();
                node
            }
            Symbol::Variable(variable) => {
                let renamed = self.resolve(variable);
                node.value = Symbol::Variable(renamed);
                node
            }
            _ => {
                node.children = self.visit_children(node.children);
                node
            }
        }
    }

    fn visit_children(&mut self, children: Vec<ExpressionNode>) -> Vec<ExpressionNode> {
        children.into_iter().map(|child| self.visit(child)).collect()
    }

    fn resolve(&mut self, variable: &Variable) -> Variable {
        let bound = self
            .scopes
            .iter()
            .rev()
            .find_map(|frame| frame.get(&variable.name));
        if let Some(bound) = bound {
            return bound.clone();
        }
        if let Some(free) = self.free.get(&variable.name) {
            return free.clone();
        }
        let fresh = self.tracker.new_system_variable(&variable.name, false);
        self.free.insert(variable.name.clone(), fresh.clone());
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::eliminate_connectives;
    use crate::parser::{infix_to_postfix, tokenize};

    fn standardized(text: &str, tracker: &mut SymbolTracker) -> ExpressionNode {
        let tokens = tokenize(text, tracker).expect("tokens");
        let postfix = infix_to_postfix(&tokens).expect("postfix");
        let tree = ExpressionNode::from_postfix(&postfix).expect("tree");
        standardize(eliminate_connectives(tree), tracker)
    }

    #[test]
    fn free_variables_numbered_in_order() {
        let mut tracker = SymbolTracker::new();
        let tree = standardized("x AND y AND z", &mut tracker);
        assert_eq!(tree.to_string(), "?0 ?1 AND ?2 AND");
    }

    #[test]
    fn shadowed_names_get_separate_variables() {
        let mut tracker = SymbolTracker::new();
        let tree = standardized("EXISTS(x)(EXISTS(x) x) AND x", &mut tracker);
        assert_eq!(tree.to_string(), "?1 EXISTS(?1) ?0 AND EXISTS(?0)");
    }

    #[test]
    fn universality_follows_the_binder() {
        let mut tracker = SymbolTracker::new();
        let tree = standardized("FORALL x, EXISTS y, x == y || z", &mut tracker);
        let Some(forall) = tree.quantifier() else {
            panic!("expected a quantifier at the root");
        };
        assert!(forall.variables[0].universal);
        let exists = tree.children[0].quantifier().expect("nested quantifier");
        assert!(!exists.variables[0].universal);
        assert_eq!(tree.to_string(), "?0 ?1 == ?2 OR EXISTS(?1) FORALL(?0)");
    }

    #[test]
    fn ids_continue_across_statements() {
        let mut tracker = SymbolTracker::new();
        standardized("x", &mut tracker);
        let second = standardized("FORALL x, x", &mut tracker);
        assert_eq!(second.to_string(), "?1 FORALL(?1)");
    }
}
