use crate::data::{Quantifier, SkolemFunction, Symbol, SymbolTracker, Variable};
use crate::parser::ExpressionNode;

/// Replace every existential variable with a Skolem function of the
/// universal variables whose scope encloses it, and drop the EXISTS nodes.
///
/// Expects standardized input, where every bound variable is unique.
pub fn skolemize(node: ExpressionNode, tracker: &mut SymbolTracker) -> ExpressionNode {
    let mut skolemizer = Skolemizer {
        tracker,
        universals: Vec::new(),
        replacements: Vec::new(),
    };
    skolemizer.visit(node)
}

/// Drop FORALL nodes; the variables they bound stay universal.
pub fn drop_universals(node: ExpressionNode) -> ExpressionNode {
    let ExpressionNode {
        value,
        children,
        negated,
    } = node;
    let mut children: Vec<ExpressionNode> = children.into_iter().map(drop_universals).collect();

    let is_forall = matches!(&value, Symbol::QuantifierList(list) if list.kind == Quantifier::Forall);
    if is_forall && children.len() == 1 {
        if let Some(body) = children.pop() {
            return if negated { body.negate() } else { body };
        }
    }
    ExpressionNode {
        value,
        children,
        negated,
    }
}

struct Skolemizer<'t> {
    tracker: &'t mut SymbolTracker,
    universals: Vec<Variable>,
    replacements: Vec<(Variable, SkolemFunction)>,
}

impl Skolemizer<'_> {
    fn visit(&mut self, node: ExpressionNode) -> ExpressionNode {
        let ExpressionNode {
            value,
            children,
            negated,
        } = node;

        match value {
            Symbol::QuantifierList(list) if list.kind == Quantifier::Exists => {
                let mark = self.replacements.len();
                for variable in &list.variables {
                    let skolem = self.tracker.new_skolem(self.universals.clone());
                    self.replacements.push((variable.clone(), skolem));
                }
                let mut children = self.visit_children(children);
                self.replacements.truncate(mark);
                if children.len() == 1 {
                    if let Some(body) = children.pop() {
                        return if negated { body.negate() } else { body };
                    }
                }
                ExpressionNode {
                    value: Symbol::QuantifierList(list),
                    children,
                    negated,
                }
            }
            Symbol::QuantifierList(list) => {
                let mark = self.universals.len();
                if list.kind == Quantifier::Forall {
                    self.universals.extend(list.variables.iter().cloned());
                }
                let children = self.visit_children(children);
                self.universals.truncate(mark);
                ExpressionNode {
                    value: Symbol::QuantifierList(list),
                    children,
                    negated,
                }
            }
            Symbol::Variable(variable) => {
                let replacement = self
                    .replacements
                    .iter()
                    .rev()
                    .find(|(bound, _)| *bound == variable)
                    .map(|(_, skolem)| skolem.clone());
                let value = match replacement {
                    Some(skolem) => Symbol::SkolemFunction(skolem),
                    None => Symbol::Variable(variable),
                };
                ExpressionNode {
                    value,
                    children,
                    negated,
                }
            }
            value => ExpressionNode {
                value,
                children: self.visit_children(children),
                negated,
            },
        }
    }

    fn visit_children(&mut self, children: Vec<ExpressionNode>) -> Vec<ExpressionNode> {
        children.into_iter().map(|child| self.visit(child)).collect()
    }
}
