use crate::data::{Operator, Symbol};
use crate::parser::ExpressionNode;

/// Rewrite until only AND, OR, negated atoms and quantifiers remain.
///
/// * `A => B` becomes `!A OR B`
/// * `A <=> B` becomes `(!A OR B) AND (!B OR A)`
/// * `A != B` becomes `!(A == B)`
/// * negated AND/OR follow De Morgan
/// * a negated quantifier becomes its dual over a negated body
pub fn eliminate_connectives(node: ExpressionNode) -> ExpressionNode {
    let mut current = node;
    loop {
        let (next, changed) = rewrite(current);
        current = next;
        if !changed {
            return current;
        }
    }
}

fn rewrite(node: ExpressionNode) -> (ExpressionNode, bool) {
    let mut changed = false;
    let mut node = node;
    loop {
        match rewrite_root(node) {
            Ok(next) => {
                node = next;
                changed = true;
            }
            Err(unchanged) => {
                node = unchanged;
                break;
            }
        }
    }

    if node.is_connective() || node.quantifier().is_some() {
        let children = std::mem::take(&mut node.children);
        node.children = children
            .into_iter()
            .map(|child| {
                let (child, child_changed) = rewrite(child);
                changed |= child_changed;
                child
            })
            .collect();
    }
    (node, changed)
}

/// Apply one rule at the root, or hand the node back untouched.
fn rewrite_root(node: ExpressionNode) -> Result<ExpressionNode, ExpressionNode> {
    let ExpressionNode {
        value,
        children,
        negated,
    } = node;

    match value {
        Symbol::Operator(Operator::NotEquals) => Ok(ExpressionNode {
            value: Symbol::Operator(Operator::Equals),
            children,
            negated: !negated,
        }),
        Symbol::Operator(op @ (Operator::Implication | Operator::Biconditional)) => {
            let [a, b] = match <[ExpressionNode; 2]>::try_from(children) {
                Ok(pair) => pair,
                Err(children) => {
                    return Err(ExpressionNode {
                        value,
                        children,
                        negated,
                    })
                }
            };
            let mut rewritten = if op == Operator::Implication {
                ExpressionNode::binary(Operator::Or, a.negate(), b)
            } else {
                let forward =
                    ExpressionNode::binary(Operator::Or, a.clone().negate(), b.clone());
                let backward = ExpressionNode::binary(Operator::Or, b.negate(), a);
                ExpressionNode::binary(Operator::And, forward, backward)
            };
            rewritten.negated = negated;
            Ok(rewritten)
        }
        Symbol::Operator(op @ (Operator::And | Operator::Or)) if negated => {
            let dual = if op == Operator::And {
                Operator::Or
            } else {
                Operator::And
            };
            let children = children.into_iter().map(ExpressionNode::negate).collect();
            Ok(ExpressionNode::new(Symbol::Operator(dual), children))
        }
        Symbol::QuantifierList(mut list) if negated => {
            list.kind = list.kind.dual();
            let children = children.into_iter().map(ExpressionNode::negate).collect();
            Ok(ExpressionNode::new(Symbol::QuantifierList(list), children))
        }
        value => Err(ExpressionNode {
            value,
            children,
            negated,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SymbolTracker, Variable};

    fn var(name: &str, id: usize) -> ExpressionNode {
        ExpressionNode::leaf(Symbol::Variable(Variable::new(name, id)))
    }

    fn from_text(text: &str) -> ExpressionNode {
        let mut tracker = SymbolTracker::new();
        let tokens = crate::parser::tokenize(text, &mut tracker).expect("tokens");
        let postfix = crate::parser::infix_to_postfix(&tokens).expect("postfix");
        ExpressionNode::from_postfix(&postfix).expect("tree")
    }

    #[test]
    fn de_morgan() {
        // x y OR !
        let tree = ExpressionNode::binary(Operator::Or, var("x", 0), var("y", 1)).negate();
        assert_eq!(eliminate_connectives(tree).to_string(), "x ! y ! AND");
    }

    #[test]
    fn biconditional() {
        let tree = ExpressionNode::binary(Operator::Biconditional, var("x", 0), var("y", 1));
        assert_eq!(
            eliminate_connectives(tree).to_string(),
            "x ! y OR y ! x OR AND"
        );
    }

    #[test]
    fn negated_quantifier_flips() {
        let tree = from_text("!FORALL(x, y) x => y");
        assert_eq!(
            eliminate_connectives(tree).to_string(),
            "x y ! AND EXISTS(x,y)"
        );
    }

    #[test]
    fn not_equals_becomes_negated_equality() {
        let tree = from_text("!(a != b) || c != d");
        assert_eq!(eliminate_connectives(tree).to_string(), "a b == c d == ! OR");
    }

    #[test]
    fn nested_arrows() {
        let tree = from_text("!(a => (b <=> c))");
        assert_eq!(
            eliminate_connectives(tree).to_string(),
            "a b c ! AND c b ! AND OR AND"
        );
    }

    #[test]
    fn atoms_are_left_alone() {
        let tree = from_text("!a && b");
        assert_eq!(eliminate_connectives(tree.clone()), tree);
    }
}
