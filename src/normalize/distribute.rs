use crate::data::Operator;
use crate::parser::ExpressionNode;

/// Distribute OR over AND until no OR has an AND beneath it.
pub fn distribute(node: ExpressionNode) -> ExpressionNode {
    let mut current = distribute_once(node);
    while !is_cnf(&current) {
        let next = distribute_once(current.clone());
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Whether the tree is a conjunction of disjunctions of atoms.
pub fn is_cnf(node: &ExpressionNode) -> bool {
    match connective(node) {
        Some(Operator::And) => node.children.iter().all(is_cnf),
        Some(Operator::Or) => node.children.iter().all(is_clause),
        _ => true,
    }
}

fn is_clause(node: &ExpressionNode) -> bool {
    match connective(node) {
        Some(Operator::And) => false,
        Some(Operator::Or) => node.children.iter().all(is_clause),
        _ => true,
    }
}

/// AND or OR, for un-negated nodes only.
fn connective(node: &ExpressionNode) -> Option<Operator> {
    match node.operator() {
        Some(op @ (Operator::And | Operator::Or)) if !node.negated => Some(op),
        _ => None,
    }
}

/// The two operands of a binary `op` node, or the node back unchanged.
fn split(node: ExpressionNode, op: Operator) -> Result<[ExpressionNode; 2], ExpressionNode> {
    if connective(&node) != Some(op) || node.children.len() != 2 {
        return Err(node);
    }
    let ExpressionNode {
        value,
        children,
        negated,
    } = node;
    <[ExpressionNode; 2]>::try_from(children).map_err(|children| ExpressionNode {
        value,
        children,
        negated,
    })
}

fn distribute_once(node: ExpressionNode) -> ExpressionNode {
    match connective(&node) {
        Some(Operator::And) => {
            let mut node = node;
            let children = std::mem::take(&mut node.children);
            node.children = children.into_iter().map(distribute_once).collect();
            node
        }
        Some(Operator::Or) => {
            let [left, right] = match split(node, Operator::Or) {
                Ok(pair) => pair,
                Err(node) => return node,
            };
            let left = distribute_once(left);
            let right = distribute_once(right);

            // (A AND B) OR C  =>  (A OR C) AND (B OR C)
            let left = match split(left, Operator::And) {
                Ok([a, b]) => {
                    return ExpressionNode::binary(
                        Operator::And,
                        distribute_once(ExpressionNode::binary(Operator::Or, a, right.clone())),
                        distribute_once(ExpressionNode::binary(Operator::Or, b, right)),
                    )
                }
                Err(left) => left,
            };
            // A OR (B AND C)  =>  (A OR B) AND (A OR C)
            match split(right, Operator::And) {
                Ok([b, c]) => ExpressionNode::binary(
                    Operator::And,
                    distribute_once(ExpressionNode::binary(Operator::Or, left.clone(), b)),
                    distribute_once(ExpressionNode::binary(Operator::Or, left, c)),
                ),
                Err(right) => ExpressionNode::binary(Operator::Or, left, right),
            }
        }
        _ => node,
    }
}
