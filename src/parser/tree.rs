use std::collections::HashMap;
use std::fmt;

use super::ParseError;
use crate::data::{
    format_postfix, EvalError, Operator, QuantifierList, Symbol, Value, ValueType,
    Variable,
};

/// Values for the variables of a ground evaluation.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    values: HashMap<Variable, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, variable: Variable, value: Value) -> &mut Self {
        self.values.insert(variable, value);
        self
    }

    pub fn get(&self, variable: &Variable) -> Option<&Value> {
        self.values.get(variable)
    }
}

/// Node of an expression tree.
///
/// Negation is not a node of its own: every node carries a flag, and each
/// `!` in the input toggles the flag of the node it applies to.
/// Quantifier nodes have a single child, the scope body.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionNode {
    pub value: Symbol,
    pub children: Vec<ExpressionNode>,
    pub negated: bool,
}

impl ExpressionNode {
    pub fn leaf(value: Symbol) -> Self {
        Self {
            value,
            children: Vec::new(),
            negated: false,
        }
    }

    pub fn new(value: Symbol, children: Vec<ExpressionNode>) -> Self {
        Self {
            value,
            children,
            negated: false,
        }
    }

    pub fn binary(op: Operator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::new(Symbol::Operator(op), vec![left, right])
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn operator(&self) -> Option<Operator> {
        self.value.operator()
    }

    pub fn quantifier(&self) -> Option<&QuantifierList> {
        match &self.value {
            Symbol::QuantifierList(list) => Some(list),
            _ => None,
        }
    }

    /// AND, OR, implication or biconditional.
    pub fn is_connective(&self) -> bool {
        self.operator().is_some_and(Operator::is_connective)
    }

    /// Neither a connective nor a quantifier.
    pub fn is_atomic(&self) -> bool {
        !self.is_connective() && self.quantifier().is_none()
    }

    /// Build a tree from a postfix sequence.
    pub fn from_postfix(postfix: &[Symbol]) -> Result<Self, ParseError> {
        let mut stack: Vec<ExpressionNode> = Vec::new();

        for symbol in postfix {
            match symbol {
                Symbol::Variable(_) | Symbol::Constant(_) | Symbol::SkolemFunction(_) => {
                    stack.push(Self::leaf(symbol.clone()));
                }
                Symbol::Operator(Operator::Not) => {
                    let operand = stack
                        .pop()
                        .ok_or_else(|| ParseError::MissingOperand(symbol.to_string()))?;
                    stack.push(operand.negate());
                }
                Symbol::Operator(op) => {
                    let children = pop_children(&mut stack, 2, symbol)?;
                    if op.is_comparison() {
                        reject_compound(&children, symbol)?;
                    }
                    stack.push(Self::new(symbol.clone(), children));
                }
                Symbol::Function(_) | Symbol::Relation(_) => {
                    let arity = symbol.arity().unwrap_or(0);
                    let children = pop_children(&mut stack, arity, symbol)?;
                    reject_compound(&children, symbol)?;
                    stack.push(Self::new(symbol.clone(), children));
                }
                Symbol::QuantifierList(_) => {
                    let children = pop_children(&mut stack, 1, symbol)?;
                    stack.push(Self::new(symbol.clone(), children));
                }
                Symbol::Quantifier(_)
                | Symbol::LeftParen
                | Symbol::RightParen
                | Symbol::Comma
                | Symbol::SuchThat => {
                    return Err(ParseError::UnexpectedToken(symbol.to_string()));
                }
            }
        }

        match stack.len() {
            0 => Err(ParseError::EmptyExpression),
            1 => stack.pop().ok_or(ParseError::EmptyExpression),
            n => Err(ParseError::DanglingOperands(n)),
        }
    }

    /// Flatten back to postfix: children, the node, then `!` if negated.
    pub fn to_postfix(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<Symbol>) {
        for child in &self.children {
            child.flatten_into(out);
        }
        out.push(self.value.clone());
        if self.negated {
            out.push(Symbol::Operator(Operator::Not));
        }
    }

    /// Evaluate a ground expression.
    pub fn evaluate(&self, env: &Environment) -> Result<Value, EvalError> {
        let value = match &self.value {
            Symbol::Variable(variable) => env
                .get(variable)
                .cloned()
                .ok_or_else(|| EvalError::Unbound(variable.to_string()))?,
            Symbol::Constant(constant) => constant.value.clone(),
            Symbol::Function(function) => function.evaluate(&self.evaluate_children(env)?)?,
            Symbol::Relation(relation) => {
                Value::Bool(relation.evaluate(&self.evaluate_children(env)?)?)
            }
            Symbol::Operator(op @ (Operator::Equals | Operator::NotEquals)) => {
                let args = self.evaluate_children(env)?;
                let equal = args.first() == args.get(1);
                Value::Bool(equal == (*op == Operator::Equals))
            }
            Symbol::Operator(op) if op.is_connective() => {
                let args = self.evaluate_children(env)?;
                let mut truth = Vec::with_capacity(args.len());
                for arg in &args {
                    truth.push(expect_bool(&op.to_string(), arg)?);
                }
                match (op, truth.as_slice()) {
                    (Operator::And, [a, b]) => Value::Bool(*a && *b),
                    (Operator::Or, [a, b]) => Value::Bool(*a || *b),
                    (Operator::Implication, [a, b]) => Value::Bool(!*a || *b),
                    (Operator::Biconditional, [a, b]) => Value::Bool(a == b),
                    _ => return Err(EvalError::NotEvaluable(self.value.to_string())),
                }
            }
            other => return Err(EvalError::NotEvaluable(other.to_string())),
        };

        if self.negated {
            Ok(Value::Bool(!expect_bool("!", &value)?))
        } else {
            Ok(value)
        }
    }

    fn evaluate_children(&self, env: &Environment) -> Result<Vec<Value>, EvalError> {
        self.children.iter().map(|child| child.evaluate(env)).collect()
    }
}

fn expect_bool(name: &str, value: &Value) -> Result<bool, EvalError> {
    value.as_bool().ok_or_else(|| EvalError::TypeMismatch {
        name: name.to_string(),
        expected: ValueType::Bool,
        found: value.value_type(),
    })
}

fn pop_children(
    stack: &mut Vec<ExpressionNode>,
    count: usize,
    owner: &Symbol,
) -> Result<Vec<ExpressionNode>, ParseError> {
    if stack.len() < count {
        return Err(ParseError::MissingOperand(owner.to_string()));
    }
    Ok(stack.split_off(stack.len() - count))
}

fn reject_compound(children: &[ExpressionNode], owner: &Symbol) -> Result<(), ParseError> {
    if children.iter().all(ExpressionNode::is_atomic) {
        Ok(())
    } else {
        Err(ParseError::CompoundArgument(owner.to_string()))
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_postfix(&self.to_postfix()))
    }
}
