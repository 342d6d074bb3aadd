use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::function::{Function, Relation};
use super::value::Value;

/// Logical and comparison operators, strongest binding first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Not,
    Equals,
    NotEquals,
    And,
    Or,
    Implication,
    Biconditional,
}

impl Operator {
    pub const fn precedence(self) -> u8 {
        match self {
            Operator::Not => 5,
            Operator::Equals | Operator::NotEquals => 4,
            Operator::And => 3,
            Operator::Or => 2,
            Operator::Implication => 1,
            Operator::Biconditional => 0,
        }
    }

    pub const fn is_unary(self) -> bool {
        matches!(self, Operator::Not)
    }

    /// AND, OR, implication and biconditional.
    pub const fn is_connective(self) -> bool {
        matches!(
            self,
            Operator::And
                | Operator::Or
                | Operator::Implication
                | Operator::Biconditional
        )
    }

    pub const fn is_comparison(self) -> bool {
        matches!(self, Operator::Equals | Operator::NotEquals)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operator::Not => "!",
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Implication => "=>",
            Operator::Biconditional => "<=>",
        };
        f.write_str(text)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Forall,
    Exists,
}

impl Quantifier {
    pub const fn dual(self) -> Self {
        match self {
            Quantifier::Forall => Quantifier::Exists,
            Quantifier::Exists => Quantifier::Forall,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Forall => f.write_str("FORALL"),
            Quantifier::Exists => f.write_str("EXISTS"),
        }
    }
}

/// A logical variable.
///
/// Identity is the pair `(id, system)`; the name is only kept for display
/// and for rebinding during standardization. System variables are the
/// ones created by standardization and print as `?id`.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub id: usize,
    pub system: bool,
    /// Bound by FORALL. Free variables and those bound by EXISTS are not.
    pub universal: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, id: usize) -> Self {
        Self {
            name: name.into(),
            id,
            system: false,
            universal: false,
        }
    }

    pub fn system(name: impl Into<String>, id: usize, universal: bool) -> Self {
        Self {
            name: name.into(),
            id,
            system: true,
            universal,
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.system == other.system
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.system.hash(state);
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.system {
            write!(f, "?{}", self.id)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A named constant with a typed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: Value,
}

impl Constant {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A quantifier together with the variables it binds.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantifierList {
    pub kind: Quantifier,
    pub variables: Vec<Variable>,
}

impl QuantifierList {
    pub fn new(kind: Quantifier, variables: Vec<Variable>) -> Self {
        Self { kind, variables }
    }
}

impl fmt::Display for QuantifierList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (index, variable) in self.variables.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", variable)?;
        }
        f.write_str(")")
    }
}

/// Function introduced by Skolemization to replace an existential variable.
///
/// Its arguments are the universal variables in scope where the
/// existential was eliminated. Two Skolem functions are the same symbol
/// when their ids match.
#[derive(Clone, Debug)]
pub struct SkolemFunction {
    pub id: usize,
    pub args: Vec<Variable>,
}

impl PartialEq for SkolemFunction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for SkolemFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}(", self.id)?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

/// Every token kind that can appear in an infix or postfix statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Variable(Variable),
    Constant(Constant),
    Function(Arc<Function>),
    Relation(Arc<Relation>),
    Operator(Operator),
    /// Bare quantifier as lexed, before its variable list is attached.
    Quantifier(Quantifier),
    QuantifierList(QuantifierList),
    SkolemFunction(SkolemFunction),
    LeftParen,
    RightParen,
    Comma,
    SuchThat,
}

impl Symbol {
    /// Variables, constants and Skolem functions.
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Symbol::Variable(_) | Symbol::Constant(_) | Symbol::SkolemFunction(_)
        )
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Symbol::Function(_) | Symbol::Relation(_))
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            Symbol::Operator(op) => Some(*op),
            _ => None,
        }
    }

    /// Declared arity of a function or relation.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Symbol::Function(function) => Some(function.arity()),
            Symbol::Relation(relation) => Some(relation.arity()),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Variable(variable) => write!(f, "{}", variable),
            Symbol::Constant(constant) => f.write_str(&constant.name),
            Symbol::Function(function) => f.write_str(function.name()),
            Symbol::Relation(relation) => f.write_str(relation.name()),
            Symbol::Operator(op) => write!(f, "{}", op),
            Symbol::Quantifier(kind) => write!(f, "{}", kind),
            Symbol::QuantifierList(list) => write!(f, "{}", list),
            Symbol::SkolemFunction(skolem) => write!(f, "{}", skolem),
            Symbol::LeftParen => f.write_str("("),
            Symbol::RightParen => f.write_str(")"),
            Symbol::Comma => f.write_str(","),
            Symbol::SuchThat => f.write_str(":"),
        }
    }
}

/// Render a postfix sequence with single spaces between tokens.
pub fn format_postfix(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(|symbol| symbol.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
