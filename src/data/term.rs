use std::fmt;

use super::symbol::{Operator, SkolemFunction, Symbol, Variable};

/// Basic classification of terms.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TermKind {
    Variable,
    Skolem,
    Constant,
    /// Function, relation or equality applied to arguments.
    Complex,
}

/// A possibly negated symbol applied to argument terms.
///
/// Terms are what clauses are made of: a relation application is a
/// literal, a function application is an argument, and a bare variable or
/// constant can be either. Equality is stored with `==` as its symbol and
/// the two sides as arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    pub value: Symbol,
    pub negated: bool,
    pub args: Vec<Term>,
}

impl Term {
    pub fn leaf(value: Symbol) -> Self {
        Self {
            value,
            negated: false,
            args: Vec::new(),
        }
    }

    pub fn variable(variable: Variable) -> Self {
        Self::leaf(Symbol::Variable(variable))
    }

    /// A Skolem term carries its symbol's arguments as variable terms.
    pub fn skolem(skolem: SkolemFunction) -> Self {
        let args = skolem.args.iter().cloned().map(Term::variable).collect();
        Self {
            value: Symbol::SkolemFunction(skolem),
            negated: false,
            args,
        }
    }

    pub fn application(value: Symbol, args: Vec<Term>) -> Self {
        Self {
            value,
            negated: false,
            args,
        }
    }

    pub fn kind(&self) -> TermKind {
        match &self.value {
            Symbol::Variable(_) => TermKind::Variable,
            Symbol::SkolemFunction(_) => TermKind::Skolem,
            _ if self.args.is_empty() => TermKind::Constant,
            _ => TermKind::Complex,
        }
    }

    /// Variables and Skolem terms both stand for unknown individuals.
    pub fn is_variable_like(&self) -> bool {
        matches!(self.kind(), TermKind::Variable | TermKind::Skolem)
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.value {
            Symbol::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn negated_clone(&self) -> Self {
        let mut term = self.clone();
        term.negated = !term.negated;
        term
    }

    pub fn positive(&self) -> Self {
        let mut term = self.clone();
        term.negated = false;
        term
    }

    /// Equal apart from the top-level negation flag. Arguments must match
    /// exactly.
    pub fn eq_ignoring_negation(&self, other: &Term) -> bool {
        self.value == other.value && self.args == other.args
    }

    /// Whether `needle` is this term or occurs anywhere in its arguments.
    pub fn contains_term(&self, needle: &Term) -> bool {
        self == needle || self.args.iter().any(|arg| arg.contains_term(needle))
    }

    pub fn contains_term_ignoring_negation(&self, needle: &Term) -> bool {
        self.eq_ignoring_negation(needle)
            || self
                .args
                .iter()
                .any(|arg| arg.contains_term_ignoring_negation(needle))
    }

    /// Every variable occurring in the term, in first-occurrence order.
    pub fn variables(&self) -> Vec<Variable> {
        let mut found = Vec::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables(&self, found: &mut Vec<Variable>) {
        if let Symbol::Variable(variable) = &self.value {
            if !found.contains(variable) {
                found.push(variable.clone());
            }
        }
        for arg in &self.args {
            arg.collect_variables(found);
        }
    }

    fn write_args(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Symbol::Operator(Operator::Equals), [lhs, rhs]) =
            (&self.value, self.args.as_slice())
        {
            let op = if self.negated { "!=" } else { "==" };
            return write!(f, "{} {} {}", lhs, op, rhs);
        }
        if self.negated {
            f.write_str("!")?;
        }
        match &self.value {
            Symbol::SkolemFunction(skolem) => {
                write!(f, "${}", skolem.id)?;
                self.write_args(f)
            }
            value if self.args.is_empty() => write!(f, "{}", value),
            value => {
                write!(f, "{}", value)?;
                self.write_args(f)
            }
        }
    }
}
