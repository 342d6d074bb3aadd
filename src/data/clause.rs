use std::fmt;

use thiserror::Error;

use super::symbol::{Operator, Symbol};
use super::term::Term;

/// Errors raised while reading a CNF postfix sequence into clauses.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CnfError {
    #[error("`{0}` is missing an operand")]
    MissingOperand(String),

    #[error("expected a single term, found a disjunction of {0}")]
    NotSingleTerm(usize),

    #[error("`{0}` must be removed before clauses can be formed")]
    NotNormalized(String),

    #[error("unexpected `{0}` in CNF")]
    UnexpectedSymbol(String),
}

/// A clause: terms joined by OR.
///
/// Equality is set equality over the terms. Adding a term that is already
/// present has no effect.
#[derive(Clone, Debug, Default)]
pub struct Disjunction {
    terms: Vec<Term>,
}

impl Disjunction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(term: Term) -> Self {
        Self { terms: vec![term] }
    }

    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut disjunction = Self::new();
        for term in terms {
            disjunction.add(term);
        }
        disjunction
    }

    pub fn add(&mut self, term: Term) {
        if !self.terms.contains(&term) {
            self.terms.push(term);
        }
    }

    pub fn merge(&mut self, other: Disjunction) {
        for term in other.terms {
            self.add(term);
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// The empty clause is a contradiction.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.terms.contains(term)
    }

    /// Copy of the clause with the term at `index` removed.
    pub fn without(&self, index: usize) -> Disjunction {
        let terms = self
            .terms
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, term)| term.clone());
        Disjunction::from_terms(terms)
    }

    pub fn to_single_term(&self) -> Result<Term, CnfError> {
        match self.terms.as_slice() {
            [term] => Ok(term.clone()),
            terms => Err(CnfError::NotSingleTerm(terms.len())),
        }
    }
}

impl PartialEq for Disjunction {
    fn eq(&self, other: &Self) -> bool {
        self.terms.iter().all(|term| other.terms.contains(term))
            && other.terms.iter().all(|term| self.terms.contains(term))
    }
}

impl fmt::Display for Disjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("FALSE");
        }
        for (index, term) in self.terms.iter().enumerate() {
            if index > 0 {
                f.write_str(" OR ")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

/// A statement in conjunctive normal form: clauses joined by AND.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatementCnf {
    clauses: Vec<Disjunction>,
}

impl StatementCnf {
    pub fn new(clauses: Vec<Disjunction>) -> Self {
        Self { clauses }
    }

    /// Read a postfix sequence already in CNF.
    ///
    /// Every AND flushes the two disjunctions beneath it as finished
    /// clauses, or the only one if a single operand remains. Disjunctions
    /// still on the stack at the end become clauses too.
    pub fn from_postfix(postfix: &[Symbol]) -> Result<Self, CnfError> {
        let mut stack: Vec<Disjunction> = Vec::new();
        let mut clauses = Vec::new();

        for symbol in postfix {
            match symbol {
                Symbol::Variable(_) | Symbol::Constant(_) => {
                    stack.push(Disjunction::singleton(Term::leaf(symbol.clone())));
                }
                Symbol::SkolemFunction(skolem) => {
                    stack.push(Disjunction::singleton(Term::skolem(skolem.clone())));
                }
                Symbol::Function(_) | Symbol::Relation(_) => {
                    let arity = symbol.arity().unwrap_or(0);
                    let args = pop_terms(&mut stack, arity, symbol)?;
                    stack.push(Disjunction::singleton(Term::application(
                        symbol.clone(),
                        args,
                    )));
                }
                Symbol::Operator(Operator::Not) => {
                    let operand = stack
                        .pop()
                        .ok_or_else(|| CnfError::MissingOperand(symbol.to_string()))?;
                    let term = operand.to_single_term()?;
                    stack.push(Disjunction::singleton(term.negated_clone()));
                }
                Symbol::Operator(op @ (Operator::Equals | Operator::NotEquals)) => {
                    let args = pop_terms(&mut stack, 2, symbol)?;
                    let mut term =
                        Term::application(Symbol::Operator(Operator::Equals), args);
                    term.negated = *op == Operator::NotEquals;
                    stack.push(Disjunction::singleton(term));
                }
                Symbol::Operator(Operator::Or) => {
                    let right = stack.pop();
                    let left = stack.pop();
                    match (left, right) {
                        (Some(mut left), Some(right)) => {
                            left.merge(right);
                            stack.push(left);
                        }
                        _ => return Err(CnfError::MissingOperand(symbol.to_string())),
                    }
                }
                Symbol::Operator(Operator::And) => {
                    if stack.len() >= 2 {
                        let right = stack.pop();
                        let left = stack.pop();
                        clauses.extend(left);
                        clauses.extend(right);
                    } else if let Some(only) = stack.pop() {
                        clauses.push(only);
                    }
                }
                Symbol::Operator(_) | Symbol::Quantifier(_) | Symbol::QuantifierList(_) => {
                    return Err(CnfError::NotNormalized(symbol.to_string()));
                }
                Symbol::LeftParen | Symbol::RightParen | Symbol::Comma | Symbol::SuchThat => {
                    return Err(CnfError::UnexpectedSymbol(symbol.to_string()));
                }
            }
        }

        clauses.extend(stack);
        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[Disjunction] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Disjunction> {
        self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

fn pop_terms(
    stack: &mut Vec<Disjunction>,
    count: usize,
    owner: &Symbol,
) -> Result<Vec<Term>, CnfError> {
    if stack.len() < count {
        return Err(CnfError::MissingOperand(owner.to_string()));
    }
    stack
        .split_off(stack.len() - count)
        .iter()
        .map(Disjunction::to_single_term)
        .collect()
}

impl fmt::Display for StatementCnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.clauses.as_slice() {
            [] => f.write_str("TRUE"),
            [single] => write!(f, "{}", single),
            clauses => {
                for (index, clause) in clauses.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "({})", clause)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::function::Relation;
    use crate::data::symbol::{Constant, Variable};
    use crate::data::value::Value;

    fn constant(name: &str) -> Symbol {
        Symbol::Constant(Constant::new(name, Value::Text(name.into())))
    }

    fn relation(name: &str, arity: usize) -> Symbol {
        Symbol::Relation(Arc::new(Relation::opaque(name, arity)))
    }

    fn op(op: Operator) -> Symbol {
        Symbol::Operator(op)
    }

    fn atom(name: &str) -> Term {
        Term::leaf(constant(name))
    }

    #[test]
    fn disjunction_equality_is_set_equality() {
        let a = Disjunction::from_terms(vec![atom("a"), atom("b")]);
        let b = Disjunction::from_terms(vec![atom("b"), atom("a"), atom("a")]);
        assert_eq!(a, b);
        assert_eq!(b.len(), 2, "duplicates are dropped on insert");
        let c = Disjunction::from_terms(vec![atom("a"), atom("b").negated_clone()]);
        assert_ne!(a, c);
    }

    #[test]
    fn single_term_extraction() {
        assert_eq!(Disjunction::singleton(atom("a")).to_single_term(), Ok(atom("a")));
        let two = Disjunction::from_terms(vec![atom("a"), atom("b")]);
        assert_eq!(two.to_single_term(), Err(CnfError::NotSingleTerm(2)));
    }

    #[test]
    fn postfix_groups_into_clauses() {
        // a b OR c ! AND d AND
        let postfix = vec![
            constant("a"),
            constant("b"),
            op(Operator::Or),
            constant("c"),
            op(Operator::Not),
            op(Operator::And),
            constant("d"),
            op(Operator::And),
        ];
        let cnf = StatementCnf::from_postfix(&postfix).expect("valid CNF");
        assert_eq!(cnf.len(), 3);
        assert_eq!(
            cnf.clauses()[0],
            Disjunction::from_terms(vec![atom("a"), atom("b")])
        );
        assert_eq!(cnf.clauses()[1], Disjunction::singleton(atom("c").negated_clone()));
        assert_eq!(cnf.clauses()[2], Disjunction::singleton(atom("d")));
        assert_eq!(cnf.to_string(), "(a OR b) AND (!c) AND (d)");
    }

    #[test]
    fn applications_and_equality_become_terms() {
        let x = Symbol::Variable(Variable::system("x", 0, true));
        let postfix = vec![
            x.clone(),
            relation("P", 1),
            op(Operator::Not),
            x,
            constant("a"),
            op(Operator::NotEquals),
            op(Operator::Or),
        ];
        let cnf = StatementCnf::from_postfix(&postfix).expect("valid CNF");
        assert_eq!(cnf.len(), 1);
        assert_eq!(cnf.to_string(), "!P(?0) OR ?0 != a");
    }

    #[test]
    fn unnormalized_input_is_rejected() {
        let postfix = vec![constant("a"), constant("b"), op(Operator::Implication)];
        assert_eq!(
            StatementCnf::from_postfix(&postfix),
            Err(CnfError::NotNormalized("=>".into()))
        );
        assert_eq!(
            StatementCnf::from_postfix(&[op(Operator::Not)]),
            Err(CnfError::MissingOperand("!".into()))
        );
    }
}
