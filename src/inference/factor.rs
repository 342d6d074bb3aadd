//! Factoring inference rule.
//!
//! Factoring simplifies clauses by merging unifiable terms of the same
//! polarity, keeping the first of each merged pair.
//!
//! Example:
//!   Input:  P(x) OR P($0()) OR Q(b)
//!   Output: P($0()) OR Q(b)    (by binding x to $0())

use std::collections::HashSet;

use log::trace;

use super::resolution::unify_restricted;
use crate::data::{Disjunction, Variable};
use crate::log::targets;

/// Merge same-polarity terms of `clause` until no pair unifies.
pub fn factor_clause(clause: &Disjunction, hypothesis: &HashSet<Variable>) -> Disjunction {
    let mut current = clause.clone();
    while let Some(next) = factor_once(&current, hypothesis) {
        trace!(target: targets::UNIFY, "factored [{}] to [{}]", current, next);
        current = next;
    }
    current
}

fn factor_once(clause: &Disjunction, hypothesis: &HashSet<Variable>) -> Option<Disjunction> {
    let terms = clause.terms();
    for i in 0..terms.len() {
        for j in (i + 1)..terms.len() {
            let (first, second) = (&terms[i], &terms[j]);
            if first.negated != second.negated {
                continue;
            }
            if let Ok(unifier) = unify_restricted(first, second, hypothesis) {
                return Some(unifier.apply_to_clause(&clause.without(j)));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::{Constant, Relation, SkolemFunction, Symbol, Term, Value};

    fn make_var(id: usize) -> Term {
        Term::variable(Variable::system("v", id, true))
    }

    fn make_const(name: &str) -> Term {
        Term::leaf(Symbol::Constant(Constant::new(name, Value::Text(name.into()))))
    }

    fn make_pred(name: &str, args: Vec<Term>) -> Term {
        let relation = Arc::new(Relation::opaque(name, args.len()));
        Term::application(Symbol::Relation(relation), args)
    }

    #[test]
    fn factor_simple() {
        // P(x) OR P(a) => P(a)
        let clause = Disjunction::from_terms(vec![
            make_pred("P", vec![make_var(0)]),
            make_pred("P", vec![make_const("a")]),
        ]);
        let factored = factor_clause(&clause, &HashSet::new());
        assert_eq!(factored, Disjunction::singleton(make_pred("P", vec![make_const("a")])));
    }

    #[test]
    fn factor_keeps_other_terms() {
        let skolem = Term::skolem(SkolemFunction { id: 0, args: Vec::new() });
        let clause = Disjunction::from_terms(vec![
            make_pred("P", vec![make_var(0)]),
            make_pred("P", vec![skolem.clone()]),
            make_pred("Q", vec![make_const("b")]),
        ]);
        let factored = factor_clause(&clause, &HashSet::new());
        assert_eq!(
            factored,
            Disjunction::from_terms(vec![
                make_pred("P", vec![skolem]),
                make_pred("Q", vec![make_const("b")]),
            ])
        );
    }

    #[test]
    fn factor_different_polarity() {
        let clause = Disjunction::from_terms(vec![
            make_pred("P", vec![make_var(0)]),
            make_pred("P", vec![make_const("a")]).negated_clone(),
        ]);
        assert_eq!(factor_clause(&clause, &HashSet::new()), clause);
    }

    #[test]
    fn factor_repeats_until_stable() {
        // P(x) OR P(y) OR P(a) collapses to P(a)
        let clause = Disjunction::from_terms(vec![
            make_pred("P", vec![make_var(0)]),
            make_pred("P", vec![make_var(1)]),
            make_pred("P", vec![make_const("a")]),
        ]);
        let factored = factor_clause(&clause, &HashSet::new());
        assert_eq!(factored.len(), 1);
        assert_eq!(factored, Disjunction::singleton(make_pred("P", vec![make_const("a")])));
    }

    #[test]
    fn factor_respects_hypothesis_variables() {
        let k = Variable::system("k", 9, false);
        let clause = Disjunction::from_terms(vec![
            make_pred("P", vec![Term::variable(k.clone())]),
            make_pred("P", vec![make_const("a")]),
        ]);
        let hypothesis: HashSet<Variable> = [k].into();
        assert_eq!(factor_clause(&clause, &hypothesis), clause);
    }
}
