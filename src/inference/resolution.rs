//! Binary resolution between clauses.
//!
//! Unifiers used here are restricted beyond plain unification:
//! variables free in the hypothesis stand for one fixed but unknown
//! individual and may not be bound, Skolem terms may only be bound to
//! other variables or Skolem terms, and two bare variable literals only
//! resolve when one of them is universal (or they are the same variable).

use std::collections::HashSet;

use log::trace;

use super::unify::{UnificationError, Unifier};
use crate::data::{Disjunction, Symbol, Term, Variable};
use crate::log::targets;

/// Check the bindings of `unifier` against the restrictions.
pub fn check_bindings(
    unifier: &Unifier,
    hypothesis: &HashSet<Variable>,
) -> Result<(), UnificationError> {
    for substitution in unifier.substitutions() {
        let restricted = match &substitution.original.value {
            Symbol::Variable(variable) => hypothesis.contains(variable),
            Symbol::SkolemFunction(_) => !substitution.replacement.is_variable_like(),
            _ => false,
        };
        if restricted {
            return Err(UnificationError::Restricted(substitution.clone()));
        }
    }
    Ok(())
}

/// Unify `a` with `b` under the restrictions, ignoring polarity. Both
/// binding directions are tried, since the first may bind a restricted
/// variable where the second does not.
pub fn unify_restricted(
    a: &Term,
    b: &Term,
    hypothesis: &HashSet<Variable>,
) -> Result<Unifier, UnificationError> {
    if let (Some(x), Some(y)) = (a.as_variable(), b.as_variable()) {
        if x != y && !x.universal && !y.universal {
            return Err(UnificationError::SymbolClash {
                expected: a.clone(),
                found: b.clone(),
            });
        }
    }

    let attempt = |first: &Term, second: &Term| -> Result<Unifier, UnificationError> {
        let mut unifier = Unifier::new();
        unifier.unify(first, second)?;
        check_bindings(&unifier, hypothesis)?;
        Ok(unifier)
    };
    attempt(a, b).or_else(|_| attempt(b, a))
}

/// Unifier that lets `t1` resolve against the term whose negated clone
/// is `negated_t2`.
pub fn find_resolve_unification(
    t1: &Term,
    negated_t2: &Term,
    hypothesis: &HashSet<Variable>,
) -> Result<Unifier, UnificationError> {
    if t1.negated != negated_t2.negated {
        return Err(UnificationError::Polarity(t1.clone(), negated_t2.negated_clone()));
    }
    unify_restricted(t1, negated_t2, hypothesis)
}

/// Every binary resolvent of two clauses.
pub fn resolve(
    c1: &Disjunction,
    c2: &Disjunction,
    hypothesis: &HashSet<Variable>,
) -> Vec<Disjunction> {
    let mut resolvents = Vec::new();
    for (i, t1) in c1.iter().enumerate() {
        for (j, t2) in c2.iter().enumerate() {
            let negated = t2.negated_clone();
            let Ok(unifier) = find_resolve_unification(t1, &negated, hypothesis) else {
                continue;
            };
            let mut resolvent = unifier.apply_to_clause(&c1.without(i));
            resolvent.merge(unifier.apply_to_clause(&c2.without(j)));
            trace!(
                target: targets::RESOLUTION,
                "[{}] x [{}] on {} with {} gives [{}]",
                c1, c2, t1, unifier, resolvent
            );
            resolvents.push(resolvent);
        }
    }
    resolvents
}

/// Whether `candidate` adds nothing over `existing`: the clauses are equal,
/// or unify position by position under one shared unifier.
pub fn is_duplicate_clause(
    candidate: &Disjunction,
    existing: &Disjunction,
    hypothesis: &HashSet<Variable>,
) -> bool {
    if candidate == existing {
        return true;
    }
    if candidate.len() != existing.len() {
        return false;
    }
    let mut unifier = Unifier::new();
    let positional = candidate.iter().zip(existing.iter()).all(|(a, b)| {
        a.negated == b.negated && a.kind() == b.kind() && unifier.unify(a, b).is_ok()
    });
    positional && check_bindings(&unifier, hypothesis).is_ok()
}

/// Variables of the negated hypothesis that were not bound by FORALL.
pub fn hypothesis_variables<'a>(
    clauses: impl IntoIterator<Item = &'a Disjunction>,
) -> HashSet<Variable> {
    clauses
        .into_iter()
        .flat_map(|clause| clause.iter())
        .flat_map(Term::variables)
        .filter(|variable| !variable.universal)
        .collect()
}
