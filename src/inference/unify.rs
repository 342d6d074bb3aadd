//! Unification of clause terms.
//!
//! Implements Robinson unification with occurs check. Skolem terms are
//! treated like variables: they may be bound, and a binding may not
//! contain the term it replaces. A plain variable facing a Skolem term is
//! always the side that gets bound.

use std::fmt;

use thiserror::Error;

use crate::data::{Disjunction, Term};

/// One binding: every occurrence of `original` becomes `replacement`.
#[derive(Clone, Debug, PartialEq)]
pub struct Substitution {
    pub original: Term,
    pub replacement: Term,
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.original, self.replacement)
    }
}

/// Errors that can occur during unification.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum UnificationError {
    #[error("occurs check failed: {var} occurs in {term}")]
    OccursCheck { var: Term, term: Term },

    #[error("symbol clash: cannot unify {expected} with {found}")]
    SymbolClash { expected: Term, found: Term },

    #[error("arity mismatch: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("{0} may not be bound here")]
    Restricted(Substitution),

    #[error("{0} and {1} do not have complementary polarity")]
    Polarity(Term, Term),
}

/// Substitution built up by successive unifications.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Unifier {
    substitutions: Vec<Substitution>,
}

impl Unifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    /// Current binding of a variable-like term, ignoring negation.
    pub fn lookup(&self, term: &Term) -> Option<&Term> {
        self.substitutions
            .iter()
            .find(|substitution| substitution.original.eq_ignoring_negation(term))
            .map(|substitution| &substitution.replacement)
    }

    /// Apply every binding, recursively, keeping the negation flags of
    /// the term being rewritten.
    pub fn apply(&self, term: &Term) -> Term {
        if let Some(replacement) = self.lookup(term) {
            let mut result = self.apply(replacement);
            result.negated ^= term.negated;
            return result;
        }
        Term {
            value: term.value.clone(),
            negated: term.negated,
            args: term.args.iter().map(|arg| self.apply(arg)).collect(),
        }
    }

    pub fn apply_to_clause(&self, clause: &Disjunction) -> Disjunction {
        Disjunction::from_terms(clause.iter().map(|term| self.apply(term)))
    }

    /// Extend the substitution so that `a` and `b` become equal, ignoring
    /// their top-level negation. Arguments must agree in polarity.
    pub fn unify(&mut self, a: &Term, b: &Term) -> Result<(), UnificationError> {
        if a.eq_ignoring_negation(b) {
            return Ok(());
        }
        // A plain variable takes the Skolem term, never the reverse.
        if a.as_variable().is_none() && b.as_variable().is_some() {
            return self.unify_var(b, a);
        }
        if a.is_variable_like() {
            return self.unify_var(a, b);
        }
        if b.is_variable_like() {
            return self.unify_var(b, a);
        }
        if a.value != b.value {
            return Err(UnificationError::SymbolClash {
                expected: a.clone(),
                found: b.clone(),
            });
        }
        if a.args.len() != b.args.len() {
            return Err(UnificationError::ArityMismatch {
                expected: a.args.len(),
                found: b.args.len(),
            });
        }
        for (x, y) in a.args.iter().zip(&b.args) {
            if x.negated != y.negated {
                return Err(UnificationError::SymbolClash {
                    expected: x.clone(),
                    found: y.clone(),
                });
            }
            self.unify(x, y)?;
        }
        Ok(())
    }

    fn unify_var(&mut self, var: &Term, term: &Term) -> Result<(), UnificationError> {
        if let Some(bound) = self.lookup(var).cloned() {
            return self.unify(&bound, term);
        }
        if term.is_variable_like() {
            if let Some(bound) = self.lookup(term).cloned() {
                return self.unify(var, &bound);
            }
        }
        let resolved = self.apply(term);
        if resolved.contains_term_ignoring_negation(var) {
            return Err(UnificationError::OccursCheck {
                var: var.positive(),
                term: resolved,
            });
        }
        self.substitutions.push(Substitution {
            original: var.positive(),
            replacement: term.positive(),
        });
        Ok(())
    }
}

impl fmt::Display for Unifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, substitution) in self.substitutions.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", substitution)?;
        }
        f.write_str("}")
    }
}

/// Unify two terms with a fresh unifier.
pub fn unify(a: &Term, b: &Term) -> Result<Unifier, UnificationError> {
    let mut unifier = Unifier::new();
    unifier.unify(a, b)?;
    Ok(unifier)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::{Constant, Function, Relation, SkolemFunction, Symbol, Value, Variable};

    fn make_var(id: usize) -> Term {
        Term::variable(Variable::system("v", id, true))
    }

    fn make_const(name: &str) -> Term {
        Term::leaf(Symbol::Constant(Constant::new(name, Value::Text(name.into()))))
    }

    fn make_fn(name: &str, args: Vec<Term>) -> Term {
        let function = Arc::new(Function::opaque(name, args.len()));
        Term::application(Symbol::Function(function), args)
    }

    fn make_pred(name: &str, args: Vec<Term>) -> Term {
        let relation = Arc::new(Relation::opaque(name, args.len()));
        Term::application(Symbol::Relation(relation), args)
    }

    #[test]
    fn unify_identical_terms() {
        let a = make_const("a");
        let unifier = unify(&a, &a).expect("identical terms unify");
        assert!(unifier.is_empty());
    }

    #[test]
    fn unify_variable_with_constant() {
        let x = make_var(0);
        let a = make_const("a");
        let unifier = unify(&x, &a).expect("variable binds");
        assert_eq!(unifier.apply(&x), a);
        assert_eq!(unifier.to_string(), "{?0 -> a}");
    }

    #[test]
    fn unify_nested_applications() {
        // P(x, f(y)) with P(g(a), f(b))
        let x = make_var(0);
        let y = make_var(1);
        let left = make_pred("P", vec![x.clone(), make_fn("f", vec![y.clone()])]);
        let right = make_pred(
            "P",
            vec![make_fn("g", vec![make_const("a")]), make_fn("f", vec![make_const("b")])],
        );
        let unifier = unify(&left, &right).expect("unifiable");
        assert_eq!(unifier.apply(&left), right);
        assert_eq!(unifier.apply(&y), make_const("b"));
    }

    #[test]
    fn bindings_chain() {
        // P(x, y, x) with P(y, a, z): x -> y, y -> a, then x (= a) with z
        let (x, y, z) = (make_var(0), make_var(1), make_var(2));
        let left = make_pred("P", vec![x.clone(), y.clone(), x.clone()]);
        let right = make_pred("P", vec![y.clone(), make_const("a"), z.clone()]);
        let unifier = unify(&left, &right).expect("unifiable");
        assert_eq!(unifier.apply(&left), unifier.apply(&right));
        assert_eq!(unifier.apply(&z), make_const("a"));
    }

    #[test]
    fn occurs_check() {
        let x = make_var(0);
        let fx = make_fn("f", vec![x.clone()]);
        assert!(matches!(unify(&x, &fx), Err(UnificationError::OccursCheck { .. })));

        let skolem = Term::skolem(SkolemFunction {
            id: 0,
            args: vec![Variable::system("v", 0, true)],
        });
        assert!(matches!(
            unify(&skolem, &make_fn("f", vec![skolem.clone()])),
            Err(UnificationError::OccursCheck { .. })
        ));
    }

    #[test]
    fn variable_is_bound_to_skolem() {
        let skolem = Term::skolem(SkolemFunction { id: 0, args: Vec::new() });
        let x = make_var(0);
        for (left, right) in [(&skolem, &x), (&x, &skolem)] {
            let unifier = unify(left, right).expect("unifiable");
            assert_eq!(unifier.to_string(), "{?0 -> $0()}");
            assert_eq!(unifier.apply(&x), skolem);
        }
    }

    #[test]
    fn clashes() {
        let a = make_const("a");
        let b = make_const("b");
        assert!(matches!(unify(&a, &b), Err(UnificationError::SymbolClash { .. })));

        let pa = make_pred("P", vec![a.clone()]);
        let qa = make_pred("Q", vec![a.clone()]);
        assert!(matches!(unify(&pa, &qa), Err(UnificationError::SymbolClash { .. })));

        let p_not_a = make_pred("P", vec![a.negated_clone()]);
        assert!(matches!(unify(&pa, &p_not_a), Err(UnificationError::SymbolClash { .. })));
    }

    #[test]
    fn top_level_negation_is_ignored() {
        let x = make_var(0);
        let pos = make_pred("P", vec![x.clone()]);
        let neg = make_pred("P", vec![make_const("a")]).negated_clone();
        let unifier = unify(&pos, &neg).expect("unifiable");
        assert_eq!(unifier.apply(&pos.negated_clone()), neg);
    }

    #[test]
    fn apply_to_clause_dedupes() {
        let (x, y) = (make_var(0), make_var(1));
        let clause = Disjunction::from_terms(vec![
            make_pred("P", vec![x.clone()]),
            make_pred("P", vec![y.clone()]),
        ]);
        let unifier = unify(&x, &y).expect("unifiable");
        assert_eq!(unifier.apply_to_clause(&clause).len(), 1);
    }
}
