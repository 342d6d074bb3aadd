//! Inference engine: unification, binary resolution, factoring and the
//! saturating refutation search built on them.

mod factor;
mod prover;
mod resolution;
mod unify;

pub use factor::factor_clause;
pub use prover::{Limit, ProofResult, Resolver, ResolverConfig};
pub use resolution::{
    check_bindings, find_resolve_unification, hypothesis_variables, is_duplicate_clause,
    resolve, unify_restricted,
};
pub use unify::{unify, Substitution, UnificationError, Unifier};
