//! Conversion of expression trees to conjunctive normal form.
//!
//! The passes run in a fixed order, each expecting the output of the one
//! before:
//!
//! 1. [`eliminate_connectives`]: implications, biconditionals and `!=`
//!    are rewritten and negation is pushed down to atoms.
//! 2. [`standardize`]: every quantifier gets fresh system variables.
//! 3. [`skolemize`]: existential variables become Skolem functions.
//! 4. [`drop_universals`]: FORALL nodes are removed.
//! 5. [`distribute`]: OR is distributed over AND.

mod connectives;
mod distribute;
mod skolemize;
mod standardize;

use log::debug;

pub use connectives::eliminate_connectives;
pub use distribute::{distribute, is_cnf};
pub use skolemize::{drop_universals, skolemize};
pub use standardize::standardize;

use crate::data::SymbolTracker;
use crate::log::targets;
use crate::parser::ExpressionNode;

/// Run all five passes.
pub fn to_cnf(tree: ExpressionNode, tracker: &mut SymbolTracker) -> ExpressionNode {
    debug!(target: targets::NORMALIZE, "input: {}", tree);
    let tree = eliminate_connectives(tree);
    debug!(target: targets::NORMALIZE, "connectives eliminated: {}", tree);
    let tree = standardize(tree, tracker);
    debug!(target: targets::NORMALIZE, "standardized: {}", tree);
    let tree = skolemize(tree, tracker);
    debug!(target: targets::NORMALIZE, "skolemized: {}", tree);
    let tree = drop_universals(tree);
    let tree = distribute(tree);
    debug!(target: targets::NORMALIZE, "cnf: {}", tree);
    tree
}
