//! Saturating resolution search.
//!
//! The knowledge base and the negated hypothesis are resolved round by
//! round: every kept clause against every clause added in the previous
//! round. Deriving the empty clause proves the hypothesis, a round that
//! adds nothing new saturates the search, and the configured budget turns
//! everything else into an unknown outcome.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace};

use super::factor::factor_clause;
use super::resolution::{hypothesis_variables, is_duplicate_clause, resolve};
use crate::config::{counters, ParameterError, ParameterSet, Statistics};
use crate::data::{
    ClauseArena, ClauseId, CnfError, Disjunction, Resolvent, StatementCnf, SymbolTracker, Variable,
};
use crate::log::targets;
use crate::statement::Statement;

/// Budget for one proof search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum number of resolution rounds.
    pub max_rounds: usize,
    /// Maximum number of clauses kept, input clauses included.
    pub max_clauses: usize,
    /// Wall clock limit in seconds (0 = unlimited).
    pub max_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_rounds: 1000,
            max_clauses: 10000,
            max_seconds: 0,
        }
    }
}

impl ResolverConfig {
    /// Override limits from `max_rounds`, `max_clauses` and `max_seconds`
    /// parameters. Any other name is an error.
    pub fn apply_parameters(&mut self, params: &ParameterSet) -> Result<(), ParameterError> {
        for (name, _) in params.iter() {
            if !matches!(name, "max_rounds" | "max_clauses" | "max_seconds") {
                return Err(ParameterError::Unknown(name.to_string()));
            }
            let Some(value) = params.get_count(name)? else {
                continue;
            };
            match name {
                "max_rounds" => self.max_rounds = value,
                "max_clauses" => self.max_clauses = value,
                _ => self.max_seconds = value as u64,
            }
        }
        Ok(())
    }
}

/// Which budget stopped the search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Limit {
    Rounds,
    Clauses,
    Time,
    Cancelled,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Limit::Rounds => "max_rounds",
            Limit::Clauses => "max_clauses",
            Limit::Time => "max_seconds",
            Limit::Cancelled => "cancelled",
        })
    }
}

/// Result of a proof search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofResult {
    /// The empty clause was derived.
    Proof {
        empty_clause_id: ClauseId,
        rounds: usize,
        clauses_generated: usize,
        clauses_kept: usize,
    },
    /// A round added nothing new; the hypothesis does not follow.
    Saturated {
        rounds: usize,
        clauses_generated: usize,
        clauses_kept: usize,
    },
    /// The budget ran out before either of the above.
    ResourceLimit {
        rounds: usize,
        clauses_generated: usize,
        clauses_kept: usize,
        limit: Limit,
    },
}

impl ProofResult {
    pub fn is_proof(&self) -> bool {
        matches!(self, ProofResult::Proof { .. })
    }

    /// `Some(true)` when proved, `Some(false)` when saturated, `None` when
    /// the answer is unknown.
    pub fn verdict(&self) -> Option<bool> {
        match self {
            ProofResult::Proof { .. } => Some(true),
            ProofResult::Saturated { .. } => Some(false),
            ProofResult::ResourceLimit { .. } => None,
        }
    }
}

impl fmt::Display for ProofResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofResult::Proof {
                empty_clause_id,
                rounds,
                clauses_generated,
                clauses_kept,
            } => write!(
                f,
                "proved (empty clause {} after {} rounds, {} generated, {} kept)",
                empty_clause_id, rounds, clauses_generated, clauses_kept
            ),
            ProofResult::Saturated {
                rounds,
                clauses_generated,
                clauses_kept,
            } => write!(
                f,
                "not proved (saturated after {} rounds, {} generated, {} kept)",
                rounds, clauses_generated, clauses_kept
            ),
            ProofResult::ResourceLimit {
                rounds,
                clauses_generated,
                clauses_kept,
                limit,
            } => write!(
                f,
                "unknown ({} reached after {} rounds, {} generated, {} kept)",
                limit, rounds, clauses_generated, clauses_kept
            ),
        }
    }
}

/// Refutation prover over a knowledge base and a negated hypothesis.
pub struct Resolver {
    config: ResolverConfig,
    arena: ClauseArena,
    stats: Statistics,
    /// Variables free in the hypothesis; never bound during search.
    hypothesis: HashSet<Variable>,
    cancel: Option<Arc<AtomicBool>>,
    rounds: usize,
    clauses_generated: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            arena: ClauseArena::new(),
            stats: Statistics::new(),
            hypothesis: HashSet::new(),
            cancel: None,
            rounds: 0,
            clauses_generated: 0,
        }
    }

    /// Stop the search with [`Limit::Cancelled`] once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Add the clauses of a knowledge base statement.
    pub fn add_knowledge(&mut self, cnf: StatementCnf) {
        for clause in cnf.into_clauses() {
            self.add_input(clause);
        }
    }

    /// Add the clauses of the negated hypothesis and fix its free variables.
    pub fn add_negated_hypothesis(&mut self, cnf: StatementCnf) {
        self.hypothesis.extend(hypothesis_variables(cnf.clauses()));
        for clause in cnf.into_clauses() {
            self.add_input(clause);
        }
    }

    fn add_input(&mut self, clause: Disjunction) {
        let factored = factor_clause(&clause, &self.hypothesis);
        if self.arena.iter().any(|kept| kept.clause == factored) {
            return;
        }
        let id = self.arena.insert(factored, None);
        trace!(target: targets::RESOLUTION, "input clause {}: {}", id, self.describe(id));
    }

    pub fn arena(&self) -> &ClauseArena {
        &self.arena
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Clauses the given clause was derived from, ending with the clause.
    pub fn derivation(&self, id: ClauseId) -> Vec<&Resolvent> {
        self.arena.derivation(id)
    }

    /// Parse-free entry point: convert `knowledge` and the negation of
    /// `hypothesis` to clauses and search for a refutation.
    pub fn prove(
        &mut self,
        knowledge: &[Statement],
        hypothesis: &Statement,
        tracker: &mut SymbolTracker,
    ) -> Result<ProofResult, CnfError> {
        for statement in knowledge {
            let cnf = statement.cnf(tracker)?;
            debug!(target: targets::RESOLUTION, "knowledge: {}", cnf);
            self.add_knowledge(cnf);
        }
        let negated = hypothesis.negated_cnf(tracker)?;
        debug!(target: targets::RESOLUTION, "negated hypothesis: {}", negated);
        self.add_negated_hypothesis(negated);
        Ok(self.search())
    }

    /// Run the search over the clauses added so far.
    pub fn search(&mut self) -> ProofResult {
        let started = Instant::now();
        let deadline = (self.config.max_seconds > 0)
            .then(|| Duration::from_secs(self.config.max_seconds));

        if let Some(empty) = self.arena.iter().find(|kept| kept.clause.is_empty()) {
            let id = empty.id;
            return self.proof(id);
        }

        let mut clauses: Vec<ClauseId> = self.arena.iter().map(|kept| kept.id).collect();
        let mut frontier = clauses.clone();
        let mut attempted: HashSet<(ClauseId, ClauseId)> = HashSet::new();

        loop {
            if self.rounds >= self.config.max_rounds {
                return self.limit(Limit::Rounds);
            }
            self.rounds += 1;
            self.stats.increment(counters::ROUNDS);
            debug!(
                target: targets::RESOLUTION,
                "round {}: {} clauses, {} in frontier",
                self.rounds,
                clauses.len(),
                frontier.len()
            );

            let mut added = Vec::new();
            for &c in &clauses {
                for &f in &frontier {
                    if c == f || !attempted.insert((c.min(f), c.max(f))) {
                        continue;
                    }
                    if let Some(limit) = self.interrupted(started, deadline) {
                        return self.limit(limit);
                    }
                    self.stats.increment(counters::PAIRS_TRIED);

                    let (Some(left), Some(right)) = (self.arena.get(c), self.arena.get(f)) else {
                        continue;
                    };
                    let resolvents = resolve(&left.clause, &right.clause, &self.hypothesis);

                    for resolvent in resolvents {
                        self.clauses_generated += 1;
                        self.stats.increment(counters::RESOLVENTS);
                        if resolvent.is_empty() {
                            let id = self.arena.insert(resolvent, Some((c, f)));
                            debug!(
                                target: targets::RESOLUTION,
                                "empty clause {} from {} and {}", id, c, f
                            );
                            return self.proof(id);
                        }

                        let factored = factor_clause(&resolvent, &self.hypothesis);
                        if self.is_known(&factored) {
                            self.stats.increment(counters::DUPLICATES);
                            continue;
                        }
                        if self.arena.len() >= self.config.max_clauses {
                            return self.limit(Limit::Clauses);
                        }
                        let id = self.arena.insert(factored, Some((c, f)));
                        self.stats.increment(counters::KEPT);
                        trace!(
                            target: targets::RESOLUTION,
                            "kept {}: {} (from {} and {})",
                            id,
                            self.describe(id),
                            c,
                            f
                        );
                        added.push(id);
                    }
                }
            }

            if added.is_empty() {
                debug!(target: targets::RESOLUTION, "saturated after {} rounds", self.rounds);
                return ProofResult::Saturated {
                    rounds: self.rounds,
                    clauses_generated: self.clauses_generated,
                    clauses_kept: self.arena.len(),
                };
            }
            clauses.extend(added.iter().copied());
            frontier = added;
        }
    }

    fn is_known(&self, candidate: &Disjunction) -> bool {
        self.arena
            .iter()
            .any(|kept| is_duplicate_clause(candidate, &kept.clause, &self.hypothesis))
    }

    fn interrupted(&self, started: Instant, deadline: Option<Duration>) -> Option<Limit> {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Some(Limit::Cancelled);
        }
        match deadline {
            Some(limit) if started.elapsed() >= limit => Some(Limit::Time),
            _ => None,
        }
    }

    fn describe(&self, id: ClauseId) -> String {
        self.arena
            .get(id)
            .map(|kept| kept.clause.to_string())
            .unwrap_or_default()
    }

    fn proof(&self, empty_clause_id: ClauseId) -> ProofResult {
        ProofResult::Proof {
            empty_clause_id,
            rounds: self.rounds,
            clauses_generated: self.clauses_generated,
            clauses_kept: self.arena.len(),
        }
    }

    fn limit(&self, limit: Limit) -> ProofResult {
        debug!(target: targets::RESOLUTION, "stopped: {} reached", limit);
        ProofResult::ResourceLimit {
            rounds: self.rounds,
            clauses_generated: self.clauses_generated,
            clauses_kept: self.arena.len(),
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParameterValue;
    use crate::data::{Constant, Function, Relation, Value};

    fn socrates_tracker() -> SymbolTracker {
        let mut tracker = SymbolTracker::new();
        tracker.add_relation(Relation::opaque("Human", 1));
        tracker.add_relation(Relation::opaque("Mortal", 1));
        tracker.add_relation(Relation::opaque("P", 1));
        tracker.add_relation(Relation::opaque("Q", 1));
        tracker.add_function(Function::opaque("f", 1));
        tracker.add_constant(Constant::new("Socrates", Value::Text("Socrates".into())));
        tracker.add_constant(Constant::new("a", Value::Text("a".into())));
        tracker
    }

    fn statements(texts: &[&str], tracker: &mut SymbolTracker) -> Vec<Statement> {
        texts
            .iter()
            .map(|text| Statement::parse(text, tracker).expect("parse"))
            .collect()
    }

    #[test]
    fn proves_the_syllogism() {
        let mut tracker = socrates_tracker();
        let knowledge = statements(
            &["FORALL x, Human(x) => Mortal(x)", "Human(Socrates)"],
            &mut tracker,
        );
        let goal = Statement::parse("Mortal(Socrates)", &mut tracker).expect("goal");
        let mut resolver = Resolver::default();
        let result = resolver.prove(&knowledge, &goal, &mut tracker).expect("cnf");
        assert!(result.is_proof(), "{}", result);
        assert_eq!(result.verdict(), Some(true));

        let ProofResult::Proof { empty_clause_id, .. } = result else {
            unreachable!()
        };
        let steps = resolver.derivation(empty_clause_id);
        assert!(steps.last().expect("steps").clause.is_empty());
        assert!(steps.iter().any(|step| step.parents.is_none()));
    }

    #[test]
    fn unrelated_goal_saturates() {
        let mut tracker = socrates_tracker();
        let knowledge = statements(&["Human(Socrates)"], &mut tracker);
        let goal = Statement::parse("Mortal(Socrates)", &mut tracker).expect("goal");
        let result = Resolver::default()
            .prove(&knowledge, &goal, &mut tracker)
            .expect("cnf");
        assert!(matches!(result, ProofResult::Saturated { rounds: 1, .. }));
        assert_eq!(result.verdict(), Some(false));
    }

    #[test]
    fn free_hypothesis_variables_are_not_instantiated() {
        // Mortal(k) for an arbitrary k does not follow from one mortal.
        let mut tracker = socrates_tracker();
        let knowledge = statements(&["Mortal(Socrates)"], &mut tracker);
        let goal = Statement::parse("Mortal(k)", &mut tracker).expect("goal");
        let result = Resolver::default()
            .prove(&knowledge, &goal, &mut tracker)
            .expect("cnf");
        assert_eq!(result.verdict(), Some(false));

        let goal = Statement::parse("EXISTS k, Mortal(k)", &mut tracker).expect("goal");
        let result = Resolver::default()
            .prove(&knowledge, &goal, &mut tracker)
            .expect("cnf");
        assert!(result.is_proof());
    }

    #[test]
    fn looping_search_stops_at_the_round_budget() {
        let mut tracker = socrates_tracker();
        let knowledge = statements(&["P(a)", "FORALL x, P(x) => P(f(x))"], &mut tracker);
        let goal = Statement::parse("Q(a)", &mut tracker).expect("goal");
        let config = ResolverConfig {
            max_rounds: 3,
            ..ResolverConfig::default()
        };
        let mut resolver = Resolver::new(config);
        let result = resolver.prove(&knowledge, &goal, &mut tracker).expect("cnf");
        assert!(matches!(
            result,
            ProofResult::ResourceLimit {
                limit: Limit::Rounds,
                rounds: 3,
                ..
            }
        ));
        assert_eq!(result.verdict(), None);
        assert_eq!(resolver.statistics().count(counters::ROUNDS), 3);
    }

    #[test]
    fn clause_budget_is_enforced() {
        let mut tracker = socrates_tracker();
        let knowledge = statements(&["P(a)", "FORALL x, P(x) => P(f(x))"], &mut tracker);
        let goal = Statement::parse("Q(a)", &mut tracker).expect("goal");
        let config = ResolverConfig {
            max_clauses: 4,
            ..ResolverConfig::default()
        };
        let result = Resolver::new(config)
            .prove(&knowledge, &goal, &mut tracker)
            .expect("cnf");
        assert!(matches!(
            result,
            ProofResult::ResourceLimit {
                limit: Limit::Clauses,
                ..
            }
        ));
    }

    #[test]
    fn cancellation_flag_stops_the_search() {
        let mut tracker = socrates_tracker();
        let knowledge = statements(&["P(a)", "FORALL x, P(x) => P(f(x))"], &mut tracker);
        let goal = Statement::parse("Q(a)", &mut tracker).expect("goal");
        let flag = Arc::new(AtomicBool::new(true));
        let result = Resolver::default()
            .with_cancel_flag(flag)
            .prove(&knowledge, &goal, &mut tracker)
            .expect("cnf");
        assert!(matches!(
            result,
            ProofResult::ResourceLimit {
                limit: Limit::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn parameters_override_limits() {
        let mut params = ParameterSet::new();
        params.set("max_rounds", ParameterValue::Integer(7));
        params.set("max_seconds", ParameterValue::Integer(2));
        let mut config = ResolverConfig::default();
        config.apply_parameters(&params).expect("known parameters");
        assert_eq!(config.max_rounds, 7);
        assert_eq!(config.max_seconds, 2);
        assert_eq!(config.max_clauses, ResolverConfig::default().max_clauses);

        params.set("max_depth", ParameterValue::Integer(1));
        assert_eq!(
            config.apply_parameters(&params),
            Err(ParameterError::Unknown("max_depth".into()))
        );
    }
}
