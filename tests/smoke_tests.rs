//! Smoke tests for end-to-end proving from problem text.

use fol_prover::{Limit, Problem, ProofResult, Resolver, ResolverConfig};

fn prove_all(input: &str) -> Vec<ProofResult> {
    let mut problem = Problem::parse_str(input).expect("parse failed");
    let mut config = ResolverConfig::default();
    config
        .apply_parameters(&problem.parameters)
        .expect("known parameters");
    let mut results = Vec::new();
    for goal in &problem.goals {
        let result = Resolver::new(config.clone())
            .prove(&problem.axioms, goal, &mut problem.tracker)
            .expect("cnf failed");
        results.push(result);
    }
    results
}

#[test]
fn test_syllogism() {
    let input = r#"
constant Socrates
relation Human(1)
relation Mortal(1)

axiom FORALL x, Human(x) => Mortal(x)
axiom Human(Socrates)
prove Mortal(Socrates)
"#;
    let results = prove_all(input);
    assert!(results[0].is_proof(), "{}", results[0]);
}

#[test]
fn test_chain_resolution() {
    let input = r#"
constant a
relation P(1)
relation Q(1)
relation R(1)

axiom FORALL x, P(x) || Q(x)
axiom !Q(a)
axiom FORALL x, P(x) => R(x)
prove R(a)
"#;
    let results = prove_all(input);
    assert!(results[0].is_proof(), "{}", results[0]);
}

#[test]
fn test_existential_goal() {
    let input = r#"
constant Plato
constant Socrates
relation StudentOf(2)
relation Mentor(1)

axiom StudentOf(Plato, Socrates)
axiom FORALL(x, y) StudentOf(x, y) => Mentor(y)
prove EXISTS t, Mentor(t)
"#;
    let results = prove_all(input);
    assert!(results[0].is_proof(), "{}", results[0]);
}

#[test]
fn test_universal_goal_needs_a_universal_premise() {
    let input = r#"
constant Socrates
relation Human(1)
relation Mortal(1)

axiom FORALL x, Human(x) => Mortal(x)
axiom FORALL x, Human(x)
prove FORALL y, Mortal(y)
"#;
    let results = prove_all(input);
    assert!(results[0].is_proof(), "{}", results[0]);

    let input = r#"
constant Socrates
relation Human(1)
relation Mortal(1)

axiom FORALL x, Human(x) => Mortal(x)
axiom Human(Socrates)
prove FORALL y, Mortal(y)
"#;
    let results = prove_all(input);
    assert_eq!(results[0].verdict(), Some(false), "{}", results[0]);
}

#[test]
fn test_unrelated_goal_saturates() {
    let input = r#"
constant Socrates
relation Human(1)
relation Wise(1)

axiom Human(Socrates)
prove Wise(Socrates)
"#;
    let results = prove_all(input);
    assert!(matches!(results[0], ProofResult::Saturated { .. }));
}

#[test]
fn test_existential_witness_is_not_every_individual() {
    let input = r#"
constant a
relation P(1)
relation Q(1)
relation R(1)

axiom EXISTS y, P(y)
axiom FORALL x, P(x) => R(x)
axiom FORALL x, P(x) => Q(x)
prove R(a)
prove Q(a)
prove EXISTS z, R(z) && Q(z)
"#;
    let results = prove_all(input);
    assert!(matches!(results[0], ProofResult::Saturated { .. }), "{}", results[0]);
    assert!(matches!(results[1], ProofResult::Saturated { .. }), "{}", results[1]);
    assert!(results[2].is_proof(), "{}", results[2]);
}

#[test]
fn test_round_budget_gives_unknown() {
    let input = r#"
constant zero
function succ(1)
relation Nat(1)
relation Odd(1)
assign max_rounds = 4

axiom Nat(zero)
axiom FORALL n, Nat(n) => Nat(succ(n))
prove Odd(zero)
"#;
    let results = prove_all(input);
    assert!(matches!(
        results[0],
        ProofResult::ResourceLimit {
            limit: Limit::Rounds,
            ..
        }
    ));
    assert_eq!(results[0].verdict(), None);
}

#[test]
fn test_several_goals_share_the_tracker() {
    let input = r#"
constant a
constant b
relation P(1)
relation Q(1)

axiom P(a)
axiom FORALL x, P(x) => Q(x)
prove Q(a)
prove Q(b)
prove P(a) && Q(a)
"#;
    let verdicts: Vec<_> = prove_all(input).iter().map(ProofResult::verdict).collect();
    assert_eq!(verdicts, vec![Some(true), Some(false), Some(true)]);
}
