//! Command line front end: read a problem file, print CNF conversions and
//! try to prove each goal from the axioms.
#![forbid(unsafe_code)]
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use fol_prover::{
    ParameterSet, Problem, ProofResult, Resolver, ResolverConfig, Statement, SymbolTracker,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// First-order statement processor and resolution prover.
#[derive(Parser, Debug)]
#[command(name = "fol-prover")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Problem file; read from stdin when absent
    input: Option<PathBuf>,

    /// Print the CNF of every axiom and goal
    #[arg(long)]
    cnf: bool,

    /// Print the derivation of each proof
    #[arg(long)]
    show_proof: bool,

    /// Maximum number of resolution rounds
    #[arg(long)]
    max_rounds: Option<usize>,

    /// Maximum number of kept clauses
    #[arg(long)]
    max_clauses: Option<usize>,

    /// Wall clock limit per goal in seconds
    #[arg(long)]
    max_seconds: Option<u64>,

    /// Parameter assignment `name=value`, may be repeated
    #[arg(short = 'a', long = "assign", value_name = "NAME=VALUE")]
    assign: Vec<String>,
}

fn print_banner() {
    println!("fol-prover {}", VERSION);
    println!();
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    process::exit(2);
}

/// File parameters first, then `-a` assignments, then dedicated flags.
fn resolver_config(cli: &Cli, file: &ParameterSet) -> ResolverConfig {
    let mut config = ResolverConfig::default();
    if let Err(err) = config.apply_parameters(file) {
        fail(format!("Parameter error: {}", err));
    }
    let mut params = ParameterSet::new();
    for assignment in &cli.assign {
        if let Err(err) = params.assign(assignment) {
            fail(format!("Parameter error: {}", err));
        }
    }
    if let Err(err) = config.apply_parameters(&params) {
        fail(format!("Parameter error: {}", err));
    }
    if let Some(rounds) = cli.max_rounds {
        config.max_rounds = rounds;
    }
    if let Some(clauses) = cli.max_clauses {
        config.max_clauses = clauses;
    }
    if let Some(seconds) = cli.max_seconds {
        config.max_seconds = seconds;
    }
    config
}

fn print_cnf(label: &str, statement: &Statement, tracker: &mut SymbolTracker) {
    println!("{}: {}", label, statement);
    match statement.cnf(tracker) {
        Ok(cnf) => println!("  cnf: {}", cnf),
        Err(err) => println!("  cnf error: {}", err),
    }
}

fn print_derivation(resolver: &Resolver, result: &ProofResult) {
    let ProofResult::Proof { empty_clause_id, .. } = result else {
        return;
    };
    for step in resolver.derivation(*empty_clause_id) {
        match step.parents {
            Some((left, right)) => println!("  {}: {}  [{}, {}]", step.id, step.clause, left, right),
            None => println!("  {}: {}  [input]", step.id, step.clause),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let input = read_input(cli.input.as_ref())
        .unwrap_or_else(|err| fail(format!("Input error: {}", err)));
    let Problem {
        mut tracker,
        axioms,
        goals,
        parameters,
    } = Problem::parse_str(&input).unwrap_or_else(|err| fail(format!("Parse error: {}", err)));
    let config = resolver_config(&cli, &parameters);

    print_banner();
    println!("Axioms: {}", axioms.len());
    println!("Goals: {}", goals.len());
    println!();

    if cli.cnf {
        for axiom in &axioms {
            print_cnf("axiom", axiom, &mut tracker);
        }
        for goal in &goals {
            print_cnf("goal", goal, &mut tracker);
        }
        println!();
    }

    let mut exit_code = 0;
    for goal in &goals {
        let mut resolver = Resolver::new(config.clone());
        let result = match resolver.prove(&axioms, goal, &mut tracker) {
            Ok(result) => result,
            Err(err) => fail(format!("CNF error: {}", err)),
        };
        println!("prove {}: {}", goal, result);
        if cli.show_proof {
            print_derivation(&resolver, &result);
        }
        log::info!("statistics: {}", resolver.statistics());

        let code = match result {
            ProofResult::Proof { .. } => 0,
            ProofResult::Saturated { .. } => 4,
            ProofResult::ResourceLimit { .. } => 3,
        };
        exit_code = exit_code.max(code);
    }
    process::exit(exit_code);
}
