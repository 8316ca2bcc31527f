use std::io::stdout;

use log::info;

use prop_rules::cnf::Cnf;
use prop_rules::config::{Config, EvaluatorConfig};
use prop_rules::dpll::{dpll, DpllSolver};
use prop_rules::engine::Engine;
use prop_rules::entailment::{entails, entails_with_counter_model};
use prop_rules::evaluator::Evaluator;
use prop_rules::formula::{Formula, Valuation};
use prop_rules::persist::{load_rules, save_rules};
use prop_rules::rules::Rule;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();
    let config = Config::default();
    let mut stdout = stdout();

    println!("\nExample 1: Simple formula");

    let formula = Formula::parse("C | D <=> (!A & B)")?;
    formula.pprint(&mut stdout)?;
    formula.print_truthtable(&mut stdout)?;
    let cnf = formula.cnf();
    cnf.pprint(&mut stdout)?;
    let evaluator = Evaluator::with_solver(
        config.evaluator.clone(),
        Box::new(DpllSolver::new(config.solver.clone())),
    );
    println!("Is satisfiable?: {}", evaluator.is_satisfiable(&formula)?);
    println!("Is tautology?: {}", evaluator.is_tautology(&formula)?);

    println!("\nExample 2: A Tautology");

    let formula = Formula::parse_raw("A | !A")?;
    formula.pprint(&mut stdout)?;
    formula.print_truthtable(&mut stdout)?;
    println!("Is tautology?: {}", evaluator.is_tautology(&formula)?);
    println!("...and `parse` simplifies it to...");
    Formula::parse("A | !A")?.pprint(&mut stdout)?;

    println!("\nExample 3: A Contradiction");

    let formula = Formula::parse_raw("!A & A")?;
    formula.pprint(&mut stdout)?;
    let dnf = formula.dnf();
    dnf.pprint(&mut stdout)?;
    println!("Is satisfiable?: {}", evaluator.is_satisfiable(&formula)?);
    println!("Is contradiction?: {}", evaluator.is_contradiction(&formula)?);

    println!("\nExample 4: Formula simplification");

    let formula = Formula::parse_raw("((TRUE => (x <=> FALSE)) => !(y | (FALSE & z)))")?;
    formula.pprint(&mut stdout)?;
    println!("...simplifies to...");
    formula.simplify().pprint(&mut stdout)?;

    println!("\nExample 5: Clauses and DPLL");

    let formula = Formula::parse("(A | B) & (!A | B) & (A | !B)")?;
    let clauses = Cnf::from_formula(&formula)?;
    println!("Clauses: {clauses}");
    let (sat, witness) = dpll(&clauses, &Valuation::new());
    println!("Is satisfiable?: {sat}, witness: {witness:?}");

    // Past the truth-table threshold the evaluator hands off to DPLL.
    let chain: Vec<Formula> = (0..16)
        .map(|i| Formula::parse(&format!("p{i} => p{}", i + 1)))
        .collect::<Result<_, _>>()?;
    let formula = Formula::imp(
        &Formula::list_conj(&chain),
        &Formula::parse("p0 => p16")?,
    );
    let small_tables = Evaluator::with_solver(
        EvaluatorConfig {
            truth_table_threshold: 4,
        },
        Box::new(DpllSolver::default()),
    );
    println!(
        "Implication chain over {} variables is a tautology?: {}",
        formula.vars().len(),
        small_tables.is_tautology(&formula)?
    );

    println!("\nExample 6: Entailment");

    let kb = vec![Formula::parse("A => B")?, Formula::parse("A")?];
    let goal = Formula::atom("B");
    println!("{{A => B, A}} entails B?: {}", entails(&kb, &goal)?);
    let result = entails_with_counter_model(&kb[..1], &goal);
    println!(
        "{{A => B}} entails B?: {}, counter-model: {:?}",
        result.entails, result.counter_model
    );

    println!("\nExample 7: Forward chaining");

    let rules = vec![
        Rule::parse("wet", "rain | sprinkler", "wet_grass")?,
        Rule::parse("slip", "wet_grass & !shoes => slippery", "slippery")?,
        Rule::parse("fall", "slippery & running", "fall")?,
    ];
    let engine = Engine::from_rules(rules, config.engine.clone());
    engine.assert("rain");
    let fired = engine.run();
    info!("fired {fired:?}");
    println!("Fired: {fired:?}");
    let (value, explain) = engine.query(&Formula::atom("slippery"));
    println!("slippery = {value}, because:");
    print!("{explain}");
    println!("As JSON:");
    println!("{}", serde_json::to_string_pretty(&explain.to_dto())?);

    println!("\nExample 8: Saving and loading rules");

    let saved = save_rules(&engine.rules())?;
    println!("{saved}");
    let loaded = load_rules(&saved)?;
    println!(
        "Reloaded {} rules, identical on re-save?: {}",
        loaded.len(),
        save_rules(&loaded)? == saved
    );
    Ok(())
}
