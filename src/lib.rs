pub mod cnf;
pub mod config;
pub mod dpll;
pub mod engine;
pub mod entailment;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod normal_forms;
pub mod parse;
pub mod persist;
pub mod rules;
pub mod simplify;
pub mod token;
pub mod truth_table;
pub mod utils;
