// Tunables for the solver, the evaluator and the rule engine.  Every field has
// a default, so a partial (or empty) JSON object is a valid configuration.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    // Assign variables that occur with a single polarity before branching.
    pub pure_literal_elimination: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            pure_literal_elimination: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    // Formulas with at most this many variables are decided by truth table.
    pub truth_table_threshold: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            truth_table_threshold: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Pass budget for `Engine::run`.
    pub max_iterations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { max_iterations: 16 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub evaluator: EvaluatorConfig,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_json(input: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(input)
    }
}
