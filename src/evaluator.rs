// Formula-level satisfiability queries.
//
// Small formulas go through the truth table; larger ones are converted to
// clauses and handed to whichever `SatSolver` the caller supplied.  Without a
// solver everything is decided by truth table.

use log::debug;

use crate::cnf::Cnf;
use crate::config::EvaluatorConfig;
use crate::dpll::SatSolver;
use crate::error::CnfError;
use crate::formula::{Formula, Valuation};

pub struct Evaluator {
    config: EvaluatorConfig,
    solver: Option<Box<dyn SatSolver>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(EvaluatorConfig::default())
    }
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Evaluator {
        Evaluator {
            config,
            solver: None,
        }
    }

    pub fn with_solver(config: EvaluatorConfig, solver: Box<dyn SatSolver>) -> Evaluator {
        Evaluator {
            config,
            solver: Some(solver),
        }
    }

    fn solver_for(&self, formula: &Formula) -> Option<&dyn SatSolver> {
        // `None` when the truth table should be used.
        let num_vars = formula.vars().len();
        match &self.solver {
            Some(solver) if num_vars > self.config.truth_table_threshold => {
                debug!("{num_vars} variables, deciding with the solver");
                Some(solver.as_ref())
            }
            _ => None,
        }
    }

    pub fn find_model(&self, formula: &Formula) -> Result<Option<Valuation>, CnfError> {
        // A (possibly partial) satisfying assignment, if there is one.
        match self.solver_for(formula) {
            Some(solver) => {
                let cnf = Cnf::from_formula(formula)?;
                let (sat, model) = solver.solve(&cnf, &Valuation::new());
                Ok(sat.then_some(model))
            }
            None => Ok(formula.find_valuation(|val| formula.eval(val))),
        }
    }

    pub fn is_satisfiable(&self, formula: &Formula) -> Result<bool, CnfError> {
        match self.solver_for(formula) {
            Some(solver) => {
                let cnf = Cnf::from_formula(formula)?;
                Ok(solver.solve(&cnf, &Valuation::new()).0)
            }
            None => Ok(formula.satisfiable()),
        }
    }

    pub fn is_contradiction(&self, formula: &Formula) -> Result<bool, CnfError> {
        Ok(!self.is_satisfiable(formula)?)
    }

    pub fn is_tautology(&self, formula: &Formula) -> Result<bool, CnfError> {
        self.is_contradiction(&Formula::not(formula))
    }

    pub fn are_equivalent(&self, formula1: &Formula, formula2: &Formula) -> Result<bool, CnfError> {
        self.is_tautology(&Formula::iff(formula1, formula2))
    }
}

#[cfg(test)]
mod evaluator_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::dpll::DpllSolver;

    // Delegates to DPLL and counts how often it was asked.
    struct CountingSolver {
        calls: Arc<AtomicUsize>,
    }

    impl SatSolver for CountingSolver {
        fn solve(&self, cnf: &Cnf, initial: &Valuation) -> (bool, Valuation) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            DpllSolver::default().solve(cnf, initial)
        }
    }

    fn counting(threshold: usize) -> (Evaluator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let solver = CountingSolver {
            calls: Arc::clone(&calls),
        };
        let config = EvaluatorConfig {
            truth_table_threshold: threshold,
        };
        (Evaluator::with_solver(config, Box::new(solver)), calls)
    }

    fn parsed(input: &str) -> Formula {
        Formula::parse(input).unwrap()
    }

    #[test]
    fn test_truth_table_below_threshold() {
        let (evaluator, calls) = counting(12);
        assert!(evaluator.is_satisfiable(&parsed("A & B")).unwrap());
        assert!(evaluator.is_tautology(&parsed("A | !A")).unwrap());
        assert!(evaluator.is_contradiction(&parsed("A & !A")).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_solver_above_threshold() {
        let (evaluator, calls) = counting(2);
        let formula = parsed("(a | b) & (!a | c) & (!b | c) & !c");
        assert!(evaluator.is_contradiction(&formula).unwrap());
        assert!(evaluator
            .is_tautology(&parsed("(a => b) => ((b => c) => (a => c))"))
            .unwrap());
        assert!(!evaluator.is_tautology(&parsed("(a => b) => (c => a)")).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_no_solver_falls_back_to_truth_table() {
        let evaluator = Evaluator::new(EvaluatorConfig {
            truth_table_threshold: 0,
        });
        assert!(evaluator.is_satisfiable(&parsed("x & y & z")).unwrap());
        assert!(evaluator
            .are_equivalent(&parsed("x => y"), &parsed("!y => !x"))
            .unwrap());
    }

    #[test]
    fn test_find_model() {
        let formula = parsed("(p | q) & !p & (q => r)");
        for evaluator in [Evaluator::default(), counting(0).0] {
            let model = evaluator.find_model(&formula).unwrap().unwrap();
            assert!(formula.eval(&model));
        }
        assert_eq!(Evaluator::default().find_model(&parsed("p & !p")).unwrap(), None);
        assert_eq!(counting(0).0.find_model(&parsed("p & !p")).unwrap(), None);
    }

    #[test]
    fn test_solver_and_truth_table_agree() {
        let inputs = [
            "(A => B) <=> (!B => !A)",
            "(p <=> q) & (q <=> r) & (p <=> !r)",
            "x | (y & !z)",
            "!(a & b) <=> (!a | !b)",
        ];
        let (with_solver, _) = counting(0);
        let plain = Evaluator::default();
        for input in inputs {
            let formula = parsed(input);
            assert_eq!(
                with_solver.is_satisfiable(&formula).unwrap(),
                plain.is_satisfiable(&formula).unwrap(),
                "{input}"
            );
            assert_eq!(
                with_solver.is_tautology(&formula).unwrap(),
                plain.is_tautology(&formula).unwrap(),
                "{input}"
            );
        }
    }
}
