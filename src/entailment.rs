// Entailment by refutation: KB |= goal iff KB /\ ~goal is unsatisfiable.

use itertools::Itertools;
use log::{debug, warn};

use crate::cnf::Cnf;
use crate::dpll::dpll;
use crate::error::CnfError;
use crate::formula::{Formula, Valuation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entailment {
    pub entails: bool,
    // A valuation satisfying KB /\ ~goal.  Always `None` when `entails`, and
    // also `None` when the answer had to be computed without clause form.
    pub counter_model: Option<Valuation>,
}

fn refutation(kb: &[Formula], goal: &Formula) -> Formula {
    let mut conjuncts = kb.to_vec();
    conjuncts.push(Formula::not(goal));
    Formula::list_conj(&conjuncts)
}

fn mentioned_vars(kb: &[Formula], goal: &Formula) -> Vec<String> {
    kb.iter()
        .chain(std::iter::once(goal))
        .map(Formula::vars)
        .kmerge()
        .dedup()
        .collect()
}

pub fn entails(kb: &[Formula], goal: &Formula) -> Result<bool, CnfError> {
    let cnf = Cnf::from_formula(&refutation(kb, goal))?;
    let (sat, _) = dpll(&cnf, &Valuation::new());
    debug!("entails {goal}: {}", !sat);
    Ok(!sat)
}

fn decide(kb: &[Formula], goal: &Formula, cnf: Result<Cnf, CnfError>) -> Entailment {
    match cnf {
        Ok(cnf) => {
            let (sat, mut model) = dpll(&cnf, &Valuation::new());
            if !sat {
                return Entailment {
                    entails: true,
                    counter_model: None,
                };
            }
            // Don't-cares are reported as false.
            for var in mentioned_vars(kb, goal) {
                model.entry(var).or_insert(false);
            }
            Entailment {
                entails: false,
                counter_model: Some(model),
            }
        }
        Err(err) => {
            warn!("clause conversion failed ({err}), deciding {goal} without a counter-model");
            Entailment {
                entails: refutation(kb, goal).unsatisfiable(),
                counter_model: None,
            }
        }
    }
}

pub fn entails_with_counter_model(kb: &[Formula], goal: &Formula) -> Entailment {
    let cnf = Cnf::from_formula(&refutation(kb, goal));
    decide(kb, goal, cnf)
}

#[cfg(test)]
mod entailment_tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn parsed(inputs: &[&str]) -> Vec<Formula> {
        inputs.iter().map(|input| Formula::must_parse(input)).collect()
    }

    #[test]
    fn test_modus_ponens() {
        init();
        let kb = parsed(&["A => B", "A"]);
        assert!(entails(&kb, &Formula::atom("B")).unwrap());
        assert!(!entails(&kb, &Formula::atom("C")).unwrap());

        let result = entails_with_counter_model(&kb, &Formula::atom("B"));
        assert_eq!(
            result,
            Entailment {
                entails: true,
                counter_model: None
            }
        );
    }

    #[test]
    fn test_counter_model() {
        init();
        let kb = parsed(&["A => B"]);
        let goal = Formula::atom("B");
        let result = entails_with_counter_model(&kb, &goal);
        assert!(!result.entails);
        let model = result.counter_model.unwrap();
        assert!(!model.is_empty());
        assert!(kb[0].eval(&model));
        assert!(!goal.eval(&model));
    }

    #[test]
    fn test_counter_model_is_complete() {
        // `C` is irrelevant to the refutation but still reported.
        let kb = parsed(&["A | C", "A => B"]);
        let goal = Formula::must_parse("B & C");
        let result = entails_with_counter_model(&kb, &goal);
        assert!(!result.entails);
        let model = result.counter_model.unwrap();
        assert_eq!(
            model.keys().cloned().collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert!(kb.iter().all(|formula| formula.eval(&model)));
        assert!(!goal.eval(&model));
    }

    #[test]
    fn test_empty_kb_and_inconsistent_kb() {
        assert!(entails(&[], &Formula::must_parse("p | !p")).unwrap());
        assert!(!entails(&[], &Formula::atom("p")).unwrap());
        // Anything follows from a contradiction.
        let kb = parsed(&["p", "!p"]);
        assert!(entails(&kb, &Formula::atom("q")).unwrap());
    }

    #[test]
    fn test_fallback_without_clause_form() {
        init();
        let kb = parsed(&["A => B"]);
        let goal = Formula::atom("B");
        let failed = Err(CnfError::NotALiteral(String::from("(A => B)")));
        assert_eq!(
            decide(&kb, &goal, failed),
            Entailment {
                entails: false,
                counter_model: None
            }
        );

        let kb = parsed(&["A => B", "A"]);
        let failed = Err(CnfError::NotALiteral(String::from("(A => B)")));
        assert!(decide(&kb, &goal, failed).entails);
    }
}
