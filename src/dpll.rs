// The Davis-Putnam-Logemann-Loveland (1962) procedure over clause sets.
//
// A plain chronological-backtracking search: unit propagation to fixpoint,
// optional pure-literal elimination, then a split on the first unassigned
// variable met in clause order.  No clause learning and no restarts.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::cnf::{Clause, Cnf, Literal};
use crate::config::SolverConfig;
use crate::formula::Valuation;

enum ClauseState {
    Satisfied,
    Conflict,
    Unit(Literal),
    Unresolved,
}

fn clause_state(clause: &Clause, assignment: &Valuation) -> ClauseState {
    let mut unassigned = None;
    let mut num_unassigned = 0;
    for literal in &clause.literals {
        match literal.value(assignment) {
            Some(true) => return ClauseState::Satisfied,
            Some(false) => {}
            None => {
                num_unassigned += 1;
                unassigned.get_or_insert(literal);
            }
        }
    }
    match (num_unassigned, unassigned) {
        (0, _) => ClauseState::Conflict,
        (1, Some(literal)) => ClauseState::Unit(literal.clone()),
        _ => ClauseState::Unresolved,
    }
}

fn assign(assignment: &mut Valuation, trail: &mut Vec<String>, literal: &Literal) {
    assignment.insert(literal.var.clone(), literal.polarity());
    trail.push(literal.var.clone());
}

fn undo(assignment: &mut Valuation, trail: &[String]) {
    for var in trail {
        assignment.remove(var);
    }
}

fn unit_propagate(
    clauses: &[Clause],
    assignment: &mut Valuation,
    trail: &mut Vec<String>,
) -> bool {
    // Force the literal of every unit clause until none is left.  Returns
    // `false` as soon as some clause has all of its literals false.
    loop {
        let mut changed = false;
        for clause in clauses {
            match clause_state(clause, assignment) {
                ClauseState::Conflict => {
                    trace!("conflict on clause {clause}");
                    return false;
                }
                ClauseState::Unit(literal) => {
                    trace!("unit clause {clause} forces {literal}");
                    assign(assignment, trail, &literal);
                    changed = true;
                }
                ClauseState::Satisfied | ClauseState::Unresolved => {}
            }
        }
        if !changed {
            return true;
        }
    }
}

fn pure_literals(clauses: &[Clause], assignment: &Valuation) -> Vec<Literal> {
    // Unassigned variables that occur with only one polarity among the clauses
    // not yet satisfied.
    let mut polarities: BTreeMap<&str, (bool, bool)> = BTreeMap::new();
    for clause in clauses {
        if matches!(clause_state(clause, assignment), ClauseState::Satisfied) {
            continue;
        }
        for literal in &clause.literals {
            if assignment.contains_key(&literal.var) {
                continue;
            }
            let entry = polarities.entry(literal.var.as_str()).or_insert((false, false));
            if literal.negated {
                entry.1 = true;
            } else {
                entry.0 = true;
            }
        }
    }
    polarities
        .into_iter()
        .filter_map(|(var, polarity)| match polarity {
            (true, false) => Some(Literal::positive(var)),
            (false, true) => Some(Literal::negative(var)),
            _ => None,
        })
        .collect()
}

fn first_unassigned(clauses: &[Clause], assignment: &Valuation) -> Option<String> {
    // The branching variable: first unassigned variable of the first clause
    // that is not yet satisfied.
    clauses
        .iter()
        .filter(|clause| !matches!(clause_state(clause, assignment), ClauseState::Satisfied))
        .flat_map(|clause| clause.literals.iter())
        .find(|literal| !assignment.contains_key(&literal.var))
        .map(|literal| literal.var.clone())
}

fn search(clauses: &[Clause], assignment: &mut Valuation, config: &SolverConfig) -> bool {
    // Every assignment made in this frame goes on `trail` so that it can be
    // rolled back when the frame fails.
    let mut trail = vec![];
    loop {
        if !unit_propagate(clauses, assignment, &mut trail) {
            undo(assignment, &trail);
            return false;
        }
        if !config.pure_literal_elimination {
            break;
        }
        let pure = pure_literals(clauses, assignment);
        if pure.is_empty() {
            break;
        }
        for literal in &pure {
            trace!("pure literal {literal}");
            assign(assignment, &mut trail, literal);
        }
    }

    let Some(var) = first_unassigned(clauses, assignment) else {
        // Nothing left to decide and propagation found no conflict, so every
        // clause has a true literal.
        return true;
    };
    for value in [true, false] {
        trace!("branching on {var} = {value}");
        assignment.insert(var.clone(), value);
        if search(clauses, assignment, config) {
            return true;
        }
        assignment.remove(&var);
    }
    undo(assignment, &trail);
    false
}

pub fn dpll_with_config(
    cnf: &Cnf,
    initial: &Valuation,
    config: &SolverConfig,
) -> (bool, Valuation) {
    // Satisfiability of `cnf` under the partial assignment `initial`.  On
    // success the returned assignment extends `initial` and makes every clause
    // true; variables it leaves out are don't-cares.  On failure it is empty.
    if cnf.has_empty_clause() {
        debug!("dpll: empty clause present, unsatisfiable");
        return (false, Valuation::new());
    }
    if cnf.is_empty() {
        return (true, initial.clone());
    }
    let mut assignment = initial.clone();
    if search(&cnf.clauses, &mut assignment, config) {
        debug!("dpll: satisfiable with {} assigned variables", assignment.len());
        (true, assignment)
    } else {
        debug!("dpll: unsatisfiable");
        (false, Valuation::new())
    }
}

pub fn dpll(cnf: &Cnf, initial: &Valuation) -> (bool, Valuation) {
    dpll_with_config(cnf, initial, &SolverConfig::default())
}

// A satisfiability back end for the `Evaluator`.  Passed in explicitly so that
// formula-level code never depends on a particular solver.
pub trait SatSolver: Send + Sync {
    fn solve(&self, cnf: &Cnf, initial: &Valuation) -> (bool, Valuation);
}

#[derive(Debug, Clone, Default)]
pub struct DpllSolver {
    pub config: SolverConfig,
}

impl DpllSolver {
    pub fn new(config: SolverConfig) -> DpllSolver {
        DpllSolver { config }
    }
}

impl SatSolver for DpllSolver {
    fn solve(&self, cnf: &Cnf, initial: &Valuation) -> (bool, Valuation) {
        dpll_with_config(cnf, initial, &self.config)
    }
}
