// Clause-set representation of formulas in conjunctive normal form, as
// consumed by the DPLL solver.
//
// A `Cnf` with no clauses is `True`; a `Cnf` containing an empty clause is
// `False`.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use log::trace;

use crate::error::CnfError;
use crate::formula::{Formula, Valuation};

#[derive(Debug, PartialEq, Clone, PartialOrd, Eq, Ord, Hash)]
pub struct Literal {
    pub var: String,
    pub negated: bool,
}

impl Literal {
    pub fn positive(var: &str) -> Literal {
        Literal {
            var: var.to_string(),
            negated: false,
        }
    }

    pub fn negative(var: &str) -> Literal {
        Literal {
            var: var.to_string(),
            negated: true,
        }
    }

    pub fn negate(&self) -> Literal {
        Literal {
            var: self.var.clone(),
            negated: !self.negated,
        }
    }

    // The value the variable must take for this literal to be true.
    pub fn polarity(&self) -> bool {
        !self.negated
    }

    pub fn value(&self, val: &Valuation) -> Option<bool> {
        // `None` while the variable is unassigned.
        val.get(&self.var).map(|value| *value != self.negated)
    }

    pub fn to_formula(&self) -> Formula {
        let atom = Formula::atom(&self.var);
        if self.negated {
            Formula::not(&atom)
        } else {
            atom
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!{}", self.var)
        } else {
            f.write_str(&self.var)
        }
    }
}

// A disjunction of literals.  We use BTreeSet so that iteration order (and
// hence the solver's branching order) is deterministic.
#[derive(Debug, PartialEq, Clone, PartialOrd, Eq, Ord, Hash, Default)]
pub struct Clause {
    pub literals: BTreeSet<Literal>,
}

impl Clause {
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Clause {
        Clause {
            literals: literals.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .any(|lit| self.literals.contains(&lit.negate()))
    }

    pub fn eval(&self, val: &Valuation) -> bool {
        self.literals.iter().any(|lit| lit.value(val) == Some(true))
    }

    pub fn to_formula(&self) -> Formula {
        let disjuncts: Vec<Formula> = self.literals.iter().map(Literal::to_formula).collect();
        Formula::list_disj(&disjuncts)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.literals.iter().join(" | "))
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Hash, Default)]
pub struct Cnf {
    pub clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new(clauses: Vec<Clause>) -> Cnf {
        Cnf { clauses }
    }

    // The unsatisfiable clause set.
    pub fn contradiction() -> Cnf {
        Cnf {
            clauses: vec![Clause::default()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    pub fn vars(&self) -> Vec<String> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals.iter().map(|lit| lit.var.clone()))
            .sorted()
            .dedup()
            .collect()
    }

    pub fn eval(&self, val: &Valuation) -> bool {
        self.clauses.iter().all(|clause| clause.eval(val))
    }

    pub fn to_formula(&self) -> Formula {
        let conjuncts: Vec<Formula> = self.clauses.iter().map(Clause::to_formula).collect();
        Formula::list_conj(&conjuncts)
    }

    pub fn from_formula(formula: &Formula) -> Result<Cnf, CnfError> {
        // Simplify, convert to CNF and flatten into clauses.
        let cnf = formula.simplify().cnf();
        let cnf = Cnf::from_cnf_formula(&cnf)?;
        trace!("{formula} has {} clauses", cnf.clauses.len());
        Ok(cnf)
    }

    pub fn from_cnf_formula(formula: &Formula) -> Result<Cnf, CnfError> {
        // Flatten a formula that is already a conjunction of disjunctions of
        // literals.  Constants are absorbed; anything else in a clause
        // position is an error.
        let mut conjuncts = vec![];
        collect_conjuncts(formula, &mut conjuncts);
        let mut clauses: Vec<Clause> = vec![];
        for conjunct in conjuncts {
            if let Some(clause) = flatten_clause(conjunct)? {
                if !clauses.contains(&clause) {
                    clauses.push(clause);
                }
            }
        }
        Ok(Cnf { clauses })
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.clauses.iter().join(", "))
    }
}

fn collect_conjuncts<'a>(formula: &'a Formula, out: &mut Vec<&'a Formula>) {
    match formula {
        Formula::And(p, q) => {
            collect_conjuncts(p, out);
            collect_conjuncts(q, out);
        }
        Formula::Group(p) => collect_conjuncts(p, out),
        // The empty conjunction.
        Formula::True => {}
        _ => out.push(formula),
    }
}

fn collect_disjuncts(formula: &Formula, out: &mut BTreeSet<Literal>) -> Result<bool, CnfError> {
    // Add the literals of an OR-tree to `out`; `Ok(true)` when the clause
    // contains `True` and is therefore satisfied outright.
    match formula {
        Formula::Or(p, q) => Ok(collect_disjuncts(p, out)? | collect_disjuncts(q, out)?),
        Formula::Group(p) => collect_disjuncts(p, out),
        Formula::False => Ok(false),
        Formula::True => Ok(true),
        Formula::Atom(p) => {
            out.insert(Literal::positive(p.name()));
            Ok(false)
        }
        Formula::Not(inner) => match inner.ungroup() {
            Formula::Atom(p) => {
                out.insert(Literal::negative(p.name()));
                Ok(false)
            }
            other => Err(CnfError::NegatedNonAtom(other.to_string())),
        },
        other => Err(CnfError::NotALiteral(other.to_string())),
    }
}

fn flatten_clause(formula: &Formula) -> Result<Option<Clause>, CnfError> {
    // `None` for a clause that is trivially true.
    let mut literals = BTreeSet::new();
    if collect_disjuncts(formula, &mut literals)? {
        return Ok(None);
    }
    Ok(Some(Clause { literals }))
}
