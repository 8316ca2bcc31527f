// Brute-force semantics: enumerate every valuation of a formula's variables.
// Exact, but Theta(2^n) in the number of variables; see `evaluator` for the
// switch over to DPLL.

use std::cmp;
use std::io::Write;

use itertools::Itertools;

use crate::formula::{Formula, Valuation};

fn on_all_valuations(
    names: &[String],
    valuation: &mut Valuation,
    test: &dyn Fn(&Valuation) -> bool,
) -> bool {
    // Whether `test` holds on every extension of `valuation` to `names`.
    // Stops at the first failure.
    match names {
        [] => test(valuation),
        [head, rest @ ..] => {
            let mut result = true;
            for value in [false, true] {
                valuation.insert(head.clone(), value);
                if !on_all_valuations(rest, valuation, test) {
                    result = false;
                    break;
                }
            }
            valuation.remove(head);
            result
        }
    }
}

fn first_valuation(
    names: &[String],
    valuation: &mut Valuation,
    test: &dyn Fn(&Valuation) -> bool,
) -> Option<Valuation> {
    // The first extension of `valuation` to `names` satisfying `test`, in
    // the same order as `on_all_valuations` visits them.
    match names {
        [] => test(valuation).then(|| valuation.clone()),
        [head, rest @ ..] => {
            let mut found = None;
            for value in [false, true] {
                valuation.insert(head.clone(), value);
                found = first_valuation(rest, valuation, test);
                if found.is_some() {
                    break;
                }
            }
            valuation.remove(head);
            found
        }
    }
}

pub fn get_all_valuations(names: &[String]) -> Vec<Valuation> {
    // Every valuation of `names`, in binary counting order with the first
    // name as the most significant bit (all-true first).
    // WARNING, running time/space is Theta(exp(|names|))
    let mut result = vec![Valuation::new()];
    for name in names {
        let mut new_result = Vec::with_capacity(result.len() * 2);
        for val in result {
            let mut positive = val.clone();
            positive.insert(name.clone(), true);
            new_result.push(positive);
            let mut negative = val;
            negative.insert(name.clone(), false);
            new_result.push(negative);
        }
        result = new_result;
    }
    result
}

pub fn equivalent(formula1: &Formula, formula2: &Formula) -> bool {
    formula1.equivalent(formula2)
}

impl Formula {
    pub fn tautology(&self) -> bool {
        on_all_valuations(&self.vars(), &mut Valuation::new(), &|val| self.eval(val))
    }

    pub fn unsatisfiable(&self) -> bool {
        on_all_valuations(&self.vars(), &mut Valuation::new(), &|val| !self.eval(val))
    }

    pub fn satisfiable(&self) -> bool {
        !self.unsatisfiable()
    }

    pub fn find_valuation(&self, test: impl Fn(&Valuation) -> bool) -> Option<Valuation> {
        // A complete valuation of `self.vars()` on which `test` holds.
        first_valuation(&self.vars(), &mut Valuation::new(), &test)
    }

    pub fn equivalent(&self, formula: &Formula) -> bool {
        // Truth-table equivalence over the union of both variable sets.
        let names: Vec<String> = self
            .vars()
            .into_iter()
            .merge(formula.vars())
            .dedup()
            .collect();
        on_all_valuations(&names, &mut Valuation::new(), &|val| {
            self.eval(val) == formula.eval(val)
        })
    }

    pub fn print_truthtable(&self, dest: &mut impl Write) -> std::io::Result<()> {
        let names = self.vars();
        let column_width = 1 + cmp::max(5, names.iter().map(|x| x.len()).max().unwrap_or(0));
        // Pad `s` with enough spaces to be `column_width`.
        let pad = |s: &str| format!("{s:<column_width$}");
        let truth_string = |value: bool| if value { "true" } else { "false" };

        let header_lhs: String = names.iter().map(|name| pad(name)).collect();
        let header = format!("{header_lhs}| formula");
        let separator = "-".repeat(header.len());
        writeln!(dest, "{header}")?;
        writeln!(dest, "{separator}")?;
        for val in get_all_valuations(&names) {
            let input_string: String = names
                .iter()
                .map(|name| pad(truth_string(val[name])))
                .collect();
            writeln!(dest, "{input_string}| {}", truth_string(self.eval(&val)))?;
        }
        writeln!(dest, "{separator}")
    }
}
