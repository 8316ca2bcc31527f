// Propositional Formula AST, builders, evaluation and printing.
// Parsing lives in `parse`, rewriting in `simplify` and `normal_forms`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Write;

use itertools::Itertools;

// A propositional variable.  Basically just a wrapper around a name.
#[derive(Debug, PartialEq, Clone, Hash, Eq, PartialOrd, Ord)]
pub struct Prop {
    name: String,
}

impl Prop {
    pub fn new(name: &str) -> Prop {
        Prop {
            name: String::from(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

pub fn prop(name: &str) -> Prop {
    // Convenience constructor for `Prop`s.
    Prop::new(name)
}

// Variable name -> truth value.  Used both as a complete valuation (truth
// tables) and as a partial one (fact bases, solver witnesses); absent keys
// evaluate to false.  We use a BTreeMap so that items are ordered by name.
pub type Valuation = BTreeMap<String, bool>;

//### Formula AST ###
#[derive(Debug, PartialEq, Clone, PartialOrd, Eq, Ord, Hash)]
pub enum Formula {
    False,
    True,
    Atom(Prop),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Imp(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    // Explicit parentheses from source text.  Transparent to `eval` and
    // `vars`; the rewriters drop it.
    Group(Box<Formula>),
}

// General Builders and utilities.
impl Formula {
    pub fn atom(name: &str) -> Formula {
        Formula::Atom(Prop::new(name))
    }

    pub fn not(formula: &Formula) -> Formula {
        Formula::Not(Box::new(formula.to_owned()))
    }

    pub fn and(formula1: &Formula, formula2: &Formula) -> Formula {
        Formula::And(Box::new(formula1.to_owned()), Box::new(formula2.to_owned()))
    }

    pub fn or(formula1: &Formula, formula2: &Formula) -> Formula {
        Formula::Or(Box::new(formula1.to_owned()), Box::new(formula2.to_owned()))
    }

    pub fn imp(formula1: &Formula, formula2: &Formula) -> Formula {
        Formula::Imp(Box::new(formula1.to_owned()), Box::new(formula2.to_owned()))
    }

    pub fn iff(formula1: &Formula, formula2: &Formula) -> Formula {
        Formula::Iff(Box::new(formula1.to_owned()), Box::new(formula2.to_owned()))
    }

    pub fn group(formula: &Formula) -> Formula {
        Formula::Group(Box::new(formula.to_owned()))
    }

    pub fn ungroup(&self) -> &Formula {
        // Peel off any number of explicit parentheses.
        match self {
            Formula::Group(p) => p.ungroup(),
            _ => self,
        }
    }

    pub fn imp_operands(&self) -> Option<(&Formula, &Formula)> {
        match self.ungroup() {
            Formula::Imp(p, q) => Some((p.ungroup(), q.ungroup())),
            _ => None,
        }
    }

    pub fn iff_operands(&self) -> Option<(&Formula, &Formula)> {
        match self.ungroup() {
            Formula::Iff(p, q) => Some((p.ungroup(), q.ungroup())),
            _ => None,
        }
    }

    pub fn as_prop(&self) -> Option<&Prop> {
        match self.ungroup() {
            Formula::Atom(p) => Some(p),
            _ => None,
        }
    }

    pub fn over_atoms<Agg>(&self, combine: &dyn Fn(&Prop, Agg) -> Agg, aggregate: Agg) -> Agg {
        // Apply an aggregator `combine` across all atoms of `self`, keeping the result
        // in `aggregate`.
        match self {
            Formula::Atom(p) => combine(p, aggregate),
            Formula::Not(p) | Formula::Group(p) => p.over_atoms(combine, aggregate),
            Formula::And(p, q) | Formula::Or(p, q) | Formula::Imp(p, q) | Formula::Iff(p, q) => {
                p.over_atoms(combine, q.over_atoms(combine, aggregate))
            }
            _ => aggregate,
        }
    }

    pub fn atoms(&self) -> BTreeSet<Prop> {
        let combine: &dyn Fn(&Prop, BTreeSet<Prop>) -> BTreeSet<Prop> = &|p, mut agg| {
            agg.insert(p.clone());
            agg
        };
        self.over_atoms(combine, BTreeSet::new())
    }

    pub fn vars(&self) -> Vec<String> {
        // Sorted, duplicate-free variable names.
        let combine: &dyn Fn(&Prop, Vec<String>) -> Vec<String> = &|p, mut agg| {
            agg.push(p.name.clone());
            agg
        };
        self.over_atoms(combine, vec![])
            .into_iter()
            .sorted()
            .dedup()
            .collect()
    }

    pub fn is_literal(&self) -> bool {
        match self {
            Formula::Atom(_) => true,
            Formula::Not(p) => matches!(**p, Formula::Atom(_)),
            _ => false,
        }
    }

    pub fn negate(&self) -> Formula {
        match self {
            Formula::Not(p) => *p.clone(),
            _ => Formula::not(self),
        }
    }

    pub fn list_conj(items: &[Formula]) -> Formula {
        // The conjunction of all `items`.
        items
            .iter()
            .cloned()
            .reduce(|x, y| Formula::and(&x, &y))
            .unwrap_or(Formula::True)
    }

    pub fn list_disj(items: &[Formula]) -> Formula {
        // The disjunction of all `items`.
        items
            .iter()
            .cloned()
            .reduce(|x, y| Formula::or(&x, &y))
            .unwrap_or(Formula::False)
    }

    pub fn eval(&self, val: &Valuation) -> bool {
        // Total: an unassigned variable is false.
        match self {
            Formula::True => true,
            Formula::False => false,
            Formula::Atom(p) => val.get(&p.name).copied().unwrap_or(false),
            Formula::Not(p) => !p.eval(val),
            Formula::And(p, q) => p.eval(val) & q.eval(val),
            Formula::Or(p, q) => p.eval(val) | q.eval(val),
            Formula::Imp(p, q) => !p.eval(val) | q.eval(val),
            Formula::Iff(p, q) => p.eval(val) == q.eval(val),
            Formula::Group(p) => p.eval(val),
        }
    }

    pub fn pprint<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        writeln!(dest, "<<{self}>>")
    }
}

// ### Formula Printing ###
//
// Binary connectives are always bracketed so that the output re-parses to the
// same tree (modulo `Group`).

fn write_infix(
    f: &mut fmt::Formatter<'_>,
    symbol: &str,
    left: &Formula,
    right: &Formula,
) -> fmt::Result {
    write!(f, "({left} {symbol} {right})")
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::False => f.write_str("FALSE"),
            Formula::True => f.write_str("TRUE"),
            Formula::Atom(p) => write!(f, "{p}"),
            Formula::Not(p) => write!(f, "!{p}"),
            Formula::And(p, q) => write_infix(f, "&", p, q),
            Formula::Or(p, q) => write_infix(f, "|", p, q),
            Formula::Imp(p, q) => write_infix(f, "=>", p, q),
            Formula::Iff(p, q) => write_infix(f, "<=>", p, q),
            Formula::Group(p) => match **p {
                // Already bracketed by its own rendering.
                Formula::And(..) | Formula::Or(..) | Formula::Imp(..) | Formula::Iff(..) => {
                    write!(f, "{p}")
                }
                _ => write!(f, "({p})"),
            },
        }
    }
}

#[cfg(test)]
mod formula_tests_general {
    use super::*;
    use crate::utils::slice_to_vec_of_owned;

    #[test]
    fn test_formula_equality() {
        let x = Formula::iff(
            &Formula::atom("hello"),
            &Formula::and(&Formula::atom("apples"), &Formula::atom("oranges")),
        );
        let y = Formula::iff(
            &Formula::atom("hello"),
            &Formula::and(&Formula::atom("apples"), &Formula::atom("oranges")),
        );
        let z = Formula::iff(
            &Formula::atom("hello"),
            &Formula::and(&Formula::atom("apples"), &Formula::atom("bananas")),
        );
        assert_eq!(x, y);
        assert_ne!(x, z);
        assert_ne!(Formula::True, Formula::False);
    }

    #[test]
    fn test_over_atoms() {
        let input = Formula::or(
            &Formula::iff(&Formula::atom("A"), &Formula::atom("B")),
            &Formula::not(&Formula::atom("A")),
        );
        let agg_init = slice_to_vec_of_owned(&["C", "B"]);
        let aggregator: &dyn Fn(&Prop, Vec<String>) -> Vec<String> = &|p, mut agg| {
            let mut image = vec![p.name().to_string()];
            image.append(&mut agg);
            image
        };
        let result = input.over_atoms(aggregator, agg_init);
        assert_eq!(result, slice_to_vec_of_owned(&["A", "B", "A", "C", "B"]));
    }

    #[test]
    fn test_vars_sorted_and_deduplicated() {
        let formula = Formula::and(
            &Formula::group(&Formula::or(&Formula::atom("C"), &Formula::atom("A"))),
            &Formula::imp(&Formula::atom("B"), &Formula::atom("A")),
        );
        assert_eq!(formula.vars(), slice_to_vec_of_owned(&["A", "B", "C"]));
        assert_eq!(
            formula.atoms(),
            BTreeSet::from([prop("A"), prop("B"), prop("C")])
        );
        assert!(Formula::True.vars().is_empty());
    }

    #[test]
    fn test_negate() {
        let formula = Formula::atom("A");
        assert_eq!(formula.negate(), Formula::not(&Formula::atom("A")));
        let formula = Formula::not(&Formula::atom("A"));
        assert_eq!(formula.negate(), Formula::atom("A"));
    }

    #[test]
    fn test_list_conj_list_disj() {
        let multiple = vec![Formula::atom("A"), Formula::atom("B"), Formula::atom("C")];

        assert_eq!(Formula::list_conj(&[]), Formula::True);
        assert_eq!(Formula::list_conj(&multiple[..1]), Formula::atom("A"));
        assert_eq!(
            Formula::list_conj(&multiple),
            Formula::and(
                &Formula::and(&Formula::atom("A"), &Formula::atom("B")),
                &Formula::atom("C")
            )
        );

        assert_eq!(Formula::list_disj(&[]), Formula::False);
        assert_eq!(
            Formula::list_disj(&multiple),
            Formula::or(
                &Formula::or(&Formula::atom("A"), &Formula::atom("B")),
                &Formula::atom("C")
            )
        );
    }

    #[test]
    fn test_operand_accessors_unwrap_groups() {
        let formula = Formula::group(&Formula::imp(
            &Formula::atom("A"),
            &Formula::group(&Formula::atom("C")),
        ));
        assert_eq!(
            formula.imp_operands(),
            Some((&Formula::atom("A"), &Formula::atom("C")))
        );
        assert_eq!(formula.iff_operands(), None);
        assert_eq!(
            Formula::group(&Formula::atom("Q")).as_prop(),
            Some(&prop("Q"))
        );
    }
}

#[cfg(test)]
mod formula_eval_tests {
    use super::*;
    use crate::utils::valuation_of;

    #[test]
    fn test_eval() {
        let val = valuation_of(&[("A", true), ("B", false)]);
        let a = Formula::atom("A");
        let b = Formula::atom("B");

        assert!(Formula::and(&a, &Formula::not(&b)).eval(&val));
        assert!(!Formula::and(&a, &b).eval(&val));
        assert!(Formula::or(&a, &b).eval(&val));
        assert!(!Formula::imp(&a, &b).eval(&val));
        assert!(Formula::imp(&b, &a).eval(&val));
        assert!(!Formula::iff(&a, &b).eval(&val));
        assert!(Formula::iff(&b, &Formula::False).eval(&val));
        assert!(Formula::group(&a).eval(&val));
    }

    #[test]
    fn test_eval_unassigned_is_false() {
        let val = Valuation::new();
        assert!(!Formula::atom("Missing").eval(&val));
        assert!(Formula::not(&Formula::atom("Missing")).eval(&val));
    }
}
