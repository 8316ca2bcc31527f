// Normal Forms
//
// `nnf` pushes negations down to the atoms; `cnf`/`dnf` then distribute
// `\/` over `/\` (resp. the dual).  Distribution is exponential in the worst
// case: there is no definitional (Tseitin) encoding here, so callers with
// large formulas should simplify first.

use crate::formula::Formula;

impl Formula {
    pub fn nnf(&self) -> Formula {
        // Negation normal form.  Groups are dropped; `=>` and `<=>` are
        // unfolded into `\/` and `/\`.
        match self {
            Formula::And(p, q) => Formula::and(&p.nnf(), &q.nnf()),
            Formula::Or(p, q) => Formula::or(&p.nnf(), &q.nnf()),
            Formula::Imp(p, q) => Formula::or(&Formula::not(p).nnf(), &q.nnf()),
            Formula::Iff(p, q) => Formula::and(
                &Formula::or(&Formula::not(p).nnf(), &q.nnf()),
                &Formula::or(&Formula::not(q).nnf(), &p.nnf()),
            ),
            Formula::Group(p) => p.nnf(),
            Formula::Not(r) => match &**r {
                Formula::True => Formula::False,
                Formula::False => Formula::True,
                Formula::Not(p) => p.nnf(),
                Formula::Group(p) => Formula::not(p).nnf(),
                Formula::And(p, q) => Formula::or(&Formula::not(p).nnf(), &Formula::not(q).nnf()),
                Formula::Or(p, q) => Formula::and(&Formula::not(p).nnf(), &Formula::not(q).nnf()),
                Formula::Imp(p, q) => Formula::and(&p.nnf(), &Formula::not(q).nnf()),
                Formula::Iff(p, q) => Formula::or(
                    &Formula::and(&p.nnf(), &Formula::not(q).nnf()),
                    &Formula::and(&Formula::not(p).nnf(), &q.nnf()),
                ),
                Formula::Atom(_) => self.clone(),
            },
            _ => self.clone(),
        }
    }

    fn distrib_or(left: &Formula, right: &Formula) -> Formula {
        // `left \/ right` with both sides in CNF, pushed below the conjunctions.
        match (left, right) {
            (Formula::And(p, q), _) => Formula::and(
                &Formula::distrib_or(p, right),
                &Formula::distrib_or(q, right),
            ),
            (_, Formula::And(p, q)) => Formula::and(
                &Formula::distrib_or(left, p),
                &Formula::distrib_or(left, q),
            ),
            _ => Formula::or(left, right),
        }
    }

    fn distrib_and(left: &Formula, right: &Formula) -> Formula {
        // Dual of `distrib_or`.
        match (left, right) {
            (Formula::Or(p, q), _) => Formula::or(
                &Formula::distrib_and(p, right),
                &Formula::distrib_and(q, right),
            ),
            (_, Formula::Or(p, q)) => Formula::or(
                &Formula::distrib_and(left, p),
                &Formula::distrib_and(left, q),
            ),
            _ => Formula::and(left, right),
        }
    }

    fn nnf_to_cnf(&self) -> Formula {
        match self {
            Formula::And(p, q) => Formula::and(&p.nnf_to_cnf(), &q.nnf_to_cnf()),
            Formula::Or(p, q) => Formula::distrib_or(&p.nnf_to_cnf(), &q.nnf_to_cnf()),
            _ => self.clone(),
        }
    }

    fn nnf_to_dnf(&self) -> Formula {
        match self {
            Formula::Or(p, q) => Formula::or(&p.nnf_to_dnf(), &q.nnf_to_dnf()),
            Formula::And(p, q) => Formula::distrib_and(&p.nnf_to_dnf(), &q.nnf_to_dnf()),
            _ => self.clone(),
        }
    }

    pub fn cnf(&self) -> Formula {
        // Conjunction of disjunctions of literals (constants may remain when
        // the input was not simplified first).
        self.nnf().nnf_to_cnf()
    }

    pub fn dnf(&self) -> Formula {
        // Disjunction of conjunctions of literals.
        self.nnf().nnf_to_dnf()
    }

    fn is_leaf(&self) -> bool {
        self.is_literal() || matches!(self, Formula::True | Formula::False)
    }

    pub fn is_nnf(&self) -> bool {
        match self {
            Formula::And(p, q) | Formula::Or(p, q) => p.is_nnf() && q.is_nnf(),
            _ => self.is_leaf(),
        }
    }

    fn _is_disjunction_of_literals(&self) -> bool {
        match self {
            Formula::Or(p, q) => p._is_disjunction_of_literals() && q._is_disjunction_of_literals(),
            _ => self.is_leaf(),
        }
    }

    fn _is_conjunction_of_literals(&self) -> bool {
        match self {
            Formula::And(p, q) => {
                p._is_conjunction_of_literals() && q._is_conjunction_of_literals()
            }
            _ => self.is_leaf(),
        }
    }

    pub fn is_cnf(&self) -> bool {
        match self {
            Formula::And(p, q) => p.is_cnf() && q.is_cnf(),
            _ => self._is_disjunction_of_literals(),
        }
    }

    pub fn is_dnf(&self) -> bool {
        match self {
            Formula::Or(p, q) => p.is_dnf() && q.is_dnf(),
            _ => self._is_conjunction_of_literals(),
        }
    }
}

#[cfg(test)]
mod normal_form_tests {
    use super::*;
    use crate::truth_table::equivalent;
    use crate::utils::random_formula;
    use rand::{rngs::StdRng, SeedableRng};

    fn a(name: &str) -> Formula {
        Formula::atom(name)
    }

    fn raw(input: &str) -> Formula {
        Formula::parse_raw(input).unwrap()
    }

    fn parsed(input: &str) -> Formula {
        Formula::parse(input).unwrap()
    }

    const SAMPLES: [&str; 8] = [
        "A => B",
        "A <=> B",
        "!(A <=> B)",
        "(A & B) | (C & D)",
        "!(A | (B => !C))",
        "(p <=> q) <=> r",
        "!((x | y) & !(z => x))",
        "(A & TRUE) | !FALSE",
    ];

    #[test]
    fn test_nnf() {
        assert_eq!(
            raw("!(A & !B)").nnf(),
            Formula::or(&Formula::not(&a("A")), &a("B"))
        );
        assert_eq!(
            raw("A => B").nnf(),
            Formula::or(&Formula::not(&a("A")), &a("B"))
        );
        assert_eq!(
            raw("A <=> B").nnf(),
            Formula::and(
                &Formula::or(&Formula::not(&a("A")), &a("B")),
                &Formula::or(&Formula::not(&a("B")), &a("A")),
            )
        );
        assert_eq!(
            raw("!(A <=> B)").nnf(),
            Formula::or(
                &Formula::and(&a("A"), &Formula::not(&a("B"))),
                &Formula::and(&Formula::not(&a("A")), &a("B")),
            )
        );
        assert_eq!(raw("!!(A)").nnf(), a("A"));
        assert_eq!(raw("!TRUE").nnf(), Formula::False);
    }

    #[test]
    fn test_nnf_shape_and_meaning() {
        for input in SAMPLES {
            let formula = raw(input);
            let nnf = formula.nnf();
            assert!(nnf.is_nnf(), "{input} -> {nnf}");
            assert!(equivalent(&formula, &nnf), "{input}");
        }
    }

    #[test]
    fn test_cnf() {
        assert_eq!(
            raw("(P & Q) | R").cnf(),
            Formula::and(
                &Formula::or(&a("P"), &a("R")),
                &Formula::or(&a("Q"), &a("R"))
            )
        );
        assert_eq!(
            raw("R | (P & Q)").cnf(),
            Formula::and(
                &Formula::or(&a("R"), &a("P")),
                &Formula::or(&a("R"), &a("Q"))
            )
        );
    }

    #[test]
    fn test_dnf() {
        assert_eq!(
            raw("(P | Q) & R").dnf(),
            Formula::or(
                &Formula::and(&a("P"), &a("R")),
                &Formula::and(&a("Q"), &a("R"))
            )
        );
    }

    #[test]
    fn test_cnf_dnf_soundness() {
        for input in SAMPLES {
            let formula = raw(input);
            let cnf = formula.cnf();
            let dnf = formula.dnf();
            assert!(cnf.is_cnf(), "{input} -> {cnf}");
            assert!(dnf.is_dnf(), "{input} -> {dnf}");
            assert!(equivalent(&formula, &cnf), "{input}");
            assert!(equivalent(&formula, &dnf), "{input}");
        }
    }

    #[test]
    fn test_normal_forms_random_formulas() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..300 {
            let formula = random_formula(&mut rng, 4);
            let (nnf, cnf, dnf) = (formula.nnf(), formula.cnf(), formula.dnf());
            assert!(nnf.is_nnf(), "{formula} -> {nnf}");
            assert!(cnf.is_cnf(), "{formula} -> {cnf}");
            assert!(dnf.is_dnf(), "{formula} -> {dnf}");
            assert!(equivalent(&formula, &nnf), "{formula}");
            assert!(equivalent(&formula, &cnf), "{formula}");
            assert!(equivalent(&formula, &dnf), "{formula}");
        }
    }

    #[test]
    fn test_is_cnf() {
        assert!(parsed("A").is_cnf());
        assert!(parsed("!A | B").is_cnf());
        assert!(parsed("(A | B) & (!C | D) & E").is_cnf());
        assert!(!parsed("(A & B) | C").is_cnf());
        assert!(!parsed("!(A | B)").is_cnf());
        assert!(!parsed("A => B").is_cnf());
    }

    #[test]
    fn test_is_dnf() {
        assert!(parsed("(A & B) | (!C & D)").is_dnf());
        assert!(!parsed("(A | B) & C").is_dnf());
    }
}
