// Algebraic simplification.
//
// `psimplify_step` rewrites a single node whose children are already
// simplified; `simplify_pass` applies it bottom-up once; `simplify` repeats
// passes until a pass leaves the tree unchanged.  The rewrite set is not known
// to reach a canonical form, only a fixpoint.

use log::{trace, warn};

use crate::formula::Formula;

// Upper bound on bottom-up passes before `simplify` gives up and returns the
// last tree it produced.
pub const MAX_SIMPLIFY_PASSES: usize = 64;

fn complementary(p: &Formula, q: &Formula) -> bool {
    // Whether one side is literally the negation of the other.
    matches!(p, Formula::Not(x) if **x == *q) || matches!(q, Formula::Not(x) if **x == *p)
}

fn absorbs_or(p: &Formula, other: &Formula) -> bool {
    // `p /\ (p \/ _)` and `p /\ (_ \/ p)` are both `p`.
    matches!(other, Formula::Or(a, b) if **a == *p || **b == *p)
}

fn absorbs_and(p: &Formula, other: &Formula) -> bool {
    // `p \/ (p /\ _)` and `p \/ (_ /\ p)` are both `p`.
    matches!(other, Formula::And(a, b) if **a == *p || **b == *p)
}

impl Formula {
    pub fn psimplify_step(formula: &Formula) -> Formula {
        // Identity, domination, idempotence, complementation and absorption
        // laws, plus double negation and constant folding for `=>`/`<=>`.
        match formula {
            Formula::Not(r) => match &**r {
                Formula::False => Formula::True,
                Formula::True => Formula::False,
                Formula::Not(p) => *p.clone(),
                _ => formula.clone(),
            },

            Formula::And(r, s) => match (&**r, &**s) {
                (p, Formula::True) | (Formula::True, p) => p.clone(),
                (_, Formula::False) | (Formula::False, _) => Formula::False,
                (p, q) if p == q => p.clone(),
                (p, q) if complementary(p, q) => Formula::False,
                (p, q) if absorbs_or(p, q) => p.clone(),
                (p, q) if absorbs_or(q, p) => q.clone(),
                _ => formula.clone(),
            },

            Formula::Or(r, s) => match (&**r, &**s) {
                (_, Formula::True) | (Formula::True, _) => Formula::True,
                (p, Formula::False) | (Formula::False, p) => p.clone(),
                (p, q) if p == q => p.clone(),
                (p, q) if complementary(p, q) => Formula::True,
                (p, q) if absorbs_and(p, q) => p.clone(),
                (p, q) if absorbs_and(q, p) => q.clone(),
                _ => formula.clone(),
            },

            Formula::Imp(r, s) => match (&**r, &**s) {
                (_, Formula::True) | (Formula::False, _) => Formula::True,
                (Formula::True, q) => q.clone(),
                (p, Formula::False) => Formula::not(p),
                (p, q) if p == q => Formula::True,
                _ => formula.clone(),
            },

            Formula::Iff(r, s) => match (&**r, &**s) {
                (p, q) if p == q => Formula::True,
                (Formula::True, p) | (p, Formula::True) => p.clone(),
                (Formula::False, p) | (p, Formula::False) => Formula::not(p),
                (p, q) if complementary(p, q) => Formula::False,
                _ => formula.clone(),
            },

            Formula::Group(p) => *p.clone(),

            _ => formula.clone(),
        }
    }

    pub fn simplify_pass(&self) -> Formula {
        // Apply `psimplify_step` bottom-up to `self`, dropping groups.
        let step = Formula::psimplify_step;
        match self {
            Formula::Not(p) => step(&Formula::not(&p.simplify_pass())),
            Formula::And(p, q) => step(&Formula::and(&p.simplify_pass(), &q.simplify_pass())),
            Formula::Or(p, q) => step(&Formula::or(&p.simplify_pass(), &q.simplify_pass())),
            Formula::Imp(p, q) => step(&Formula::imp(&p.simplify_pass(), &q.simplify_pass())),
            Formula::Iff(p, q) => step(&Formula::iff(&p.simplify_pass(), &q.simplify_pass())),
            Formula::Group(p) => p.simplify_pass(),
            _ => self.clone(),
        }
    }

    pub fn simplify(&self) -> Formula {
        self.simplify_with_limit(MAX_SIMPLIFY_PASSES)
    }

    pub fn simplify_with_limit(&self, limit: usize) -> Formula {
        // Repeat full passes until one produces a structurally identical tree,
        // or `limit` passes have run.
        let mut current = self.simplify_pass();
        for pass in 1..limit.max(1) {
            let next = current.simplify_pass();
            if next == current {
                trace!("simplify reached a fixpoint after {pass} passes");
                return current;
            }
            current = next;
        }
        if limit > 1 {
            warn!("simplify stopped after {limit} passes without reaching a fixpoint");
        }
        current
    }
}
