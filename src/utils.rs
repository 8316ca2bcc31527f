#[cfg(test)]
use rand::Rng;

#[cfg(test)]
use crate::formula::Formula;
use crate::formula::Valuation;

pub fn slice_to_vec_of_owned(input: &[&str]) -> Vec<String> {
    input.iter().map(|x| x.to_string()).collect()
}

pub fn valuation_of(input: &[(&str, bool)]) -> Valuation {
    input
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

// Random formula over the variables `a`..`d` and the constants, at most
// `depth` connectives deep.  Tests seed `rng` so that failures reproduce.
#[cfg(test)]
pub fn random_formula<R: Rng>(rng: &mut R, depth: usize) -> Formula {
    const VARS: [&str; 4] = ["a", "b", "c", "d"];
    if depth == 0 || rng.gen_bool(0.25) {
        return match rng.gen_range(0..10) {
            0 => Formula::True,
            1 => Formula::False,
            n => Formula::atom(VARS[n % VARS.len()]),
        };
    }
    let p = random_formula(rng, depth - 1);
    match rng.gen_range(0..6) {
        0 => Formula::not(&p),
        1 => Formula::group(&p),
        n => {
            let q = random_formula(rng, depth - 1);
            match n {
                2 => Formula::and(&p, &q),
                3 => Formula::or(&p, &q),
                4 => Formula::imp(&p, &q),
                _ => Formula::iff(&p, &q),
            }
        }
    }
}
