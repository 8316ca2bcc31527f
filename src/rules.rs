// Forward-chaining rules and the fact base they read and extend.

use std::fmt;

use crate::error::RuleError;
use crate::formula::{prop, Formula, Prop, Valuation};
use crate::token::is_identifier;

// `when` holds  =>  assert `then`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub when: Formula,
    pub then: Prop,
}

impl Rule {
    pub fn new(id: &str, when: Formula, then: Prop) -> Rule {
        Rule {
            id: String::from(id),
            when,
            then,
        }
    }

    pub fn parse(id: &str, when: &str, then: &str) -> Result<Rule, RuleError> {
        if !is_identifier(then) {
            return Err(RuleError::InvalidConsequent(String::from(then)));
        }
        let when = Formula::parse(when).map_err(|source| RuleError::Parse {
            id: String::from(id),
            source,
        })?;
        Ok(Rule::new(id, when, prop(then)))
    }

    // Same id, same consequent, and truth-table equivalent conditions.
    pub fn equals(&self, other: &Rule) -> bool {
        self.id == other.id && self.then == other.then && self.when.equivalent(&other.when)
    }

    pub fn antecedent(&self) -> &Formula {
        // The part of `when` that decides whether the rule fires.  A condition
        // of the form `p => then` or `then <=> p` mentions the consequent
        // itself; only `p` matters for firing.
        if let Some((p, q)) = self.when.imp_operands() {
            if q.as_prop() == Some(&self.then) {
                return p;
            }
        }
        if let Some((p, q)) = self.when.iff_operands() {
            if p.as_prop() == Some(&self.then) {
                return q;
            }
        }
        &self.when
    }

    pub fn condition_holds(&self, facts: &FactBase) -> bool {
        self.antecedent().eval(facts.valuation())
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Rule) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} => {}", self.id, self.when, self.then)
    }
}

// Known facts.  A name that was never asserted reads as false, the same as
// one that was retracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactBase {
    facts: Valuation,
}

impl FactBase {
    pub fn new() -> FactBase {
        FactBase::default()
    }

    pub fn assert(&mut self, name: &str) {
        self.set(name, true);
    }

    pub fn retract(&mut self, name: &str) {
        self.set(name, false);
    }

    pub fn set(&mut self, name: &str, value: bool) {
        self.facts.insert(String::from(name), value);
    }

    pub fn get(&self, name: &str) -> bool {
        self.facts.get(name).copied().unwrap_or(false)
    }

    // Whether `name` was ever asserted or retracted.
    pub fn is_recorded(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    pub fn valuation(&self) -> &Valuation {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

#[cfg(test)]
mod rules_tests {
    use super::*;
    use crate::utils::valuation_of;

    #[test]
    fn test_rule_parse() {
        let rule = Rule::parse("r1", "A & (B)", "C").unwrap();
        assert_eq!(rule.id, "r1");
        assert_eq!(rule.then, prop("C"));
        // Conditions are stored simplified.
        assert_eq!(rule.when, Formula::and(&Formula::atom("A"), &Formula::atom("B")));
        assert_eq!(rule.to_string(), "r1: (A & B) => C");
    }

    #[test]
    fn test_rule_parse_errors() {
        match Rule::parse("bad", "A &", "C") {
            Err(RuleError::Parse { id, source }) => {
                assert_eq!(id, "bad");
                assert_eq!(source.offset, 3);
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert!(matches!(
            Rule::parse("r", "A", "not a name"),
            Err(RuleError::InvalidConsequent(_))
        ));
        assert!(matches!(
            Rule::parse("r", "A", "TRUE"),
            Err(RuleError::InvalidConsequent(_))
        ));
    }

    #[test]
    fn test_rule_equality() {
        let rule = Rule::parse("r1", "A & B", "C").unwrap();
        assert!(rule.equals(&Rule::parse("r1", "B & A", "C").unwrap()));
        assert_eq!(rule, Rule::parse("r1", "!(!A | !B)", "C").unwrap());
        assert_ne!(rule, Rule::parse("r2", "A & B", "C").unwrap());
        assert_ne!(rule, Rule::parse("r1", "A & B", "D").unwrap());
        assert_ne!(rule, Rule::parse("r1", "A | B", "C").unwrap());
    }

    #[test]
    fn test_antecedent_shortcut() {
        let rule = Rule::parse("r1", "A & B => C", "C").unwrap();
        assert_eq!(rule.antecedent(), &Formula::must_parse("A & B"));

        let rule = Rule::parse("r2", "C <=> (A | B)", "C").unwrap();
        assert_eq!(rule.antecedent(), &Formula::must_parse("A | B"));

        // Only a consequent in the matching position counts.
        let rule = Rule::parse("r3", "C => A", "C").unwrap();
        assert_eq!(rule.antecedent(), &rule.when);
        let rule = Rule::parse("r4", "A <=> C", "C").unwrap();
        assert_eq!(rule.antecedent(), &rule.when);

        // Groups are looked through.
        let rule = Rule::new(
            "r5",
            Formula::parse_raw("((A) => (C))").unwrap(),
            prop("C"),
        );
        assert_eq!(rule.antecedent(), &Formula::atom("A"));
    }

    #[test]
    fn test_condition_holds() {
        let mut facts = FactBase::new();
        let rule = Rule::parse("r1", "A & B => C", "C").unwrap();
        facts.assert("A");
        assert!(!rule.condition_holds(&facts));
        facts.assert("B");
        // The full condition is false while `C` is, but the rule still fires.
        assert!(!rule.when.eval(facts.valuation()));
        assert!(rule.condition_holds(&facts));
    }

    #[test]
    fn test_fact_base() {
        let mut facts = FactBase::new();
        assert!(facts.is_empty());
        assert!(!facts.get("A"));
        assert!(!facts.is_recorded("A"));
        facts.assert("A");
        facts.assert("A");
        assert!(facts.get("A"));
        assert_eq!(facts.len(), 1);
        facts.retract("A");
        assert!(!facts.get("A"));
        assert!(facts.is_recorded("A"));
        facts.retract("B");
        assert_eq!(
            facts.valuation(),
            &valuation_of(&[("A", false), ("B", false)])
        );
    }
}
