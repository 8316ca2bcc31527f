// Forward-chaining engine.
//
// One mutex guards the fact base and the rule list together, and every public
// operation holds it for its whole duration, so an `Engine` can be shared
// between threads behind an `Arc`.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::formula::{Formula, Prop};
use crate::rules::{FactBase, Rule};

// A node of a derivation tree built by `Engine::query`.  Formula nodes are
// labelled with the formula text, rule nodes with the rule id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explain {
    pub label: String,
    pub value: bool,
    pub why: Option<String>,
    pub children: Vec<Explain>,
}

impl Explain {
    fn leaf(label: String, value: bool, why: &str) -> Explain {
        Explain {
            label,
            value,
            why: Some(String::from(why)),
            children: vec![],
        }
    }

    pub fn to_dto(&self) -> ExplainDto {
        ExplainDto::from(self)
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{}{} = {}", "  ".repeat(depth), self.label, self.value)?;
        if let Some(why) = &self.why {
            write!(f, " ({why})")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Explain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

// Serializable view of an `Explain` tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainDto {
    pub expr: String,
    pub value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    pub children: Vec<ExplainDto>,
}

impl From<&Explain> for ExplainDto {
    fn from(explain: &Explain) -> ExplainDto {
        ExplainDto {
            expr: explain.label.clone(),
            value: explain.value,
            why: explain.why.clone(),
            children: explain.children.iter().map(ExplainDto::from).collect(),
        }
    }
}

#[derive(Debug, Default)]
struct EngineState {
    facts: FactBase,
    rules: Vec<Rule>,
}

impl EngineState {
    fn fire_once(&mut self) -> Vec<String> {
        // One pass over the rules in declaration order.  Facts asserted by a
        // rule are visible to the rules after it in the same pass.
        let EngineState { facts, rules } = self;
        let mut fired = vec![];
        for rule in rules.iter() {
            if facts.get(rule.then.name()) || !rule.condition_holds(facts) {
                continue;
            }
            info!("rule {} fired, asserting {}", rule.id, rule.then);
            facts.assert(rule.then.name());
            fired.push(rule.id.clone());
        }
        fired
    }

    fn run_passes(&mut self, max_passes: usize) -> Vec<String> {
        let mut history = vec![];
        for pass in 1..=max_passes.max(1) {
            let fired = self.fire_once();
            debug!("pass {pass} fired {fired:?}");
            if fired.is_empty() {
                break;
            }
            history.extend(fired);
        }
        history
    }

    fn explain(&self, formula: &Formula, visited: &mut BTreeSet<String>) -> Explain {
        let formula = formula.ungroup();
        let value = formula.eval(self.facts.valuation());
        let children = match formula {
            Formula::Atom(p) => return self.explain_atom(p, value, visited),
            Formula::True | Formula::False => vec![],
            Formula::Not(p) => vec![self.explain(p, visited)],
            Formula::And(p, q) | Formula::Or(p, q) | Formula::Imp(p, q) | Formula::Iff(p, q) => {
                vec![self.explain(p, visited), self.explain(q, visited)]
            }
            Formula::Group(p) => vec![self.explain(p, visited)],
        };
        Explain {
            label: formula.to_string(),
            value,
            why: None,
            children,
        }
    }

    fn explain_atom(&self, atom: &Prop, value: bool, visited: &mut BTreeSet<String>) -> Explain {
        let label = String::from(atom.name());
        if !visited.insert(label.clone()) {
            return Explain::leaf(label, value, "explained above");
        }
        let concluding: Vec<&Rule> = self.rules.iter().filter(|rule| rule.then == *atom).collect();
        let firing = concluding
            .iter()
            .find(|rule| rule.condition_holds(&self.facts));
        let rule = match (firing, concluding.first()) {
            (Some(rule), _) => *rule,
            // True without a rule that currently holds: it was asserted.
            _ if value => return Explain::leaf(label, value, "asserted"),
            (None, Some(rule)) => *rule,
            (None, None) => return Explain::leaf(label, value, "not asserted"),
        };
        let rule_node = Explain {
            label: rule.id.clone(),
            value: rule.condition_holds(&self.facts),
            why: Some(format!("{} => {}", rule.antecedent(), rule.then)),
            children: vec![self.explain(rule.antecedent(), visited)],
        };
        Explain {
            label,
            value,
            why: None,
            children: vec![rule_node],
        }
    }
}

#[derive(Debug, Default)]
pub struct Engine {
    state: Mutex<EngineState>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Engine {
        Engine {
            state: Mutex::new(EngineState::default()),
            config,
        }
    }

    pub fn from_rules(rules: Vec<Rule>, config: EngineConfig) -> Engine {
        Engine {
            state: Mutex::new(EngineState {
                facts: FactBase::new(),
                rules,
            }),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        // The state is plain data, so a panic elsewhere cannot leave it
        // half-updated in a way later calls care about.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_rule(&self, rule: Rule) {
        self.lock().rules.push(rule);
    }

    pub fn rules(&self) -> Vec<Rule> {
        self.lock().rules.clone()
    }

    pub fn facts(&self) -> FactBase {
        self.lock().facts.clone()
    }

    pub fn assert(&self, name: &str) {
        self.lock().facts.assert(name);
    }

    pub fn retract(&self, name: &str) {
        self.lock().facts.retract(name);
    }

    // Ids of the rules that fired, in firing order.
    pub fn fire_once(&self) -> Vec<String> {
        self.lock().fire_once()
    }

    pub fn run_to_fixpoint(&self, max_iters: i32) -> Vec<String> {
        // `max_iters <= 0` still runs one pass.
        let max_passes = usize::try_from(max_iters).unwrap_or(0);
        self.lock().run_passes(max_passes)
    }

    pub fn run(&self) -> Vec<String> {
        self.lock().run_passes(self.config.max_iterations)
    }

    pub fn query(&self, goal: &Formula) -> (bool, Explain) {
        let state = self.lock();
        let mut visited = BTreeSet::new();
        let explain = state.explain(goal, &mut visited);
        (explain.value, explain)
    }
}
