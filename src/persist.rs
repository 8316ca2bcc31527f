// JSON rule sets.
//
// Conditions are written in their simplified, fully bracketed text form.
// Loading parses (and so simplifies) them again, which reproduces the same
// tree, so saving a loaded rule set gives back the same bytes.

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::rules::Rule;
use crate::token::is_identifier;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub id: String,
    pub when: String,
    pub then: String,
}

impl TryFrom<&Rule> for RuleRecord {
    type Error = RuleError;

    // Refuses consequents that `load_rules` would not read back.
    fn try_from(rule: &Rule) -> Result<RuleRecord, RuleError> {
        let then = rule.then.name();
        if !is_identifier(then) {
            return Err(RuleError::InvalidConsequent(String::from(then)));
        }
        Ok(RuleRecord {
            id: rule.id.clone(),
            when: rule.when.simplify().to_string(),
            then: String::from(then),
        })
    }
}

impl RuleRecord {
    pub fn to_rule(&self) -> Result<Rule, RuleError> {
        Rule::parse(&self.id, &self.when, &self.then)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetDocument {
    pub version: u32,
    pub rules: Vec<RuleRecord>,
}

impl RuleSetDocument {
    pub fn from_rules(rules: &[Rule]) -> Result<RuleSetDocument, RuleError> {
        Ok(RuleSetDocument {
            version: FORMAT_VERSION,
            rules: rules.iter().map(RuleRecord::try_from).collect::<Result<_, _>>()?,
        })
    }

    pub fn to_rules(&self) -> Result<Vec<Rule>, RuleError> {
        if self.version != FORMAT_VERSION {
            return Err(RuleError::UnsupportedVersion(self.version));
        }
        self.rules.iter().map(RuleRecord::to_rule).collect()
    }
}

pub fn save_rules(rules: &[Rule]) -> Result<String, RuleError> {
    let document = RuleSetDocument::from_rules(rules)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn load_rules(input: &str) -> Result<Vec<Rule>, RuleError> {
    let document: RuleSetDocument = serde_json::from_str(input)?;
    document.to_rules()
}
