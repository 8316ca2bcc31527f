// Error types shared across the crate.

use thiserror::Error;

// Malformed formula text.  `offset` is a byte offset into the input and
// `column` is 1-based (counted in characters).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at column {column} (offset {offset}): {message}")]
pub struct ParseError {
    pub offset: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn at(input: &str, offset: usize, message: impl Into<String>) -> ParseError {
        let offset = offset.min(input.len());
        let column = input
            .get(..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset)
            + 1;
        ParseError {
            offset,
            column,
            message: message.into(),
        }
    }
}

// A node in clause position that is not a literal.  Only reachable when a
// formula skips normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CnfError {
    #[error("expected a literal inside a clause, found {0}")]
    NotALiteral(String),
    #[error("negation of non-atomic formula {0} inside a clause")]
    NegatedNonAtom(String),
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {id}: {source}")]
    Parse {
        id: String,
        #[source]
        source: ParseError,
    },
    #[error("invalid consequent name {0:?}")]
    InvalidConsequent(String),
    #[error("unsupported rule set version {0}")]
    UnsupportedVersion(u32),
    #[error("malformed rule set document: {0}")]
    Json(#[from] serde_json::Error),
}
