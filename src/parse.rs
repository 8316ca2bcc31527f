// Recursive-descent parsing of propositional formulas.
//
// Grammar, loosest binding first:
//   iff   := imp ("<=>" imp)*
//   imp   := or ("=>" or)*
//   or    := and ("|" and)*
//   and   := unary ("&" unary)*
//   unary := "!" unary | atom
//   atom  := IDENT | "TRUE" | "FALSE" | "(" iff ")"
// Every binary level folds to the left.

use std::cell::Cell;

use log::debug;

use crate::error::ParseError;
use crate::formula::Formula;
use crate::token::{lex, Token, TokenKind};

// Parsing functions below take the form of parsing a piece off the front of
// a token slice, returning the parsed piece and the remaining input.
pub type PartialParseResult<'a> = Result<(Formula, &'a [Token]), ParseError>;

type Subparser<'s, 'a> = fn(&Parser<'s>, &'a [Token]) -> PartialParseResult<'a>;
type Constructor = fn(&Formula, &Formula) -> Formula;

// Combined limit on open brackets and stacked negations.  Each level costs a
// handful of stack frames here and again in every recursive rewrite.
pub const MAX_NESTING_DEPTH: usize = 256;

struct Parser<'s> {
    // Kept for turning token offsets into columns.
    source: &'s str,
    depth: Cell<usize>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Parser<'s> {
        Parser {
            source,
            depth: Cell::new(0),
        }
    }

    fn error_at(&self, input: &[Token], message: String) -> ParseError {
        let offset = input.first().map_or(self.source.len(), |token| token.offset);
        ParseError::at(self.source, offset, message)
    }

    fn nested<'a>(
        &self,
        input: &'a [Token],
        subparser: Subparser<'s, 'a>,
        rest: &'a [Token],
    ) -> PartialParseResult<'a> {
        // Run `subparser` on `rest` one level deeper.  `input` starts with the
        // token that opened the level.
        if self.depth.get() >= MAX_NESTING_DEPTH {
            return Err(self.error_at(
                input,
                format!("formula nested more than {MAX_NESTING_DEPTH} levels deep"),
            ));
        }
        self.depth.set(self.depth.get() + 1);
        let result = subparser(self, rest);
        self.depth.set(self.depth.get() - 1);
        result
    }

    fn parse_left_infix<'a>(
        &self,
        op: TokenKind,
        op_constructor: Constructor,
        subparser: Subparser<'s, 'a>,
        input: &'a [Token],
    ) -> PartialParseResult<'a> {
        // Parser builder for left-associative infix operations: `a op b op c`
        // becomes `(a op b) op c`.
        let (mut ast, mut rest) = subparser(self, input)?;
        while let [head, tail @ ..] = rest {
            if head.kind != op {
                break;
            }
            let (rhs, newrest) = subparser(self, tail)?;
            ast = op_constructor(&ast, &rhs);
            rest = newrest;
        }
        Ok((ast, rest))
    }

    fn parse_iff<'a>(&self, input: &'a [Token]) -> PartialParseResult<'a> {
        self.parse_left_infix(TokenKind::Iff, Formula::iff, Self::parse_imp, input)
    }

    fn parse_imp<'a>(&self, input: &'a [Token]) -> PartialParseResult<'a> {
        self.parse_left_infix(TokenKind::Imp, Formula::imp, Self::parse_or, input)
    }

    fn parse_or<'a>(&self, input: &'a [Token]) -> PartialParseResult<'a> {
        self.parse_left_infix(TokenKind::Or, Formula::or, Self::parse_and, input)
    }

    fn parse_and<'a>(&self, input: &'a [Token]) -> PartialParseResult<'a> {
        self.parse_left_infix(TokenKind::And, Formula::and, Self::parse_unary, input)
    }

    fn parse_unary<'a>(&self, input: &'a [Token]) -> PartialParseResult<'a> {
        match input {
            [head, rest @ ..] if head.kind == TokenKind::Not => {
                let (inner, newrest) = self.nested(input, Self::parse_unary, rest)?;
                Ok((Formula::not(&inner), newrest))
            }
            _ => self.parse_atom(input),
        }
    }

    fn parse_atom<'a>(&self, input: &'a [Token]) -> PartialParseResult<'a> {
        match input {
            [head, rest @ ..] => match &head.kind {
                TokenKind::Ident(name) => Ok((Formula::atom(name), rest)),
                TokenKind::True => Ok((Formula::True, rest)),
                TokenKind::False => Ok((Formula::False, rest)),
                TokenKind::LParen => self.nested(input, Self::parse_bracketed, rest),
                other => Err(self.error_at(
                    input,
                    format!("unexpected {}, expected a formula", other.describe()),
                )),
            },
            [] => Err(self.error_at(input, String::from("unexpected end of input"))),
        }
    }

    fn parse_bracketed<'a>(&self, input: &'a [Token]) -> PartialParseResult<'a> {
        // To be called after an opening bracket has been read.  The bracketed
        // expression is kept as a `Group` node.
        let (ast, rest) = self.parse_iff(input)?;
        match rest {
            [head, tail @ ..] if head.kind == TokenKind::RParen => Ok((Formula::group(&ast), tail)),
            [head, ..] => Err(self.error_at(
                rest,
                format!("expected ')', found {}", head.kind.describe()),
            )),
            [] => Err(self.error_at(rest, String::from("expected ')', found end of input"))),
        }
    }
}

fn generic_parser(input: &str) -> Result<Formula, ParseError> {
    // Tokenize and parse a complete expression; anything left over other than
    // the end-of-input marker is an error.
    debug!("parsing formula {input:?}");
    let tokens = lex(input);
    let parser = Parser::new(input);
    let (expr, rest) = parser.parse_iff(&tokens)?;
    match rest {
        [Token {
            kind: TokenKind::Eof,
            ..
        }]
        | [] => Ok(expr),
        [head, ..] => Err(parser.error_at(
            rest,
            format!("unexpected trailing input starting with {}", head.kind.describe()),
        )),
    }
}

impl Formula {
    pub fn parse_raw(input: &str) -> Result<Formula, ParseError> {
        // Parse without simplifying; parenthesized sub-expressions come back
        // as `Formula::Group`.
        generic_parser(input)
    }

    pub fn parse(input: &str) -> Result<Formula, ParseError> {
        Ok(Formula::parse_raw(input)?.simplify())
    }

    pub fn must_parse(input: &str) -> Formula {
        // For rule definitions that are fixed at build time.  Never feed user
        // input through here.
        match Formula::parse(input) {
            Ok(formula) => formula,
            Err(err) => panic!("invalid built-in formula {input:?}: {err}"),
        }
    }
}
