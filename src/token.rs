// ### Token constants and lexing library. ###

use std::sync::LazyLock;

use regex::Regex;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern"));

const KEYWORD_TRUE: &str = "TRUE";
const KEYWORD_FALSE: &str = "FALSE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    True,
    False,
    Not,
    And,
    Or,
    Imp,
    Iff,
    LParen,
    RParen,
    Illegal(String),
    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier {name:?}"),
            TokenKind::True => String::from("TRUE"),
            TokenKind::False => String::from("FALSE"),
            TokenKind::Not => String::from("'!'"),
            TokenKind::And => String::from("'&'"),
            TokenKind::Or => String::from("'|'"),
            TokenKind::Imp => String::from("'=>'"),
            TokenKind::Iff => String::from("'<=>'"),
            TokenKind::LParen => String::from("'('"),
            TokenKind::RParen => String::from("')'"),
            TokenKind::Illegal(text) => format!("illegal token {text:?}"),
            TokenKind::Eof => String::from("end of input"),
        }
    }
}

// A token together with the byte offset at which it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

pub fn is_identifier(name: &str) -> bool {
    // Names usable as variables: not starting with a digit, and not a keyword.
    IDENTIFIER.is_match(name) && name != KEYWORD_TRUE && name != KEYWORD_FALSE
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lexwhile(pred: fn(char) -> bool, input: &str) -> usize {
    // Byte length of the longest prefix of `input` whose chars satisfy `pred`.
    input
        .char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}

fn lex_one(input: &str, offset: usize) -> (TokenKind, usize) {
    // Read a single token off the front of `input[offset..]`, returning it with
    // its byte length.  `input[offset..]` is non-empty and starts with a
    // non-whitespace char.
    let rest = &input[offset..];
    let symbols: [(&str, TokenKind); 7] = [
        ("<=>", TokenKind::Iff),
        ("=>", TokenKind::Imp),
        ("!", TokenKind::Not),
        ("&", TokenKind::And),
        ("|", TokenKind::Or),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
    ];
    for (symbol, kind) in symbols {
        if rest.starts_with(symbol) {
            return (kind, symbol.len());
        }
    }

    let head = rest.chars().next().unwrap_or('\0');
    if is_ident_start(head) {
        let bound = lexwhile(is_ident_char, rest);
        let word = &rest[..bound];
        let kind = match word {
            KEYWORD_TRUE => TokenKind::True,
            KEYWORD_FALSE => TokenKind::False,
            _ => TokenKind::Ident(word.to_string()),
        };
        (kind, bound)
    } else {
        (TokenKind::Illegal(head.to_string()), head.len_utf8())
    }
}

pub fn lex(input: &str) -> Vec<Token> {
    // Tokenize all of `input`.  The result always ends with an `Eof` token;
    // unrecognized characters become `Illegal` tokens rather than errors so
    // that the parser can report them with a position.
    let mut tokens = Vec::new();
    let mut offset = 0;
    loop {
        offset += lexwhile(char::is_whitespace, &input[offset..]);
        if offset >= input.len() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                offset: input.len(),
            });
            return tokens;
        }
        let (kind, len) = lex_one(input, offset);
        tokens.push(Token { kind, offset });
        offset += len;
    }
}
