//! 制約式の字句解析

use crate::ConstraintError;
use logos::Logos;
use std::ops::Range;

/// 制約言語トークン
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // whitespace
#[logos(skip r"--[^\n]*")] // line comments
pub enum Token<'a> {
    #[token("self")]
    SelfKw,

    #[token("not")]
    Not,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token("xor")]
    Xor,

    #[token("implies")]
    Implies,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident(&'a str),

    #[regex(r"[0-9]+")]
    Integer(&'a str),

    #[regex(r"'([^'\\]|\\.)*'")]
    StringLiteral(&'a str),

    #[token("->")]
    Arrow,

    #[token(".")]
    Dot,

    #[token("::")]
    PathSep,

    #[token(":")]
    Colon,

    #[token("|")]
    Bar,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("=")]
    Eq,

    #[token("<>")]
    Ne,

    #[token("<=")]
    Le,

    #[token(">=")]
    Ge,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,
}

/// Tokenizes `source`, failing on the first unrecognized character
pub fn tokenize(source: &str) -> Result<Vec<(Token<'_>, Range<usize>)>, ConstraintError> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(source).spanned() {
        match token {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(ConstraintError::Parse {
                    position: span.start,
                    message: format!("unexpected character '{}'", &source[span]),
                })
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("self.selfish and notice"),
            vec![Token::SelfKw, Token::Dot, Token::Ident("selfish"), Token::And, Token::Ident("notice")]
        );
    }

    #[test]
    fn test_multi_character_operators() {
        assert_eq!(
            kinds("a->b <> c <= d :: e"),
            vec![
                Token::Ident("a"),
                Token::Arrow,
                Token::Ident("b"),
                Token::Ne,
                Token::Ident("c"),
                Token::Le,
                Token::Ident("d"),
                Token::PathSep,
                Token::Ident("e"),
            ]
        );
    }

    #[test]
    fn test_comments_and_strings() {
        assert_eq!(
            kinds("name = 'it''s' -- trailing"),
            vec![Token::Ident("name"), Token::Eq, Token::StringLiteral("'it'"), Token::StringLiteral("'s'")]
        );
    }

    #[test]
    fn test_unknown_character_reports_position() {
        assert_eq!(
            tokenize("self.a # b"),
            Err(ConstraintError::Parse {
                position: 7,
                message: "unexpected character '#'".to_string(),
            })
        );
    }
}
