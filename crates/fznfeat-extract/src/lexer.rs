//! Logos-based lexer for FlatZinc source.
//!
//! Zero-copy: identifier and string tokens borrow slices of the source.
//! Whitespace and `%` line comments are skipped. The token set covers the
//! flattened grammar only; there are no operators beyond `..` and `::`.

use logos::Logos;
use std::ops::Range;

/// A token with its byte span.
pub type Spanned<'src> = (Token<'src>, Range<usize>);

fn int_lit(slice: &str) -> Option<i64> {
    slice.parse().ok()
}

/// Hex/octal integer literals (`0x1F`, `-0o17`).
fn radix_lit(slice: &str, radix: u32) -> Option<i64> {
    let (negative, digits) = match slice.strip_prefix('-') {
        Some(rest) => (true, &rest[2..]),
        None => (false, &slice[2..]),
    };
    let value = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -value } else { value })
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(test, derive(serde::Serialize))]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip(r"%[^\n]*", allow_greedy = true))]
pub enum Token<'src> {
    #[token("array")]
    Array,
    #[token("bool")]
    Bool,
    #[token("constraint")]
    Constraint,
    #[token("false")]
    False,
    #[token("float")]
    Float,
    #[token("int")]
    Int,
    #[token("maximize")]
    Maximize,
    #[token("minimize")]
    Minimize,
    #[token("of")]
    Of,
    #[token("predicate")]
    Predicate,
    #[token("satisfy")]
    Satisfy,
    #[token("set")]
    Set,
    #[token("solve")]
    Solve,
    #[token("true")]
    True,
    #[token("var")]
    Var,

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("=")]
    Equals,
    #[token("..")]
    DotDot,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|-?[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLit(f64),

    #[regex(r"-?[0-9]+", |lex| int_lit(lex.slice()))]
    #[regex(r"-?0x[0-9A-Fa-f]+", |lex| radix_lit(lex.slice(), 16))]
    #[regex(r"-?0o[0-7]+", |lex| radix_lit(lex.slice(), 8))]
    IntLit(i64),

    /// String literal without the surrounding quotes.
    #[regex(r#""[^"\n]*""#, |lex| { let s = lex.slice(); Some(&s[1..s.len() - 1]) })]
    StrLit(&'src str),

    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Ident(&'src str),
}

/// Tokenizes the whole source. Fails fast on the first unrecognised byte;
/// the extractor has no use for a partial token stream.
pub fn lex(src: &str) -> Result<Vec<Spanned<'_>>, Range<usize>> {
    let mut lexer = Token::lexer(src);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(lexer.span()),
        }
    }
    Ok(tokens)
}
