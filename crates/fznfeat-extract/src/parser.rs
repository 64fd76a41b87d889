//! Recursive-descent parser for FlatZinc, driving the extraction engine.
//!
//! There is no syntax tree: each parsed item is translated directly into
//! one engine event, in model order. Parameters never reach the engine;
//! they are folded into a parser-local environment so that a parameter
//! reference in an argument or bound position becomes its literal value.
//!
//! # Grammar (the subset the extractor consumes)
//!
//! ```text
//! model      = item* ; exactly one solve item
//! item       = predicate | par_decl | var_decl | array_decl
//!            | constraint | solve
//! predicate  = "predicate" ... ";"            (skipped)
//! par_decl   = par_type ":" ident "=" expr ";"
//! var_decl   = "var" domain ":" ident anns ("=" expr)? ";"
//! array_decl = "array" "[" int ".." int "]" "of"
//!              ( "var" domain | par_type ) ":" ident anns ("=" expr)? ";"
//! constraint = "constraint" ident "(" expr,* ")" anns ";"
//! solve      = "solve" anns ("satisfy" | "minimize" expr | "maximize" expr) ";"
//! anns       = ("::" (ident | ident "(" expr,* ")"))*
//! domain     = "bool" | "int" | "float" | int ".." int | float ".." float
//!            | "{" int,* "}" | "set" "of" inner_domain
//! ```

use std::ops::Range;

use fznfeat_core::Expr;
use indexmap::IndexMap;
use tracing::warn;

use crate::engine::{ArrayDecl, FeatureExtractor, SolveGoal, VarDecl, VarKind};
use crate::lexer::{Spanned, Token, lex};

/// Int ranges in expression position materialise into a set up to this
/// cardinality; larger ranges keep only their endpoints. The engine never
/// inspects set contents, this only bounds memory on pathological models.
const RANGE_MATERIALISE_CAP: i64 = 1024;

/// A parse failure with the byte offset it occurred at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at byte {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        ParseError { offset, message: message.into() }
    }
}

/// Parses `src` and replays it into `engine`, leaving it ready for
/// `finalise`. The engine is left in an unspecified partial state on error.
pub fn extract_model(src: &str, engine: &mut FeatureExtractor) -> std::result::Result<(), ParseError> {
    let tokens = lex(src)
        .map_err(|span| ParseError::new(span.start, "unrecognised token"))?;
    Parser {
        tokens,
        pos: 0,
        src_len: src.len(),
        engine,
        params: IndexMap::new(),
        solved: false,
    }
    .model()
}

struct Parser<'src, 'e> {
    tokens: Vec<Spanned<'src>>,
    pos: usize,
    src_len: usize,
    engine: &'e mut FeatureExtractor,
    /// Parameter environment for constant folding.
    params: IndexMap<String, Expr>,
    solved: bool,
}

type Result<T> = std::result::Result<T, ParseError>;

impl<'src> Parser<'src, '_> {
    fn model(mut self) -> Result<()> {
        while let Some(token) = self.peek() {
            match token {
                Token::Predicate => self.skip_item()?,
                Token::Var => self.var_decl()?,
                Token::Array => self.array_decl()?,
                Token::Bool | Token::Int | Token::Float | Token::Set => self.par_decl()?,
                Token::Constraint => self.constraint_item()?,
                Token::Solve => self.solve_item()?,
                _ => return Err(self.unexpected("item")),
            }
        }
        if !self.solved {
            return Err(ParseError::new(self.src_len, "missing solve item"));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Skips an item the extractor has no use for (predicates).
    fn skip_item(&mut self) -> Result<()> {
        loop {
            match self.bump() {
                Some((Token::Semi, _)) => return Ok(()),
                Some(_) => {}
                None => return Err(self.unexpected("';'")),
            }
        }
    }

    /// `int: n = 5;` and friends. The value lands in the parameter
    /// environment, nothing is sent to the engine.
    fn par_decl(&mut self) -> Result<()> {
        self.par_type()?;
        self.expect(Token::Colon)?;
        let name = self.ident()?;
        self.expect(Token::Equals)?;
        let value = self.expr()?;
        self.expect(Token::Semi)?;
        self.params.insert(name, value);
        Ok(())
    }

    /// The type part of a parameter declaration.
    fn par_type(&mut self) -> Result<()> {
        match self.bump() {
            Some((Token::Bool | Token::Int | Token::Float, _)) => Ok(()),
            Some((Token::Set, _)) => {
                self.expect(Token::Of)?;
                self.expect(Token::Int)?;
                Ok(())
            }
            _ => Err(self.unexpected("parameter type")),
        }
    }

    /// `var <domain> : <ident> anns (= expr)? ;`
    fn var_decl(&mut self) -> Result<()> {
        self.expect(Token::Var)?;
        let (kind, dom_size) = self.domain()?;
        self.expect(Token::Colon)?;
        let name = self.ident()?;
        let anns = self.annotations()?;
        let decl = VarDecl { name, kind, dom_size, anns };
        if self.eat(Token::Equals) {
            let rhs = self.expr()?;
            self.expect(Token::Semi)?;
            self.engine.update_assigned_variable(decl, &rhs);
        } else {
            self.expect(Token::Semi)?;
            self.engine.update_variable(decl);
        }
        Ok(())
    }

    /// `array [l..u] of (var <domain> | par_type) : <ident> anns (= expr)? ;`
    fn array_decl(&mut self) -> Result<()> {
        self.expect(Token::Array)?;
        self.expect(Token::BracketOpen)?;
        let begin = self.int_value()?;
        self.expect(Token::DotDot)?;
        let end = self.int_value()?;
        self.expect(Token::BracketClose)?;
        self.expect(Token::Of)?;

        if !self.eat(Token::Var) {
            // A parameter array.
            self.par_type()?;
            self.expect(Token::Colon)?;
            let name = self.ident()?;
            self.expect(Token::Equals)?;
            let value = self.expr()?;
            self.expect(Token::Semi)?;
            self.params.insert(name, value);
            return Ok(());
        }

        let (kind, dom_size) = self.domain()?;
        self.expect(Token::Colon)?;
        let name = self.ident()?;
        let anns = self.annotations()?;
        let decl = ArrayDecl { name, kind, dom_size, begin, end, anns };
        if self.eat(Token::Equals) {
            let rhs = self.expr()?;
            self.expect(Token::Semi)?;
            match rhs {
                Expr::Array(elements) => {
                    self.engine.update_assigned_var_array(decl, &elements);
                }
                _ => {
                    warn!(array = %decl.name, "array assignment is not a literal, ignored");
                    self.engine.update_var_array(decl);
                }
            }
        } else {
            self.expect(Token::Semi)?;
            self.engine.update_var_array(decl);
        }
        Ok(())
    }

    /// `constraint name(arg, ...) anns ;`
    fn constraint_item(&mut self) -> Result<()> {
        self.expect(Token::Constraint)?;
        let name = self.ident()?;
        self.expect(Token::ParenOpen)?;
        let mut params = vec![Expr::Str(name)];
        params.extend(self.expr_list(Token::ParenClose)?);
        let anns = self.annotations()?;
        self.expect(Token::Semi)?;
        self.engine.update_constraint(params, &anns);
        Ok(())
    }

    /// `solve anns (satisfy | minimize expr | maximize expr) ;`
    fn solve_item(&mut self) -> Result<()> {
        let (_, span) = self.bump().expect("caller peeked Solve");
        if self.solved {
            return Err(ParseError::new(span.start, "duplicate solve item"));
        }
        self.solved = true;

        let anns = self.annotations()?;
        let (goal, objective) = match self.bump() {
            Some((Token::Satisfy, _)) => (SolveGoal::Satisfy, None),
            Some((Token::Minimize, _)) => (SolveGoal::Minimize, Some(self.expr()?)),
            Some((Token::Maximize, _)) => (SolveGoal::Maximize, Some(self.expr()?)),
            _ => return Err(self.unexpected("'satisfy', 'minimize' or 'maximize'")),
        };
        self.expect(Token::Semi)?;

        self.engine.set_solve_goal(goal);
        self.engine.update_solve(&anns);
        match objective {
            Some(Expr::Str(name)) => self.engine.set_objective_variable(&name),
            Some(_) => warn!("objective is not a variable reference, ignored"),
            None => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Domains
    // ------------------------------------------------------------------

    /// Parses a variable domain and computes its cardinality. Continuous
    /// (float) and unbounded domains count as infinite; set-variable
    /// domains are powersets, `2^|base|`.
    fn domain(&mut self) -> Result<(VarKind, f64)> {
        match self.peek() {
            Some(Token::Bool) => {
                self.bump();
                Ok((VarKind::Bool, 2.0))
            }
            Some(Token::Int) => {
                self.bump();
                Ok((VarKind::Int, f64::INFINITY))
            }
            Some(Token::Float) => {
                self.bump();
                Ok((VarKind::Float, f64::INFINITY))
            }
            Some(Token::IntLit(_)) => {
                let low = self.int_value()?;
                self.expect(Token::DotDot)?;
                let high = self.int_value()?;
                Ok((VarKind::Int, range_card(low, high)))
            }
            Some(Token::FloatLit(_)) => {
                self.bump();
                self.expect(Token::DotDot)?;
                match self.bump() {
                    Some((Token::FloatLit(_), _)) => Ok((VarKind::Float, f64::INFINITY)),
                    _ => Err(self.unexpected("float literal")),
                }
            }
            Some(Token::BraceOpen) => {
                let elements = self.int_set_literal()?;
                Ok((VarKind::Int, elements as f64))
            }
            Some(Token::Set) => {
                self.bump();
                self.expect(Token::Of)?;
                let base = match self.peek() {
                    Some(Token::Int) => {
                        self.bump();
                        f64::INFINITY
                    }
                    Some(Token::IntLit(_)) => {
                        let low = self.int_value()?;
                        self.expect(Token::DotDot)?;
                        let high = self.int_value()?;
                        range_card(low, high)
                    }
                    Some(Token::BraceOpen) => self.int_set_literal()? as f64,
                    _ => return Err(self.unexpected("set domain")),
                };
                Ok((VarKind::Set, if base.is_finite() { base.exp2() } else { f64::INFINITY }))
            }
            _ => Err(self.unexpected("domain")),
        }
    }

    /// `{ 1, 2, 5 }` in domain position; returns the cardinality.
    fn int_set_literal(&mut self) -> Result<usize> {
        self.expect(Token::BraceOpen)?;
        let mut count = 0;
        if !self.eat(Token::BraceClose) {
            loop {
                self.int_value()?;
                count += 1;
                if self.eat(Token::Comma) {
                    continue;
                }
                self.expect(Token::BraceClose)?;
                break;
            }
        }
        Ok(count)
    }

    /// An integer literal, or a parameter that folds to one.
    fn int_value(&mut self) -> Result<i64> {
        match self.bump() {
            Some((Token::IntLit(v), _)) => Ok(v),
            Some((Token::Ident(name), span)) => match self.params.get(name) {
                Some(Expr::Int(v)) => Ok(*v),
                _ => Err(ParseError::new(
                    span.start,
                    format!("`{name}` is not an integer parameter"),
                )),
            },
            _ => Err(self.unexpected("integer")),
        }
    }

    // ------------------------------------------------------------------
    // Expressions and annotations
    // ------------------------------------------------------------------

    fn annotations(&mut self) -> Result<Vec<Expr>> {
        let mut anns = Vec::new();
        while self.eat(Token::ColonColon) {
            anns.push(self.annotation()?);
        }
        Ok(anns)
    }

    /// `ident` or `ident(expr, ...)`; calls become arrays with the name in
    /// head position.
    fn annotation(&mut self) -> Result<Expr> {
        let name = self.ident()?;
        if !self.eat(Token::ParenOpen) {
            return Ok(Expr::Str(name));
        }
        let mut items = vec![Expr::Str(name)];
        items.extend(self.expr_list(Token::ParenClose)?);
        Ok(Expr::Array(items))
    }

    fn expr(&mut self) -> Result<Expr> {
        match self.bump() {
            Some((Token::True, _)) => Ok(Expr::Bool(true)),
            Some((Token::False, _)) => Ok(Expr::Bool(false)),
            Some((Token::IntLit(low), _)) => {
                if self.eat(Token::DotDot) {
                    match self.bump() {
                        Some((Token::IntLit(high), _)) => Ok(range_set(low, high)),
                        _ => Err(self.unexpected("integer")),
                    }
                } else {
                    Ok(Expr::Int(low))
                }
            }
            Some((Token::FloatLit(v), _)) => Ok(Expr::Float(v)),
            Some((Token::StrLit(s), _)) => Ok(Expr::Str(s.to_owned())),
            Some((Token::Ident(name), _)) => self.ident_expr(name),
            Some((Token::BracketOpen, _)) => {
                let items = self.expr_list(Token::BracketClose)?;
                Ok(Expr::Array(items))
            }
            Some((Token::BraceOpen, _)) => {
                let items = self.expr_list(Token::BraceClose)?;
                Ok(Expr::Set(items))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Identifier in expression position: annotation call, array access,
    /// parameter (folded), or plain variable reference.
    fn ident_expr(&mut self, name: &str) -> Result<Expr> {
        if self.eat(Token::BracketOpen) {
            let index = self.int_value()?;
            self.expect(Token::BracketClose)?;
            if let Some(Expr::Array(items)) = self.params.get(name) {
                let offset = index - 1; // parameter arrays are 1-based
                if let Some(item) = usize::try_from(offset).ok().and_then(|i| items.get(i)) {
                    return Ok(item.clone());
                }
            }
            return Ok(Expr::Str(format!("{name}[{index}]")));
        }
        if self.eat(Token::ParenOpen) {
            let mut items = vec![Expr::str(name)];
            items.extend(self.expr_list(Token::ParenClose)?);
            return Ok(Expr::Array(items));
        }
        match self.params.get(name) {
            Some(value) => Ok(value.clone()),
            None => Ok(Expr::str(name)),
        }
    }

    fn expr_list(&mut self, close: Token<'src>) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expr()?);
            if self.eat(Token::Comma) {
                continue;
            }
            self.expect(close)?;
            break;
        }
        Ok(items)
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn bump(&mut self) -> Option<(Token<'src>, Range<usize>)> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn eat(&mut self, token: Token<'src>) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, token: Token<'src>) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{token:?}")))
        }
    }

    fn ident(&mut self) -> Result<String> {
        match self.bump() {
            Some((Token::Ident(name), _)) => Ok(name.to_owned()),
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.src_len)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let found = match self.tokens.get(self.pos) {
            Some((token, _)) => format!("{token:?}"),
            None => "end of input".to_owned(),
        };
        ParseError::new(self.offset(), format!("expected {expected}, found {found}"))
    }
}

fn range_card(low: i64, high: i64) -> f64 {
    (high - low + 1).max(0) as f64
}

/// An int range in expression position, as a set value.
fn range_set(low: i64, high: i64) -> Expr {
    if high < low {
        return Expr::Set(Vec::new());
    }
    if high - low + 1 <= RANGE_MATERIALISE_CAP {
        Expr::Set((low..=high).map(Expr::Int).collect())
    } else {
        Expr::Set(vec![Expr::Int(low), Expr::Int(high)])
    }
}
