//! Top-level declaration parser.
//!
//! Reads `struct`, `enum` and `type` declarations at the top level of a file
//! and skips every other item. Struct bodies are parsed field by field so
//! that each field keeps its type, its serde attributes and the comment
//! block written directly above it.

use std::fmt;

use miette::SourceSpan;

use crate::{
    error::{Result, SourceContext},
    lexer::{Comment, CommentStyle, Token, TokenKind},
};

/// A type as written in a field or alias declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `a::b::Name<Args>`; only the last segment's generic arguments are kept.
    Path {
        segments: Vec<String>,
        args: Vec<TypeExpr>,
    },
    Ref(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// `[T]` and `[T; N]`.
    Array(Box<TypeExpr>),
    /// Function pointers, trait objects, raw pointers and the like.
    Opaque(String),
}

impl TypeExpr {
    /// Last path segment, if this is a path.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Path { segments, .. } => segments.last().map(String::as_str),
            _ => None,
        }
    }

    /// Generic arguments of a path.
    pub fn args(&self) -> &[TypeExpr] {
        match self {
            Self::Path { args, .. } => args,
            _ => &[],
        }
    }

    /// Shorthand for a single-segment path without arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Path {
            segments: vec![name.into()],
            args: Vec::new(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path { segments, args } => {
                write!(f, "{}", segments.join("::"))?;
                if !args.is_empty() {
                    let args: Vec<_> = args.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                Ok(())
            }
            Self::Ref(inner) => write!(f, "&{}", inner),
            Self::Tuple(items) => {
                let items: Vec<_> = items.iter().map(ToString::to_string).collect();
                write!(f, "({})", items.join(", "))
            }
            Self::Array(inner) => write!(f, "[{}]", inner),
            Self::Opaque(text) => f.write_str(text),
        }
    }
}

/// The serde attributes confdoc cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttrs {
    pub rename: Option<String>,
    pub rename_all: Option<String>,
    pub skip: bool,
    pub flatten: bool,
}

impl SerdeAttrs {
    fn merge(&mut self, other: SerdeAttrs) {
        if other.rename.is_some() {
            self.rename = other.rename;
        }
        if other.rename_all.is_some() {
            self.rename_all = other.rename_all;
        }
        self.skip |= other.skip;
        self.flatten |= other.flatten;
    }
}

/// A named field of a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub serde: SerdeAttrs,
    /// Comment block written directly above the field.
    pub comment: Option<String>,
    pub line: usize,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    Named,
    Tuple,
    Unit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub comment: Option<String>,
    pub serde: SerdeAttrs,
    pub kind: StructKind,
    pub fields: Vec<FieldDecl>,
}

impl StructDecl {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Struct(StructDecl),
    Alias { name: String, target: TypeExpr },
    Enum { name: String },
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Self::Struct(decl) => &decl.name,
            Self::Alias { name, .. } | Self::Enum { name } => name,
        }
    }

    pub fn as_struct(&self) -> Option<&StructDecl> {
        match self {
            Self::Struct(decl) => Some(decl),
            _ => None,
        }
    }
}

/// Verify that every bracket, brace and parenthesis is closed in order.
pub(crate) fn check_delimiters(tokens: &[Token], ctx: &SourceContext) -> Result<()> {
    let mut stack: Vec<&Token> = Vec::new();
    for token in tokens {
        let TokenKind::Punct(c) = token.kind else {
            continue;
        };
        match c {
            '(' | '[' | '{' => stack.push(token),
            ')' | ']' | '}' => match stack.pop() {
                Some(open) if open.kind == TokenKind::Punct(opening(c)) => {}
                Some(_) => {
                    return Err(
                        ctx.parse_error(format!("mismatched closing `{c}`"), Some(token.span()))
                    );
                }
                None => {
                    return Err(
                        ctx.parse_error(format!("unexpected closing `{c}`"), Some(token.span()))
                    );
                }
            },
            _ => {}
        }
    }
    match stack.pop() {
        Some(open) => Err(ctx.parse_error("unclosed delimiter", Some(open.span()))),
        None => Ok(()),
    }
}

fn opening(close: char) -> char {
    match close {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

/// Accumulates the comment block that documents the next declaration.
///
/// A block is a run of leading line comments on consecutive lines. Any gap
/// of one or more blank lines, a trailing comment or an inner doc comment
/// starts over. Attributes may sit between a block and its declaration.
#[derive(Debug, Default)]
struct DocCollector {
    lines: Vec<String>,
    anchor: usize,
}

impl DocCollector {
    fn comment(&mut self, line: usize, comment: &Comment) {
        if !comment.leading || comment.style == CommentStyle::InnerDoc {
            self.lines.clear();
            return;
        }
        self.touch(line);
        self.lines.push(comment.text.clone());
        self.anchor = line;
    }

    fn attribute(&mut self, start: usize, end: usize) {
        self.touch(start);
        self.anchor = end;
    }

    fn touch(&mut self, line: usize) {
        if line > self.anchor + 1 {
            self.lines.clear();
        }
    }

    fn take_for(&mut self, line: usize) -> Option<String> {
        self.touch(line);
        if self.lines.is_empty() {
            return None;
        }
        let text = self.lines.join("\n");
        self.lines.clear();
        Some(text)
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

pub(crate) struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    ctx: &'a SourceContext,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token], ctx: &'a SourceContext) -> Self {
        Self {
            tokens,
            pos: 0,
            ctx,
        }
    }

    // ------------------------------------------------------------------
    // Cursor helpers. `peek`/`bump` skip comments, `raw` does not.
    // ------------------------------------------------------------------

    fn raw(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, n: usize) -> Option<&'a Token> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| t.comment().is_none())
            .nth(n)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.peek_at(0)
    }

    fn peek_punct(&self, c: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(c))
    }

    fn bump(&mut self) -> Option<&'a Token> {
        while let Some(token) = self.tokens.get(self.pos) {
            self.pos += 1;
            if token.comment().is_none() {
                return Some(token);
            }
        }
        None
    }

    fn next_token(&mut self, expected: &str) -> Result<&'a Token> {
        match self.bump() {
            Some(token) => Ok(token),
            None => Err(self.eof_error(expected)),
        }
    }

    fn eof_error(&self, expected: &str) -> Box<crate::Error> {
        let end = self.ctx.src().len();
        self.ctx
            .parse_error(format!("expected {expected}, found end of input"), Some((end, 0).into()))
    }

    fn unexpected(&self, token: &Token, expected: &str) -> Box<crate::Error> {
        self.ctx
            .parse_error(format!("expected {expected}"), Some(token.span()))
    }

    fn expect_punct(&mut self, c: char) -> Result<&'a Token> {
        let token = self.next_token(&format!("`{c}`"))?;
        if token.is_punct(c) {
            Ok(token)
        } else {
            Err(self.unexpected(token, &format!("`{c}`")))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<&'a Token> {
        let token = self.next_token(expected)?;
        match token.kind {
            TokenKind::Ident(_) => Ok(token),
            _ => Err(self.unexpected(token, expected)),
        }
    }

    /// Skip a balanced group starting at the current opening delimiter.
    fn skip_group(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let token = self.next_token("closing delimiter")?;
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    fn skip_arrow(&mut self) -> bool {
        let is_arrow = self.peek_punct('-') && self.peek_at(1).is_some_and(|t| t.is_punct('>'));
        if is_arrow {
            self.bump();
            self.bump();
        }
        is_arrow
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    pub(crate) fn parse_items(&mut self) -> Result<Vec<Decl>> {
        let mut decls = Vec::new();
        let mut docs = DocCollector::default();
        let mut serde = SerdeAttrs::default();

        while let Some(token) = self.raw() {
            if let Some(comment) = token.comment() {
                docs.comment(token.line, comment);
                self.pos += 1;
                continue;
            }
            if token.is_punct('#') {
                let (attrs, end_line) = self.attribute()?;
                docs.attribute(token.line, end_line);
                serde.merge(attrs);
                continue;
            }

            let comment = docs.take_for(token.line);
            let attrs = std::mem::take(&mut serde);
            self.visibility()?;

            let keyword = self.peek().and_then(Token::ident).unwrap_or_default();
            match keyword {
                "struct" => {
                    self.bump();
                    decls.push(Decl::Struct(self.parse_struct(comment, attrs)?));
                }
                "enum" | "union" => {
                    self.bump();
                    let name = self.expect_ident("type name")?;
                    decls.push(Decl::Enum {
                        name: ident_text(name),
                    });
                    self.skip_item()?;
                }
                "type" => {
                    self.bump();
                    decls.push(self.parse_alias()?);
                }
                _ => self.skip_item()?,
            }
            docs.clear();
        }
        Ok(decls)
    }

    fn visibility(&mut self) -> Result<()> {
        if self.peek().is_some_and(|t| t.is_ident("pub")) {
            self.bump();
            if self.peek_punct('(') {
                self.skip_group()?;
            }
        }
        Ok(())
    }

    /// Skip an item this parser does not model (fn, impl, use, const...).
    fn skip_item(&mut self) -> Result<()> {
        let mut depth = 0usize;
        while let Some(token) = self.bump() {
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']') => depth = depth.saturating_sub(1),
                TokenKind::Punct('}') => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        if self.peek_punct(';') {
                            self.bump();
                        }
                        return Ok(());
                    }
                }
                TokenKind::Punct(';') if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.eof_error("`;` or `}`"))
    }

    fn parse_alias(&mut self) -> Result<Decl> {
        let name = ident_text(self.expect_ident("type name")?);
        self.skip_generics()?;
        self.expect_punct('=')?;
        let target = self.parse_type()?;
        self.expect_punct(';')?;
        Ok(Decl::Alias { name, target })
    }

    fn skip_generics(&mut self) -> Result<()> {
        if !self.peek_punct('<') {
            return Ok(());
        }
        let mut depth = 0usize;
        loop {
            if self.skip_arrow() {
                continue;
            }
            let token = self.next_token("`>`")?;
            if token.is_punct('<') {
                depth += 1;
            } else if token.is_punct('>') {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
    }

    fn skip_where_clause(&mut self) -> Result<()> {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Punct('{' | ';') => return Ok(()),
                TokenKind::Punct('(' | '[') => self.skip_group()?,
                _ => {
                    self.bump();
                }
            }
        }
        Err(self.eof_error("struct body"))
    }

    fn parse_struct(&mut self, comment: Option<String>, serde: SerdeAttrs) -> Result<StructDecl> {
        let name = ident_text(self.expect_ident("struct name")?);
        self.skip_generics()?;

        let mut decl = StructDecl {
            name,
            comment,
            serde,
            kind: StructKind::Named,
            fields: Vec::new(),
        };

        if self.peek_punct('(') {
            self.skip_group()?;
            self.skip_where_clause()?;
            self.expect_punct(';')?;
            decl.kind = StructKind::Tuple;
            return Ok(decl);
        }
        self.skip_where_clause()?;
        if self.peek_punct(';') {
            self.bump();
            decl.kind = StructKind::Unit;
            return Ok(decl);
        }

        self.expect_punct('{')?;
        decl.fields = self.parse_fields()?;
        Ok(decl)
    }

    fn parse_fields(&mut self) -> Result<Vec<FieldDecl>> {
        let mut fields: Vec<FieldDecl> = Vec::new();
        let mut docs = DocCollector::default();
        let mut serde = SerdeAttrs::default();

        loop {
            let Some(token) = self.raw() else {
                return Err(self.eof_error("`}`"));
            };
            if let Some(comment) = token.comment() {
                docs.comment(token.line, comment);
                self.pos += 1;
                continue;
            }
            if token.is_punct('}') {
                self.pos += 1;
                return Ok(fields);
            }
            if token.is_punct('#') {
                let (attrs, end_line) = self.attribute()?;
                docs.attribute(token.line, end_line);
                serde.merge(attrs);
                continue;
            }

            let line = token.line;
            // Fields sharing a declaration line share its comment block.
            let comment = match fields.last() {
                Some(prev) if prev.line == line => {
                    docs.clear();
                    prev.comment.clone()
                }
                _ => docs.take_for(line),
            };

            self.visibility()?;
            let name_token = self.expect_ident("field name")?;
            self.expect_punct(':')?;
            let ty = self.parse_type()?;

            match self.peek() {
                Some(t) if t.is_punct(',') => {
                    self.bump();
                }
                Some(t) if t.is_punct('}') => {}
                Some(t) => return Err(self.unexpected(t, "`,` or `}` after field type")),
                None => return Err(self.eof_error("`}`")),
            }

            fields.push(FieldDecl {
                name: ident_text(name_token),
                ty,
                serde: std::mem::take(&mut serde),
                comment,
                line,
                span: name_token.span(),
            });
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Parse `#[...]` or `#![...]`, returning its serde settings and end line.
    fn attribute(&mut self) -> Result<(SerdeAttrs, usize)> {
        self.expect_punct('#')?;
        if self.peek_punct('!') {
            self.bump();
        }
        self.expect_punct('[')?;

        let mut inner = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.next_token("`]`")?;
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(']') if depth == 0 => {
                    return Ok((parse_serde(&inner), token.end_line));
                }
                TokenKind::Punct(')' | ']' | '}') => depth -= 1,
                _ => {}
            }
            inner.push(token);
        }
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr> {
        let token = self.next_token("a type")?;
        match &token.kind {
            TokenKind::Punct('&') => {
                if self.peek().is_some_and(|t| t.kind == TokenKind::Lifetime) {
                    self.bump();
                }
                if self.peek().is_some_and(|t| t.is_ident("mut")) {
                    self.bump();
                }
                Ok(TypeExpr::Ref(Box::new(self.parse_type()?)))
            }
            TokenKind::Punct('(') => {
                let mut items = Vec::new();
                loop {
                    if self.peek_punct(')') {
                        self.bump();
                        return Ok(TypeExpr::Tuple(items));
                    }
                    items.push(self.parse_type()?);
                    if self.peek_punct(',') {
                        self.bump();
                    } else if !self.peek_punct(')') {
                        let next = self.next_token("`)`")?;
                        return Err(self.unexpected(next, "`,` or `)`"));
                    }
                }
            }
            TokenKind::Punct('[') => {
                let inner = self.parse_type()?;
                if self.peek_punct(';') {
                    while !self.peek_punct(']') {
                        if self.peek().is_some_and(|t| t.is_punct('{') || t.is_punct('(')) {
                            self.skip_group()?;
                        } else {
                            self.next_token("`]`")?;
                        }
                    }
                }
                self.expect_punct(']')?;
                Ok(TypeExpr::Array(Box::new(inner)))
            }
            TokenKind::Punct('*') => {
                self.expect_ident("`const` or `mut`")?;
                let inner = self.parse_type()?;
                Ok(TypeExpr::Opaque(format!("*{inner}")))
            }
            TokenKind::Punct('!') => Ok(TypeExpr::Opaque("!".to_string())),
            TokenKind::Punct('<') => {
                self.pos -= 1;
                self.skip_generics()?;
                while self.peek_punct(':') {
                    self.bump();
                    self.expect_punct(':')?;
                    self.expect_ident("path segment")?;
                }
                Ok(TypeExpr::Opaque("<qualified path>".to_string()))
            }
            TokenKind::Punct(':') => {
                self.expect_punct(':')?;
                let first = self.expect_ident("path segment")?;
                self.parse_path(ident_text(first))
            }
            TokenKind::Ident(word) if word == "dyn" || word == "impl" => {
                self.skip_bounds();
                Ok(TypeExpr::Opaque(word.clone()))
            }
            TokenKind::Ident(word) if matches!(word.as_str(), "fn" | "unsafe" | "extern") => {
                self.parse_fn_pointer(word == "fn")
            }
            TokenKind::Ident(_) => self.parse_path(ident_text(token)),
            _ => Err(self.unexpected(token, "a type")),
        }
    }

    fn parse_path(&mut self, first: String) -> Result<TypeExpr> {
        let mut segments = vec![first];
        let mut args = Vec::new();
        loop {
            if self.peek_punct('<') {
                self.bump();
                args = self.generic_args()?;
            }
            let is_separator =
                self.peek_punct(':') && self.peek_at(1).is_some_and(|t| t.is_punct(':'));
            if !is_separator {
                break;
            }
            self.bump();
            self.bump();
            if self.peek_punct('<') {
                continue;
            }
            let segment = self.expect_ident("path segment")?;
            segments.push(ident_text(segment));
            args = Vec::new();
        }
        Ok(TypeExpr::Path { segments, args })
    }

    /// Parse generic arguments after the opening `<`, consuming the closing `>`.
    fn generic_args(&mut self) -> Result<Vec<TypeExpr>> {
        let mut args = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(self.eof_error("`>`"));
            };
            if token.is_punct('>') {
                self.bump();
                return Ok(args);
            }

            let binding = token.ident().is_some()
                && self.peek_at(1).is_some_and(|t| t.is_punct('='))
                && !self.peek_at(2).is_some_and(|t| t.is_punct('='));
            match &token.kind {
                TokenKind::Lifetime | TokenKind::Literal => {
                    self.bump();
                }
                TokenKind::Punct('{') => self.skip_group()?,
                _ if binding => {
                    self.bump();
                    self.bump();
                    self.parse_type()?;
                }
                _ => args.push(self.parse_type()?),
            }

            if self.peek_punct(',') {
                self.bump();
            } else if !self.peek_punct('>') {
                let next = self.next_token("`>`")?;
                return Err(self.unexpected(next, "`,` or `>`"));
            }
        }
    }

    fn skip_bounds(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if self.skip_arrow() {
                continue;
            }
            match token.kind {
                TokenKind::Punct('<' | '(' | '[') => depth += 1,
                TokenKind::Punct('>' | ')' | ']') if depth > 0 => depth -= 1,
                TokenKind::Punct(',' | '>' | ')' | ']' | '}' | ';' | '=') => return,
                _ => {}
            }
            self.bump();
        }
    }

    fn parse_fn_pointer(&mut self, seen_fn: bool) -> Result<TypeExpr> {
        if !seen_fn {
            loop {
                let token = self.next_token("`fn`")?;
                if token.is_ident("fn") {
                    break;
                }
            }
        }
        if !self.peek_punct('(') {
            let next = self.next_token("`(`")?;
            return Err(self.unexpected(next, "`(`"));
        }
        self.skip_group()?;
        if self.skip_arrow() {
            self.parse_type()?;
        }
        Ok(TypeExpr::Opaque("fn".to_string()))
    }
}

fn ident_text(token: &Token) -> String {
    let ident = token.ident().unwrap_or_default();
    ident.strip_prefix("r#").unwrap_or(ident).to_string()
}

/// Extract serde settings from the tokens inside `#[...]`.
fn parse_serde(tokens: &[&Token]) -> SerdeAttrs {
    let mut attrs = SerdeAttrs::default();
    let is_serde = tokens.first().is_some_and(|t| t.is_ident("serde"))
        && tokens.get(1).is_some_and(|t| t.is_punct('('));
    if !is_serde {
        return attrs;
    }

    for item in split_top_level(&tokens[2..tokens.len().saturating_sub(1)]) {
        let Some(key) = item.first().and_then(|t| t.ident()) else {
            continue;
        };
        match key {
            "skip" | "skip_serializing" => attrs.skip = true,
            "flatten" => attrs.flatten = true,
            "rename" => attrs.rename = rename_value(item),
            "rename_all" => attrs.rename_all = rename_value(item),
            _ => {}
        }
    }
    attrs
}

/// `rename = "x"` or `rename(serialize = "x", deserialize = "y")`.
fn rename_value(item: &[&Token]) -> Option<String> {
    match item {
        [_, eq, value, ..] if eq.is_punct('=') => str_value(value),
        [_, open, rest @ ..] if open.is_punct('(') => rest
            .windows(3)
            .find(|w| w[0].is_ident("serialize") && w[1].is_punct('='))
            .and_then(|w| str_value(w[2])),
        _ => None,
    }
}

fn str_value(token: &Token) -> Option<String> {
    match &token.kind {
        TokenKind::Str(value) => Some(value.clone()),
        _ => None,
    }
}

fn split_top_level<'t>(tokens: &'t [&'t Token]) -> Vec<&'t [&'t Token]> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Punct('(' | '[' | '{') => depth += 1,
            TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
            TokenKind::Punct(',') if depth == 0 => {
                items.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < tokens.len() {
        items.push(&tokens[start..]);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(src: &str) -> Vec<Decl> {
        let ctx = SourceContext::new(src, "test.rs");
        let tokens = tokenize(src).unwrap();
        check_delimiters(&tokens, &ctx).unwrap();
        Parser::new(&tokens, &ctx).parse_items().unwrap()
    }

    fn parse_err(src: &str) -> String {
        let ctx = SourceContext::new(src, "test.rs");
        let tokens = tokenize(src).unwrap();
        let result = check_delimiters(&tokens, &ctx)
            .and_then(|_| Parser::new(&tokens, &ctx).parse_items());
        match result {
            Ok(_) => panic!("expected a parse error"),
            Err(err) => err.to_string(),
        }
    }

    fn ty(src: &str) -> TypeExpr {
        let ctx = SourceContext::new(src, "test.rs");
        let tokens = tokenize(src).unwrap();
        Parser::new(&tokens, &ctx).parse_type().unwrap()
    }

    #[test]
    fn test_parse_type_paths() {
        assert_eq!(ty("u8").to_string(), "u8");
        assert_eq!(ty("Option<Box<B>>").to_string(), "Option<Box<B>>");
        assert_eq!(
            ty("std::collections::HashMap<String, Vec<u8>>").to_string(),
            "std::collections::HashMap<String, Vec<u8>>"
        );
        assert_eq!(ty("HashMap<String, Vec<u8>>").args().len(), 2);
        assert_eq!(ty("::core::option::Option<u8>").name(), Some("Option"));
    }

    #[test]
    fn test_parse_type_other_forms() {
        assert_eq!(ty("&'static str").to_string(), "&str");
        assert_eq!(ty("(u8, String)").to_string(), "(u8, String)");
        assert_eq!(ty("[u8; 32]").to_string(), "[u8]");
        assert_eq!(ty("Box<dyn Fn(u8) -> u8 + Send>").to_string(), "Box<dyn>");
        assert_eq!(ty("fn(u8) -> bool").to_string(), "fn");
        assert_eq!(ty("Cow<'a, str>").to_string(), "Cow<str>");
    }

    #[test]
    fn test_parse_struct_fields_and_attrs() {
        let decls = parse(
            r#"
use serde::Serialize;

/// Root config.
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config<'a> where 'a: 'static {
    #[serde(rename = "x1")]
    pub(crate) x1: i64,
    #[serde(default, skip_serializing)]
    cache: HashMap<String, Entry>,
    #[serde(flatten)]
    extra: Extra,
    #[serde(rename(serialize = "out", deserialize = "in"))]
    r#type: &'a str
}
"#,
        );
        assert_eq!(decls.len(), 1);
        let Decl::Struct(config) = &decls[0] else {
            panic!("expected a struct");
        };
        assert_eq!(config.name, "Config");
        assert_eq!(config.comment.as_deref(), Some("Root config."));
        assert_eq!(config.serde.rename_all.as_deref(), Some("kebab-case"));

        let names: Vec<_> = config.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x1", "cache", "extra", "type"]);
        assert_eq!(config.fields[0].serde.rename.as_deref(), Some("x1"));
        assert!(config.fields[1].serde.skip);
        assert!(config.fields[2].serde.flatten);
        assert_eq!(config.fields[3].serde.rename.as_deref(), Some("out"));
    }

    #[test]
    fn test_parse_other_items_are_skipped() {
        let decls = parse(
            r#"
mod inner {
    pub struct Hidden { a: u8 }
}
impl Config {
    fn new() -> Self { Self { a: 1 } }
}
const DEFAULTS: Config = Config { a: 1 };
macro_rules! noop { () => {} }
pub enum Mode { Fast, Slow { factor: u8 } }
pub type Alias = Option<Config>;
pub struct Config { a: u8 }
pub struct Unit;
pub struct Pair(u8, u8);
"#,
        );
        let names: Vec<_> = decls.iter().map(Decl::name).collect();
        assert_eq!(names, vec!["Mode", "Alias", "Config", "Unit", "Pair"]);
        assert!(matches!(
            &decls[1],
            Decl::Alias { target, .. } if target.to_string() == "Option<Config>"
        ));
        assert_eq!(decls[3].as_struct().map(|s| s.kind), Some(StructKind::Unit));
        assert_eq!(decls[4].as_struct().map(|s| s.kind), Some(StructKind::Tuple));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_err("struct A { a: u8 ").contains("unclosed delimiter"));
        assert!(parse_err("struct A { a: u8 )").contains("mismatched closing `)`"));
        assert!(parse_err("struct A { a u8 }").contains("expected `:`"));
        assert!(parse_err("struct A { a: u8 b: u8 }").contains("`,` or `}` after field type"));
        assert!(parse_err("struct A { 5: u8 }").contains("expected field name"));
        assert!(parse_err("type A = ;").contains("expected a type"));
    }

    #[test]
    fn test_truncated_trailing_item_is_an_error() {
        let expected = "expected `;` or `}`, found end of input";
        assert!(parse_err("struct A { a: u8 }\nimpl A").contains(expected));
        assert!(parse_err("struct A { a: u8 }\nthis is not rust at all").contains(expected));
        assert!(parse_err("struct A { a: u8 }\nfn f() -> ").contains(expected));
        assert!(parse_err("enum E").contains(expected));
    }
}
