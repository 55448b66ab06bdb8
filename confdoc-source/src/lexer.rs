//! Tokenizer for the subset of Rust needed to read type declarations.
//!
//! Every token records the line it starts on. Line comments are kept as
//! tokens because field documentation is recovered from them; block
//! comments are dropped.

use miette::SourceSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Lifetime,
    /// A string literal, escapes decoded.
    Str(String),
    /// Numbers, chars and byte literals.
    Literal,
    Punct(char),
    Comment(Comment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `// text`
    Line,
    /// `/// text`
    OuterDoc,
    /// `//! text`
    InnerDoc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment body with the marker and one following space removed.
    pub text: String,
    pub style: CommentStyle,
    /// True when nothing but whitespace precedes the comment on its line.
    pub leading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub len: usize,
    pub line: usize,
    pub end_line: usize,
}

impl Token {
    pub fn span(&self) -> SourceSpan {
        (self.offset, self.len).into()
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(ident) if ident == name)
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn comment(&self) -> Option<&Comment> {
        match &self.kind {
            TokenKind::Comment(comment) => Some(comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub offset: usize,
    pub len: usize,
}

impl LexError {
    fn new(message: impl Into<String>, offset: usize, len: usize) -> Self {
        Self {
            message: message.into(),
            offset,
            len,
        }
    }
}

/// Split Rust source into tokens.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    line_has_token: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            line_has_token: false,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_has_token = false;
        }
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            let line = self.line;

            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if self.rest().starts_with("//") {
                self.line_comment(start, line);
                continue;
            }
            if self.rest().starts_with("/*") {
                self.block_comment(start)?;
                continue;
            }

            let kind = if c == '"' {
                self.string(start)?
            } else if c == '\'' {
                self.quote(start)?
            } else if is_ident_start(c) {
                self.ident_or_prefixed(start)?
            } else if c.is_ascii_digit() {
                self.number();
                TokenKind::Literal
            } else {
                self.bump();
                TokenKind::Punct(c)
            };
            self.push(kind, start, line);
        }
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.tokens.push(Token {
            kind,
            offset: start,
            len: self.pos - start,
            line,
            end_line: self.line,
        });
        self.line_has_token = true;
    }

    fn line_comment(&mut self, start: usize, line: usize) {
        let leading = !self.line_has_token;
        let end = self
            .rest()
            .find('\n')
            .map_or(self.src.len(), |i| self.pos + i);
        let raw = &self.src[self.pos..end];
        self.pos = end;

        let (style, body) = if raw.starts_with("///") && !raw.starts_with("////") {
            (CommentStyle::OuterDoc, &raw[3..])
        } else if let Some(body) = raw.strip_prefix("//!") {
            (CommentStyle::InnerDoc, body)
        } else {
            (CommentStyle::Line, &raw[2..])
        };
        let body = body.strip_suffix('\r').unwrap_or(body);
        let text = body.strip_prefix(' ').unwrap_or(body).to_string();

        self.tokens.push(Token {
            kind: TokenKind::Comment(Comment {
                text,
                style,
                leading,
            }),
            offset: start,
            len: end - start,
            line,
            end_line: line,
        });
    }

    fn block_comment(&mut self, start: usize) -> Result<(), LexError> {
        self.pos += 2;
        let mut depth = 1;
        while depth > 0 {
            if self.rest().starts_with("/*") {
                self.pos += 2;
                depth += 1;
            } else if self.rest().starts_with("*/") {
                self.pos += 2;
                depth -= 1;
            } else if self.bump().is_none() {
                return Err(LexError::new("unterminated block comment", start, 2));
            }
        }
        self.line_has_token = true;
        Ok(())
    }

    fn string(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(LexError::new("unterminated string literal", start, 1)),
                Some('"') => break,
                Some('\\') => self.escape(&mut value, start)?,
                Some(c) => value.push(c),
            }
        }
        Ok(TokenKind::Str(value))
    }

    fn escape(&mut self, value: &mut String, start: usize) -> Result<(), LexError> {
        match self.bump() {
            None => return Err(LexError::new("unterminated string literal", start, 1)),
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some('\n') => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.bump();
                }
            }
            Some('x') => {
                let digits: String = (0..2).filter_map(|_| self.bump()).collect();
                match u8::from_str_radix(&digits, 16) {
                    Ok(byte) => value.push(char::from(byte)),
                    Err(_) => return Err(LexError::new("invalid \\x escape", start, 1)),
                }
            }
            Some('u') => {
                let mut digits = String::new();
                if self.bump() != Some('{') {
                    return Err(LexError::new("invalid unicode escape", start, 1));
                }
                loop {
                    match self.bump() {
                        Some('}') => break,
                        Some(c) if c.is_ascii_hexdigit() || c == '_' => {
                            if c != '_' {
                                digits.push(c);
                            }
                        }
                        _ => return Err(LexError::new("invalid unicode escape", start, 1)),
                    }
                }
                let decoded = u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| LexError::new("invalid unicode escape", start, 1))?;
                value.push(decoded);
            }
            Some(c) => value.push(c),
        }
        Ok(())
    }

    fn raw_string(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let mut hashes = 0;
        while self.peek() == Some('#') {
            self.bump();
            hashes += 1;
        }
        if self.bump() != Some('"') {
            return Err(LexError::new("malformed raw string literal", start, 1));
        }
        let terminator = format!("\"{}", "#".repeat(hashes));
        match self.rest().find(&terminator) {
            Some(i) => {
                let value = self.rest()[..i].to_string();
                for _ in value.chars() {
                    self.bump();
                }
                self.pos += terminator.len();
                Ok(TokenKind::Str(value))
            }
            None => Err(LexError::new("unterminated raw string literal", start, 1)),
        }
    }

    /// `'a'`, `'\n'` or a lifetime such as `'static`.
    fn quote(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let next = self.peek_nth(1);
        let after = self.peek_nth(2);

        if next == Some('\\') {
            self.bump();
            self.bump();
            self.bump();
            loop {
                match self.bump() {
                    Some('\'') => return Ok(TokenKind::Literal),
                    Some('\n') | None => {
                        return Err(LexError::new("unterminated character literal", start, 1));
                    }
                    Some(_) => {}
                }
            }
        }
        if after == Some('\'') {
            self.bump();
            self.bump();
            self.bump();
            return Ok(TokenKind::Literal);
        }
        if next.is_some_and(is_ident_start) {
            self.bump();
            self.ident_chars();
            return Ok(TokenKind::Lifetime);
        }
        Err(LexError::new("unterminated character literal", start, 1))
    }

    fn ident_or_prefixed(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let rest = self.rest();

        for prefix in ["br", "cr", "r"] {
            if let Some(after) = rest.strip_prefix(prefix)
                && (after.starts_with('"') || after.starts_with("#\"") || after.starts_with("##"))
            {
                self.pos += prefix.len();
                return self.raw_string(start);
            }
        }
        for prefix in ["b", "c"] {
            if let Some(after) = rest.strip_prefix(prefix) {
                if after.starts_with('"') {
                    self.pos += prefix.len();
                    return self.string(start);
                }
                if prefix == "b" && after.starts_with('\'') {
                    self.pos += 1;
                    return self.quote(start);
                }
            }
        }
        if let Some(after) = rest.strip_prefix("r#")
            && after.chars().next().is_some_and(is_ident_start)
        {
            self.pos += 2;
            let name = self.ident_chars();
            return Ok(TokenKind::Ident(format!("r#{name}")));
        }

        Ok(TokenKind::Ident(self.ident_chars()))
    }

    fn ident_chars(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_continue(c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        name
    }

    fn number(&mut self) {
        let mut prev = '\0';
        let hex = self.rest().starts_with("0x");
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E') && !hex;
            let decimal_point = c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit());
            if !(is_ident_continue(c) || exponent_sign || decimal_point) {
                break;
            }
            prev = c;
            self.bump();
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
