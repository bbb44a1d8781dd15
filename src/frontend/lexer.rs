//! Lexer for Brik
//!
//! Converts source code into a stream of tokens, tracking source lines for
//! diagnostics.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::Span;

/// The lexer state
pub struct Lexer {
    /// Source code as chars
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Start position of current token
    start: usize,
    /// Line the current token starts on (1-based)
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            start: 0,
            line: 1,
        }
    }

    /// Get the current character without advancing
    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    /// Get the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    /// Advance to the next character
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c == Some('\n') {
            self.line += 1;
        }
        self.pos += 1;
        c
    }

    /// Check if we've reached the end of input
    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Create a span from start to current position
    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos, self.line)
    }

    /// Create a token with the current span
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    /// Skip whitespace and `//` line comments
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.source[self.start..self.pos].iter().collect();

        let kind = TokenKind::keyword_from_str(&text)
            .unwrap_or_else(|| TokenKind::Ident(text));

        self.make_token(kind)
    }

    /// Read a number literal, with an optional `b` byte suffix
    fn read_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.source[self.start..self.pos].iter().collect();
        // literals too large for i64 saturate; range checking happens later
        let value = text.parse().unwrap_or(i64::MAX);

        // `7b` is a byte literal; `7bx` is a number followed by an identifier
        if self.peek() == Some('b')
            && !self
                .peek_next()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
            return self.make_token(TokenKind::ByteLit(value));
        }

        self.make_token(TokenKind::NumLit(value))
    }

    /// Read a string literal
    fn read_string(&mut self) -> Token {
        self.advance(); // consume opening quote

        let mut value = String::new();

        while let Some(c) = self.peek() {
            if c == '"' {
                self.advance(); // consume closing quote
                break;
            } else if c == '\\' {
                self.advance();
                match self.peek() {
                    Some('n') => { value.push('\n'); self.advance(); }
                    Some('t') => { value.push('\t'); self.advance(); }
                    Some('\\') => { value.push('\\'); self.advance(); }
                    Some('"') => { value.push('"'); self.advance(); }
                    Some('0') => { value.push('\0'); self.advance(); }
                    Some(c) => { value.push(c); self.advance(); }
                    None => break,
                }
            } else if c == '\n' {
                // Unterminated string
                break;
            } else {
                value.push(c);
                self.advance();
            }
        }

        self.make_token(TokenKind::StringLit(value))
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;

        if self.is_at_end() {
            return Token::eof(self.make_span());
        }

        let c = self.advance().unwrap();

        // Identifiers and keywords
        if c.is_ascii_alphabetic() || c == '_' {
            self.pos -= 1; // back up
            return self.read_identifier();
        }

        // Numbers
        if c.is_ascii_digit() {
            self.pos -= 1; // back up
            return self.read_number();
        }

        // String literals
        if c == '"' {
            self.pos -= 1; // back up
            return self.read_string();
        }

        // Operators and punctuation
        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ne
                } else {
                    TokenKind::Unknown('!')
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            _ => TokenKind::Unknown(c),
        };

        self.make_token(kind)
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("void main() { }");
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0].kind, TokenKind::Void));
        assert!(matches!(tokens[1].kind, TokenKind::Ident(ref s) if s == "main"));
        assert!(matches!(tokens[2].kind, TokenKind::LParen));
        assert!(matches!(tokens[3].kind, TokenKind::RParen));
        assert!(matches!(tokens[4].kind, TokenKind::LBrace));
        assert!(matches!(tokens[5].kind, TokenKind::RBrace));
        assert!(matches!(tokens[6].kind, TokenKind::Eof));
    }

    #[test]
    fn test_numbers_and_byte_suffix() {
        let mut lexer = Lexer::new("42 7b 300b");
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0].kind, TokenKind::NumLit(42)));
        assert!(matches!(tokens[1].kind, TokenKind::ByteLit(7)));
        // Range checking is the analyzer's job, not the lexer's
        assert!(matches!(tokens[2].kind, TokenKind::ByteLit(300)));
    }

    #[test]
    fn test_overflowing_literal_saturates() {
        let mut lexer = Lexer::new("99999999999999999999 99999999999999999999b");
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0].kind, TokenKind::NumLit(i64::MAX)));
        assert!(matches!(tokens[1].kind, TokenKind::ByteLit(i64::MAX)));
    }

    #[test]
    fn test_byte_suffix_vs_identifier() {
        let mut lexer = Lexer::new("5bb");
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0].kind, TokenKind::NumLit(5)));
        assert!(matches!(tokens[1].kind, TokenKind::Ident(ref s) if s == "bb"));
    }

    #[test]
    fn test_strings() {
        let mut lexer = Lexer::new(r#""hello\nworld""#);
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0].kind, TokenKind::StringLit(ref s) if s == "hello\nworld"));
    }

    #[test]
    fn test_keywords_and_operators() {
        let mut lexer = Lexer::new("const byte x = 1b; if not true and false");
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0].kind, TokenKind::Const));
        assert!(matches!(tokens[1].kind, TokenKind::Byte));
        assert!(matches!(tokens[3].kind, TokenKind::Assign));
        assert!(matches!(tokens[4].kind, TokenKind::ByteLit(1)));
        assert!(matches!(tokens[5].kind, TokenKind::Semicolon));
        assert!(matches!(tokens[6].kind, TokenKind::If));
        assert!(matches!(tokens[7].kind, TokenKind::Not));
        assert!(matches!(tokens[8].kind, TokenKind::True));
        assert!(matches!(tokens[9].kind, TokenKind::And));
        assert!(matches!(tokens[10].kind, TokenKind::False));
    }

    #[test]
    fn test_line_tracking() {
        let mut lexer = Lexer::new("int\nbyte\n\nbool");
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[2].span.line, 4);
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("int // trailing words\nbyte");
        let tokens = lexer.tokenize();

        assert!(matches!(tokens[0].kind, TokenKind::Int));
        assert!(matches!(tokens[1].kind, TokenKind::Byte));
        assert_eq!(tokens[1].span.line, 2);
    }
}
