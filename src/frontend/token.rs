//! Token definitions for Brik
#![allow(dead_code)]

use crate::utils::Span;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ============ Keywords ============
    /// void
    Void,
    /// int
    Int,
    /// byte
    Byte,
    /// bool
    Bool,
    /// const
    Const,
    /// true
    True,
    /// false
    False,
    /// return
    Return,
    /// if
    If,
    /// else
    Else,
    /// while
    While,
    /// break
    Break,
    /// continue
    Continue,
    /// and
    And,
    /// or
    Or,
    /// not
    Not,

    // ============ Identifiers and Literals ============
    /// Identifier (variable name, function name)
    Ident(String),
    /// Integer literal
    NumLit(i64),
    /// Integer literal with byte suffix (`7b`)
    ByteLit(i64),
    /// String literal
    StringLit(String),

    // ============ Operators ============
    /// =
    Assign,
    /// ==
    EqEq,
    /// !=
    Ne,
    /// <
    Lt,
    /// <=
    Le,
    /// >
    Gt,
    /// >=
    Ge,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,

    // ============ Delimiters ============
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// ,
    Comma,
    /// ;
    Semicolon,

    // ============ Special ============
    /// End of file
    Eof,
    /// Unknown/invalid character
    Unknown(char),
}

impl TokenKind {
    /// Try to convert an identifier to a keyword
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "void" => Some(TokenKind::Void),
            "int" => Some(TokenKind::Int),
            "byte" => Some(TokenKind::Byte),
            "bool" => Some(TokenKind::Bool),
            "const" => Some(TokenKind::Const),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "return" => Some(TokenKind::Return),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "break" => Some(TokenKind::Break),
            "continue" => Some(TokenKind::Continue),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "not" => Some(TokenKind::Not),
            _ => None,
        }
    }

    /// Check if this token starts a type (`int`, `byte`, `bool`)
    pub fn is_data_type(&self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Byte | TokenKind::Bool)
    }

    /// Get the precedence of a binary operator (for precedence climbing).
    /// Returns None if not a binary operator.
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            // Logical OR (lowest)
            TokenKind::Or => Some(1),

            // Logical AND
            TokenKind::And => Some(2),

            // Equality
            TokenKind::EqEq | TokenKind::Ne => Some(3),

            // Relational
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => Some(4),

            // Additive
            TokenKind::Plus | TokenKind::Minus => Some(5),

            // Multiplicative (highest for binary)
            TokenKind::Star | TokenKind::Slash => Some(6),

            _ => None,
        }
    }
}
