//! Error handling for Brik
//!
//! Every semantic rule violation is fatal: the first error wins, the driver
//! reports it and stops. No recovery, no multi-error accumulation.

use crate::types::Ty;
use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Analysis error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Syntax Errors ====================
    #[error("line {}: syntax error", span.line)]
    SyntaxError { span: Span },

    // ==================== Semantic Errors ====================
    #[error("line {}: identifier {name} is already defined", span.line)]
    Redeclaration { name: String, span: Span },

    #[error("line {}: variable {name} is not defined", span.line)]
    UndeclaredVariable { name: String, span: Span },

    #[error("line {}: function {name} is not defined", span.line)]
    UndefinedFunction { name: String, span: Span },

    #[error("line {}: type mismatch", span.line)]
    TypeMismatch { span: Span },

    #[error("line {}: prototype mismatch, expected parameters ({})", span.line, render_types(expected))]
    PrototypeMismatch { expected: Vec<Ty>, span: Span },

    #[error("line {}: assignment to read-only variable", span.line)]
    ConstMismatch { span: Span },

    #[error("line {}: const declaration without an initializer", span.line)]
    ConstWithoutInit { span: Span },

    #[error("line {}: byte value {value} out of range", span.line)]
    ByteTooLarge { value: i64, span: Span },

    #[error("line {}: unexpected break statement", span.line)]
    UnexpectedBreak { span: Span },

    #[error("line {}: unexpected continue statement", span.line)]
    UnexpectedContinue { span: Span },

    #[error("program requires exactly one 'void main()' function")]
    MainMissing,
}

fn render_types(types: &[Ty]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl Error {
    /// Stable name of the error kind, for structured diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SyntaxError { .. } => "SyntaxError",
            Self::Redeclaration { .. } => "Redeclaration",
            Self::UndeclaredVariable { .. } => "UndeclaredVariable",
            Self::UndefinedFunction { .. } => "UndefinedFunction",
            Self::TypeMismatch { .. } => "TypeMismatch",
            Self::PrototypeMismatch { .. } => "PrototypeMismatch",
            Self::ConstMismatch { .. } => "ConstMismatch",
            Self::ConstWithoutInit { .. } => "ConstWithoutInit",
            Self::ByteTooLarge { .. } => "ByteTooLarge",
            Self::UnexpectedBreak { .. } => "UnexpectedBreak",
            Self::UnexpectedContinue { .. } => "UnexpectedContinue",
            Self::MainMissing => "MainMissing",
        }
    }

    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span }
            | Self::Redeclaration { span, .. }
            | Self::UndeclaredVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::TypeMismatch { span }
            | Self::PrototypeMismatch { span, .. }
            | Self::ConstMismatch { span }
            | Self::ConstWithoutInit { span }
            | Self::ByteTooLarge { span, .. }
            | Self::UnexpectedBreak { span }
            | Self::UnexpectedContinue { span } => Some(*span),
            Self::MainMissing => None,
        }
    }
}
