//! Abstract Syntax Tree definitions for Brik
//!
//! Nodes carry only syntax and spans; all validation happens in the semantic
//! pass.
#![allow(dead_code)]

use crate::types::Ty;
use crate::utils::Span;

/// A complete program (compilation unit)
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub funcs: Vec<FuncDecl>,
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: Ident,
    pub ret_ty: Ty,
    pub params: Vec<FormalDecl>,
    pub body: Block,
    pub span: Span,
}

/// A formal parameter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FormalDecl {
    pub name: Ident,
    pub ty: Ty,
    pub is_const: bool,
    pub span: Span,
}

/// A braced statement list
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `{ ... }` nested block with its own scope
    Block(Block),
    /// `[const] Type ID [= Exp] ;`
    VarDecl {
        name: Ident,
        ty: Ty,
        is_const: bool,
        init: Option<Expr>,
        span: Span,
    },
    /// `ID = Exp ;`
    Assign {
        name: Ident,
        value: Expr,
        span: Span,
    },
    /// `ID ( args ) ;` call used as a statement
    Call(CallExpr),
    /// `return [Exp] ;`
    Return { value: Option<Expr>, span: Span },
    /// `if ( Exp ) Stmt [else Stmt]`
    If {
        cond: Expr,
        then: Box<Stmt>,
        else_: Option<Box<Stmt>>,
        span: Span,
    },
    /// `while ( Exp ) Stmt`
    While {
        cond: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    /// `break ;`
    Break { span: Span },
    /// `continue ;`
    Continue { span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(b) => b.span,
            Stmt::VarDecl { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Break { span }
            | Stmt::Continue { span } => *span,
            Stmt::Call(call) => call.span,
        }
    }
}

/// A function call (expression or statement position)
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal
    Int { value: i64, span: Span },
    /// Byte literal (`NUM b`)
    Byte { value: i64, span: Span },
    /// String literal
    Str { value: String, span: Span },
    /// `true` / `false`
    Bool { value: bool, span: Span },
    /// Variable reference
    Ident(Ident),
    /// Function call
    Call(CallExpr),
    /// `not Exp`
    Not { operand: Box<Expr>, span: Span },
    /// Binary operation
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
        span: Span,
    },
    /// `( Type ) Exp`
    Cast {
        ty: Ty,
        expr: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int { span, .. }
            | Expr::Byte { span, .. }
            | Expr::Str { span, .. }
            | Expr::Bool { span, .. }
            | Expr::Not { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Cast { span, .. } => *span,
            Expr::Ident(id) => id.span,
            Expr::Call(call) => call.span,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    /// `+ - * /`
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    /// `< > <= >= == !=`
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge | BinOp::Eq | BinOp::Ne
        )
    }

    /// `and or`
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}
