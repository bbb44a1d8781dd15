//! Parser for Brik
//!
//! Recursive descent parser with precedence climbing for expressions. Any
//! grammar violation is fatal; the parser reports the first one and stops.

use crate::frontend::ast::*;
use crate::frontend::token::{Token, TokenKind};
use crate::types::Ty;
use crate::utils::{Error, Result, Span};
use log::debug;

/// The parser state
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from a token stream.
    ///
    /// The stream must end with an `Eof` token, as produced by
    /// [`Lexer::tokenize`](crate::frontend::lexer::Lexer::tokenize).
    pub fn new(tokens: Vec<Token>) -> Self {
        assert!(!tokens.is_empty(), "token stream must end with Eof");
        Self { tokens, pos: 0 }
    }

    /// Get the current token
    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Get the current token's kind
    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Get the current token's span
    fn current_span(&self) -> Span {
        self.current().span
    }

    /// Look ahead one token
    fn peek_kind(&self) -> &TokenKind {
        let idx = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    /// Advance and return the consumed token
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches
    fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token if it matches
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require the current token to match, or fail with a syntax error
    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error())
        }
    }

    /// Build a syntax error at the current token
    fn syntax_error(&self) -> Error {
        Error::SyntaxError {
            span: self.current_span(),
        }
    }

    /// Parse a complete program: a sequence of function declarations
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut funcs = Vec::new();

        while !self.check(&TokenKind::Eof) {
            funcs.push(self.parse_func_decl()?);
        }

        debug!("parsed {} function declaration(s)", funcs.len());
        Ok(Program { funcs })
    }

    /// Parse `RetType ID ( Formals ) { Statement* }`
    fn parse_func_decl(&mut self) -> Result<FuncDecl> {
        let start = self.current_span();
        let ret_ty = self.parse_ret_type()?;
        let name = self.parse_ident()?;

        self.expect(&TokenKind::LParen)?;
        let params = self.parse_formals()?;
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);

        Ok(FuncDecl {
            name,
            ret_ty,
            params,
            body,
            span,
        })
    }

    /// Parse `void | int | byte | bool`
    fn parse_ret_type(&mut self) -> Result<Ty> {
        if self.eat(&TokenKind::Void) {
            return Ok(Ty::Void);
        }
        self.parse_type()
    }

    /// Parse `int | byte | bool`
    fn parse_type(&mut self) -> Result<Ty> {
        let ty = match self.current_kind() {
            TokenKind::Int => Ty::Int,
            TokenKind::Byte => Ty::Byte,
            TokenKind::Bool => Ty::Bool,
            _ => return Err(self.syntax_error()),
        };
        self.advance();
        Ok(ty)
    }

    /// Parse an identifier
    fn parse_ident(&mut self) -> Result<Ident> {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Ident { name, span })
            }
            _ => Err(self.syntax_error()),
        }
    }

    /// Parse `ε | FormalDecl (, FormalDecl)*`
    fn parse_formals(&mut self) -> Result<Vec<FormalDecl>> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        loop {
            params.push(self.parse_formal_decl()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse `[const] Type ID`
    fn parse_formal_decl(&mut self) -> Result<FormalDecl> {
        let start = self.current_span();
        let is_const = self.eat(&TokenKind::Const);
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        let span = start.merge(name.span);

        Ok(FormalDecl {
            name,
            ty,
            is_const,
            span,
        })
    }

    /// Parse `{ Statement* }`
    fn parse_block(&mut self) -> Result<Block> {
        let start = self.expect(&TokenKind::LBrace)?.span;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.check(&TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }

        let end = self.expect(&TokenKind::RBrace)?.span;
        Ok(Block {
            stmts,
            span: start.merge(end),
        })
    }

    /// Parse a single statement
    fn parse_statement(&mut self) -> Result<Stmt> {
        match self.current_kind() {
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Const | TokenKind::Int | TokenKind::Byte | TokenKind::Bool => {
                self.parse_var_decl()
            }
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Break => {
                let span = self.advance().span;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Break { span })
            }
            TokenKind::Continue => {
                let span = self.advance().span;
                self.expect(&TokenKind::Semicolon)?;
                Ok(Stmt::Continue { span })
            }
            TokenKind::Ident(_) => {
                // assignment or call statement, decided by the next token
                match self.peek_kind() {
                    TokenKind::Assign => self.parse_assign(),
                    TokenKind::LParen => {
                        let call = self.parse_call()?;
                        self.expect(&TokenKind::Semicolon)?;
                        Ok(Stmt::Call(call))
                    }
                    _ => Err(self.syntax_error()),
                }
            }
            _ => Err(self.syntax_error()),
        }
    }

    /// Parse `[const] Type ID [= Exp] ;`
    fn parse_var_decl(&mut self) -> Result<Stmt> {
        let start = self.current_span();
        let is_const = self.eat(&TokenKind::Const);
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;

        let init = if self.eat(&TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let end = self.expect(&TokenKind::Semicolon)?.span;
        Ok(Stmt::VarDecl {
            name,
            ty,
            is_const,
            init,
            span: start.merge(end),
        })
    }

    /// Parse `ID = Exp ;`
    fn parse_assign(&mut self) -> Result<Stmt> {
        let name = self.parse_ident()?;
        self.expect(&TokenKind::Assign)?;
        let value = self.parse_expr()?;
        let end = self.expect(&TokenKind::Semicolon)?.span;
        let span = name.span.merge(end);

        Ok(Stmt::Assign { name, value, span })
    }

    /// Parse `return [Exp] ;`
    fn parse_return(&mut self) -> Result<Stmt> {
        let start = self.expect(&TokenKind::Return)?.span;

        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        let end = self.expect(&TokenKind::Semicolon)?.span;
        Ok(Stmt::Return {
            value,
            span: start.merge(end),
        })
    }

    /// Parse `if ( Exp ) Statement [else Statement]`
    fn parse_if(&mut self) -> Result<Stmt> {
        let start = self.expect(&TokenKind::If)?.span;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;

        let then = Box::new(self.parse_statement()?);

        let else_ = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let end = else_
            .as_ref()
            .map_or_else(|| then.span(), |e| e.span());
        Ok(Stmt::If {
            cond,
            then,
            else_,
            span: start.merge(end),
        })
    }

    /// Parse `while ( Exp ) Statement`
    fn parse_while(&mut self) -> Result<Stmt> {
        let start = self.expect(&TokenKind::While)?.span;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;

        let body = Box::new(self.parse_statement()?);
        let span = start.merge(body.span());

        Ok(Stmt::While { cond, body, span })
    }

    /// Parse `ID ( [Exp (, Exp)*] )`
    fn parse_call(&mut self) -> Result<CallExpr> {
        let callee = self.parse_ident()?;
        self.expect(&TokenKind::LParen)?;

        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let end = self.expect(&TokenKind::RParen)?.span;
        let span = callee.span.merge(end);

        Ok(CallExpr { callee, args, span })
    }

    /// Parse an expression (entry point)
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_binary(0)
    }

    /// Precedence-climbing loop for binary operators
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        while let Some(prec) = self.current_kind().binary_precedence() {
            if prec < min_prec {
                break;
            }

            let op = match self.advance().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Ge => BinOp::Ge,
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::Ne => BinOp::Ne,
                TokenKind::And => BinOp::And,
                TokenKind::Or => BinOp::Or,
                _ => unreachable!("binary_precedence covers exactly the binary operators"),
            };

            // left-associative: right side binds one level tighter
            let right = self.parse_binary(prec + 1)?;
            let span = left.span().merge(right.span());
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    /// Parse unary operators and primaries: `not Exp`, `( Type ) Exp`, atoms
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::Not) {
            let start = self.advance().span;
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span());
            return Ok(Expr::Not {
                operand: Box::new(operand),
                span,
            });
        }

        // `( Type )` is a cast; plain `(` opens a parenthesized expression
        if self.check(&TokenKind::LParen) && self.peek_kind().is_data_type() {
            let start = self.advance().span;
            let ty = self.parse_type()?;
            self.expect(&TokenKind::RParen)?;
            let expr = self.parse_unary()?;
            let span = start.merge(expr.span());
            return Ok(Expr::Cast {
                ty,
                expr: Box::new(expr),
                span,
            });
        }

        self.parse_primary()
    }

    /// Parse an atomic expression
    fn parse_primary(&mut self) -> Result<Expr> {
        let span = self.current_span();

        match self.current_kind().clone() {
            TokenKind::NumLit(value) => {
                self.advance();
                Ok(Expr::Int { value, span })
            }
            TokenKind::ByteLit(value) => {
                self.advance();
                Ok(Expr::Byte { value, span })
            }
            TokenKind::StringLit(value) => {
                self.advance();
                Ok(Expr::Str { value, span })
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool { value: true, span })
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool { value: false, span })
            }
            TokenKind::Ident(_) => {
                if self.peek_kind() == &TokenKind::LParen {
                    Ok(Expr::Call(self.parse_call()?))
                } else {
                    Ok(Expr::Ident(self.parse_ident()?))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.syntax_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;

    fn parse(source: &str) -> Result<Program> {
        let tokens = Lexer::new(source).tokenize();
        Parser::new(tokens).parse_program()
    }

    fn parse_expression(source: &str) -> Expr {
        let tokens = Lexer::new(source).tokenize();
        Parser::new(tokens).parse_expr().unwrap()
    }

    #[test]
    fn test_empty_main() {
        let program = parse("void main() {}").unwrap();
        assert_eq!(program.funcs.len(), 1);
        assert_eq!(program.funcs[0].name.name, "main");
        assert_eq!(program.funcs[0].ret_ty, Ty::Void);
        assert!(program.funcs[0].params.is_empty());
    }

    #[test]
    fn test_formals() {
        let program = parse("int add(int a, const byte b) { return a; }").unwrap();
        let func = &program.funcs[0];
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[0].ty, Ty::Int);
        assert!(!func.params[0].is_const);
        assert_eq!(func.params[1].ty, Ty::Byte);
        assert!(func.params[1].is_const);
    }

    #[test]
    fn test_var_decl_forms() {
        let program = parse(
            "void main() { int x; const int y = 2; byte z = 3b; }",
        )
        .unwrap();
        let body = &program.funcs[0].body;
        assert_eq!(body.stmts.len(), 3);
        assert!(matches!(
            body.stmts[0],
            Stmt::VarDecl { is_const: false, init: None, .. }
        ));
        assert!(matches!(
            body.stmts[1],
            Stmt::VarDecl { is_const: true, init: Some(_), .. }
        ));
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expression("1 + 2 * 3");
        match expr {
            Expr::Binary { op: BinOp::Add, right, .. } => {
                assert!(matches!(*right, Expr::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn test_logical_precedence() {
        // a or b and c parses as a or (b and c)
        let expr = parse_expression("x or y and z");
        match expr {
            Expr::Binary { op: BinOp::Or, right, .. } => {
                assert!(matches!(*right, Expr::Binary { op: BinOp::And, .. }));
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn test_cast_vs_paren() {
        assert!(matches!(
            parse_expression("(int) x"),
            Expr::Cast { ty: Ty::Int, .. }
        ));
        assert!(matches!(parse_expression("(x)"), Expr::Ident(_)));
    }

    #[test]
    fn test_if_else_and_while() {
        let program = parse(
            "void main() { if (true) { } else { } while (false) break; }",
        )
        .unwrap();
        let body = &program.funcs[0].body;
        assert!(matches!(body.stmts[0], Stmt::If { else_: Some(_), .. }));
        assert!(matches!(body.stmts[1], Stmt::While { .. }));
    }

    #[test]
    fn test_call_statement_and_expression() {
        let program = parse("void main() { print(\"hi\"); int x = f(1, 2b); }").unwrap();
        let body = &program.funcs[0].body;
        assert!(matches!(body.stmts[0], Stmt::Call(_)));
        match &body.stmts[1] {
            Stmt::VarDecl { init: Some(Expr::Call(call)), .. } => {
                assert_eq!(call.callee.name, "f");
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = parse("void main() {\n  int = 5;\n}").unwrap_err();
        match err {
            Error::SyntaxError { span } => assert_eq!(span.line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_trailing_garbage_is_error() {
        assert!(parse("void main() {} }").is_err());
    }
}
