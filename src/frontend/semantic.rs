//! Semantic analysis for Brik
//!
//! A single forward pass over the AST: declarations populate a stack of
//! scopes, expressions are typed bottom-up, and control-flow statements are
//! checked against the enclosing loop/function context. The first violated
//! rule aborts the whole analysis.
//!
//! Scoping rules:
//! - Redeclaration is a same-scope rule; an inner scope may shadow an outer
//!   variable of the same name.
//! - Function names are global and may not be reused by variables anywhere.
//! - A function may call itself, but not a function declared later in the
//!   file.

use crate::frontend::ast::*;
use crate::frontend::dump::ScopeDump;
use crate::types::{function_type_string, is_assignable, numeric_result, Ty};
use crate::utils::{Error, Result};
use log::debug;

/// One declared name in one scope
#[derive(Debug, Clone)]
struct Symbol {
    name: String,
    kind: SymbolKind,
}

#[derive(Debug, Clone)]
enum SymbolKind {
    Variable { ty: Ty, offset: i32, is_const: bool },
    Function { params: Vec<Ty>, ret: Ty },
}

/// The scope stack with its parallel offset stack.
///
/// Scopes keep symbols in declaration order; the dumper contract depends on
/// it. Each entry of `offsets` is the next free variable slot at that nesting
/// level: a nested block inherits the enclosing count, a fresh function scope
/// restarts at zero.
struct SymbolTable {
    scopes: Vec<Vec<Symbol>>,
    offsets: Vec<i32>,
}

impl SymbolTable {
    fn new() -> Self {
        Self {
            scopes: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Push the global scope, pre-populated with the built-in functions
    fn open_global(&mut self) {
        debug!("opening global scope");
        self.scopes.push(vec![
            Symbol {
                name: "print".to_string(),
                kind: SymbolKind::Function {
                    params: vec![Ty::Str],
                    ret: Ty::Void,
                },
            },
            Symbol {
                name: "printi".to_string(),
                kind: SymbolKind::Function {
                    params: vec![Ty::Int],
                    ret: Ty::Void,
                },
            },
        ]);
        self.offsets.push(0);
    }

    /// Push a nested scope that continues the enclosing slot numbering
    fn open_scope(&mut self) {
        debug!("opening scope (depth {})", self.scopes.len());
        let next = self.offsets.last().copied().unwrap_or(0);
        self.scopes.push(Vec::new());
        self.offsets.push(next);
    }

    /// Push a function-body scope; slot numbering restarts at zero
    fn open_function_scope(&mut self) {
        debug!("opening function scope");
        self.scopes.push(Vec::new());
        self.offsets.push(0);
    }

    /// Pop the innermost scope, reporting every symbol it held in
    /// declaration order, then the end-of-scope marker.
    fn close_scope<D: ScopeDump>(&mut self, dump: &mut D) {
        let scope = self.scopes.pop().unwrap_or_default();
        self.offsets.pop();
        debug!("closing scope with {} symbol(s)", scope.len());

        for symbol in &scope {
            match &symbol.kind {
                SymbolKind::Variable { ty, offset, .. } => {
                    dump.variable(&symbol.name, *offset, *ty);
                }
                SymbolKind::Function { params, ret } => {
                    dump.function(&symbol.name, &function_type_string(params, *ret));
                }
            }
        }
        dump.end_scope();
    }

    /// Innermost-first scan for any symbol with the given name
    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.iter().find(|s| s.name == name))
    }

    /// Innermost-first scan for a variable with the given name, skipping
    /// function symbols
    fn lookup_variable(&self, name: &str) -> Option<(Ty, bool)> {
        self.scopes.iter().rev().find_map(|scope| {
            scope.iter().find_map(|s| match &s.kind {
                SymbolKind::Variable { ty, is_const, .. } if s.name == name => {
                    Some((*ty, *is_const))
                }
                _ => None,
            })
        })
    }

    /// Check if a function with the given name is visible
    fn function_visible(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| {
            scope
                .iter()
                .any(|s| s.name == name && matches!(s.kind, SymbolKind::Function { .. }))
        })
    }

    /// Check if the innermost scope already holds the given name
    fn declared_in_current(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map_or(false, |scope| scope.iter().any(|s| s.name == name))
    }

    /// Append a variable to the innermost scope and claim the next slot
    fn insert_variable(&mut self, name: &str, ty: Ty, is_const: bool) {
        let offset = self.offsets.last().copied().unwrap_or(0);
        if let Some(top) = self.offsets.last_mut() {
            *top += 1;
        }
        debug!("declared variable {} : {} at offset {}", name, ty, offset);
        self.scopes.last_mut().unwrap().push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Variable {
                ty,
                offset,
                is_const,
            },
        });
    }

    /// Append a function to the global scope
    fn insert_function(&mut self, name: &str, params: Vec<Ty>, ret: Ty) {
        debug!("declared function {} {}", name, function_type_string(&params, ret));
        self.scopes[0].push(Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function { params, ret },
        });
    }

    /// Check that the global scope holds exactly one `void main()`
    fn has_valid_main(&self) -> bool {
        let qualifying = self.scopes[0]
            .iter()
            .filter(|s| {
                s.name == "main"
                    && matches!(
                        &s.kind,
                        SymbolKind::Function { params, ret: Ty::Void } if params.is_empty()
                    )
            })
            .count();
        qualifying == 1
    }
}

/// Result of typing one expression: the static type, plus the value when the
/// expression is a statically known boolean.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ExprAttr {
    ty: Ty,
    value: Option<bool>,
}

impl ExprAttr {
    fn of(ty: Ty) -> Self {
        Self { ty, value: None }
    }
}

/// The semantic analyzer
pub struct SemanticAnalyzer<'a, D: ScopeDump> {
    dump: &'a mut D,
    table: SymbolTable,
    loop_depth: u32,
    /// Return type of the function whose body is being checked
    current_ret: Ty,
}

impl<'a, D: ScopeDump> SemanticAnalyzer<'a, D> {
    pub fn new(dump: &'a mut D) -> Self {
        Self {
            dump,
            table: SymbolTable::new(),
            loop_depth: 0,
            current_ret: Ty::Void,
        }
    }

    /// Analyze a complete program
    pub fn analyze(&mut self, program: &Program) -> Result<()> {
        self.table.open_global();

        for func in &program.funcs {
            self.check_function(func)?;
        }

        if !self.table.has_valid_main() {
            return Err(Error::MainMissing);
        }

        self.table.close_scope(self.dump);
        debug!("analysis complete: {} function(s)", program.funcs.len());
        Ok(())
    }

    /// Check one function declaration: register its signature globally, then
    /// check the body inside a fresh scope holding the parameters.
    fn check_function(&mut self, func: &FuncDecl) -> Result<()> {
        // The signature is registered before the body is checked so the
        // function may call itself.
        if self.table.lookup(&func.name.name).is_some() {
            return Err(Error::Redeclaration {
                name: func.name.name.clone(),
                span: func.name.span,
            });
        }

        let params: Vec<Ty> = func.params.iter().map(|p| p.ty).collect();
        self.table
            .insert_function(&func.name.name, params, func.ret_ty);

        self.table.open_function_scope();
        self.current_ret = func.ret_ty;

        for param in &func.params {
            self.declare_variable(&param.name, param.ty, param.is_const)?;
        }

        for stmt in &func.body.stmts {
            self.check_stmt(stmt)?;
        }

        self.table.close_scope(self.dump);
        Ok(())
    }

    /// Declare a variable or parameter in the innermost scope.
    ///
    /// Duplicates within the scope and collisions with any visible function
    /// name are rejected; shadowing an outer variable is fine.
    fn declare_variable(&mut self, name: &Ident, ty: Ty, is_const: bool) -> Result<()> {
        if self.table.declared_in_current(&name.name) || self.table.function_visible(&name.name)
        {
            return Err(Error::Redeclaration {
                name: name.name.clone(),
                span: name.span,
            });
        }
        self.table.insert_variable(&name.name, ty, is_const);
        Ok(())
    }

    /// Check one statement
    fn check_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Block(block) => {
                self.table.open_scope();
                for stmt in &block.stmts {
                    self.check_stmt(stmt)?;
                }
                self.table.close_scope(self.dump);
                Ok(())
            }

            Stmt::VarDecl {
                name,
                ty,
                is_const,
                init,
                span,
            } => {
                // Initializer first: it is evaluated before the name exists,
                // so `int x = x;` reports the use, not the declaration.
                let init_attr = match init {
                    Some(expr) => Some((self.check_expr(expr)?, expr.span())),
                    None => None,
                };

                if *is_const && init.is_none() {
                    return Err(Error::ConstWithoutInit { span: *span });
                }

                if let Some((attr, init_span)) = init_attr {
                    if !is_assignable(attr.ty, *ty) {
                        return Err(Error::TypeMismatch { span: init_span });
                    }
                }

                self.declare_variable(name, *ty, *is_const)
            }

            Stmt::Assign { name, value, span } => {
                let attr = self.check_expr(value)?;

                let (ty, is_const) = self
                    .table
                    .lookup_variable(&name.name)
                    .ok_or_else(|| Error::UndeclaredVariable {
                        name: name.name.clone(),
                        span: name.span,
                    })?;

                if is_const {
                    return Err(Error::ConstMismatch { span: *span });
                }
                if !is_assignable(attr.ty, ty) {
                    return Err(Error::TypeMismatch { span: value.span() });
                }
                Ok(())
            }

            Stmt::Call(call) => {
                self.check_call(call)?;
                Ok(())
            }

            Stmt::Return { value, span } => match (value, self.current_ret) {
                (None, Ty::Void) => Ok(()),
                (None, _) => Err(Error::TypeMismatch { span: *span }),
                (Some(expr), ret) => {
                    // The expression is typed before the return rule applies;
                    // its own errors win even in a void function.
                    let attr = self.check_expr(expr)?;
                    if ret == Ty::Void {
                        return Err(Error::TypeMismatch { span: *span });
                    }
                    if !is_assignable(attr.ty, ret) {
                        return Err(Error::TypeMismatch { span: expr.span() });
                    }
                    Ok(())
                }
            },

            Stmt::If {
                cond, then, else_, ..
            } => {
                let attr = self.check_condition(cond)?;
                if let Some(value) = attr.value {
                    debug!("if condition is constant {}", value);
                }

                self.table.open_scope();
                self.check_stmt(then)?;
                self.table.close_scope(self.dump);

                if let Some(else_stmt) = else_ {
                    self.table.open_scope();
                    self.check_stmt(else_stmt)?;
                    self.table.close_scope(self.dump);
                }
                Ok(())
            }

            Stmt::While { cond, body, .. } => {
                self.check_condition(cond)?;

                self.table.open_scope();
                self.loop_depth += 1;
                let result = self.check_stmt(body);
                self.loop_depth -= 1;
                result?;
                self.table.close_scope(self.dump);
                Ok(())
            }

            Stmt::Break { span } => {
                if self.loop_depth == 0 {
                    return Err(Error::UnexpectedBreak { span: *span });
                }
                Ok(())
            }

            Stmt::Continue { span } => {
                if self.loop_depth == 0 {
                    return Err(Error::UnexpectedContinue { span: *span });
                }
                Ok(())
            }
        }
    }

    /// Check an `if`/`while` condition: must be BOOL
    fn check_condition(&mut self, cond: &Expr) -> Result<ExprAttr> {
        let attr = self.check_expr(cond)?;
        if attr.ty != Ty::Bool {
            return Err(Error::TypeMismatch { span: cond.span() });
        }
        Ok(attr)
    }

    /// Compute the static type of an expression bottom-up
    fn check_expr(&mut self, expr: &Expr) -> Result<ExprAttr> {
        match expr {
            Expr::Int { .. } => Ok(ExprAttr::of(Ty::Int)),

            Expr::Byte { value, span } => {
                if *value > 255 {
                    return Err(Error::ByteTooLarge {
                        value: *value,
                        span: *span,
                    });
                }
                Ok(ExprAttr::of(Ty::Byte))
            }

            Expr::Str { .. } => Ok(ExprAttr::of(Ty::Str)),

            Expr::Bool { value, .. } => Ok(ExprAttr {
                ty: Ty::Bool,
                value: Some(*value),
            }),

            Expr::Ident(id) => {
                let (ty, _) = self.table.lookup_variable(&id.name).ok_or_else(|| {
                    Error::UndeclaredVariable {
                        name: id.name.clone(),
                        span: id.span,
                    }
                })?;
                Ok(ExprAttr::of(ty))
            }

            Expr::Call(call) => {
                let ret = self.check_call(call)?;
                Ok(ExprAttr::of(ret))
            }

            Expr::Not { operand, .. } => {
                let attr = self.check_expr(operand)?;
                if attr.ty != Ty::Bool {
                    return Err(Error::TypeMismatch {
                        span: operand.span(),
                    });
                }
                Ok(ExprAttr {
                    ty: Ty::Bool,
                    value: attr.value.map(|v| !v),
                })
            }

            Expr::Binary {
                left,
                op,
                right,
                span,
            } => {
                let lhs = self.check_expr(left)?;
                let rhs = self.check_expr(right)?;

                if op.is_arithmetic() {
                    let ty = numeric_result(lhs.ty, rhs.ty)
                        .ok_or(Error::TypeMismatch { span: *span })?;
                    Ok(ExprAttr::of(ty))
                } else if op.is_comparison() {
                    if !lhs.ty.is_numeric() || !rhs.ty.is_numeric() {
                        return Err(Error::TypeMismatch { span: *span });
                    }
                    Ok(ExprAttr::of(Ty::Bool))
                } else {
                    // logical and/or, with constant folding
                    if lhs.ty != Ty::Bool || rhs.ty != Ty::Bool {
                        return Err(Error::TypeMismatch { span: *span });
                    }
                    let value = match (lhs.value, rhs.value) {
                        (Some(a), Some(b)) => Some(match op {
                            BinOp::And => a && b,
                            _ => a || b,
                        }),
                        _ => None,
                    };
                    Ok(ExprAttr {
                        ty: Ty::Bool,
                        value,
                    })
                }
            }

            Expr::Cast { ty, expr, span } => {
                let attr = self.check_expr(expr)?;
                // only numeric-to-numeric casts exist
                if !matches!(ty, Ty::Int | Ty::Byte) || !attr.ty.is_numeric() {
                    return Err(Error::TypeMismatch { span: *span });
                }
                Ok(ExprAttr::of(*ty))
            }
        }
    }

    /// Resolve and check a call site; the result is the callee's return type
    fn check_call(&mut self, call: &CallExpr) -> Result<Ty> {
        let name = &call.callee.name;

        // Arguments are typed before the callee is resolved, so an error
        // inside an argument wins over a bad call.
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.check_expr(arg)?);
        }

        // The innermost match decides: a variable of the same name hides the
        // function and cannot be called.
        let (params, ret) = match self.table.lookup(name).map(|s| &s.kind) {
            Some(SymbolKind::Function { params, ret }) => (params.clone(), *ret),
            _ => {
                return Err(Error::UndefinedFunction {
                    name: name.clone(),
                    span: call.callee.span,
                })
            }
        };

        if args.len() != params.len() {
            return Err(Error::PrototypeMismatch {
                expected: params,
                span: call.span,
            });
        }

        for (attr, &expected) in args.iter().zip(params.iter()) {
            if !is_assignable(attr.ty, expected) {
                return Err(Error::PrototypeMismatch {
                    expected: params,
                    span: call.span,
                });
            }
        }

        Ok(ret)
    }
}
