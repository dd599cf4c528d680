//! Statement execution

use crate::ast::*;
use crate::interpreter::{env_error, ControlFlow, Interpreter};
use crate::value::{is_truthy, RuntimeError};

impl Interpreter {
    /// Execute a single statement
    pub(super) fn exec_stmt(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        self.stats.statements += 1;

        match stmt {
            Stmt::VarDecl(decl) => {
                for declarator in &decl.declarators {
                    let value = self.eval_expr(&declarator.init)?;
                    self.env
                        .declare(&declarator.name, value)
                        .map_err(|e| env_error(e, declarator.line))?;
                }
                Ok(ControlFlow::Continue)
            }
            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.value)?;
                self.env
                    .assign(&assign.name, value)
                    .map_err(|e| env_error(e, assign.line))?;
                Ok(ControlFlow::Continue)
            }
            Stmt::Expr(expr_stmt) => {
                self.eval_expr(&expr_stmt.expr)?;
                Ok(ControlFlow::Continue)
            }
            Stmt::Print(print) => {
                let value = self.eval_expr(&print.expr)?;
                self.io.print_value(value, print.line)?;
                Ok(ControlFlow::Continue)
            }
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::While(while_stmt) => self.exec_while(while_stmt),
            Stmt::Run(run_stmt) => self.exec_run(run_stmt),
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => 0,
                };
                Ok(ControlFlow::Return(value))
            }
            Stmt::FunctionDecl(func) => {
                self.register_function(func);
                Ok(ControlFlow::Continue)
            }
        }
    }

    /// Run the block of the first true branch, if any
    fn exec_if(&mut self, if_stmt: &IfStmt) -> Result<ControlFlow, RuntimeError> {
        if is_truthy(self.eval_expr(&if_stmt.cond)?) {
            return self.exec_block(&if_stmt.then_block);
        }

        for branch in &if_stmt.elif_branches {
            if is_truthy(self.eval_expr(&branch.cond)?) {
                return self.exec_block(&branch.block);
            }
        }

        match &if_stmt.else_block {
            Some(block) => self.exec_block(block),
            None => Ok(ControlFlow::Continue),
        }
    }

    /// Pre-test loop; each iteration gets its own scope
    fn exec_while(&mut self, while_stmt: &WhileStmt) -> Result<ControlFlow, RuntimeError> {
        while is_truthy(self.eval_expr(&while_stmt.cond)?) {
            if let ControlFlow::Return(value) = self.exec_block(&while_stmt.body)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Continue)
    }

    /// Post-test loop: the body always runs at least once
    fn exec_run(&mut self, run_stmt: &RunStmt) -> Result<ControlFlow, RuntimeError> {
        loop {
            if let ControlFlow::Return(value) = self.exec_block(&run_stmt.body)? {
                return Ok(ControlFlow::Return(value));
            }
            if !is_truthy(self.eval_expr(&run_stmt.cond)?) {
                return Ok(ControlFlow::Continue);
            }
        }
    }

    /// Execute a block in a fresh scope, stopping at the first `Return`
    pub(super) fn exec_block(&mut self, block: &Block) -> Result<ControlFlow, RuntimeError> {
        self.with_scope(|this| {
            for stmt in &block.statements {
                if let ControlFlow::Return(value) = this.exec_stmt(stmt)? {
                    return Ok(ControlFlow::Return(value));
                }
            }
            Ok(ControlFlow::Continue)
        })
    }
}
