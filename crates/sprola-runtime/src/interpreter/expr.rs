//! Expression evaluation

use crate::ast::*;
use crate::interpreter::{env_error, ControlFlow, Interpreter};
use crate::stdlib;
use crate::value::{from_bool, RuntimeError, Value};

impl Interpreter {
    /// Evaluate an expression
    pub(super) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(lit.value),
            Expr::Variable(id) => self.env.lookup(&id.name).map_err(|e| env_error(e, id.line)),
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Group(group) => self.eval_expr(&group.expr),
            Expr::Call(call) => self.eval_call(call),
            Expr::Input(line) => self.io.read_int(*line),
        }
    }

    /// Evaluate a binary expression; both operands are always evaluated, left first
    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value, RuntimeError> {
        let left = self.eval_expr(&binary.left)?;
        let right = self.eval_expr(&binary.right)?;
        apply_binary(binary.op, left, right, binary.line)
    }

    fn eval_unary(&mut self, unary: &UnaryExpr) -> Result<Value, RuntimeError> {
        let operand = self.eval_expr(&unary.expr)?;
        match unary.op {
            UnaryOp::Negate => operand.checked_neg().ok_or(RuntimeError::Overflow {
                op: unary.op.as_str(),
                line: unary.line,
            }),
        }
    }

    /// Evaluate a call: arguments left to right, then builtins before user functions
    pub(super) fn eval_call(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        let args = call
            .args
            .iter()
            .map(|arg| self.eval_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;

        if stdlib::is_builtin(&call.callee) {
            return stdlib::call_builtin(&call.callee, &args, call.line, &mut self.io);
        }

        self.call_function(&call.callee, args, call.line)
    }

    /// Call a user-defined function
    pub(super) fn call_user_function(
        &mut self,
        func: &FunctionDecl,
        args: Vec<Value>,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        if args.len() != func.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: func.name.clone(),
                expected: func.params.len(),
                found: args.len(),
                line,
            });
        }

        if self.env.call_depth() >= self.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.max_call_depth,
                line,
            });
        }

        log::trace!("call {}({:?}) at line {}", func.name, args, line);
        self.stats.calls += 1;

        let flow = self.with_call(|this| {
            this.stats.max_call_depth = this.stats.max_call_depth.max(this.env.call_depth());
            for (param, arg) in func.params.iter().zip(args) {
                this.env
                    .declare(param, arg)
                    .map_err(|e| env_error(e, func.line))?;
            }
            this.exec_block(&func.body)
        })?;

        Ok(match flow {
            ControlFlow::Return(value) => value,
            ControlFlow::Continue => 0,
        })
    }
}

/// Apply a binary operator with overflow and zero-divisor checks
pub(super) fn apply_binary(
    op: BinaryOp,
    left: Value,
    right: Value,
    line: usize,
) -> Result<Value, RuntimeError> {
    let overflow = || RuntimeError::Overflow {
        op: op.as_str(),
        line,
    };

    match op {
        BinaryOp::Add => left.checked_add(right).ok_or_else(overflow),
        BinaryOp::Sub => left.checked_sub(right).ok_or_else(overflow),
        BinaryOp::Mul => left.checked_mul(right).ok_or_else(overflow),
        BinaryOp::Div => {
            if right == 0 {
                return Err(RuntimeError::DivideByZero { line });
            }
            left.checked_div(right).ok_or_else(overflow)
        }
        BinaryOp::Mod => {
            if right == 0 {
                return Err(RuntimeError::DivideByZero { line });
            }
            left.checked_rem(right).ok_or_else(overflow)
        }
        BinaryOp::Eq => Ok(from_bool(left == right)),
        BinaryOp::Ne => Ok(from_bool(left != right)),
        BinaryOp::Lt => Ok(from_bool(left < right)),
        BinaryOp::Le => Ok(from_bool(left <= right)),
        BinaryOp::Gt => Ok(from_bool(left > right)),
        BinaryOp::Ge => Ok(from_bool(left >= right)),
    }
}
