use crate::grammar::ArgParser;
use crate::ir::{Arg, BinOp, Expr};

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Value {
    pub val: i64,
}

impl Value {
    pub fn new(val: i64) -> Self {
        Value { val }
    }

    fn checked(res: Option<i64>, err: EvalError) -> Result<Value, EvalError> {
        res.map(Value::new).ok_or(err)
    }
}

impl std::ops::Add<Value> for Value {
    type Output = Result<Value, EvalError>;
    fn add(self, rhs: Value) -> Self::Output {
        Self::checked(self.val.checked_add(rhs.val), EvalError::Overflow(self, BinOp::Add, rhs))
    }
}

impl std::ops::Sub<Value> for Value {
    type Output = Result<Value, EvalError>;
    fn sub(self, rhs: Value) -> Self::Output {
        Self::checked(self.val.checked_sub(rhs.val), EvalError::Overflow(self, BinOp::Sub, rhs))
    }
}

impl std::ops::Mul<Value> for Value {
    type Output = Result<Value, EvalError>;
    fn mul(self, rhs: Value) -> Self::Output {
        Self::checked(self.val.checked_mul(rhs.val), EvalError::Overflow(self, BinOp::Mul, rhs))
    }
}

// Truncates toward zero.
impl std::ops::Div<Value> for Value {
    type Output = Result<Value, EvalError>;
    fn div(self, rhs: Value) -> Self::Output {
        if rhs.val == 0 {
            return Err(EvalError::DivisionByZero);
        }
        Self::checked(self.val.checked_div(rhs.val), EvalError::Overflow(self, BinOp::Div, rhs))
    }
}

// Takes the sign of the divisor, so -1 % 4096 == 4095.
impl std::ops::Rem<Value> for Value {
    type Output = Result<Value, EvalError>;
    fn rem(self, rhs: Value) -> Self::Output {
        if rhs.val == 0 {
            return Err(EvalError::DivisionByZero);
        }
        let rem = self.val
            .checked_rem(rhs.val)
            .ok_or(EvalError::Overflow(self, BinOp::Rem, rhs))?;
        if rem != 0 && (rem < 0) != (rhs.val < 0) {
            Ok(Value::new(rem + rhs.val))
        } else {
            Ok(Value::new(rem))
        }
    }
}

impl std::ops::Neg for Value {
    type Output = Result<Value, EvalError>;
    fn neg(self) -> Self::Output {
        Self::checked(self.val.checked_neg(), EvalError::Overflow(Value::new(0), BinOp::Sub, self))
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Undefined label '{0}'")]
    UndefinedLabel(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow evaluating {} {} {}", .0.val, .1.to_char(), .2.val)]
    Overflow(Value, BinOp, Value),

    #[error("Syntax error: {0}")]
    Syntax(String),
}

pub fn parse_arg(text: &str) -> Result<Arg, EvalError> {
    ArgParser::new()
        .parse(text)
        .map_err(|e| EvalError::Syntax(e.to_string()))
}

// Labels are the only names an expression can refer to.
pub fn eval_expr(expr: &Expr, labels: &HashMap<String, u32>) -> Result<Value, EvalError> {
    match expr {
        Expr::Num(val) => Ok(Value::new(*val)),
        Expr::Label(label) => labels
            .get(label)
            .map(|addr| Value::new(i64::from(*addr)))
            .ok_or_else(|| EvalError::UndefinedLabel(label.clone())),
        Expr::Neg(expr) => {
            let val = eval_expr(expr, labels)?;
            -val
        },
        Expr::Op(lhs, op, rhs) => {
            let lhs = eval_expr(lhs, labels)?;
            let rhs = eval_expr(rhs, labels)?;
            match op {
                BinOp::Add => lhs + rhs,
                BinOp::Sub => lhs - rhs,
                BinOp::Mul => lhs * rhs,
                BinOp::Div => lhs / rhs,
                BinOp::Rem => lhs % rhs,
            }
        },
    }
}
