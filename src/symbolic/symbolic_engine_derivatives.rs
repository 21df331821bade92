//! # Symbolic Engine Derivatives Module
//!
//! Extends the symbolic engine with analytical differentiation and direct
//! evaluation of expression trees.
//!
//! ## Key methods
//!
//! - `diff(var)` - analytical derivative with respect to one variable,
//!   returned as a brand-new tree that shares operand subtrees with the input
//! - `evaluate(bindings)` - post-order numeric evaluation under a
//!   name-to-value binding environment
//!
//! Both walks are pure: the input tree is never mutated, two evaluations with
//! different bindings never interfere, and the same tree can be walked
//! concurrently from several threads. Both walks are depth-guarded and fail
//! with `RecursionLimitExceeded` on adversarially deep input instead of
//! overflowing the stack.
//!
//! ## Differentiation rules
//!
//! The full set of calculus rules is implemented by exhaustive matching:
//! sum/difference rules, product rule, quotient rule, chain rule for the
//! elementary functions, and a case split on the exponent for powers. The
//! ordinary power rule `g * f^(g-1) * f'` is only valid while the exponent
//! does not mention the differentiation variable; otherwise the generalized
//! rule `f^g * (g'*ln(f) + g*(f'/f))` is used. The split is decided by a
//! structural scan of the exponent subtree.
//!
//! Results are not simplified, with one pinned exception: a product whose
//! factor is the derivative constant `1.0` collapses to the other factor, so
//! `d/dx (x * sin(x))` renders as `((x * cos(x)) + sin(x))`. Everything else
//! (`0 + x`, `x * 0.000000`, ...) is left exactly as built, which keeps the
//! output shape deterministic and literally testable.

use std::collections::HashMap;
use std::sync::Arc;

use crate::symbolic::errors::ExprError;
use crate::symbolic::symbolic_engine::{BinaryOp, Expr, MAX_DEPTH, UnaryFn};

/// Product-term assembly for the differentiator. A factor that is exactly the
/// constant 1.0 (the derivative of the differentiation variable) is dropped;
/// no other rewriting happens here.
fn mul_term(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Expr> {
    if matches!(&*lhs, Expr::Const(v) if *v == 1.0) {
        return rhs;
    }
    if matches!(&*rhs, Expr::Const(v) if *v == 1.0) {
        return lhs;
    }
    Expr::mul(lhs, rhs)
}

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a
    /// variable.
    ///
    /// The result is a new tree; operand subtrees of the input are reused in
    /// place (reference-counted, not copied) wherever a rule needs the operand
    /// next to its derivative.
    ///
    /// # Examples
    /// ```
    /// use symbolic_diff::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("x * sin(x)").unwrap();
    /// let df = f.diff("x").unwrap();
    /// assert_eq!(df.to_string(), "((x * cos(x)) + sin(x))");
    /// ```
    pub fn diff(&self, var: &str) -> Result<Arc<Expr>, ExprError> {
        self.diff_at(var, 0)
    }

    fn diff_at(&self, var: &str, depth: usize) -> Result<Arc<Expr>, ExprError> {
        if depth > MAX_DEPTH {
            return Err(ExprError::RecursionLimitExceeded);
        }
        let result = match self {
            Expr::Const(_) => Expr::constant(0.0),
            Expr::Var(name) => {
                if name == var {
                    Expr::constant(1.0)
                } else {
                    Expr::constant(0.0)
                }
            }
            Expr::Binary(op, lhs, rhs) => match op {
                BinaryOp::Add => Expr::add(
                    lhs.diff_at(var, depth + 1)?,
                    rhs.diff_at(var, depth + 1)?,
                ),
                BinaryOp::Sub => Expr::sub(
                    lhs.diff_at(var, depth + 1)?,
                    rhs.diff_at(var, depth + 1)?,
                ),
                BinaryOp::Mul => {
                    let df = lhs.diff_at(var, depth + 1)?;
                    let dg = rhs.diff_at(var, depth + 1)?;
                    Expr::add(mul_term(lhs.clone(), dg), mul_term(df, rhs.clone()))
                }
                BinaryOp::Div => {
                    let df = lhs.diff_at(var, depth + 1)?;
                    let dg = rhs.diff_at(var, depth + 1)?;
                    Expr::div(
                        Expr::sub(mul_term(df, rhs.clone()), mul_term(lhs.clone(), dg)),
                        Expr::mul(rhs.clone(), rhs.clone()),
                    )
                }
                BinaryOp::Pow => {
                    let df = lhs.diff_at(var, depth + 1)?;
                    if rhs.contains_variable(var) {
                        // f^g with g depending on var: f^g * (g'*ln(f) + g*(f'/f))
                        let dg = rhs.diff_at(var, depth + 1)?;
                        Expr::mul(
                            Expr::pow(lhs.clone(), rhs.clone()),
                            Expr::add(
                                mul_term(dg, Expr::ln(lhs.clone())),
                                mul_term(rhs.clone(), Expr::div(df, lhs.clone())),
                            ),
                        )
                    } else {
                        // ordinary power rule: g * f^(g-1) * f'
                        let reduced = Expr::sub(rhs.clone(), Expr::constant(1.0));
                        mul_term(
                            Expr::mul(rhs.clone(), Expr::pow(lhs.clone(), reduced)),
                            df,
                        )
                    }
                }
            },
            Expr::Unary(fun, arg) => {
                let da = arg.diff_at(var, depth + 1)?;
                match fun {
                    UnaryFn::Sin => mul_term(Expr::cos(arg.clone()), da),
                    UnaryFn::Cos => mul_term(
                        Expr::sub(Expr::constant(0.0), Expr::sin(arg.clone())),
                        da,
                    ),
                    UnaryFn::Ln => Expr::div(da, arg.clone()),
                    UnaryFn::Exp => mul_term(Expr::exp(arg.clone()), da),
                }
            }
        };
        Ok(result)
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates the expression under a variable binding environment.
    ///
    /// Children are evaluated before their parent combines them. Failures are
    /// typed: a variable with no binding is `UndefinedVariable`, a divisor
    /// that evaluates to exactly 0.0 is `DivisionByZero` (checked before
    /// dividing, not inferred from an infinite result), and `ln` of a
    /// non-positive value is `DomainError`. A NaN from `powf` on a negative
    /// base with fractional exponent is a normal floating-point result.
    pub fn evaluate(&self, bindings: &HashMap<String, f64>) -> Result<f64, ExprError> {
        self.evaluate_at(bindings, 0)
    }

    fn evaluate_at(&self, bindings: &HashMap<String, f64>, depth: usize) -> Result<f64, ExprError> {
        if depth > MAX_DEPTH {
            return Err(ExprError::RecursionLimitExceeded);
        }
        match self {
            Expr::Const(val) => Ok(*val),
            Expr::Var(name) => bindings
                .get(name)
                .copied()
                .ok_or_else(|| ExprError::UndefinedVariable(name.clone())),
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.evaluate_at(bindings, depth + 1)?;
                let r = rhs.evaluate_at(bindings, depth + 1)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div => {
                        if r == 0.0 {
                            Err(ExprError::DivisionByZero)
                        } else {
                            Ok(l / r)
                        }
                    }
                    BinaryOp::Pow => Ok(l.powf(r)),
                }
            }
            Expr::Unary(fun, arg) => {
                let x = arg.evaluate_at(bindings, depth + 1)?;
                match fun {
                    UnaryFn::Sin => Ok(x.sin()),
                    UnaryFn::Cos => Ok(x.cos()),
                    UnaryFn::Exp => Ok(x.exp()),
                    UnaryFn::Ln => {
                        if x <= 0.0 {
                            Err(ExprError::DomainError(x))
                        } else {
                            Ok(x.ln())
                        }
                    }
                }
            }
        }
    }
}
