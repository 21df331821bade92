//! # Symbolic Engine Module
//!
//! Core expression representation for the symbolic mathematics engine. An
//! expression is an immutable tree of [`Expr`] nodes: constants, named
//! variables, binary operations drawn from the closed set `{+, -, *, /, ^}`
//! and unary functions drawn from the closed set `{sin, cos, ln, exp}`.
//!
//! ## Main structures
//!
//! ### `Expr` enum
//! The core symbolic expression type:
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Variables**: `Var(String)` - symbolic variables like "x", "y"
//! - **Operations**: `Binary(BinaryOp, ..)` - arithmetic over two subtrees
//! - **Functions**: `Unary(UnaryFn, ..)` - elementary function of one subtree
//!
//! Children are held behind `Arc<Expr>`, so a subtree can be referenced by
//! several parents at once. Differentiation relies on this: the product and
//! quotient rules reuse an operand next to its derivative by bumping the
//! reference count, never by copying the subtree. Nodes are never mutated
//! after construction, which also makes read-only traversal of one tree safe
//! from multiple threads.
//!
//! ### Builders
//! All node creation goes through the pure associated constructors
//! (`constant`, `variable`, `binary`, `unary`) and their arithmetic sugar
//! (`add`, `sub`, `mul`, `div`, `pow`, `sin`, `cos`, `ln`, `exp`). The closed
//! `BinaryOp`/`UnaryFn` enums make an out-of-set operator or function
//! structurally unrepresentable; the fallible `from_symbol`/`from_name`
//! conversions are the only place such a request can even be expressed.
//!
//! ### Rendering
//! `Display` produces the canonical textual form: fully parenthesized, every
//! constant printed with exactly six fractional digits. The form is
//! unambiguous, round-trips through the parser, and makes derivative output
//! pinnable as literal strings in tests.

use std::fmt;
use std::sync::Arc;

use crate::symbolic::errors::ExprError;

/// Maximum nesting depth accepted by the parser, the evaluator and the
/// differentiator before they fail with `RecursionLimitExceeded`.
pub const MAX_DEPTH: usize = 256;

/// Binary operator of an expression node. The set is closed: there is no way
/// to construct an operation outside `{+, -, *, /, ^}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    /// The single-character spelling used by the renderer and the parser.
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self, ExprError> {
        match symbol {
            '+' => Ok(BinaryOp::Add),
            '-' => Ok(BinaryOp::Sub),
            '*' => Ok(BinaryOp::Mul),
            '/' => Ok(BinaryOp::Div),
            '^' => Ok(BinaryOp::Pow),
            other => Err(ExprError::InvalidOperator(other)),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Unary elementary function of an expression node. Closed set, like
/// [`BinaryOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFn {
    Sin,
    Cos,
    Ln,
    Exp,
}

impl UnaryFn {
    /// The spelling used by the renderer and recognized by the parser in call
    /// position.
    pub fn name(&self) -> &'static str {
        match self {
            UnaryFn::Sin => "sin",
            UnaryFn::Cos => "cos",
            UnaryFn::Ln => "ln",
            UnaryFn::Exp => "exp",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ExprError> {
        match name {
            "sin" => Ok(UnaryFn::Sin),
            "cos" => Ok(UnaryFn::Cos),
            "ln" => Ok(UnaryFn::Ln),
            "exp" => Ok(UnaryFn::Exp),
            other => Err(ExprError::InvalidFunction(other.to_string())),
        }
    }
}

impl fmt::Display for UnaryFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Core symbolic expression enum representing mathematical expressions as an
/// abstract syntax tree.
///
/// Exactly four variants, each carrying only its own payload: a constant or a
/// variable at the leaves, an operator or a function at the inner nodes.
///
/// # Examples
/// ```
/// use symbolic_diff::symbolic::symbolic_engine::Expr;
/// let x = Expr::variable("x").unwrap();
/// let expr = Expr::add(x, Expr::constant(2.0));
/// assert_eq!(expr.to_string(), "(x + 2.000000)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numerical constant value
    Const(f64),
    /// Symbolic variable with a name (e.g., "x", "y", "velocity")
    Var(String),
    /// Binary operation: left op right
    Binary(BinaryOp, Arc<Expr>, Arc<Expr>),
    /// Elementary function applied to one operand
    Unary(UnaryFn, Arc<Expr>),
}

/// Display implementation producing the canonical textual form.
///
/// Every binary operation is parenthesized unconditionally and every constant
/// is printed with six fractional digits, so the output is unambiguous and
/// parses back to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(val) => write!(f, "{:.6}", val),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Unary(fun, arg) => write!(f, "{}({})", fun, arg),
        }
    }
}

impl Expr {
    /// BUILDERS

    /// Creates a constant node.
    pub fn constant(value: f64) -> Arc<Expr> {
        Arc::new(Expr::Const(value))
    }

    /// Creates a variable node.
    ///
    /// The name must be a non-empty identifier: a letter or underscore
    /// followed by letters, digits or underscores. Anything else is rejected
    /// with `InvalidIdentifier`.
    pub fn variable(name: &str) -> Result<Arc<Expr>, ExprError> {
        if !is_valid_identifier(name) {
            return Err(ExprError::InvalidIdentifier(name.to_string()));
        }
        Ok(Arc::new(Expr::Var(name.to_string())))
    }

    /// Creates a binary operation node referencing both operands as-is.
    pub fn binary(op: BinaryOp, lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Expr> {
        Arc::new(Expr::Binary(op, lhs, rhs))
    }

    /// Creates a unary function node referencing the operand as-is.
    pub fn unary(fun: UnaryFn, arg: Arc<Expr>) -> Arc<Expr> {
        Arc::new(Expr::Unary(fun, arg))
    }

    pub fn add(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Expr> {
        Expr::binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Expr> {
        Expr::binary(BinaryOp::Sub, lhs, rhs)
    }

    pub fn mul(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Expr> {
        Expr::binary(BinaryOp::Mul, lhs, rhs)
    }

    pub fn div(lhs: Arc<Expr>, rhs: Arc<Expr>) -> Arc<Expr> {
        Expr::binary(BinaryOp::Div, lhs, rhs)
    }

    pub fn pow(base: Arc<Expr>, exponent: Arc<Expr>) -> Arc<Expr> {
        Expr::binary(BinaryOp::Pow, base, exponent)
    }

    pub fn sin(arg: Arc<Expr>) -> Arc<Expr> {
        Expr::unary(UnaryFn::Sin, arg)
    }

    pub fn cos(arg: Arc<Expr>) -> Arc<Expr> {
        Expr::unary(UnaryFn::Cos, arg)
    }

    pub fn ln(arg: Arc<Expr>) -> Arc<Expr> {
        Expr::unary(UnaryFn::Ln, arg)
    }

    pub fn exp(arg: Arc<Expr>) -> Arc<Expr> {
        Expr::unary(UnaryFn::Exp, arg)
    }

    /// INSPECTION

    /// Checks if the expression mentions a variable anywhere in the tree.
    ///
    /// Structural scan only; no constant folding is attempted. The power rule
    /// uses this to decide between the ordinary and the generalized exponent
    /// case.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Binary(_, lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            Expr::Unary(_, arg) => arg.contains_variable(var_name),
        }
    }

    /// Returns the names of all variables in the expression, sorted and
    /// deduplicated.
    pub fn variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, out: &mut Vec<String>) {
            match expr {
                Expr::Var(name) => out.push(name.clone()),
                Expr::Const(_) => {}
                Expr::Binary(_, lhs, rhs) => {
                    collect(lhs, out);
                    collect(rhs, out);
                }
                Expr::Unary(_, arg) => collect(arg, out),
            }
        }
        let mut vars = Vec::new();
        collect(self, &mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    /// Renders the expression to its canonical string form.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
