/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use symbolic_diff::symbolic::symbolic_engine::Expr;
/// let input = "x ^ 2.3 * ln(x + y)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the symbolic expression tree and its builders
/// 2) renders a symbolic expression into a canonical string for printing and control of results
///# Example
/// ```
/// use symbolic_diff::symbolic::symbolic_engine::Expr;
/// let expr = Expr::mul(Expr::variable("x").unwrap(), Expr::sin(Expr::variable("x").unwrap()));
/// assert_eq!(expr.render(), "(x * sin(x))");
/// ```
pub mod symbolic_engine;
///____________________________________________________________________________________________________________________________
/// analytical differentiation and direct evaluation of symbolic expressions
///# Example
/// ```
/// use symbolic_diff::symbolic::symbolic_engine::Expr;
/// use std::collections::HashMap;
/// let expr = Expr::parse_expression("x * sin(x)").unwrap();
/// let derivative = expr.diff("x").unwrap();
/// assert_eq!(derivative.render(), "((x * cos(x)) + sin(x))");
/// let bindings = HashMap::from([("x".to_string(), 0.0)]);
/// assert_eq!(expr.evaluate(&bindings).unwrap(), 0.0);
/// ```
pub mod symbolic_engine_derivatives;
///____________________________________________________________________________________________________________________________
/// typed failures shared by the builders, parser, evaluator and differentiator
pub mod errors;
///____________________________________________________________________________________________________________________________
/// test suite for builders, rendering, differentiation and evaluation
pub mod symbolic_engine_tests;
