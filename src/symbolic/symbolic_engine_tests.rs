//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::errors::ExprError;
    use crate::symbolic::symbolic_engine::{BinaryOp, Expr, UnaryFn};
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn var(name: &str) -> Arc<Expr> {
        Expr::variable(name).unwrap()
    }

    //___________________________________BUILDERS____________________________________

    #[test]
    fn test_variable_rejects_empty_name() {
        let err = Expr::variable("").unwrap_err();
        assert_eq!(err, ExprError::InvalidIdentifier("".to_string()));
    }

    #[test]
    fn test_variable_rejects_leading_digit() {
        let err = Expr::variable("2x").unwrap_err();
        assert_eq!(err, ExprError::InvalidIdentifier("2x".to_string()));
    }

    #[test]
    fn test_variable_rejects_embedded_operator() {
        assert!(Expr::variable("a-b").is_err());
    }

    #[test]
    fn test_variable_accepts_underscore_prefix() {
        assert!(Expr::variable("_x1").is_ok());
    }

    #[test]
    fn test_operator_from_symbol() {
        assert_eq!(BinaryOp::from_symbol('^').unwrap(), BinaryOp::Pow);
        assert_eq!(
            BinaryOp::from_symbol('%').unwrap_err(),
            ExprError::InvalidOperator('%')
        );
    }

    #[test]
    fn test_function_from_name() {
        assert_eq!(UnaryFn::from_name("ln").unwrap(), UnaryFn::Ln);
        assert_eq!(
            UnaryFn::from_name("tan").unwrap_err(),
            ExprError::InvalidFunction("tan".to_string())
        );
    }

    #[test]
    fn test_builders_share_subtrees() {
        let x = var("x");
        let sum = Expr::add(x.clone(), x.clone());
        match &*sum {
            Expr::Binary(BinaryOp::Add, lhs, rhs) => {
                assert!(Arc::ptr_eq(lhs, rhs));
                assert!(Arc::ptr_eq(lhs, &x));
            }
            other => panic!("expected an addition node, got {:?}", other),
        }
    }

    //___________________________________RENDERING____________________________________

    #[test]
    fn test_render_constant_fixed_precision() {
        assert_eq!(Expr::constant(5.8).render(), "5.800000");
    }

    #[test]
    fn test_render_variable_verbatim() {
        assert_eq!(Expr::parse_expression("x").unwrap().render(), "x");
    }

    #[test]
    fn test_render_binary_operations() {
        let x = var("x");
        let y = var("y");
        assert_eq!(Expr::add(x.clone(), y.clone()).render(), "(x + y)");
        assert_eq!(Expr::sub(x.clone(), y.clone()).render(), "(x - y)");
        assert_eq!(Expr::mul(x.clone(), y.clone()).render(), "(x * y)");
        assert_eq!(Expr::div(x.clone(), y.clone()).render(), "(x / y)");
        assert_eq!(Expr::pow(x, y).render(), "(x ^ y)");
    }

    #[test]
    fn test_render_functions() {
        let x = var("x");
        assert_eq!(Expr::sin(x.clone()).render(), "sin(x)");
        assert_eq!(Expr::cos(x.clone()).render(), "cos(x)");
        assert_eq!(Expr::ln(x.clone()).render(), "ln(x)");
        assert_eq!(Expr::exp(x).render(), "exp(x)");
    }

    #[test]
    fn test_render_is_fully_parenthesized() {
        let expr = Expr::parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(expr.render(), "(1.000000 + (2.000000 * 3.000000))");
    }

    #[test]
    fn test_render_parse_round_trip_is_idempotent() {
        let trees = vec![
            Expr::constant(-2.5),
            var("velocity"),
            Expr::pow(var("x"), Expr::sub(var("y"), Expr::constant(1.0))),
            Expr::div(Expr::sin(var("x")), Expr::add(var("x"), Expr::constant(1.0))),
            Expr::exp(Expr::ln(Expr::mul(var("a"), var("b")))),
        ];
        for tree in trees {
            let rendered = tree.render();
            let reparsed = Expr::parse_expression(&rendered).unwrap();
            assert_eq!(reparsed.render(), rendered);
            assert_eq!(reparsed, tree);
        }
    }

    //___________________________________EVALUATION____________________________________

    #[test]
    fn test_evaluate_arithmetic() {
        let expr = Expr::parse_expression("x * y + x").unwrap();
        let result = expr.evaluate(&bindings(&[("x", 2.0), ("y", 3.0)])).unwrap();
        assert_relative_eq!(result, 8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_evaluate_power() {
        let expr = Expr::parse_expression("2 ^ 10").unwrap();
        assert_relative_eq!(expr.evaluate(&bindings(&[])).unwrap(), 1024.0);
    }

    #[test]
    fn test_evaluate_negative_base_fractional_exponent_is_nan() {
        let expr = Expr::parse_expression("(0 - 2) ^ 0.5").unwrap();
        // NaN is a legitimate floating-point result here, not an error
        assert!(expr.evaluate(&bindings(&[])).unwrap().is_nan());
    }

    #[test]
    fn test_evaluate_functions() {
        let expr = Expr::parse_expression("sin(x) + cos(x)").unwrap();
        let result = expr.evaluate(&bindings(&[("x", 0.0)])).unwrap();
        assert_relative_eq!(result, 1.0, epsilon = 1e-12);

        let expr = Expr::parse_expression("ln(exp(x))").unwrap();
        let result = expr.evaluate(&bindings(&[("x", 3.5)])).unwrap();
        assert_relative_eq!(result, 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        let expr = Expr::parse_expression("1 / 0").unwrap();
        assert_eq!(
            expr.evaluate(&bindings(&[])).unwrap_err(),
            ExprError::DivisionByZero
        );
    }

    #[test]
    fn test_evaluate_division_by_zero_variable() {
        let expr = Expr::parse_expression("x / y").unwrap();
        assert_eq!(
            expr.evaluate(&bindings(&[("x", 1.0), ("y", 0.0)])).unwrap_err(),
            ExprError::DivisionByZero
        );
    }

    #[test]
    fn test_evaluate_ln_domain() {
        let at_zero = Expr::parse_expression("ln(0)").unwrap();
        assert_eq!(
            at_zero.evaluate(&bindings(&[])).unwrap_err(),
            ExprError::DomainError(0.0)
        );
        let negative = Expr::parse_expression("ln(-1)").unwrap();
        assert_eq!(
            negative.evaluate(&bindings(&[])).unwrap_err(),
            ExprError::DomainError(-1.0)
        );
    }

    #[test]
    fn test_evaluate_undefined_variable() {
        let expr = Expr::parse_expression("x").unwrap();
        assert_eq!(
            expr.evaluate(&bindings(&[])).unwrap_err(),
            ExprError::UndefinedVariable("x".to_string())
        );
    }

    #[test]
    fn test_evaluate_is_repeatable_with_different_bindings() {
        let expr = Expr::parse_expression("x ^ 2").unwrap();
        assert_relative_eq!(expr.evaluate(&bindings(&[("x", 2.0)])).unwrap(), 4.0);
        assert_relative_eq!(expr.evaluate(&bindings(&[("x", 3.0)])).unwrap(), 9.0);
        assert_relative_eq!(expr.evaluate(&bindings(&[("x", 2.0)])).unwrap(), 4.0);
    }

    //___________________________________DIFFERENTIATION____________________________________

    #[test]
    fn test_diff_constant_is_zero() {
        for c in [0.0, 1.0, -3.25, 1e6] {
            let derivative = Expr::constant(c).diff("x").unwrap();
            assert_eq!(derivative.render(), "0.000000");
        }
    }

    #[test]
    fn test_diff_variable() {
        assert_eq!(var("x").diff("x").unwrap().render(), "1.000000");
        assert_eq!(var("y").diff("x").unwrap().render(), "0.000000");
    }

    #[test]
    fn test_diff_sum_keeps_both_terms() {
        let expr = Expr::parse_expression("x + y").unwrap();
        assert_eq!(expr.diff("x").unwrap().render(), "(1.000000 + 0.000000)");
    }

    #[test]
    fn test_diff_product_rule_term_order() {
        let expr = Expr::parse_expression("x * sin(x)").unwrap();
        assert_eq!(expr.diff("x").unwrap().render(), "((x * cos(x)) + sin(x))");
    }

    #[test]
    fn test_diff_quotient_rule() {
        let expr = Expr::parse_expression("x / y").unwrap();
        assert_eq!(
            expr.diff("x").unwrap().render(),
            "((y - (x * 0.000000)) / (y * y))"
        );
    }

    #[test]
    fn test_diff_power_rule_constant_exponent() {
        let expr = Expr::parse_expression("x ^ 2").unwrap();
        assert_eq!(
            expr.diff("x").unwrap().render(),
            "(2.000000 * (x ^ (2.000000 - 1.000000)))"
        );
    }

    #[test]
    fn test_diff_power_rule_foreign_variable_exponent() {
        // exponent mentions a variable, but not the differentiation variable
        let expr = Expr::parse_expression("x ^ n").unwrap();
        assert_eq!(
            expr.diff("x").unwrap().render(),
            "(n * (x ^ (n - 1.000000)))"
        );
    }

    #[test]
    fn test_diff_generalized_exponent_rule() {
        let expr = Expr::parse_expression("x ^ x").unwrap();
        assert_eq!(
            expr.diff("x").unwrap().render(),
            "((x ^ x) * (ln(x) + (x * (1.000000 / x))))"
        );
    }

    #[test]
    fn test_diff_sin() {
        let expr = Expr::parse_expression("sin(x)").unwrap();
        assert_eq!(expr.diff("x").unwrap().render(), "cos(x)");
    }

    #[test]
    fn test_diff_cos_has_negative_sign() {
        let expr = Expr::parse_expression("cos(x)").unwrap();
        assert_eq!(expr.diff("x").unwrap().render(), "(0.000000 - sin(x))");
    }

    #[test]
    fn test_diff_ln() {
        let expr = Expr::parse_expression("ln(x)").unwrap();
        assert_eq!(expr.diff("x").unwrap().render(), "(1.000000 / x)");
    }

    #[test]
    fn test_diff_exp() {
        let expr = Expr::parse_expression("exp(x)").unwrap();
        assert_eq!(expr.diff("x").unwrap().render(), "exp(x)");
    }

    #[test]
    fn test_diff_chain_rule() {
        let expr = Expr::parse_expression("sin(x ^ 2)").unwrap();
        assert_eq!(
            expr.diff("x").unwrap().render(),
            "(cos((x ^ 2.000000)) * (2.000000 * (x ^ (2.000000 - 1.000000))))"
        );
    }

    #[test]
    fn test_diff_does_not_mutate_input() {
        let expr = Expr::parse_expression("x * sin(x)").unwrap();
        let before = expr.render();
        let _ = expr.diff("x").unwrap();
        assert_eq!(expr.render(), before);
    }

    #[test]
    fn test_diff_shares_operand_subtrees() {
        // d/dx (x * y) reuses the untouched operand y rather than copying it
        let x = var("x");
        let y = var("y");
        let expr = Expr::mul(x, y.clone());
        let derivative = expr.diff("x").unwrap();
        match &*derivative {
            Expr::Binary(BinaryOp::Add, _, second) => assert!(Arc::ptr_eq(second, &y)),
            other => panic!("expected a sum of product-rule terms, got {:?}", other),
        }
    }

    #[test]
    fn test_diff_result_is_numerically_consistent() {
        let expr = Expr::parse_expression("x ^ 3 + sin(x)").unwrap();
        let derivative = expr.diff("x").unwrap();
        // d/dx = 3x^2 + cos(x), checked at x = 1.3
        let x = 1.3_f64;
        let result = derivative.evaluate(&bindings(&[("x", x)])).unwrap();
        assert_relative_eq!(result, 3.0 * x * x + x.cos(), epsilon = 1e-9);
    }

    #[test]
    fn test_diff_of_rendered_derivative_round_trips() {
        let expr = Expr::parse_expression("x * sin(x)").unwrap();
        let derivative = expr.diff("x").unwrap();
        let reparsed = Expr::parse_expression(&derivative.render()).unwrap();
        let result = reparsed.evaluate(&bindings(&[("x", 0.5)])).unwrap();
        assert_relative_eq!(
            result,
            0.5_f64 * 0.5_f64.cos() + 0.5_f64.sin(),
            epsilon = 1e-9
        );
    }

    //___________________________________DEPTH LIMITS____________________________________

    fn deeply_nested_sin(levels: usize) -> Arc<Expr> {
        let mut expr = var("x");
        for _ in 0..levels {
            expr = Expr::sin(expr);
        }
        expr
    }

    #[test]
    fn test_evaluate_depth_limit() {
        let expr = deeply_nested_sin(400);
        assert_eq!(
            expr.evaluate(&bindings(&[("x", 1.0)])).unwrap_err(),
            ExprError::RecursionLimitExceeded
        );
    }

    #[test]
    fn test_diff_depth_limit() {
        let expr = deeply_nested_sin(400);
        assert_eq!(expr.diff("x").unwrap_err(), ExprError::RecursionLimitExceeded);
    }

    #[test]
    fn test_moderate_nesting_is_fine() {
        let expr = deeply_nested_sin(100);
        assert!(expr.evaluate(&bindings(&[("x", 1.0)])).is_ok());
        assert!(expr.diff("x").is_ok());
    }

    //___________________________________INSPECTION____________________________________

    #[test]
    fn test_contains_variable() {
        let expr = Expr::parse_expression("x ^ (y + 1)").unwrap();
        assert!(expr.contains_variable("x"));
        assert!(expr.contains_variable("y"));
        assert!(!expr.contains_variable("z"));
    }

    #[test]
    fn test_variables_sorted_and_deduplicated() {
        let expr = Expr::parse_expression("y * x + sin(x) / y").unwrap();
        assert_eq!(expr.variables(), vec!["x".to_string(), "y".to_string()]);
    }
}
