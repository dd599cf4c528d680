//! Builtin function tests

mod common;

use common::*;
use common::assert_eq;
use rstest::rstest;

#[rstest]
#[case("abs(-7)", 7)]
#[case("abs(0)", 0)]
#[case("abs(12)", 12)]
#[case("max(4, 9)", 9)]
#[case("max(12, 3)", 12)]
#[case("max(-1, -1)", -1)]
#[case("min(4, 9)", 4)]
#[case("min(-4, 9)", -4)]
#[case("max(abs(-3), min(10, 2))", 3)]
fn test_builtin_values(#[case] expr: &str, #[case] expected: i64) {
    assert_eq!(eval_expr(expr), Ok(expected), "expression: {}", expr);
}

#[rstest]
#[case::abs_two_args("abs(1, 2)")]
#[case::abs_no_args("abs()")]
#[case::max_one_arg("max(1)")]
#[case::min_three_args("min(1, 2, 3)")]
#[case::print_no_args("print()")]
fn test_builtin_arity_errors(#[case] expr: &str) {
    let diags = eval_expr(expr).unwrap_err();
    assert_eq!(diags[0].code, "SP3003", "expression: {}", expr);
}

#[test]
fn test_arity_error_message() {
    let diags = eval_expr("abs(1, 2)").unwrap_err();
    insta::assert_snapshot!(diags[0].message, @"Function 'abs' expects 1 argument, got 2");
}

#[test]
fn test_abs_of_minimum_overflows() {
    let diags = eval_expr("abs(-9223372036854775807 - 1)").unwrap_err();
    assert_eq!(diags[0].code, "SP3006");
}

#[test]
fn test_print_call_writes_and_returns_argument() {
    let output = run("function entry() { var x <- print(41) + 1; return x; }");
    assert_eq!(output.result, Ok(42));
    assert_eq!(output.stdout, "41\nReturned value: 42\n");
}

#[test]
fn test_print_statement_with_parenthesized_start() {
    let output = run("print (1) + 1;\nfunction entry() { return 0; }");
    assert_eq!(output.stdout, "2\nReturned value: 0\n");
}

#[test]
fn test_input_call_as_argument() {
    let output = run_with_input("function entry() { return max(input(), input); }", "3 8");
    assert_eq!(output.result, Ok(8));
}

#[test]
fn test_builtin_names_stay_free_for_variables() {
    assert_entry_returns("var max_seen <- max(2, 5); return max_seen;", 5);
}
