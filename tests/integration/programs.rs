//! Integration tests running complete programs.
//!
//! Component: Interpreter (whole-program runs)
//!
//! Every program lives in `demos/` and is loaded the way the CLI loads it.

#![cfg(test)]

use crate::common::*;

use shoal::*;

#[test]
fn hello_world() {
    assert_eq!(run_demo("hello", "", Input::empty()), "hello, world!");
}

#[test]
fn factorial_of_ten() {
    assert_eq!(run_demo("factorial", "", vec![10]), "3628800");
}

#[test]
fn factorial_of_zero() {
    assert_eq!(run_demo("factorial", "", vec![0]), "1");
}

#[test]
fn fizzbuzz_to_one_hundred() {
    let expected: String = (1..=100)
        .map(|i| match (i % 3, i % 5) {
            (0, 0) => "FizzBuzz\n".to_string(),
            (0, _) => "Fizz\n".to_string(),
            (_, 0) => "Buzz\n".to_string(),
            _ => format!("{}\n", i),
        })
        .collect();
    assert_eq!(run_demo("fizzbuzz", "", Input::empty()), expected);
}

#[test]
fn brainfuck_increment_and_print() {
    let program = format!("{}.", "+".repeat(97));
    assert_eq!(run_demo("brainfuck", program.as_str(), Input::empty()), "a");
}

#[test]
fn brainfuck_moves_between_cells() {
    let program = format!("{}>{}.<.", "+".repeat(66), "+".repeat(67));
    assert_eq!(run_demo("brainfuck", program.as_str(), Input::empty()), "CB");
}

#[test]
fn single_quote_quine() {
    let source = load_demo("quine");
    let out = run(&source, "", Input::empty());
    assert_eq!(out, source);
    assert_eq!(run(&source, out.as_str(), Input::empty()), out);
}

#[test]
fn double_quote_quine() {
    let source = load_demo("quine_double");
    let out = run(&source, "", Input::empty());
    assert_eq!(out, source);
    assert_eq!(run(&source, out.as_str(), Input::empty()), out);
}

#[test]
fn square_root_by_newton_iteration() {
    let out = run_demo("sqrt", "", vec![2]);
    let root: f64 = out.parse().expect("numeric output");
    assert!((root - std::f64::consts::SQRT_2).abs() < 1e-12, "got {}", out);
}

#[test]
fn demos_render_as_loaded() {
    let source = load_demo("factorial");
    let rendered = interpreter(&source).render();
    let first_row = rendered.lines().next().unwrap_or_default();
    assert_eq!(first_row.trim_end(), "1$v");
    assert_eq!(rendered.lines().count(), source.lines().count());
}
