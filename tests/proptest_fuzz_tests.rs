//! Property-based fuzzing tests for the Ember scanner, parser and runtime
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. The scanner never panics and always ends in exactly one EOF token
//! 2. The parser never panics on arbitrary token soup
//! 3. Arithmetic and indexing agree with plain `f64`/`Vec` behaviour

use ember::runtime::number_format::format_general;
use ember::{run_source, Error, Parser, Scanner, TokenKind};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random strings that might break the scanner
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,500}").unwrap()
}

/// Generate sequences of Ember-looking tokens
fn token_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(ember_token(), 0..60).prop_map(|tokens| tokens.join(" "))
}

fn ember_token() -> impl Strategy<Value = String> {
    prop_oneof![
        // Punctuation
        Just("(".to_string()),
        Just(")".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(";".to_string()),
        Just("=".to_string()),
        // Keywords
        Just("let".to_string()),
        Just("print".to_string()),
        Just("if".to_string()),
        Just("else".to_string()),
        Just("while".to_string()),
        Just("for".to_string()),
        Just("to".to_string()),
        Just("step".to_string()),
        Just("func".to_string()),
        Just("return".to_string()),
        Just("len".to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        // Operators
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just("<=".to_string()),
        Just("&&".to_string()),
        Just("||".to_string()),
        Just("!".to_string()),
        // Literals
        (0u32..1000).prop_map(|n| n.to_string()),
        (0.0f64..100.0f64).prop_map(|f| format!("{:.2}", f)),
        r#""[a-zA-Z0-9 ]{0,10}""#.prop_map(|s| s),
        // Identifiers
        "[a-z][a-z0-9_]{0,6}".prop_map(|s| s),
        // Comments and headers
        "//[^\n]{0,10}\n".prop_map(|s| s),
        "#[^\n]{0,10}\n".prop_map(|s| s),
    ]
}

fn arith_op() -> impl Strategy<Value = (&'static str, fn(f64, f64) -> f64)> {
    prop_oneof![
        Just(("+", (|a: f64, b: f64| a + b) as fn(f64, f64) -> f64)),
        Just(("-", (|a: f64, b: f64| a - b) as fn(f64, f64) -> f64)),
        Just(("*", (|a: f64, b: f64| a * b) as fn(f64, f64) -> f64)),
        Just(("/", (|a: f64, b: f64| a / b) as fn(f64, f64) -> f64)),
    ]
}

// =============================================================================
// SCANNER AND PARSER FUZZ TESTS
// =============================================================================

proptest! {
    /// The scanner never panics and terminates the sequence with one EOF
    #[test]
    fn scanner_ends_with_single_eof(source in arbitrary_source_string()) {
        let tokens = Scanner::new(&source).scan_tokens();
        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
    }

    /// Token positions are 1-indexed and never go backwards
    #[test]
    fn scanner_positions_are_ordered(source in token_soup()) {
        let tokens = Scanner::new(&source).scan_tokens();
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].line >= 1 && pair[0].column >= 1);
            prop_assert!(
                (pair[0].line, pair[0].column) <= (pair[1].line, pair[1].column),
                "{} then {}", pair[0], pair[1]
            );
        }
    }

    /// The parser never panics on arbitrary token soup
    #[test]
    fn parser_never_panics(source in token_soup()) {
        let tokens = Scanner::new(&source).scan_tokens();
        let _ = Parser::new(tokens).parse();
    }

    /// Parser handles deeply nested parentheses
    #[test]
    fn parser_handles_deep_nesting(depth in 1usize..100) {
        let source = format!("print({}1{});", "(".repeat(depth), ")".repeat(depth));
        let mut out: Vec<u8> = Vec::new();
        run_source(&source, &mut out).unwrap();
        prop_assert_eq!(out, b"1\n".to_vec());
    }

    /// Unbalanced parentheses produce an error, never a panic
    #[test]
    fn parser_handles_unbalanced_parens(opens in 0usize..30, closes in 0usize..30) {
        let source = format!("let x = {}1{};", "(".repeat(opens), ")".repeat(closes));
        let tokens = Scanner::new(&source).scan_tokens();
        let result = Parser::new(tokens).parse();
        if opens > closes {
            prop_assert!(result.is_err());
        }
    }
}

// =============================================================================
// RUNTIME PROPERTY TESTS
// =============================================================================

proptest! {
    /// Binary arithmetic prints exactly what f64 arithmetic gives
    #[test]
    fn arithmetic_agrees_with_f64(
        a in -10_000i32..10_000,
        b in -10_000i32..10_000,
        op in arith_op()
    ) {
        let (symbol, apply) = op;
        let source = format!("print({} {} {});", a, symbol, b);
        let mut out: Vec<u8> = Vec::new();
        run_source(&source, &mut out).unwrap();

        let expected = format!("{}\n", format_general(apply(a as f64, b as f64)));
        prop_assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    /// Indexing succeeds exactly for in-bounds indices
    #[test]
    fn array_bounds_handling(
        elements in prop::collection::vec(-100i32..100, 0..20),
        index in -10i64..30
    ) {
        let items: Vec<String> = elements.iter().map(|n| n.to_string()).collect();
        let source = format!("let arr = [{}]; print(arr[{}]);", items.join(", "), index);
        let mut out: Vec<u8> = Vec::new();
        let result = run_source(&source, &mut out);

        if index >= 0 && (index as usize) < elements.len() {
            prop_assert!(result.is_ok());
            let expected = format!("{}\n", elements[index as usize]);
            prop_assert_eq!(String::from_utf8(out).unwrap(), expected);
        } else {
            prop_assert_eq!(
                result.unwrap_err(),
                Error::IndexOutOfBounds { index, length: elements.len() }
            );
        }
    }

    /// len reports the literal's element count, even after writes
    #[test]
    fn len_matches_element_count(
        elements in prop::collection::vec(0u32..100, 1..20),
        slot in 0usize..20
    ) {
        let slot = slot % elements.len();
        let items: Vec<String> = elements.iter().map(|n| n.to_string()).collect();
        let source = format!(
            "let a = [{}]; a[{}] = \"changed\"; print(len(a));",
            items.join(", "),
            slot
        );
        let mut out: Vec<u8> = Vec::new();
        run_source(&source, &mut out).unwrap();
        prop_assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", elements.len()));
    }

    /// An ascending for loop runs end - start + 1 times
    #[test]
    fn for_loop_iteration_count(start in -20i32..20, end in -20i32..20) {
        let source = format!(
            "let n = 0; for i = {} to {} {{ n = n + 1; }} print(n);",
            start, end
        );
        let mut out: Vec<u8> = Vec::new();
        run_source(&source, &mut out).unwrap();
        let expected = (end - start + 1).max(0);
        prop_assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", expected));
    }
}
