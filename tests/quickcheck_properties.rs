//! Property-based checks over small, hand-restricted regex/base-substring
//! samples (spec.md §8 determinism/dedup, checked generatively rather
//! than on a fixed list of examples).

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

/// A small alphabet restricted to patterns this scanner accepts, so
/// quickcheck spends its budget on structurally valid regexes instead of
/// mostly-`ScanError`/`ParseError` noise.
#[derive(Debug, Clone)]
struct SmallRegex(String);

impl Arbitrary for SmallRegex {
    fn arbitrary(g: &mut Gen) -> Self {
        const ATOMS: &[&str] = &["a", "b", "[ab]", ".", "a*", "a+", "a?", "a{1,2}", "(a)", "(a)\\1"];
        let len = 1 + usize::arbitrary(g) % 3;
        let mut s = String::new();
        for _ in 0..len {
            let atom = ATOMS[usize::arbitrary(g) % ATOMS.len()];
            s.push_str(atom);
        }
        SmallRegex(s)
    }
}

#[test]
fn determinism_holds_over_generated_regexes() {
    fn prop(r: SmallRegex) -> TestResult {
        let first = egret::run_engine(&r.0, "xyzzy", false, false);
        let second = egret::run_engine(&r.0, "xyzzy", false, false);
        TestResult::from_bool(first == second)
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(SmallRegex) -> TestResult);
}

#[test]
fn output_body_never_has_duplicates_over_generated_regexes() {
    fn prop(r: SmallRegex) -> TestResult {
        let out = egret::run_engine(&r.0, "xyzzy", false, false);
        if out.len() <= 1 {
            return TestResult::discard();
        }
        let body = &out[1..];
        let unique: std::collections::HashSet<&String> = body.iter().collect();
        TestResult::from_bool(body.len() == unique.len())
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(SmallRegex) -> TestResult);
}

#[test]
fn head_is_success_or_warning_or_sole_error() {
    fn prop(r: SmallRegex) -> TestResult {
        let out = egret::run_engine(&r.0, "xyzzy", false, false);
        if out.is_empty() {
            return TestResult::failed();
        }
        let head_ok = out[0] == "SUCCESS" || out[0].starts_with("WARNING: ") || out[0].starts_with("ERROR: ");
        let error_implies_sole_line = !out[0].starts_with("ERROR: ") || out.len() == 1;
        TestResult::from_bool(head_ok && error_implies_sole_line)
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(SmallRegex) -> TestResult);
}
