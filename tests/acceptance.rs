//! Every initial string EGRET generates for a regex must actually match
//! that regex when checked against an independent engine (spec.md §8).

use regex::Regex;

fn run(pattern: &str, base: &str) -> Vec<String> {
    egret::run_engine(pattern, base, false, false)
}

fn initial_strings(pattern: &str, base: &str) -> Vec<String> {
    run(pattern, base).into_iter().skip(1).collect()
}

#[test]
fn literal_concat_strings_match() {
    let re = Regex::new("^abc$").unwrap();
    let strings = initial_strings("abc", "xyzzy");
    assert!(strings.iter().any(|s| re.is_match(s)));
}

#[test]
fn alternation_strings_each_match_a_branch() {
    let re = Regex::new("^(a|b)$").unwrap();
    let strings = initial_strings("a|b", "xyzzy");
    assert!(!strings.is_empty());
    for s in &strings {
        if s.len() == 1 {
            assert!(re.is_match(s), "{s:?} should match a|b");
        }
    }
}

#[test]
fn char_class_witness_matches_class() {
    let re = Regex::new("^[abc]$").unwrap();
    let strings = initial_strings("[abc]", "xyzzy");
    assert!(strings.iter().any(|s| re.is_match(s)));
}

#[test]
fn grouped_backreference_initial_string_matches() {
    let re = Regex::new(r"^(a)\1$").unwrap();
    let strings = initial_strings(r"(a)\1", "xyzzy");
    assert!(strings.iter().any(|s| re.is_match(s)), "{strings:?}");
}

#[test]
fn bounded_quantifier_min_iteration_matches() {
    let re = Regex::new("^a{2,4}$").unwrap();
    let strings = initial_strings("a{2,4}", "xyzzy");
    assert!(strings.iter().any(|s| re.is_match(s)), "{strings:?}");
}
