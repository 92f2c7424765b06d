//! The six concrete input/output scenarios from spec.md §8, checked
//! directly against `run_engine`'s output.

fn body(pattern: &str, base: &str) -> Vec<String> {
    egret::run_engine(pattern, base, false, false)[1..].to_vec()
}

#[test]
fn scenario_1_literal_concat() {
    let out = egret::run_engine("abc", "xy", false, false);
    assert_eq!(out[0], "SUCCESS");
    assert!(out.contains(&"abc".to_string()));
}

#[test]
fn scenario_2_bounded_quantifier_boundaries() {
    let strings = body("a{2,4}", "xy");
    assert!(strings.contains(&"aa".to_string()));
    assert!(strings.contains(&"aaaa".to_string()));
    assert!(strings.contains(&"a".to_string()));
    assert!(strings.contains(&"aaaaa".to_string()));
}

#[test]
fn scenario_3_star_zero_and_two_iterations() {
    let strings = body("a*", "xy");
    assert!(strings.contains(&String::new()));
    assert!(strings.contains(&"aa".to_string()));
}

#[test]
fn scenario_4_backreference_evil_and_matching() {
    let strings = body(r"(a)\1", "xy");
    assert!(strings.contains(&"aa".to_string()));
    assert!(strings.iter().any(|s| s.len() == 2 && s != "aa"));
}

#[test]
fn scenario_5_anchor_inconsistency_and_both_branches() {
    let out = egret::run_engine("^a|b", "xy", false, false);
    assert!(out[0].starts_with("WARNING: "));
    let strings = &out[1..];
    assert!(strings.contains(&"a".to_string()));
    assert!(strings.contains(&"b".to_string()));
}

#[test]
fn scenario_6_char_class_witnesses_and_punctuation_variant() {
    let strings = body("[abc]+", "xy");
    assert!(strings.iter().any(|s| s.len() == 1 && "abc".contains(s.as_str())));
    assert!(strings.iter().any(|s| s.len() > 1 && s.chars().all(|c| "abc".contains(c))));
    // A punctuation-variant string: some character-class position
    // replaced by a mark the class doesn't admit, so it's rejected by
    // `[abc]+` (spec.md §8 scenario 6's "punctuation-variant that is
    // rejected").
    assert!(strings.iter().any(|s| s.chars().any(|c| c.is_ascii_punctuation())));
}
