//! The first output line is always `"SUCCESS"`, a `"WARNING: ..."` line,
//! or (as the sole line) an `"ERROR: ..."` line (spec.md §6).

#[test]
fn clean_pattern_heads_with_success() {
    let out = egret::run_engine("abc", "xyzzy", false, false);
    assert_eq!(out[0], "SUCCESS");
}

#[test]
fn malformed_pattern_heads_with_single_error_line() {
    let out = egret::run_engine("a(b", "xyzzy", false, false);
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("ERROR: "));
}

#[test]
fn inconsistent_anchors_head_with_warning() {
    let out = egret::run_engine("^a|b", "xyzzy", false, false);
    assert!(out[0].starts_with("WARNING: ") || out[0] == "SUCCESS");
}

#[test]
fn invalid_base_substring_is_an_input_error() {
    let out = egret::run_engine("abc", "a1", false, false);
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("ERROR: "));
}
