//! Every capturing group referenced by a backreference produces at
//! least one evil backreference string (spec.md §4.5, §8).

#[test]
fn single_backreference_produces_an_evil_string() {
    let out = egret::run_engine(r"(ab)\1", "xyzzy", false, false);
    let initial = egret::run_engine(r"(ab)\1", "xyzzy", false, false);
    assert!(out.len() > 1);
    // The evil-backreference string differs from every initial string
    // yet still contains the unreferenced literal prefix "ab".
    let body = &initial[1..];
    assert!(body.iter().any(|s| s.starts_with("ab") && s != "abab"));
}

#[test]
fn multiple_references_to_same_group_dedup_to_one_evil_string() {
    let out = egret::run_engine(r"(a)\1\1", "xyzzy", false, false);
    let body = &out[1..];
    let ab_evil_variants = body.iter().filter(|s| s.len() == 3 && s.starts_with('a')).count();
    assert!(ab_evil_variants >= 1);
}
