//! Running the same regex/base-substring pair twice must produce
//! identical output, in the same order (spec.md §8 determinism).

#[test]
fn repeated_runs_are_identical() {
    let patterns = ["abc", "a*b+c?", "(a|b)(c|d)", r"(ab)\1", "[a-z]{2,5}", "^a$"];
    for p in patterns {
        let first = egret::run_engine(p, "xyzzy", false, false);
        let second = egret::run_engine(p, "xyzzy", false, false);
        assert_eq!(first, second, "pattern {p:?} was not deterministic");
    }
}
