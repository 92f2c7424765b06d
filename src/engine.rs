//! Single entry point wiring Scanner → ParseTree → NFA → path enumerator
//! → test generator (spec.md §6).

use crate::error::EgretError;
use crate::generator::TestGenerator;
use crate::nfa::NFA;
use crate::parse_tree::ParseTree;
use crate::path::find_basis_paths;
use crate::stats::Stats;

/// Runs the full pipeline for one regex and returns the output lines:
/// a head (`"SUCCESS"` or a single newline-joined warning report, or a
/// single `"ERROR: ..."` line) followed by deduplicated test strings in
/// the order evil-backreference, initial, evil-quantifier/punctuation.
///
/// `debug`/`stat` never change this returned list (spec.md §6: "the core
/// itself is silent"); when set, they print a diagnostic dump / stats
/// report directly to stdout as a side effect, exactly as the original
/// `run_engine` prints them via `cout` rather than folding them into its
/// result vector.
pub fn run_engine(regex: &str, base_substring: &str, debug: bool, stat: bool) -> Vec<String> {
    match run_engine_inner(regex, base_substring, debug, stat) {
        Ok(lines) => lines,
        Err(e) => vec![e.to_engine_message()],
    }
}

fn run_engine_inner(regex: &str, base_substring: &str, debug: bool, stat: bool) -> Result<Vec<String>, EgretError> {
    validate_base_substring(base_substring)?;

    #[cfg(feature = "logging")]
    log::debug!("building parse tree for {regex:?}");
    let tree = ParseTree::build(regex)?;

    #[cfg(feature = "logging")]
    log::debug!("parse tree: {} group(s), {} loop(s)", tree.group_count, tree.loop_count);

    let nfa = NFA::build(&tree)?;

    #[cfg(feature = "logging")]
    log::debug!("nfa: {} state(s), {} transition(s)", nfa.states.len(), nfa.transitions.len());

    let paths = find_basis_paths(&nfa)?;

    #[cfg(feature = "logging")]
    log::debug!("enumerated {} basis path(s)", paths.len());

    let generator = TestGenerator::new(&nfa, base_substring);
    let (initial, evil_backref, evil_quant, warnings) = generator.generate(&paths, &tree);

    if debug {
        println!("RegEx: {regex}");
        println!("base substring: {base_substring}");
        println!("{} group(s), {} loop(s)", tree.group_count, tree.loop_count);
        println!("{} state(s), {} transition(s)", nfa.states.len(), nfa.transitions.len());
        println!("{} basis path(s)", paths.len());
    }

    if stat {
        let mut stats = Stats::default();
        nfa.add_stats(&mut stats);
        stats.path_count = paths.len();
        stats.initial_string_count = initial.len();
        stats.evil_backref_string_count = evil_backref.len();
        stats.evil_quantifier_string_count = evil_quant.len();
        for line in stats.render() {
            println!("{line}");
        }
    }

    let mut out = vec![warnings.render_head()];

    let mut seen = std::collections::HashSet::new();
    for s in evil_backref.into_iter().chain(initial).chain(evil_quant) {
        if seen.insert(s.clone()) {
            out.push(s);
        }
    }

    Ok(out)
}

/// spec.md §6.1: the base substring must be at least two characters and
/// entirely alphabetic, since it's spliced directly into rendered test
/// strings and must stay a recognizable, non-metacharacter run of text.
fn validate_base_substring(base_substring: &str) -> Result<(), EgretError> {
    if base_substring.chars().count() < 2 {
        return Err(EgretError::Input("base substring must be at least two characters".to_string()));
    }
    if !base_substring.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EgretError::Input("base substring must be entirely alphabetic".to_string()));
    }
    Ok(())
}
