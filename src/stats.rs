//! Per-invocation counters, printed only when `run_engine` is called with
//! `stat: true` (spec.md §6.2). Owned by the caller rather than kept as
//! global mutable state, unlike the original implementation's process-wide
//! `Stats` singleton.

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub state_count: usize,
    pub transition_count: usize,
    pub path_count: usize,
    pub initial_string_count: usize,
    pub evil_backref_string_count: usize,
    pub evil_quantifier_string_count: usize,
}

impl Stats {
    pub fn render(&self) -> Vec<String> {
        vec![
            format!("STAT: states = {}", self.state_count),
            format!("STAT: transitions = {}", self.transition_count),
            format!("STAT: basis paths = {}", self.path_count),
            format!("STAT: initial strings = {}", self.initial_string_count),
            format!("STAT: evil backreference strings = {}", self.evil_backref_string_count),
            format!("STAT: evil quantifier strings = {}", self.evil_quantifier_string_count),
        ]
    }
}
