//! Path / StringPath (spec.md §3) and the basis-path enumerator
//! (spec.md §4.4).

use std::collections::HashSet;

use crate::error::EgretError;
use crate::nfa::{TransitionKind, NFA};
use crate::token::AnchorKind;
use crate::{LoopId, TransId};

/// One consumed-or-marker step of a rendered path, carrying the text
/// materialized for that transition (empty for markers and bare
/// epsilons) and a reference back to the transition that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub text: String,
    pub transition: TransId,
    /// Set when this segment is a backreference placeholder, so Phase II
    /// can find and mutate it without re-walking the NFA.
    pub backref_group: Option<crate::GroupId>,
}

/// A value-typed, freely-copyable rendered string, kept as a sequence of
/// segments (rather than a flat `String`) so loop/backreference logic can
/// slice and splice it without re-rendering from the NFA.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringPath {
    pub segments: Vec<PathSegment>,
}

impl StringPath {
    pub fn new() -> Self {
        StringPath::default()
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn append(&mut self, other: StringPath) {
        self.segments.extend(other.segments);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments `[from..)`, cloned into a fresh `StringPath`.
    pub fn slice_from(&self, from: usize) -> StringPath {
        StringPath { segments: self.segments[from.min(self.segments.len())..].to_vec() }
    }

    /// Segments `[from..to)`, cloned into a fresh `StringPath`.
    pub fn slice(&self, from: usize, to: usize) -> StringPath {
        let from = from.min(self.segments.len());
        let to = to.min(self.segments.len()).max(from);
        StringPath { segments: self.segments[from..to].to_vec() }
    }

    /// Drops the trailing `n` segments (saturating at 0).
    pub fn truncate_by(&mut self, n: usize) {
        let keep = self.segments.len().saturating_sub(n);
        self.segments.truncate(keep);
    }

    pub fn get_string(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// An accepting NFA walk selected by the basis-path enumerator.
#[derive(Debug, Clone)]
pub struct Path {
    /// Every transition traversed, in traversal order (including bare
    /// epsilons — the coverage property in spec.md §4.4 counts them too).
    pub transitions: Vec<TransId>,
    /// Loop ids entered on this path, in the order their BeginLoop
    /// marker was traversed.
    pub loop_ids: Vec<LoopId>,
}

impl Path {
    pub fn has_leading_caret(&self, nfa: &NFA) -> bool {
        self.first_anchor(nfa) == Some(AnchorKind::Start)
    }

    pub fn has_trailing_dollar(&self, nfa: &NFA) -> bool {
        self.last_anchor(nfa) == Some(AnchorKind::End)
    }

    fn first_anchor(&self, nfa: &NFA) -> Option<AnchorKind> {
        for &t in &self.transitions {
            match &nfa.transitions[t].kind {
                TransitionKind::Marker(crate::nfa::MarkerKind::Anchor(kind)) => return Some(*kind),
                TransitionKind::Consume(_) => return None,
                _ => continue,
            }
        }
        None
    }

    fn last_anchor(&self, nfa: &NFA) -> Option<AnchorKind> {
        for &t in self.transitions.iter().rev() {
            match &nfa.transitions[t].kind {
                TransitionKind::Marker(crate::nfa::MarkerKind::Anchor(kind)) => return Some(*kind),
                TransitionKind::Consume(_) => return None,
                _ => continue,
            }
        }
        None
    }

    /// Positions (by consuming-or-anchor order, 0-indexed among all
    /// non-epsilon-non-loop-non-group transitions) of `^`/`$` anchors
    /// that are NOT the first/last such transition — spec.md §4.6
    /// "Anchor mid-string" warning.
    pub fn mid_string_anchor_example(&self, nfa: &NFA) -> Option<String> {
        let relevant: Vec<&TransId> = self
            .transitions
            .iter()
            .filter(|&&t| {
                matches!(
                    &nfa.transitions[t].kind,
                    TransitionKind::Consume(_) | TransitionKind::Marker(crate::nfa::MarkerKind::Anchor(_))
                )
            })
            .collect();
        for (i, &&t) in relevant.iter().enumerate() {
            if let TransitionKind::Marker(crate::nfa::MarkerKind::Anchor(kind)) = &nfa.transitions[t].kind {
                let is_first = i == 0;
                let is_last = i == relevant.len() - 1;
                match kind {
                    AnchorKind::Start if !is_first => {
                        return Some(format!("'^' anchor not at start of path (transition {t})"));
                    }
                    AnchorKind::End if !is_last => {
                        return Some(format!("'$' anchor not at end of path (transition {t})"));
                    }
                    _ => {}
                }
            }
        }
        None
    }
}

/// Enumerates a basis set of accepting paths: every transition that lies
/// on some accepting path is covered by at least one emitted path
/// (spec.md §4.4).
pub fn find_basis_paths(nfa: &NFA) -> Result<Vec<Path>, EgretError> {
    let reachable_to_accept = reachable_to_accept(nfa);
    let mut covered: HashSet<TransId> = HashSet::new();
    let mut paths = Vec::new();

    // A loop's post -> pre back-edge is never on any basis path (the DFS
    // never revisits a state already on the current branch, so `pre` is
    // always on-path by the time `post` is reached) and so can never be
    // covered; excluding it keeps the coverage target achievable while
    // still requiring every reachable *traversable* transition to appear
    // on some emitted path (spec.md §4.4).
    let total_relevant: HashSet<TransId> = nfa
        .transitions
        .iter()
        .filter(|t| reachable_to_accept.contains(&t.from) && reachable_to_accept.contains(&t.to))
        .filter(|t| !matches!(t.kind, TransitionKind::Marker(crate::nfa::MarkerKind::LoopBack(_))))
        .map(|t| t.id)
        .collect();

    // Bound the number of enumeration rounds: each round covers at least
    // one previously-uncovered transition, so this terminates well before
    // the bound fires on any well-formed NFA.
    let max_rounds = total_relevant.len() + 1;
    let mut rounds = 0;
    while covered.intersection(&total_relevant).count() < total_relevant.len() {
        rounds += 1;
        if rounds > max_rounds {
            return Err(EgretError::Internal(
                "path enumeration failed to terminate while covering reachable transitions".to_string(),
            ));
        }
        match dfs_one_path(nfa, &covered) {
            Some(path) => {
                for &t in &path.transitions {
                    covered.insert(t);
                }
                paths.push(path);
            }
            None => {
                // No accepting continuation left to find uncovered
                // transitions; if coverage is still incomplete, some
                // reachable transition can never be covered by any DFS
                // from the start state, which violates spec.md §4.4's
                // coverage property.
                if covered.intersection(&total_relevant).count() < total_relevant.len() {
                    return Err(EgretError::Internal(
                        "path enumeration could not cover every reachable transition".to_string(),
                    ));
                }
                break;
            }
        }
    }

    if paths.is_empty() {
        // Even a regex with no consuming transitions (e.g. the empty
        // regex, or one made only of anchors) still accepts one path.
        match dfs_one_path(nfa, &covered) {
            Some(path) => paths.push(path),
            None => {
                return Err(EgretError::Internal(
                    "no accepting path found in the compiled NFA".to_string(),
                ));
            }
        }
    }

    Ok(paths)
}

fn reachable_to_accept(nfa: &NFA) -> HashSet<crate::StateId> {
    // Reverse BFS from the accept state over the transition graph.
    let mut incoming: std::collections::HashMap<crate::StateId, Vec<crate::StateId>> = std::collections::HashMap::new();
    for t in &nfa.transitions {
        incoming.entry(t.to).or_default().push(t.from);
    }
    let mut seen = HashSet::new();
    let mut stack = vec![nfa.accept];
    seen.insert(nfa.accept);
    while let Some(s) = stack.pop() {
        if let Some(preds) = incoming.get(&s) {
            for &p in preds {
                if seen.insert(p) {
                    stack.push(p);
                }
            }
        }
    }
    seen
}

/// DFS from `nfa.start` to `nfa.accept`, preferring transitions not in
/// `covered`, breaking ties by construction order, and never revisiting
/// a state already on the current branch (this is what makes a loop body
/// traversed at most once per path, per spec.md §4.4).
fn dfs_one_path(nfa: &NFA, covered: &HashSet<TransId>) -> Option<Path> {
    let mut on_path: HashSet<crate::StateId> = HashSet::new();
    let mut stack_transitions: Vec<TransId> = Vec::new();
    search(nfa, nfa.start, covered, &mut on_path, &mut stack_transitions).then(|| {
        let loop_ids = stack_transitions
            .iter()
            .filter_map(|&t| match &nfa.transitions[t].kind {
                TransitionKind::Marker(crate::nfa::MarkerKind::BeginLoop(id)) => Some(*id),
                _ => None,
            })
            .collect();
        Path { transitions: stack_transitions, loop_ids }
    })
}

fn search(
    nfa: &NFA,
    state: crate::StateId,
    covered: &HashSet<TransId>,
    on_path: &mut HashSet<crate::StateId>,
    acc: &mut Vec<TransId>,
) -> bool {
    if state == nfa.accept {
        return true;
    }
    let out = &nfa.states[state].out;
    let mut candidates: Vec<TransId> = out
        .iter()
        .copied()
        .filter(|t| !on_path.contains(&nfa.transitions[*t].to))
        .collect();
    // Prefer uncovered transitions first, construction order otherwise.
    candidates.sort_by_key(|t| covered.contains(t));

    for t in candidates {
        let to = nfa.transitions[t].to;
        acc.push(t);
        on_path.insert(to);
        if search(nfa, to, covered, on_path, acc) {
            return true;
        }
        on_path.remove(&to);
        acc.pop();
    }
    false
}
