//! Thompson-style NFA construction with marker-bearing epsilon
//! transitions (spec.md §4.3), built by recursive descent over a
//! [`crate::ast::ParseNode`] tree.
//!
//! The construction pattern (arena of states, `Fragment { start, end }`
//! composed bottom-up) follows a from-scratch Thompson compiler; the
//! markers threaded through the epsilon edges are this crate's own
//! addition, needed so the path enumerator can recover loop/group/anchor
//! structure from a bare walk of the graph.

use std::collections::HashMap;

use crate::ast::ParseNode;
use crate::charclass::CharClassSpec;
use crate::error::BuildError;
use crate::parse_tree::ParseTree;
use crate::token::AnchorKind;
use crate::{GroupId, LoopId, StateId, TransId};

/// A marker carried by an otherwise-epsilon transition. These never
/// consume input; the path enumerator and loop model read them off the
/// transitions a path traverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    BeginLoop(LoopId),
    EndLoop(LoopId),
    BeginGroup(GroupId),
    EndGroup(GroupId),
    Anchor(AnchorKind),
    Backref(GroupId),
    /// The `post -> pre` edge that lets a loop iterate more than once.
    /// Never traversable by a basis path (the DFS never revisits `pre`
    /// once it's on the current branch, per spec.md §4.4's "a loop body
    /// is traversed at most once"), so it's tagged distinctly from a
    /// bare `Epsilon` purely so the path enumerator can exclude it from
    /// the set of transitions coverage is required to reach.
    LoopBack(LoopId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionKind {
    Consume(CharClassSpec),
    Epsilon,
    Marker(MarkerKind),
}

#[derive(Debug, Clone)]
pub struct TransitionData {
    pub id: TransId,
    pub from: StateId,
    pub to: StateId,
    pub kind: TransitionKind,
}

#[derive(Debug, Clone, Default)]
pub struct StateData {
    pub id: StateId,
    pub out: Vec<TransId>,
}

/// The compiled NFA: an arena of states and transitions plus the bounds
/// of every quantified node, addressed by [`LoopId`] so downstream
/// stages don't need to re-walk the parse tree.
#[derive(Debug, Clone)]
pub struct NFA {
    pub states: Vec<StateData>,
    pub transitions: Vec<TransitionData>,
    pub start: StateId,
    pub accept: StateId,
    pub group_count: u32,
    pub loop_count: u32,
    pub loop_bounds: HashMap<LoopId, (u32, Option<u32>)>,
}

impl NFA {
    pub fn build(tree: &ParseTree) -> Result<NFA, BuildError> {
        let mut builder = Builder {
            states: Vec::new(),
            transitions: Vec::new(),
            loop_bounds: HashMap::new(),
        };
        let frag = builder.compile(&tree.root);
        let nfa = NFA {
            states: builder.states,
            transitions: builder.transitions,
            start: frag.start,
            accept: frag.end,
            group_count: tree.group_count,
            loop_count: tree.loop_count,
            loop_bounds: builder.loop_bounds,
        };
        nfa.validate_markers()?;
        nfa.validate_char_classes()?;
        Ok(nfa)
    }

    fn validate_markers(&self) -> Result<(), BuildError> {
        let mut loop_begins: HashMap<LoopId, u32> = HashMap::new();
        let mut loop_ends: HashMap<LoopId, u32> = HashMap::new();
        let mut group_begins: HashMap<GroupId, u32> = HashMap::new();
        let mut group_ends: HashMap<GroupId, u32> = HashMap::new();

        for t in &self.transitions {
            match &t.kind {
                TransitionKind::Marker(MarkerKind::BeginLoop(id)) => {
                    *loop_begins.entry(*id).or_insert(0) += 1;
                }
                TransitionKind::Marker(MarkerKind::EndLoop(id)) => {
                    *loop_ends.entry(*id).or_insert(0) += 1;
                }
                TransitionKind::Marker(MarkerKind::BeginGroup(id)) => {
                    *group_begins.entry(*id).or_insert(0) += 1;
                }
                TransitionKind::Marker(MarkerKind::EndGroup(id)) => {
                    *group_ends.entry(*id).or_insert(0) += 1;
                }
                _ => {}
            }
        }

        for (id, count) in &loop_begins {
            if loop_ends.get(id) != Some(count) {
                return Err(BuildError::UnmatchedLoopMarker { loop_id: *id });
            }
        }
        for id in loop_ends.keys() {
            if !loop_begins.contains_key(id) {
                return Err(BuildError::UnmatchedLoopMarker { loop_id: *id });
            }
        }
        for (id, count) in &group_begins {
            if group_ends.get(id) != Some(count) {
                return Err(BuildError::UnmatchedGroupMarker { group_id: *id });
            }
        }
        for id in group_ends.keys() {
            if !group_begins.contains_key(id) {
                return Err(BuildError::UnmatchedGroupMarker { group_id: *id });
            }
        }
        Ok(())
    }

    /// A class with no witnessable member (e.g. `[^\x20-\x7e]`, negating
    /// every printable ASCII character) can never be rendered into a
    /// test string; reject it rather than silently emitting an empty
    /// segment in its place.
    fn validate_char_classes(&self) -> Result<(), BuildError> {
        for t in &self.transitions {
            if let TransitionKind::Consume(spec) = &t.kind {
                if spec.expanded_set().is_empty() {
                    return Err(BuildError::EmptyCharClass);
                }
            }
        }
        Ok(())
    }

    pub fn add_stats(&self, stats: &mut crate::stats::Stats) {
        stats.state_count = self.states.len();
        stats.transition_count = self.transitions.len();
    }
}

/// A sub-NFA under construction: a single entry state and a single exit
/// state, with everything in between already wired up.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: StateId,
    end: StateId,
}

struct Builder {
    states: Vec<StateData>,
    transitions: Vec<TransitionData>,
    loop_bounds: HashMap<LoopId, (u32, Option<u32>)>,
}

impl Builder {
    fn new_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(StateData { id, out: Vec::new() });
        id
    }

    fn add_transition(&mut self, from: StateId, to: StateId, kind: TransitionKind) -> TransId {
        let id = self.transitions.len();
        self.transitions.push(TransitionData { id, from, to, kind });
        self.states[from].out.push(id);
        id
    }

    fn compile(&mut self, node: &ParseNode) -> Fragment {
        match node {
            ParseNode::Concat(children) => self.compile_concat(children),
            ParseNode::Alt(children) => self.compile_alt(children),
            ParseNode::Repeat { child, lower, upper, loop_id, .. } => {
                self.compile_repeat(child, *lower, *upper, *loop_id)
            }
            ParseNode::Group { id, child } => self.compile_group(*id, child),
            ParseNode::CharClass(spec) => self.compile_char_class(spec.clone()),
            ParseNode::Literal(c) => {
                self.compile_char_class(CharClassSpec::explicit(vec![crate::token::ClassItem::Char(*c)], false))
            }
            ParseNode::Wildcard => self.compile_char_class(CharClassSpec::wildcard()),
            ParseNode::Backref(id) => self.compile_marker_only(MarkerKind::Backref(*id)),
            ParseNode::Anchor(kind) => self.compile_marker_only(MarkerKind::Anchor(*kind)),
        }
    }

    fn compile_char_class(&mut self, spec: CharClassSpec) -> Fragment {
        let start = self.new_state();
        let end = self.new_state();
        self.add_transition(start, end, TransitionKind::Consume(spec));
        Fragment { start, end }
    }

    fn compile_marker_only(&mut self, marker: MarkerKind) -> Fragment {
        let start = self.new_state();
        let end = self.new_state();
        self.add_transition(start, end, TransitionKind::Marker(marker));
        Fragment { start, end }
    }

    fn compile_concat(&mut self, children: &[ParseNode]) -> Fragment {
        let mut frags = children.iter().map(|c| self.compile(c));
        let first = frags.next().expect("EmptyConcat is rejected by the parser");
        let start = first.start;
        let mut prev_end = first.end;
        let mut end = prev_end;
        for frag in frags {
            self.add_transition(prev_end, frag.start, TransitionKind::Epsilon);
            prev_end = frag.end;
            end = frag.end;
        }
        Fragment { start, end }
    }

    fn compile_alt(&mut self, children: &[ParseNode]) -> Fragment {
        let start = self.new_state();
        let end = self.new_state();
        for child in children {
            let frag = self.compile(child);
            self.add_transition(start, frag.start, TransitionKind::Epsilon);
            self.add_transition(frag.end, end, TransitionKind::Epsilon);
        }
        Fragment { start, end }
    }

    fn compile_group(&mut self, id: Option<GroupId>, child: &ParseNode) -> Fragment {
        let inner = self.compile(child);
        match id {
            None => inner,
            Some(id) => {
                let start = self.new_state();
                let end = self.new_state();
                self.add_transition(start, inner.start, TransitionKind::Marker(MarkerKind::BeginGroup(id)));
                self.add_transition(inner.end, end, TransitionKind::Marker(MarkerKind::EndGroup(id)));
                Fragment { start, end }
            }
        }
    }

    /// A single instance of the repeated body, bracketed by BeginLoop /
    /// EndLoop markers, with an optional skip edge (when `lower == 0`)
    /// and an optional loop-back edge (when more than one iteration is
    /// allowed). Iteration-count semantics are reconstructed later from
    /// `loop_bounds` by the loop model rather than enforced here by
    /// physically unrolling the body (spec.md §4.4).
    fn compile_repeat(&mut self, child: &ParseNode, lower: u32, upper: Option<u32>, loop_id: LoopId) -> Fragment {
        self.loop_bounds.insert(loop_id, (lower, upper));

        let entry = self.new_state();
        let pre = self.new_state();
        let body = self.compile(child);
        let post = self.new_state();
        let exit = self.new_state();

        self.add_transition(entry, pre, TransitionKind::Marker(MarkerKind::BeginLoop(loop_id)));
        self.add_transition(pre, body.start, TransitionKind::Epsilon);
        self.add_transition(body.end, post, TransitionKind::Epsilon);
        self.add_transition(post, exit, TransitionKind::Marker(MarkerKind::EndLoop(loop_id)));

        if lower == 0 {
            self.add_transition(entry, exit, TransitionKind::Epsilon);
        }
        let allows_more_than_one = upper.map(|u| u > 1).unwrap_or(true);
        if allows_more_than_one {
            self.add_transition(post, pre, TransitionKind::Marker(MarkerKind::LoopBack(loop_id)));
        }

        Fragment { start: entry, end: exit }
    }
}
