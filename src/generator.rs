//! Test-string generation (spec.md §4.5-§4.6): renders each basis path
//! into an initial string, then perturbs loop and backreference segments
//! to produce the "evil" boundary-condition strings.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::loop_model::RegexLoop;
use crate::nfa::{MarkerKind, TransitionKind, NFA};
use crate::parse_tree::ParseTree;
use crate::path::{Path, PathSegment, StringPath};
use crate::warnings::{Warning, WarningCollector};
use crate::{GroupId, LoopId};

/// A rendered path plus the bookkeeping needed to generate its evil
/// variants without re-walking the NFA.
struct Rendering {
    result: StringPath,
    /// Start/end segment index, in `result`, of each loop's single
    /// traversal — only the outermost occurrence per loop is kept.
    loop_ranges: HashMap<LoopId, (usize, usize)>,
    loops: HashMap<LoopId, RegexLoop>,
    /// Distinct groups referenced by a backreference on this path.
    backref_groups: BTreeSet<GroupId>,
}

pub struct TestGenerator<'a> {
    nfa: &'a NFA,
    base_substring: &'a str,
}

impl<'a> TestGenerator<'a> {
    pub fn new(nfa: &'a NFA, base_substring: &'a str) -> Self {
        TestGenerator { nfa, base_substring }
    }

    /// Runs Phase I-III over every basis path and collects warnings.
    /// Returns `(initial, evil_backref, evil_quantifier_and_punctuation, warnings)`.
    pub fn generate(
        &self,
        paths: &[Path],
        tree: &ParseTree,
    ) -> (Vec<String>, Vec<String>, Vec<String>, WarningCollector) {
        let mut warnings = WarningCollector::new();
        if tree.has_duplicate_character_sets() {
            warnings.push(Warning::DuplicateCharacterSets);
        }

        let renderings: Vec<Rendering> = paths.iter().map(|p| self.render(p)).collect();
        let top_levels: Vec<Vec<(LoopId, usize, usize)>> =
            renderings.iter().map(|r| top_level_ranges(&r.loop_ranges)).collect();
        let base_strings: Vec<StringPath> = renderings
            .iter()
            .zip(&top_levels)
            .map(|(r, tl)| self.render_variant(r, tl, &HashMap::new()))
            .collect();

        self.check_anchor_consistency(paths, &base_strings, &mut warnings);

        let mut initial = Vec::new();
        let mut evil_backref = Vec::new();
        let mut evil_quant_punct = Vec::new();
        let mut backrefs_done: HashSet<GroupId> = HashSet::new();

        for (i, rendering) in renderings.iter().enumerate() {
            let top_level = &top_levels[i];
            let base_string = &base_strings[i];
            initial.push(base_string.get_string());

            for &group in &rendering.backref_groups {
                if backrefs_done.insert(group) {
                    evil_backref.extend(self.evil_backref_variants(base_string, group));
                }
            }

            // Every loop actually traversed on this path gets its own
            // boundary variants, not just the outermost ones (spec.md
            // §4.6 Phase III: "for each path and each loop traversed on
            // that path"). A top-level loop's variant is spliced against
            // the min-iteration baseline of every other top-level loop;
            // a nested loop's variant is spliced directly into the raw
            // one-physical-iteration rendering, since it sits inside an
            // enclosing loop body that Phase I already renders verbatim
            // once per outer iteration.
            for &loop_id in rendering.loop_ranges.keys() {
                let Some(l) = rendering.loops.get(&loop_id) else { continue };
                let is_top_level = top_level.iter().any(|&(id, _, _)| id == loop_id);
                for (_, evil_path) in l.gen_evil_strings() {
                    let variant = if is_top_level {
                        let mut overrides = HashMap::new();
                        overrides.insert(loop_id, evil_path);
                        self.render_variant(rendering, top_level, &overrides)
                    } else {
                        self.render_raw_with_override(rendering, loop_id, evil_path)
                    };
                    evil_quant_punct.push(variant.get_string());
                }
            }

            evil_quant_punct.extend(self.evil_punctuation_variants(base_string, &tree.punctuation));
        }

        (initial, evil_backref, evil_quant_punct, warnings)
    }

    /// spec.md §4.6 Phase II: a single-character change, a case change
    /// (when applicable), and an empty substitution, each disagreeing
    /// with the group's captured text.
    fn evil_backref_variants(&self, base: &StringPath, group: GroupId) -> Vec<String> {
        let Some(idx) = base.segments.iter().position(|s| s.backref_group == Some(group)) else {
            return Vec::new();
        };
        let original = base.segments[idx].text.clone();
        let mut out = Vec::new();

        let mut char_changed = base.clone();
        char_changed.segments[idx].text = mutate_char(&original);
        out.push(char_changed.get_string());

        if let Some(case_changed_text) = swap_case(&original) {
            let mut case_changed = base.clone();
            case_changed.segments[idx].text = case_changed_text;
            out.push(case_changed.get_string());
        }

        let mut emptied = base.clone();
        emptied.segments[idx].text = String::new();
        out.push(emptied.get_string());

        out
    }

    /// spec.md §4.6 Phase III punctuation variants: for each punctuation
    /// character seen in the regex source, substitute it into every
    /// character-class position that doesn't already admit it.
    fn evil_punctuation_variants(&self, base: &StringPath, punctuation: &BTreeSet<char>) -> Vec<String> {
        let mut out = Vec::new();
        for (idx, seg) in base.segments.iter().enumerate() {
            let TransitionKind::Consume(spec) = &self.nfa.transitions[seg.transition].kind else {
                continue;
            };
            for &p in punctuation {
                if spec.matches(p) {
                    continue;
                }
                let mut variant = base.clone();
                variant.segments[idx].text = p.to_string();
                out.push(variant.get_string());
            }
        }
        out
    }

    /// Splices `replacement` into `rendering.result` in place of a single
    /// loop's own `(start, end)` segment range, leaving every other
    /// segment — including any enclosing loop's other iterations — as
    /// the raw one-physical-iteration rendering. Used for loops nested
    /// inside another loop's body, where there is no standalone
    /// min-iteration baseline to splice against.
    fn render_raw_with_override(&self, rendering: &Rendering, loop_id: LoopId, replacement: StringPath) -> StringPath {
        let Some(&(start, end)) = rendering.loop_ranges.get(&loop_id) else {
            return rendering.result.clone();
        };
        let mut out = rendering.result.slice(0, start);
        out.append(replacement);
        out.append(rendering.result.slice_from(end));
        out
    }

    /// Renders `rendering.result`, substituting each top-level loop's
    /// range with `overrides[id]` if present, else its minimum-iteration
    /// string.
    fn render_variant(
        &self,
        rendering: &Rendering,
        top_level: &[(LoopId, usize, usize)],
        overrides: &HashMap<LoopId, StringPath>,
    ) -> StringPath {
        let mut out = StringPath::new();
        let mut i = 0;
        let segments = &rendering.result.segments;
        while i < segments.len() {
            if let Some(&(loop_id, start, end)) = top_level.iter().find(|&&(_, s, _)| s == i) {
                let replacement = overrides
                    .get(&loop_id)
                    .cloned()
                    .or_else(|| rendering.loops.get(&loop_id).map(RegexLoop::process_min_iter_string))
                    .unwrap_or_default();
                out.append(replacement);
                i = end;
            } else {
                out.push(segments[i].clone());
                i += 1;
            }
        }
        out
    }

    fn render(&self, path: &Path) -> Rendering {
        let mut result = StringPath::new();
        let mut loops: HashMap<LoopId, RegexLoop> = self
            .nfa
            .loop_bounds
            .iter()
            .map(|(&id, &(lo, hi))| (id, RegexLoop::new(id, lo, hi)))
            .collect();
        let mut loop_ranges: HashMap<LoopId, (usize, usize)> = HashMap::new();
        let mut open_loops: Vec<LoopId> = Vec::new();
        let mut group_start: HashMap<GroupId, usize> = HashMap::new();
        let mut group_text: HashMap<GroupId, StringPath> = HashMap::new();
        let mut backref_groups: BTreeSet<GroupId> = BTreeSet::new();

        for &t in &path.transitions {
            let trans = &self.nfa.transitions[t];
            let segment = match &trans.kind {
                TransitionKind::Consume(spec) => {
                    let text = if spec.is_wildcard() {
                        self.base_substring.to_string()
                    } else {
                        spec.witness(self.base_substring).map(|c| c.to_string()).unwrap_or_default()
                    };
                    Some(PathSegment { text, transition: t, backref_group: None })
                }
                TransitionKind::Marker(MarkerKind::BeginLoop(id)) => {
                    if let Some(l) = loops.get_mut(id) {
                        l.process_begin_loop(&result);
                    }
                    loop_ranges.entry(*id).or_insert((result.len(), result.len()));
                    open_loops.push(*id);
                    None
                }
                TransitionKind::Marker(MarkerKind::EndLoop(id)) => {
                    if let Some(pos) = open_loops.iter().rposition(|x| x == id) {
                        open_loops.remove(pos);
                    }
                    if let Some(l) = loops.get_mut(id) {
                        l.process_end_loop();
                    }
                    if let Some(range) = loop_ranges.get_mut(id) {
                        if range.1 == range.0 {
                            range.1 = result.len();
                        }
                    }
                    None
                }
                TransitionKind::Marker(MarkerKind::BeginGroup(id)) => {
                    group_start.entry(*id).or_insert(result.len());
                    None
                }
                TransitionKind::Marker(MarkerKind::EndGroup(id)) => {
                    if let Some(&start) = group_start.get(id) {
                        group_text.entry(*id).or_insert_with(|| result.slice_from(start));
                    }
                    None
                }
                TransitionKind::Marker(MarkerKind::Anchor(_)) => None,
                // Never traversed by a basis path — see MarkerKind::LoopBack's doc comment.
                TransitionKind::Marker(MarkerKind::LoopBack(_)) => None,
                TransitionKind::Marker(MarkerKind::Backref(id)) => {
                    backref_groups.insert(*id);
                    let text = group_text.get(id).map(StringPath::get_string).unwrap_or_default();
                    Some(PathSegment { text, transition: t, backref_group: Some(*id) })
                }
                TransitionKind::Epsilon => None,
            };

            if let Some(seg) = segment {
                for &id in &open_loops {
                    if let Some(l) = loops.get_mut(&id) {
                        l.process_body_segment(seg.clone());
                    }
                }
                result.push(seg);
            }
        }

        Rendering { result, loop_ranges, loops, backref_groups }
    }

    /// spec.md §4.6 "anchor inconsistent"/"anchor mid-string" warnings:
    /// a `^`/`$` present on some basis paths but not others, or one that
    /// doesn't sit at the start/end of its path. The inconsistency
    /// warnings quote one example string from each side, matching the
    /// original `TestGenerator::gen_initial_strings`'s "String with ^
    /// anchor: .../ String with no ^ anchor: ..." messages.
    fn check_anchor_consistency(&self, paths: &[Path], base_strings: &[StringPath], warnings: &mut WarningCollector) {
        if paths.is_empty() {
            return;
        }
        let leading: Vec<bool> = paths.iter().map(|p| p.has_leading_caret(self.nfa)).collect();
        let trailing: Vec<bool> = paths.iter().map(|p| p.has_trailing_dollar(self.nfa)).collect();

        if let (Some(with), Some(without)) = (leading.iter().position(|&b| b), leading.iter().position(|&b| !b)) {
            warnings.push(Warning::AnchorInconsistent {
                detail: format!(
                    "Some but not all strings start with a '^' anchor\n...String with ^ anchor:    {}\n...String with no ^ anchor: {}",
                    base_strings[with].get_string(),
                    base_strings[without].get_string()
                ),
            });
        }
        if let (Some(with), Some(without)) = (trailing.iter().position(|&b| b), trailing.iter().position(|&b| !b)) {
            warnings.push(Warning::AnchorInconsistent {
                detail: format!(
                    "Some but not all strings end with a '$' anchor\n...String with $ anchor:    {}\n...String with no $ anchor: {}",
                    base_strings[with].get_string(),
                    base_strings[without].get_string()
                ),
            });
        }
        for path in paths {
            if let Some(detail) = path.mid_string_anchor_example(self.nfa) {
                warnings.push(Warning::AnchorInconsistent { detail });
            }
        }
    }
}

/// Loop ranges not nested inside another loop's range.
fn top_level_ranges(ranges: &HashMap<LoopId, (usize, usize)>) -> Vec<(LoopId, usize, usize)> {
    let mut out: Vec<(LoopId, usize, usize)> = Vec::new();
    for (&id, &(start, end)) in ranges {
        let contained = ranges.iter().any(|(&other_id, &(os, oe))| {
            other_id != id && os <= start && end <= oe && (os, oe) != (start, end)
        });
        if !contained {
            out.push((id, start, end));
        }
    }
    out.sort_by_key(|&(_, start, _)| start);
    out
}

/// A one-character perturbation of a backreference's captured text, used
/// to generate a string where the "repeated" portion deliberately fails
/// to match the original (spec.md §4.5 evil backreference strings).
fn mutate_char(original: &str) -> String {
    if original.is_empty() {
        return "X".to_string();
    }
    let mut chars: Vec<char> = original.chars().collect();
    chars[0] = if chars[0] == 'X' { 'Y' } else { 'X' };
    chars.into_iter().collect()
}

/// Flips the case of every alphabetic character in `original`. Returns
/// `None` if doing so wouldn't change anything (e.g. a purely
/// non-alphabetic capture), since that variant would be indistinguishable
/// from `original`.
fn swap_case(original: &str) -> Option<String> {
    let swapped: String = original
        .chars()
        .map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else if c.is_lowercase() {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            }
        })
        .collect();
    (swapped != original).then_some(swapped)
}
