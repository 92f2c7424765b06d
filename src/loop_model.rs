//! Per-loop bookkeeping used while rendering a [`crate::path::Path`] into
//! test strings, and to generate the boundary-condition "evil" strings
//! for a quantified node (spec.md §4.5, §9 Open Questions).
//!
//! Ported from the original implementation's `RegexLoop`: a loop's
//! substring is frozen the first time its body is traversed (first-writer
//! wins), because later iterations of the same loop on the same path
//! would otherwise keep overwriting it with redundant copies of the same
//! text.

use crate::path::StringPath;
use crate::LoopId;

#[derive(Debug, Clone)]
pub struct RegexLoop {
    pub id: LoopId,
    pub lower: u32,
    pub upper: Option<u32>,
    /// Text preceding the loop body, frozen on first traversal.
    pub path_prefix: Option<StringPath>,
    /// One iteration's worth of loop-body text, frozen on first traversal.
    pub path_substring: Option<StringPath>,
    /// Accumulates across the current BeginLoop..EndLoop traversal, reset
    /// each time BeginLoop fires.
    curr_prefix: StringPath,
    curr_substring: StringPath,
    in_body: bool,
}

impl RegexLoop {
    pub fn new(id: LoopId, lower: u32, upper: Option<u32>) -> Self {
        RegexLoop {
            id,
            lower,
            upper,
            path_prefix: None,
            path_substring: None,
            curr_prefix: StringPath::new(),
            curr_substring: StringPath::new(),
            in_body: false,
        }
    }

    /// Called when the path renderer crosses this loop's BeginLoop
    /// marker. `prefix_so_far` is everything rendered before the loop on
    /// this path.
    pub fn process_begin_loop(&mut self, prefix_so_far: &StringPath) {
        self.curr_prefix = prefix_so_far.clone();
        self.curr_substring = StringPath::new();
        self.in_body = true;
    }

    /// Called for each segment rendered while inside the loop body
    /// (between BeginLoop and EndLoop).
    pub fn process_body_segment(&mut self, segment: crate::path::PathSegment) {
        if self.in_body {
            self.curr_substring.push(segment);
        }
    }

    /// Called when the path renderer crosses this loop's EndLoop marker.
    /// First writer wins: only the first traversal of this loop (on this
    /// path) freezes `path_prefix`/`path_substring`.
    pub fn process_end_loop(&mut self) {
        self.in_body = false;
        if self.path_prefix.is_none() {
            self.path_prefix = Some(std::mem::take(&mut self.curr_prefix));
            self.path_substring = Some(std::mem::take(&mut self.curr_substring));
        }
    }

    /// One physical iteration's worth of path-string, as recorded on the
    /// basis path that first traversed this loop.
    pub fn raw_substring(&self) -> StringPath {
        self.path_substring.clone().unwrap_or_default()
    }

    /// `path_substring` repeated `max(0, lower - 1)` times: the path
    /// already contains one physical iteration, so this is what must be
    /// appended after it to reach the lower bound.
    pub fn get_substring(&self) -> StringPath {
        repeat(&self.raw_substring(), self.lower.saturating_sub(1))
    }

    pub fn get_prefix(&self) -> StringPath {
        self.path_prefix.clone().unwrap_or_default()
    }

    /// The minimum-iteration rendering of this loop: `lower` copies of
    /// the frozen substring (zero copies if `lower == 0`).
    pub fn process_min_iter_string(&self) -> StringPath {
        repeat(&self.raw_substring(), self.lower)
    }

    /// Boundary-condition strings for this loop's quantifier, following
    /// the emission table in spec.md §4.6:
    ///
    /// - `lower == upper` (finite exact): `{one_less, one_more}`.
    /// - `lower < upper` (bounded range): `{one_less, at_upper, past_upper}`.
    /// - unbounded and `lower` in `{0, 1}`: `{one_less, one_more}`.
    /// - unbounded and `lower >= 2`: `{one_less}`.
    ///
    /// `one_less` is `lower - 1` copies (0 if `lower == 0`). `one_more`
    /// is always exactly 2 copies of the substring — spec.md §4.6 defines
    /// it literally as `prefix + substring + substring + suffix`,
    /// independent of `lower`, matching the original `RegexLoop::gen_evil_strings`
    /// (`one_more_string` there is built once, before branching on
    /// `repeat_lower`/`repeat_upper`, from exactly two copies of
    /// `path_substring`). `at_upper`/`past_upper` are `upper`/`upper + 1`
    /// copies.
    pub fn gen_evil_strings(&self) -> Vec<(&'static str, StringPath)> {
        let base = self.raw_substring();
        let one_less = repeat(&base, self.lower.saturating_sub(1));
        let one_more = repeat(&base, 2);
        let mut out = vec![("one_less", one_less)];

        match self.upper {
            Some(upper) if upper == self.lower => {
                out.push(("one_more", one_more));
            }
            Some(upper) => {
                out.push(("at_upper", repeat(&base, upper)));
                out.push(("past_upper", repeat(&base, upper + 1)));
            }
            None if self.lower <= 1 => {
                out.push(("one_more", one_more));
            }
            None => {}
        }

        out
    }

    /// Renders this quantifier the way the original's `RegexLoop::print`
    /// renders it, for debug output (`{lower,upper}` / `{lower,}` /
    /// `{lower}`).
    pub fn render_quantifier(&self) -> String {
        match self.upper {
            Some(upper) if upper == self.lower => format!("{{{}}}", self.lower),
            Some(upper) => format!("{{{},{}}}", self.lower, upper),
            None => format!("{{{},}}", self.lower),
        }
    }
}

fn repeat(substring: &StringPath, count: u32) -> StringPath {
    let mut out = StringPath::new();
    for _ in 0..count {
        out.append(substring.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;

    fn seg(text: &str) -> PathSegment {
        PathSegment { text: text.to_string(), transition: 0, backref_group: None }
    }

    #[test]
    fn freezes_substring_on_first_traversal_only() {
        let mut l = RegexLoop::new(0, 1, Some(3));
        l.process_begin_loop(&StringPath::new());
        l.process_body_segment(seg("a"));
        l.process_end_loop();
        l.process_begin_loop(&StringPath::new());
        l.process_body_segment(seg("b"));
        l.process_end_loop();
        assert_eq!(l.raw_substring().get_string(), "a");
    }

    #[test]
    fn min_iter_string_repeats_lower_times() {
        let mut l = RegexLoop::new(0, 2, Some(4));
        l.process_begin_loop(&StringPath::new());
        l.process_body_segment(seg("x"));
        l.process_end_loop();
        assert_eq!(l.process_min_iter_string().get_string(), "xx");
    }

    #[test]
    fn bounded_range_emits_one_less_at_upper_past_upper() {
        let mut l = RegexLoop::new(0, 2, Some(4));
        l.process_begin_loop(&StringPath::new());
        l.process_body_segment(seg("x"));
        l.process_end_loop();
        let evil: Vec<_> = l.gen_evil_strings().into_iter().map(|(k, v)| (k, v.get_string())).collect();
        assert_eq!(
            evil,
            vec![
                ("one_less", "x".to_string()),
                ("at_upper", "xxxx".to_string()),
                ("past_upper", "xxxxx".to_string()),
            ]
        );
    }

    #[test]
    fn exact_bound_emits_one_less_and_one_more() {
        // one_more is always exactly 2 copies of the substring, per
        // spec.md §4.6's literal definition — not `lower + 1` copies.
        let mut l = RegexLoop::new(0, 3, Some(3));
        l.process_begin_loop(&StringPath::new());
        l.process_body_segment(seg("y"));
        l.process_end_loop();
        let evil: Vec<_> = l.gen_evil_strings().into_iter().map(|(k, v)| (k, v.get_string())).collect();
        assert_eq!(evil, vec![("one_less", "yy".to_string()), ("one_more", "yy".to_string())]);
    }

    #[test]
    fn unbounded_with_low_lower_emits_one_less_and_one_more() {
        let mut l = RegexLoop::new(0, 1, None);
        l.process_begin_loop(&StringPath::new());
        l.process_body_segment(seg("z"));
        l.process_end_loop();
        let keys: Vec<_> = l.gen_evil_strings().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["one_less", "one_more"]);
    }

    #[test]
    fn unbounded_with_high_lower_emits_only_one_less() {
        let mut l = RegexLoop::new(0, 2, None);
        l.process_begin_loop(&StringPath::new());
        l.process_body_segment(seg("w"));
        l.process_end_loop();
        let keys: Vec<_> = l.gen_evil_strings().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["one_less"]);
    }
}
