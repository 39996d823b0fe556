//! Context diff (`diff -c`).
//!
//! ```text
//! *** a.txt       2021-12-11 22:16:26.478662800 +0100
//! --- b.txt       2021-12-11 23:50:41.235329900 +0100
//! ***************
//! *** 6,7 ****
//! ! second
//! ! diff
//! --- 7,8 ----
//! ! second diff
//! ! and more!
//! ```

use super::{Accumulator, Phase, Segmenter};
use crate::parse::{context_new_range, context_old_range, is_context_cruft, strip_columns};

/// Segmenter for context diff output.
///
/// A hunk opens at its `*** N ****` marker. The file header preamble and the
/// `***************` separator are carried along in the raw text but never
/// compared. When the first marker arrives with nothing compared yet, the
/// preamble is emitted on its own.
#[derive(Debug, Default)]
pub struct ContextSegmenter {
    acc: Accumulator,
}

impl Segmenter for ContextSegmenter {
    fn step(&mut self, line: &str) -> Option<String> {
        let mut out = None;

        if let Some(range) = context_old_range(line) {
            log::debug!("context hunk *** {range} ****");
            let untouched = self.acc.old.is_empty() && self.acc.part.is_empty();
            out = if untouched {
                self.acc.take_change()
            } else {
                self.acc.flush()
            };
            self.acc.part.clear();
            self.acc.phase = Phase::OldSide;
        } else if let Some(range) = context_new_range(line) {
            log::trace!("context new side --- {range} ----");
            self.acc.capture_old();
            self.acc.phase = Phase::NewSide;
        } else if !is_context_cruft(line) {
            self.acc.push_content(strip_columns(line, 2));
        }

        self.acc.push_raw(line);
        out
    }

    fn finish(&mut self) -> Option<String> {
        self.acc.flush()
    }

    fn state(&self) -> &Accumulator {
        &self.acc
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::segment::run;
    use similar_asserts::assert_eq;

    const PREAMBLE: &str = "\
*** a.txt       2021-12-11 22:16:26.478662800 +0100
--- b.txt       2021-12-11 23:50:41.235329900 +0100
";

    const REWRAP_HUNK: &str = "\
***************
*** 3 ****
! bees are nice
--- 3,4 ----
! bees are
! nice
";

    const CHANGE_HUNK: &str = "\
***************
*** 6,7 ****
! second
! diff
--- 7,8 ----
! second diff
! and more!
";

    #[test]
    fn drops_rewrapped_hunk_keeps_preamble_and_change() {
        let input = format!("{PREAMBLE}{REWRAP_HUNK}{CHANGE_HUNK}");
        let output = run::<ContextSegmenter>(&input).concat();
        assert_eq!(output, format!("{PREAMBLE}{CHANGE_HUNK}"));
    }

    #[test]
    fn preamble_is_its_own_chunk() {
        let input = format!("{PREAMBLE}{CHANGE_HUNK}");
        let chunks = run::<ContextSegmenter>(&input);
        assert_eq!(
            chunks,
            vec![
                format!("{PREAMBLE}***************\n"),
                CHANGE_HUNK.trim_start_matches("***************\n").to_string(),
            ]
        );
    }

    #[test]
    fn only_whitespace_hunks_leaves_preamble() {
        let input = format!("{PREAMBLE}{REWRAP_HUNK}");
        let output = run::<ContextSegmenter>(&input).concat();
        assert_eq!(output, format!("{PREAMBLE}***************\n"));
    }

    #[test]
    fn headers_without_hunks_produce_nothing() {
        assert!(run::<ContextSegmenter>(PREAMBLE).is_empty());
    }

    #[test]
    fn empty_input() {
        assert!(run::<ContextSegmenter>("").is_empty());
    }

    #[test]
    fn added_and_removed_lines_are_content() {
        let input = "\
*** 1,2 ****
- gone
  kept
--- 1 ----
  kept
";
        let chunks = run::<ContextSegmenter>(input);
        assert_eq!(chunks, vec![input.to_string()]);
    }

    #[test]
    fn context_lines_on_both_sides_compare_equal() {
        let input = "\
*** 1,2 ****
! one two
  kept
--- 1,3 ----
! one
! two
  kept
";
        assert!(run::<ContextSegmenter>(input).is_empty());
    }

    #[test]
    fn cruft_does_not_touch_side_buffer() {
        let mut segmenter = ContextSegmenter::default();
        segmenter.step("*** 3 ****\n");
        segmenter.step("! word\n");
        segmenter.step("***************\n");
        assert_eq!(segmenter.state().part, "word\n");
        assert_eq!(segmenter.state().change, "*** 3 ****\n! word\n***************\n");
    }

    #[test]
    fn old_range_marker_keeps_old_side() {
        let mut segmenter = ContextSegmenter::default();
        for line in ["*** 3 ****\n", "! a b\n", "--- 3,4 ----\n", "! a\n", "! b\n"] {
            segmenter.step(line);
        }
        assert_eq!(segmenter.state().phase, Phase::NewSide);

        // Whitespace-only hunk: dropped without output.
        assert_eq!(segmenter.step("*** 9 ****\n"), None);
        assert_eq!(segmenter.state().old, "a b\n");
        assert_eq!(segmenter.state().part, "");
        assert_eq!(segmenter.state().change, "*** 9 ****\n");
        assert_eq!(segmenter.state().phase, Phase::OldSide);
    }
}
