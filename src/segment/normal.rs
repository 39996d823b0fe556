//! Normal diff (`diff` without format flags).
//!
//! ```text
//! 6,7c7,8
//! < second
//! < diff
//! ---
//! > second diff
//! > and more!
//! ```

use super::{Accumulator, Phase, Segmenter};
use crate::parse::{is_normal_separator, normal_header, strip_columns};

/// Segmenter for normal diff output.
///
/// A hunk runs from its `NcN` header up to the next header. Lines before the
/// `---` separator form the old side, lines after it the new side; both lose
/// their `< ` / `> ` prefix.
#[derive(Debug, Default)]
pub struct NormalSegmenter {
    acc: Accumulator,
}

impl Segmenter for NormalSegmenter {
    fn step(&mut self, line: &str) -> Option<String> {
        let mut out = None;

        if let Some(header) = normal_header(line) {
            log::debug!("normal hunk {header}");
            out = self.acc.flush();
            self.acc = Accumulator {
                phase: Phase::OldSide,
                ..Accumulator::default()
            };
        } else if is_normal_separator(line) {
            self.acc.capture_old();
            self.acc.phase = Phase::NewSide;
        } else {
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

    const TWO_HUNKS: &str = "\
3c3,4
< bees are nice
---
> bees are
> nice
6,7c7,8
< second
< diff
---
> second diff
> and more!
";

    #[test]
    fn drops_rewrapped_hunk_keeps_real_change() {
        assert_eq!(
            run::<NormalSegmenter>(TWO_HUNKS),
            vec!["6,7c7,8\n< second\n< diff\n---\n> second diff\n> and more!\n".to_string()]
        );
    }

    #[test]
    fn last_line_without_newline() {
        let input = TWO_HUNKS.trim_end();
        assert_eq!(
            run::<NormalSegmenter>(input),
            vec!["6,7c7,8\n< second\n< diff\n---\n> second diff\n> and more!".to_string()]
        );
    }

    #[test]
    fn keeps_every_changed_hunk_in_order() {
        let input = "1c1\n< a\n---\n> b\n5c5\n< c\n---\n> d\n";
        assert_eq!(
            run::<NormalSegmenter>(input),
            vec!["1c1\n< a\n---\n> b\n".to_string(), "5c5\n< c\n---\n> d\n".to_string()]
        );
    }

    #[test]
    fn pure_additions_and_deletions_are_changes() {
        let input = "2a3\n> added\n7d7\n< removed\n";
        assert_eq!(
            run::<NormalSegmenter>(input),
            vec!["2a3\n> added\n".to_string(), "7d7\n< removed\n".to_string()]
        );
    }

    #[test]
    fn old_side_does_not_leak_into_next_hunk() {
        // The second hunk appends what the first one deleted; it is still a change.
        let input = "1c1\n< x y\n---\n> x\n> y\n4a5\n> x y\n";
        assert_eq!(run::<NormalSegmenter>(input), vec!["4a5\n> x y\n".to_string()]);
    }

    #[test]
    fn blank_line_only_changes_are_dropped() {
        let input = "3a4\n> \n9d9\n< \t\n";
        assert!(run::<NormalSegmenter>(input).is_empty());
    }

    #[test]
    fn empty_input() {
        assert!(run::<NormalSegmenter>("").is_empty());
    }

    #[test]
    fn text_before_first_header_is_a_pseudo_hunk() {
        let input = "Only in a: junk\n1c1\n< a\n---\n> a\n";
        assert_eq!(
            run::<NormalSegmenter>(input),
            vec!["Only in a: junk\n".to_string()]
        );
    }

    #[test]
    fn header_resets_state() {
        let mut segmenter = NormalSegmenter::default();
        for line in ["1c1\n", "< a\n", "---\n", "> a b\n"] {
            segmenter.step(line);
        }
        assert_eq!(segmenter.state().phase, Phase::NewSide);
        assert_eq!(segmenter.state().old, "a\n");
        assert_eq!(segmenter.state().part, "a b\n");

        let out = segmenter.step("4c4\n");
        assert_eq!(out.as_deref(), Some("1c1\n< a\n---\n> a b\n"));
        assert_eq!(
            segmenter.state(),
            &Accumulator {
                change: "4c4\n".to_string(),
                phase: Phase::OldSide,
                ..Accumulator::default()
            }
        );
    }

    #[test]
    fn separator_captures_old_side() {
        let mut segmenter = NormalSegmenter::default();
        segmenter.step("3c3\n");
        segmenter.step("< old words\n");
        assert_eq!(segmenter.state().phase, Phase::OldSide);
        segmenter.step("---\n");
        assert_eq!(segmenter.state().phase, Phase::NewSide);
        assert_eq!(segmenter.state().old, "old words\n");
        assert_eq!(segmenter.state().part, "");
    }
}
