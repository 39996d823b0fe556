//! Unified diff (`diff -u`, `git diff`).
//!
//! ```text
//! --- a.txt
//! +++ b.txt
//! @@ -6,2 +7,2 @@
//! -second
//! -diff
//! +second diff
//! +and more!
//! ```

use super::{Accumulator, Phase, Segmenter};
use crate::parse::{is_unified_file_header, strip_columns, unified_header};

/// Segmenter for unified diff output.
///
/// Unified hunks interleave removed and added lines without a separator, so
/// the side switches whenever the leading character of a line differs from
/// the previous one. File header lines bypass hunk buffering: each one is
/// emitted alone as soon as it is seen and leaves the pending hunk as it was.
/// In a multi-file diff, the previous file's last hunk is therefore emitted
/// after the next file's headers.
#[derive(Debug, Default)]
pub struct UnifiedSegmenter {
    acc: Accumulator,
    /// Leading character of the last content line in this hunk
    marker: Option<char>,
}

impl UnifiedSegmenter {
    /// Leading character of the last content line, if any since the header.
    #[must_use]
    pub fn marker(&self) -> Option<char> {
        self.marker
    }
}

impl Segmenter for UnifiedSegmenter {
    fn step(&mut self, line: &str) -> Option<String> {
        let mut out = None;

        if let Some(header) = unified_header(line) {
            log::debug!("unified hunk {header}");
            out = self.acc.flush();
            self.acc = Accumulator {
                phase: Phase::OldSide,
                ..Accumulator::default()
            };
            self.marker = None;
        } else if is_unified_file_header(line) {
            log::debug!("file header {}", line.trim_end());
            return Some(line.to_string());
        } else {
            let marker = line.chars().next();
            if marker != self.marker {
                self.acc.capture_old();
                self.marker = marker;
                match marker {
                    Some('-') => self.acc.phase = Phase::OldSide,
                    Some('+') => self.acc.phase = Phase::NewSide,
                    _ => {}
                }
            }
            self.acc.push_content(strip_columns(line, 1));
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
