//! Hunk segmentation shared by the three diff dialects.
//!
//! Each dialect is a [`Segmenter`]: a state machine over one [`Accumulator`]
//! that is advanced one raw line at a time and flushed once at end of input.
//! [`Filtered`] drives a segmenter over a line source and yields the chunks
//! worth keeping.

pub mod context;
pub mod normal;
pub mod unified;

pub use context::ContextSegmenter;
pub use normal::NormalSegmenter;
pub use unified::UnifiedSegmenter;

use crate::InputError;
use crate::compare::{normalize, same};
use std::iter::FusedIterator;
use std::mem;

/// Where a segmenter is within the current hunk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No hunk marker seen yet
    #[default]
    AwaitingHunk,
    /// Collecting lines of the old (pre-change) side
    OldSide,
    /// Collecting lines of the new (post-change) side
    NewSide,
}

/// All state carried from one line to the next while segmenting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Accumulator {
    /// Raw text of the current hunk, markers included
    pub change: String,
    /// Captured old side, prefixes stripped
    pub old: String,
    /// Side currently being filled, prefixes stripped
    pub part: String,
    /// Which side of the hunk `part` is collecting
    pub phase: Phase,
}

impl Accumulator {
    /// Whether the old side and the side being filled differ in words.
    #[must_use]
    pub fn differs(&self) -> bool {
        let differs = !same(&self.old, &self.part);
        log::trace!(
            "compare {:?} with {:?}: {}",
            normalize(&self.old),
            normalize(&self.part),
            if differs { "differ" } else { "same" }
        );
        differs
    }

    /// Take the raw hunk text if it should be emitted.
    ///
    /// Returns `None` for an empty hunk; the accumulator is cleared either way.
    pub fn take_change(&mut self) -> Option<String> {
        Some(mem::take(&mut self.change)).filter(|change| !change.is_empty())
    }

    /// Yield the hunk if its sides differ, otherwise drop it.
    pub fn flush(&mut self) -> Option<String> {
        if self.differs() {
            log::debug!("keeping hunk ({} bytes)", self.change.len());
            self.take_change()
        } else {
            log::debug!("dropping whitespace-only hunk ({} bytes)", self.change.len());
            self.change.clear();
            None
        }
    }

    /// The side being filled becomes the old side.
    pub fn capture_old(&mut self) {
        self.old = mem::take(&mut self.part);
    }

    /// Append a line, exactly as read, to the hunk text.
    pub fn push_raw(&mut self, line: &str) {
        self.change.push_str(line);
    }

    /// Append prefix-stripped content to the side being filled.
    pub fn push_content(&mut self, content: &str) {
        self.part.push_str(content);
    }
}

/// A per-dialect state machine turning raw lines into output chunks.
pub trait Segmenter {
    /// Advance by one raw line, returning a chunk ready for output.
    fn step(&mut self, line: &str) -> Option<String>;

    /// Flush the trailing hunk once input is exhausted.
    fn finish(&mut self) -> Option<String>;

    /// Current state, for inspection.
    fn state(&self) -> &Accumulator;
}

impl<S: Segmenter + ?Sized> Segmenter for Box<S> {
    fn step(&mut self, line: &str) -> Option<String> {
        (**self).step(line)
    }

    fn finish(&mut self) -> Option<String> {
        (**self).finish()
    }

    fn state(&self) -> &Accumulator {
        (**self).state()
    }
}

/// Lazily filtered diff output.
///
/// Consumes its line source, so it can be iterated only once. Dropping it
/// before exhaustion needs no cleanup.
pub struct Filtered<I, S> {
    lines: I,
    segmenter: S,
    done: bool,
}

impl<I, S> Filtered<I, S>
where
    I: Iterator<Item = Result<String, InputError>>,
    S: Segmenter,
{
    pub fn new(lines: I, segmenter: S) -> Self {
        Self {
            lines,
            segmenter,
            done: false,
        }
    }
}

impl<I, S> Iterator for Filtered<I, S>
where
    I: Iterator<Item = Result<String, InputError>>,
    S: Segmenter,
{
    type Item = Result<String, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    if let Some(chunk) = self.segmenter.step(&line) {
                        return Some(Ok(chunk));
                    }
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    return self.segmenter.finish().map(Ok);
                }
            }
        }
    }
}

impl<I, S> FusedIterator for Filtered<I, S>
where
    I: Iterator<Item = Result<String, InputError>>,
    S: Segmenter,
{
}

/// Run a segmenter over in-memory text, collecting the kept chunks.
#[cfg(test)]
pub(crate) fn run<S: Segmenter + Default>(text: &str) -> Vec<String> {
    let mut segmenter = S::default();
    let mut chunks: Vec<String> = text
        .split_inclusive('\n')
        .filter_map(|line| segmenter.step(line))
        .collect();
    chunks.extend(segmenter.finish());
    chunks
}
