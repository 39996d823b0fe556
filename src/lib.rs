//! Filter whitespace-only hunks out of diff output.
//!
//! Normal, context and unified diffs are read line by line; every hunk whose
//! old and new sides contain the same words is dropped, everything else is
//! passed through exactly as received.
//!
//! # Examples
//!
//! ```
//! use diff_wsfilter::Dialect;
//!
//! let diff = "\
//! 3c3,4
//! < bees are nice
//! ---
//! > bees are
//! > nice
//! 6,7c7,8
//! < second
//! < diff
//! ---
//! > second diff
//! > and more!
//! ";
//! let filtered = Dialect::Normal.filter_str(diff);
//! assert_eq!(filtered, "6,7c7,8\n< second\n< diff\n---\n> second diff\n> and more!\n");
//! ```

use error_set::error_set;
use std::io::{BufRead, ErrorKind, Write};

pub mod compare;
pub mod input;
pub mod parse;
pub mod segment;

use input::RawLines;
use segment::{ContextSegmenter, Filtered, NormalSegmenter, Segmenter, UnifiedSegmenter};

error_set! {
    /// Top-level error for diff-wsfilter runs
    WsFilterError := {
        #[display("Failed to open {path}: {message}")]
        OpenFailed { path: String, message: String },
        #[display("Failed to write filtered output: {message}")]
        WriteFailed { message: String },
    } || InputError

    /// Errors from reading diff input
    InputError := {
        #[display("Failed to read diff input: {message}")]
        ReadFailed { message: String },
    }
}

/// The diff output format being filtered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Dialect {
    /// Normal diff: `3c3,4` headers, `<`/`>` lines
    #[default]
    #[value(name = "diff")]
    Normal,
    /// Context diff (`diff -c`): `*** N ****` / `--- N ----` ranges
    #[value(name = "cdiff")]
    Context,
    /// Unified diff (`diff -u`): `@@ -N +N @@` headers, `-`/`+` lines
    #[value(name = "udiff")]
    Unified,
}

impl Dialect {
    /// Pick a dialect from the `-c` and `-u` flags; `-c` wins if both are set.
    #[must_use]
    pub fn from_flags(context: bool, unified: bool) -> Self {
        if context {
            Dialect::Context
        } else if unified {
            Dialect::Unified
        } else {
            Dialect::Normal
        }
    }

    /// A fresh segmenter for this dialect.
    #[must_use]
    pub fn segmenter(self) -> Box<dyn Segmenter> {
        match self {
            Dialect::Normal => Box::new(NormalSegmenter::default()),
            Dialect::Context => Box::new(ContextSegmenter::default()),
            Dialect::Unified => Box::new(UnifiedSegmenter::default()),
        }
    }

    /// Lazily filter diff text read from `reader`.
    pub fn filter<R: BufRead>(self, reader: R) -> Filtered<RawLines<R>, Box<dyn Segmenter>> {
        log::debug!("filtering {self:?} diff");
        Filtered::new(RawLines::new(reader), self.segmenter())
    }

    /// Filter diff text held in memory, returning the kept output.
    #[must_use]
    pub fn filter_str(self, text: &str) -> String {
        let lines = text.split_inclusive('\n').map(|line| Ok(line.to_string()));
        Filtered::new(lines, self.segmenter())
            .filter_map(Result::ok)
            .collect()
    }

    /// Filter `reader` into `writer`, chunk by chunk.
    ///
    /// A closed pipe on the writer ends the run without error: whoever reads
    /// the output has stopped listening.
    ///
    /// # Errors
    ///
    /// Returns [`WsFilterError`] if reading the input or writing the output
    /// fails.
    pub fn run<R: BufRead, W: Write>(self, reader: R, mut writer: W) -> Result<(), WsFilterError> {
        for chunk in self.filter(reader) {
            let chunk = chunk?;
            if let Err(err) = writer.write_all(chunk.as_bytes()) {
                return write_result(err);
            }
        }
        writer.flush().or_else(write_result)
    }
}

fn write_result(err: std::io::Error) -> Result<(), WsFilterError> {
    if err.kind() == ErrorKind::BrokenPipe {
        log::debug!("output closed early");
        Ok(())
    } else {
        Err(WsFilterError::WriteFailed {
            message: err.to_string(),
        })
    }
}
