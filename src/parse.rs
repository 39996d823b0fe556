//! Recognizers for the structural lines of each diff dialect.
//!
//! Every function here takes one raw input line (terminator included) and
//! answers whether it has a particular marker shape. Header lines are parsed
//! into small structs so they can be logged and tested; everything else is a
//! plain predicate.
//!
//! # Marker shapes
//!
//! | Dialect  | Line                         | Recognizer                  |
//! |----------|------------------------------|-----------------------------|
//! | normal   | `6,7c7,8`                    | [`normal_header`]           |
//! | normal   | `---`                        | [`is_normal_separator`]     |
//! | context  | `*** 6,7 ****`               | [`context_old_range`]       |
//! | context  | `--- 7,8 ----`               | [`context_new_range`]       |
//! | context  | `*** a.txt`, `***************` | [`is_context_cruft`]      |
//! | unified  | `@@ -6,2 +7,2 @@`            | [`unified_header`]          |
//! | unified  | `--- a.txt`, `+++ b.txt`     | [`is_unified_file_header`]  |
//!
//! Header lines must match as a whole: only a single trailing `\n` is
//! allowed after the marker.
//!
//! # Examples
//!
//! ```
//! use diff_wsfilter::parse::{ChangeKind, LineRange, normal_header};
//!
//! let header = normal_header("6,7c7,8\n").unwrap();
//! assert_eq!(header.old, LineRange { start: 6, end: Some(7) });
//! assert_eq!(header.kind, ChangeKind::Change);
//! assert_eq!(header.to_string(), "6,7c7,8");
//!
//! assert!(normal_header("< 6,7c7,8\n").is_none());
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, one_of, u64 as number},
    combinator::{all_consuming, map, opt, rest, value},
    sequence::{delimited, preceded},
};
use std::fmt;

/// A line range as written in normal and context headers: `N` or `N,M`.
///
/// In unified headers the second number is a length rather than an end line,
/// but the shape is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{},{}", self.start, end),
            None => write!(f, "{}", self.start),
        }
    }
}

/// The command letter of a normal diff header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// `a`: lines added after the old range
    Append,
    /// `c`: old range replaced by new range
    Change,
    /// `d`: old range deleted
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ChangeKind::Append => 'a',
            ChangeKind::Change => 'c',
            ChangeKind::Delete => 'd',
        };
        write!(f, "{letter}")
    }
}

/// Parsed normal diff hunk header, e.g. `3c3,4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalHeader {
    pub old: LineRange,
    pub kind: ChangeKind,
    pub new: LineRange,
}

impl fmt::Display for NormalHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.old, self.kind, self.new)
    }
}

/// Parsed unified diff hunk header, e.g. `@@ -3 +3,2 @@ fn main()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifiedHeader<'a> {
    pub old: LineRange,
    pub new: LineRange,
    /// Section heading after the closing `@@`, as written by `diff -p`
    pub section: Option<&'a str>,
}

impl fmt::Display for UnifiedHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@@ -{} +{} @@", self.old, self.new)?;
        if let Some(section) = self.section {
            write!(f, " {section}")?;
        }
        Ok(())
    }
}

/// Parse a normal diff hunk header: `N[,N]{a|c|d}N[,N]`.
#[must_use]
pub fn normal_header(line: &str) -> Option<NormalHeader> {
    all_consuming((line_range, change_kind, line_range))
        .parse(without_newline(line))
        .ok()
        .map(|(_, (old, kind, new))| NormalHeader { old, kind, new })
}

/// The `---` line separating old from new lines in a normal diff hunk.
#[must_use]
pub fn is_normal_separator(line: &str) -> bool {
    line.starts_with("---")
}

/// Parse a context diff old-range marker: `*** N[,N] ****`.
#[must_use]
pub fn context_old_range(line: &str) -> Option<LineRange> {
    all_consuming(delimited(tag("*** "), line_range, tag(" ****")))
        .parse(without_newline(line))
        .ok()
        .map(|(_, range)| range)
}

/// Parse a context diff new-range marker: `--- N[,N] ----`.
#[must_use]
pub fn context_new_range(line: &str) -> Option<LineRange> {
    all_consuming(delimited(tag("--- "), line_range, tag(" ----")))
        .parse(without_newline(line))
        .ok()
        .map(|(_, range)| range)
}

/// Context diff lines that carry no content: file headers and the
/// `***************` hunk separator.
///
/// Any line starting with three characters from `*` and `-` qualifies, so
/// this must be checked after [`context_old_range`] and [`context_new_range`].
#[must_use]
pub fn is_context_cruft(line: &str) -> bool {
    matches!(
        line.as_bytes(),
        [a, b, c, ..] if [a, b, c].iter().all(|byte| matches!(byte, b'*' | b'-'))
    )
}

/// Parse a unified diff hunk header: `@@ ±N[,N] ±N[,N] @@[ section]`.
#[must_use]
pub fn unified_header(line: &str) -> Option<UnifiedHeader<'_>> {
    all_consuming(unified_header_fields)
        .parse(without_newline(line))
        .ok()
        .map(|(_, header)| header)
}

/// Unified diff file header lines: `--- old` and `+++ new`.
#[must_use]
pub fn is_unified_file_header(line: &str) -> bool {
    matches!(
        line.as_bytes(),
        [a, b, c, b' ', ..] if [a, b, c].iter().all(|byte| matches!(byte, b'+' | b'-'))
    )
}

/// Drop the first `columns` characters of a line (its marker prefix).
///
/// Lines shorter than that yield an empty string.
#[must_use]
pub fn strip_columns(line: &str, columns: usize) -> &str {
    match line.char_indices().nth(columns) {
        Some((idx, _)) => &line[idx..],
        None => "",
    }
}

/// Remove a single trailing `\n`, if present
fn without_newline(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

fn line_range(input: &str) -> IResult<&str, LineRange> {
    map((number, opt(preceded(char(','), number))), |(start, end)| {
        LineRange { start, end }
    })
    .parse(input)
}

fn change_kind(input: &str) -> IResult<&str, ChangeKind> {
    alt((
        value(ChangeKind::Append, char('a')),
        value(ChangeKind::Change, char('c')),
        value(ChangeKind::Delete, char('d')),
    ))
    .parse(input)
}

/// `+N[,N]` or `-N[,N]`; either sign is accepted on either side
fn signed_range(input: &str) -> IResult<&str, LineRange> {
    preceded(one_of("+-"), line_range).parse(input)
}

fn unified_header_fields(input: &str) -> IResult<&str, UnifiedHeader<'_>> {
    map(
        (
            tag("@@ "),
            signed_range,
            char(' '),
            signed_range,
            tag(" @@"),
            opt(preceded(char(' '), rest)),
        ),
        |(_, old, _, new, _, section)| UnifiedHeader { old, new, section },
    )
    .parse(input)
}
