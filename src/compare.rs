//! Whitespace-insensitive comparison of hunk sides.
//!
//! Two blocks of text are considered the same when they contain the same
//! words in the same order, regardless of how those words are spaced or
//! wrapped across lines.
//!
//! ```
//! use diff_wsfilter::compare::same;
//!
//! assert!(same("long line", "long\nline"));
//! assert!(same("bees are nice\n", "bees are\n  nice\n"));
//! assert!(!same("second\ndiff\n", "second diff\nand more!\n"));
//! ```

/// Unicode whitespace plus the ASCII information separators (U+001C to
/// U+001F), which regex engines count as `\s` but `char::is_whitespace`
/// does not.
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_space).filter(|word| !word.is_empty())
}

/// Compare two texts ignoring every difference in whitespace.
///
/// Each text is padded with one space on both ends and every run of
/// whitespace (line breaks included) is collapsed to a single space before
/// comparing. That is exactly equality of the whitespace-separated words.
#[must_use]
pub fn same(old: &str, new: &str) -> bool {
    words(old).eq(words(new))
}

/// Padded and collapsed form of `text`, as compared by [`same`].
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut result = String::from(" ");
    for word in words(text) {
        result.push_str(word);
        result.push(' ');
    }
    result
}
