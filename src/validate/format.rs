//! Export-format check for pasted WhatsApp transcripts.
//!
//! An exported chat starts every message with a bracketed timestamp:
//!
//! ```text
//! [17/01/25, 10:12:01 PM] Alice: hi
//! [5/1/2025, 9:03:44 AM] Bob: morning
//! ```
//!
//! Only a short prefix of the text is inspected.  Export tools sometimes
//! prepend blank lines or a banner, so any match inside the window is
//! accepted, not just the first line.

use std::sync::LazyLock;

use regex::Regex;

/// Day and month may be padded or not; the year is two or four digits.
static TIMESTAMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\d{1,2}/\d{1,2}/(?:\d{2}|\d{4}),\s\d{1,2}:\d{2}:\d{2}\s[AP]M\]")
        .expect("timestamp pattern is valid")
});

/// Number of leading lines inspected by [`validate`].
pub const DEFAULT_PREFIX_LINES: usize = 5;

/// Checks whether text looks like a WhatsApp chat export.
///
/// ```
/// use chat_vibes::validate::FormatValidator;
///
/// let validator = FormatValidator::default();
/// assert!(validator.validate("[17/01/25, 10:12:01 PM] A: hi"));
/// assert!(!validator.validate("hello\nhow are you"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatValidator {
    prefix_lines: usize,
}

impl FormatValidator {
    /// Create a validator that inspects the first `prefix_lines` lines.
    pub fn with_window(prefix_lines: usize) -> Self {
        Self { prefix_lines }
    }

    /// Returns `true` if any of the first `prefix_lines` lines begins with an
    /// export timestamp.  Empty input is never valid.
    pub fn validate(&self, text: &str) -> bool {
        text.lines()
            .take(self.prefix_lines)
            .any(|line| TIMESTAMP_LINE.is_match(line))
    }
}

impl Default for FormatValidator {
    fn default() -> Self {
        Self::with_window(DEFAULT_PREFIX_LINES)
    }
}

/// [`FormatValidator::validate`] with the default five-line window.
pub fn validate(text: &str) -> bool {
    FormatValidator::default().validate(text)
}
