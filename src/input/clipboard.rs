//! Clipboard reads backed by the `arboard` crate.
//!
//! A short-lived [`arboard::Clipboard`] handle is created per call because
//! `arboard::Clipboard` is not `Send` on all platforms and the handle is
//! cheap to create.

use arboard::Clipboard;

use super::InputError;

/// Read the current clipboard plain-text content.
///
/// Returns `Ok(None)` when the clipboard is empty or holds non-text data
/// (e.g. an image).
///
/// # Errors
///
/// Returns [`InputError::ClipboardAccess`] if the OS clipboard cannot be
/// opened.
pub fn read_clipboard() -> Result<Option<String>, InputError> {
    let mut clipboard =
        Clipboard::new().map_err(|e| InputError::ClipboardAccess(e.to_string()))?;
    // `get_text` returns Err if empty or non-text, treat both as None
    Ok(clipboard.get_text().ok().filter(|text| !text.is_empty()))
}
