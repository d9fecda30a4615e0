//! Transcript input helpers.
//!
//! Two ways to get an export into the text box besides typing:
//!
//! * [`read_clipboard`]: the "Paste" button, backed by `arboard`.
//! * [`read_transcript_file`]: a `.txt` export dropped onto the window.
//!
//! # Usage
//!
//! ```no_run
//! use chat_vibes::input::read_clipboard;
//!
//! if let Some(text) = read_clipboard().expect("clipboard unavailable") {
//!     println!("{} bytes pasted", text.len());
//! }
//! ```

pub mod clipboard;
pub mod file;

pub use clipboard::read_clipboard;
pub use file::{is_transcript_file, read_transcript_file};

use thiserror::Error;

// ---------------------------------------------------------------------------
// InputError
// ---------------------------------------------------------------------------

/// Errors that can surface while loading a transcript.
#[derive(Debug, Error)]
pub enum InputError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// The dropped file is not a plain-text export.
    #[error("{0} is not a .txt chat export")]
    UnsupportedFile(String),

    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
