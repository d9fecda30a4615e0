//! Transcript format validation.
//!
//! Every analysis is gated on [`validate`]: text that does not look like a
//! WhatsApp export never reaches the remote model.

pub mod format;

pub use format::{validate, FormatValidator, DEFAULT_PREFIX_LINES};
