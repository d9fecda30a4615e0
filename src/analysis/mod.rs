//! Analysis result model and reply parsing.
//!
//! * [`AnalysisResult`]: the typed dashboard data; every field defaulted.
//! * [`parse_reply`]: fence-strip, parse, merge over defaults.
//! * [`ParseError`]: why a reply was rejected.

pub mod parse;
pub mod result;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use parse::{merge_defaults, parse_reply, strip_code_fence, ParseError};
pub use result::{
    AnalysisResult, Apology, Compliment, ConversationFlow, Debate, EmojiCount, FunStats,
    MediaCounts, Memory, MoodMetrics, Participants, RelationshipMetrics, ReplySpeed, TextingStyle,
    TextingStyles, WordFrequency,
};
