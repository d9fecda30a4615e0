//! Typed analysis result returned by the remote model.
//!
//! The model is asked for a fixed JSON shape but is free to omit fields, send
//! `null`, or quote numbers.  Every field here therefore has a default, and
//! scalar fields go through lenient deserializers: numbers accept `80`,
//! `80.0`, `"80"`, `"80%"` and `null`; strings accept `null` and bare
//! numbers.  Lists accept `null` and skip `null` entries.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// Complete dashboard data for one analysed chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisResult {
    pub participants: Participants,
    pub texting_styles: TextingStyles,
    pub mood_metrics: MoodMetrics,
    pub relationship_metrics: RelationshipMetrics,
    pub conversation_flow: ConversationFlow,
    pub fun_stats: FunStats,
    /// Chat-wide reply delays, as free text (`"2 min"`).
    #[serde(rename = "responseTime")]
    pub reply_speed: ReplySpeed,
    #[serde(deserialize_with = "lenient_string_list")]
    pub pet_names: Vec<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub inside_jokes: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub debates: Vec<Debate>,
    #[serde(deserialize_with = "lenient_list")]
    pub compliments: Vec<Compliment>,
    #[serde(deserialize_with = "lenient_list")]
    pub memory_lane: Vec<Memory>,
    #[serde(deserialize_with = "lenient_list")]
    pub word_cloud: Vec<WordFrequency>,
    #[serde(deserialize_with = "lenient_list")]
    pub apologies: Vec<Apology>,
    pub media: MediaCounts,
}

/// Display names the model extracted for the two chat members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participants {
    #[serde(deserialize_with = "lenient_string")]
    pub person1: String,
    #[serde(deserialize_with = "lenient_string")]
    pub person2: String,
}

impl Participants {
    /// Resolve a `"person1"` / `"person2"` reference (as used in
    /// [`FunStats`]) to a display name.
    ///
    /// Falls back to the reference itself when the name is unknown, so the
    /// UI always has something to show.
    pub fn display_name<'a>(&'a self, reference: &'a str) -> &'a str {
        let name = match reference {
            "person1" => self.person1.as_str(),
            "person2" => self.person2.as_str(),
            _ => "",
        };
        if name.is_empty() {
            reference
        } else {
            name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextingStyles {
    pub person1: TextingStyle,
    pub person2: TextingStyle,
}

/// How one participant writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextingStyle {
    #[serde(deserialize_with = "lenient_f64")]
    pub enthusiasm: f64,
    /// Typical reply delay as reported by the model (unit unspecified).
    #[serde(deserialize_with = "lenient_f64")]
    pub response_time: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub emoji_usage: f64,
    #[serde(deserialize_with = "lenient_list")]
    pub emoji_stats: Vec<EmojiCount>,
    /// `"short"`, `"medium"` or `"long"`.
    #[serde(deserialize_with = "lenient_string")]
    pub text_length: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub ghosting_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiCount {
    #[serde(deserialize_with = "lenient_string")]
    pub emoji: String,
    #[serde(deserialize_with = "lenient_count")]
    pub count: u32,
}

/// Percentages, nominally 0–100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodMetrics {
    #[serde(deserialize_with = "lenient_f64")]
    pub happy: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub neutral: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub sad: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationshipMetrics {
    #[serde(deserialize_with = "lenient_f64")]
    pub compatibility_score: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub breakup_probability: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub banter_level: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub flirt_score: f64,
    #[serde(deserialize_with = "lenient_count")]
    pub red_flags: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub green_flags: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationFlow {
    #[serde(deserialize_with = "lenient_f64")]
    pub dry_texting: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub excitement_level: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub mutual_interest: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub topic_variety: f64,
}

/// Each field holds `"person1"` or `"person2"`; see
/// [`Participants::display_name`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunStats {
    #[serde(deserialize_with = "lenient_string")]
    pub who_texted_first: String,
    #[serde(deserialize_with = "lenient_string")]
    pub who_sends_more_emojis: String,
    #[serde(deserialize_with = "lenient_string")]
    pub who_ghosts_more: String,
    #[serde(deserialize_with = "lenient_string")]
    pub who_is_more_clingy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplySpeed {
    #[serde(deserialize_with = "lenient_string")]
    pub average: String,
    #[serde(deserialize_with = "lenient_string")]
    pub fastest: String,
    #[serde(deserialize_with = "lenient_string")]
    pub slowest: String,
}

/// A recurring argument and how heated it gets (0–100).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Debate {
    #[serde(deserialize_with = "lenient_string")]
    pub topic: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub intensity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compliment {
    #[serde(deserialize_with = "lenient_string")]
    pub from: String,
    #[serde(deserialize_with = "lenient_string")]
    pub to: String,
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Memory {
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub event: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordFrequency {
    #[serde(deserialize_with = "lenient_string")]
    pub word: String,
    #[serde(deserialize_with = "lenient_count")]
    pub frequency: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Apology {
    #[serde(deserialize_with = "lenient_string")]
    pub from: String,
    #[serde(deserialize_with = "lenient_string")]
    pub to: String,
    #[serde(deserialize_with = "lenient_string")]
    pub reason: String,
}

/// Shared media, by type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaCounts {
    #[serde(deserialize_with = "lenient_count")]
    pub gifs: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub images: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub videos: u32,
}

// ---------------------------------------------------------------------------
// Lenient numeric deserializers
// ---------------------------------------------------------------------------

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("number out of range")),
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches('%').trim();
            if trimmed.is_empty() {
                return Ok(0.0);
            }
            trimmed
                .parse::<f64>()
                .map_err(|e| D::Error::custom(format!("invalid number {s:?}: {e}")))
        }
        other => Err(D::Error::custom(format!("expected a number, found {other}"))),
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    if !value.is_finite() {
        return Err(D::Error::custom("count must be finite"));
    }
    Ok(value.max(0.0).round().min(u32::MAX as f64) as u32)
}

// ---------------------------------------------------------------------------
// Lenient string and list deserializers
// ---------------------------------------------------------------------------

fn text_of(value: Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a string, found {other}")),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    text_of(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// `null` yields an empty list; `null` entries are dropped.
fn list_items<E: serde::de::Error>(value: Value) -> Result<Vec<Value>, E> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.into_iter().filter(|v| !v.is_null()).collect()),
        other => Err(E::custom(format!("expected a list, found {other}"))),
    }
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    list_items::<D::Error>(Value::deserialize(deserializer)?)?
        .into_iter()
        .map(|item| text_of(item).map_err(D::Error::custom))
        .collect()
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    list_items::<D::Error>(Value::deserialize(deserializer)?)?
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
