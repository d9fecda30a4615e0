//! Analysis prompt.
//!
//! The prompt is a fixed instruction block that spells out the exact JSON
//! shape of [`AnalysisResult`](crate::analysis::AnalysisResult), followed by
//! [`TRANSCRIPT_DELIMITER`] and the user's transcript verbatim.

// ---------------------------------------------------------------------------
// Instruction template
// ---------------------------------------------------------------------------

/// Field names must stay in sync with `analysis::result`.
const ANALYSIS_INSTRUCTION: &str = r#"Analyze this WhatsApp conversation between two people and return ONLY a JSON object (no markdown formatting, no backticks) with exactly this structure:

{
  "participants": { "person1": "real name of the first person", "person2": "real name of the second person" },
  "textingStyles": {
    "person1": {
      "enthusiasm": number between 0-100,
      "responseTime": number,
      "emojiUsage": number between 0-100,
      "emojiStats": [
        { "emoji": "😊", "count": number },
        { "emoji": "❤️", "count": number },
        { "emoji": "😂", "count": number },
        { "emoji": "🥰", "count": number },
        { "emoji": "😍", "count": number }
      ],
      "textLength": "short/medium/long",
      "ghostingScore": number between 0-100
    },
    "person2": { same fields as person1 }
  },
  "moodMetrics": {
    "happy": number between 0-100,
    "neutral": number between 0-100,
    "sad": number between 0-100
  },
  "relationshipMetrics": {
    "compatibilityScore": number between 0-100,
    "breakupProbability": number between 0-100,
    "banterLevel": number between 0-100,
    "flirtScore": number between 0-100,
    "redFlags": number between 0-10,
    "greenFlags": number between 0-10
  },
  "conversationFlow": {
    "dryTexting": number between 0-100,
    "excitementLevel": number between 0-100,
    "mutualInterest": number between 0-100,
    "topicVariety": number between 0-100
  },
  "funStats": {
    "whoTextedFirst": "person1" or "person2",
    "whoSendsMoreEmojis": "person1" or "person2",
    "whoGhostsMore": "person1" or "person2",
    "whoIsMoreClingy": "person1" or "person2"
  },
  "responseTime": { "average": "time", "fastest": "time", "slowest": "time" },
  "petNames": ["pet name used in the chat"],
  "insideJokes": ["short description of a running joke"],
  "debates": [{ "topic": "topic", "intensity": number between 0-100 }],
  "compliments": [{ "from": "name", "to": "name", "text": "compliment" }],
  "memoryLane": [{ "date": "date", "event": "memorable moment" }],
  "wordCloud": [{ "word": "word", "frequency": number }],
  "apologies": [{ "from": "name", "to": "name", "reason": "reason" }],
  "media": { "gifs": number, "images": number, "videos": number }
}

Important: Return ONLY the JSON object. Ensure all numbers are actual numbers, not strings. Extract real names from the chat."#;

/// Separates the instruction block from the transcript.
pub const TRANSCRIPT_DELIMITER: &str = "\n\nChat transcript:\n";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the single-string analysis prompt.
///
/// # Example
/// ```rust
/// use chat_vibes::llm::PromptBuilder;
///
/// let prompt = PromptBuilder::new().build("[17/01/25, 10:12:01 PM] A: hi");
/// assert!(prompt.ends_with("Chat transcript:\n[17/01/25, 10:12:01 PM] A: hi"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// The fixed instruction block, without the transcript.
    pub fn instruction(&self) -> &'static str {
        ANALYSIS_INSTRUCTION
    }

    /// Instruction, delimiter, transcript, in that order.
    pub fn build(&self, transcript: &str) -> String {
        let mut prompt = String::with_capacity(
            ANALYSIS_INSTRUCTION.len() + TRANSCRIPT_DELIMITER.len() + transcript.len(),
        );
        prompt.push_str(ANALYSIS_INSTRUCTION);
        prompt.push_str(TRANSCRIPT_DELIMITER);
        prompt.push_str(transcript);
        prompt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_instruction_delimiter_transcript() {
        let transcript = "[17/01/25, 10:12:01 PM] A: hi\n[17/01/25, 10:12:05 PM] B: hey";
        let prompt = PromptBuilder::new().build(transcript);

        assert!(prompt.starts_with(ANALYSIS_INSTRUCTION));
        assert_eq!(
            &prompt[ANALYSIS_INSTRUCTION.len()..],
            format!("{TRANSCRIPT_DELIMITER}{transcript}")
        );
    }

    #[test]
    fn instruction_names_every_metric_group() {
        let instruction = PromptBuilder::new().instruction();
        for group in [
            "participants",
            "textingStyles",
            "moodMetrics",
            "relationshipMetrics",
            "conversationFlow",
            "funStats",
            "responseTime",
            "petNames",
            "insideJokes",
            "debates",
            "compliments",
            "memoryLane",
            "wordCloud",
            "apologies",
            "media",
        ] {
            assert!(
                instruction.contains(&format!("\"{group}\"")),
                "instruction must describe {group}"
            );
        }
    }

    #[test]
    fn instruction_asks_for_bare_json() {
        let instruction = PromptBuilder::new().instruction();
        assert!(instruction.contains("ONLY a JSON object"));
        assert!(instruction.contains("not strings"));
    }

    #[test]
    fn transcript_is_not_altered() {
        let transcript = "  [1/2/2025, 1:02:03 AM] Zoë: 🥰\r\n";
        let prompt = PromptBuilder::new().build(transcript);
        assert!(prompt.ends_with(transcript));
    }
}
