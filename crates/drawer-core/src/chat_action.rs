//! Conversational action parser.
//!
//! The conversational model replies with free text that either answers
//! the user directly or embeds a JSON action object asking for a note to
//! be created. This module is the two-state classifier over that output:
//! a strict JSON-action parse first, falling back to the plain-text
//! variant. Parse failures inside a detected action block are tolerated
//! and collapse to the plain-text variant — the caller never sees an
//! error from here.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// Non-greedy match for an embedded `"action":"create_note"` object.
static NOTE_ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)\{.*?"action"\s*:\s*"create_note".*?\}"#).expect("valid action regex")
});

/// Detected note-creation intent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteIntent {
    /// Note text; `None` when the model omitted it (callers substitute
    /// the original user message).
    pub content: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    /// `HH:MM`.
    pub reminder_time: Option<String>,
}

/// Classified assistant output.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantAction {
    /// The model asked for a note to be created.
    CreateNote(NoteIntent),
    /// A direct answer, returned verbatim. Markdown download links of the
    /// form `[label](/uploads/...)` pass through untouched.
    Reply(String),
}

#[derive(Debug, Deserialize)]
struct RawNoteAction {
    #[allow(dead_code)]
    action: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reminder_date: Option<String>,
    #[serde(default)]
    reminder_time: Option<String>,
}

/// Classify a model response as a note-creation action or a plain reply.
pub fn parse_assistant_action(text: &str) -> AssistantAction {
    let Some(m) = NOTE_ACTION_RE.find(text) else {
        return AssistantAction::Reply(text.to_string());
    };

    match serde_json::from_str::<RawNoteAction>(m.as_str()) {
        Ok(raw) => AssistantAction::CreateNote(NoteIntent {
            content: raw.content.filter(|c| !c.is_empty()),
            reminder_date: raw
                .reminder_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            reminder_time: raw.reminder_time.filter(|t| !t.is_empty()),
        }),
        Err(e) => {
            // Malformed action blocks degrade to a literal reply.
            debug!(error = %e, "note action block failed to parse; returning raw text");
            AssistantAction::Reply(text.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answer_is_verbatim_reply() {
        let text = "You spent $102.44 on expenses this month.";
        assert_eq!(
            parse_assistant_action(text),
            AssistantAction::Reply(text.to_string())
        );
    }

    #[test]
    fn test_create_note_action_detected() {
        let text = r#"{"action":"create_note","content":"Buy milk","reminder_date":"2026-03-01","reminder_time":"09:00"}"#;
        match parse_assistant_action(text) {
            AssistantAction::CreateNote(intent) => {
                assert_eq!(intent.content.as_deref(), Some("Buy milk"));
                assert_eq!(
                    intent.reminder_date,
                    Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
                );
                assert_eq!(intent.reminder_time.as_deref(), Some("09:00"));
            }
            other => panic!("expected CreateNote, got {:?}", other),
        }
    }

    #[test]
    fn test_action_embedded_in_prose_is_detected() {
        let text = "Sure!\n{\"action\":\"create_note\",\"content\":\"Call the dentist\"}\nDone.";
        match parse_assistant_action(text) {
            AssistantAction::CreateNote(intent) => {
                assert_eq!(intent.content.as_deref(), Some("Call the dentist"));
                assert_eq!(intent.reminder_date, None);
                assert_eq!(intent.reminder_time, None);
            }
            other => panic!("expected CreateNote, got {:?}", other),
        }
    }

    #[test]
    fn test_null_reminder_fields_are_none() {
        let text = r#"{"action":"create_note","content":"Water plants","reminder_date":null,"reminder_time":null}"#;
        match parse_assistant_action(text) {
            AssistantAction::CreateNote(intent) => {
                assert_eq!(intent.reminder_date, None);
                assert_eq!(intent.reminder_time, None);
            }
            other => panic!("expected CreateNote, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_reminder_date_is_dropped() {
        let text = r#"{"action":"create_note","content":"x","reminder_date":"soon"}"#;
        match parse_assistant_action(text) {
            AssistantAction::CreateNote(intent) => assert_eq!(intent.reminder_date, None),
            other => panic!("expected CreateNote, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_content_stays_none() {
        let text = r#"{"action":"create_note","reminder_date":"2026-03-01"}"#;
        match parse_assistant_action(text) {
            AssistantAction::CreateNote(intent) => assert_eq!(intent.content, None),
            other => panic!("expected CreateNote, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_action_block_falls_back_to_reply() {
        // Contains the action marker but is not valid JSON.
        let text = r#"{"action":"create_note", "content": oops}"#;
        assert_eq!(
            parse_assistant_action(text),
            AssistantAction::Reply(text.to_string())
        );
    }

    #[test]
    fn test_download_links_pass_through_untouched() {
        let text = "Here you go: [Download Original Document](/uploads/doc-3.pdf)";
        assert_eq!(
            parse_assistant_action(text),
            AssistantAction::Reply(text.to_string())
        );
    }

    #[test]
    fn test_other_json_objects_are_not_actions() {
        let text = r#"The totals are {"expenses": 102.44, "income": 2500.0}."#;
        assert_eq!(
            parse_assistant_action(text),
            AssistantAction::Reply(text.to_string())
        );
    }
}
