use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use super::GuestbookError;

pub const MAX_NAME_CHARS: usize = 24;
pub const MAX_MESSAGE_CHARS: usize = 300;
/// Remote comments kept after the welcome entry.
pub const MAX_COMMENTS: usize = 200;
pub const DEFAULT_NAME: &str = "Visitor";
pub const WELCOME_ID: &str = "welcome";
pub const OWNER_NAME: &str = "Lim Sang Yeob";
const WELCOME_TEXT: &str = "Thanks for stopping by. Feel free to leave a comment below.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub name: String,
    pub text: String,
    pub is_owner: bool,
    pub created_at: String,
}

impl Comment {
    /// The owner's greeting pinned to the top of every list.
    pub fn welcome() -> Self {
        Self {
            id: WELCOME_ID.to_string(),
            name: OWNER_NAME.to_string(),
            text: WELCOME_TEXT.to_string(),
            is_owner: true,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn is_welcome(&self) -> bool {
        self.id == WELCOME_ID
    }
}

/// Body of `POST /api/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub name: String,
    pub message: String,
}

impl NewComment {
    /// Applies the submission rules. Returns `None` when the message is
    /// blank after trimming.
    pub fn new(name: &str, message: &str) -> Option<Self> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        Some(Self {
            name: normalize_name(name),
            message: truncate_chars(message, MAX_MESSAGE_CHARS),
        })
    }
}

pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let name = if trimmed.is_empty() {
        DEFAULT_NAME
    } else {
        trimmed
    };
    truncate_chars(name, MAX_NAME_CHARS)
}

fn field<'a>(
    object: &'a serde_json::Map<String, Value>,
    primary: &str,
    fallback: &str,
) -> Option<&'a Value> {
    object
        .get(primary)
        .filter(|value| !value.is_null())
        .or_else(|| object.get(fallback))
}

/// Validates one API entry. Ids may be strings or numbers; the message may
/// arrive as `message` or `text` and the timestamp as `created_at` or
/// `createdAt`. Anything else malformed is rejected.
pub fn normalize_comment(value: &Value) -> Option<Comment> {
    let object = value.as_object()?;
    let id = match object.get("id")? {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    let name = object.get("name")?.as_str()?;
    let text = field(object, "message", "text")?.as_str()?;
    let created_at = field(object, "created_at", "createdAt")?.as_str()?;
    let is_owner = field(object, "is_owner", "isOwner")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(Comment {
        id,
        name: normalize_name(name),
        text: truncate_chars(text, MAX_MESSAGE_CHARS),
        is_owner,
        created_at: created_at.to_string(),
    })
}

/// Normalizes a list payload, dropping entries that fail validation.
pub fn normalize_comments(payload: &Value) -> Result<Vec<Comment>, GuestbookError> {
    let entries = payload
        .as_array()
        .ok_or_else(|| GuestbookError::InvalidPayload("expected an array of comments".into()))?;
    let comments: Vec<Comment> = entries.iter().filter_map(normalize_comment).collect();
    if comments.len() != entries.len() {
        tracing::debug!(
            dropped = entries.len() - comments.len(),
            "dropped malformed comments"
        );
    }
    Ok(comments)
}

/// Formats a timestamp as e.g. `Jan 9 09:41` in local time. Timestamps
/// without an offset are read as local time; unparsable input yields an
/// empty string.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format("%b %-d %H:%M").to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.format("%b %-d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn normalize_accepts_numeric_ids_and_alternate_fields() {
        let comment = normalize_comment(&json!({
            "id": 42,
            "name": "  Ana  ",
            "text": "hello",
            "createdAt": "2024-01-09T09:41:00Z"
        }))
        .expect("valid comment");
        assert_eq!(
            comment,
            Comment {
                id: "42".into(),
                name: "Ana".into(),
                text: "hello".into(),
                is_owner: false,
                created_at: "2024-01-09T09:41:00Z".into(),
            }
        );
    }

    #[test]
    fn normalize_prefers_message_over_text() {
        let comment = normalize_comment(&json!({
            "id": "a",
            "name": "B",
            "message": "from message",
            "text": "from text",
            "created_at": "x"
        }))
        .unwrap();
        assert_eq!(comment.text, "from message");
    }

    #[test]
    fn normalize_applies_defaults_and_limits() {
        let comment = normalize_comment(&json!({
            "id": "1",
            "name": "   ",
            "message": "m".repeat(400),
            "created_at": "t"
        }))
        .unwrap();
        assert_eq!(comment.name, DEFAULT_NAME);
        assert_eq!(comment.text.chars().count(), MAX_MESSAGE_CHARS);

        let long_name = normalize_comment(&json!({
            "id": "2",
            "name": "가".repeat(30),
            "message": "hi",
            "created_at": "t"
        }))
        .unwrap();
        assert_eq!(long_name.name.chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn normalize_rejects_malformed_entries() {
        for value in [
            json!(null),
            json!("text"),
            json!({"id": true, "name": "a", "message": "b", "created_at": "c"}),
            json!({"id": "1", "name": 3, "message": "b", "created_at": "c"}),
            json!({"id": "1", "name": "a", "created_at": "c"}),
            json!({"id": "1", "name": "a", "message": "b"}),
            json!({"name": "a", "message": "b", "created_at": "c"}),
        ] {
            assert_eq!(normalize_comment(&value), None, "{value}");
        }
    }

    #[test]
    fn normalize_comments_filters_and_requires_array() {
        let payload = json!([
            {"id": 1, "name": "a", "message": "b", "created_at": "c"},
            {"id": 2},
        ]);
        assert_eq!(normalize_comments(&payload).unwrap().len(), 1);
        assert!(matches!(
            normalize_comments(&json!({"comments": []})),
            Err(GuestbookError::InvalidPayload(_))
        ));
    }

    #[test]
    fn new_comment_trims_and_truncates() {
        assert_eq!(NewComment::new("A", "   "), None);
        let created = NewComment::new("", "  hi  ").unwrap();
        assert_eq!(created.name, DEFAULT_NAME);
        assert_eq!(created.message, "hi");
        let long = NewComment::new(&"n".repeat(40), &"m".repeat(320)).unwrap();
        assert_eq!(long.name.len(), MAX_NAME_CHARS);
        assert_eq!(long.message.len(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn new_comment_serializes_as_api_body() {
        let body = serde_json::to_value(NewComment::new("A", "hi").unwrap()).unwrap();
        assert_eq!(body, json!({"name": "A", "message": "hi"}));
    }

    #[test]
    fn format_timestamp_reads_naive_times_as_local() {
        assert_eq!(format_timestamp("2024-01-09T09:41:00"), "Jan 9 09:41");
        assert_eq!(format_timestamp("2024-11-23 18:05:00"), "Nov 23 18:05");
        assert_eq!(format_timestamp("not a date"), "");
        assert!(!format_timestamp("2024-01-09T09:41:00Z").is_empty());
    }

    #[test]
    fn welcome_comment_is_owner() {
        let welcome = Comment::welcome();
        assert!(welcome.is_owner);
        assert!(welcome.is_welcome());
    }
}
