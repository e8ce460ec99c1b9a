//! Story data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a story in the history collection.
pub type RecordId = i64;

/// A non-empty, trimmed prompt.
///
/// Blank input never becomes a `Prompt`, so everything downstream of
/// [`Prompt::parse`] can assume there is something to generate from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt(String);

impl Prompt {
    /// Trim the input; `None` when nothing is left.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Prompt {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| "prompt must not be blank".to_string())
    }
}

impl From<Prompt> for String {
    fn from(prompt: Prompt) -> Self {
        prompt.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One display unit of a generated story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPage {
    /// 1-based position within the story
    pub page: u32,
    pub content: String,
}

impl StoryPage {
    pub fn new(page: u32, content: impl Into<String>) -> Self {
        Self {
            page,
            content: content.into(),
        }
    }
}

/// A generated story as kept in history.
///
/// The serialized shape is
/// `{ id, prompt, pages: [{ page, content }], createdAt }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: RecordId,
    pub prompt: String,
    pub pages: Vec<StoryPage>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl StoryRecord {
    pub fn new(id: RecordId, prompt: &Prompt, pages: Vec<StoryPage>) -> Self {
        Self {
            id,
            prompt: prompt.as_str().to_string(),
            pages,
            created_at: Utc::now(),
        }
    }

    /// Override the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_trimmed() {
        let prompt = Prompt::parse("  a dragon who bakes bread \n").unwrap();
        assert_eq!(prompt.as_str(), "a dragon who bakes bread");
    }

    #[test]
    fn test_blank_prompt_is_rejected() {
        assert!(Prompt::parse("").is_none());
        assert!(Prompt::parse("   \t\n").is_none());
    }

    #[test]
    fn test_record_wire_shape() {
        let prompt = Prompt::parse("a lighthouse").unwrap();
        let created = DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = StoryRecord::new(7, &prompt, vec![StoryPage::new(1, "Once.")])
            .created_at(created);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["prompt"], "a lighthouse");
        assert_eq!(value["pages"][0]["page"], 1);
        assert_eq!(value["pages"][0]["content"], "Once.");
        assert_eq!(value["createdAt"], "2024-05-01T10:20:30.123Z");
    }

    #[test]
    fn test_record_reads_iso_timestamp() {
        let json = r#"{"id":1714558830123,"prompt":"p","pages":[],"createdAt":"2024-05-01T10:20:30.123Z"}"#;
        let record: StoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 1714558830123);
        assert!(record.pages.is_empty());
        assert_eq!(record.created_at.timestamp_millis(), 1714558830123);
    }

    #[test]
    fn test_blank_prompt_fails_to_deserialize() {
        let result: Result<Prompt, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
