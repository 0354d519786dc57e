use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque identifier of a stored post.
///
/// Identifiers are handed out by the store on insertion. Callers should treat
/// them as opaque strings and only round-trip them through `Display`/`FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for PostId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<PostId> for Uuid {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Author of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Display name, e.g. `"Jane Doe"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// A stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
}

impl BlogPost {
    /// Materialize a new post with a store-assigned id and creation time.
    pub fn from_new(id: PostId, post: NewPost) -> Self {
        Self {
            id,
            author: post.author,
            title: post.title,
            content: post.content,
            created: creation_timestamp(),
        }
    }

    /// Apply the mutable fields of `changes`. `author` and `created` are never touched.
    pub fn apply(&mut self, changes: PostUpdate) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
    }
}

/// Current time at the precision every store can round-trip (microseconds).
pub fn creation_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub author: Author,
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(author: Author, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Check that every required field is present and non-blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut missing = Vec::new();
        if self.author.first_name.trim().is_empty() {
            missing.push("author.firstName");
        }
        if self.author.last_name.trim().is_empty() {
            missing.push("author.lastName");
        }
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        if self.content.trim().is_empty() {
            missing.push("content");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Changes accepted by an update. Only `title` and `content` are mutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Reject updates that would blank out a required field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let blank = [("title", &self.title), ("content", &self.content)]
            .into_iter()
            .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect::<Vec<_>>();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "field(s) must not be empty: {}",
                blank.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Author {
        Author::new("Jane", "Doe")
    }

    #[test]
    fn full_name_joins_first_and_last() {
        assert_eq!(jane().full_name(), "Jane Doe");
        assert_eq!(jane().to_string(), "Jane Doe");
    }

    #[test]
    fn author_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(jane()).unwrap();
        assert_eq!(json, serde_json::json!({"firstName": "Jane", "lastName": "Doe"}));
    }

    #[test]
    fn post_id_round_trips_through_strings() {
        let id = PostId::generate();
        let parsed: PostId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-an-id".parse::<PostId>().is_err());
    }

    #[test]
    fn validate_lists_every_missing_field() {
        let post = NewPost::new(Author::new("Jane", ""), "", "C");
        let err = post.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("author.lastName"), "{message}");
        assert!(message.contains("title"), "{message}");
        assert!(!message.contains("content"), "{message}");
    }

    #[test]
    fn apply_only_touches_title_and_content() {
        let mut post = BlogPost::from_new(PostId::generate(), NewPost::new(jane(), "T", "C"));
        let before = post.clone();

        post.apply(PostUpdate {
            title: Some("New".into()),
            content: None,
        });

        assert_eq!(post.title, "New");
        assert_eq!(post.content, before.content);
        assert_eq!(post.author, before.author);
        assert_eq!(post.created, before.created);
        assert_eq!(post.id, before.id);
    }

    #[test]
    fn update_rejects_blank_values() {
        let update = PostUpdate {
            title: Some("  ".into()),
            content: Some("fine".into()),
        };
        assert!(update.validate().is_err());
        assert!(PostUpdate::default().validate().is_ok());
        assert!(PostUpdate::default().is_empty());
    }
}
