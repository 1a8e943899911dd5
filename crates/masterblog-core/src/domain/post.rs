use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Post identifier - positive, never reused within a collection.
pub type PostId = u64;

/// Format every stored post date must follow.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Post entity - represents a blog entry.
///
/// Text fields default to empty and engagement fields to zero, whether the
/// key is absent or `null`, so that hand-edited or older data files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<String>,
}

impl Post {
    /// Create a new post with no likes and no comments.
    pub fn new(id: PostId, title: String, content: String, author: String, date: String) -> Self {
        Self {
            id,
            title,
            content,
            author,
            date,
            likes: 0,
            comments: Vec::new(),
        }
    }

    /// Calendar value of `date`, if it is a well-formed `YYYY-MM-DD` string.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Parse a strict `YYYY-MM-DD` date: zero-padded, and a real calendar day.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    if !shaped {
        return None;
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_dates_only() {
        assert!(parse_calendar_date("2024-12-01").is_some());
        assert!(parse_calendar_date("2024-02-29").is_some());
        assert!(parse_calendar_date("2023-02-29").is_none());
        assert!(parse_calendar_date("2024-9-01").is_none());
        assert!(parse_calendar_date("01-12-2024").is_none());
        assert!(parse_calendar_date("").is_none());
    }

    #[test]
    fn legacy_record_fills_defaults() {
        let post: Post = serde_json::from_str(r#"{"id": 7, "title": "Old"}"#).unwrap();

        assert_eq!(post.id, 7);
        assert_eq!(post.title, "Old");
        assert_eq!(post.author, "");
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let post: Post = serde_json::from_str(
            r#"{"id": 2, "title": null, "date": null, "likes": null, "comments": null}"#,
        )
        .unwrap();

        assert_eq!(post.title, "");
        assert_eq!(post.date, "");
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn record_without_id_is_rejected() {
        let result = serde_json::from_str::<Post>(r#"{"title": "No id"}"#);
        assert!(result.is_err());
    }
}
