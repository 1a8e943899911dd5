//! Read-only search and ordering over a post collection.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::Post;
use crate::error::{DomainError, FieldError};
use crate::validation::{PostFields, SortQuery};

/// Post field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
    Author,
    Date,
}

impl SortField {
    fn value<'a>(&self, post: &'a Post) -> &'a str {
        match self {
            Self::Title => &post.title,
            Self::Content => &post.content,
            Self::Author => &post.author,
            Self::Date => &post.date,
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            "author" => Ok(Self::Author),
            "date" => Ok(Self::Date),
            other => Err(DomainError::invalid(
                "sort",
                format!("Invalid sort field: {other}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(DomainError::invalid(
                "direction",
                format!("Invalid sort direction: {other}"),
            )),
        }
    }
}

/// A checked sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// `None` when no sort field was requested; the direction is then ignored.
    pub fn from_query(query: &SortQuery) -> Result<Option<Self>, DomainError> {
        let Some(field) = query.sort.as_deref() else {
            return Ok(None);
        };
        let field: SortField = field.parse()?;
        let direction: SortDirection = query.direction.as_deref().unwrap_or_default().parse()?;

        Ok(Some(Self::new(field, direction)))
    }
}

/// Posts where any supplied field is a case-sensitive substring of the
/// matching post field. With no fields supplied, every post matches.
pub fn search(posts: &[Post], criteria: &PostFields) -> Vec<Post> {
    if criteria.is_empty() {
        return posts.to_vec();
    }

    let matches = |needle: &Option<String>, haystack: &str| {
        needle.as_deref().is_some_and(|n| haystack.contains(n))
    };

    posts
        .iter()
        .filter(|post| {
            matches(&criteria.title, &post.title)
                || matches(&criteria.content, &post.content)
                || matches(&criteria.author, &post.author)
                || matches(&criteria.date, &post.date)
        })
        .cloned()
        .collect()
}

/// Stable sort of `posts` by one field.
///
/// Dates compare as calendar days; a post whose date does not parse fails the
/// whole sort. Other fields compare case-insensitively.
pub fn sort(posts: Vec<Post>, spec: SortSpec) -> Result<Vec<Post>, DomainError> {
    match spec.field {
        SortField::Date => {
            let keyed = posts
                .into_iter()
                .map(|post| match post.parsed_date() {
                    Some(date) => Ok((date, post)),
                    None => Err(unsortable_date(&post)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sort_keyed(keyed, spec.direction))
        }
        field => {
            let keyed = posts
                .into_iter()
                .map(|post| (field.value(&post).to_lowercase(), post))
                .collect();
            Ok(sort_keyed(keyed, spec.direction))
        }
    }
}

/// Apply an optional sort request to a listing.
pub fn list(posts: Vec<Post>, query: &SortQuery) -> Result<Vec<Post>, DomainError> {
    match SortSpec::from_query(query)? {
        Some(spec) => sort(posts, spec),
        None => Ok(posts),
    }
}

fn sort_keyed<K: Ord>(mut keyed: Vec<(K, Post)>, direction: SortDirection) -> Vec<Post> {
    let order = |a: &K, b: &K| -> Ordering {
        match direction {
            SortDirection::Asc => a.cmp(b),
            SortDirection::Desc => b.cmp(a),
        }
    };
    keyed.sort_by(|(a, _), (b, _)| order(a, b));
    keyed.into_iter().map(|(_, post)| post).collect()
}

fn unsortable_date(post: &Post) -> DomainError {
    let reason = if post.date.is_empty() {
        format!("missing date for post id {}", post.id)
    } else {
        format!(
            "invalid date for post id {}: '{}', expected YYYY-MM-DD",
            post.id, post.date
        )
    };
    DomainError::Validation(vec![FieldError::new("date", reason)])
}
