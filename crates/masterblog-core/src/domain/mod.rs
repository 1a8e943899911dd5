//! Domain entities - the core business objects.

mod post;

pub use post::{DATE_FORMAT, Post, PostId, parse_calendar_date};
