//! Data Transfer Objects - response bodies for the posts API.

use serde::{Deserialize, Serialize};

/// A human-readable outcome together with the affected post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse<P> {
    pub message: String,
    pub post: P,
}

impl<P> PostMessageResponse<P> {
    pub fn new(message: impl Into<String>, post: P) -> Self {
        Self {
            message: message.into(),
            post,
        }
    }
}

/// A bare confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
