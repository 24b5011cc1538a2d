use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Raw body as served by the boardware, usually BBCode or HTML.
    pub text: String,
    pub has_unread: bool,
    pub thread_id: Option<String>
}

impl Post {
    pub fn new(id: &str) -> Post {
        return Post {
            id: id.to_string(),
            ..Post::default()
        };
    }

    pub fn reply_to(thread_id: &str, text: &str) -> Post {
        return Post {
            text: text.to_string(),
            thread_id: Some(thread_id.to_string()),
            ..Post::default()
        };
    }
}
