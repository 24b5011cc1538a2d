use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PER_PAGE;
use crate::model::data::post::Post;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub sticky: bool,
    pub has_unread: bool,
    pub reply_count: u32,
    pub page_number: u32,
    pub per_page: u32,
    pub page_count: u32,
    /// Only author and timestamp are meaningful here.
    pub last_post: Option<Post>,
    /// Empty until a post-list operation fills it.
    pub posts: Vec<Post>,
    pub forum_id: Option<String>
}

impl Default for Thread {
    fn default() -> Self {
        return Thread {
            id: String::new(),
            title: String::new(),
            sticky: false,
            has_unread: false,
            reply_count: 0,
            page_number: 1,
            per_page: DEFAULT_PER_PAGE,
            page_count: 0,
            last_post: None,
            posts: Vec::new(),
            forum_id: None
        };
    }
}

impl Thread {
    pub fn new(id: &str) -> Thread {
        return Thread {
            id: id.to_string(),
            ..Thread::default()
        };
    }

    /// A thread that does not exist on the server yet, its first post carries the body.
    pub fn new_topic(forum_id: &str, title: &str, text: &str) -> Thread {
        let mut first_post = Post::default();
        first_post.text = text.to_string();

        return Thread {
            title: title.to_string(),
            forum_id: Some(forum_id.to_string()),
            posts: vec![first_post],
            ..Thread::default()
        };
    }

    pub fn add_post(&mut self, mut post: Post) {
        post.thread_id = Some(self.id.clone());
        self.posts.push(post);
    }

    pub fn has_next_page(&self) -> bool {
        return self.page_number < self.page_count;
    }
}
