use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::DEFAULT_ROOT_FORUM_ID;
use crate::model::data::forum::Forum;
use crate::model::data::post::Post;
use crate::model::data::results::{BoardwareInfo, EncryptionSettings, LoginInfo, Outcome};
use crate::model::data::string_map::StringMap;
use crate::model::data::thread::Thread;
use crate::model::web::web_client::WebClient;

/// Request modifiers for list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Bypass any cached copy of the page.
    pub no_cache: bool
}

impl RequestOptions {
    pub fn force_refresh() -> RequestOptions {
        return RequestOptions { no_cache: true };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListOption {
    FirstPostOnly,
    AllPostsOnPage
}

/// Primitive operations every supported forum software has to provide. Everything else
/// a board client needs is derived from these by [`crate::model::parsers::parser::Parser`].
#[async_trait]
pub trait Boardware: Send + Sync {
    /// Registry name, e.g. "phpbb3".
    fn name(&self) -> &str;
    fn base_url(&self) -> &str;

    fn pretty_name(&self) -> &str {
        return self.name();
    }

    fn root_forum_id(&self) -> String {
        return DEFAULT_ROOT_FORUM_ID.to_string();
    }

    /// Transport used by this implementation. The parser keeps it configured.
    fn web_client(&self) -> Option<Arc<dyn WebClient>> {
        return None;
    }

    /// Whether a sample page or response looks like it was served by this boardware.
    fn test_parser(&self, html: &str) -> anyhow::Result<bool>;

    async fn login(&self, info: &LoginInfo) -> anyhow::Result<Outcome<StringMap>>;
    async fn logout(&self) -> anyhow::Result<Outcome<StringMap>>;
    async fn get_boardware_info(&self) -> anyhow::Result<Outcome<BoardwareInfo>>;

    /// Direct children of `forum_id`.
    async fn get_forum_list(&self, forum_id: &str) -> anyhow::Result<Vec<Forum>>;

    /// Fills `forum.threads` with the page selected by the forum's pagination cursor.
    async fn get_thread_list(&self, forum: Forum, options: RequestOptions) -> anyhow::Result<Forum>;

    /// Fills `thread.posts` with the page selected by the thread's pagination cursor.
    async fn get_post_list(
        &self,
        thread: Thread,
        list_option: PostListOption,
        options: RequestOptions
    ) -> anyhow::Result<Thread>;

    async fn mark_forum_read(&self, forum: Forum) -> anyhow::Result<Forum> {
        warn!("mark_forum_read() not implemented by \'{}\'", self.name());
        return Ok(forum);
    }

    async fn submit_new_thread(&self, thread: Thread) -> anyhow::Result<Thread>;
    async fn submit_new_post(&self, post: Post) -> anyhow::Result<Post>;
    async fn get_encryption_settings(&self) -> anyhow::Result<Outcome<EncryptionSettings>>;

    fn forum_url(&self, _forum: &Forum) -> Option<String> {
        return None;
    }

    fn thread_url(&self, _thread: &Thread) -> Option<String> {
        return None;
    }

    fn post_url(&self, _post: &Post) -> Option<String> {
        return None;
    }
}
