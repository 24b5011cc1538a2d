use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::constants::{
    DEFAULT_USER_AGENT,
    OPTION_ENCRYPTION_ENABLED,
    OPTION_ENCRYPTION_KEY,
    OPTION_ENCRYPTION_SEED
};
use crate::helpers::sync_helpers;
use crate::model::data::forum::Forum;
use crate::model::data::post::Post;
use crate::model::data::results::{BoardwareInfo, EncryptionSettings, LoginInfo, Outcome};
use crate::model::data::string_map::StringMap;
use crate::model::data::thread::Thread;
use crate::model::parsers::async_ops::OperationSlot;
use crate::model::parsers::boardware::{Boardware, PostListOption, RequestOptions};
use crate::model::parsers::error::ParserError;
use crate::model::parsers::{favicon, unread};
use crate::model::web::http_client::HttpClient;
use crate::model::web::web_client::{WebClient, WebClientConfig};

pub type ParserRef = Arc<Parser>;

/// Completion notifications of asynchronous parser operations. Every started operation
/// produces at most one event: its completion, or `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserEvent {
    LoginCompleted(Outcome<StringMap>),
    LogoutCompleted(Outcome<StringMap>),
    BoardwareInfoCompleted(Outcome<BoardwareInfo>),
    ForumListCompleted(Vec<Forum>),
    UnreadForumsCompleted(Vec<Forum>),
    ThreadsCompleted(Forum),
    PostsCompleted(Thread),
    MarkForumReadCompleted(Forum),
    SubmitNewThreadCompleted(Thread),
    SubmitNewPostCompleted(Post),
    EncryptionSettingsCompleted(Outcome<EncryptionSettings>),
    Error(ParserError)
}

/// Boardware-agnostic surface over one board.
///
/// The operations come in two shapes. Awaiting `login()`, `get_thread_list()`, ... directly
/// propagates errors to the caller. The `*_async()` variants (see `async_ops`) return
/// immediately and report through the event channel handed out by
/// [`Parser::take_event_receiver`].
pub struct Parser {
    pub(super) boardware: Arc<dyn Boardware>,
    pub(super) slot: Arc<OperationSlot>,
    pub(super) events: UnboundedSender<ParserEvent>,
    event_receiver: Mutex<Option<UnboundedReceiver<ParserEvent>>>,
    options: RwLock<StringMap>,
    user_agent: RwLock<String>,
    watchers: RwLock<Vec<Arc<dyn WebClient>>>
}

impl Debug for Parser {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        return f.debug_struct("Parser")
            .field("name", &self.name())
            .field("base_url", &self.base_url())
            .field("watchers", &self.watcher_count())
            .finish();
    }
}

impl Parser {
    pub fn new(boardware: Arc<dyn Boardware>) -> Parser {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel::<ParserEvent>();
        let web_client = boardware.web_client();

        let parser = Parser {
            boardware,
            slot: Arc::new(OperationSlot::default()),
            events: sender,
            event_receiver: Mutex::new(Some(receiver)),
            options: RwLock::new(StringMap::new()),
            user_agent: RwLock::new(DEFAULT_USER_AGENT.to_string()),
            watchers: RwLock::new(Vec::new())
        };

        if let Some(web_client) = web_client {
            parser.add_watcher(web_client);
        }

        return parser;
    }

    pub fn name(&self) -> &str {
        return self.boardware.name();
    }

    pub fn pretty_name(&self) -> &str {
        let pretty_name = self.boardware.pretty_name();
        if pretty_name.is_empty() {
            return self.name();
        }

        return pretty_name;
    }

    pub fn base_url(&self) -> &str {
        return self.boardware.base_url();
    }

    pub fn root_forum_id(&self) -> String {
        return self.boardware.root_forum_id();
    }

    pub fn boardware(&self) -> &Arc<dyn Boardware> {
        return &self.boardware;
    }

    /// The receiving end of the event channel. Can be taken only once.
    pub fn take_event_receiver(&self) -> Option<UnboundedReceiver<ParserEvent>> {
        return sync_helpers::lock(&self.event_receiver).take();
    }

    pub fn user_agent(&self) -> String {
        return sync_helpers::read(&self.user_agent).clone();
    }

    /// Blank agents are ignored. Every watched web client picks the new agent up immediately.
    pub fn set_user_agent(&self, agent: &str) {
        if agent.trim().is_empty() {
            return;
        }

        *sync_helpers::write(&self.user_agent) = agent.to_string();

        for web_client in sync_helpers::read(&self.watchers).iter() {
            web_client.set_user_agent(agent);
        }
    }

    pub fn add_watcher(&self, web_client: Arc<dyn WebClient>) {
        {
            let mut watchers = sync_helpers::write(&self.watchers);
            if watchers.iter().any(|watcher| same_client(watcher, &web_client)) {
                return;
            }

            watchers.push(web_client.clone());
        }

        web_client.set_config(self.create_web_client_config());
    }

    pub fn remove_watcher(&self, web_client: &Arc<dyn WebClient>) {
        sync_helpers::write(&self.watchers).retain(|watcher| !same_client(watcher, web_client));
    }

    pub fn watcher_count(&self) -> usize {
        return sync_helpers::read(&self.watchers).len();
    }

    pub fn options(&self) -> StringMap {
        return sync_helpers::read(&self.options).clone();
    }

    pub fn set_options(&self, options: StringMap) {
        *sync_helpers::write(&self.options) = options;
        self.update_clients();
    }

    fn update_clients(&self) {
        let config = self.create_web_client_config();

        for web_client in sync_helpers::read(&self.watchers).iter() {
            web_client.set_config(config.clone());
        }
    }

    pub fn create_web_client_config(&self) -> WebClientConfig {
        let options = sync_helpers::read(&self.options);
        let mut config = WebClientConfig::default();

        config.user_agent = self.user_agent();

        if options.get_bool(OPTION_ENCRYPTION_ENABLED, false) {
            config.use_encryption = true;
            config.encrypt_key = options.get_text(OPTION_ENCRYPTION_KEY);
            config.encrypt_seed = options.get_text(OPTION_ENCRYPTION_SEED);
        }

        return config;
    }

    /// A failing probe counts as "cannot parse".
    pub fn can_parse(&self, html: &str) -> bool {
        return match self.boardware.test_parser(html) {
            Ok(result) => result,
            Err(error) => {
                debug!("can_parse() \'{}\' test_parser() failed: {:#}", self.name(), error);
                false
            }
        };
    }

    pub async fn login(&self, info: &LoginInfo) -> anyhow::Result<Outcome<StringMap>> {
        return self.boardware.login(info).await;
    }

    pub async fn logout(&self) -> anyhow::Result<Outcome<StringMap>> {
        return self.boardware.logout().await;
    }

    pub async fn get_boardware_info(&self) -> anyhow::Result<Outcome<BoardwareInfo>> {
        return self.boardware.get_boardware_info().await;
    }

    pub async fn get_forum_list(&self, forum_id: &str) -> anyhow::Result<Vec<Forum>> {
        return self.boardware.get_forum_list(forum_id).await;
    }

    pub async fn get_root_sub_forum_list(&self) -> anyhow::Result<Vec<Forum>> {
        return self.get_forum_list(&self.root_forum_id()).await;
    }

    pub async fn get_unread_forums(&self) -> anyhow::Result<Vec<Forum>> {
        return unread::get_unread_forums(self.boardware.as_ref()).await;
    }

    pub async fn get_thread_list(&self, forum: Forum, options: RequestOptions) -> anyhow::Result<Forum> {
        return self.boardware.get_thread_list(forum, options).await;
    }

    pub async fn get_post_list(
        &self,
        thread: Thread,
        list_option: PostListOption,
        options: RequestOptions
    ) -> anyhow::Result<Thread> {
        return self.boardware.get_post_list(thread, list_option, options).await;
    }

    pub async fn mark_forum_read(&self, forum: Forum) -> anyhow::Result<Forum> {
        return self.boardware.mark_forum_read(forum).await;
    }

    pub async fn submit_new_thread(&self, thread: Thread) -> anyhow::Result<Thread> {
        return self.boardware.submit_new_thread(thread).await;
    }

    pub async fn submit_new_post(&self, post: Post) -> anyhow::Result<Post> {
        return self.boardware.submit_new_post(post).await;
    }

    pub async fn get_encryption_settings(&self) -> anyhow::Result<Outcome<EncryptionSettings>> {
        return self.boardware.get_encryption_settings().await;
    }

    /// Stores the settings in the option bag and reconfigures the watched web clients.
    pub fn apply_encryption_settings(&self, settings: &EncryptionSettings) {
        let mut options = self.options();
        settings.apply_to(&mut options);
        self.set_options(options);
    }

    pub fn get_post_quote(&self, post: &Post) -> String {
        return format!("[QUOTE]{}[/QUOTE]\n\n", post.text);
    }

    pub async fn get_fav_icon_buffer(&self, icon_files: &[String]) -> Vec<u8> {
        let client = match HttpClient::with_config(self.create_web_client_config()) {
            Ok(client) => client,
            Err(error) => {
                warn!("get_fav_icon_buffer() can't create web client: {:#}", error);
                return favicon::DEFAULT_BOARD_ICON.to_vec();
            }
        };

        return self.get_fav_icon_buffer_with(&client, icon_files).await;
    }

    pub async fn get_fav_icon_buffer_with(&self, client: &dyn WebClient, icon_files: &[String]) -> Vec<u8> {
        return favicon::get_fav_icon_buffer(client, self.base_url(), icon_files).await;
    }

    pub fn forum_url(&self, forum: &Forum) -> Option<String> {
        return self.boardware.forum_url(forum);
    }

    pub fn thread_url(&self, thread: &Thread) -> Option<String> {
        return self.boardware.thread_url(thread);
    }

    pub fn post_url(&self, post: &Post) -> Option<String> {
        return self.boardware.post_url(post);
    }
}

fn same_client(first: &Arc<dyn WebClient>, second: &Arc<dyn WebClient>) -> bool {
    return Arc::as_ptr(first) as *const () == Arc::as_ptr(second) as *const ();
}
