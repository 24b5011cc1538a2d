use std::fmt;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::helpers::sync_helpers;
use crate::model::data::forum::Forum;
use crate::model::data::post::Post;
use crate::model::data::results::LoginInfo;
use crate::model::data::thread::Thread;
use crate::model::parsers::boardware::{PostListOption, RequestOptions};
use crate::model::parsers::error::ParserError;
use crate::model::parsers::parser::{Parser, ParserEvent};
use crate::model::parsers::unread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationFamily {
    Login,
    Logout,
    BoardwareInfo,
    ForumList,
    UnreadForums,
    ThreadList,
    PostList,
    MarkForumRead,
    SubmitNewThread,
    SubmitNewPost,
    EncryptionSettings
}

impl OperationFamily {
    /// Pagination-style requests replace whatever is outstanding (last request wins).
    /// Every other family is dropped while something is still running.
    pub fn supersedes_outstanding(&self) -> bool {
        return matches!(self, OperationFamily::ThreadList | OperationFamily::PostList);
    }

    pub fn as_str(&self) -> &'static str {
        return match self {
            OperationFamily::Login => "login",
            OperationFamily::Logout => "logout",
            OperationFamily::BoardwareInfo => "get_boardware_info",
            OperationFamily::ForumList => "get_forum_list",
            OperationFamily::UnreadForums => "get_unread_forums",
            OperationFamily::ThreadList => "get_thread_list",
            OperationFamily::PostList => "get_post_list",
            OperationFamily::MarkForumRead => "mark_forum_read",
            OperationFamily::SubmitNewThread => "submit_new_thread",
            OperationFamily::SubmitNewPost => "submit_new_post",
            OperationFamily::EncryptionSettings => "get_encryption_settings"
        };
    }
}

impl Display for OperationFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.as_str());
    }
}

struct InFlight {
    id: u64,
    family: OperationFamily,
    handle: Option<JoinHandle<()>>
}

impl InFlight {
    fn is_running(&self) -> bool {
        return match &self.handle {
            Some(handle) => !handle.is_finished(),
            None => true
        };
    }

    fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

/// The single outstanding operation of a parser instance.
///
/// Only the operation whose id is current may deliver a result. Replacing or cancelling
/// the current operation therefore also suppresses a result that is already computed
/// but not yet delivered.
#[derive(Default)]
pub struct OperationSlot {
    current: Mutex<Option<InFlight>>,
    next_id: AtomicU64
}

impl OperationSlot {
    /// Reserves the slot for a new operation of `family`. `None` when the request is rejected.
    pub fn begin(&self, family: OperationFamily) -> Option<u64> {
        let mut current = sync_helpers::lock(&self.current);

        if let Some(in_flight) = current.as_ref() {
            if in_flight.is_running() {
                if !family.supersedes_outstanding() {
                    debug!(
                        "{}_async() \'{}\' is still running, request dropped",
                        family,
                        in_flight.family
                    );

                    return None;
                }

                debug!("{}_async() \'{}\' is still running, cancelling", family, in_flight.family);
                in_flight.cancel();
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        *current = Some(InFlight { id, family, handle: None });

        return Some(id);
    }

    pub fn attach(&self, id: u64, handle: JoinHandle<()>) {
        let mut current = sync_helpers::lock(&self.current);

        match current.as_mut() {
            Some(in_flight) if in_flight.id == id => in_flight.handle = Some(handle),
            // Superseded before it got its handle.
            _ => handle.abort()
        }
    }

    /// Releases the slot if `id` still owns it. Whoever gets `true` may deliver.
    pub fn finish(&self, id: u64) -> bool {
        let mut current = sync_helpers::lock(&self.current);

        let owns_slot = current.as_ref().map(|in_flight| in_flight.id == id).unwrap_or(false);
        if owns_slot {
            *current = None;
        }

        return owns_slot;
    }

    /// Cancels the outstanding operation, its result will not be delivered.
    pub fn cancel(&self) -> Option<OperationFamily> {
        let in_flight = sync_helpers::lock(&self.current).take();
        if in_flight.is_none() {
            return None;
        }

        let in_flight = in_flight.unwrap();
        in_flight.cancel();

        return Some(in_flight.family);
    }

    pub fn running_family(&self) -> Option<OperationFamily> {
        return sync_helpers::lock(&self.current)
            .as_ref()
            .filter(|in_flight| in_flight.is_running())
            .map(|in_flight| in_flight.family);
    }
}

fn normalize_error(family: OperationFamily, base_url: &str, error: &anyhow::Error) -> ParserError {
    let parser_error = ParserError::from_error(error);

    if family == OperationFamily::Login && matches!(parser_error, ParserError::Unknown(_)) {
        return ParserError::Unknown(connection_error_message(base_url));
    }

    return parser_error;
}

fn connection_error_message(base_url: &str) -> String {
    return format!(
        "There was an error connecting to {}. Please check your login credentials, \
        firewall/proxy settings or your Internet connection.",
        base_url
    );
}

impl Parser {
    fn start_operation<T, Fut>(
        &self,
        family: OperationFamily,
        work: Fut,
        on_success: fn(T) -> ParserEvent
    ) -> bool
        where
            T: Send + 'static,
            Fut: Future<Output = anyhow::Result<T>> + Send + 'static
    {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                error!("{}_async() called outside of a tokio runtime", family);
                return false;
            }
        };

        let id = self.slot.begin(family);
        if id.is_none() {
            return false;
        }

        let id = id.unwrap();
        let slot = self.slot.clone();
        let events = self.events.clone();
        let base_url = self.base_url().to_string();

        let handle = runtime.spawn(async move {
            let result = AssertUnwindSafe(work).catch_unwind().await;

            let event = match result {
                Ok(Ok(value)) => on_success(value),
                Ok(Err(error)) => {
                    warn!("{}_async() \'{}\' error: {:#}", family, base_url, error);
                    ParserEvent::Error(normalize_error(family, &base_url, &error))
                }
                Err(_) => {
                    error!("{}_async() \'{}\' panicked", family, base_url);

                    let parser_error = if family == OperationFamily::Login {
                        ParserError::Unknown(connection_error_message(&base_url))
                    } else {
                        ParserError::unknown()
                    };

                    ParserEvent::Error(parser_error)
                }
            };

            if !slot.finish(id) {
                debug!("{}_async() result of a cancelled request discarded", family);
                return;
            }

            if events.send(event).is_err() {
                debug!("{}_async() nobody is listening for parser events", family);
            }
        });

        self.slot.attach(id, handle);
        return true;
    }

    /// Cancels the outstanding operation, if any. No event is delivered for it.
    pub fn cancel(&self) -> bool {
        let family = self.slot.cancel();
        if family.is_none() {
            return false;
        }

        debug!("cancel() cancelled \'{}\'", family.unwrap());
        return true;
    }

    pub fn running_operation(&self) -> Option<OperationFamily> {
        return self.slot.running_family();
    }

    pub fn login_async(&self, info: LoginInfo) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::Login,
            async move { boardware.login(&info).await },
            ParserEvent::LoginCompleted
        );
    }

    pub fn logout_async(&self) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::Logout,
            async move { boardware.logout().await },
            ParserEvent::LogoutCompleted
        );
    }

    pub fn get_boardware_info_async(&self) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::BoardwareInfo,
            async move { boardware.get_boardware_info().await },
            ParserEvent::BoardwareInfoCompleted
        );
    }

    pub fn get_forum_list_async(&self, forum_id: &str) -> bool {
        let boardware = self.boardware.clone();
        let forum_id = forum_id.to_string();

        return self.start_operation(
            OperationFamily::ForumList,
            async move { boardware.get_forum_list(&forum_id).await },
            ParserEvent::ForumListCompleted
        );
    }

    pub fn get_root_sub_forum_list_async(&self) -> bool {
        return self.get_forum_list_async(&self.root_forum_id());
    }

    pub fn get_unread_forums_async(&self) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::UnreadForums,
            async move { unread::get_unread_forums(boardware.as_ref()).await },
            ParserEvent::UnreadForumsCompleted
        );
    }

    pub fn get_thread_list_async(&self, forum: Forum, options: RequestOptions) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::ThreadList,
            async move { boardware.get_thread_list(forum, options).await },
            ParserEvent::ThreadsCompleted
        );
    }

    pub fn get_post_list_async(
        &self,
        thread: Thread,
        list_option: PostListOption,
        options: RequestOptions
    ) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::PostList,
            async move { boardware.get_post_list(thread, list_option, options).await },
            ParserEvent::PostsCompleted
        );
    }

    pub fn mark_forum_read_async(&self, forum: Forum) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::MarkForumRead,
            async move { boardware.mark_forum_read(forum).await },
            ParserEvent::MarkForumReadCompleted
        );
    }

    pub fn submit_new_thread_async(&self, thread: Thread) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::SubmitNewThread,
            async move { boardware.submit_new_thread(thread).await },
            ParserEvent::SubmitNewThreadCompleted
        );
    }

    pub fn submit_new_post_async(&self, post: Post) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::SubmitNewPost,
            async move { boardware.submit_new_post(post).await },
            ParserEvent::SubmitNewPostCompleted
        );
    }

    pub fn get_encryption_settings_async(&self) -> bool {
        let boardware = self.boardware.clone();

        return self.start_operation(
            OperationFamily::EncryptionSettings,
            async move { boardware.get_encryption_settings().await },
            ParserEvent::EncryptionSettingsCompleted
        );
    }
}

#[test]
fn test_slot_rejects_single_flight_families_while_busy() {
    let slot = OperationSlot::default();

    let first = slot.begin(OperationFamily::Login);
    assert!(first.is_some());
    assert_eq!(Some(OperationFamily::Login), slot.running_family());

    assert!(slot.begin(OperationFamily::Logout).is_none());
    assert!(slot.begin(OperationFamily::Login).is_none());

    assert!(slot.finish(first.unwrap()));
    assert!(slot.begin(OperationFamily::Logout).is_some());
}

#[test]
fn test_slot_superseded_operation_can_not_deliver() {
    let slot = OperationSlot::default();

    let first = slot.begin(OperationFamily::ThreadList).unwrap();
    let second = slot.begin(OperationFamily::ThreadList).unwrap();
    assert_ne!(first, second);

    assert!(!slot.finish(first));
    assert!(slot.finish(second));
    assert!(!slot.finish(second));
}

#[test]
fn test_slot_cancel() {
    let slot = OperationSlot::default();
    assert_eq!(None, slot.cancel());

    let id = slot.begin(OperationFamily::PostList).unwrap();
    assert_eq!(Some(OperationFamily::PostList), slot.cancel());
    assert!(!slot.finish(id));
    assert_eq!(None, slot.running_family());
}
