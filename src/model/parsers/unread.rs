use crate::constants::{UNREAD_SEARCH_PAGE_NUMBER, UNREAD_SEARCH_PER_PAGE};
use crate::model::data::forum::{Forum, ForumType};
use crate::model::parsers::boardware::{Boardware, RequestOptions};

fn worth_searching(forum: &Forum) -> bool {
    return forum.has_unread || forum.forum_type == ForumType::Category;
}

/// Depth-first search for forums with unread threads on their first thread page.
///
/// Only forums flagged unread by the server, or categories, are looked into. A forum is
/// reported when one of its first `UNREAD_SEARCH_PER_PAGE` threads is unread; unread
/// threads further down the forum are not noticed.
pub async fn get_unread_forums(boardware: &dyn Boardware) -> anyhow::Result<Vec<Forum>> {
    let root_id = boardware.root_forum_id();
    let root_children = boardware.get_forum_list(&root_id).await?;

    let mut unread_forums = Vec::<Forum>::new();
    let mut stack = root_children.into_iter().rev().collect::<Vec<Forum>>();

    while let Some(forum) = stack.pop() {
        if !worth_searching(&forum) {
            continue;
        }

        let page_request = Forum::page_request(
            &forum.id,
            UNREAD_SEARCH_PAGE_NUMBER,
            UNREAD_SEARCH_PER_PAGE
        );

        let page = boardware.get_thread_list(page_request, RequestOptions::default()).await?;
        let children = boardware.get_forum_list(&forum.id).await?;

        if page.threads.iter().any(|thread| thread.has_unread) {
            debug!("get_unread_forums() forum \'{}\' ({}) has unread threads", forum.name, forum.id);
            unread_forums.push(forum);
        }

        stack.extend(children.into_iter().filter(worth_searching).rev());
    }

    return Ok(unread_forums);
}
