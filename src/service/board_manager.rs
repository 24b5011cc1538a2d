use std::sync::Arc;

use anyhow::Context;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::RwLock;
use url::Url;

use crate::config::ClientConfig;
use crate::constants::{OPTION_DISPLAY_ORDER, OPTION_REFRESH_RATE, OPTION_ROOT_ID};
use crate::helpers::string_helpers::{extract_site_name_from_domain, normalize_board_url};
use crate::model::data::board::{Board, BoardPtr};
use crate::model::data::forum::Forum;
use crate::model::parsers::parser::{Parser, ParserRef};
use crate::model::repository::board_store::BoardStore;
use crate::model::repository::parser_registry::ParserRegistry;
use crate::service::board_update_worker::BoardUpdateWorker;

struct ManagedBoard {
    board: BoardPtr,
    worker: Arc<BoardUpdateWorker>
}

impl ManagedBoard {
    fn new(board: Board) -> ManagedBoard {
        let board = board.into_ptr();
        let worker = Arc::new(BoardUpdateWorker::new(&board));

        return ManagedBoard { board, worker };
    }
}

/// The user's list of boards, kept in `displayOrder` and mirrored to the board store.
pub struct BoardManager {
    store: Arc<dyn BoardStore>,
    registry: Arc<ParserRegistry>,
    config: ClientConfig,
    boards: RwLock<Vec<ManagedBoard>>
}

impl BoardManager {
    pub fn new(
        store: Arc<dyn BoardStore>,
        registry: Arc<ParserRegistry>,
        config: ClientConfig
    ) -> BoardManager {
        return BoardManager {
            store,
            registry,
            config,
            boards: RwLock::new(Vec::new())
        };
    }

    pub async fn init(&self) -> anyhow::Result<usize> {
        let mut loaded = self.store.load_all_boards()
            .await
            .context("init() Failed to load boards")?;

        loaded.sort_by_key(|board| board.display_order());

        let mut boards = self.boards.write().await;
        *boards = loaded.into_iter()
            .map(ManagedBoard::new)
            .collect();

        info!("init() loaded {} boards", boards.len());
        return Ok(boards.len());
    }

    pub async fn boards(&self) -> Vec<BoardPtr> {
        return self.boards.read().await
            .iter()
            .map(|managed| managed.board.clone())
            .collect();
    }

    pub async fn board_count(&self) -> usize {
        return self.boards.read().await.len();
    }

    pub async fn board_by_id(&self, board_id: i64) -> Option<BoardPtr> {
        for managed in self.boards.read().await.iter() {
            if managed.board.read().await.id == board_id {
                return Some(managed.board.clone());
            }
        }

        return None;
    }

    /// Stores a new board at the end of the list.
    pub async fn create_board(&self, mut board: Board) -> anyhow::Result<BoardPtr> {
        let mut boards = self.boards.write().await;

        board.url = normalize_board_url(&board.url);
        if board.name.trim().is_empty() {
            board.name = default_board_name(&board.url);
        }

        board.options.add(OPTION_REFRESH_RATE, self.config.default_refresh_rate.as_secs());
        board.options.set_or_add(OPTION_DISPLAY_ORDER, boards.len());

        let created = self.store.create_board(&mut board)
            .await
            .with_context(|| format!("create_board() Failed to store board \'{}\'", board.name))?;

        if !created {
            return Err(anyhow::anyhow!("create_board() board \'{}\' was not stored", board.name));
        }

        info!("create_board() created board \'{}\' ({})", board.name, board.id);

        let managed = ManagedBoard::new(board);
        let board = managed.board.clone();
        boards.push(managed);

        return Ok(board);
    }

    pub async fn update_board(&self, board: &BoardPtr) -> anyhow::Result<bool> {
        let board = board.read().await;

        let updated = self.store.update_board(&board)
            .await
            .with_context(|| format!("update_board() Failed to update board \'{}\'", board.name))?;

        if let Some(parser) = board.parser() {
            parser.set_options(board.options.clone());
        }

        return Ok(updated);
    }

    /// Removes the board, stops its update worker and closes the gap in `displayOrder`.
    pub async fn delete_board(&self, board: &BoardPtr) -> anyhow::Result<bool> {
        let mut boards = self.boards.write().await;

        let position = boards.iter().position(|managed| Arc::ptr_eq(&managed.board, board));
        if position.is_none() {
            warn!("delete_board() board is not managed");
            return Ok(false);
        }

        let position = position.unwrap();

        let deleted = {
            let board = board.read().await;
            self.store.delete_board(&board)
                .await
                .with_context(|| format!("delete_board() Failed to delete board \'{}\'", board.name))?
        };

        if !deleted {
            return Ok(false);
        }

        let managed = boards.remove(position);
        managed.worker.mark_deleted();

        for managed in boards.iter().skip(position) {
            let mut board = managed.board.write().await;

            let display_order = board.display_order() - 1;
            board.options.set_or_add(OPTION_DISPLAY_ORDER, display_order);

            self.store.set_board_option(board.id, OPTION_DISPLAY_ORDER, &display_order.to_string())
                .await
                .with_context(|| format!("delete_board() Failed to reorder board \'{}\'", board.name))?;
        }

        return Ok(true);
    }

    /// Resolves a parser for the board and attaches it. `None` when no boardware matched.
    pub async fn connect_board(&self, board: &BoardPtr) -> Option<ParserRef> {
        let (name, protocol_name, url) = {
            let board = board.read().await;

            let url = if board.service_url.trim().is_empty() {
                board.url.clone()
            } else {
                board.service_url.clone()
            };

            (board.name.clone(), board.protocol_name.clone(), url)
        };

        let protocol_name = Some(protocol_name.as_str()).filter(|name| !name.is_empty());

        let parser = self.registry.resolve(protocol_name, &url).await;
        if parser.is_none() {
            warn!("connect_board(\'{}\') can't resolve a parser for \'{}\'", name, url);
            return None;
        }

        let parser = parser.unwrap();

        {
            let mut board = board.write().await;
            if board.protocol_name.is_empty() {
                board.protocol_name = parser.name().to_string();
            }

            board.set_parser(parser.clone());
        }

        if let Err(error) = self.record_root_id(board, &parser.root_forum_id()).await {
            warn!("connect_board(\'{}\') {:#}", name, error);
        }

        info!("connect_board(\'{}\') connected using \'{}\'", name, parser.name());
        return Some(parser);
    }

    /// Spawns the refresh loop of the board. Returns false when it is already running or
    /// the board is not managed.
    pub async fn start_update_worker(&self, board: &BoardPtr) -> bool {
        let boards = self.boards.read().await;

        let managed = boards.iter().find(|managed| Arc::ptr_eq(&managed.board, board));
        if managed.is_none() {
            return false;
        }

        return managed.unwrap().worker.start().is_some();
    }

    /// Downloads the complete forum structure through the board's parser and stores it.
    pub async fn sync_forum_tree(&self, board: &BoardPtr) -> anyhow::Result<usize> {
        let (board_id, parser) = {
            let board = board.read().await;
            (board.id, board.parser().cloned())
        };

        let parser = parser.context("sync_forum_tree() board is not connected")?;

        let root_id = parser.root_forum_id();
        self.record_root_id(board, &root_id).await?;

        let mut root = Forum::create_root_forum(&root_id);
        fetch_children(&parser, &mut root).await?;

        self.store.save_forum_tree(board_id, &mut root).await?;

        let forum_count = root.forum_count() - 1;
        board.write().await.set_root(root);

        debug!("sync_forum_tree() stored {} forums", forum_count);
        return Ok(forum_count);
    }

    /// Stores the root forum id of the attached boardware as the board's `rootId` option.
    /// A changed root drops the forum tree kept under the previous one.
    async fn record_root_id(&self, board: &BoardPtr, root_id: &str) -> anyhow::Result<()> {
        let board_id = {
            let mut board = board.write().await;
            if board.root_id() == root_id {
                return Ok(());
            }

            board.options.set_or_add(OPTION_ROOT_ID, root_id);
            board.set_root(Forum::create_root_forum(root_id));
            board.id
        };

        self.store.set_board_option(board_id, OPTION_ROOT_ID, root_id)
            .await
            .with_context(|| format!("record_root_id() Failed to store root id of board {}", board_id))?;

        debug!("record_root_id() board {} uses root forum \'{}\'", board_id, root_id);
        return Ok(());
    }

    pub async fn fav_icon(&self, board: &BoardPtr) -> Option<Vec<u8>> {
        let parser = board.read().await.parser().cloned()?;
        return Some(parser.get_fav_icon_buffer(&self.config.icon_files).await);
    }
}

fn fetch_children<'a>(parser: &'a Parser, forum: &'a mut Forum) -> BoxFuture<'a, anyhow::Result<()>> {
    return async move {
        let children = parser.get_forum_list(&forum.id).await?;

        for child in children {
            forum.add_child(child);
        }

        for child in forum.children.iter_mut().filter(|child| child.is_navigable()) {
            fetch_children(parser, child).await?;
        }

        return Ok::<(), anyhow::Error>(());
    }.boxed();
}

fn default_board_name(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()));

    return match host {
        Some(host) => extract_site_name_from_domain(&host).to_string(),
        None => url.to_string()
    };
}

#[test]
fn test_default_board_name() {
    assert_eq!("example", default_board_name("http://forum.example.com/index.php"));
    assert_eq!("localhost", default_board_name("http://localhost:8080"));
}
