use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::model::data::board::Board;
use crate::model::data::forum::{Forum, ForumType};
use crate::model::data::string_map::StringMap;

/// Persistence of boards, their options and their forum trees.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Every stored board with its forum tree, in id order.
    async fn load_all_boards(&self) -> anyhow::Result<Vec<Board>>;
    async fn load_board(&self, board_id: i64) -> anyhow::Result<Option<Board>>;

    /// Assigns the new row id to `board` (and its forum tree).
    async fn create_board(&self, board: &mut Board) -> anyhow::Result<bool>;
    async fn update_board(&self, board: &Board) -> anyhow::Result<bool>;
    async fn delete_board(&self, board: &Board) -> anyhow::Result<bool>;

    async fn board_option(&self, board_id: i64, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_board_option(&self, board_id: i64, key: &str, value: &str) -> anyhow::Result<bool>;

    async fn forum_var(&self, forum_db_id: i64, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_forum_var(&self, forum_db_id: i64, key: &str, value: &str) -> anyhow::Result<bool>;

    /// Rebuilds the tree below `root_id`. Siblings come back in ascending forum order.
    async fn load_forum_tree(&self, board_id: i64, root_id: &str) -> anyhow::Result<Forum>;

    /// Replaces the stored tree of the board. The root itself is not stored, only its
    /// descendants, which get their row ids assigned.
    async fn save_forum_tree(&self, board_id: i64, root: &mut Forum) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardRow {
    id: i64,
    name: String,
    url: String,
    service_url: String,
    protocol_name: String,
    username: String,
    password: String,
    enabled: bool,
    auto_login: bool,
    fav_icon: String,
    last_update: DateTime<Utc>,
    options: StringMap
}

impl BoardRow {
    fn from_board(id: i64, board: &Board) -> BoardRow {
        return BoardRow {
            id,
            name: board.name.clone(),
            url: board.url.clone(),
            service_url: board.service_url.clone(),
            protocol_name: board.protocol_name.clone(),
            username: board.username.clone(),
            password: board.password.clone(),
            enabled: board.enabled,
            auto_login: board.auto_login,
            fav_icon: board.fav_icon.clone(),
            last_update: board.last_update,
            options: board.options.clone()
        };
    }

    fn to_board(&self) -> Board {
        let mut board = Board::new(&self.name, &self.url);

        board.service_url = self.service_url.clone();
        board.protocol_name = self.protocol_name.clone();
        board.username = self.username.clone();
        board.password = self.password.clone();
        board.enabled = self.enabled;
        board.auto_login = self.auto_login;
        board.fav_icon = self.fav_icon.clone();
        board.last_update = self.last_update;
        board.options = self.options.clone();
        board.set_id(self.id);

        return board;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForumRow {
    db_id: i64,
    board_id: i64,
    forum_id: String,
    parent_id: String,
    name: String,
    forum_type: ForumType,
    forum_order: u32,
    has_unread: bool,
    vars: StringMap
}

impl ForumRow {
    fn to_forum(&self) -> Forum {
        let mut forum = Forum::with_type(&self.forum_id, &self.name, self.forum_type);

        forum.db_id = self.db_id;
        forum.display_order = self.forum_order;
        forum.has_unread = self.has_unread;
        forum.vars = self.vars.clone();

        return forum;
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    last_board_id: i64,
    last_forum_id: i64,
    boards: BTreeMap<i64, BoardRow>,
    forums: Vec<ForumRow>
}

impl Tables {
    fn forum_tree(&self, board_id: i64, root_id: &str) -> Forum {
        let mut root = Forum::create_root_forum(root_id);
        root.board_id = Some(board_id);
        root.children = self.children_of(board_id, root_id);

        return root;
    }

    fn children_of(&self, board_id: i64, parent_id: &str) -> Vec<Forum> {
        let mut rows = self.forums.iter()
            .filter(|row| row.board_id == board_id && row.parent_id == parent_id)
            .collect::<Vec<&ForumRow>>();

        rows.sort_by_key(|row| row.forum_order);

        return rows.into_iter()
            .map(|row| {
                let mut forum = row.to_forum();
                forum.parent_id = Some(parent_id.to_string());
                forum.board_id = Some(board_id);
                forum.children = self.children_of(board_id, &row.forum_id);
                forum
            })
            .collect();
    }

    fn replace_forum_tree(&mut self, board_id: i64, root: &mut Forum) {
        self.forums.retain(|row| row.board_id != board_id);

        let mut stack = Vec::<&mut Forum>::new();
        stack.push(root);

        while let Some(parent) = stack.pop() {
            let parent_id = parent.id.clone();

            for (index, child) in parent.children.iter_mut().enumerate() {
                self.last_forum_id += 1;

                child.db_id = self.last_forum_id;
                child.board_id = Some(board_id);
                child.parent_id = Some(parent_id.clone());

                // Sibling position is the stored order.
                let forum_order = index as u32;
                child.display_order = forum_order;

                self.forums.push(ForumRow {
                    db_id: child.db_id,
                    board_id,
                    forum_id: child.id.clone(),
                    parent_id: parent_id.clone(),
                    name: child.name.clone(),
                    forum_type: child.forum_type,
                    forum_order,
                    has_unread: child.has_unread,
                    vars: child.vars.clone()
                });

                stack.push(child);
            }
        }
    }

    fn load_board(&self, board_id: i64) -> Option<Board> {
        let row = self.boards.get(&board_id)?;

        let mut board = row.to_board();
        let root = self.forum_tree(board_id, &board.root_id());
        board.set_root(root);

        return Some(board);
    }
}

/// `BoardStore` kept in memory. Its content can be exported to and restored from JSON.
pub struct MemoryBoardStore {
    tables: RwLock<Tables>
}

impl MemoryBoardStore {
    pub fn new() -> MemoryBoardStore {
        return MemoryBoardStore { tables: RwLock::new(Tables::default()) };
    }

    pub fn from_json(json: &str) -> anyhow::Result<MemoryBoardStore> {
        let tables = serde_json::from_str::<Tables>(json)
            .context("from_json() Failed to deserialize board store snapshot")?;

        return Ok(MemoryBoardStore { tables: RwLock::new(tables) });
    }

    pub async fn to_json(&self) -> anyhow::Result<String> {
        let tables = self.tables.read().await;

        let json = serde_json::to_string(&*tables)
            .context("to_json() Failed to serialize board store snapshot")?;

        return Ok(json);
    }

    pub async fn board_count(&self) -> usize {
        return self.tables.read().await.boards.len();
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn load_all_boards(&self) -> anyhow::Result<Vec<Board>> {
        let tables = self.tables.read().await;

        let boards = tables.boards.keys()
            .filter_map(|board_id| tables.load_board(*board_id))
            .collect::<Vec<Board>>();

        debug!("load_all_boards() loaded {} boards", boards.len());
        return Ok(boards);
    }

    async fn load_board(&self, board_id: i64) -> anyhow::Result<Option<Board>> {
        return Ok(self.tables.read().await.load_board(board_id));
    }

    async fn create_board(&self, board: &mut Board) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;

        tables.last_board_id += 1;
        let board_id = tables.last_board_id;

        board.set_id(board_id);
        tables.boards.insert(board_id, BoardRow::from_board(board_id, board));
        tables.replace_forum_tree(board_id, board.root_mut());

        debug!("create_board() created board \'{}\' with id {}", board.name, board_id);
        return Ok(true);
    }

    async fn update_board(&self, board: &Board) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;

        if !tables.boards.contains_key(&board.id) {
            warn!("update_board() board \'{}\' ({}) is not stored", board.name, board.id);
            return Ok(false);
        }

        tables.boards.insert(board.id, BoardRow::from_board(board.id, board));
        return Ok(true);
    }

    async fn delete_board(&self, board: &Board) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;

        if tables.boards.remove(&board.id).is_none() {
            return Ok(false);
        }

        tables.forums.retain(|row| row.board_id != board.id);

        debug!("delete_board() deleted board \'{}\' ({})", board.name, board.id);
        return Ok(true);
    }

    async fn board_option(&self, board_id: i64, key: &str) -> anyhow::Result<Option<String>> {
        let tables = self.tables.read().await;

        let value = tables.boards.get(&board_id)
            .filter(|row| row.options.has(key))
            .map(|row| row.options.get_text(key));

        return Ok(value);
    }

    async fn set_board_option(&self, board_id: i64, key: &str, value: &str) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;

        let row = tables.boards.get_mut(&board_id);
        if row.is_none() {
            return Ok(false);
        }

        row.unwrap().options.set_or_add(key, value);
        return Ok(true);
    }

    async fn forum_var(&self, forum_db_id: i64, key: &str) -> anyhow::Result<Option<String>> {
        let tables = self.tables.read().await;

        let value = tables.forums.iter()
            .find(|row| row.db_id == forum_db_id)
            .filter(|row| row.vars.has(key))
            .map(|row| row.vars.get_text(key));

        return Ok(value);
    }

    async fn set_forum_var(&self, forum_db_id: i64, key: &str, value: &str) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;

        let row = tables.forums.iter_mut().find(|row| row.db_id == forum_db_id);
        if row.is_none() {
            return Ok(false);
        }

        row.unwrap().vars.set_or_add(key, value);
        return Ok(true);
    }

    async fn load_forum_tree(&self, board_id: i64, root_id: &str) -> anyhow::Result<Forum> {
        return Ok(self.tables.read().await.forum_tree(board_id, root_id));
    }

    async fn save_forum_tree(&self, board_id: i64, root: &mut Forum) -> anyhow::Result<()> {
        let mut tables = self.tables.write().await;

        if !tables.boards.contains_key(&board_id) {
            return Err(anyhow::anyhow!("save_forum_tree() board {} is not stored", board_id));
        }

        tables.replace_forum_tree(board_id, root);
        return Ok(());
    }
}
