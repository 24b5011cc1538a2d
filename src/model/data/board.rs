use std::collections::HashSet;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::constants::{DEFAULT_ROOT_FORUM_ID, OPTION_DISPLAY_ORDER, OPTION_REFRESH_RATE, OPTION_ROOT_ID};
use crate::model::data::forum::Forum;
use crate::model::data::string_map::StringMap;
use crate::model::parsers::error::ParserError;
use crate::model::parsers::parser::ParserRef;

pub type BoardPtr = Arc<RwLock<Board>>;

#[derive(Clone)]
pub struct Board {
    /// Row id assigned by the board store, 0 until the board is created there.
    pub id: i64,
    pub name: String,
    pub url: String,
    pub service_url: String,
    /// Registry name of the boardware implementation serving this board.
    pub protocol_name: String,
    pub username: String,
    pub password: String,
    pub enabled: bool,
    pub auto_login: bool,
    pub fav_icon: String,
    pub last_update: DateTime<Utc>,
    pub options: StringMap,
    root: Forum,
    parser: Option<ParserRef>
}

impl Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        return f.debug_struct("Board")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("url", &self.url)
            .field("protocol_name", &self.protocol_name)
            .field("enabled", &self.enabled)
            .field("options", &self.options)
            .field("forums", &self.root.forum_count())
            .field("parser", &self.parser.as_ref().map(|parser| parser.name()))
            .finish();
    }
}

impl Board {
    pub fn new(name: &str, url: &str) -> Board {
        return Board {
            id: 0,
            name: name.to_string(),
            url: url.to_string(),
            service_url: String::new(),
            protocol_name: String::new(),
            username: String::new(),
            password: String::new(),
            enabled: true,
            auto_login: false,
            fav_icon: String::new(),
            last_update: Utc::now(),
            options: StringMap::new(),
            root: Forum::create_root_forum(DEFAULT_ROOT_FORUM_ID),
            parser: None
        };
    }

    pub fn into_ptr(self) -> BoardPtr {
        return Arc::new(RwLock::new(self));
    }

    pub fn root_id(&self) -> String {
        return self.options.get_text_or(OPTION_ROOT_ID, DEFAULT_ROOT_FORUM_ID);
    }

    pub fn root(&self) -> &Forum {
        return &self.root;
    }

    pub fn root_mut(&mut self) -> &mut Forum {
        return &mut self.root;
    }

    pub fn set_root(&mut self, mut root: Forum) {
        root.parent_id = None;
        root.set_board_id(Some(self.id));
        self.root = root;
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = id;
        self.root.set_board_id(Some(id));
    }

    pub fn find_forum(&self, forum_id: &str) -> Option<&Forum> {
        return self.root.find_forum(forum_id);
    }

    pub fn parser(&self) -> Option<&ParserRef> {
        return self.parser.as_ref();
    }

    pub fn set_parser(&mut self, parser: ParserRef) {
        parser.set_options(self.options.clone());
        self.parser = Some(parser);
    }

    /// `None` when the option is missing or not a number.
    pub fn refresh_rate_seconds(&self) -> Option<u64> {
        return self.options.get::<u64>(OPTION_REFRESH_RATE);
    }

    pub fn display_order(&self) -> i64 {
        return self.options.get_int(OPTION_DISPLAY_ORDER, 0);
    }

    /// Marks every forum of the tree read, except the ones reported unread.
    pub fn apply_unread(&mut self, unread_forums: &[Forum]) -> usize {
        let unread_ids = unread_forums.iter()
            .map(|forum| forum.id.as_str())
            .collect::<HashSet<&str>>();

        let mut marked = 0usize;

        self.root.for_each_mut(&mut |forum| {
            forum.has_unread = unread_ids.contains(forum.id.as_str());
            if forum.has_unread {
                marked += 1;
            }
        });

        return marked;
    }
}

/// Refreshes the unread state of the board's forums through its parser.
///
/// The board lock is not held while the parser talks to the server.
pub async fn update_unread(board: &BoardPtr) -> anyhow::Result<Vec<Forum>> {
    let (board_name, parser) = {
        let board = board.read().await;
        (board.name.clone(), board.parser().cloned())
    };

    let parser = match parser {
        Some(parser) => parser,
        None => {
            let message = format!("Board \'{}\' is not connected to a parser", board_name);
            return Err(ParserError::Boardware(message).into());
        }
    };

    let unread_forums = parser.get_unread_forums().await?;

    let marked = {
        let mut board = board.write().await;
        board.apply_unread(&unread_forums)
    };

    debug!("update_unread({}) {} forum(s) have unread threads", board_name, marked);
    return Ok(unread_forums);
}

#[test]
fn test_apply_unread() {
    let mut board = Board::new("test", "http://localhost");

    let mut category = Forum::with_type("1", "Category", crate::model::data::forum::ForumType::Category);
    category.add_child(Forum::new("2"));
    category.add_child(Forum::new("3"));
    board.root_mut().add_child(category);

    board.root_mut().find_forum_mut("3").unwrap().has_unread = true;

    let marked = board.apply_unread(&[Forum::new("2")]);

    assert_eq!(1, marked);
    assert!(board.find_forum("2").unwrap().has_unread);
    assert!(!board.find_forum("3").unwrap().has_unread);
}

#[test]
fn test_refresh_rate_option() {
    let mut board = Board::new("test", "http://localhost");
    assert_eq!(None, board.refresh_rate_seconds());

    board.options.set_or_add(OPTION_REFRESH_RATE, 600);
    assert_eq!(Some(600), board.refresh_rate_seconds());

    board.options.set_or_add(OPTION_REFRESH_RATE, "soon");
    assert_eq!(None, board.refresh_rate_seconds());
}
