use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PER_PAGE;
use crate::model::data::string_map::StringMap;
use crate::model::data::thread::Thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForumType {
    Forum,
    Category,
    /// External link, never a navigable container.
    Link
}

impl ForumType {
    pub fn as_str(&self) -> &'static str {
        return match self {
            ForumType::Forum => "FORUM",
            ForumType::Category => "CATEGORY",
            ForumType::Link => "LINK"
        };
    }
}

impl Display for ForumType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.as_str());
    }
}

impl FromStr for ForumType {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let forum_type = match value {
            "FORUM" => ForumType::Forum,
            "CATEGORY" => ForumType::Category,
            _ => ForumType::Link
        };

        return Ok(forum_type);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forum {
    /// Boardware-native id.
    pub id: String,
    /// Row id assigned by the board store, 0 when not stored.
    pub db_id: i64,
    pub name: String,
    pub forum_type: ForumType,
    pub display_order: u32,
    pub page_number: u32,
    pub per_page: u32,
    pub page_count: u32,
    pub has_unread: bool,
    pub vars: StringMap,
    pub children: Vec<Forum>,
    pub threads: Vec<Thread>,
    pub parent_id: Option<String>,
    pub board_id: Option<i64>
}

impl Default for Forum {
    fn default() -> Self {
        return Forum {
            id: String::new(),
            db_id: 0,
            name: String::new(),
            forum_type: ForumType::Forum,
            display_order: 0,
            page_number: 1,
            per_page: DEFAULT_PER_PAGE,
            page_count: 0,
            has_unread: false,
            vars: StringMap::new(),
            children: Vec::new(),
            threads: Vec::new(),
            parent_id: None,
            board_id: None
        };
    }
}

impl Forum {
    pub fn new(id: &str) -> Forum {
        return Forum {
            id: id.to_string(),
            ..Forum::default()
        };
    }

    pub fn with_type(id: &str, name: &str, forum_type: ForumType) -> Forum {
        return Forum {
            id: id.to_string(),
            name: name.to_string(),
            forum_type,
            ..Forum::default()
        };
    }

    pub fn create_root_forum(root_id: &str) -> Forum {
        return Forum {
            id: root_id.to_string(),
            name: String::from("root"),
            forum_type: ForumType::Category,
            ..Forum::default()
        };
    }

    /// Bare forum carrying only an id and a pagination cursor, used to request a thread page.
    pub fn page_request(id: &str, page_number: u32, per_page: u32) -> Forum {
        return Forum {
            id: id.to_string(),
            page_number,
            per_page,
            ..Forum::default()
        };
    }

    pub fn is_root(&self) -> bool {
        return self.parent_id.is_none();
    }

    pub fn is_navigable(&self) -> bool {
        return self.forum_type != ForumType::Link;
    }

    pub fn add_child(&mut self, mut child: Forum) {
        child.parent_id = Some(self.id.clone());
        child.set_board_id(self.board_id);
        self.children.push(child);
    }

    pub fn add_thread(&mut self, mut thread: Thread) {
        thread.forum_id = Some(self.id.clone());
        self.threads.push(thread);
    }

    pub fn navigable_children(&self) -> impl Iterator<Item = &Forum> {
        return self.children.iter().filter(|child| child.is_navigable());
    }

    pub fn set_board_id(&mut self, board_id: Option<i64>) {
        self.board_id = board_id;

        for child in self.children.iter_mut() {
            child.set_board_id(board_id);
        }
    }

    pub fn find_forum(&self, id: &str) -> Option<&Forum> {
        if self.id == id {
            return Some(self);
        }

        return self.children.iter().find_map(|child| child.find_forum(id));
    }

    pub fn find_forum_mut(&mut self, id: &str) -> Option<&mut Forum> {
        if self.id == id {
            return Some(self);
        }

        return self.children.iter_mut().find_map(|child| child.find_forum_mut(id));
    }

    /// Depth-first, parent before children.
    pub fn for_each_mut<F: FnMut(&mut Forum)>(&mut self, func: &mut F) {
        func(self);

        for child in self.children.iter_mut() {
            child.for_each_mut(func);
        }
    }

    pub fn forum_count(&self) -> usize {
        return 1 + self.children.iter().map(|child| child.forum_count()).sum::<usize>();
    }

    pub fn has_next_page(&self) -> bool {
        return self.page_number < self.page_count;
    }
}

#[test]
fn test_forum_type_strings() {
    assert_eq!(ForumType::Forum, ForumType::from_str("FORUM").unwrap());
    assert_eq!(ForumType::Category, ForumType::from_str("CATEGORY").unwrap());
    assert_eq!(ForumType::Link, ForumType::from_str("LINK").unwrap());
    assert_eq!(ForumType::Link, ForumType::from_str("something else").unwrap());
    assert_eq!("CATEGORY", ForumType::Category.to_string());
}

#[test]
fn test_tree_helpers() {
    let mut root = Forum::create_root_forum("-1");
    root.board_id = Some(7);

    let mut general = Forum::with_type("10", "General", ForumType::Category);
    general.add_child(Forum::with_type("11", "Chat", ForumType::Forum));
    general.add_child(Forum::with_type("12", "Homepage", ForumType::Link));

    root.add_child(general);

    assert!(root.is_root());
    assert_eq!(4, root.forum_count());

    let chat = root.find_forum("11").unwrap();
    assert_eq!(Some("10".to_string()), chat.parent_id);
    assert_eq!(Some(7), chat.board_id);

    let general = root.find_forum("10").unwrap();
    let navigable = general.navigable_children().map(|forum| forum.id.as_str()).collect::<Vec<&str>>();
    assert_eq!(vec!["11"], navigable);

    root.find_forum_mut("12").unwrap().has_unread = true;
    assert!(root.find_forum("12").unwrap().has_unread);
    assert!(root.find_forum("404").is_none());
}
