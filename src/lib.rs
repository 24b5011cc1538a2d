#[macro_use]
extern crate log;

pub mod constants;
pub mod config;
pub mod helpers;
pub mod model;
pub mod service;

#[cfg(test)]
mod tests;

pub use crate::config::ClientConfig;
pub use crate::model::data::board::{Board, BoardPtr};
pub use crate::model::data::forum::{Forum, ForumType};
pub use crate::model::data::post::Post;
pub use crate::model::data::results::{BoardwareInfo, EncryptionSettings, LoginInfo, Outcome};
pub use crate::model::data::string_map::StringMap;
pub use crate::model::data::thread::Thread;
pub use crate::model::parsers::boardware::{Boardware, PostListOption, RequestOptions};
pub use crate::model::parsers::error::ParserError;
pub use crate::model::parsers::parser::{Parser, ParserEvent, ParserRef};
pub use crate::model::repository::board_store::{BoardStore, MemoryBoardStore};
pub use crate::model::repository::parser_registry::ParserRegistry;
pub use crate::service::board_manager::BoardManager;
pub use crate::service::board_update_worker::BoardUpdateWorker;
