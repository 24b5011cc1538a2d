pub mod async_ops;
pub mod boardware;
pub mod error;
pub mod favicon;
pub mod parser;
pub mod unread;
