pub mod board;
pub mod forum;
pub mod post;
pub mod results;
pub mod string_map;
pub mod thread;
