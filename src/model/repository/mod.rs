pub mod board_store;
pub mod parser_registry;
