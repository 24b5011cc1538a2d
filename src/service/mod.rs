pub mod board_manager;
pub mod board_update_worker;
