mod board_store_tests;
mod parser_registry_tests;
