pub mod logger;
pub mod string_helpers;
pub mod sync_helpers;
