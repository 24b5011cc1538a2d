/// Forum id used by boardware that does not define its own root sentinel.
pub const DEFAULT_ROOT_FORUM_ID: &str = "-1";

// Unread threads are not necessarily listed first, so the unread search looks at the
// first 50 threads of a forum. Older unread threads further down are not reported.
pub const UNREAD_SEARCH_PAGE_NUMBER: u32 = 1;
pub const UNREAD_SEARCH_PER_PAGE: u32 = 50;

pub const DEFAULT_PER_PAGE: u32 = 20;

/// Used by the board update worker when a board has no usable `refreshRate`.
pub const FALLBACK_REFRESH_RATE_SECONDS: u64 = 60 * 60;
pub const DEFAULT_REFRESH_RATE_SECONDS: u64 = 60 * 10;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; Owl/0.1)";
pub const DEFAULT_ICON_FILES: [&str; 3] = ["/favicon.ico", "/favicon.png", "/apple-touch-icon.png"];

pub const OPTION_REFRESH_RATE: &str = "refreshRate";
pub const OPTION_ROOT_ID: &str = "rootId";
pub const OPTION_DISPLAY_ORDER: &str = "displayOrder";
pub const OPTION_ENCRYPTION_ENABLED: &str = "encryption.enabled";
pub const OPTION_ENCRYPTION_KEY: &str = "encryption.key";
pub const OPTION_ENCRYPTION_SEED: &str = "encryption.seed";

pub const PAYLOAD_SUCCESS: &str = "success";
pub const PAYLOAD_ERROR: &str = "error";

pub const UNKNOWN_ERROR_MESSAGE: &str = "There was an unknown error.";
