pub mod http_client;
pub mod web_client;
