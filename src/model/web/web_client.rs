use async_trait::async_trait;
use thiserror::Error;

use crate::constants::DEFAULT_USER_AGENT;

/// Transport settings pushed by a parser to every web client it watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebClientConfig {
    pub user_agent: String,
    pub use_encryption: bool,
    pub encrypt_key: String,
    pub encrypt_seed: String
}

impl Default for WebClientConfig {
    fn default() -> Self {
        return WebClientConfig {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_encryption: false,
            encrypt_key: String::new(),
            encrypt_seed: String::new()
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebMethod {
    Get,
    Post
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRequest {
    pub url: String,
    pub method: WebMethod,
    pub form: Vec<(String, String)>,
    pub no_cache: bool,
    /// When false a non-2xx status is returned as a response instead of an error.
    pub throw_on_fail: bool
}

impl WebRequest {
    pub fn get(url: &str) -> WebRequest {
        return WebRequest {
            url: url.to_string(),
            method: WebMethod::Get,
            form: Vec::new(),
            no_cache: false,
            throw_on_fail: true
        };
    }

    pub fn post(url: &str, form: Vec<(String, String)>) -> WebRequest {
        return WebRequest {
            url: url.to_string(),
            method: WebMethod::Post,
            form,
            no_cache: false,
            throw_on_fail: true
        };
    }

    pub fn no_cache(mut self) -> WebRequest {
        self.no_cache = true;
        return self;
    }

    pub fn allow_failure(mut self) -> WebRequest {
        self.throw_on_fail = false;
        return self;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResponse {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>
}

impl WebResponse {
    pub fn is_success(&self) -> bool {
        return (200..300).contains(&self.status);
    }

    pub fn text(&self) -> String {
        return String::from_utf8_lossy(&self.body).into_owned();
    }
}

#[derive(Error, Debug)]
pub enum WebError {
    #[error("invalid url \'{0}\'")]
    InvalidUrl(String),
    #[error("request to \'{url}\' failed: {message}")]
    Request { url: String, message: String },
    #[error("request to \'{url}\' returned status {status}")]
    BadStatus { url: String, status: u16 }
}

/// Low-level transport a boardware implementation talks to its server through.
#[async_trait]
pub trait WebClient: Send + Sync {
    async fn fetch(&self, request: WebRequest) -> anyhow::Result<WebResponse>;
    fn config(&self) -> WebClientConfig;
    fn set_config(&self, config: WebClientConfig);

    fn set_user_agent(&self, user_agent: &str) {
        let mut config = self.config();
        config.user_agent = user_agent.to_string();
        self.set_config(config);
    }
}
