use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::model::web::web_client::{WebClient, WebClientConfig, WebRequest, WebResponse};

/// Serves canned responses by URL, unknown URLs get a 404. Every request is recorded.
pub struct MockWebClient {
    responses: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    failing_urls: Mutex<Vec<String>>,
    requests: Mutex<Vec<WebRequest>>,
    config: Mutex<WebClientConfig>
}

impl MockWebClient {
    pub fn new() -> MockWebClient {
        return MockWebClient {
            responses: Mutex::new(HashMap::new()),
            failing_urls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            config: Mutex::new(WebClientConfig::default())
        };
    }

    pub fn respond(&self, url: &str, status: u16, body: &[u8]) {
        self.responses.lock().unwrap().insert(url.to_string(), (status, body.to_vec()));
    }

    pub fn fail(&self, url: &str) {
        self.failing_urls.lock().unwrap().push(url.to_string());
    }

    pub fn requested_urls(&self) -> Vec<String> {
        return self.requests.lock().unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect();
    }
}

#[async_trait]
impl WebClient for MockWebClient {
    async fn fetch(&self, request: WebRequest) -> anyhow::Result<WebResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if self.failing_urls.lock().unwrap().contains(&request.url) {
            return Err(anyhow!("connection refused"));
        }

        let (status, body) = self.responses.lock().unwrap()
            .get(&request.url)
            .cloned()
            .unwrap_or((404, Vec::new()));

        return Ok(WebResponse { url: request.url, status, body });
    }

    fn config(&self) -> WebClientConfig {
        return self.config.lock().unwrap().clone();
    }

    fn set_config(&self, config: WebClientConfig) {
        *self.config.lock().unwrap() = config;
    }
}
