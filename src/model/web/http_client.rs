use std::sync::RwLock;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA, USER_AGENT};

use crate::helpers::string_helpers;
use crate::helpers::sync_helpers;
use crate::model::web::web_client::{
    WebClient,
    WebClientConfig,
    WebError,
    WebMethod,
    WebRequest,
    WebResponse
};

/// `reqwest` backed transport with a per-client cookie jar, so a login session survives
/// between requests of the same boardware instance.
pub struct HttpClient {
    client: reqwest::Client,
    config: RwLock<WebClientConfig>
}

impl HttpClient {
    pub fn new() -> anyhow::Result<HttpClient> {
        return HttpClient::with_config(WebClientConfig::default());
    }

    pub fn with_config(config: WebClientConfig) -> anyhow::Result<HttpClient> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build reqwest client")?;

        return Ok(HttpClient { client, config: RwLock::new(config) });
    }
}

#[async_trait]
impl WebClient for HttpClient {
    async fn fetch(&self, request: WebRequest) -> anyhow::Result<WebResponse> {
        let url = reqwest::Url::parse(&request.url)
            .map_err(|_| WebError::InvalidUrl(request.url.clone()))?;

        let user_agent = self.config().user_agent;

        let mut builder = match request.method {
            WebMethod::Get => self.client.get(url),
            WebMethod::Post => self.client.post(url).form(&request.form)
        };

        builder = builder.header(USER_AGENT, user_agent);

        if request.no_cache {
            builder = builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        debug!("fetch() {:?} \'{}\'", request.method, request.url);

        let response = builder.send()
            .await
            .map_err(|error| WebError::Request { url: request.url.clone(), message: error.to_string() })?;

        let status = response.status().as_u16();

        let body = response.bytes()
            .await
            .with_context(|| format!("fetch() Failed to read response body of \'{}\'", request.url))?
            .to_vec();

        let web_response = WebResponse { url: request.url.clone(), status, body };

        if request.throw_on_fail && !web_response.is_success() {
            error!(
                "fetch() \'{}\' bad status code {}, body: \'{}\'",
                request.url,
                status,
                string_helpers::body_preview(&web_response.text())
            );

            return Err(WebError::BadStatus { url: request.url, status }.into());
        }

        return Ok(web_response);
    }

    fn config(&self) -> WebClientConfig {
        return sync_helpers::read(&self.config).clone();
    }

    fn set_config(&self, config: WebClientConfig) {
        *sync_helpers::write(&self.config) = config;
    }
}

#[tokio::test]
async fn test_invalid_url_is_a_web_error() {
    let client = HttpClient::new().unwrap();

    let error = client.fetch(WebRequest::get("not a url")).await.unwrap_err();
    let web_error = error.downcast_ref::<WebError>().unwrap();

    assert!(matches!(web_error, WebError::InvalidUrl(_)));
}

#[test]
fn test_user_agent_update_keeps_encryption_settings() {
    let mut config = WebClientConfig::default();
    config.use_encryption = true;
    config.encrypt_key = String::from("key");

    let client = HttpClient::with_config(config).unwrap();
    client.set_user_agent("OwlTest/1.0");

    let config = client.config();
    assert_eq!("OwlTest/1.0", config.user_agent);
    assert!(config.use_encryption);
    assert_eq!("key", config.encrypt_key);
}
