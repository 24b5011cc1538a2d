use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::constants::{DEFAULT_ICON_FILES, DEFAULT_REFRESH_RATE_SECONDS, DEFAULT_USER_AGENT};

/// Process-wide settings, read once at startup and handed to the registry and the board manager.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub is_dev_build: bool,
    pub user_agent: String,
    pub icon_files: Vec<String>,
    pub default_refresh_rate: Duration
}

impl Default for ClientConfig {
    fn default() -> Self {
        return ClientConfig {
            is_dev_build: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            icon_files: DEFAULT_ICON_FILES.iter().map(|file| file.to_string()).collect(),
            default_refresh_rate: Duration::from_secs(DEFAULT_REFRESH_RATE_SECONDS)
        };
    }
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<ClientConfig> {
        let mut config = ClientConfig::default();

        if let Ok(value) = env::var("OWL_DEVELOPMENT_BUILD") {
            let value = i32::from_str(value.trim())
                .with_context(|| format!("OWL_DEVELOPMENT_BUILD must be 0 or 1, got \'{}\'", value))?;

            config.is_dev_build = value == 1;
        }

        if let Ok(value) = env::var("OWL_USER_AGENT") {
            if !value.trim().is_empty() {
                config.user_agent = value;
            }
        }

        if let Ok(value) = env::var("OWL_ICON_FILES") {
            config.icon_files = parse_icon_files(&value);
        }

        if let Ok(value) = env::var("OWL_REFRESH_RATE_SECONDS") {
            let seconds = u64::from_str(value.trim())
                .with_context(|| format!("OWL_REFRESH_RATE_SECONDS is not a number: \'{}\'", value))?;

            config.default_refresh_rate = Duration::from_secs(seconds);
        }

        return Ok(config);
    }
}

fn parse_icon_files(value: &str) -> Vec<String> {
    return value.split(',')
        .map(|file| file.trim())
        .filter(|file| !file.is_empty())
        .map(|file| file.to_string())
        .collect();
}

#[test]
fn test_parse_icon_files() {
    let files = parse_icon_files("/favicon.ico, images/icon.png,,");
    assert_eq!(vec!["/favicon.ico".to_string(), "images/icon.png".to_string()], files);

    assert!(parse_icon_files("").is_empty());
}
