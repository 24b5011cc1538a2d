use std::sync::Arc;

use crate::config::ClientConfig;
use crate::constants::DEFAULT_USER_AGENT;
use crate::helpers::string_helpers::normalize_board_url;
use crate::model::parsers::boardware::Boardware;
use crate::model::parsers::parser::{Parser, ParserRef};

/// Builds a boardware implementation bound to a (normalized) board URL.
pub type ParserFactory = Box<dyn Fn(&str) -> anyhow::Result<Arc<dyn Boardware>> + Send + Sync>;

struct RegistryEntry {
    name: String,
    factory: ParserFactory
}

/// Known boardware implementations in registration order. Constructed once and shared
/// by whoever needs to turn a board URL into a parser.
pub struct ParserRegistry {
    entries: Vec<RegistryEntry>,
    user_agent: String
}

impl ParserRegistry {
    pub fn new() -> ParserRegistry {
        return ParserRegistry {
            entries: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string()
        };
    }

    pub fn with_config(config: &ClientConfig) -> ParserRegistry {
        let mut registry = ParserRegistry::new();
        registry.user_agent = config.user_agent.clone();

        return registry;
    }

    /// Registering an already known name replaces its factory but keeps its probing position.
    pub fn register<F>(&mut self, name: &str, factory: F)
        where F: Fn(&str) -> anyhow::Result<Arc<dyn Boardware>> + Send + Sync + 'static
    {
        let factory: ParserFactory = Box::new(factory);

        let existing = self.entries.iter_mut().find(|entry| entry.name == name);
        if let Some(entry) = existing {
            warn!("register() replacing factory of \'{}\'", name);
            entry.factory = factory;
            return;
        }

        self.entries.push(RegistryEntry { name: name.to_string(), factory });
    }

    pub fn parser_names(&self) -> Vec<String> {
        return self.entries.iter()
            .map(|entry| entry.name.clone())
            .collect();
    }

    pub fn contains(&self, name: &str) -> bool {
        return self.entries.iter().any(|entry| entry.name == name);
    }

    pub fn create_parser(&self, name: &str, board_url: &str) -> Option<ParserRef> {
        let entry = self.entries.iter().find(|entry| entry.name == name);
        if entry.is_none() {
            warn!("create_parser() unknown boardware \'{}\'", name);
            return None;
        }

        return self.construct(entry.unwrap(), &normalize_board_url(board_url));
    }

    /// Probes every known implementation in registration order and returns the first one
    /// whose `get_boardware_info()` succeeds against `board_url`.
    pub async fn detect_parser(&self, board_url: &str) -> Option<ParserRef> {
        let board_url = normalize_board_url(board_url);

        for entry in &self.entries {
            let parser = self.construct(entry, &board_url);
            if parser.is_none() {
                continue;
            }

            let parser = parser.unwrap();
            if probe(&parser, &board_url).await {
                info!("detect_parser() \'{}\' is served by \'{}\'", board_url, entry.name);
                return Some(parser);
            }
        }

        warn!("detect_parser() no boardware matched \'{}\'", board_url);
        return None;
    }

    /// With a name the named implementation is still verified against the board. Without
    /// one every implementation is probed.
    pub async fn resolve(&self, name: Option<&str>, board_url: &str) -> Option<ParserRef> {
        let name = name.filter(|name| !name.trim().is_empty());
        if name.is_none() {
            return self.detect_parser(board_url).await;
        }

        let parser = self.create_parser(name.unwrap(), board_url)?;
        if !probe(&parser, parser.base_url()).await {
            return None;
        }

        return Some(parser);
    }

    fn construct(&self, entry: &RegistryEntry, board_url: &str) -> Option<ParserRef> {
        let boardware = match (entry.factory)(board_url) {
            Ok(boardware) => boardware,
            Err(error) => {
                warn!("construct() \'{}\' failed for \'{}\': {:#}", entry.name, board_url, error);
                return None;
            }
        };

        let parser = Parser::new(boardware);
        parser.set_user_agent(&self.user_agent);

        return Some(Arc::new(parser));
    }
}

async fn probe(parser: &Parser, board_url: &str) -> bool {
    return match parser.get_boardware_info().await {
        Ok(outcome) if outcome.is_success() => true,
        Ok(outcome) => {
            debug!(
                "probe() \'{}\' rejected \'{}\': {}",
                parser.name(),
                board_url,
                outcome.error().unwrap_or_default()
            );
            false
        }
        Err(error) => {
            debug!("probe() \'{}\' failed for \'{}\': {:#}", parser.name(), board_url, error);
            false
        }
    };
}
