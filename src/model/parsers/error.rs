use thiserror::Error;

use crate::constants::UNKNOWN_ERROR_MESSAGE;
use crate::model::web::web_client::WebError;

/// Error delivered to consumers of asynchronous parser operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// Raised by a boardware implementation, e.g. a page it could not make sense of.
    #[error("{0}")]
    Boardware(String),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Unknown(String)
}

impl ParserError {
    pub fn boardware(message: &str) -> ParserError {
        return ParserError::Boardware(message.to_string());
    }

    pub fn unknown() -> ParserError {
        return ParserError::Unknown(UNKNOWN_ERROR_MESSAGE.to_string());
    }

    pub fn message(&self) -> &str {
        return match self {
            ParserError::Boardware(message) => message,
            ParserError::Transport(message) => message,
            ParserError::Unknown(message) => message
        };
    }

    pub fn is_transport(&self) -> bool {
        return matches!(self, ParserError::Transport(_));
    }

    /// Classifies an operation error by the first recognized error in its chain.
    /// Anything unrecognized becomes the generic unknown error.
    pub fn from_error(error: &anyhow::Error) -> ParserError {
        for cause in error.chain() {
            if let Some(parser_error) = cause.downcast_ref::<ParserError>() {
                return parser_error.clone();
            }

            if cause.is::<WebError>() || cause.is::<reqwest::Error>() {
                return ParserError::Transport(format!("{:#}", error));
            }
        }

        return ParserError::unknown();
    }
}

pub fn is_transport_error(error: &anyhow::Error) -> bool {
    return ParserError::from_error(error).is_transport();
}

#[test]
fn test_classification() {
    use anyhow::Context;

    let error = anyhow::Error::new(ParserError::boardware("Unexpected page layout"));
    assert_eq!(ParserError::boardware("Unexpected page layout"), ParserError::from_error(&error));

    let error: anyhow::Result<()> = Err(WebError::BadStatus { url: "http://localhost".to_string(), status: 503 }.into());
    let error = error.context("get_forum_list() failed").unwrap_err();
    let parser_error = ParserError::from_error(&error);
    assert!(parser_error.is_transport());
    assert!(parser_error.message().contains("503"));

    let error = anyhow::anyhow!("something odd");
    assert_eq!(ParserError::unknown(), ParserError::from_error(&error));
    assert_eq!(UNKNOWN_ERROR_MESSAGE, ParserError::from_error(&error).message());
}
