use std::fmt;
use std::fmt::{Debug, Formatter};

use crate::constants::{
    OPTION_ENCRYPTION_ENABLED,
    OPTION_ENCRYPTION_KEY,
    OPTION_ENCRYPTION_SEED,
    PAYLOAD_ERROR,
    PAYLOAD_SUCCESS
};
use crate::model::data::string_map::StringMap;

/// Result of a boardware operation that can fail at the domain level ("wrong password",
/// "forum is closed") without being an error of the request itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure { error: String }
}

impl<T> Outcome<T> {
    pub fn failure(error: &str) -> Outcome<T> {
        return Outcome::Failure { error: error.to_string() };
    }

    pub fn is_success(&self) -> bool {
        return matches!(self, Outcome::Success(_));
    }

    pub fn error(&self) -> Option<&str> {
        return match self {
            Outcome::Success(_) => None,
            Outcome::Failure { error } => Some(error.as_str())
        };
    }

    pub fn success_value(&self) -> Option<&T> {
        return match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure { .. } => None
        };
    }

    pub fn into_success(self) -> Option<T> {
        return match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure { .. } => None
        };
    }
}

/// Fields an operation adds to its flat result payload next to `success`/`error`.
pub trait Payload {
    fn write_payload(&self, payload: &mut StringMap);
}

impl Payload for StringMap {
    fn write_payload(&self, payload: &mut StringMap) {
        payload.merge(self);
    }
}

impl Payload for () {
    fn write_payload(&self, _payload: &mut StringMap) {}
}

impl<T: Payload> Outcome<T> {
    /// Flat `{"success": ..., "error": ..., ...fields}` form handed to presentation code.
    pub fn to_payload(&self) -> StringMap {
        let mut payload = StringMap::new();

        match self {
            Outcome::Success(value) => {
                value.write_payload(&mut payload);
                payload.set_or_add(PAYLOAD_SUCCESS, true);
            }
            Outcome::Failure { error } => {
                payload.set_or_add(PAYLOAD_SUCCESS, false);
                payload.set_or_add(PAYLOAD_ERROR, error);
            }
        }

        return payload;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardwareInfo {
    pub name: String,
    pub version: String,
    pub extra: StringMap
}

impl Payload for BoardwareInfo {
    fn write_payload(&self, payload: &mut StringMap) {
        payload.merge(&self.extra);
        payload.set_or_add("name", &self.name);
        payload.set_or_add("version", &self.version);
    }
}

/// Transport encryption parameters some boardware requires for signed requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncryptionSettings {
    pub enabled: bool,
    pub key: String,
    pub seed: String
}

impl EncryptionSettings {
    pub fn from_options(options: &StringMap) -> EncryptionSettings {
        if !options.get_bool(OPTION_ENCRYPTION_ENABLED, false) {
            return EncryptionSettings::default();
        }

        return EncryptionSettings {
            enabled: true,
            key: options.get_text(OPTION_ENCRYPTION_KEY),
            seed: options.get_text(OPTION_ENCRYPTION_SEED)
        };
    }

    pub fn apply_to(&self, options: &mut StringMap) {
        options.set_or_add(OPTION_ENCRYPTION_ENABLED, self.enabled);
        options.set_or_add(OPTION_ENCRYPTION_KEY, &self.key);
        options.set_or_add(OPTION_ENCRYPTION_SEED, &self.seed);
    }
}

impl Payload for EncryptionSettings {
    fn write_payload(&self, payload: &mut StringMap) {
        self.apply_to(payload);
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginInfo {
    pub username: String,
    pub password: String
}

impl LoginInfo {
    pub fn new(username: &str, password: &str) -> LoginInfo {
        return LoginInfo {
            username: username.to_string(),
            password: password.to_string()
        };
    }
}

impl Debug for LoginInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        return f.debug_struct("LoginInfo")
            .field("username", &self.username)
            .field("password", &"<hidden>")
            .finish();
    }
}

#[test]
fn test_payload_shape() {
    let mut info = BoardwareInfo::default();
    info.name = String::from("phpBB");
    info.version = String::from("3.3");

    let payload = Outcome::Success(info).to_payload();
    assert_eq!("true", payload.get_text("success"));
    assert_eq!("phpBB", payload.get_text("name"));
    assert_eq!("3.3", payload.get_text("version"));
    assert!(!payload.has("error"));

    let payload = Outcome::<()>::failure("Invalid password").to_payload();
    assert!(!payload.get_bool("success", true));
    assert_eq!("Invalid password", payload.get_text("error"));
}

#[test]
fn test_encryption_settings_from_options() {
    let mut options = StringMap::new();
    options.set_or_add(OPTION_ENCRYPTION_KEY, "key");
    options.set_or_add(OPTION_ENCRYPTION_SEED, "seed");

    assert_eq!(EncryptionSettings::default(), EncryptionSettings::from_options(&options));

    options.set_or_add(OPTION_ENCRYPTION_ENABLED, true);
    let settings = EncryptionSettings::from_options(&options);
    assert!(settings.enabled);
    assert_eq!("key", settings.key);
    assert_eq!("seed", settings.seed);
}

#[test]
fn test_login_info_debug_hides_password() {
    let info = LoginInfo::new("owl", "hunter2");
    let formatted = format!("{:?}", info);

    assert!(formatted.contains("owl"));
    assert!(!formatted.contains("hunter2"));
}
