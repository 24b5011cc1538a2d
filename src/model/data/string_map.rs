use std::collections::BTreeMap;
use std::collections::btree_map::Iter;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key-ordered string options bag used for board options, forum vars and open-ended
/// result fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringMap {
    values: BTreeMap<String, String>
}

impl StringMap {
    pub fn new() -> StringMap {
        return StringMap { values: BTreeMap::new() };
    }

    pub fn has(&self, key: &str) -> bool {
        return self.values.contains_key(key);
    }

    pub fn len(&self) -> usize {
        return self.values.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.values.is_empty();
    }

    /// Inserts only when the key is not present yet. Returns whether the value was stored.
    pub fn add<V: Display>(&mut self, key: &str, value: V) -> bool {
        if self.values.contains_key(key) {
            return false;
        }

        self.values.insert(key.to_string(), value.to_string());
        return true;
    }

    pub fn set_or_add<V: Display>(&mut self, key: &str, value: V) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        return self.values.remove(key);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn get_text(&self, key: &str) -> String {
        return self.get_text_or(key, "");
    }

    pub fn get_text_or(&self, key: &str, default_value: &str) -> String {
        return self.values.get(key)
            .map(|value| value.clone())
            .unwrap_or_else(|| default_value.to_string());
    }

    pub fn get_bool(&self, key: &str, default_value: bool) -> bool {
        let value = self.values.get(key);
        if value.is_none() {
            return default_value;
        }

        return match value.unwrap().trim().to_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => default_value
        };
    }

    /// Parses the value as any numeric type. `None` when missing or malformed.
    pub fn get<T: FromStr>(&self, key: &str) -> Option<T> {
        return self.values.get(key)
            .and_then(|value| T::from_str(value.trim()).ok());
    }

    pub fn get_int(&self, key: &str, default_value: i64) -> i64 {
        return self.get::<i64>(key).unwrap_or(default_value);
    }

    pub fn merge(&mut self, other: &StringMap) {
        for (key, value) in other.iter() {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        return self.values.iter();
    }
}

impl<'a> IntoIterator for &'a StringMap {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        return self.values.iter();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter.into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect::<BTreeMap<String, String>>();

        return StringMap { values };
    }
}

#[test]
fn test_typed_accessors() {
    let mut map = StringMap::new();
    map.set_or_add("success", true);
    map.set_or_add("refreshRate", 600);
    map.set_or_add("name", "Owl board");
    map.set_or_add("flag", "1");
    map.set_or_add("broken", "yes please");

    assert!(map.get_bool("success", false));
    assert!(map.get_bool("flag", false));
    assert!(map.get_bool("broken", true));
    assert!(!map.get_bool("missing", false));

    assert_eq!(Some(600u32), map.get::<u32>("refreshRate"));
    assert_eq!(None, map.get::<u32>("name"));
    assert_eq!(-5, map.get_int("missing", -5));

    assert_eq!("Owl board", map.get_text("name"));
    assert_eq!("", map.get_text("missing"));
    assert_eq!("fallback", map.get_text_or("missing", "fallback"));
}

#[test]
fn test_add_does_not_overwrite_and_set_or_add_does() {
    let mut map = StringMap::new();

    assert!(map.add("key", "first"));
    assert!(!map.add("key", "second"));
    assert_eq!("first", map.get_text("key"));

    map.set_or_add("key", "third");
    assert_eq!("third", map.get_text("key"));
    assert_eq!(1, map.len());

    assert_eq!(Some("third".to_string()), map.remove("key"));
    assert!(map.is_empty());
}

#[test]
fn test_iteration_is_key_ordered() {
    let map = StringMap::from_iter([("b", "2"), ("a", "1"), ("c", "3")]);
    let keys = map.iter().map(|(key, _)| key.as_str()).collect::<Vec<&str>>();

    assert_eq!(vec!["a", "b", "c"], keys);
}
