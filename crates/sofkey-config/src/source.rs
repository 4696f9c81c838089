//! The configuration capability seen by the resolver.
//!
//! The resolver only ever asks for two string keys. Anything that can answer
//! `get(key)` can stand in for the host's settings store.

use std::collections::HashMap;

use crate::AppConfig;

/// Key of the version override.
pub const VERSION_KEY: &str = "sofistik.version";

/// Key of the language override.
pub const LANGUAGE_KEY: &str = "sofistik.language";

/// A read-only key/value configuration store.
pub trait ConfigSource: Send + Sync {
    /// Return the raw value for `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigSource for AppConfig {
    fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            VERSION_KEY => &self.keywords.version,
            LANGUAGE_KEY => &self.keywords.language,
            _ => return None,
        };
        if value.trim().is_empty() {
            None
        } else {
            Some(value.clone())
        }
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// A source with nothing set.
impl ConfigSource for () {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}
