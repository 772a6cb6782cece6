//! Settings sources for provider credentials
//!
//! Providers read credentials through [`SettingsSource`] on every sync call.
//! Environment variables take precedence over values from the config file.

use std::collections::BTreeMap;
use std::sync::Arc;

use timesync_core::SettingsSource;

const ENV_PREFIX: &str = "TIMESYNC_";

/// Settings read from process environment variables.
///
/// `clockify.api_key` is looked up as `TIMESYNC_CLOCKIFY_API_KEY`.
#[derive(Debug, Clone)]
pub struct EnvSettings {
    prefix: String,
}

impl EnvSettings {
    pub fn new() -> Self {
        Self { prefix: ENV_PREFIX.to_string() }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// Environment variable name for a dotted setting key.
    pub fn variable_name(&self, key: &str) -> String {
        let suffix: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for EnvSettings {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.variable_name(key)).ok()
    }
}

/// Settings fixed at construction, typically the `settings` table of the config file.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    values: BTreeMap<String, String>,
}

impl StaticSettings {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl SettingsSource for StaticSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Consults each source in order and returns the first non-blank value.
#[derive(Clone, Default)]
pub struct LayeredSettings {
    layers: Vec<Arc<dyn SettingsSource>>,
}

impl LayeredSettings {
    pub fn new(layers: Vec<Arc<dyn SettingsSource>>) -> Self {
        Self { layers }
    }

    /// Environment first, then the config file values.
    pub fn env_then(file: BTreeMap<String, String>) -> Self {
        Self::new(vec![Arc::new(EnvSettings::new()), Arc::new(StaticSettings::new(file))])
    }
}

impl std::fmt::Debug for LayeredSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredSettings").field("layers", &self.layers.len()).finish()
    }
}

impl SettingsSource for LayeredSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get_non_blank(key))
    }
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn env_names_are_prefixed_and_uppercased() {
        let env = EnvSettings::new();
        assert_eq!(env.variable_name("clockify.api_key"), "TIMESYNC_CLOCKIFY_API_KEY");
        assert_eq!(env.variable_name("clockify.workspace_id"), "TIMESYNC_CLOCKIFY_WORKSPACE_ID");
    }

    #[test]
    fn env_layer_wins_over_file_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        let env = EnvSettings::with_prefix("TIMESYNC_SETTINGS_TEST_");
        std::env::set_var("TIMESYNC_SETTINGS_TEST_CLOCKIFY_API_KEY", "from-env");

        let layered = LayeredSettings::new(vec![
            Arc::new(env),
            Arc::new(StaticSettings::from_iter([
                ("clockify.api_key", "from-file"),
                ("clockify.workspace_id", "ws-1"),
            ])),
        ]);

        assert_eq!(layered.get("clockify.api_key").as_deref(), Some("from-env"));
        assert_eq!(layered.get("clockify.workspace_id").as_deref(), Some("ws-1"));
        std::env::remove_var("TIMESYNC_SETTINGS_TEST_CLOCKIFY_API_KEY");
    }

    #[test]
    fn blank_values_fall_through_to_next_layer() {
        let layered = LayeredSettings::new(vec![
            Arc::new(StaticSettings::from_iter([("clockify.api_key", "   ")])),
            Arc::new(StaticSettings::from_iter([("clockify.api_key", "key")])),
        ]);

        assert_eq!(layered.get("clockify.api_key").as_deref(), Some("key"));
        assert_eq!(layered.get("missing"), None);
    }
}
