//! Engine configuration
//!
//! Defaults match the classic markup convention: `<time class="relatime">`
//! elements refreshed once a minute, with auto-update armed by the first
//! live fragment.

use std::time::Duration;

use crate::locale::Locale;

/// Default element tag scanned for and emitted in markup.
pub const DEFAULT_TAG: &str = "time";
/// Default class marking an element as live.
pub const DEFAULT_CLASS: &str = "relatime";
/// Default refresh interval.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Element tag scanned for and emitted in markup.
    pub tag: String,
    /// Class that marks an element as live.
    pub class_name: String,
    /// Display language.
    pub locale: Locale,
    /// Interval between refresh passes while auto-update runs.
    pub refresh: Duration,
    /// Whether producing a live fragment arms auto-update.
    pub autostart: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag: DEFAULT_TAG.to_string(),
            class_name: DEFAULT_CLASS.to_string(),
            locale: Locale::default(),
            refresh: DEFAULT_REFRESH,
            autostart: true,
        }
    }
}

impl Config {
    /// Defaults with the locale seeded from the host environment's
    /// language, falling back to English.
    pub fn from_env() -> Self {
        Config {
            locale: Locale::from_env().unwrap_or_default(),
            ..Config::default()
        }
    }
}

/// A partial configuration update. `None` fields leave the current value
/// untouched, so callers spell out only what they want to change:
///
/// ```ignore
/// engine.setup(Options {
///     locale: Some("fr".to_string()),
///     refresh_secs: Some(30),
///     ..Options::default()
/// });
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// New display language, by code. Unknown codes are ignored.
    pub locale: Option<String>,
    /// New element tag.
    pub tag: Option<String>,
    /// New live-marker class.
    pub class_name: Option<String>,
    /// New refresh interval in seconds. Zero is ignored.
    pub refresh_secs: Option<u64>,
    /// New autostart setting.
    pub autostart: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tag, "time");
        assert_eq!(config.class_name, "relatime");
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.refresh, Duration::from_secs(60));
        assert!(config.autostart);
    }

    #[test]
    fn test_options_default_changes_nothing() {
        let options = Options::default();
        assert!(options.locale.is_none());
        assert!(options.tag.is_none());
        assert!(options.class_name.is_none());
        assert!(options.refresh_secs.is_none());
        assert!(options.autostart.is_none());
    }
}
