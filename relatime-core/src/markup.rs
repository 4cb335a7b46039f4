//! Markup fragment construction
//!
//! [`Fragment`] is the structured result of rendering one instant. Hosts
//! that build real documents read its fields; everyone else can `Display`
//! it as an HTML-shaped string. Whether a fragment comes out live or static
//! is decided here, from the instant's age.

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

use crate::config::Config;
use crate::formatter;

/// Elapsed seconds beyond which a fragment is rendered static (30 days).
/// Static fragments carry no class and no timestamp, so refresh passes
/// never pick them up again.
pub const STATIC_AFTER_SECS: i64 = 2_592_000;

/// Tooltip timestamp format, rendered at the reader's local offset.
const TITLE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One rendered element.
///
/// Live fragments carry the marker class and a machine-readable `datetime`
/// attribute; static fragments carry neither. Both carry a human-readable
/// `title` tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Element tag, from the configuration.
    pub tag: String,
    /// Marker class. `None` on static fragments.
    pub class_name: Option<String>,
    /// RFC 3339 timestamp of the instant. `None` on static fragments.
    pub datetime: Option<String>,
    /// Full local timestamp for the tooltip.
    pub title: String,
    /// The displayed phrase.
    pub text: String,
}

impl Fragment {
    /// Whether refresh passes will keep updating this fragment.
    pub fn is_live(&self) -> bool {
        self.class_name.is_some()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if let Some(class_name) = &self.class_name {
            write!(f, " class=\"{}\"", class_name)?;
        }
        if let Some(datetime) = &self.datetime {
            write!(f, " datetime=\"{}\"", datetime)?;
        }
        write!(f, " title=\"{}\">{}</{}>", self.title, self.text, self.tag)
    }
}

/// Build the fragment for an instant given its elapsed seconds.
pub(crate) fn build(
    config: &Config,
    instant: DateTime<Utc>,
    elapsed: i64,
    offset: FixedOffset,
) -> Fragment {
    let local = instant.with_timezone(&offset);
    let title = local.format(TITLE_FORMAT).to_string();
    let text = formatter::phrase(config.locale, instant, elapsed, offset);

    if elapsed > STATIC_AFTER_SECS {
        Fragment {
            tag: config.tag.clone(),
            class_name: None,
            datetime: None,
            title,
            text,
        }
    } else {
        Fragment {
            tag: config.tag.clone(),
            class_name: Some(config.class_name.clone()),
            datetime: Some(instant.to_rfc3339_opts(SecondsFormat::Millis, true)),
            title,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::DAY;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 11, 14, 13, 24, 43).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_live_fragment_fields() {
        let fragment = build(&Config::default(), instant(), 600, utc());
        assert!(fragment.is_live());
        assert_eq!(fragment.tag, "time");
        assert_eq!(fragment.class_name.as_deref(), Some("relatime"));
        assert_eq!(fragment.datetime.as_deref(), Some("2013-11-14T13:24:43.000Z"));
        assert_eq!(fragment.title, "2013-11-14 13:24:43");
        assert_eq!(fragment.text, "10 min");
    }

    #[test]
    fn test_live_fragment_display() {
        let fragment = build(&Config::default(), instant(), 600, utc());
        assert_eq!(
            fragment.to_string(),
            "<time class=\"relatime\" datetime=\"2013-11-14T13:24:43.000Z\" \
             title=\"2013-11-14 13:24:43\">10 min</time>"
        );
    }

    #[test]
    fn test_static_fragment_display() {
        let fragment = build(&Config::default(), instant(), 40 * DAY, utc());
        assert!(!fragment.is_live());
        assert_eq!(
            fragment.to_string(),
            "<time title=\"2013-11-14 13:24:43\">Nov. 14</time>"
        );
    }

    #[test]
    fn test_static_threshold_is_exclusive() {
        // Exactly 30 days old is still live; one second past goes static.
        let at = build(&Config::default(), instant(), STATIC_AFTER_SECS, utc());
        assert!(at.is_live());
        let past = build(&Config::default(), instant(), STATIC_AFTER_SECS + 1, utc());
        assert!(!past.is_live());
    }

    #[test]
    fn test_future_instants_render_live() {
        let fragment = build(&Config::default(), instant(), -3600, utc());
        assert!(fragment.is_live());
        assert_eq!(fragment.text, "Nov. 14 2013");
    }

    #[test]
    fn test_custom_tag_and_class() {
        let config = Config {
            tag: "span".to_string(),
            class_name: "ago".to_string(),
            ..Config::default()
        };
        let fragment = build(&config, instant(), 30, utc());
        assert_eq!(
            fragment.to_string(),
            "<span class=\"ago\" datetime=\"2013-11-14T13:24:43.000Z\" \
             title=\"2013-11-14 13:24:43\">now</span>"
        );
    }

    #[test]
    fn test_title_uses_the_local_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let fragment = build(&Config::default(), instant(), 600, plus_two);
        assert_eq!(fragment.title, "2013-11-14 15:24:43");
        // The datetime attribute stays in UTC regardless.
        assert_eq!(fragment.datetime.as_deref(), Some("2013-11-14T13:24:43.000Z"));
    }
}
