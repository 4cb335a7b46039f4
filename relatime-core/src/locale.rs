//! Locale table for relative date phrases
//!
//! Each locale carries the word for "just now" and twelve month templates
//! used for calendar-style output. The minute and hour templates are shared
//! across all locales because the unit abbreviations happen to coincide.

use std::fmt;

/// Template for the minutes bucket, shared by every locale.
pub const MINUTES_TEMPLATE: &str = "%d min";

/// Template for the hours bucket, shared by every locale.
pub const HOURS_TEMPLATE: &str = "%d h";

/// Environment variables consulted for the host language, in precedence order.
const LANG_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Phrase table for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleEntry {
    /// Phrase displayed while the instant is less than a minute old.
    pub now: &'static str,
    /// One template per month, January first. `%d` is replaced with the
    /// day of the month.
    pub months: [&'static str; 12],
}

const EN: LocaleEntry = LocaleEntry {
    now: "now",
    months: [
        "Jan. %d", "Feb. %d", "Mar. %d", "Apr. %d", "May %d", "June %d",
        "July. %d", "Aug. %d", "Sept. %d", "Oct. %d", "Nov. %d", "Dec. %d",
    ],
};

const FR: LocaleEntry = LocaleEntry {
    now: "maintenant",
    months: [
        "%d janv.", "%d févr.", "%d mars", "%d avr.", "%d mai", "%d juin",
        "%d juil.", "%d août", "%d sept.", "%d oct.", "%d nov.", "%d déc.",
    ],
};

const DE: LocaleEntry = LocaleEntry {
    now: "jetzt",
    months: [
        "%d. Jan.", "%d. Feb.", "%d. März", "%d. Apr.", "%d. Mai", "%d. Juni",
        "%d. Juli", "%d. Aug.", "%d. Sep.", "%d. Okt.", "%d. Nov.", "%d. Dez.",
    ],
};

// RUST CONCEPT: A closed set of locales as an enum instead of string keys
// Unknown codes are rejected at the parsing boundary, so the rest of the
// crate never has to handle a missing table
/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
    De,
}

impl Locale {
    /// Every supported locale, in display order.
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Fr, Locale::De];

    /// Look up a locale by its two-letter code. Returns `None` for codes
    /// with no table.
    pub fn parse(code: &str) -> Option<Locale> {
        match code {
            "en" => Some(Locale::En),
            "fr" => Some(Locale::Fr),
            "de" => Some(Locale::De),
            _ => None,
        }
    }

    /// Look up a locale from a full language tag such as `fr_FR.UTF-8` or
    /// `de-DE`. Only the primary subtag is considered.
    pub fn from_lang_tag(tag: &str) -> Option<Locale> {
        let primary = tag.split(['_', '-', '.', '@']).next().unwrap_or(tag);
        Locale::parse(&primary.to_ascii_lowercase())
    }

    /// Detect the locale from `LC_ALL`, `LC_MESSAGES` or `LANG`. Returns
    /// `None` when none of them name a supported language.
    pub fn from_env() -> Option<Locale> {
        LANG_VARS.iter().find_map(|var| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.is_empty())
                .and_then(|value| Locale::from_lang_tag(&value))
        })
    }

    /// The two-letter code for this locale.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::De => "de",
        }
    }

    /// The phrase table for this locale.
    pub fn entry(&self) -> &'static LocaleEntry {
        match self {
            Locale::En => &EN,
            Locale::Fr => &FR,
            Locale::De => &DE,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
