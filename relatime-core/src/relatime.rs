//! The relatime engine
//!
//! [`Relatime`] ties the pieces together: configuration, phrase rendering,
//! fragment building, and the auto-update loop. It is host-agnostic. The
//! clock, the document and the timers all arrive as injected capabilities,
//! and the engine itself never blocks, spawns or sleeps.
//!
//! ```ignore
//! let mut engine = Relatime::new();
//! engine.set_element_source(Box::new(page.clone()));
//! engine.set_scheduler(Box::new(scheduler));
//!
//! let markup = engine.html(instant);   // live fragment, auto-update armed
//! // ... on every timer tick the host calls:
//! engine.refresh();
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::{Config, Options};
use crate::element_source::{DATETIME_ATTR, ElementSource};
use crate::formatter;
use crate::locale::Locale;
use crate::markup::{self, Fragment};
use crate::moment;
use crate::scheduler::{Scheduler, TimerId};
use crate::time_source::{SystemTimeSource, TimeSource};

/// Delay before the deferred refresh pass that follows a locale switch.
const LOCALE_REFRESH_DELAY: Duration = Duration::from_millis(9);

/// Intervals at or below this floor skip the immediate refresh pass in
/// [`Relatime::start`].
const IMMEDIATE_PASS_FLOOR: Duration = Duration::from_millis(500);

/// Relative date display and auto-update engine.
pub struct Relatime {
    config: Config,
    time_source: Box<dyn TimeSource>,
    // RUST CONCEPT: Optional host capabilities as Option<Box<dyn Trait>> slots
    // A capability that was never injected disables the behavior that needs
    // it instead of failing
    element_source: Option<Box<dyn ElementSource>>,
    scheduler: Option<Box<dyn Scheduler>>,
    timer: Option<TimerId>,
}

impl Relatime {
    /// Engine with default configuration, locale seeded from the host
    /// environment's language.
    pub fn new() -> Self {
        Self::with_config(Config::from_env())
    }

    /// Engine with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Relatime {
            config,
            time_source: Box::new(SystemTimeSource::new()),
            element_source: None,
            scheduler: None,
            timer: None,
        }
    }

    /// Engine with an explicit configuration and clock.
    pub fn with_time_source(config: Config, time_source: Box<dyn TimeSource>) -> Self {
        let mut engine = Self::with_config(config);
        engine.time_source = time_source;
        engine
    }

    /// Replace the clock. The default reads the system clock.
    pub fn set_time_source(&mut self, time_source: Box<dyn TimeSource>) {
        self.time_source = time_source;
    }

    /// Inject the document to refresh. Without one, refresh passes are
    /// no-ops.
    pub fn set_element_source(&mut self, element_source: Box<dyn ElementSource>) {
        self.element_source = Some(element_source);
    }

    /// Inject the timer capability. Without one, auto-update stays off.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        self.scheduler = Some(scheduler);
    }

    /// Whether a document has been injected.
    pub fn has_element_source(&self) -> bool {
        self.element_source.is_some()
    }

    /// Whether a timer capability has been injected.
    pub fn has_scheduler(&self) -> bool {
        self.scheduler.is_some()
    }

    /// The current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply a partial configuration update.
    ///
    /// A new interval takes effect immediately when auto-update is running,
    /// by restarting the loop. A zero interval is ignored.
    pub fn setup(&mut self, options: Options) -> &mut Self {
        if let Some(tag) = options.tag {
            self.config.tag = tag;
        }
        if let Some(class_name) = options.class_name {
            self.config.class_name = class_name;
        }
        if let Some(code) = options.locale {
            self.set_locale(&code);
        }
        if let Some(secs) = options.refresh_secs {
            if secs > 0 {
                self.config.refresh = Duration::from_secs(secs);
                if self.started() {
                    self.start();
                }
            }
        }
        if let Some(autostart) = options.autostart {
            self.config.autostart = autostart;
        }
        self
    }

    /// The active display language.
    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    /// Switch the display language by code, returning whatever language is
    /// active afterwards. Unknown codes leave it unchanged.
    ///
    /// An actual switch schedules a one-shot refresh shortly afterwards so
    /// that already-displayed phrases catch up. That one-shot belongs to
    /// the switch, not to the auto-update loop, and [`stop`](Self::stop)
    /// does not cancel it.
    pub fn set_locale(&mut self, code: &str) -> Locale {
        if let Some(locale) = Locale::parse(code) {
            if locale != self.config.locale {
                self.config.locale = locale;
                debug!("locale switched to {}", locale);
                if let Some(scheduler) = self.scheduler.as_mut() {
                    scheduler.install_once(LOCALE_REFRESH_DELAY);
                }
            }
        }
        self.config.locale
    }

    /// Whole seconds elapsed from `instant` to now, floored. Negative for
    /// future instants.
    pub fn elapsed_seconds(&self, instant: DateTime<Utc>) -> i64 {
        formatter::elapsed_between(self.time_source.now(), instant)
    }

    /// The relative phrase for an instant, e.g. `10 min`.
    pub fn text(&self, instant: DateTime<Utc>) -> String {
        self.text_with_elapsed(instant, self.elapsed_seconds(instant))
    }

    /// The relative phrase for an instant with a precomputed elapsed value.
    pub fn text_with_elapsed(&self, instant: DateTime<Utc>, elapsed: i64) -> String {
        formatter::phrase(
            self.config.locale,
            instant,
            elapsed,
            self.time_source.local_offset(),
        )
    }

    /// Render an instant as a markup fragment.
    ///
    /// Instants more than thirty days old come out static. A live fragment
    /// arms auto-update when `autostart` is set and the loop is not already
    /// running.
    pub fn fragment(&mut self, instant: DateTime<Utc>) -> Fragment {
        let elapsed = self.elapsed_seconds(instant);
        let fragment = markup::build(
            &self.config,
            instant,
            elapsed,
            self.time_source.local_offset(),
        );
        if fragment.is_live() && self.config.autostart && !self.started() {
            self.start();
        }
        fragment
    }

    /// Render an instant as an HTML-shaped string. See
    /// [`fragment`](Self::fragment).
    pub fn html(&mut self, instant: DateTime<Utc>) -> String {
        self.fragment(instant).to_string()
    }

    /// Start the auto-update loop, restarting it if already running.
    ///
    /// Unless the configured interval is pathologically short, a refresh
    /// pass runs right away rather than waiting out the first tick.
    /// Without a scheduler this is a no-op.
    pub fn start(&mut self) -> &mut Self {
        self.stop();
        if self.scheduler.is_none() {
            debug!("start requested without a scheduler; auto-update stays off");
            return self;
        }
        if self.config.refresh > IMMEDIATE_PASS_FLOOR {
            self.refresh();
        }
        let every = self.config.refresh;
        if let Some(scheduler) = self.scheduler.as_mut() {
            let id = scheduler.install(every);
            debug!("auto-update started, every {:?} as timer {}", every, id);
            self.timer = Some(id);
        }
        self
    }

    /// Apply a partial configuration update, then start.
    pub fn start_with(&mut self, options: Options) -> &mut Self {
        self.setup(options);
        self.start()
    }

    /// Stop the auto-update loop. Does nothing when it is not running.
    pub fn stop(&mut self) -> &mut Self {
        if let Some(id) = self.timer.take() {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel(id);
            }
            debug!("auto-update stopped, timer {} cancelled", id);
        }
        self
    }

    /// Whether the auto-update loop is running.
    pub fn started(&self) -> bool {
        self.timer.is_some()
    }

    /// Run one refresh pass over the element source, rewriting the text of
    /// every matching element from its `datetime` attribute. Returns the
    /// number of elements updated.
    ///
    /// Elements without the attribute, or with one that does not parse,
    /// keep their text. The host calls this on every scheduler tick; it is
    /// also safe to call directly at any point.
    pub fn refresh(&mut self) -> usize {
        if self.element_source.is_none() {
            return 0;
        }

        let locale = self.config.locale;
        let tag = self.config.tag.clone();
        let class_name = self.config.class_name.clone();
        let now = self.time_source.now();
        let offset = self.time_source.local_offset();

        let mut updated = 0;
        let mut skipped = 0;
        if let Some(element_source) = self.element_source.as_mut() {
            element_source.for_each_matching(&tag, &class_name, &mut |element| {
                let Some(raw) = element.attribute(DATETIME_ATTR) else {
                    skipped += 1;
                    return;
                };
                let Some(instant) = moment::parse(&raw) else {
                    skipped += 1;
                    return;
                };
                let elapsed = formatter::elapsed_between(now, instant);
                element.set_text(&formatter::phrase(locale, instant, elapsed, offset));
                updated += 1;
            });
        }

        if skipped > 0 {
            debug!(
                "refresh pass skipped {} element(s) without a usable timestamp",
                skipped
            );
        }
        updated
    }
}

impl Default for Relatime {
    fn default() -> Self {
        Self::new()
    }
}
