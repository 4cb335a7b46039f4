//! # relatime-core
//!
//! Relative date display and auto-update. Instants render as short phrases
//! that age gracefully, from `now` through `10 min` and `3 h` up to
//! calendar forms like `Nov. 14` and `Nov. 14 2013`, in English, French or
//! German. Rendered markup fragments stay current: a periodic refresh pass
//! rewrites every live element from its `datetime` attribute.
//!
//! The crate is host-agnostic by construction. The [`Relatime`] engine
//! reaches the outside world only through injected capabilities:
//!
//! - [`TimeSource`] for the clock,
//! - [`ElementSource`] for the document being refreshed,
//! - [`Scheduler`] for timers, with the host calling [`Relatime::refresh`]
//!   on every tick.
//!
//! Hosts without a real document can use the bundled [`InMemoryPage`] and
//! [`SharedPage`], which is also how the test suite drives the engine.
//!
//! ```ignore
//! use relatime_core::{Relatime, SharedPage};
//!
//! let page = SharedPage::new();
//! let mut engine = Relatime::new();
//! engine.set_element_source(Box::new(page.clone()));
//!
//! let fragment = engine.fragment(some_instant);
//! println!("{}", fragment);
//! page.insert(fragment);
//!
//! // later, typically from a timer tick:
//! engine.refresh();
//! ```

pub mod config;
pub mod element_source;
pub mod formatter;
pub mod locale;
pub mod markup;
pub mod memory_page;
pub mod moment;
pub mod relatime;
pub mod scheduler;
pub mod time_source;

pub use config::{Config, DEFAULT_CLASS, DEFAULT_REFRESH, DEFAULT_TAG, Options};
pub use element_source::{DATETIME_ATTR, Element, ElementSource};
pub use locale::{Locale, LocaleEntry};
pub use markup::{Fragment, STATIC_AFTER_SECS};
pub use memory_page::{InMemoryPage, PageElement, SharedPage};
pub use relatime::Relatime;
pub use scheduler::{Scheduler, TimerId};
pub use time_source::{FixedTimeSource, SystemTimeSource, TimeSource};
