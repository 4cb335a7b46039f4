//! In-memory element store
//!
//! A minimal [`ElementSource`] for hosts without a real document: the
//! terminal host and the test suite. Elements live in insertion order and
//! behave like their markup counterparts, including the attribute lookup
//! that refresh passes depend on.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::element_source::{DATETIME_ATTR, Element, ElementSource};
use crate::markup::Fragment;

/// One stored element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    tag: String,
    class_name: Option<String>,
    attributes: Vec<(String, String)>,
    text: String,
}

impl PageElement {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<Fragment> for PageElement {
    fn from(fragment: Fragment) -> Self {
        let mut attributes = Vec::new();
        if let Some(datetime) = fragment.datetime {
            attributes.push((DATETIME_ATTR.to_string(), datetime));
        }
        attributes.push(("title".to_string(), fragment.title));
        PageElement {
            tag: fragment.tag,
            class_name: fragment.class_name,
            attributes,
            text: fragment.text,
        }
    }
}

impl Element for PageElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.clone())
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

/// An ordered collection of elements.
#[derive(Debug, Default)]
pub struct InMemoryPage {
    elements: Vec<PageElement>,
}

impl InMemoryPage {
    pub fn new() -> Self {
        InMemoryPage::default()
    }

    /// Append a rendered fragment as an element.
    pub fn insert(&mut self, fragment: Fragment) {
        self.elements.push(fragment.into());
    }

    pub fn elements(&self) -> &[PageElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl ElementSource for InMemoryPage {
    fn for_each_matching(
        &mut self,
        tag: &str,
        class_name: &str,
        visit: &mut dyn FnMut(&mut dyn Element),
    ) {
        for element in &mut self.elements {
            if element.tag == tag && element.class_name.as_deref() == Some(class_name) {
                visit(element);
            }
        }
    }
}

/// Cloneable handle to a shared [`InMemoryPage`].
///
/// One handle goes into the engine as its element source while the host
/// keeps another to insert fragments and inspect what refresh passes did.
#[derive(Debug, Clone, Default)]
pub struct SharedPage {
    inner: Arc<Mutex<InMemoryPage>>,
}

impl SharedPage {
    pub fn new() -> Self {
        SharedPage::default()
    }

    /// Append a rendered fragment as an element.
    pub fn insert(&self, fragment: Fragment) {
        self.lock().insert(fragment);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Snapshot of the current elements.
    pub fn snapshot(&self) -> Vec<PageElement> {
        self.lock().elements().to_vec()
    }

    /// Snapshot of just the displayed texts, in document order.
    pub fn texts(&self) -> Vec<String> {
        self.lock()
            .elements()
            .iter()
            .map(|element| element.text().to_string())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryPage> {
        // A panic while holding the lock leaves the page usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ElementSource for SharedPage {
    fn for_each_matching(
        &mut self,
        tag: &str,
        class_name: &str,
        visit: &mut dyn FnMut(&mut dyn Element),
    ) {
        self.lock().for_each_matching(tag, class_name, visit);
    }
}
