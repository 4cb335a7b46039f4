//! Document abstraction for refresh passes
//!
//! The engine does not know what a document is. Hosts hand it an
//! [`ElementSource`] that can enumerate the elements matching a tag and
//! class, and each element exposes just enough surface to be re-rendered:
//! attribute reads and text replacement.

/// Attribute carrying the machine-readable timestamp on live elements.
pub const DATETIME_ATTR: &str = "datetime";

/// One displayable element.
pub trait Element {
    /// Read an attribute, if the element carries it.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Replace the element's displayed text.
    fn set_text(&mut self, text: &str);
}

/// A source of elements to refresh.
pub trait ElementSource {
    /// Visit every element with tag `tag` and class `class_name`, in
    /// document order.
    fn for_each_matching(
        &mut self,
        tag: &str,
        class_name: &str,
        visit: &mut dyn FnMut(&mut dyn Element),
    );
}
