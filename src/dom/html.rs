//! [`FragmentView`] over a document parsed with `scraper`.

use scraper::{ElementRef, Html, Node};

use super::{Child, FragmentView};

/// One element of a parsed page snapshot.
///
/// Cheap to copy; borrows the [`Html`] it came from.
///
/// # Example
///
/// ```rust
/// use chatdom::dom::{FragmentView, HtmlFragment, NodeMatcher};
/// use scraper::Html;
///
/// let html = Html::parse_document(r#"<div id="main"><span class="x">hi</span></div>"#);
/// let root = HtmlFragment::root(&html);
/// let span = root.find_child(&NodeMatcher::class("x")).unwrap();
/// assert_eq!(span.text(), "hi");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HtmlFragment<'a>(ElementRef<'a>);

impl<'a> HtmlFragment<'a> {
    /// Wraps a `scraper` element.
    pub fn new(element: ElementRef<'a>) -> Self {
        Self(element)
    }

    /// The `<html>` element of a parsed document.
    pub fn root(document: &'a Html) -> Self {
        Self(document.root_element())
    }

    /// The underlying `scraper` element.
    pub fn element(&self) -> ElementRef<'a> {
        self.0
    }

    /// Serialized markup of this element, for diagnostics.
    pub fn outer_html(&self) -> String {
        self.0.html()
    }
}

impl FragmentView for HtmlFragment<'_> {
    fn tag(&self) -> &str {
        self.0.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }

    fn classes(&self) -> Vec<&str> {
        self.0.value().classes().collect()
    }

    fn children(&self) -> Vec<Child<Self>> {
        self.0
            .children()
            .filter_map(|node| match node.value() {
                Node::Text(text) => Some(Child::Text(String::from(&**text))),
                Node::Element(_) => ElementRef::wrap(node).map(|el| Child::Element(Self(el))),
                _ => None,
            })
            .collect()
    }

    fn previous_siblings(&self) -> Vec<Self> {
        self.0
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .map(Self)
            .collect()
    }

    fn next_siblings(&self) -> Vec<Self> {
        self.0
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .map(Self)
            .collect()
    }
}
