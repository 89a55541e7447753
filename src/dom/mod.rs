//! Minimal read-only view over a rendered document tree.
//!
//! The engine never touches a concrete DOM type. Everything it needs is
//! expressed through [`FragmentView`], which has two implementations:
//!
//! - [`HtmlFragment`](html::HtmlFragment) - nodes of a page snapshot parsed
//!   with `scraper`
//! - [`SyntheticFragment`](synthetic::SyntheticFragment) - nodes of a small
//!   in-memory tree built with [`El`](synthetic::El), used for fixtures
//!
//! Structural markers are described with [`NodeMatcher`] rather than CSS
//! selector strings so that both implementations share one matching rule.

pub mod html;
pub mod synthetic;

use serde::{Deserialize, Serialize};

pub use html::HtmlFragment;
pub use synthetic::{El, SyntheticDocument, SyntheticFragment};

/// A direct child of a node: either an element or a run of text.
#[derive(Debug, Clone)]
pub enum Child<V> {
    /// Element child
    Element(V),
    /// Text child, verbatim
    Text(String),
}

/// Capability interface over one element of a document tree.
///
/// Implementors provide the primitive accessors; traversal and matching are
/// provided on top of them.
pub trait FragmentView: Clone {
    /// Lower-case tag name.
    fn tag(&self) -> &str;

    /// Value of an attribute, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Class tokens of the element, in attribute order.
    fn classes(&self) -> Vec<&str>;

    /// Direct children (elements and text) in document order.
    fn children(&self) -> Vec<Child<Self>>;

    /// Element siblings before this node, nearest first.
    fn previous_siblings(&self) -> Vec<Self>;

    /// Element siblings after this node, nearest first.
    fn next_siblings(&self) -> Vec<Self>;

    /// Returns `true` if the element carries the given class token.
    fn has_class(&self, class: &str) -> bool {
        self.classes().contains(&class)
    }

    /// Direct element children in document order.
    fn element_children(&self) -> Vec<Self> {
        self.children()
            .into_iter()
            .filter_map(|child| match child {
                Child::Element(el) => Some(el),
                Child::Text(_) => None,
            })
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    fn text(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            match child {
                Child::Text(text) => out.push_str(&text),
                Child::Element(el) => out.push_str(&el.text()),
            }
        }
        out
    }

    /// All descendant elements in pre-order, excluding `self`.
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        for child in self.element_children() {
            let nested = child.descendants();
            out.push(child);
            out.extend(nested);
        }
        out
    }

    /// First descendant (not `self`) matching `matcher`, in document order.
    fn find_child(&self, matcher: &NodeMatcher) -> Option<Self> {
        for child in self.element_children() {
            if matcher.matches(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_child(matcher) {
                return Some(found);
            }
        }
        None
    }

    /// Like [`find_child`](Self::find_child) but never descends into
    /// subtrees rooted at a node matching `excluded`.
    fn find_child_outside(&self, matcher: &NodeMatcher, excluded: &NodeMatcher) -> Option<Self> {
        for child in self.element_children() {
            if excluded.matches(&child) {
                continue;
            }
            if matcher.matches(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_child_outside(matcher, excluded) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants matching `matcher`, in document order.
    fn find_all(&self, matcher: &NodeMatcher) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|node| matcher.matches(node))
            .collect()
    }

    /// Returns `true` if `self` or any descendant matches.
    fn contains(&self, matcher: &NodeMatcher) -> bool {
        matcher.matches(self) || self.find_child(matcher).is_some()
    }
}

/// Declarative description of a node: tag, required classes and an optional
/// attribute test.
///
/// Every populated field must hold for a node to match; an empty matcher
/// matches every element.
///
/// # Example
///
/// ```rust
/// use chatdom::dom::NodeMatcher;
///
/// let metadata = NodeMatcher::tag("div")
///     .with_class("copyable-text")
///     .with_attr("data-pre-plain-text");
/// assert_eq!(metadata.classes, vec!["copyable-text".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeMatcher {
    /// Required tag name
    pub tag: Option<String>,
    /// Class tokens that must all be present
    pub classes: Vec<String>,
    /// Attribute that must be present
    pub attribute: Option<String>,
    /// Exact value the attribute must have
    pub equals: Option<String>,
    /// Substring the attribute value must contain
    pub contains: Option<String>,
}

impl NodeMatcher {
    /// Matches any element.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches elements with the given tag.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Matches elements carrying the given class token.
    pub fn class(class: impl Into<String>) -> Self {
        Self::any().with_class(class)
    }

    /// Matches elements carrying the given attribute.
    pub fn attr(name: impl Into<String>) -> Self {
        Self::any().with_attr(name)
    }

    /// Adds a required class token.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Requires an attribute to be present.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    /// Requires the attribute to equal `value`.
    #[must_use]
    pub fn equal_to(mut self, value: impl Into<String>) -> Self {
        self.equals = Some(value.into());
        self
    }

    /// Requires the attribute to contain `needle`.
    #[must_use]
    pub fn containing(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    /// Tests a single node (not its descendants).
    pub fn matches<V: FragmentView>(&self, node: &V) -> bool {
        if let Some(tag) = &self.tag {
            if !node.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let classes = node.classes();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }

        if let Some(name) = &self.attribute {
            let Some(value) = node.attribute(name) else {
                return false;
            };
            if let Some(expected) = &self.equals {
                if value != expected {
                    return false;
                }
            }
            if let Some(needle) = &self.contains {
                if !value.contains(needle.as_str()) {
                    return false;
                }
            }
        }

        true
    }
}
