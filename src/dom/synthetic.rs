//! In-memory fixture trees.
//!
//! Lets the segmentation and normalization passes run against hand-built
//! trees without parsing markup:
//!
//! ```rust
//! use chatdom::dom::{El, FragmentView, SyntheticDocument};
//!
//! let doc = SyntheticDocument::new(
//!     El::new("div")
//!         .class("message-in")
//!         .child(El::new("span").text("Bob").child(El::img("🎉"))),
//! );
//! assert_eq!(doc.root().text(), "Bob");
//! ```

use super::{Child, FragmentView};

/// Builder for one element of a synthetic tree.
#[derive(Debug, Clone)]
pub struct El {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<ElChild>,
}

#[derive(Debug, Clone)]
enum ElChild {
    Element(El),
    Text(String),
}

impl El {
    /// Starts an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An `<img>` carrying an `alt` text, the way emoji are rendered.
    pub fn img(alt: impl Into<String>) -> Self {
        Self::new("img").attr("alt", alt)
    }

    /// Appends a class token.
    #[must_use]
    pub fn class(mut self, class: impl AsRef<str>) -> Self {
        let class = class.as_ref();
        match self.attrs.iter_mut().find(|(k, _)| k == "class") {
            Some((_, value)) => {
                value.push(' ');
                value.push_str(class);
            }
            None => self.attrs.push(("class".to_string(), class.to_string())),
        }
        self
    }

    /// Sets an attribute, replacing a previous value.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Appends a text child.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(ElChild::Text(text.into()));
        self
    }

    /// Appends an element child.
    #[must_use]
    pub fn child(mut self, child: El) -> Self {
        self.children.push(ElChild::Element(child));
        self
    }
}

#[derive(Debug)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<SynChild>,
    parent: Option<usize>,
}

#[derive(Debug)]
enum SynChild {
    Element(usize),
    Text(String),
}

/// A frozen synthetic tree.
#[derive(Debug)]
pub struct SyntheticDocument {
    nodes: Vec<NodeData>,
}

impl SyntheticDocument {
    /// Freezes a builder tree into a document.
    pub fn new(root: El) -> Self {
        let mut doc = Self { nodes: Vec::new() };
        doc.insert(root, None);
        doc
    }

    fn insert(&mut self, el: El, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            tag: el.tag,
            attrs: el.attrs,
            children: Vec::new(),
            parent,
        });

        for child in el.children {
            let entry = match child {
                ElChild::Text(text) => SynChild::Text(text),
                ElChild::Element(child) => SynChild::Element(self.insert(child, Some(index))),
            };
            self.nodes[index].children.push(entry);
        }

        index
    }

    /// The root element.
    pub fn root(&self) -> SyntheticFragment<'_> {
        SyntheticFragment { doc: self, index: 0 }
    }
}

/// One element of a [`SyntheticDocument`].
#[derive(Debug, Clone, Copy)]
pub struct SyntheticFragment<'d> {
    doc: &'d SyntheticDocument,
    index: usize,
}

impl SyntheticFragment<'_> {
    fn data(&self) -> &NodeData {
        &self.doc.nodes[self.index]
    }

    fn element_siblings(&self) -> (Vec<Self>, Vec<Self>) {
        let Some(parent) = self.data().parent else {
            return (Vec::new(), Vec::new());
        };
        let siblings: Vec<usize> = self.doc.nodes[parent]
            .children
            .iter()
            .filter_map(|c| match c {
                SynChild::Element(i) => Some(*i),
                SynChild::Text(_) => None,
            })
            .collect();
        let pos = siblings.iter().position(|&i| i == self.index).unwrap_or(0);
        let wrap = |i: &usize| SyntheticFragment {
            doc: self.doc,
            index: *i,
        };
        let before = siblings[..pos].iter().rev().map(wrap).collect();
        let after = siblings[pos + 1..].iter().map(wrap).collect();
        (before, after)
    }
}

impl FragmentView for SyntheticFragment<'_> {
    fn tag(&self) -> &str {
        &self.doc.nodes[self.index].tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.doc.nodes[self.index]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn classes(&self) -> Vec<&str> {
        self.attribute("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    fn children(&self) -> Vec<Child<Self>> {
        self.data()
            .children
            .iter()
            .map(|c| match c {
                SynChild::Element(i) => Child::Element(SyntheticFragment {
                    doc: self.doc,
                    index: *i,
                }),
                SynChild::Text(t) => Child::Text(t.clone()),
            })
            .collect()
    }

    fn previous_siblings(&self) -> Vec<Self> {
        self.element_siblings().0
    }

    fn next_siblings(&self) -> Vec<Self> {
        self.element_siblings().1
    }
}
