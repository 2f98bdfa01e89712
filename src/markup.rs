//! Token-set element matching and text helpers over rendered HTML.
//!
//! Selectors here match an element's class attribute by *token membership*:
//! the attribute is split on whitespace and every required token must be a
//! member of the resulting set. Substring containment is deliberately not
//! used — a class of `"itemised"` must never satisfy a query for `item`.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A tag name plus the class tokens an element must carry to match.
///
/// An empty token list matches any element with the given tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementQuery {
    pub tag: String,
    pub classes: Vec<String>,
}

impl ElementQuery {
    pub fn new(tag: &str, classes: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Token-set membership test against the element's class attribute.
    pub fn matches(&self, el: ElementRef<'_>) -> bool {
        let element = el.value();
        if element.name() != self.tag {
            return false;
        }
        let tokens: HashSet<&str> = element.classes().collect();
        self.classes
            .iter()
            .all(|required| tokens.contains(required.as_str()))
    }
}

impl fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

/// All elements in the document matching `query`, in document order.
pub fn find_all<'a>(doc: &'a Html, query: &ElementQuery) -> Vec<ElementRef<'a>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| query.matches(*el))
        .collect()
}

/// First element matching `query` strictly inside `scope`, if any.
pub fn find_within<'a>(scope: ElementRef<'a>, query: &ElementQuery) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .skip(1) // descendants() yields the scope node itself first
        .filter_map(ElementRef::wrap)
        .find(|el| query.matches(*el))
}

/// Direct element children of `scope` with the given tag, in document order.
pub fn direct_children<'a>(scope: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    scope
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag)
        .collect()
}

/// Concatenated text content of an element, whitespace-trimmed.
pub fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Parse a full page snapshot and return the outer HTML of every element
/// matching `query`, in document order. Used by session implementations to
/// hand extraction self-contained container fragments.
pub fn matching_fragments(html: &str, query: &ElementQuery) -> Vec<String> {
    let doc = Html::parse_document(html);
    find_all(&doc, query)
        .into_iter()
        .map(|el| el.html())
        .collect()
}
