//! Locator and timeout configuration for a scrape run.
//!
//! The hardcoded locators below are the extraction contract. The CLI accepts
//! a repeatable `--selector` override which is validated and logged but not
//! wired into extraction; [`SelectorOverride`] is the explicit extension hook
//! for that, should a caller-supplied locator set ever be needed.

use crate::markup::ElementQuery;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element queries for the item container and each record field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locators {
    /// One repeating listing entry.
    pub container: ElementQuery,
    /// Heading inside a container that holds the product name link.
    pub name_heading: ElementQuery,
    /// List of short attribute entries (RAM, storage, ...).
    pub attribute_list: ElementQuery,
    /// Wrapper around the price markup.
    pub price_box: ElementQuery,
    /// The tax-inclusive price span inside the price box.
    pub price_amount: ElementQuery,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            container: ElementQuery::new("li", &["item", "last"]),
            name_heading: ElementQuery::new("h3", &["product-name"]),
            attribute_list: ElementQuery::new("ul", &["product-attribute-list"]),
            price_box: ElementQuery::new("div", &["price-box"]),
            price_amount: ElementQuery::new("span", &["price-including-tax"]),
        }
    }
}

/// Timeouts and locators for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Deadline for the initial page load.
    pub navigation_timeout_ms: u64,
    /// Overall wait for at least one item container to appear.
    pub container_timeout_ms: u64,
    /// Per-candidate wait during consent dismissal. Short on purpose: most
    /// candidates will not match and must not stall the pipeline.
    pub consent_timeout_ms: u64,
    pub locators: Locators,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 30_000,
            container_timeout_ms: 8_000,
            consent_timeout_ms: 3_000,
            locators: Locators::default(),
        }
    }
}

/// A caller-supplied selector from the CLI, `css:` or `xpath:` prefixed.
///
/// Accepted and validated but intentionally not consumed by extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorOverride {
    pub kind: SelectorKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorKind {
    Css,
    XPath,
}

impl SelectorOverride {
    /// Parse a raw `--selector` argument. Returns `None` when the prefix is
    /// missing or the remainder is empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let (kind, value) = if let Some(rest) = raw.strip_prefix("css:") {
            (SelectorKind::Css, rest)
        } else if let Some(rest) = raw.strip_prefix("xpath:") {
            (SelectorKind::XPath, rest)
        } else {
            return None;
        };
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for SelectorOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            SelectorKind::Css => "css",
            SelectorKind::XPath => "xpath",
        };
        write!(f, "{prefix}:{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_locators_cover_all_fields() {
        let loc = Locators::default();
        assert_eq!(loc.container.to_string(), "li.item.last");
        assert_eq!(loc.name_heading.to_string(), "h3.product-name");
        assert_eq!(loc.price_amount.to_string(), "span.price-including-tax");
    }

    #[test]
    fn selector_override_parses_prefixes() {
        let css = SelectorOverride::parse("css:h1.title").unwrap();
        assert_eq!(css.kind, SelectorKind::Css);
        assert_eq!(css.value, "h1.title");

        let xpath = SelectorOverride::parse("xpath://h1").unwrap();
        assert_eq!(xpath.kind, SelectorKind::XPath);
    }

    #[test]
    fn selector_override_rejects_unprefixed_or_empty() {
        assert!(SelectorOverride::parse("h1").is_none());
        assert!(SelectorOverride::parse("css:").is_none());
        assert!(SelectorOverride::parse("css:   ").is_none());
    }
}
