//! Item extraction — turns repeating listing containers into product records.
//!
//! Each container is processed independently and each of its three fields is
//! extracted independently: a missing sub-element degrades that one field to
//! empty and never disturbs the other fields, the record, or the rest of the
//! page. Field lookups return options, not errors; nothing here escalates.

use crate::browser::Session;
use crate::config::{Locators, ScrapeConfig};
use crate::error::Result;
use crate::markup;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// One extracted product. All fields are trimmed text; empty means the
/// corresponding markup was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    /// Non-empty attribute entries joined with `", "` in document order.
    pub attributes: String,
    pub price: String,
}

impl ProductRecord {
    /// Retention rule: keep a record iff it has a name or attributes.
    /// A price alone identifies nothing worth keeping.
    pub fn is_retained(&self) -> bool {
        !self.name.is_empty() || !self.attributes.is_empty()
    }
}

/// Wait for the item containers and extract a record from each.
///
/// No containers within the deadline is a normal empty result. Output order
/// equals the containers' document order.
pub async fn extract_all(
    session: &dyn Session,
    config: &ScrapeConfig,
) -> Result<Vec<ProductRecord>> {
    let fragments = session
        .wait_for_elements(
            &config.locators.container,
            Duration::from_millis(config.container_timeout_ms),
        )
        .await?;

    if fragments.is_empty() {
        info!(container = %config.locators.container, "no item containers found");
        return Ok(Vec::new());
    }
    debug!(count = fragments.len(), "extracting item containers");

    let records: Vec<ProductRecord> = fragments
        .iter()
        .map(|fragment| extract_record(fragment, &config.locators))
        .filter(ProductRecord::is_retained)
        .collect();

    info!(kept = records.len(), seen = fragments.len(), "extraction pass complete");
    Ok(records)
}

/// Extract one record from a container's outer HTML. Infallible: every
/// missing piece of markup becomes an empty field.
fn extract_record(fragment: &str, locators: &Locators) -> ProductRecord {
    let doc = Html::parse_fragment(fragment);
    let container = doc.root_element();
    ProductRecord {
        name: extract_name(container, locators),
        attributes: extract_attributes(container, locators),
        price: extract_price(container, locators),
    }
}

/// Name lives in heading → link → text-bearing span. The first non-empty
/// span text under any link inside the heading wins; a broken chain at any
/// link yields empty.
fn extract_name(container: ElementRef<'_>, locators: &Locators) -> String {
    let Some(heading) = markup::find_within(container, &locators.name_heading) else {
        return String::new();
    };
    heading
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .flat_map(|link| link.descendants().skip(1).filter_map(ElementRef::wrap))
        .filter(|el| el.value().name() == "span")
        .map(markup::trimmed_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Direct list items of the attribute list, trimmed, empties dropped,
/// joined with `", "`.
fn extract_attributes(container: ElementRef<'_>, locators: &Locators) -> String {
    let Some(list) = markup::find_within(container, &locators.attribute_list) else {
        return String::new();
    };
    markup::direct_children(list, "li")
        .into_iter()
        .map(markup::trimmed_text)
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tax-inclusive price span nested inside the price box; either element
/// missing yields empty.
fn extract_price(container: ElementRef<'_>, locators: &Locators) -> String {
    markup::find_within(container, &locators.price_box)
        .and_then(|price_box| markup::find_within(price_box, &locators.price_amount))
        .map(markup::trimmed_text)
        .unwrap_or_default()
}
