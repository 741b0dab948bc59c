//! Rule-detail extraction from raw rule-page HTML.
//!
//! Pure functions over the `scraper` DOM; no network access. Label/value pairs
//! come from two page shapes:
//!
//! - Drupal field blocks: `.field` holding a `.field__label` and one or more
//!   `.field__item` elements (multi-valued fields are joined with `"; "`)
//! - Definition lists: each `<dt>` paired with the `<dd>` elements that follow
//!   it up to the next `<dt>` (joined with `"; "`)
//!
//! The first occurrence of a key wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use fedrules_core::{RuleDetailRecord, field_key, rule_id_from_url};
use scraper::{ElementRef, Html, Selector};

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static FIELD: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".field").unwrap());
static FIELD_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".field__label").unwrap());
static FIELD_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".field__item").unwrap());
static DL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dl").unwrap());

const MULTI_VALUE_SEP: &str = "; ";

/// Build a [`RuleDetailRecord`] from a fetched rule page.
pub fn extract_rule(url: &str, html: &str, scraped_at: &str) -> RuleDetailRecord {
    let document = Html::parse_document(html);

    let title = first_text(&document, &H1).or_else(|| first_text(&document, &TITLE));

    let mut fields = BTreeMap::new();
    for (label, value) in field_blocks(&document).chain(definition_pairs(&document)) {
        let key = field_key(&label);
        if key.is_empty() || value.is_empty() {
            continue;
        }
        fields.entry(key).or_insert(value);
    }

    RuleDetailRecord {
        url: url.to_string(),
        rule_id: rule_id_from_url(url),
        title,
        fields,
        scraped_at: scraped_at.to_string(),
    }
}

fn field_blocks(document: &Html) -> impl Iterator<Item = (String, String)> + '_ {
    document.select(&FIELD).filter_map(|field| {
        let label = field.select(&FIELD_LABEL).next().map(text_of)?;
        let values: Vec<String> = field
            .select(&FIELD_ITEM)
            .map(text_of)
            .filter(|v| !v.is_empty())
            .collect();
        Some((label, values.join(MULTI_VALUE_SEP)))
    })
}

fn definition_pairs(document: &Html) -> impl Iterator<Item = (String, String)> + '_ {
    document.select(&DL).flat_map(|dl| {
        let mut pairs = Vec::new();
        // Current <dt> label and the <dd> values collected under it.
        let mut current: Option<(String, Vec<String>)> = None;
        for child in dl.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "dt" => {
                    pairs.extend(current.take().and_then(join_values));
                    current = Some((text_of(child), Vec::new()));
                }
                "dd" => {
                    if let Some((_, values)) = current.as_mut() {
                        let value = text_of(child);
                        if !value.is_empty() {
                            values.push(value);
                        }
                    }
                }
                _ => {}
            }
        }
        pairs.extend(current.and_then(join_values));
        pairs
    })
}

/// A `<dt>` with no non-empty `<dd>` yields nothing.
fn join_values((label, values): (String, Vec<String>)) -> Option<(String, String)> {
    (!values.is_empty()).then(|| (label, values.join(MULTI_VALUE_SEP)))
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(text_of)
        .find(|text| !text.is_empty())
}

/// Element text with whitespace runs collapsed to single spaces.
fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
