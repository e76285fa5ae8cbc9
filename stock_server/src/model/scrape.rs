//! Tolerant extraction of quote fields from a Yahoo Finance quote page.
//!
//! The page markup is semi-structured and changes between variants, so every
//! field is resolved through an ordered chain of extraction sources (CSS
//! selector plus text-or-attribute), first hit wins. A field that fails its
//! whole chain degrades to a per-field default, never to a whole-record
//! failure:
//! - price/change family -> `0.0`,
//! - market cap/volume -> [`Metric::Unavailable`].
//!
//! The asymmetry is intentional: the display layer renders `$0.00` for a
//! zeroed price but a dash for an unavailable metric.

use log::debug;
use scraper::{Html, Selector};
use stock_common::quote::{Metric, Quote, QuoteStatus, timestamp_ms};

/// One way of locating a field in the document: a CSS selector and either
/// the element text or a named attribute.
struct FieldSource<'a> {
    selector: &'a str,
    attr: Option<&'a str>,
}

impl<'a> FieldSource<'a> {
    fn text(selector: &'a str) -> Self {
        FieldSource {
            selector,
            attr: None,
        }
    }

    fn attr(selector: &'a str, attr: &'a str) -> Self {
        FieldSource {
            selector,
            attr: Some(attr),
        }
    }
}

/// Walks the source chain and returns the first non-empty trimmed value.
///
/// Unparseable selectors are skipped like missing elements; extraction must
/// stay best-effort across markup variants.
fn select_first(doc: &Html, sources: &[FieldSource<'_>]) -> Option<String> {
    for source in sources {
        let Ok(selector) = Selector::parse(source.selector) else {
            debug!("Skipping invalid selector: {}", source.selector);
            continue;
        };
        let Some(element) = doc.select(&selector).next() else {
            continue;
        };
        let value = match source.attr {
            Some(attr) => element.value().attr(attr).map(str::to_owned),
            None => Some(element.text().collect::<String>()),
        };
        if let Some(value) = value {
            let value = value.trim().to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Parses a plain number, stripping thousands separators. Returns `None`
/// for anything that does not resolve to a finite number (including `N/A`).
fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parses a percent field like `(+3.21%)`, stripping parentheses and `%`.
fn parse_percent(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '(' | ')' | '%')).collect();
    parse_number(&cleaned)
}

/// Parses a number with an optional scale suffix: `T` -> 1e12, `B` -> 1e9,
/// `M` -> 1e6. Suffix-free values are parsed directly.
fn parse_scaled(raw: &str) -> Option<f64> {
    for (suffix, scale) in [('T', 1e12), ('B', 1e9), ('M', 1e6)] {
        if raw.contains(suffix) {
            return parse_number(&raw.replace(suffix, "")).map(|v| v * scale);
        }
    }
    parse_number(raw)
}

/// Turns an optional extracted string into a metric. Absent sources and
/// non-numeric values (like the literal `N/A`) both map to the sentinel.
fn parse_metric(raw: Option<String>, parse: fn(&str) -> Option<f64>) -> Metric {
    raw.and_then(|v| parse(&v))
        .map(Metric::Value)
        .unwrap_or(Metric::Unavailable)
}

/// Strips a trailing parenthetical annotation from a company name, e.g.
/// `"Apple Inc. (AAPL)"` -> `"Apple Inc."`.
fn strip_annotation(name: &str) -> String {
    name.split('(').next().unwrap_or(name).trim().to_string()
}

/// Extracts a normalized [`Quote`] from the fetched document.
///
/// Never fails visibly: every field degrades independently to its default.
/// Total absence of the document is the fetcher's concern, not this one.
pub fn extract_quote(symbol: &str, html: &str) -> Quote {
    let doc = Html::parse_document(html);

    let streamer_price = format!(r#"fin-streamer[data-symbol="{symbol}"][data-field="regularMarketPrice"]"#);
    let price_sources = [
        FieldSource::text(r#"span[data-testid="qsp-price"]"#),
        FieldSource::attr(r#"fin-streamer[data-field="regularMarketPrice"]"#, "value"),
        FieldSource::attr(&streamer_price, "value"),
    ];
    let change_sources = [
        FieldSource::text(r#"span[data-testid="qsp-price-change"]"#),
        FieldSource::attr(r#"fin-streamer[data-field="regularMarketChange"]"#, "value"),
    ];
    let change_percent_sources = [
        FieldSource::text(r#"span[data-testid="qsp-price-change-percent"]"#),
        FieldSource::attr(
            r#"fin-streamer[data-field="regularMarketChangePercent"]"#,
            "value",
        ),
    ];
    let name_sources = [
        FieldSource::text(r#"h1[data-testid="quote-header"]"#),
        // Legacy page variant.
        FieldSource::text(r"h1.D\(ib\)"),
    ];
    let market_cap_sources = [
        FieldSource::attr(r#"fin-streamer[data-field="marketCap"]"#, "data-value"),
        FieldSource::text(r#"td[data-test="MARKET_CAP-value"]"#),
    ];
    let volume_sources = [
        FieldSource::attr(r#"fin-streamer[data-field="regularMarketVolume"]"#, "data-value"),
        FieldSource::text("span.d60f3b00.f80689d3"),
        FieldSource::text(r#"td[data-test="TD_VOLUME-value"]"#),
    ];

    let company_name = select_first(&doc, &name_sources)
        .map(|name| strip_annotation(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| symbol.to_string());

    Quote {
        symbol: symbol.to_string(),
        company_name,
        price: select_first(&doc, &price_sources)
            .and_then(|v| parse_number(&v))
            .unwrap_or(0.0),
        change: select_first(&doc, &change_sources)
            .and_then(|v| parse_number(&v))
            .unwrap_or(0.0),
        change_percent: select_first(&doc, &change_percent_sources)
            .and_then(|v| parse_percent(&v))
            .unwrap_or(0.0),
        market_cap: parse_metric(select_first(&doc, &market_cap_sources), parse_scaled),
        volume: parse_metric(select_first(&doc, &volume_sources), parse_number),
        observed_at: timestamp_ms(),
        status: QuoteStatus::Ok,
        error: None,
    }
}
