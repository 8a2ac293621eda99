//! Citation text extraction from export pages.

use scraper::{Html, Selector};

/// Character every BibTeX entry starts with.
pub const CITATION_MARKER: char = '@';

/// Pull the citation body out of an export page.
///
/// Prefers the first `<pre>` block and falls back to the text of the whole
/// body. Returns `None` unless the text contains [`CITATION_MARKER`].
pub fn extract_citation(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);

    let text = first_text(&document, "pre")
        .or_else(|| first_text(&document, "body"))
        .unwrap_or_else(|| document.root_element().text().collect::<String>());

    let text = text.trim();
    if text.contains(CITATION_MARKER) {
        Some(text.to_string())
    } else {
        None
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}
