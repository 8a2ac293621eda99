//! BibTeX link lookup on the cite dialog page.

use scraper::{Html, Selector};

/// Link text that marks the BibTeX export anchor.
const EXPORT_LINK_TEXT: &str = "BibTeX";

/// Find the BibTeX export link on a cite dialog and make it absolute.
///
/// Returns `None` when the dialog has no anchor whose text mentions BibTeX
/// and carries an `href`.
pub fn find_export_link(markup: &str, origin: &str) -> Option<String> {
    let selector = Selector::parse("a").ok()?;
    let document = Html::parse_document(markup);

    let href = document
        .select(&selector)
        .filter(|a| a.text().collect::<String>().contains(EXPORT_LINK_TEXT))
        .find_map(|a| a.value().attr("href").map(str::to_string));
    href.map(|href| absolutize(&href, origin))
}

/// Resolve a dialog href against the service origin.
pub fn absolutize(href: &str, origin: &str) -> String {
    if href.starts_with("//") {
        return format!("https:{}", href);
    }
    if href.starts_with('/') {
        return format!("{}{}", origin.trim_end_matches('/'), href);
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://scholar.google.com";

    const DIALOG: &str = r#"<div id="gs_citt"><table>
        <tr><th>MLA</th><td><div class="gs_citr">Hinton, G. ImageNet.</div></td></tr>
        </table></div>
        <div id="gs_citi">
          <a class="gs_citi" href="/scholar.bib?q=info:CID123:scholar.google.com/&amp;output=citation&amp;scisig=AAA">BibTeX</a>
          <a class="gs_citi" href="/scholar.enw?q=info:CID123">EndNote</a>
        </div>"#;

    #[test]
    fn test_relative_link_gets_origin() {
        assert_eq!(
            find_export_link(DIALOG, ORIGIN).as_deref(),
            Some("https://scholar.google.com/scholar.bib?q=info:CID123:scholar.google.com/&output=citation&scisig=AAA")
        );
    }

    #[test]
    fn test_absolute_link_unchanged() {
        let html = r#"<a href="https://scholar.googleusercontent.com/scholar.bib?q=x">Import into BibTeX</a>"#;
        assert_eq!(
            find_export_link(html, ORIGIN).as_deref(),
            Some("https://scholar.googleusercontent.com/scholar.bib?q=x")
        );
    }

    #[test]
    fn test_nested_text_matches() {
        let html = r#"<a href="/scholar?q=abc"><span>Bib</span>TeX</a>"#;
        assert_eq!(
            find_export_link(html, ORIGIN).as_deref(),
            Some("https://scholar.google.com/scholar?q=abc")
        );
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = r#"<a>BibTeX</a><a href="/second">BibTeX</a>"#;
        assert_eq!(
            find_export_link(html, ORIGIN).as_deref(),
            Some("https://scholar.google.com/second")
        );
    }

    #[test]
    fn test_no_bibtex_link() {
        let html = r#"<a href="/scholar.enw">EndNote</a><a href="/scholar.ris">RefMan</a>"#;
        assert_eq!(find_export_link(html, ORIGIN), None);
    }

    #[test]
    fn test_absolutize_variants() {
        assert_eq!(absolutize("/a?b=c", "http://127.0.0.1:99/"), "http://127.0.0.1:99/a?b=c");
        assert_eq!(absolutize("//cdn.example/x", ORIGIN), "https://cdn.example/x");
        assert_eq!(absolutize("http://x/y", ORIGIN), "http://x/y");
    }
}
