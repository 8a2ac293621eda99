//! Identifier extraction from Scholar search-result pages.
//!
//! Scholar's markup differs between result types and changes without notice,
//! so extraction is an ordered chain of independent strategies. The first
//! strategy that returns an identifier wins; the rest are not consulted.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::types::Identifier;

/// Loose-scan candidates of this length or shorter are treated as truncated.
pub const MIN_SIGNATURE_LEN: usize = 8;

static DATA_SVAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"data-sval="[^"]*scisig=([A-Za-z0-9_-]+)"#).expect("valid data-sval regex")
});

static SCISIG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"scisig=([A-Za-z0-9_-]+)").expect("valid scisig regex"));

static GS_OCIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"gs_ocit\(event,'([^']+)").expect("valid gs_ocit regex"));

/// One way of pulling an identifier out of a search page.
pub trait IdentifierStrategy: Send + Sync {
    /// Short name used in diagnostics and reports.
    fn name(&self) -> &'static str;

    /// Try to find an identifier in `markup`. `None` means "not found here".
    fn attempt(&self, markup: &str) -> Option<Identifier>;
}

/// `scisig` inside a `data-sval` attribute.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataSvalSignature;

impl IdentifierStrategy for DataSvalSignature {
    fn name(&self) -> &'static str {
        "data-sval"
    }

    fn attempt(&self, markup: &str) -> Option<Identifier> {
        DATA_SVAL_RE
            .captures(markup)
            .map(|caps| Identifier::Signature(caps[1].to_string()))
    }
}

/// Any `scisig=` occurrence in the page; the longest plausible one wins.
///
/// Candidates no longer than [`MIN_SIGNATURE_LEN`] are discarded. When
/// several candidates share the maximum length, the first in document order
/// is chosen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LooseSignatureScan;

impl IdentifierStrategy for LooseSignatureScan {
    fn name(&self) -> &'static str {
        "scisig-scan"
    }

    fn attempt(&self, markup: &str) -> Option<Identifier> {
        SCISIG_RE
            .captures_iter(markup)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|candidate| candidate.len() > MIN_SIGNATURE_LEN)
            .fold(None, |best: Option<&str>, candidate| match best {
                Some(b) if b.len() >= candidate.len() => Some(b),
                _ => Some(candidate),
            })
            .map(|sig| Identifier::Signature(sig.to_string()))
    }
}

/// Citation token from the `onclick` handler of a "Cite" link.
#[derive(Debug, Default, Clone, Copy)]
pub struct CiteLinkOnclick;

impl IdentifierStrategy for CiteLinkOnclick {
    fn name(&self) -> &'static str {
        "cite-onclick"
    }

    fn attempt(&self, markup: &str) -> Option<Identifier> {
        let selector = parse_selector("a.gs_or_cit")?;
        let document = Html::parse_document(markup);

        let token = document
            .select(&selector)
            .filter_map(|link| link.value().attr("onclick"))
            .filter(|onclick| onclick.contains("gs_ocit"))
            .find_map(|onclick| GS_OCIT_RE.captures(onclick))
            .map(|caps| caps[1].to_string());
        token.map(Identifier::CitationData)
    }
}

/// `data-cid` (or `id`) of the first search result container.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstResultId;

impl IdentifierStrategy for FirstResultId {
    fn name(&self) -> &'static str {
        "result-id"
    }

    fn attempt(&self, markup: &str) -> Option<Identifier> {
        let selector = parse_selector(".gs_r")?;
        let document = Html::parse_document(markup);
        let first = document.select(&selector).next()?;

        let id = ["data-cid", "id"]
            .iter()
            .filter_map(|attr| first.value().attr(attr))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string);
        id.map(Identifier::ResultId)
    }
}

/// Ordered chain of [`IdentifierStrategy`] implementations.
pub struct IdentifierExtractor {
    strategies: Vec<Box<dyn IdentifierStrategy>>,
}

impl IdentifierExtractor {
    /// Build an extractor from an explicit, ordered list of strategies.
    pub fn with_strategies(strategies: Vec<Box<dyn IdentifierStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the configured strategies, in priority order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain. Returns the winning strategy's name and its identifier.
    pub fn extract(&self, markup: &str) -> Option<(&'static str, Identifier)> {
        self.strategies
            .iter()
            .find_map(|s| s.attempt(markup).map(|id| (s.name(), id)))
    }
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self::with_strategies(vec![
            Box::new(DataSvalSignature),
            Box::new(LooseSignatureScan),
            Box::new(CiteLinkOnclick),
            Box::new(FirstResultId),
        ])
    }
}

impl std::fmt::Debug for IdentifierExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierExtractor")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

fn parse_selector(input: &str) -> Option<Selector> {
    Selector::parse(input).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVAL_AND_ONCLICK: &str = r#"<html><body>
        <div class="gs_r gs_or gs_scl" data-cid="RID42">
          <a class="gs_or_cit gs_or_btn" href="javascript:void(0)"
             onclick="return gs_ocit(event,'CID123abc','0')">Cite</a>
          <div data-sval="/scholar.bib?q=info:x&amp;scisig=ABCDEFGH12&amp;scisf=4"></div>
        </div>
    </body></html>"#;

    #[test]
    fn test_default_order() {
        let extractor = IdentifierExtractor::default();
        assert_eq!(
            extractor.strategy_names(),
            vec!["data-sval", "scisig-scan", "cite-onclick", "result-id"]
        );
    }

    #[test]
    fn test_signature_beats_onclick() {
        let (strategy, id) = IdentifierExtractor::default()
            .extract(SVAL_AND_ONCLICK)
            .unwrap();
        assert_eq!(strategy, "data-sval");
        assert_eq!(id, Identifier::Signature("ABCDEFGH12".into()));
    }

    #[test]
    fn test_data_sval_takes_first_match() {
        let html = r#"<div data-sval="a?scisig=FIRSTSIG"></div><div data-sval="b?scisig=SECONDSIGLONGER"></div>"#;
        assert_eq!(
            DataSvalSignature.attempt(html),
            Some(Identifier::Signature("FIRSTSIG".into()))
        );
    }

    #[test]
    fn test_loose_scan_rejects_short_candidates() {
        assert_eq!(LooseSignatureScan.attempt("<a href='x?scisig=XY'>"), None);
        // exactly at the threshold is still too short
        assert_eq!(LooseSignatureScan.attempt("<a href='x?scisig=ABCDEFGH'>"), None);
        assert_eq!(
            LooseSignatureScan.attempt("<a href='x?scisig=ABCDEFGHI'>"),
            Some(Identifier::Signature("ABCDEFGHI".into()))
        );
    }

    #[test]
    fn test_loose_scan_picks_longest() {
        let html = "scisig=SHORT scisig=MEDIUM_123 scisig=LONGEST_TOKEN_1 scisig=OTHER_12";
        assert_eq!(
            LooseSignatureScan.attempt(html),
            Some(Identifier::Signature("LONGEST_TOKEN_1".into()))
        );
    }

    #[test]
    fn test_loose_scan_tie_goes_to_first() {
        let html = "<a href='?scisig=AAAAAAAAAA'></a><a href='?scisig=BBBBBBBBBB'></a>";
        assert_eq!(
            LooseSignatureScan.attempt(html),
            Some(Identifier::Signature("AAAAAAAAAA".into()))
        );
    }

    #[test]
    fn test_short_scisig_falls_through_to_onclick() {
        let html = r#"<html><body>
            <a href="/x?scisig=XY">x</a>
            <a class="gs_or_cit" onclick="gs_ocit(event,'CID123xyz','0')">Cite</a>
        </body></html>"#;
        let (strategy, id) = IdentifierExtractor::default().extract(html).unwrap();
        assert_eq!(strategy, "cite-onclick");
        assert_eq!(id, Identifier::CitationData("CID123xyz".into()));
    }

    #[test]
    fn test_onclick_skips_links_without_handler() {
        let html = r#"<a class="gs_or_cit">Cite</a>
            <a class="gs_or_cit" onclick="other()">Cite</a>
            <a class="gs_or_cit" onclick="gs_ocit(event,'SECOND','1')">Cite</a>"#;
        assert_eq!(
            CiteLinkOnclick.attempt(html),
            Some(Identifier::CitationData("SECOND".into()))
        );
    }

    #[test]
    fn test_onclick_ignores_other_anchor_classes() {
        let html = r#"<a class="gs_or_sav" onclick="gs_ocit(event,'NOPE','0')">Save</a>"#;
        assert_eq!(CiteLinkOnclick.attempt(html), None);
    }

    #[test]
    fn test_result_id_prefers_data_cid() {
        let html = r#"<div class="gs_r" id="elem1" data-cid="CIDFIRST"></div>
            <div class="gs_r" data-cid="CIDSECOND"></div>"#;
        assert_eq!(
            FirstResultId.attempt(html),
            Some(Identifier::ResultId("CIDFIRST".into()))
        );
    }

    #[test]
    fn test_result_id_falls_back_to_id() {
        let html = r#"<div class="gs_r gs_or" id="elem7"></div>"#;
        assert_eq!(
            FirstResultId.attempt(html),
            Some(Identifier::ResultId("elem7".into()))
        );
    }

    #[test]
    fn test_result_id_only_looks_at_first_result() {
        let html = r#"<div class="gs_r"></div><div class="gs_r" data-cid="LATER"></div>"#;
        assert_eq!(FirstResultId.attempt(html), None);
    }

    #[test]
    fn test_nothing_found() {
        let html = "<html><body><p>Your search did not match any articles.</p></body></html>";
        assert!(IdentifierExtractor::default().extract(html).is_none());
    }

    #[test]
    fn test_custom_chain() {
        let extractor = IdentifierExtractor::with_strategies(vec![Box::new(FirstResultId)]);
        let (strategy, id) = extractor.extract(SVAL_AND_ONCLICK).unwrap();
        assert_eq!(strategy, "result-id");
        assert_eq!(id, Identifier::ResultId("RID42".into()));
    }
}
