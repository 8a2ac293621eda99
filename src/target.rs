//! Mapping from an [`Identifier`] to the next URL to fetch.

use url::Url;

use crate::types::{Identifier, TargetUrl};

/// Build the follow-up URL for `identifier`.
///
/// Signatures go straight to the export host; citation data and result ids
/// go through the cite dialog on `origin`.
pub fn resolve_target(identifier: &Identifier, origin: &str, export_origin: &str) -> TargetUrl {
    let url = match identifier {
        Identifier::CitationData(id) | Identifier::ResultId(id) => format!(
            "{}/scholar?q=info:{}:scholar.google.com/&output=cite&scirp=0&hl=en",
            origin.trim_end_matches('/'),
            id
        ),
        Identifier::Signature(sig) => format!(
            "{}/scholar.bib?q=info:info:scholar.google.com/&output=citation&scisdr=&scisig={}&scisf=4&ct=citation&cd=-1&hl=en",
            export_origin.trim_end_matches('/'),
            sig
        ),
    };
    TargetUrl::classify(url)
}

impl TargetUrl {
    /// Decide the hop count from the URL's query: `output=cite` marks a dialog.
    pub fn classify(url: String) -> Self {
        let is_dialog = Url::parse(&url)
            .map(|u| u.query_pairs().any(|(k, v)| k == "output" && v == "cite"))
            .unwrap_or(false);
        if is_dialog {
            Self::NeedsDialog(url)
        } else {
            Self::Direct(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://scholar.google.com";
    const EXPORT: &str = "https://scholar.googleusercontent.com";

    #[test]
    fn test_signature_is_direct() {
        let target = resolve_target(&Identifier::Signature("ABCDEFGH12".into()), ORIGIN, EXPORT);
        match target {
            TargetUrl::Direct(url) => {
                assert!(url.starts_with("https://scholar.googleusercontent.com/scholar.bib?"));
                assert!(url.contains("scisig=ABCDEFGH12"));
                assert!(url.contains("output=citation"));
            }
            other => panic!("expected Direct, got {:?}", other),
        }
    }

    #[test]
    fn test_citation_data_needs_dialog() {
        let target = resolve_target(&Identifier::CitationData("CID123".into()), ORIGIN, EXPORT);
        assert!(target.needs_dialog());
        assert_eq!(
            target.as_str(),
            "https://scholar.google.com/scholar?q=info:CID123:scholar.google.com/&output=cite&scirp=0&hl=en"
        );
    }

    #[test]
    fn test_result_id_needs_dialog() {
        let target = resolve_target(&Identifier::ResultId("RID9".into()), ORIGIN, EXPORT);
        assert!(target.needs_dialog());
        assert!(target.as_str().contains("info:RID9:scholar.google.com"));
        assert!(target.as_str().contains("output=cite"));
    }

    #[test]
    fn test_classify_by_query() {
        assert!(TargetUrl::classify("http://h/scholar?q=a&output=cite".into()).needs_dialog());
        assert!(!TargetUrl::classify("http://h/scholar.bib?q=a&output=citation".into()).needs_dialog());
        assert!(!TargetUrl::classify("not a url".into()).needs_dialog());
    }
}
