//! Public types for the resolution pipeline.

use serde::Serialize;

/// A page fetched from Scholar, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the page was requested from.
    pub url: String,
    /// Raw response body.
    pub body: String,
}

/// A machine-usable handle found on a search-results page.
///
/// Only one identifier is produced per search; the first strategy that finds
/// something wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Identifier {
    /// `scisig` token that can be exported directly.
    Signature(String),
    /// Token from a cite button's `gs_ocit(...)` handler.
    CitationData(String),
    /// `data-cid` / `id` of the first search result.
    ResultId(String),
}

impl Identifier {
    /// The raw token, regardless of variant.
    pub fn token(&self) -> &str {
        match self {
            Self::Signature(t) | Self::CitationData(t) | Self::ResultId(t) => t,
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signature(t) => write!(f, "scisig:{}", t),
            Self::CitationData(t) => write!(f, "citation_data:{}", t),
            Self::ResultId(t) => write!(f, "result_id:{}", t),
        }
    }
}

/// Where to go next once an identifier is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetUrl {
    /// Export endpoint serving the BibTeX text.
    Direct(String),
    /// Cite dialog that links to the export endpoint.
    NeedsDialog(String),
}

impl TargetUrl {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct(u) | Self::NeedsDialog(u) => u,
        }
    }

    pub fn needs_dialog(&self) -> bool {
        matches!(self, Self::NeedsDialog(_))
    }
}

/// Why a reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// No extraction strategy found an identifier on the search page.
    #[error("no citation identifier found on search page")]
    NoIdentifier,
    /// The cite dialog had no BibTeX link.
    #[error("no BibTeX link on citation dialog")]
    NoExportLink,
    /// Export page text did not look like a citation entry.
    #[error("export page has no citation entry")]
    InvalidCitation,
    /// A fetch failed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Final outcome for one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Success(String),
    Failure(FailureReason),
}

impl ResolutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The citation text, if resolution succeeded.
    pub fn citation(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            Self::Failure(_) => None,
        }
    }
}

/// Everything known about one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The reference as supplied.
    pub reference: String,
    pub result: ResolutionResult,
    /// Identifier found on the search page, if any.
    pub identifier: Option<Identifier>,
    /// Name of the extraction strategy that produced the identifier.
    pub strategy: Option<&'static str>,
    /// Number of network fetches made (1 to 3).
    pub fetches: u32,
}

/// JSON record written by the driver in JSON output mode.
#[derive(Debug, Serialize)]
pub struct ResolutionRecord<'a> {
    pub reference: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<&'a FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<&'a Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<&'static str>,
    pub fetches: u32,
}

impl<'a> From<&'a Resolution> for ResolutionRecord<'a> {
    fn from(r: &'a Resolution) -> Self {
        let (status, citation, failure) = match &r.result {
            ResolutionResult::Success(text) => ("resolved", Some(text.as_str()), None),
            ResolutionResult::Failure(reason) => ("failed", None, Some(reason)),
        };
        Self {
            reference: &r.reference,
            status,
            citation,
            failure,
            identifier: r.identifier.as_ref(),
            strategy: r.strategy,
            fetches: r.fetches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_display_and_token() {
        let id = Identifier::CitationData("CID123".into());
        assert_eq!(id.token(), "CID123");
        assert_eq!(id.to_string(), "citation_data:CID123");
        assert_eq!(Identifier::Signature("abc".into()).to_string(), "scisig:abc");
    }

    #[test]
    fn test_record_for_failure() {
        let resolution = Resolution {
            reference: "Hinton 2012".into(),
            result: ResolutionResult::Failure(FailureReason::NoIdentifier),
            identifier: None,
            strategy: None,
            fetches: 1,
        };
        let json = serde_json::to_value(ResolutionRecord::from(&resolution)).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["failure"]["reason"], "no_identifier");
        assert!(json.get("citation").is_none());
    }

    #[test]
    fn test_record_for_success() {
        let resolution = Resolution {
            reference: "Hinton 2012".into(),
            result: ResolutionResult::Success("@article{x}".into()),
            identifier: Some(Identifier::Signature("ABCDEFGH12".into())),
            strategy: Some("data-sval"),
            fetches: 2,
        };
        let json = serde_json::to_value(ResolutionRecord::from(&resolution)).unwrap();
        assert_eq!(json["status"], "resolved");
        assert_eq!(json["citation"], "@article{x}");
        assert_eq!(json["identifier"]["kind"], "signature");
        assert_eq!(json["identifier"]["value"], "ABCDEFGH12");
        assert_eq!(json["fetches"], 2);
    }
}
