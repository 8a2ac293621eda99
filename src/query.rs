//! Scholar search URL builder.
//!
//! Turns a free-text reference into a search-results URL.
//!
//! # Example
//!
//! ```
//! use scholar_bib::SearchQuery;
//!
//! let url = SearchQuery::new("Hinton 2012 ImageNet").url("https://scholar.google.com");
//! assert_eq!(
//!     url,
//!     "https://scholar.google.com/scholar?hl=en&as_sdt=0%2C21&q=Hinton+2012+ImageNet&btnG="
//! );
//! ```

use url::form_urlencoded;

/// Default interface language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default result scope (`as_sdt`).
pub const DEFAULT_SCOPE: &str = "0,21";

/// Builder for a Scholar search URL.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    reference: String,
    language: String,
    scope: String,
}

impl SearchQuery {
    /// Create a query for the given reference with default parameters.
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    /// Override the interface language (`hl`).
    pub fn language(mut self, hl: &str) -> Self {
        self.language = hl.to_string();
        self
    }

    /// Override the result scope (`as_sdt`).
    pub fn scope(mut self, as_sdt: &str) -> Self {
        self.scope = as_sdt.to_string();
        self
    }

    /// Build the search URL against `origin` (e.g. `https://scholar.google.com`).
    pub fn url(&self, origin: &str) -> String {
        format!(
            "{}/scholar?hl={}&as_sdt={}&q={}&btnG=",
            origin.trim_end_matches('/'),
            encode(&self.language),
            encode(&self.scope),
            encode(&self.reference),
        )
    }
}

/// Form-encode a value (spaces as `+`, everything reserved percent-encoded).
pub fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
