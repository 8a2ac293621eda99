//! Reference → BibTeX resolution.
//!
//! One resolution is at most three fetches:
//!
//! 1. the search page, parsed for an [`Identifier`];
//! 2. the cite dialog, only when the identifier cannot be exported directly;
//! 3. the export page holding the citation text.
//!
//! Every fetch after the first sleeps the configured delay beforehand, and
//! every fetched page is written to the [`SnapshotStore`] before parsing.
//! Failures never escape as errors; they are reported as
//! [`ResolutionResult::Failure`] with a [`FailureReason`].

use tracing::{debug, warn};

use crate::cache::SnapshotStore;
use crate::citation::extract_citation;
use crate::client::ScholarClient;
use crate::dialog::find_export_link;
use crate::extract::IdentifierExtractor;
use crate::query::SearchQuery;
use crate::target::resolve_target;
use crate::types::{FailureReason, FetchedPage, Identifier, Resolution, ResolutionResult, TargetUrl};

const SEARCH_EXCERPT_CHARS: usize = 1000;
const EXPORT_EXCERPT_CHARS: usize = 500;

/// Drives one reference at a time through search, dialog and export.
#[derive(Debug)]
pub struct Resolver {
    client: ScholarClient,
    snapshots: SnapshotStore,
    extractor: IdentifierExtractor,
}

#[derive(Default)]
struct Trace {
    identifier: Option<Identifier>,
    strategy: Option<&'static str>,
    fetches: u32,
}

impl Resolver {
    pub fn new(client: ScholarClient, snapshots: SnapshotStore) -> Self {
        Self {
            client,
            snapshots,
            extractor: IdentifierExtractor::default(),
        }
    }

    /// Replace the identifier extraction chain.
    pub fn with_extractor(mut self, extractor: IdentifierExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn client(&self) -> &ScholarClient {
        &self.client
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Resolve a single reference to citation text.
    pub async fn resolve(&mut self, reference: &str) -> Resolution {
        let mut trace = Trace::default();
        let result = match self.run(reference, &mut trace).await {
            Ok(text) => ResolutionResult::Success(text),
            Err(reason) => {
                debug!(reference, %reason, "resolution failed");
                ResolutionResult::Failure(reason)
            }
        };

        Resolution {
            reference: reference.to_string(),
            result,
            identifier: trace.identifier,
            strategy: trace.strategy,
            fetches: trace.fetches,
        }
    }

    async fn run(&mut self, reference: &str, trace: &mut Trace) -> Result<String, FailureReason> {
        let search_url = SearchQuery::new(reference).url(self.client.base_url());
        debug!(url = %search_url, "searching");
        let search = self.fetch(&search_url, false, trace).await?;

        let Some((strategy, identifier)) = self.extractor.extract(&search.body) else {
            debug!(
                excerpt = %excerpt(&search.body, SEARCH_EXCERPT_CHARS),
                "no citation identifier on search page"
            );
            return Err(FailureReason::NoIdentifier);
        };
        debug!(strategy, %identifier, "found citation identifier");
        trace.strategy = Some(strategy);
        trace.identifier = Some(identifier.clone());

        let target = resolve_target(&identifier, self.client.base_url(), self.client.export_url());
        debug!(url = target.as_str(), dialog = target.needs_dialog(), "citation url");

        let export_url = match target {
            TargetUrl::Direct(url) => url,
            TargetUrl::NeedsDialog(url) => {
                let dialog = self.fetch(&url, true, trace).await?;
                let link = find_export_link(&dialog.body, self.client.base_url())
                    .ok_or(FailureReason::NoExportLink)?;
                debug!(url = %link, "BibTeX url");
                link
            }
        };

        let export = self.fetch(&export_url, true, trace).await?;
        extract_citation(&export.body).ok_or_else(|| {
            debug!(
                excerpt = %excerpt(&export.body, EXPORT_EXCERPT_CHARS),
                "no citation entry on export page"
            );
            FailureReason::InvalidCitation
        })
    }

    async fn fetch(
        &mut self,
        url: &str,
        delayed: bool,
        trace: &mut Trace,
    ) -> Result<FetchedPage, FailureReason> {
        trace.fetches += 1;
        let fetched = if delayed {
            self.client.fetch_after_delay(url).await
        } else {
            self.client.fetch(url).await
        };
        let page = fetched.map_err(|e| {
            debug!(url, error = %e, "fetch failed");
            FailureReason::Transport(e.to_string())
        })?;

        match self.snapshots.save(&page.body) {
            Ok(path) => debug!(path = %path.display(), "saved page snapshot"),
            Err(e) => warn!(error = %e, "could not save page snapshot"),
        }
        Ok(page)
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
