//! # scholar-bib
//!
//! Resolve free-text references to BibTeX entries by scraping Google Scholar.
//!
//! Provides:
//! - **Library**: a paced Scholar client and a resolver that turns one
//!   reference into a citation in at most three requests
//! - **CLI**: `refs2bib` binary reading references on stdin and writing BibTeX
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> scholar_bib::error::Result<()> {
//! use scholar_bib::{Resolver, ScholarClient, SnapshotStore};
//! use std::time::Duration;
//!
//! let client = ScholarClient::new()?.with_delay(Duration::from_secs(10));
//! let mut resolver = Resolver::new(client, SnapshotStore::open("references")?);
//!
//! let resolution = resolver.resolve("Hinton 2012 ImageNet").await;
//! if let Some(bibtex) = resolution.result.citation() {
//!     println!("{}", bibtex);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Identifier strategies
//!
//! The search page is scanned by an ordered chain of strategies; see
//! [`extract`]. A custom chain can be installed with
//! [`Resolver::with_extractor`].
//!
//! ```
//! use scholar_bib::extract::{IdentifierExtractor, LooseSignatureScan};
//! use scholar_bib::Identifier;
//!
//! let extractor = IdentifierExtractor::with_strategies(vec![Box::new(LooseSignatureScan)]);
//! let found = extractor.extract("<a href='/x?scisig=AAHk5Zp0Q1'>");
//! assert_eq!(found, Some(("scisig-scan", Identifier::Signature("AAHk5Zp0Q1".into()))));
//! ```

pub mod cache;
pub mod citation;
pub mod client;
pub mod dialog;
pub mod driver;
pub mod error;
pub mod extract;
pub mod query;
pub mod rate_limit;
pub mod resolver;
pub mod target;
pub mod types;

// Re-export key types at the crate root.
pub use cache::SnapshotStore;
pub use client::ScholarClient;
pub use driver::{run_pipeline, OutputFormat, PipelineSummary};
pub use error::ScholarError;
pub use query::SearchQuery;
pub use resolver::Resolver;
pub use types::*;
