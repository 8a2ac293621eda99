//! Line-oriented driver: references in, BibTeX out.
//!
//! Each non-blank input line produces a `% <reference>` comment, the
//! citation when one was found, and a blank separator line. Output is
//! flushed after every reference so an interrupted run keeps what it has.

use std::io::{BufRead, Write};

use tracing::info;

use crate::error::Result;
use crate::resolver::Resolver;
use crate::types::{Resolution, ResolutionRecord, ResolutionResult};

/// How resolutions are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// `% reference` comment followed by the BibTeX entry.
    #[default]
    Bib,
    /// One JSON object per reference.
    Json,
}

/// Counts for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSummary {
    pub processed: usize,
    pub resolved: usize,
}

/// Resolve every reference in `input`, writing results to `output` as they complete.
pub async fn run_pipeline<R, W>(
    resolver: &mut Resolver,
    mut input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<PipelineSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = PipelineSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // undecodable bytes must not end the run
        let line = String::from_utf8_lossy(&buf);
        let reference = line.trim();
        if reference.is_empty() {
            continue;
        }

        if format == OutputFormat::Bib {
            writeln!(output, "% {}", reference)?;
            output.flush()?;
        }

        let resolution = resolver.resolve(reference).await;
        summary.processed += 1;
        if resolution.result.is_success() {
            summary.resolved += 1;
        }

        write_resolution(output, &resolution, format)?;
        output.flush()?;
    }

    info!(
        processed = summary.processed,
        resolved = summary.resolved,
        "finished resolving references"
    );
    Ok(summary)
}

/// Write one resolution. In bib mode the `% reference` line is expected to
/// have been written already.
fn write_resolution<W: Write>(
    output: &mut W,
    resolution: &Resolution,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Bib => {
            if let ResolutionResult::Success(text) = &resolution.result {
                writeln!(output, "{}", text)?;
            }
            writeln!(output)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *output, &ResolutionRecord::from(resolution))?;
            writeln!(output)?;
        }
    }
    Ok(())
}
