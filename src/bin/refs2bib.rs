//! CLI binary: resolve references from stdin to BibTeX.
//!
//! Usage: refs2bib --sleep 10 < refs.txt > out.bib

#[cfg(feature = "cli")]
mod cli {
    use clap::Parser;
    use scholar_bib::client::parse_origin;
    use scholar_bib::{run_pipeline, OutputFormat, Resolver, ScholarClient, SnapshotStore};
    use std::path::PathBuf;
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    #[derive(Parser)]
    #[command(
        name = "refs2bib",
        about = "Resolve free-text references to BibTeX via Google Scholar",
        version
    )]
    struct Cli {
        /// Seconds to wait between Google Scholar accesses
        #[arg(long, default_value = "10")]
        sleep: u64,

        /// Print diagnostics to stderr
        #[arg(short, long, visible_alias = "debug")]
        verbose: bool,

        /// Directory receiving a numbered snapshot of every fetched page
        #[arg(long, default_value = scholar_bib::cache::DEFAULT_CACHE_DIR)]
        cache_dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "bib")]
        output: OutputFormat,

        /// Scholar origin (for mirrors and testing)
        #[arg(long, hide = true)]
        base_url: Option<String>,
    }

    fn init_logging(verbose: bool) {
        let filter = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub async fn run() -> scholar_bib::error::Result<()> {
        let cli = Cli::parse();
        init_logging(cli.verbose);

        let mut client = ScholarClient::new()?.with_delay(Duration::from_secs(cli.sleep));
        if let Some(base_url) = cli.base_url {
            client = client.with_base_url(parse_origin(&base_url)?);
        }
        let snapshots = SnapshotStore::open(&cli.cache_dir)?;
        let mut resolver = Resolver::new(client, snapshots);

        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run_pipeline(&mut resolver, stdin.lock(), &mut out, cli.output).await?;

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
