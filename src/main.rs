//! wikibook - Build EPUB ebooks from wikidot pages

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use wikibook::manifest::Manifest;
use wikibook::{CreditsBuilder, EpubPackager, LogObserver, Resolver};

#[derive(Parser)]
#[command(name = "wikibook")]
#[command(version, about = "Build EPUB ebooks from wikidot pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    wikibook tales.json tales.epub               Build a book from a manifest
    wikibook -v tales.json tales.epub            Log every resolved page
    wikibook --no-credits tales.json tales.epub  Skip the attributions section")]
struct Cli {
    /// Book manifest (JSON)
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Output EPUB file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Do not add the acknowledgments section
    #[arg(long)]
    no_credits: bool,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report every resolved page
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Warn
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match build(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build(cli: &Cli) -> wikibook::Result<()> {
    let manifest = Manifest::load(&cli.manifest)?;
    let source = manifest.source();

    let mut builder = manifest.assemble();
    if !cli.no_credits {
        CreditsBuilder::new().build(&mut builder, &source, &LogObserver)?;
    }

    let packager = EpubPackager::new(manifest.book_metadata());
    let resolver = Resolver::new(manifest.site.as_str());
    log::info!(
        "Building {:?} from {}.",
        packager.metadata().title,
        resolver.site()
    );
    builder.save(&cli.output, &source, &resolver, &packager, &LogObserver)
}
