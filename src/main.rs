use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use folio::{Config, PackageMetadata, convert};

/// Convert a PDF into a fixed-layout EPUB 3.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Source PDF.
    input: PathBuf,

    /// Cover image used for the cover page.
    cover: PathBuf,

    /// Directory of font files to embed.
    #[arg(long, default_value = "fonts")]
    fonts: PathBuf,

    /// Output directory for the package tree and the epub.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Publication title.
    #[arg(long)]
    title: Option<String>,

    /// Publication author.
    #[arg(long)]
    author: Option<String>,

    /// Publication language tag.
    #[arg(long)]
    language: Option<String>,

    /// ISBN for the package identifiers.
    #[arg(long)]
    isbn: Option<String>,

    /// Also write the raw page-structure dump.
    #[arg(long)]
    dump_structure: bool,

    /// Suppress progress logging.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("error")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> folio::Result<()> {
    let mut metadata = PackageMetadata::default();
    if let Some(title) = cli.title {
        metadata.title = title;
    }
    if let Some(author) = cli.author {
        metadata.author = author;
    }
    if let Some(language) = cli.language {
        metadata.language = language;
    }
    if let Some(isbn) = cli.isbn {
        metadata.isbn = isbn;
    }

    let config = Config::new(cli.input, cli.cover, cli.output)
        .with_font_dir(cli.fonts)
        .with_metadata(metadata)
        .with_dump_structure(cli.dump_structure);

    let summary = convert(&config)?;

    println!("wrote {}", config.epub_path().display());
    if summary.discovered_fonts.is_empty() {
        println!("no font names discovered in the document");
    } else {
        println!("fonts used by the document (supply matching files to embed them):");
        for font in &summary.discovered_fonts {
            println!("  {font}");
        }
    }
    Ok(())
}
