//! Convert PDFs into fixed-layout EPUB 3 publications.
//!
//! The pipeline renders each PDF page as a positioned XHTML overlay on top
//! of the page's rasterized artwork, assembles the EPUB package tree on
//! disk, and zips it into the final container.
//!
//! ```no_run
//! use folio::{Config, DocumentReader, convert_with_reader};
//!
//! # fn demo(reader: &dyn DocumentReader) -> folio::Result<()> {
//! let config = Config::new("book.pdf", "cover.jpg", "output");
//! let summary = convert_with_reader(reader, &config)?;
//! println!("{} pages", summary.pages);
//! # Ok(())
//! # }
//! ```
//!
//! With the `pdf` feature enabled, `convert` opens the PDF itself.

pub mod archive;
pub mod config;
pub mod doc;
pub mod dump;
pub mod error;
pub mod extract;
pub mod fonts;
pub mod package;
pub mod render;
pub(crate) mod util;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use config::{Config, PackageMetadata};
pub use doc::{DocumentReader, OutlineEntry, PageRole, PageText, TextRun};
pub use error::{Error, Result};
pub use fonts::{FontDescriptor, FontFormat};
pub use package::{AssemblySummary, ManifestEntry, PackageAssembler, PageSpread, SpineEntry};

use tracing::info;

/// Run the full pipeline against an already opened document reader.
///
/// Builds the package tree under the configured output directory, extracts
/// page background images, and zips the tree into the `.epub`.
pub fn convert_with_reader(
    reader: &dyn DocumentReader,
    config: &Config,
) -> Result<AssemblySummary> {
    std::fs::create_dir_all(&config.output_dir)?;

    if config.dump_structure {
        dump::write_structure(reader, &config.dump_path())?;
    }

    let mut assembler = PackageAssembler::new(config);
    let summary = assembler.assemble(reader)?;

    let images = extract::extract_page_images(reader, &config.image_dir())?;
    info!(images, "extracted page backgrounds");

    archive::zip_dir(&summary.tree_dir, &config.epub_path())?;
    Ok(summary)
}

/// Convert the configured PDF into an EPUB.
///
/// Both the PDF and the cover image must exist before any work starts.
#[cfg(feature = "pdf")]
pub fn convert(config: &Config) -> Result<AssemblySummary> {
    if !config.pdf_path.exists() {
        return Err(Error::MissingInput(config.pdf_path.clone()));
    }
    if !config.cover_image.exists() {
        return Err(Error::MissingInput(config.cover_image.clone()));
    }
    let reader = pdf::PdfReader::open(&config.pdf_path)?;
    convert_with_reader(&reader, config)
}
