//! Diagnostic dump of the raw text structure extracted from a document.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::doc::{DocumentReader, PageText};
use crate::error::Result;

#[derive(Serialize)]
struct PageRecord {
    page_num: usize,
    content: PageText,
}

/// Write every page's extracted text runs to `path` as pretty-printed JSON.
/// Page numbers in the dump are one-based for the human reading it.
pub fn write_structure(reader: &dyn DocumentReader, path: &Path) -> Result<()> {
    let mut records = Vec::with_capacity(reader.page_count());
    for index in 0..reader.page_count() {
        records.push(PageRecord {
            page_num: index + 1,
            content: reader.page_text(index)?,
        });
    }
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &records)?;
    info!(path = %path.display(), pages = records.len(), "wrote structure dump");
    Ok(())
}
