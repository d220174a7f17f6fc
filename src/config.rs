//! Run configuration and package metadata.

use std::path::PathBuf;

use crate::util::current_date;

/// Inputs and output locations for one conversion run.
///
/// The pipeline takes these as plain paths; how they are populated (CLI
/// flags, a config file, a wrapper script) is up to the caller.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source PDF.
    pub pdf_path: PathBuf,
    /// Externally supplied cover image, used instead of page 0's raster.
    pub cover_image: PathBuf,
    /// Directory of `.ttf`/`.otf` files whose stems match the document's
    /// font names.
    pub font_dir: PathBuf,
    /// Directory receiving the package tree and the final `.epub`.
    pub output_dir: PathBuf,
    /// Also write the raw per-page structure dump for manual verification.
    pub dump_structure: bool,
    pub metadata: PackageMetadata,
}

impl Config {
    pub fn new(
        pdf_path: impl Into<PathBuf>,
        cover_image: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            cover_image: cover_image.into(),
            font_dir: PathBuf::from("fonts"),
            output_dir: output_dir.into(),
            dump_structure: false,
            metadata: PackageMetadata::default(),
        }
    }

    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dir = dir.into();
        self
    }

    pub fn with_metadata(mut self, metadata: PackageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_dump_structure(mut self, dump: bool) -> Self {
        self.dump_structure = dump;
        self
    }

    /// File stem of the source PDF, used to name every output.
    pub fn book_stem(&self) -> String {
        self.pdf_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "book".to_string())
    }

    /// Directory holding the unzipped package tree.
    pub fn tree_dir(&self) -> PathBuf {
        self.output_dir.join(format!("{}_html", self.book_stem()))
    }

    /// Path of the final EPUB container.
    pub fn epub_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.epub", self.book_stem()))
    }

    /// Path of the raw structure dump.
    pub fn dump_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_rawstructure.json", self.book_stem()))
    }

    /// File name the cover image keeps inside `OEBPS/image/`.
    pub fn cover_file_name(&self) -> String {
        self.cover_image
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cover.jpg".to_string())
    }

    /// The package's `OEBPS` directory.
    pub fn oebps_dir(&self) -> PathBuf {
        self.tree_dir().join("OEBPS")
    }

    pub(crate) fn image_dir(&self) -> PathBuf {
        self.oebps_dir().join("image")
    }
}

/// Static package metadata, constant for a run and never derived from the
/// document content. Defaults are operator-editable placeholders.
#[derive(Debug, Clone)]
pub struct PackageMetadata {
    pub title: String,
    pub author: String,
    pub language: String,
    pub publisher: String,
    /// Publication date, `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    pub rights: String,
    pub isbn: String,
    /// Fixed `dcterms:modified` timestamp; `None` means "now".
    pub modified: Option<String>,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            title: "The_TITLE".to_string(),
            author: "AUTHOR_FIRST AUTHOR_LAST".to_string(),
            language: "en-US".to_string(),
            publisher: "PUBLISHER_NAME".to_string(),
            date: current_date(),
            description: "THIS_IS_THE_DESCRIPTION".to_string(),
            rights: "Copyright © INSERT_YEAR AUTHOR_NAME".to_string(),
            isbn: "9780000000000".to_string(),
            modified: None,
        }
    }
}

impl PackageMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = isbn.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths_derive_from_stem() {
        let config = Config::new("books/my_book.pdf", "books/cover.jpeg", "out");
        assert_eq!(config.book_stem(), "my_book");
        assert_eq!(config.tree_dir(), PathBuf::from("out/my_book_html"));
        assert_eq!(config.epub_path(), PathBuf::from("out/my_book.epub"));
        assert_eq!(
            config.dump_path(),
            PathBuf::from("out/my_book_rawstructure.json")
        );
        assert_eq!(config.cover_file_name(), "cover.jpeg");
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = PackageMetadata::default();
        assert_eq!(meta.language, "en-US");
        assert_eq!(meta.isbn, "9780000000000");
        // Defaulted date is YYYY-MM-DD
        assert_eq!(meta.date.len(), 10);
        assert!(meta.modified.is_none());
    }
}
