//! Document model and the reader capability.
//!
//! The pipeline never touches a PDF directly: it consumes pages through the
//! [`DocumentReader`] trait, which yields per-page text runs, one background
//! raster per page, and the document outline. The `pdf` feature provides the
//! MuPDF-backed implementation; tests use an in-memory fake.

use image::RgbImage;
use serde::Serialize;

use crate::error::Result;

/// One run of text with uniform styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x: f32,
    /// Baseline origin; the renderer subtracts the font size to place the box.
    pub y: f32,
    pub size: f32,
    pub font: String,
    /// Packed `0xRRGGBB` fill color; 0 means default/inherited.
    pub color: u32,
    pub text: String,
}

/// Extracted content of a single page.
///
/// `has_image` reports whether the page carries at least one embedded raster;
/// only one background per page is ever used.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageText {
    pub width: f32,
    pub height: f32,
    pub has_image: bool,
    pub runs: Vec<TextRun>,
}

/// A flattened outline (bookmark) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    /// Zero-based index of the page the entry points at.
    pub page: usize,
}

/// Logical page name used consistently for file naming, manifest ids and the
/// spine: page 0 is always the cover, numbered pages start at `page_1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    Cover,
    Numbered(usize),
}

impl PageRole {
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            PageRole::Cover
        } else {
            PageRole::Numbered(index)
        }
    }

    pub fn is_cover(&self) -> bool {
        matches!(self, PageRole::Cover)
    }

    /// File stem: `cover` or `page_<n>`.
    pub fn name(&self) -> String {
        match self {
            PageRole::Cover => "cover".to_string(),
            PageRole::Numbered(n) => format!("page_{n}"),
        }
    }

    /// Page label for the pagebreak marker: `i` for the cover, then `1`, `2`, ...
    pub fn label(&self) -> String {
        match self {
            PageRole::Cover => "i".to_string(),
            PageRole::Numbered(n) => n.to_string(),
        }
    }

    /// Human-readable document title.
    pub fn title(&self) -> String {
        match self {
            PageRole::Cover => "Cover".to_string(),
            PageRole::Numbered(n) => format!("Page {n}"),
        }
    }
}

/// Read access to a paginated source document.
pub trait DocumentReader {
    fn page_count(&self) -> usize;

    /// Text runs and dimensions for one page.
    fn page_text(&self, index: usize) -> Result<PageText>;

    /// The page's background raster, already normalized to RGB, or `None`
    /// when the page has no embedded image.
    fn page_image(&self, index: usize) -> Result<Option<RgbImage>>;

    /// The document outline, flattened depth-first.
    fn outline(&self) -> Result<Vec<OutlineEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_role_naming() {
        assert_eq!(PageRole::from_index(0), PageRole::Cover);
        assert_eq!(PageRole::from_index(3), PageRole::Numbered(3));
        assert_eq!(PageRole::Cover.name(), "cover");
        assert_eq!(PageRole::Numbered(1).name(), "page_1");
        assert_eq!(PageRole::Cover.label(), "i");
        assert_eq!(PageRole::Numbered(12).label(), "12");
        assert_eq!(PageRole::Numbered(2).title(), "Page 2");
    }
}
