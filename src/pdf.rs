//! The MuPDF-backed reader. This is the only module that touches the
//! `mupdf` crate; everything downstream goes through [`DocumentReader`].

use std::path::Path;

use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix, TextPageOptions};
use tracing::debug;

use crate::doc::{DocumentReader, OutlineEntry, PageText, TextRun};
use crate::error::{Error, Result};

/// Reads pages, text structure, and the outline from a PDF on disk.
pub struct PdfReader {
    doc: Document,
    page_count: usize,
}

impl PdfReader {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let doc = Document::open(&path.to_string_lossy())?;
        let page_count = doc.page_count()? as usize;
        debug!(path = %path.display(), pages = page_count, "opened pdf");
        Ok(Self { doc, page_count })
    }
}

impl DocumentReader for PdfReader {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<PageText> {
        let page = self.doc.load_page(index as i32)?;
        let bounds = page.bounds()?;
        let text_page = page.to_text_page(TextPageOptions::empty())?;

        let mut runs = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_bounds = line.bounds();
                let mut text = String::new();
                let mut size = 0.0f32;
                for ch in line.chars() {
                    if let Some(c) = ch.char() {
                        text.push(c);
                        if size == 0.0 {
                            size = ch.size();
                        }
                    }
                }
                if text.trim().is_empty() {
                    continue;
                }
                runs.push(TextRun {
                    x: line_bounds.x0,
                    // The renderer positions by baseline; the line's bottom
                    // edge is the closest thing the text page exposes.
                    y: line_bounds.y1,
                    size: if size > 0.0 { size } else { 12.0 },
                    // Font names and fill colors are not surfaced by the
                    // structured-text API, so runs fall back to the
                    // stylesheet's defaults.
                    font: String::new(),
                    color: 0,
                    text,
                });
            }
        }

        Ok(PageText {
            width: bounds.x1 - bounds.x0,
            height: bounds.y1 - bounds.y0,
            // Every page is backed by its rasterized artwork.
            has_image: true,
            runs,
        })
    }

    fn page_image(&self, index: usize) -> Result<Option<RgbImage>> {
        let page = self.doc.load_page(index as i32)?;
        let matrix = Matrix::new_scale(1.0, 1.0);
        let colorspace = Colorspace::device_rgb();
        let pixmap = page.to_pixmap(&matrix, &colorspace, true, false)?;

        let width = pixmap.width();
        let height = pixmap.height();
        let n = pixmap.n() as usize;
        let samples = pixmap.samples();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for i in 0..(width * height) as usize {
            let offset = i * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(r);
            let b = samples.get(offset + 2).copied().unwrap_or(r);
            rgb.extend_from_slice(&[r, g, b]);
        }

        let image = RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| Error::Pdf(format!("pixmap buffer mismatch for page {index}")))?;
        Ok(Some(image))
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        let outlines = self.doc.outlines()?;
        let mut entries = Vec::new();
        flatten_outlines(&outlines, &mut entries);
        Ok(entries)
    }
}

fn flatten_outlines(outlines: &[mupdf::Outline], entries: &mut Vec<OutlineEntry>) {
    for outline in outlines {
        if let Some(page) = outline.page {
            let title = if outline.title.is_empty() {
                "Untitled".to_string()
            } else {
                outline.title.clone()
            };
            entries.push(OutlineEntry {
                title,
                page: page as usize,
            });
        }
        flatten_outlines(&outline.down, entries);
    }
}
