use folio::{DocumentReader, OutlineEntry, PageText, Result, TextRun};
use image::RgbImage;

/// One scripted page for [`FakeReader`].
pub struct FakePage {
    pub text: PageText,
    pub image: Option<RgbImage>,
}

impl FakePage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            text: PageText {
                width,
                height,
                has_image: false,
                runs: Vec::new(),
            },
            image: None,
        }
    }

    pub fn with_image(mut self) -> Self {
        self.text.has_image = true;
        self.image = Some(RgbImage::new(8, 8));
        self
    }

    pub fn with_run(mut self, text: &str) -> Self {
        self.text.runs.push(TextRun {
            x: 72.0,
            y: 100.0,
            size: 12.0,
            font: "Georgia".to_string(),
            color: 0,
            text: text.to_string(),
        });
        self
    }
}

/// An in-memory document standing in for a parsed PDF.
pub struct FakeReader {
    pub pages: Vec<FakePage>,
    pub outline: Vec<OutlineEntry>,
}

impl FakeReader {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            outline: Vec::new(),
        }
    }
}

impl DocumentReader for FakeReader {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<PageText> {
        Ok(self.pages[index].text.clone())
    }

    fn page_image(&self, index: usize) -> Result<Option<RgbImage>> {
        Ok(self.pages[index].image.clone())
    }

    fn outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.outline.clone())
    }
}
