//! Page background extraction: one JPEG per non-cover page that carries
//! image content, written into the package's image directory.

use std::path::Path;

use tracing::{debug, warn};

use crate::doc::{DocumentReader, PageRole};
use crate::error::Result;

/// Save the rendered background of every non-cover page into `image_dir`.
///
/// The cover page is skipped; its artwork comes from the externally supplied
/// cover file. Pages whose extraction or encoding fails are logged and
/// skipped so one bad page cannot sink the whole run. Returns the number of
/// images written.
pub fn extract_page_images(reader: &dyn DocumentReader, image_dir: &Path) -> Result<usize> {
    let mut written = 0;
    for index in 0..reader.page_count() {
        let role = PageRole::from_index(index);
        if role.is_cover() {
            continue;
        }
        let image = match reader.page_image(index) {
            Ok(Some(image)) => image,
            Ok(None) => continue,
            Err(e) => {
                warn!(page = index, error = %e, "skipping page image");
                continue;
            }
        };
        let path = image_dir.join(format!("{}.jpg", role.name()));
        if let Err(e) = image.save_with_format(&path, image::ImageFormat::Jpeg) {
            warn!(page = index, error = %e, "skipping page image");
            continue;
        }
        debug!(path = %path.display(), "wrote page image");
        written += 1;
        // `image` is dropped here; only one page buffer is live at a time.
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{OutlineEntry, PageText};
    use image::RgbImage;

    struct ThreePageReader;

    impl DocumentReader for ThreePageReader {
        fn page_count(&self) -> usize {
            3
        }

        fn page_text(&self, _index: usize) -> Result<PageText> {
            Ok(PageText::default())
        }

        fn page_image(&self, index: usize) -> Result<Option<RgbImage>> {
            // Page 2 has no background.
            if index == 2 {
                Ok(None)
            } else {
                Ok(Some(RgbImage::new(4, 4)))
            }
        }

        fn outline(&self) -> Result<Vec<OutlineEntry>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_unwritable_page_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not_created");
        let written = extract_page_images(&ThreePageReader, &missing).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn test_skips_cover_and_empty_pages() {
        let dir = tempfile::tempdir().unwrap();
        let written = extract_page_images(&ThreePageReader, dir.path()).unwrap();
        assert_eq!(written, 1);
        assert!(dir.path().join("page_1.jpg").exists());
        assert!(!dir.path().join("cover.jpg").exists());
        assert!(!dir.path().join("page_2.jpg").exists());
    }
}
