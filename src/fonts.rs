//! Font discovery for the package's `@font-face` rules.
//!
//! Fonts are provisioned manually: the operator drops `.ttf`/`.otf` files
//! whose stems match the font names used in the document into a directory,
//! and every file found there is copied into the package and declared in the
//! stylesheet. The set is static for the whole run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    TrueType,
    OpenType,
}

impl FontFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            FontFormat::TrueType => "application/x-font-ttf",
            FontFormat::OpenType => "application/vnd.ms-opentype",
        }
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ttf" => Some(FontFormat::TrueType),
            "otf" => Some(FontFormat::OpenType),
            _ => None,
        }
    }
}

/// A font binary discovered in the operator-provided directory.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    /// File stem; must match the font name referenced by the document's runs.
    pub name: String,
    pub path: PathBuf,
    pub format: FontFormat,
}

impl FontDescriptor {
    /// File name inside the package's `font/` directory.
    pub fn file_name(&self) -> String {
        match self.format {
            FontFormat::TrueType => format!("{}.ttf", self.name),
            FontFormat::OpenType => format!("{}.otf", self.name),
        }
    }
}

/// Scan a directory for TrueType/OpenType binaries, sorted by file name.
///
/// A missing directory yields an empty set rather than an error: the first
/// run of a new book legitimately has no fonts provisioned yet.
pub fn discover_fonts(dir: &Path) -> Result<Vec<FontDescriptor>> {
    let mut fonts = Vec::new();
    if !dir.is_dir() {
        return Ok(fonts);
    }

    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let Some(format) = FontFormat::from_extension(ext) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        fonts.push(FontDescriptor {
            name: stem.to_string(),
            path,
            format,
        });
    }
    Ok(fonts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_types() {
        assert_eq!(FontFormat::TrueType.media_type(), "application/x-font-ttf");
        assert_eq!(
            FontFormat::OpenType.media_type(),
            "application/vnd.ms-opentype"
        );
    }

    #[test]
    fn test_discover_fonts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Minion Pro.otf"), b"otf").unwrap();
        fs::write(dir.path().join("Arial.ttf"), b"ttf").unwrap();
        fs::write(dir.path().join("readme.txt"), b"not a font").unwrap();

        let fonts = discover_fonts(dir.path()).unwrap();
        assert_eq!(fonts.len(), 2);
        // Sorted by file name
        assert_eq!(fonts[0].name, "Arial");
        assert_eq!(fonts[0].format, FontFormat::TrueType);
        assert_eq!(fonts[0].file_name(), "Arial.ttf");
        assert_eq!(fonts[1].name, "Minion Pro");
        assert_eq!(fonts[1].file_name(), "Minion Pro.otf");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let fonts = discover_fonts(Path::new("/nonexistent/fonts")).unwrap();
        assert!(fonts.is_empty());
    }
}
