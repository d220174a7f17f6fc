//! Package assembly: directory skeleton, package document, navigation,
//! stylesheet, and the per-page loop.
//!
//! The assembler owns all manifest/spine state for a run. It drives page
//! iteration, calls the renderer per page, accumulates the returned manifest
//! fragments, and finally emits every structural file of the package.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::doc::{DocumentReader, OutlineEntry, PageRole};
use crate::error::Result;
use crate::fonts::{FontDescriptor, discover_fonts};
use crate::render::{RenderContext, render_page};
use crate::util::{current_timestamp, escape_xml, title_case};

/// The literal mimetype marker; must be the archive's first entry, stored.
pub(crate) const MIMETYPE: &[u8] = b"application/epub+zip";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>
"#;

/// A declared package resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

/// Which side of a two-page spread a page lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSpread {
    Left,
    Right,
}

impl PageSpread {
    pub fn property(self) -> &'static str {
        match self {
            PageSpread::Left => "page-spread-left",
            PageSpread::Right => "page-spread-right",
        }
    }
}

/// One reading-order entry; one per page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineEntry {
    pub idref: String,
    pub spread: PageSpread,
}

/// Spread side for a page index: alternating, cover always left.
pub(crate) fn spread_for_index(index: usize) -> PageSpread {
    if index == 0 {
        PageSpread::Left
    } else if index % 2 == 1 {
        PageSpread::Right
    } else {
        PageSpread::Left
    }
}

/// What a completed assembly produced.
#[derive(Debug)]
pub struct AssemblySummary {
    pub pages: usize,
    /// Font names seen in the document, for the operator's provisioning
    /// report; matching binaries must be supplied on a subsequent run.
    pub discovered_fonts: Vec<String>,
    pub tree_dir: PathBuf,
}

/// Owns directory and manifest state across a whole run.
pub struct PackageAssembler<'a> {
    config: &'a Config,
    manifest: Vec<ManifestEntry>,
    spine: Vec<SpineEntry>,
    fonts: Vec<FontDescriptor>,
    ctx: RenderContext,
    /// Dimensions of the last page seen; used for the package's declared
    /// resolution and the stylesheet's body rule.
    page_size: (f32, f32),
}

impl<'a> PackageAssembler<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            manifest: Vec::new(),
            spine: Vec::new(),
            fonts: Vec::new(),
            ctx: RenderContext::default(),
            page_size: (0.0, 0.0),
        }
    }

    /// Build the complete package tree for `reader` under the configured
    /// output directory.
    pub fn assemble(&mut self, reader: &dyn DocumentReader) -> Result<AssemblySummary> {
        self.create_skeleton()?;

        self.fonts = discover_fonts(&self.config.font_dir)?;
        debug!(fonts = self.fonts.len(), "provisioned font files");

        let oebps = self.config.oebps_dir();
        let page_count = reader.page_count();
        info!(pages = page_count, "processing pages");

        for index in 0..page_count {
            let role = PageRole::from_index(index);
            let page = reader.page_text(index)?;
            self.page_size = (page.width, page.height);

            let rendered = render_page(
                &page,
                role,
                &self.config.metadata.language,
                &self.config.cover_file_name(),
                &mut self.ctx,
            );
            fs::write(oebps.join(format!("{}.xhtml", role.name())), rendered.xhtml)?;

            self.manifest.push(ManifestEntry {
                id: format!("page_{index}"),
                href: format!("{}.xhtml", role.name()),
                media_type: "application/xhtml+xml".to_string(),
            });
            if let Some(entry) = rendered.image_entry {
                self.manifest.push(entry);
            }
            self.spine.push(SpineEntry {
                idref: format!("page_{index}"),
                spread: spread_for_index(index),
            });
        }

        self.copy_cover_image()?;

        let outline = reader.outline()?;
        fs::write(oebps.join("content.opf"), self.generate_opf())?;
        fs::write(oebps.join("nav.xhtml"), self.generate_nav(&outline))?;
        fs::write(oebps.join("css").join("style.css"), self.generate_css())?;
        self.copy_fonts()?;

        info!(tree = %self.config.tree_dir().display(), "package tree created");
        Ok(AssemblySummary {
            pages: page_count,
            discovered_fonts: self.ctx.discovered_fonts.clone(),
            tree_dir: self.config.tree_dir(),
        })
    }

    fn create_skeleton(&self) -> Result<()> {
        let tree = self.config.tree_dir();
        fs::create_dir_all(tree.join("META-INF"))?;
        let oebps = self.config.oebps_dir();
        fs::create_dir_all(oebps.join("font"))?;
        fs::create_dir_all(oebps.join("css"))?;
        fs::create_dir_all(oebps.join("image"))?;

        fs::write(tree.join("mimetype"), MIMETYPE)?;
        fs::write(tree.join("META-INF").join("container.xml"), CONTAINER_XML)?;
        Ok(())
    }

    /// Copy the externally supplied cover into the package and register it.
    /// A missing cover is reported and skipped rather than aborting the run.
    fn copy_cover_image(&mut self) -> Result<()> {
        let cover = &self.config.cover_image;
        if !cover.exists() {
            warn!(path = %cover.display(), "cover image missing; package will have no cover entry");
            return Ok(());
        }
        let name = self.config.cover_file_name();
        fs::copy(cover, self.config.image_dir().join(&name))?;
        self.manifest.push(ManifestEntry {
            id: "cover-image".to_string(),
            href: format!("image/{name}"),
            media_type: "image/jpeg".to_string(),
        });
        Ok(())
    }

    fn copy_fonts(&self) -> Result<()> {
        let font_dir = self.config.oebps_dir().join("font");
        for font in &self.fonts {
            fs::copy(&font.path, font_dir.join(font.file_name()))?;
        }
        Ok(())
    }

    fn generate_opf(&self) -> String {
        debug_assert!(
            self.spine
                .iter()
                .all(|s| self.manifest.iter().any(|m| m.id == s.idref)),
            "spine references an id missing from the manifest"
        );

        let meta = &self.config.metadata;
        let (width, height) = self.page_size;
        let modified = meta
            .modified
            .clone()
            .unwrap_or_else(current_timestamp);

        let mut opf = format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" unique-identifier="bookid" prefix="schema: http://schema.org/ rendition: http://www.idpf.org/vocab/rendition/# ibooks: http://vocabulary.itunes.apple.com/rdf/ibooks/vocabulary-extensions-1.0/" xml:lang="{language}" xmlns="http://www.idpf.org/2007/opf">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title id="title">{title}</dc:title>
        <dc:creator id="creator1">{author}</dc:creator>
        <meta refines="#creator1" property="role" scheme="marc:relators">aut</meta>
        <dc:identifier id="epubISBN">{isbn}</dc:identifier>
        <dc:identifier id="bookid">urn:isbn:{isbn}</dc:identifier>
        <dc:publisher>{publisher}</dc:publisher>
        <dc:language>{language}</dc:language>
        <dc:date>{date}</dc:date>
        <dc:rights>{rights}</dc:rights>
        <dc:description>{description}</dc:description>

        <meta property="schema:accessibilityFeature">alternativeText</meta>
        <meta property="schema:accessibilityFeature">highContrastDisplay</meta>
        <meta property="schema:accessibilityFeature">readingOrder</meta>
        <meta property="schema:accessibilityFeature">structuralNavigation</meta>
        <meta property="schema:accessibilityFeature">pageNavigation</meta>
        <meta property="schema:accessibilityFeature">pageBreakMarkers</meta>
        <meta property="schema:accessibilityFeature">tableOfContents</meta>
        <meta property="schema:accessModeSufficient">visual</meta>
        <meta property="schema:accessMode">textual</meta>
        <meta property="schema:accessMode">visual</meta>
        <meta property="schema:accessibilityHazard">none</meta>
        <meta property="schema:accessibilitySummary">This publication includes some accessibility features. It conforms to WCAG 2.0 Level A.</meta>

        <meta property="dcterms:modified">{modified}</meta>
        <meta name="cover" content="cover-image" />
        <meta property="ibooks:specified-fonts">true</meta>
        <meta name="generator" content="folio" />

        <meta name="fixed-layout" content="true"/>
        <meta name="original-resolution" content="{width}x{height}"/>
        <meta property="rendition:spread">landscape</meta>
        <meta name="RegionMagnification" content="true"/>
        <meta property="rendition:layout">pre-paginated</meta>
    </metadata>
    <manifest>
        <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
        <item id="css" href="css/style.css" media-type="text/css"/>
"##,
            language = escape_xml(&meta.language),
            title = escape_xml(&meta.title),
            author = escape_xml(&meta.author),
            isbn = escape_xml(&meta.isbn),
            publisher = escape_xml(&meta.publisher),
            date = escape_xml(&meta.date),
            rights = escape_xml(&meta.rights),
            description = escape_xml(&meta.description),
            modified = escape_xml(&modified),
            width = width as i64,
            height = height as i64,
        );

        for font in &self.fonts {
            opf.push_str(&format!(
                "        <item id=\"{}\" href=\"font/{}\" media-type=\"{}\"/>\n",
                escape_xml(&font.name),
                escape_xml(&font.file_name()),
                font.format.media_type(),
            ));
        }
        for entry in &self.manifest {
            opf.push_str(&format!(
                "        <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
                escape_xml(&entry.id),
                escape_xml(&entry.href),
                escape_xml(&entry.media_type),
            ));
        }

        opf.push_str("    </manifest>\n    <spine>\n");
        for entry in &self.spine {
            opf.push_str(&format!(
                "        <itemref idref=\"{}\" properties=\"{}\"/>\n",
                escape_xml(&entry.idref),
                entry.spread.property(),
            ));
        }
        opf.push_str("    </spine>\n</package>\n");
        opf
    }

    fn generate_nav(&self, outline: &[OutlineEntry]) -> String {
        let meta = &self.config.metadata;
        let language = escape_xml(&meta.language);
        let title = escape_xml(&meta.title);

        let mut points = String::new();
        for entry in outline {
            let href = format!("{}.xhtml", PageRole::from_index(entry.page).name());
            points.push_str(&format!(
                "                <li><a href=\"{href}\">{}</a></li>\n",
                escape_xml(&title_case(&entry.title)),
            ));
        }

        format!(
            r#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{language}" xml:lang="{language}">
    <head>
        <title>Nav Contents</title>
    </head>
    <body>
        <nav id="toc" role="doc-toc" epub:type="toc">
            <h1>Contents</h1>
            <ol>
                <li><a href="cover.xhtml">Cover</a></li>
                <li><a href="page_1.xhtml">Digital Rights</a></li>
                <li><a href="page_1.xhtml">Title Page</a></li>
                <li><a href="page_1.xhtml">Copyright Page</a></li>
                <li><a href="page_1.xhtml">Start</a></li>
{points}            </ol>
        </nav>
        <nav aria-labelledby="nav_landmarks" id="landmarks" epub:type="landmarks">
            <h1 id="nav_landmarks">Landmarks</h1>
            <ol>
                <li><a epub:type="cover" href="cover.xhtml">Cover</a></li>
                <li><a epub:type="frontmatter" href="page_1.xhtml">Statement of Digital Rights</a></li>
                <li><a epub:type="bodymatter" href="page_1.xhtml">{title}</a></li>
                <li><a epub:type="backmatter" href="page_1.xhtml">Copyright</a></li>
            </ol>
        </nav>
    </body>
</html>
"#
        )
    }

    fn generate_css(&self) -> String {
        let (width, height) = self.page_size;
        let mut css = String::new();

        for font in &self.fonts {
            css.push_str(&format!(
                r#"@font-face {{
    font-family: "{}";
    font-style: normal;
    font-weight: normal;
    src: url("../font/{}");
}}
"#,
                font.name,
                font.file_name(),
            ));
        }

        css.push_str(&format!(
            r#"body, div, dl, dt, dd, h1, h2, h3, h4, h5, h6, p, pre, code, blockquote, figure {{
    margin: 0;
    padding: 0;
    border-width: 0;
    text-rendering: optimizeSpeed;
}}

body {{
    width: {width}px;
    height: {height}px;
    position: relative;
    overflow: hidden;
}}

div {{
    position: absolute;
    white-space: pre;
    -webkit-user-select: text;
    -moz-user-select: text;
    -ms-user-select: text;
    user-select: text;
    overflow: visible;
}}

img {{
    position: absolute;
    z-index: -1;
}}

.upper,
strong {{
    font-weight: normal;
    text-transform: uppercase;
}}
"#,
            width = width as i64,
            height = height as i64,
        ));
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_alternation() {
        assert_eq!(spread_for_index(0), PageSpread::Left);
        assert_eq!(spread_for_index(1), PageSpread::Right);
        assert_eq!(spread_for_index(2), PageSpread::Left);
        assert_eq!(spread_for_index(3), PageSpread::Right);
    }

    #[test]
    fn test_spread_properties() {
        assert_eq!(PageSpread::Left.property(), "page-spread-left");
        assert_eq!(PageSpread::Right.property(), "page-spread-right");
    }

    #[test]
    fn test_mimetype_literal() {
        // No trailing newline.
        assert_eq!(MIMETYPE, b"application/epub+zip");
        assert_eq!(MIMETYPE.len(), 20);
    }
}
