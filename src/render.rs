//! Fixed-layout page rendering.
//!
//! [`render_page`] is a pure function over one page's extracted content: it
//! emits a self-contained XHTML fragment with a fixed-size body, an optional
//! full-bleed background image, and one absolutely-positioned `<div>` per
//! text run. Accumulated state (the image-id counter, the set of font names
//! seen in the document) lives in a [`RenderContext`] owned by the package
//! assembler and threaded through each call.

use std::fmt::Write;

use crate::doc::{PageRole, PageText};
use crate::package::ManifestEntry;
use crate::util::{escape_xml, fmt_px, hex_color, is_all_caps, title_case};

/// Mutable accumulator state for the page loop.
#[derive(Debug, Default)]
pub struct RenderContext {
    /// Increments once per page that carries a background image.
    pub image_counter: usize,
    /// Font names encountered in the document, in first-seen order, for the
    /// operator's provisioning report.
    pub discovered_fonts: Vec<String>,
}

impl RenderContext {
    pub fn record_font(&mut self, name: &str) {
        if !name.is_empty() && !self.discovered_fonts.iter().any(|f| f == name) {
            self.discovered_fonts.push(name.to_string());
        }
    }
}

/// Output of rendering one page.
#[derive(Debug)]
pub struct RenderedPage {
    pub xhtml: String,
    /// Manifest entry for this page's extracted background. Always `None`
    /// for the cover (its image is registered separately as `cover-image`)
    /// and for pages without an embedded image.
    pub image_entry: Option<ManifestEntry>,
}

/// Render one page into a fixed-layout XHTML fragment.
///
/// `cover_file_name` is the file name the externally supplied cover image
/// keeps inside `OEBPS/image/`; the cover page references it instead of an
/// extracted raster.
pub fn render_page(
    page: &PageText,
    role: PageRole,
    language: &str,
    cover_file_name: &str,
    ctx: &mut RenderContext,
) -> RenderedPage {
    let width = fmt_px(page.width);
    let height = fmt_px(page.height);
    let label = role.label();
    let title = escape_xml(&role.title());

    let mut xhtml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{language}" xml:lang="{language}">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width={width},height={height}" />
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="css/style.css" />
</head>
<body style="width:{width}px;height:{height}px; position:relative; overflow: hidden;">
<span epub:type="pagebreak" id="page{label}" role="doc-pagebreak" aria-label="Page {label}." />
"#
    );

    let mut image_entry = None;
    if page.has_image {
        let image_file = if role.is_cover() {
            cover_file_name.to_string()
        } else {
            format!("{}.jpg", role.name())
        };
        let _ = writeln!(
            xhtml,
            r#"<img alt="{title}" src="image/{src}" style="position:absolute; left:0px; top:0px; width:{width}px; height:{height}px; z-index: -1;" />"#,
            src = escape_xml(&image_file),
        );
        if !role.is_cover() {
            image_entry = Some(ManifestEntry {
                id: format!("image_{}", ctx.image_counter),
                href: format!("image/{image_file}"),
                media_type: "image/jpeg".to_string(),
            });
        }
        ctx.image_counter += 1;
    }

    for run in &page.runs {
        ctx.record_font(&run.font);
        if run.text.is_empty() {
            continue;
        }

        let top = run.y - run.size;
        let color = if run.color != 0 {
            format!(" color:{};", hex_color(run.color))
        } else {
            String::new()
        };
        let font = escape_xml(&run.font);

        if is_all_caps(&run.text) {
            let _ = writeln!(
                xhtml,
                r#"<div style="left:{:.2}px; top:{:.2}px; font-size:{:.2}px; font-family:'{font}';{color}"><p><span class="upper">{}</span></p></div>"#,
                run.x,
                top,
                run.size,
                escape_xml(&title_case(&run.text)),
            );
        } else {
            let _ = writeln!(
                xhtml,
                r#"<div style="left:{:.2}px; top:{:.2}px; font-size:{:.2}px; font-family:'{font}';{color}"><p>{}</p></div>"#,
                run.x,
                top,
                run.size,
                escape_xml(&run.text),
            );
        }
    }

    xhtml.push_str("</body></html>\n");

    RenderedPage { xhtml, image_entry }
}
