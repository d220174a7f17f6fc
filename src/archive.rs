//! Final container packaging: zip the package tree into the `.epub`.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::package::MIMETYPE;

/// Package the tree at `tree` into an EPUB container at `epub_path`.
///
/// The `mimetype` member is written first and stored uncompressed, as the
/// container format requires; everything else is deflated. Directory walks
/// are sorted so repeated runs produce identical member ordering.
pub fn zip_dir(tree: &Path, epub_path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(epub_path)?);
    let mut zip = ZipWriter::new(file);

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file("mimetype", stored)?;
    zip.write_all(MIMETYPE)?;

    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    add_dir(&mut zip, tree, tree, deflated)?;

    zip.finish()?;
    info!(path = %epub_path.display(), "wrote epub");
    Ok(())
}

fn add_dir(
    zip: &mut ZipWriter<BufWriter<File>>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            add_dir(zip, root, &path, options)?;
            continue;
        }
        let name = match path.strip_prefix(root) {
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };
        // The mimetype marker is already in place, and a stray output epub
        // inside the tree must never be packaged into itself.
        if name == "mimetype" || name.ends_with(".epub") {
            continue;
        }
        zip.start_file(name, options)?;
        let mut reader = File::open(&path)?;
        io::copy(&mut reader, zip)?;
    }
    Ok(())
}
