use std::fs::{self, File};
use std::io::Read;

use folio::archive::zip_dir;
use zip::CompressionMethod;

fn build_tree(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("META-INF")).unwrap();
    fs::create_dir_all(dir.join("OEBPS").join("css")).unwrap();
    fs::write(dir.join("mimetype"), b"application/epub+zip").unwrap();
    fs::write(dir.join("META-INF").join("container.xml"), "<container/>").unwrap();
    fs::write(dir.join("OEBPS").join("content.opf"), "<package/>").unwrap();
    fs::write(dir.join("OEBPS").join("css").join("style.css"), "body {}").unwrap();
}

#[test]
fn test_mimetype_is_first_and_stored() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("book_html");
    build_tree(&tree);

    let epub = dir.path().join("book.epub");
    zip_dir(&tree, &epub).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&epub).unwrap()).unwrap();
    let mut first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), CompressionMethod::Stored);

    let mut contents = String::new();
    first.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "application/epub+zip");
}

#[test]
fn test_remaining_members_are_deflated() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("book_html");
    build_tree(&tree);

    let epub = dir.path().join("book.epub");
    zip_dir(&tree, &epub).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&epub).unwrap()).unwrap();
    let mut mimetype_count = 0;
    for i in 0..archive.len() {
        let member = archive.by_index(i).unwrap();
        if member.name() == "mimetype" {
            mimetype_count += 1;
            continue;
        }
        assert_eq!(member.compression(), CompressionMethod::Deflated, "{}", member.name());
        assert!(!member.name().contains('\\'));
    }
    assert_eq!(mimetype_count, 1);
}

#[test]
fn test_stray_epub_in_tree_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let tree = dir.path().join("book_html");
    build_tree(&tree);
    fs::write(tree.join("old.epub"), b"stale").unwrap();

    let epub = dir.path().join("book.epub");
    zip_dir(&tree, &epub).unwrap();

    let mut archive = zip::ZipArchive::new(File::open(&epub).unwrap()).unwrap();
    for i in 0..archive.len() {
        assert!(!archive.by_index(i).unwrap().name().ends_with(".epub"));
    }
}
