use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::manifest::{Transcriptions, has_manifest, manifest_path};
use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("hwbench_input_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

#[test]
fn test_list_images_recursive_sorted_and_filtered() {
    let dir = make_temp_dir();
    touch(&dir.join("b.png"));
    touch(&dir.join("a/c.JPG"));
    touch(&dir.join("notes.txt"));
    touch(&dir.join("transcriptions.json"));

    let images = list_images(&dir).unwrap();
    assert_eq!(images, vec![dir.join("a/c.JPG"), dir.join("b.png")]);
}

#[test]
fn test_list_images_missing_dir() {
    let dir = make_temp_dir().join("absent");
    let err = list_images(&dir).unwrap_err();
    assert!(matches!(err, InputError::MissingInput(_)));
}

#[test]
fn test_open_folder_counts_images() {
    let dir = make_temp_dir();
    touch(&dir.join("w1.png"));
    touch(&dir.join("w2.png"));

    let source = FsDatasetSource::new(dir.join("refs"));
    let fakes = source.open_folder(&dir).unwrap();
    assert_eq!(fakes.len(), 2);
    assert!(!fakes.is_empty());
    assert_eq!(fakes.root, dir);
    assert_eq!(fakes.name, dir.display().to_string());
}

#[test]
fn test_open_reference_resolves_key_under_root() {
    let root = make_temp_dir();
    touch(&root.join("iam_words__reference/r1.png"));

    let source = FsDatasetSource::new(&root);
    let reals = source.open_reference("iam_words__reference").unwrap();
    assert_eq!(reals.name, "iam_words__reference");
    assert_eq!(reals.root, root.join("iam_words__reference"));
    assert_eq!(reals.len(), 1);
}

#[test]
fn test_open_reference_rejects_path_keys() {
    let source = FsDatasetSource::new(make_temp_dir());
    for key in ["", "..", "../escape", "a/b"] {
        let err = source.open_reference(key).unwrap_err();
        assert!(matches!(err, InputError::InvalidInput(_)), "key {key:?}");
    }
}

#[test]
fn test_manifest_written_with_relative_keys() {
    let dir = make_temp_dir();
    assert!(!has_manifest(&dir));

    let mut transcriptions = Transcriptions::new();
    transcriptions.insert(Path::new("words/a01.png"), "hello");
    transcriptions.insert(Path::new("b02.png"), "world");
    let path = transcriptions.write(&dir).unwrap();

    assert_eq!(path, manifest_path(&dir));
    assert!(has_manifest(&dir));

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["words/a01.png"], "hello");
    assert_eq!(raw["b02.png"], "world");

    let back = Transcriptions::read(&dir).unwrap();
    assert_eq!(back, transcriptions);
    assert_eq!(back.len(), 2);
}

#[test]
fn test_manifest_read_rejects_non_object() {
    let dir = make_temp_dir();
    fs::write(manifest_path(&dir), "[1, 2]").unwrap();
    let err = Transcriptions::read(&dir).unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
}
