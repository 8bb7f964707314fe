// reframe-core/tests/discovery_tests.rs

use reframe_core::discovery::{collect_sources, find_processable_files};
use reframe_core::error::CoreError;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_processable_files() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input_dir = dir.path();

    File::create(input_dir.join("video1.mkv"))?;
    File::create(input_dir.join("video2.MOV"))?; // Case insensitive
    File::create(input_dir.join("video3.avi"))?;
    File::create(input_dir.join("video4.mp4"))?;
    File::create(input_dir.join("clip.webm"))?;
    File::create(input_dir.join("document.txt"))?;
    fs::create_dir(input_dir.join("subdir"))?;
    File::create(input_dir.join("subdir").join("nested_video.mkv"))?; // Not searched

    let files = find_processable_files(input_dir)?;
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["video1.mkv", "video2.MOV", "video3.avi", "video4.mp4"]);

    dir.close()?;
    Ok(())
}

#[test]
fn test_find_processable_files_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("document.txt"))?;
    fs::create_dir(dir.path().join("subdir"))?;

    match find_processable_files(dir.path()) {
        Err(CoreError::NoFilesFound) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_find_processable_files_nonexistent_dir() {
    let non_existent_path = PathBuf::from("surely_this_does_not_exist_42_integration");
    match find_processable_files(&non_existent_path) {
        Err(CoreError::Io(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn test_collect_sources_mixes_files_and_directories() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let batch_dir = dir.path().join("batch");
    fs::create_dir(&batch_dir)?;
    File::create(batch_dir.join("b.mp4"))?;
    File::create(batch_dir.join("a.mkv"))?;
    File::create(batch_dir.join("notes.txt"))?;
    let single = dir.path().join("single.MOV");
    File::create(&single)?;

    let sources = collect_sources(&[single.clone(), batch_dir.clone()])?;
    let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["single.MOV", "a.mkv", "b.mp4"]);
    assert_eq!(sources[0].path, single);
    Ok(())
}

#[test]
fn test_collect_sources_rejects_unsupported_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let good = dir.path().join("good.mp4");
    let bad = dir.path().join("bad.webm");
    File::create(&good)?;
    File::create(&bad)?;

    match collect_sources(&[good, bad.clone()]) {
        Err(CoreError::UnsupportedInput { path, allowed }) => {
            assert_eq!(path, bad);
            assert_eq!(allowed, "mp4, mov, avi, mkv");
        }
        other => panic!("Unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_collect_sources_rejects_duplicate_names() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("x"))?;
    fs::create_dir(dir.path().join("y"))?;
    let first = dir.path().join("x").join("clip.mp4");
    let second = dir.path().join("y").join("clip.mp4");
    File::create(&first)?;
    File::create(&second)?;

    match collect_sources(&[first, second]) {
        Err(CoreError::DuplicateSourceName(name)) => assert_eq!(name, "clip.mp4"),
        other => panic!("Unexpected result: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_collect_sources_missing_path() {
    match collect_sources(&[PathBuf::from("/no/such/input.mp4")]) {
        Err(CoreError::PathError(_)) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn test_collect_sources_skips_directory_without_videos() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let good = dir.path().join("good.mp4");
    File::create(&good)?;
    let extras = dir.path().join("extras");
    fs::create_dir(&extras)?;
    File::create(extras.join("notes.txt"))?;

    let sources = collect_sources(&[good.clone(), extras])?;
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].path, good);
    Ok(())
}

#[test]
fn test_collect_sources_only_empty_directories() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    File::create(dir.path().join("notes.txt"))?;

    match collect_sources(&[dir.path().to_path_buf()]) {
        Err(CoreError::NoFilesFound) => {}
        other => panic!("Unexpected result: {:?}", other),
    }
    Ok(())
}
