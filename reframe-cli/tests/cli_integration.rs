use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::path::PathBuf;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn reframe_cmd() -> Command {
    let mut cmd = Command::cargo_bin("reframe").expect("Failed to find reframe binary");
    cmd.env_remove("REFRAME_FFMPEG")
        .env_remove("REFRAME_FFPROBE")
        .env_remove("REFRAME_OUTPUT_DIR");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    reframe_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("normalize"))
        .stdout(contains("probe"));
}

#[test]
fn test_normalize_requires_input() {
    reframe_cmd().arg("normalize").assert().failure().code(2);
}

#[test]
fn test_normalize_non_existent_input() -> Result<(), Box<dyn Error>> {
    let output_dir = tempdir()?;
    let non_existent_input = PathBuf::from("surely/this/does/not/exist/input.mp4");

    reframe_cmd()
        .arg("normalize")
        .arg(&non_existent_input)
        .arg("--output")
        .arg(output_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(contains("does not exist"));
    Ok(())
}

#[test]
fn test_normalize_rejects_unsupported_extension() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let input_file = input_dir.path().join("clip.webm");
    std::fs::write(&input_file, "dummy content")?;

    reframe_cmd()
        .arg("normalize")
        .arg(&input_file)
        .arg("-o")
        .arg(output_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Unsupported input"))
        .stderr(contains("mp4, mov, avi, mkv"));

    // Nothing was written.
    assert_eq!(std::fs::read_dir(output_dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_normalize_empty_directory() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    std::fs::write(input_dir.path().join("notes.txt"), "not a video")?;

    reframe_cmd()
        .arg("normalize")
        .arg(input_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(contains("No processable video files found"));
    Ok(())
}

#[test]
fn test_normalize_rejects_invalid_crf() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let input_file = input_dir.path().join("clip.mp4");
    std::fs::write(&input_file, "dummy content")?;

    reframe_cmd()
        .arg("normalize")
        .arg(&input_file)
        .arg("--crf")
        .arg("60")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("CRF must be between 0 and 51"));
    Ok(())
}

#[test]
fn test_normalize_missing_ffprobe() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let input_file = input_dir.path().join("clip.mov");
    std::fs::write(&input_file, "dummy content")?;

    reframe_cmd()
        .arg("normalize")
        .arg(&input_file)
        .arg("-o")
        .arg(output_dir.path())
        .arg("--ffprobe")
        .arg("/surely/not/here/ffprobe")
        .arg("--ffmpeg")
        .arg("/surely/not/here/ffmpeg")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Required dependency not found"));
    Ok(())
}

#[test]
fn test_probe_non_existent_file() {
    reframe_cmd()
        .arg("probe")
        .arg("surely/this/does/not/exist/clip.mp4")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("does not exist"));
}

#[test]
fn test_log_dir_receives_log_file() -> Result<(), Box<dyn Error>> {
    let log_dir = tempdir()?;

    reframe_cmd()
        .arg("--log-dir")
        .arg(log_dir.path())
        .arg("probe")
        .arg("surely/this/does/not/exist/clip.mp4")
        .assert()
        .failure()
        .code(1);

    let logs: Vec<_> = std::fs::read_dir(log_dir.path())?.collect::<Result<_, _>>()?;
    assert_eq!(logs.len(), 1);
    let name = logs[0].file_name().to_string_lossy().into_owned();
    assert!(name.starts_with("reframe_") && name.ends_with(".log"));
    Ok(())
}
