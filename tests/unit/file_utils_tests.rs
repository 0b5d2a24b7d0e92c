/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use subtab::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that output_path nests item names with folders
#[test]
fn test_output_path_withNestedItem_shouldJoinEachPart() -> Result<()> {
    let path = FileManager::output_path("/tmp/out", "ep1/3.json")?;
    assert_eq!(path, Path::new("/tmp/out/ep1/3.json"));
    assert_eq!(FileManager::output_path("/tmp/out", "./a.vtt")?, Path::new("/tmp/out/a.vtt"));
    Ok(())
}

/// Test that output_path refuses names that leave the output folder
#[test]
fn test_output_path_withEscapingName_shouldFail() {
    assert!(FileManager::output_path("/tmp/out", "../../escaped.json").is_err());
    assert!(FileManager::output_path("/tmp/out", "ep1/../../x.json").is_err());
    assert!(FileManager::output_path("/tmp/out", "/etc/passwd").is_err());
    assert!(FileManager::output_path("/tmp/out", "").is_err());
}

/// Test that find_files searches recursively and ignores case
#[test]
fn test_find_files_withNestedDirs_shouldFindMatchingExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(temp_dir.path(), "a.vtt", "WEBVTT")?;
    common::create_test_file(&nested, "b.VTT", "WEBVTT")?;
    common::create_test_file(temp_dir.path(), "c.srt", "1")?;

    let found = FileManager::find_files(temp_dir.path(), ".vtt")?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("vtt"))));

    Ok(())
}

/// Test type detection by extension and by content
#[test]
fn test_detect_file_type_shouldUseExtensionThenContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let vtt = common::create_test_file(dir, "a.vtt", "")?;
    let table = common::create_test_file(dir, "t.json", "{}")?;
    let sniffed_vtt = common::create_test_file(dir, "captions.txt", common::SAMPLE_VTT)?;
    let sniffed_srt = common::create_test_file(dir, "subs.txt", common::SAMPLE_SRT)?;
    let unknown = common::create_test_file(dir, "notes.txt", "just text")?;

    assert_eq!(FileManager::detect_file_type(&vtt, "json")?, FileType::Vtt);
    assert_eq!(FileManager::detect_file_type(&table, "json")?, FileType::Table);
    assert_eq!(FileManager::detect_file_type(&sniffed_vtt, "json")?, FileType::Vtt);
    assert_eq!(FileManager::detect_file_type(&sniffed_srt, "json")?, FileType::Srt);
    assert_eq!(FileManager::detect_file_type(&unknown, "json")?, FileType::Unknown);
    assert!(FileManager::detect_file_type(dir.join("missing.srt"), "json").is_err());

    Ok(())
}
