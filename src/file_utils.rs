use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

static SRT_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\s*\r?\n\d{2}:\d{2}:\d{2},\d{3}\s+-->\s+\d{2}:\d{2}:\d{2},\d{3}").unwrap());

static VTT_TIMING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3} --> \d{2}:\d{2}:\d{2}\.\d{3}").unwrap());

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a produced item
    // @params: output_dir, item name (may contain `/` for a sub-folder)
    // @errors: Names that are empty or would leave output_dir
    pub fn output_path<P: AsRef<Path>>(output_dir: P, item_name: &str) -> Result<PathBuf> {
        let mut path = output_dir.as_ref().to_path_buf();
        let mut segments = 0;

        for component in Path::new(item_name).components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    segments += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(anyhow!("Output name leaves the output directory: {:?}", item_name));
                }
            }
        }

        if segments == 0 {
            return Err(anyhow!("Output name is empty: {:?}", item_name));
        }
        Ok(path)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Detect whether a file is WebVTT, SubRip or a table in the given format
    pub fn detect_file_type<P: AsRef<Path>>(path: P, table_extension: &str) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            match ext_str.as_str() {
                "vtt" => return Ok(FileType::Vtt),
                "srt" => return Ok(FileType::Srt),
                ext if ext == table_extension => return Ok(FileType::Table),
                _ => {}
            }
        }

        // Fall back to examining file contents
        if let Ok(content) = fs::read_to_string(path) {
            if content.trim_start_matches('\u{feff}').starts_with("WEBVTT") || VTT_TIMING_REGEX.is_match(&content) {
                return Ok(FileType::Vtt);
            }
            if content.contains("-->") && SRT_BLOCK_REGEX.is_match(&content) {
                return Ok(FileType::Srt);
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// WebVTT subtitle file
    Vtt,
    /// SubRip subtitle file
    Srt,
    /// Table file in the configured codec's format
    Table,
    /// Unknown file type
    Unknown,
}
