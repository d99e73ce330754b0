use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extensions the remote file store accepts for upload. Anything else is
/// materialized as a plain-text scratch copy before uploading.
pub const UPLOAD_ALLOWED_EXTENSIONS: &[&str] = &[
    "c", "cpp", "css", "csv", "doc", "docx", "gif", "go", "html", "java", "jpeg", "jpg", "js",
    "json", "md", "pdf", "php", "pkl", "png", "pptx", "py", "rb", "tar", "tex", "ts", "txt",
    "webp", "xlsx", "xml", "zip",
];

/// Directory for plain-text copies of files whose extension the upload
/// endpoint rejects. Shared across files; names derive from input stems.
pub const SCRATCH_DIR: &str = ".tmp_uploads";

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

    /// Find all `.vtt` files under a directory, recursively, in sorted path
    /// order. Sorting makes batch processing order deterministic.
    pub fn find_vtt_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("vtt"))
            {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Compute the output path for an input file: its path relative to the
    /// input root is mirrored onto the output root, with the extension
    /// changed to `.md`.
    pub fn mirror_output_path(
        input_file: &Path,
        input_root: &Path,
        output_root: &Path,
    ) -> Result<PathBuf> {
        let relative = input_file.strip_prefix(input_root).with_context(|| {
            format!(
                "Input file {:?} is not under input root {:?}",
                input_file, input_root
            )
        })?;

        let stem = input_file
            .file_stem()
            .ok_or_else(|| anyhow!("Input file has no stem: {:?}", input_file))?;

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(".md");

        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        Ok(output_root.join(parent).join(output_filename))
    }

    /// Whether the upload endpoint accepts this file's extension directly
    pub fn is_upload_allowed(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| UPLOAD_ALLOWED_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Materialize a plain-text scratch copy of `input_file` under
    /// `scratch_dir`, with the same stem and a `.txt` extension.
    /// Content is carried over unchanged.
    pub fn create_scratch_copy(input_file: &Path, scratch_dir: &Path) -> Result<PathBuf> {
        let stem = input_file
            .file_stem()
            .ok_or_else(|| anyhow!("Input file has no stem: {:?}", input_file))?;

        Self::ensure_dir(scratch_dir)?;

        let scratch_path = scratch_dir.join(format!("{}.txt", stem.to_string_lossy()));
        let content = Self::read_to_string(input_file)?;
        fs::write(&scratch_path, content)
            .with_context(|| format!("Failed to prepare upload file: {:?}", scratch_path))?;

        Ok(scratch_path)
    }

    /// Remove a scratch copy once the file's processing is done.
    /// Best-effort; a missing file is not an error.
    pub fn remove_scratch_copy(path: &Path) {
        let _ = fs::remove_file(path);
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed.
    /// Existing files are overwritten.
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
