//! nb4llm-batch: File and directory conversion for nb4llm
//!
//! This crate provides:
//! - Single-file conversion in either direction
//! - Batch conversion of a directory with parallel processing
//!
//! Conversions are done fully in memory; a destination file is only written
//! once its content is complete.

use nb4llm_core::{EncodeOptions, NotebookError, ipynb_to_text, text_to_ipynb};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during file conversion
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid notebook {file}: {source}")]
    Notebook {
        file: PathBuf,
        #[source]
        source: NotebookError,
    },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Default extension of flat text files
pub const DEFAULT_TEXT_EXTENSION: &str = "txt";

/// Notebook file extension
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Notebook to flat text
    #[default]
    Forward,
    /// Flat text to notebook
    Reverse,
}

/// Options for converting a single file
#[derive(Debug, Clone)]
pub struct FileConvertOptions {
    pub direction: Direction,
    /// Extension of flat text files (without the dot)
    pub text_extension: String,
    pub encode: EncodeOptions,
}

impl Default for FileConvertOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            text_extension: DEFAULT_TEXT_EXTENSION.to_string(),
            encode: EncodeOptions::default(),
        }
    }
}

impl FileConvertOptions {
    /// Extension of the files read in this direction
    pub fn source_extension(&self) -> &str {
        match self.direction {
            Direction::Forward => NOTEBOOK_EXTENSION,
            Direction::Reverse => &self.text_extension,
        }
    }

    /// Extension of the files written in this direction
    pub fn target_extension(&self) -> &str {
        match self.direction {
            Direction::Forward => &self.text_extension,
            Direction::Reverse => NOTEBOOK_EXTENSION,
        }
    }

    /// Default output path for `input`: the source extension swapped for the
    /// target extension
    ///
    /// Extensions may contain dots (`nb.txt`), so the whole suffix is replaced
    /// rather than only the part after the last dot.
    pub fn default_output(&self, input: &Path) -> PathBuf {
        let target = self.target_extension();
        let stem = input
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| strip_extension(name, self.source_extension()));

        match stem {
            Some(stem) => input.with_file_name(format!("{stem}.{target}")),
            None => input.with_extension(target),
        }
    }
}

/// File name without its `.extension` suffix (ASCII case-insensitive), or
/// `None` when the name does not end with it or nothing would be left
fn strip_extension<'a>(name: &'a str, extension: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(extension.len() + 1)?;
    if split == 0 || !name.is_char_boundary(split) {
        return None;
    }

    let (stem, suffix) = name.split_at(split);
    let ext = suffix.strip_prefix('.')?;
    ext.eq_ignore_ascii_case(extension).then_some(stem)
}

/// Options for directory conversion
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Output directory (relative layout of the input is mirrored)
    pub output_dir: PathBuf,
    /// Process subdirectories
    pub recursive: bool,
    /// Number of parallel jobs (None = use all CPUs)
    pub parallel_jobs: Option<usize>,
    pub file: FileConvertOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            recursive: false,
            parallel_jobs: None,
            file: FileConvertOptions::default(),
        }
    }
}

/// Result of a directory conversion
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Number of successfully converted files
    pub success_count: usize,
    /// Files that failed to convert, with their errors
    pub failed_files: Vec<(PathBuf, String)>,
    /// Output files that were created
    pub output_files: Vec<PathBuf>,
}

/// Convert one file and write the result to `output`
///
/// The header name of generated text is the input's file name.
pub fn convert_file(input: &Path, output: &Path, options: &FileConvertOptions) -> Result<PathBuf> {
    tracing::debug!(input = %input.display(), output = %output.display(), "converting");

    let content = fs::read_to_string(input)?;

    let converted = match options.direction {
        Direction::Forward => {
            let display_name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ipynb_to_text(&content, &display_name, &options.encode)
        }
        Direction::Reverse => text_to_ipynb(&content),
    }
    .map_err(|source| BatchError::Notebook {
        file: input.to_path_buf(),
        source,
    })?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(output, converted)?;

    Ok(output.to_path_buf())
}

/// Convert every source file in a directory
///
/// Per-file failures are collected in the result rather than aborting the
/// batch.
pub fn convert_directory(input: &Path, options: &BatchOptions) -> Result<BatchResult> {
    if !input.is_dir() {
        return Err(BatchError::DirectoryNotFound(input.to_path_buf()));
    }

    let files = collect_source_files(input, options.file.source_extension(), options.recursive)?;
    tracing::debug!(count = files.len(), dir = %input.display(), "collected source files");

    if files.is_empty() {
        return Ok(BatchResult::default());
    }

    fs::create_dir_all(&options.output_dir)?;

    let convert_all = || -> Vec<std::result::Result<PathBuf, (PathBuf, String)>> {
        files
            .par_iter()
            .map(|file| {
                let relative = file.strip_prefix(input).unwrap_or(file);
                let output = options.file.default_output(&options.output_dir.join(relative));

                convert_file(file, &output, &options.file).map_err(|e| (file.clone(), e.to_string()))
            })
            .collect()
    };

    // A local pool keeps the job limit from leaking into the global pool
    let results = match options.parallel_jobs {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()?
            .install(convert_all),
        None => convert_all(),
    };

    let mut result = BatchResult::default();
    for outcome in results {
        match outcome {
            Ok(output) => {
                result.success_count += 1;
                result.output_files.push(output);
            }
            Err(failure) => result.failed_files.push(failure),
        }
    }

    Ok(result)
}

/// Collect all files with `extension` in a directory (case-insensitive),
/// sorted by path
pub fn collect_source_files(dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && strip_extension(name, extension).is_some()
            {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_source_files(&path, extension, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}
