// File Operations for RSA Encryption/Decryption
// Whole-file binary reads and writes used by the command line

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use thiserror::Error;

/// Errors that can occur during file operations
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to open {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("File path cannot be empty")]
    EmptyPath,
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Trim whitespace and one pair of surrounding quotes, as pasted paths often carry them
pub fn normalize_path(input: &str) -> FileResult<String> {
    let trimmed = input.trim();
    let unquoted = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    if unquoted.is_empty() {
        return Err(FileError::EmptyPath);
    }
    Ok(unquoted.to_string())
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> FileResult<Vec<u8>> {
    let display = path.display().to_string();
    let mut file = File::open(path).map_err(|source| FileError::Open {
        path: display.clone(),
        source,
    })?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|source| FileError::Read { path: display, source })?;
    Ok(data)
}

/// Read a text file (PEM keys, ciphertext)
pub fn read_text_file(path: &Path) -> FileResult<String> {
    let bytes = read_file(path)?;
    String::from_utf8(bytes).map_err(|e| FileError::Read {
        path: path.display().to_string(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

/// Write data to file, replacing any previous contents
pub fn write_file(path: &Path, data: &[u8]) -> FileResult<()> {
    let display = path.display().to_string();
    let mut file = File::create(path).map_err(|source| FileError::Open {
        path: display.clone(),
        source,
    })?;
    file.write_all(data)
        .map_err(|source| FileError::Write { path: display, source })?;
    Ok(())
}

/// Format file size for display
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
