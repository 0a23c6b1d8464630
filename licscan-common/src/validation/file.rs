//! Candidate manifest file validation
//!
//! Rules are evaluated in a fixed order and evaluation stops at the first
//! failure:
//! 1. Declared MIME type must be exactly [`ALLOWED_MIME_TYPE`]
//! 2. Filename must end with [`ALLOWED_EXTENSION`] (case-sensitive)
//! 3. Size must not exceed [`MAX_FILE_SIZE_BYTES`] (equality is accepted)

use std::fmt;
use thiserror::Error;

/// The only MIME type accepted for an uploaded manifest
pub const ALLOWED_MIME_TYPE: &str = "text/plain";

/// Required filename suffix
pub const ALLOWED_EXTENSION: &str = ".txt";

/// Upload ceiling in bytes (1 MiB)
pub const MAX_FILE_SIZE_BYTES: u64 = 1024 * 1024;

/// A file the user picked, before it is accepted
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Filename as reported by the browser
    pub name: String,
    /// Declared MIME type as reported by the browser
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    /// File content
    pub content: Vec<u8>,
}

impl CandidateFile {
    /// Build a candidate from uploaded bytes; size is taken from the content
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Build a candidate whose content was not kept
    ///
    /// Used when an upload is already past [`MAX_FILE_SIZE_BYTES`]: the
    /// bytes are counted but not stored, and validation only needs the size.
    pub fn without_content(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            content: Vec::new(),
        }
    }
}

// Content is omitted: manifests can be large and are not useful in logs.
impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish()
    }
}

/// Reason a candidate file was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    /// Declared MIME type is not text/plain
    #[error("Invalid file type \"{found}\". Please upload a plain text (.txt) file.")]
    MimeType { found: String },

    /// Filename does not end with .txt
    #[error("Invalid file extension. The file name must end with .txt.")]
    Extension,

    /// File is larger than the upload ceiling
    #[error("File is too large ({size} bytes). The maximum size is {max} bytes.")]
    TooLarge { size: u64, max: u64 },
}

/// Validate a candidate file against the upload rules
///
/// # Examples
///
/// ```
/// use licscan_common::validation::file::{validate_file, CandidateFile, FileRejection};
///
/// let ok = CandidateFile::new("requirements.txt", "text/plain", b"requests==2.31.0\n".to_vec());
/// assert!(validate_file(&ok).is_ok());
///
/// let csv = CandidateFile::new("deps.csv", "text/csv", Vec::new());
/// assert!(matches!(validate_file(&csv), Err(FileRejection::MimeType { .. })));
/// ```
pub fn validate_file(file: &CandidateFile) -> Result<(), FileRejection> {
    if file.mime_type != ALLOWED_MIME_TYPE {
        return Err(FileRejection::MimeType {
            found: file.mime_type.clone(),
        });
    }

    if !file.name.ends_with(ALLOWED_EXTENSION) {
        return Err(FileRejection::Extension);
    }

    if file.size > MAX_FILE_SIZE_BYTES {
        return Err(FileRejection::TooLarge {
            size: file.size,
            max: MAX_FILE_SIZE_BYTES,
        });
    }

    Ok(())
}
