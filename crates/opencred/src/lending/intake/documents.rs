use std::fs;
use std::path::{Path, PathBuf};

use mime::Mime;
use serde::{Deserialize, Serialize};

/// Upper bound for a single uploaded document.
pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

const ACCEPTED_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Document slots on the application form, in summary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    Pan,
    Aadhaar,
    BankStatement,
    SalarySlips,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 4] = [
        DocumentSlot::Pan,
        DocumentSlot::Aadhaar,
        DocumentSlot::BankStatement,
        DocumentSlot::SalarySlips,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            DocumentSlot::Pan => "PAN",
            DocumentSlot::Aadhaar => "Aadhaar",
            DocumentSlot::BankStatement => "Bank Statement",
            DocumentSlot::SalarySlips => "Salary Slips",
        }
    }

    pub const fn is_required(self) -> bool {
        matches!(self, DocumentSlot::Pan | DocumentSlot::Aadhaar)
    }
}

/// Metadata of a document picked for upload. Contents are never sent; only the file
/// name reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: Mime,
    pub size_bytes: u64,
}

impl UploadedDocument {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Mime,
        size_bytes: u64,
    ) -> Result<Self, DocumentError> {
        let essence = content_type.essence_str();
        if !ACCEPTED_TYPES.iter().any(|accepted| *accepted == essence) {
            return Err(DocumentError::UnsupportedType {
                content_type: content_type.essence_str().to_string(),
            });
        }
        if size_bytes > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge { size_bytes });
        }

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            size_bytes,
        })
    }

    /// Inspect a local file, guessing its type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::new(file_name, content_type, metadata.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Please upload a valid document (JPG, PNG, or PDF)")]
    UnsupportedType { content_type: String },
    #[error("File size must be less than 5MB")]
    TooLarge { size_bytes: u64 },
    #[error("unable to read document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
