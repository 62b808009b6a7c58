//! Message attachments.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MailError;

/// How the attachment is presented to the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttachmentType {
    /// Downloadable file
    #[default]
    Attachment,
    /// Embedded in HTML via `cid:`
    Inline,
}

/// A binary blob with a filename.
///
/// Created from bytes (eager) or from a file path (lazy, read when the
/// driver assembles the message).
///
/// ```
/// use courier::Attachment;
///
/// let report = Attachment::from_bytes("report.pdf", b"%PDF".to_vec());
/// assert_eq!(report.content_type, "application/pdf");
///
/// let logo = Attachment::from_bytes("logo.png", vec![0x89, 0x50])
///     .inline()
///     .content_id("company-logo");
/// assert!(logo.is_inline());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    /// MIME content type, guessed from the filename unless set explicitly
    pub content_type: String,
    /// Raw data (empty for path-based attachments)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<u8>,
    #[serde(default)]
    pub path: Option<String>,
    pub disposition: AttachmentType,
    /// Content-ID for inline attachments
    pub content_id: Option<String>,
}

impl Attachment {
    /// Create an attachment from raw bytes.
    pub fn from_bytes(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename);

        Self {
            filename,
            content_type,
            data,
            path: None,
            disposition: AttachmentType::Attachment,
            content_id: None,
        }
    }

    /// Create an attachment from a file path, reading it immediately.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MailError> {
        let path = path.as_ref();
        let data = read_file(path)?;

        Ok(Self {
            filename: file_name(path),
            content_type: guess_content_type(path),
            data,
            path: None,
            disposition: AttachmentType::Attachment,
            content_id: None,
        })
    }

    /// Create an attachment from a file path, deferring the read until
    /// [`get_data`](Self::get_data) is called.
    pub fn from_path_lazy(path: impl AsRef<Path>) -> Result<Self, MailError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MailError::AttachmentFileNotFound(
                path.display().to_string(),
            ));
        }

        Ok(Self {
            filename: file_name(path),
            content_type: guess_content_type(path),
            data: Vec::new(),
            path: Some(path.to_string_lossy().to_string()),
            disposition: AttachmentType::Attachment,
            content_id: None,
        })
    }

    /// Set the content type explicitly.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Mark as inline. The content id defaults to the filename.
    pub fn inline(mut self) -> Self {
        self.disposition = AttachmentType::Inline;
        if self.content_id.is_none() {
            self.content_id = Some(self.filename.clone());
        }
        self
    }

    /// Set the Content-ID referenced as `cid:<id>` from HTML.
    pub fn content_id(mut self, cid: impl Into<String>) -> Self {
        self.content_id = Some(cid.into());
        self
    }

    /// Get the attachment data, loading from path if necessary.
    ///
    /// # Errors
    ///
    /// - `AttachmentFileNotFound` - file path doesn't exist
    /// - `AttachmentReadError` - failed to read file
    /// - `AttachmentMissingContent` - no data and no path
    pub fn get_data(&self) -> Result<Vec<u8>, MailError> {
        match self.path {
            Some(ref path) => read_file(Path::new(path)),
            None if self.data.is_empty() => {
                Err(MailError::AttachmentMissingContent(self.filename.clone()))
            }
            None => Ok(self.data.clone()),
        }
    }

    /// Size in bytes; path-based attachments are stat'ed.
    pub fn get_size(&self) -> Result<usize, MailError> {
        match self.path {
            Some(ref path) => std::fs::metadata(path)
                .map(|m| m.len() as usize)
                .map_err(|e| MailError::AttachmentError(e.to_string())),
            None => Ok(self.data.len()),
        }
    }

    pub fn is_lazy(&self) -> bool {
        self.path.is_some()
    }

    pub fn is_inline(&self) -> bool {
        self.disposition == AttachmentType::Inline
    }
}

fn guess_content_type(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string()
}

fn read_file(path: &Path) -> Result<Vec<u8>, MailError> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MailError::AttachmentFileNotFound(path.display().to_string())
        } else {
            MailError::AttachmentReadError(format!("{}: {}", path.display(), e))
        }
    })
}
