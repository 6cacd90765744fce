//! The CV file a workflow holds between requests

use crate::error::{JobfoyuError, Result};
use crate::input::file_detector::FileType;
use log::{info, warn};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// A single user-selected file: name, content type and bytes.
///
/// Cloning is cheap; every request gets its own handle to the bytes so the
/// workflow can replace its selection while a request is still in flight.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadSelection {
    file_name: String,
    mime_type: &'static str,
    content: Arc<[u8]>,
}

impl UploadSelection {
    pub fn from_bytes(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let mime_type = FileType::from_path(Path::new(&file_name)).mime_type();
        let content: Vec<u8> = content.into();
        Self {
            file_name,
            mime_type,
            content: Arc::from(content),
        }
    }

    /// Read a file from disk into a selection.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(JobfoyuError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| JobfoyuError::InvalidInput(format!("Invalid file name: {}", path.display())))?
            .to_string();

        if FileType::from_path(path) != FileType::Pdf {
            warn!("{} is not a PDF; the service may reject it", file_name);
        }

        let content = fs::read(path).await?;
        info!("Loaded {} ({} bytes)", file_name, content.len());
        Ok(Self::from_bytes(file_name, content))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl fmt::Debug for UploadSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSelection")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Read a job description from a `.txt` or `.md` file.
pub async fn read_job_description(path: &Path) -> Result<String> {
    if !FileType::from_path(path).is_text() {
        return Err(JobfoyuError::UnsupportedFormat(format!(
            "Job description must be a .txt or .md file: {}",
            path.display()
        )));
    }
    Ok(fs::read_to_string(path).await?)
}
