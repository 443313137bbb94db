use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Please select valid source and destination folders.")]
    InvalidInput,
    #[error("No PNG files found in the source folder.")]
    EmptySource,
    #[error("failed to read {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", .path.display())]
    DecodeFailure {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl ConvertError {
    /// Text shown in the status line. Validation failures have fixed wording,
    /// everything else is reported as a generic error.
    pub fn status_message(&self) -> String {
        match self {
            ConvertError::InvalidInput | ConvertError::EmptySource => self.to_string(),
            _ => format!("Error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
