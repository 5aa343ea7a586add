/// Core error type shared by every crate in the workspace.
///
/// Adapter crates map their transport errors into this type so the flows can
/// decide between a friendly fixed reply and a formatted failure report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The publishing service (or the local content conversion) refused the values.
    #[error("content rejected: {0}")]
    Rejected(String),

    /// Telegram no longer has the file behind an attachment id.
    #[error("attachment missing: {0}")]
    AttachmentMissing(String),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// True when a file the caller expected to exist has disappeared.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::AttachmentMissing(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_attachments_and_vanished_files_are_not_found() {
        assert!(Error::AttachmentMissing("abc".to_string()).is_not_found());
        let vanished = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(Error::Io(vanished).is_not_found());
        assert!(!Error::External("timed out".to_string()).is_not_found());
    }
}
