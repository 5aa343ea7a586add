use std::path::Path;

use async_trait::async_trait;

use crate::{domain::Attachment, progress::ProgressReporter, Result};

/// Downloads chat attachments to local files.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Stream `attachment` into `dest`, reporting `(done, total)` bytes as it goes.
    async fn fetch(
        &self,
        attachment: &Attachment,
        dest: &Path,
        progress: &ProgressReporter,
    ) -> Result<()>;
}

/// Public image host (telegra.ph `/upload` today).
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload a local file; returns the host-relative path (e.g. `/file/abc.jpg`).
    async fn upload(&self, file: &Path) -> Result<String>;
}

/// Page to be created on the publishing service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDraft {
    pub title: String,
    pub html: String,
    pub author_name: String,
    pub author_url: Option<String>,
}

/// A published page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedPage {
    /// Path relative to the publishing domain, without the leading slash.
    pub path: String,
}

/// Publishing service (telegra.ph API).
#[async_trait]
pub trait PagePublisher: Send + Sync {
    /// Create a fresh anonymous account and return its access token.
    async fn create_account(&self, short_name: &str) -> Result<String>;

    /// Create a page; `Error::Rejected` when the service refuses the content.
    async fn create_page(&self, access_token: &str, draft: &PageDraft) -> Result<PublishedPage>;
}
