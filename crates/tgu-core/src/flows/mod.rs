//! The three message flows: welcome, photo upload and text-to-article.
//!
//! Each flow owns its placeholder reply. Steps return [`FlowError`] variants which are
//! turned into exactly one placeholder edit by [`report_failure`].

use std::sync::Arc;

use crate::{
    config::Config,
    messaging::port::MessagingPort,
    ports::{FileFetcher, ImageHost, PagePublisher},
};

pub mod article;
pub mod failure;
pub mod photo;
pub mod start;

#[cfg(test)]
pub(crate) mod testing;

pub use article::{publish_article, ArticleRequest};
pub use failure::{report_failure, FlowError};
pub use photo::{upload_photo, PhotoRequest};
pub use start::send_welcome;

/// Placeholder text shown while a flow is running.
pub const PROCESSING_TEXT: &str = "Processing....⏳";

/// Everything a flow needs, built once at startup and shared by all invocations.
#[derive(Clone)]
pub struct FlowContext {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    pub fetcher: Arc<dyn FileFetcher>,
    pub image_host: Arc<dyn ImageHost>,
    pub publisher: Arc<dyn PagePublisher>,
}
