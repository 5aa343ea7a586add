//! In-memory port fakes shared by the flow tests.

use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    config::Config,
    domain::{Attachment, ChatId, MessageId, MessageRef, Sender, UserId},
    errors::Error,
    messaging::port::MessagingPort,
    ports::{FileFetcher, ImageHost, PageDraft, PagePublisher, PublishedPage},
    progress::ProgressReporter,
    Result,
};

use super::FlowContext;

#[derive(Default)]
pub struct FakeMessenger {
    replies: Mutex<Vec<(MessageRef, String)>>,
    edits: Mutex<Vec<String>>,
}

impl FakeMessenger {
    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn reply_targets(&self) -> Vec<MessageRef> {
        self.replies.lock().unwrap().iter().map(|(m, _)| *m).collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.edits.lock().unwrap().clone()
    }

    pub fn last_edit(&self) -> Option<String> {
        self.edits.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn reply_html(&self, to: MessageRef, html: &str) -> Result<MessageRef> {
        self.replies.lock().unwrap().push((to, html.to_string()));
        Ok(MessageRef {
            chat_id: to.chat_id,
            message_id: MessageId(to.message_id.0 + 1),
        })
    }

    async fn edit_html(&self, _msg: MessageRef, html: &str) -> Result<()> {
        self.edits.lock().unwrap().push(html.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchBehavior {
    #[default]
    Write,
    NotFound,
    Missing,
    Fail,
}

#[derive(Default)]
pub struct FakeFetcher {
    behavior: Mutex<FetchBehavior>,
}

impl FakeFetcher {
    pub fn set(&self, behavior: FetchBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }
}

#[async_trait]
impl FileFetcher for FakeFetcher {
    async fn fetch(
        &self,
        attachment: &Attachment,
        dest: &Path,
        progress: &ProgressReporter,
    ) -> Result<()> {
        let behavior = *self.behavior.lock().unwrap();
        match behavior {
            FetchBehavior::Write => {
                std::fs::write(dest, b"jpeg")?;
                progress.report(4, attachment.size).await;
                Ok(())
            }
            FetchBehavior::NotFound => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file vanished",
            ))),
            FetchBehavior::Missing => Err(Error::AttachmentMissing(attachment.file_id.clone())),
            FetchBehavior::Fail => Err(Error::External("telegram error: timed out".to_string())),
        }
    }
}

#[derive(Default)]
pub struct FakeHost {
    src: Mutex<Option<String>>,
    failure: Mutex<Option<Error>>,
    uploaded: Mutex<Vec<Vec<u8>>>,
}

impl FakeHost {
    pub fn set_src(&self, src: &str) {
        *self.src.lock().unwrap() = Some(src.to_string());
    }

    pub fn fail_with(&self, e: Error) {
        *self.failure.lock().unwrap() = Some(e);
    }

    pub fn uploaded(&self) -> Vec<Vec<u8>> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for FakeHost {
    async fn upload(&self, file: &Path) -> Result<String> {
        if let Some(e) = self.failure.lock().unwrap().take() {
            return Err(e);
        }
        self.uploaded.lock().unwrap().push(std::fs::read(file)?);
        Ok(self
            .src
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "/file/default.jpg".to_string()))
    }
}

#[derive(Default)]
pub struct FakePublisher {
    accounts: Mutex<Vec<String>>,
    drafts: Mutex<Vec<(String, PageDraft)>>,
    page_failure: Mutex<Option<Error>>,
}

impl FakePublisher {
    pub fn reject_pages_with(&self, e: Error) {
        *self.page_failure.lock().unwrap() = Some(e);
    }

    pub fn drafts(&self) -> Vec<(String, PageDraft)> {
        self.drafts.lock().unwrap().clone()
    }

    pub fn short_names(&self) -> Vec<String> {
        self.accounts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PagePublisher for FakePublisher {
    async fn create_account(&self, short_name: &str) -> Result<String> {
        let mut accounts = self.accounts.lock().unwrap();
        accounts.push(short_name.to_string());
        Ok(format!("token-{}", accounts.len()))
    }

    async fn create_page(&self, access_token: &str, draft: &PageDraft) -> Result<PublishedPage> {
        if let Some(e) = self.page_failure.lock().unwrap().take() {
            return Err(e);
        }
        self.drafts
            .lock()
            .unwrap()
            .push((access_token.to_string(), draft.clone()));
        Ok(PublishedPage {
            path: "My-Post-10-18".to_string(),
        })
    }
}

pub struct Fakes {
    pub cfg: Arc<Config>,
    pub messenger: Arc<FakeMessenger>,
    pub fetcher: Arc<FakeFetcher>,
    pub host: Arc<FakeHost>,
    pub publisher: Arc<FakePublisher>,
}

impl Fakes {
    pub fn new(temp_dir: &Path) -> Self {
        let temp_dir = temp_dir.to_string_lossy().to_string();
        let cfg = Config::from_lookup(|k| match k {
            "TELEGRAM_BOT_TOKEN" => Some("test-token".to_string()),
            "TEMP_DIR" => Some(temp_dir.clone()),
            _ => None,
        })
        .expect("test config");
        let cfg = Config {
            progress_interval: Duration::from_millis(0),
            ..cfg
        };

        Self {
            cfg: Arc::new(cfg),
            messenger: Arc::new(FakeMessenger::default()),
            fetcher: Arc::new(FakeFetcher::default()),
            host: Arc::new(FakeHost::default()),
            publisher: Arc::new(FakePublisher::default()),
        }
    }

    pub fn origin() -> MessageRef {
        MessageRef {
            chat_id: ChatId(1001),
            message_id: MessageId(10),
        }
    }

    pub fn sender(handle: Option<&str>) -> Sender {
        Sender {
            id: UserId(1001),
            username: handle.map(str::to_string),
            first_name: "Alice".to_string(),
        }
    }
}

pub fn context(fakes: &Fakes) -> FlowContext {
    FlowContext {
        cfg: fakes.cfg.clone(),
        messenger: fakes.messenger.clone(),
        fetcher: fakes.fetcher.clone(),
        image_host: fakes.host.clone(),
        publisher: fakes.publisher.clone(),
    }
}
