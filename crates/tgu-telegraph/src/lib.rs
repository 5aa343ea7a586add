//! telegra.ph adapter: image upload and the Telegraph page API.

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;

use tgu_core::{
    config::Config,
    errors::Error,
    ports::{ImageHost, PageDraft, PagePublisher, PublishedPage},
    Result,
};

pub mod nodes;

use nodes::html_to_nodes;

#[derive(Clone, Debug)]
pub struct TelegraphClient {
    api_url: String,
    upload_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Account {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    path: String,
}

impl TelegraphClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Self::with_endpoints(
            &cfg.telegraph_api_url,
            &cfg.telegraph_upload_url,
            cfg.http_timeout,
        )
    }

    pub fn with_endpoints(api_url: &str, upload_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("telegraph client build error: {e}")))?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            upload_url: upload_url.to_string(),
            http,
        })
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse<T>> {
        tracing::debug!(method, "telegraph api call");
        let resp = self
            .http
            .post(format!("{}/{method}", self.api_url))
            .form(form)
            .send()
            .await
            .map_err(|e| Error::External(format!("telegraph request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "telegraph {method} failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::External(format!("telegraph json error: {e}")))
    }
}

#[async_trait]
impl ImageHost for TelegraphClient {
    async fn upload(&self, file: &Path) -> Result<String> {
        let bytes = tokio::fs::read(file).await.map_err(Error::Io)?;
        tracing::debug!(bytes = bytes.len(), file = %file.display(), "uploading image");

        let file_name = file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(guess_mime(file))
                .map_err(|e| Error::External(format!("telegraph multipart error: {e}")))?,
        );

        let resp = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::External(format!("telegraph upload error: {e}")))?;

        let status = resp.status();
        let v: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("telegraph upload failed: {status}: {e}")))?;

        parse_upload_response(&v)
    }
}

#[async_trait]
impl PagePublisher for TelegraphClient {
    async fn create_account(&self, short_name: &str) -> Result<String> {
        let resp: ApiResponse<Account> = self
            .call("createAccount", &[("short_name", short_name)])
            .await?;

        match resp {
            ApiResponse {
                ok: true,
                result: Some(account),
                ..
            } => Ok(account.access_token),
            ApiResponse { error, .. } => Err(Error::External(format!(
                "telegraph createAccount failed: {}",
                error.unwrap_or_else(|| "unknown error".to_string())
            ))),
        }
    }

    async fn create_page(&self, access_token: &str, draft: &PageDraft) -> Result<PublishedPage> {
        let content = serde_json::to_string(&html_to_nodes(&draft.html)?)?;

        let mut form = vec![
            ("access_token", access_token),
            ("title", draft.title.as_str()),
            ("author_name", draft.author_name.as_str()),
            ("content", content.as_str()),
            ("return_content", "false"),
        ];
        if let Some(url) = draft.author_url.as_deref() {
            form.push(("author_url", url));
        }

        let resp: ApiResponse<Page> = self.call("createPage", &form).await?;
        match resp {
            ApiResponse {
                ok: true,
                result: Some(page),
                ..
            } => Ok(PublishedPage { path: page.path }),
            // The service refused the values (empty content, title too long, ...).
            ApiResponse { error, .. } => {
                let reason = error.unwrap_or_else(|| "unknown error".to_string());
                tracing::warn!(%reason, "telegraph refused page");
                Err(Error::Rejected(reason))
            }
        }
    }
}

/// `[{"src": "/file/x.jpg"}]` on success, `{"error": ..}` or `[{"error": ..}]` on failure.
fn parse_upload_response(v: &serde_json::Value) -> Result<String> {
    let first = match v {
        serde_json::Value::Array(items) => items.first(),
        other => Some(other),
    };

    if let Some(err) = first.and_then(|f| f.get("error")).and_then(|e| e.as_str()) {
        return Err(Error::External(format!("telegraph upload rejected: {err}")));
    }

    first
        .and_then(|f| f.get("src"))
        .and_then(|s| s.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::External(format!("telegraph upload returned no src: {v}")))
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> TelegraphClient {
        TelegraphClient::with_endpoints(
            &server.uri(),
            &format!("{}/upload", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn draft(author_url: Option<&str>) -> PageDraft {
        PageDraft {
            title: "My Post".to_string(),
            html: "Hello<br>world".to_string(),
            author_name: "Alice".to_string(),
            author_url: author_url.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn upload_returns_src_of_first_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"src": "/file/abc.jpg"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("photo.jpg");
        std::fs::write(&file, b"jpeg-bytes").unwrap();

        let src = client(&server).upload(&file).await.unwrap();
        assert_eq!(src, "/file/abc.jpg");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        assert!(body.contains("jpeg-bytes"));
        assert!(body.contains("image/jpeg"));
    }

    #[tokio::test]
    async fn upload_error_payload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "File type invalid"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("photo.jpg");
        std::fs::write(&file, b"x").unwrap();

        let err = client(&server).upload(&file).await.unwrap_err();
        assert!(err.to_string().contains("File type invalid"));
    }

    #[tokio::test]
    async fn upload_of_missing_file_is_not_found() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let err = client(&server)
            .upload(&dir.path().join("gone.jpg"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_account_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createAccount"))
            .and(body_string_contains("short_name="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"short_name": "Uploader", "access_token": "tok-123", "auth_url": "x"}
            })))
            .mount(&server)
            .await;

        let token = client(&server).create_account("Uploader").await.unwrap();
        assert_eq!(token, "tok-123");
    }

    #[tokio::test]
    async fn create_page_sends_nodes_and_returns_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createPage"))
            .and(body_string_contains("access_token=tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"path": "My-Post-10-18", "url": "https://telegra.ph/My-Post-10-18"}
            })))
            .mount(&server)
            .await;

        let page = client(&server)
            .create_page("tok-123", &draft(None))
            .await
            .unwrap();
        assert_eq!(page.path, "My-Post-10-18");

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        assert!(body.contains("content="));
        assert!(body.contains("author_name=Alice"));
        assert!(!body.contains("author_url"));
    }

    #[tokio::test]
    async fn create_page_includes_author_url_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createPage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"path": "p"}
            })))
            .mount(&server)
            .await;

        client(&server)
            .create_page("t", &draft(Some("https://telegram.dog/alice")))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        assert!(body.contains("author_url="));
    }

    #[tokio::test]
    async fn api_refusal_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createPage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": false, "error": "TITLE_TOO_LONG"})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .create_page("t", &draft(None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rejected(ref r) if r == "TITLE_TOO_LONG"));
    }

    #[tokio::test]
    async fn unsupported_markup_is_rejected_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut d = draft(None);
        d.html = "<span class=\"tg-spoiler\">secret</span>".to_string();
        let err = client(&server).create_page("t", &d).await.unwrap_err();
        assert!(matches!(err, Error::Rejected(_)));
    }

    #[tokio::test]
    async fn http_failures_are_external_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createAccount"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client(&server).create_account("x").await.unwrap_err();
        assert!(matches!(err, Error::External(ref m) if m.contains("502")));
    }

    #[test]
    fn upload_response_shapes() {
        assert_eq!(
            parse_upload_response(&json!([{"src": "/file/a.png"}])).unwrap(),
            "/file/a.png"
        );
        assert!(parse_upload_response(&json!([{"error": "nope"}])).is_err());
        assert!(parse_upload_response(&json!([])).is_err());
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("a.png")), "image/png");
        assert_eq!(guess_mime(Path::new("a")), "application/octet-stream");
    }
}
