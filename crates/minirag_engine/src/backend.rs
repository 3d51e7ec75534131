use std::path::Path;
use std::time::Duration;

use minirag_logging::{rag_debug, rag_warn};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use url::Url;

use crate::types::{ErrorBody, QueryRequest};
use crate::{BackendError, FailureKind, QueryResponse, UploadResponse, UploadSource};

const UPLOAD_PATH: &str = "upload";
const QUERY_PATH: &str = "query";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Root the `upload` and `query` endpoints are resolved against.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves requests unbounded; a hung request stays pending.
    pub request_timeout: Option<Duration>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait RagBackend: Send + Sync {
    async fn upload(&self, source: &UploadSource) -> Result<UploadResponse, BackendError>;

    async fn query(&self, query: &str) -> Result<QueryResponse, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    upload_url: Url,
    query_url: Url,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let upload_url = endpoint(&base, UPLOAD_PATH)?;
        let query_url = endpoint(&base, QUERY_PATH)?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            upload_url,
            query_url,
        })
    }
}

#[async_trait::async_trait]
impl RagBackend for ReqwestBackend {
    async fn upload(&self, source: &UploadSource) -> Result<UploadResponse, BackendError> {
        let form = build_form(source).await?;
        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(rejected(status, &body));
        }
        decode(&body)
    }

    async fn query(&self, query: &str) -> Result<QueryResponse, BackendError> {
        let response = self
            .client
            .post(self.query_url.clone())
            .json(&QueryRequest { query })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(rejected(status, &body));
        }
        decode(&body)
    }
}

/// Resolves `name` below `base`, treating the base path as a directory.
fn endpoint(base: &Url, name: &str) -> Result<Url, BackendError> {
    if base.cannot_be_a_base() {
        return Err(BackendError::new(
            FailureKind::InvalidUrl,
            format!("{base} cannot be used as a base url"),
        ));
    }
    let mut dir = base.clone();
    if !dir.path().ends_with('/') {
        let path = format!("{}/", dir.path());
        dir.set_path(&path);
    }
    dir.join(name)
        .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
}

async fn build_form(source: &UploadSource) -> Result<Form, BackendError> {
    match source {
        UploadSource::Text(text) => Ok(Form::new().text("text", text.clone())),
        UploadSource::File(path) => Ok(Form::new().part("file", file_part(path).await?)),
    }
}

async fn file_part(path: &Path) -> Result<Part, BackendError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        BackendError::new(FailureKind::File, format!("{}: {err}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    rag_debug!(
        "file part name={} mime={} bytes={}",
        file_name,
        mime,
        bytes.len()
    );

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())
        .map_err(|err| BackendError::new(FailureKind::File, err.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(body)
        .map_err(|err| BackendError::new(FailureKind::Decode, err.to_string()))
}

fn rejected(status: StatusCode, body: &[u8]) -> BackendError {
    let error = serde_json::from_slice::<ErrorBody>(body)
        .unwrap_or_default()
        .error;
    if error.is_none() {
        rag_warn!("status {} without a structured error body", status);
    }
    BackendError::new(
        FailureKind::Rejected {
            status: status.as_u16(),
            error,
        },
        status.to_string(),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return BackendError::new(FailureKind::Decode, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
