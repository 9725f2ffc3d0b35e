use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::{
    BaseModelEntry, JobId, JobRecord, ServiceError, ServiceErrorKind, TrainedModelSummary,
};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Thin typed wrapper over the remote fine-tuning service. Implementations
/// never retry; retry policy belongs to the caller (the poll loop retries
/// naturally on its next pass, user-initiated actions never do).
#[async_trait::async_trait]
pub trait ServiceApi: Send + Sync {
    async fn fetch_job(&self, id: JobId) -> Result<JobRecord, ServiceError>;
    async fn list_trained_models(&self) -> Result<Vec<TrainedModelSummary>, ServiceError>;
    async fn list_base_models(&self) -> Result<Vec<BaseModelEntry>, ServiceError>;
    async fn start_training(
        &self,
        dataset_id: &str,
        base_model: &str,
        epochs: u32,
    ) -> Result<JobId, ServiceError>;
    async fn run_inference(
        &self,
        base_model: &str,
        adapter_job_id: JobId,
        prompt: &str,
    ) -> Result<String, ServiceError>;
    async fn upload_dataset(
        &self,
        name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ServiceError>;
    async fn download_adapter(&self, job_id: JobId) -> Result<Vec<u8>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    base: Url,
    client: reqwest::Client,
}

impl HttpServiceClient {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        // Normalize to a trailing slash so Url::join keeps the full path.
        let mut base = settings.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base = Url::parse(&base)
            .map_err(|err| ServiceError::new(ServiceErrorKind::InvalidUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(ServiceErrorKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base
            .join(path)
            .map_err(|err| ServiceError::new(ServiceErrorKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        decode_json(check_status(response)?).await
    }
}

#[async_trait::async_trait]
impl ServiceApi for HttpServiceClient {
    async fn fetch_job(&self, id: JobId) -> Result<JobRecord, ServiceError> {
        self.get_json(&format!("jobs/{id}")).await
    }

    async fn list_trained_models(&self) -> Result<Vec<TrainedModelSummary>, ServiceError> {
        // Server order is authoritative: the first entry is the default
        // adapter selection downstream.
        self.get_json("models/trained").await
    }

    async fn list_base_models(&self) -> Result<Vec<BaseModelEntry>, ServiceError> {
        let envelope: ModelsEnvelope = self.get_json("models").await?;
        Ok(envelope.models)
    }

    async fn start_training(
        &self,
        dataset_id: &str,
        base_model: &str,
        epochs: u32,
    ) -> Result<JobId, ServiceError> {
        let url = self.endpoint("start_training/")?;
        let form = Form::new()
            .text("dataset_id", dataset_id.to_string())
            .text("base_model", base_model.to_string())
            .text("epochs", epochs.to_string());
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: JobCreated = decode_json(check_status(response)?).await?;
        Ok(created.id)
    }

    async fn run_inference(
        &self,
        base_model: &str,
        adapter_job_id: JobId,
        prompt: &str,
    ) -> Result<String, ServiceError> {
        let url = self.endpoint("infer")?;
        let form = Form::new()
            .text("base_model", base_model.to_string())
            .text("adapter_job_id", adapter_job_id.to_string())
            .text("prompt", prompt.to_string());
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let reply: InferReply = decode_json(check_status(response)?).await?;
        Ok(reply.response)
    }

    async fn upload_dataset(
        &self,
        name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ServiceError> {
        let url = self.endpoint("api/datasets/upload")?;
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().text("name", name.to_string()).part("file", part);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: DatasetCreated = decode_json(check_status(response)?).await?;
        Ok(created.id_string())
    }

    async fn download_adapter(&self, job_id: JobId) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint(&format!("download/adapter/{job_id}"))?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = check_status(response)?;

        let mut buf = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ModelsEnvelope {
    models: Vec<BaseModelEntry>,
}

#[derive(Debug, Deserialize)]
struct JobCreated {
    id: JobId,
}

#[derive(Debug, Deserialize)]
struct InferReply {
    response: String,
}

/// Dataset ids are opaque to the client: the service may serve them as
/// strings or integers, and they travel onward as form-field text.
#[derive(Debug, Deserialize)]
struct DatasetCreated {
    id: serde_json::Value,
}

impl DatasetCreated {
    fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ServiceError::new(
            ServiceErrorKind::NotFound,
            status.to_string(),
        ));
    }
    if !status.is_success() {
        return Err(ServiceError::new(
            ServiceErrorKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body)
        .map_err(|err| ServiceError::new(ServiceErrorKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(ServiceErrorKind::Timeout, err.to_string());
    }
    ServiceError::new(ServiceErrorKind::Network, err.to_string())
}
