use jobtrack_core::{
    ApiLayout, Credentials, FieldRequest, FileHandle, JobHandle, JobRequest, JobStatus, PollError,
    SubmissionError, PASSWORD_FIELD, TARGET_FIELD, USERNAME_FIELD,
};
use jobtrack_logging::{jobtrack_debug, jobtrack_warn};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use crate::wire::{error_detail, CreatedBody, FieldsBody, StatusBody};
use crate::{EngineError, HttpSettings};

/// The backend job service. Every call is a single exchange with no retry.
#[async_trait::async_trait]
pub trait JobApi: Send + Sync {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, SubmissionError>;

    async fn poll(
        &self,
        handle: &JobHandle,
        credentials: &Credentials,
    ) -> Result<JobStatus, PollError>;

    async fn discover_fields(&self, request: &FieldRequest)
        -> Result<Vec<String>, SubmissionError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    client: reqwest::Client,
    layout: ApiLayout,
}

impl ReqwestJobApi {
    pub fn new(layout: ApiLayout, settings: &HttpSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { client, layout })
    }

    /// Sends a multipart POST and returns the status with the raw body.
    async fn post_form(&self, url: reqwest::Url, form: Form) -> Result<Exchange, SubmissionError> {
        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                jobtrack_warn!("POST {} failed: {}", url.path(), err);
                SubmissionError::generic()
            })?;
        Exchange::read(response).await.map_err(|err| {
            jobtrack_warn!("Reading response of POST {} failed: {}", url.path(), err);
            SubmissionError::generic()
        })
    }
}

struct Exchange {
    status: StatusCode,
    body: Vec<u8>,
}

impl Exchange {
    async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(Self { status, body })
    }

    fn is_success(&self) -> bool {
        self.status.is_success()
    }

    fn code(&self) -> Option<u16> {
        Some(self.status.as_u16())
    }
}

#[async_trait::async_trait]
impl JobApi for ReqwestJobApi {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, SubmissionError> {
        let mut form = credentials_form(request.credentials())
            .text(TARGET_FIELD, request.target().to_string());
        for selection in request.selections() {
            form = form.text(selection.name.clone(), selection.value.clone());
        }
        for file in request.files() {
            form = form.part(file.field().to_string(), file_part(file).await?);
        }

        let exchange = self.post_form(self.layout.submit_url(), form).await?;
        if !exchange.is_success() {
            return Err(SubmissionError::new(
                exchange.code(),
                error_detail(&exchange.body),
            ));
        }
        let created: CreatedBody = serde_json::from_slice(&exchange.body).map_err(|err| {
            jobtrack_warn!("Malformed submission response: {}", err);
            SubmissionError::new(exchange.code(), None)
        })?;
        created.into_handle()
    }

    async fn poll(
        &self,
        handle: &JobHandle,
        credentials: &Credentials,
    ) -> Result<JobStatus, PollError> {
        let url = self.layout.status_url(handle, credentials);
        let response = self.client.get(url).send().await.map_err(|err| {
            jobtrack_warn!("Polling job {} failed: {}", handle, err);
            PollError::generic()
        })?;
        let exchange = Exchange::read(response).await.map_err(|err| {
            jobtrack_warn!("Reading status of job {} failed: {}", handle, err);
            PollError::generic()
        })?;

        if !exchange.is_success() {
            return Err(PollError::new(exchange.code(), error_detail(&exchange.body)));
        }
        let body: StatusBody = serde_json::from_slice(&exchange.body).map_err(|err| {
            jobtrack_warn!("Malformed status of job {}: {}", handle, err);
            PollError::new(exchange.code(), None)
        })?;
        let status = body.into_status()?;
        jobtrack_debug!("Job {} reported {}", handle, status.label());
        Ok(status)
    }

    async fn discover_fields(
        &self,
        request: &FieldRequest,
    ) -> Result<Vec<String>, SubmissionError> {
        let file = request.file();
        let form = credentials_form(request.credentials())
            .part(file.field().to_string(), file_part(file).await?);

        let exchange = self.post_form(self.layout.fields_url(), form).await?;
        if !exchange.is_success() {
            return Err(SubmissionError::new(
                exchange.code(),
                error_detail(&exchange.body),
            ));
        }
        let body: FieldsBody = serde_json::from_slice(&exchange.body).map_err(|err| {
            jobtrack_warn!("Malformed field list: {}", err);
            SubmissionError::new(exchange.code(), None)
        })?;
        Ok(body.headers)
    }
}

fn credentials_form(credentials: &Credentials) -> Form {
    Form::new()
        .text(USERNAME_FIELD, credentials.username().to_string())
        .text(PASSWORD_FIELD, credentials.password().to_string())
}

async fn file_part(file: &FileHandle) -> Result<Part, SubmissionError> {
    let bytes = tokio::fs::read(file.path()).await.map_err(|err| {
        jobtrack_warn!("Cannot read upload {:?}: {}", file.path(), err);
        SubmissionError::new(
            None,
            Some(format!("Cannot read {}: {}", file.file_name(), err)),
        )
    })?;
    Ok(Part::bytes(bytes).file_name(file.file_name()))
}
