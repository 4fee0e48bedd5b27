//! HTTP conversion client
//!
//! Client for a conversion service exposing an async job API: POST a job,
//! poll it to a terminal state, download the output, delete the job. A job
//! that terminates in the failed state is a content-level failure; every
//! transport or service problem along the way stays retryable.

use crate::client::{ConversionService, ConvertRequest, ConvertedJob};
use crate::error::ConvertError;
use async_trait::async_trait;
use medialib_core::ConverterOptions;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Default upper bound on the blocking conversion wait.
const DEFAULT_WAIT_LIMIT: Duration = Duration::from_secs(300);
/// Maximum delay between job status polls.
const MAX_POLL_DELAY_SECS: u64 = 5;

/// HTTP implementation of `ConversionService`
pub struct HttpConversionClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    default_wait: Duration,
}

#[derive(Serialize)]
struct CreateJobRequest<'a> {
    input_format: &'a str,
    output_format: &'a str,
    input: &'static str,
    file: &'a str,
    converter_options: &'a ConverterOptions,
}

#[derive(Debug, Deserialize)]
struct JobResource {
    id: String,
    status: JobStatus,
    message: Option<String>,
    output: Option<JobOutput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct JobOutput {
    url: String,
}

impl HttpConversionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConvertError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ConvertError::Transport)?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            default_wait: DEFAULT_WAIT_LIMIT,
        })
    }

    fn job_url(&self, id: &str) -> String {
        format!("{}/jobs/{}", self.base_url, id)
    }

    /// Map a terminal job resource to a result; None while still running.
    fn classify_terminal(job: &JobResource) -> Option<Result<ConvertedJob, ConvertError>> {
        match job.status {
            JobStatus::Completed => Some(match &job.output {
                Some(output) => Ok(ConvertedJob {
                    id: job.id.clone(),
                    output_url: output.url.clone(),
                }),
                // Protocol violation on the service side; worth retrying.
                None => Err(ConvertError::Service {
                    status: 200,
                    message: "job completed without an output location".to_string(),
                }),
            }),
            JobStatus::Failed => Some(Err(ConvertError::ConversionFailed(
                job.message
                    .clone()
                    .unwrap_or_else(|| "input could not be converted".to_string()),
            ))),
            JobStatus::Queued | JobStatus::Processing => None,
        }
    }

    async fn read_job(&self, response: reqwest::Response) -> Result<JobResource, ConvertError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ConvertError::Service {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(ConvertError::Transport)
    }

    async fn create_job(
        &self,
        request: &ConvertRequest,
        wait: Duration,
    ) -> Result<JobResource, ConvertError> {
        let body = CreateJobRequest {
            input_format: &request.input_format,
            output_format: &request.output_format,
            input: "download",
            file: &request.source_url,
            converter_options: &request.options,
        };

        let response = self
            .http_client
            .post(format!("{}/jobs", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConvertError::transport(e, wait))?;

        self.read_job(response).await
    }

    async fn poll_job(&self, id: &str, wait: Duration) -> Result<JobResource, ConvertError> {
        let response = self
            .http_client
            .get(self.job_url(id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ConvertError::transport(e, wait))?;

        self.read_job(response).await
    }
}

#[async_trait]
impl ConversionService for HttpConversionClient {
    async fn convert(&self, request: &ConvertRequest) -> Result<ConvertedJob, ConvertError> {
        let wait_limit = request.timeout.unwrap_or(self.default_wait);
        let deadline = Instant::now() + wait_limit;

        let mut job = self.create_job(request, wait_limit).await?;
        let mut attempts: u64 = 0;

        loop {
            if let Some(terminal) = Self::classify_terminal(&job) {
                match &terminal {
                    Ok(converted) => tracing::info!(
                        job_id = %converted.id,
                        output_format = %request.output_format,
                        "Conversion completed"
                    ),
                    Err(e) if e.is_content_failure() => tracing::debug!(
                        job_id = %job.id,
                        error = %e,
                        "Conversion reported content failure"
                    ),
                    Err(e) => tracing::warn!(job_id = %job.id, error = %e, "Conversion errored"),
                }
                return terminal;
            }

            if Instant::now() >= deadline {
                return Err(ConvertError::Timeout(wait_limit));
            }

            // Backoff: 1s, 2s, ... capped at MAX_POLL_DELAY_SECS
            attempts += 1;
            sleep(Duration::from_secs(attempts.min(MAX_POLL_DELAY_SECS))).await;

            job = self.poll_job(&job.id, wait_limit).await?;
        }
    }

    async fn fetch(&self, job: &ConvertedJob, dest: &Path) -> Result<(), ConvertError> {
        let response = self
            .http_client
            .get(&job.output_url)
            .send()
            .await
            .map_err(ConvertError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::Service {
                status: status.as_u16(),
                message: format!("output download returned {}", status),
            });
        }

        let bytes = response.bytes().await.map_err(ConvertError::Transport)?;
        tokio::fs::write(dest, &bytes).await?;

        tracing::debug!(
            job_id = %job.id,
            size_bytes = bytes.len(),
            dest = %dest.display(),
            "Fetched converted output"
        );

        Ok(())
    }

    async fn delete(&self, job: &ConvertedJob) -> Result<(), ConvertError> {
        let response = self
            .http_client
            .delete(self.job_url(&job.id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(ConvertError::Transport)?;

        let status = response.status();
        // A job that is already gone counts as released.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(ConvertError::Service {
                status: status.as_u16(),
                message: format!("job delete returned {}", status),
            });
        }

        Ok(())
    }
}
