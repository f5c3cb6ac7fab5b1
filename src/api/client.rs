use super::TimerApi;
use super::dto::{ActiveTimerResponse, ErrorBody, TimerRequest, TimerResponse, TimersResponse};
use crate::errors::{AppError, AppResult};
use crate::models::{ActiveTimer, TimerEntry};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// reqwest-backed client for the job-timer resource.
#[derive(Clone, Debug)]
pub struct HttpTimerApi {
    client: Client,
    base_url: Url,
}

impl HttpTimerApi {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid server_url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "server_url cannot be used as a base: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so technician names with spaces or slashes stay a single segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Server {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        response.json::<T>().await.map_err(|e| AppError::Server {
            status: status.as_u16(),
            message: format!("unexpected response body: {}", e),
        })
    }

    async fn post_timer(
        &self,
        action: &str,
        job_id: i64,
        technician_name: &str,
        notes: Option<&str>,
    ) -> AppResult<TimerEntry> {
        let job = job_id.to_string();
        let url = self.endpoint(&["jobs", &job, "timer", action]);
        let body = TimerRequest {
            technician_name,
            notes: notes.unwrap_or(""),
        };

        let resp: TimerResponse = self.send(self.client.post(url).json(&body)).await?;
        if !resp.success {
            return Err(rejected(resp.message));
        }
        Ok(resp.timer.unwrap_or_default())
    }
}

impl TimerApi for HttpTimerApi {
    async fn get_active_timer(&self, technician_name: &str) -> AppResult<Option<ActiveTimer>> {
        let url = self.endpoint(&["jobs", "technician", technician_name, "active-timer"]);
        let resp: ActiveTimerResponse = self.send(self.client.get(url)).await?;
        Ok(resp.active_timer)
    }

    async fn start_job_timer(
        &self,
        job_id: i64,
        technician_name: &str,
        notes: Option<&str>,
    ) -> AppResult<TimerEntry> {
        self.post_timer("start", job_id, technician_name, notes).await
    }

    async fn stop_job_timer(
        &self,
        job_id: i64,
        technician_name: &str,
        notes: Option<&str>,
    ) -> AppResult<TimerEntry> {
        self.post_timer("stop", job_id, technician_name, notes).await
    }

    async fn get_job_timers(&self, job_id: i64) -> AppResult<Vec<TimerEntry>> {
        let job = job_id.to_string();
        let url = self.endpoint(&["jobs", &job, "timers"]);
        let resp: TimersResponse = self.send(self.client.get(url)).await?;
        if !resp.success {
            return Err(rejected(resp.message));
        }
        Ok(resp.timers)
    }
}

/// A 2xx answer carrying `success: false`.
fn rejected(message: Option<String>) -> AppError {
    AppError::Server {
        status: 200,
        message: message.unwrap_or_else(|| "request rejected by server".to_string()),
    }
}

fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(msg) = parsed.message.or(parsed.error)
    {
        return msg;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return crate::utils::formatting::truncate(trimmed, 200);
    }
    reason.unwrap_or("request failed").to_string()
}
