use crate::errors::{Error, Result};
use crate::metrics::{DEVICE_FAILURES_TOTAL, DEVICE_LATENCY_SECONDS, DEVICE_REQUESTS_TOTAL};
use crate::model::DevicePayload;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Anything that can produce one reading on demand
pub trait ReadingSource: Send + Sync + 'static {
    fn fetch_reading(&self) -> impl Future<Output = Result<DevicePayload>> + Send;
}

/// HTTP client for the sensor device's `GET /data` endpoint.
/// One request per call, bounded by the client timeout, no retries.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: reqwest::Client,
    endpoint: String,
}

impl DeviceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let endpoint = format!("{}/data", base_url.trim_end_matches('/'));
        reqwest::Url::parse(&endpoint)
            .map_err(|e| Error::Config(format!("invalid device URL {}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self) -> Result<DevicePayload> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<DevicePayload>().await?)
    }
}

impl ReadingSource for DeviceClient {
    async fn fetch_reading(&self) -> Result<DevicePayload> {
        DEVICE_REQUESTS_TOTAL.inc();
        let start = Instant::now();

        let result = self.request().await;
        let elapsed = start.elapsed().as_secs_f64();
        DEVICE_LATENCY_SECONDS.observe(elapsed);

        match &result {
            Ok(_) => debug!("Device read from {} in {:.3}s", self.endpoint, elapsed),
            Err(e) => {
                DEVICE_FAILURES_TOTAL.inc();
                warn!("Device read from {} failed after {:.3}s: {}", self.endpoint, elapsed, e);
            }
        }

        result
    }
}
