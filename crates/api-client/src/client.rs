//! HTTP client for the geocoding service

use crate::config::ClientConfig;
use crate::endpoints::GeocodeApi;
use crate::error::{ApiError, ApiResult};
use clinicfinder_core::rate_limit::RateLimiter;
use clinicfinder_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use clinicfinder_telemetry::{metrics, names};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Correlation header sent with every request
const X_REQUEST_ID: &str = "X-Request-ID";

/// Rate limiter bucket shared by all geocoder paths
const RATE_LIMIT_KEY: &str = "geocoder";

/// Geocoding client with built-in resilience
///
/// Every call carries the identifying User-Agent public geocoders require,
/// waits its turn under the rate limit, is retried with backoff on transient
/// failures, and is refused outright while the circuit breaker is open.
/// Clones share the breaker and the limiter.
#[derive(Clone)]
pub struct GeoClient {
    http: Client,
    config: Arc<ClientConfig>,
    breaker: Arc<CircuitBreaker>,
    limiter: Arc<RateLimiter>,
}

impl GeoClient {
    /// Client configured from the environment
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Client with explicit configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ApiError::config(format!("user_agent is not a valid header value: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, agent);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            breaker: Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default())),
            limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Close the circuit breaker again
    pub fn reset_circuit(&self) {
        self.breaker.reset();
    }

    /// Forward geocoding on this client
    #[must_use]
    pub fn geocode(&self) -> GeocodeApi {
        GeocodeApi::new(self.clone())
    }

    /// `path` joined onto the base URL with exactly one slash
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET `path` with `query` and decode the JSON answer
    #[instrument(skip(self, query), fields(request_id))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = self.url(path);
        let request_id = Uuid::new_v4().simple().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        if !self.breaker.can_execute() {
            warn!(%url, "geocoder circuit open, skipping request");
            return Err(ApiError::CircuitOpen);
        }

        self.acquire_slot().await?;
        metrics().increment(names::GEOCODE_REQUESTS);

        let retry = &self.config.retry;
        let mut attempt = 0;
        loop {
            let started = Instant::now();
            match self.send_once(&request_id, &url, query).await {
                Ok(value) => {
                    self.breaker.record_success();
                    debug!(attempt, elapsed_ms = started.elapsed().as_millis(), "geocoder answered");
                    return Ok(value);
                }
                Err(e) => {
                    self.breaker.record_failure();
                    attempt += 1;
                    if !e.is_retryable() {
                        debug!(attempt, error = %e, "geocoder request failed permanently");
                        return Err(e);
                    }
                    if attempt >= retry.max_attempts {
                        return Err(ApiError::RetriesExhausted {
                            attempts: attempt,
                            last_error: e.to_string(),
                        });
                    }
                    let delay = retry.delay_for_attempt(attempt);
                    debug!(attempt, delay_ms = delay.as_millis(), error = %e, "retrying geocoder request");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Sleep until the rate limiter grants a request
    ///
    /// Gives up when the wait alone would exceed the request timeout.
    async fn acquire_slot(&self) -> ApiResult<()> {
        let started = Instant::now();
        while !self.limiter.try_acquire(RATE_LIMIT_KEY) {
            let wait = self.limiter.time_until_available(RATE_LIMIT_KEY);
            if started.elapsed() + wait > self.config.timeout {
                warn!(wait_ms = wait.as_millis(), "rate limit wait exceeds request timeout");
                return Err(ApiError::RateLimited(wait));
            }
            debug!(wait_ms = wait.as_millis(), "waiting for geocoder rate limit");
            tokio::time::sleep(wait).await;
        }
        Ok(())
    }

    async fn send_once<T: DeserializeOwned>(&self, request_id: &str, url: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header(X_REQUEST_ID, request_id)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.config.timeout)
                } else {
                    ApiError::Request(e)
                }
            })?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(serde_json::from_str(&body)?)
    } else {
        Err(ApiError::api_response(status.as_u16(), body))
    }
}
