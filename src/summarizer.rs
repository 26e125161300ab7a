//! Abstractive summarization through a hosted sequence-to-sequence model.
//!
//! The model is treated as an opaque text2text service. Every request carries
//! the same instruction prefix and decoding parameters:
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | prompt prefix | `"summarize: "` |
//! | max input tokens | 1024 |
//! | max output tokens | 150 |
//! | beam width | 2 |
//! | length penalty | 2.0 |
//! | early stopping | on |
//!
//! # Architecture
//!
//! - [`Summarize`]: Core trait for anything that turns text into a summary
//! - [`ModelSummarizer`]: Talks to a Hugging Face style inference endpoint
//! - [`Retry`]: Decorator that adds exponential backoff to any [`Summarize`]
//! - [`init`]: Builds the process-wide instance exactly once
//!
//! # Retry Strategy
//!
//! - Configurable number of retries (2 by default)
//! - Exponential backoff starting at 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay

use once_cell::sync::OnceCell;
use rand::{Rng, rng};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::config::SummarizerConfig;
use crate::error::{NewsError, Result};
use crate::utils::{token_count, truncate_for_log, truncate_tokens};

pub const PROMPT_PREFIX: &str = "summarize: ";
pub const MAX_INPUT_TOKENS: usize = 1024;
pub const MAX_OUTPUT_TOKENS: usize = 150;
pub const NUM_BEAMS: u32 = 2;
pub const LENGTH_PENALTY: f32 = 2.0;
pub const EARLY_STOPPING: bool = true;

/// Trait for async summarization backends.
pub trait Summarize {
    /// Summarize `text`, returning at most [`MAX_OUTPUT_TOKENS`] tokens.
    async fn summarize(&self, text: &str) -> Result<String>;
}

impl<T: Summarize + ?Sized> Summarize for &T {
    async fn summarize(&self, text: &str) -> Result<String> {
        (**self).summarize(text).await
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`Summarize`] implementation.
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct Retry<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> Retry<T>
where
    T: Summarize,
{
    /// Wrap `inner`, retrying up to `max_retries` times after the first attempt.
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Retry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> Summarize for Retry<T>
where
    T: Summarize + fmt::Debug,
{
    #[instrument(level = "info", skip_all)]
    async fn summarize(&self, text: &str) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.summarize(text).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis(),
                            elapsed_ms_total = total_dt.as_millis(),
                            error = %e,
                            "summarize() exhausted retries"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let delay = self
                        .base_delay
                        .saturating_mul(1 << (attempt - 1).min(16))
                        .min(self.max_delay);
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis(),
                        elapsed_ms_total = total_dt.as_millis(),
                        ?delay,
                        error = %e,
                        "summarize() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_length: usize,
    num_beams: u32,
    length_penalty: f32,
    early_stopping: bool,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Serialize)]
struct GenerationRequest {
    inputs: String,
    parameters: GenerationParameters,
    options: RequestOptions,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(alias = "summary_text")]
    generated_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<Generation>),
    One(Generation),
    Failure { error: String },
}

/// Build the request body for `text`: prefixed, then cut to the input budget.
fn build_request(text: &str) -> GenerationRequest {
    GenerationRequest {
        inputs: truncate_tokens(&format!("{PROMPT_PREFIX}{text}"), MAX_INPUT_TOKENS),
        parameters: GenerationParameters {
            max_length: MAX_OUTPUT_TOKENS,
            num_beams: NUM_BEAMS,
            length_penalty: LENGTH_PENALTY,
            early_stopping: EARLY_STOPPING,
        },
        options: RequestOptions {
            wait_for_model: true,
        },
    }
}

/// Decode an endpoint response into summary text within the output budget.
fn parse_response(status: reqwest::StatusCode, body: &str) -> Result<String> {
    let parsed = serde_json::from_str::<GenerationResponse>(body);

    if !status.is_success() {
        let detail = match parsed {
            Ok(GenerationResponse::Failure { error }) => error,
            _ => truncate_for_log(body, 300),
        };
        return Err(NewsError::Model(format!("endpoint returned HTTP {status}: {detail}")));
    }

    let generated = match parsed {
        Ok(GenerationResponse::Many(mut generations)) if !generations.is_empty() => {
            generations.swap_remove(0).generated_text
        }
        Ok(GenerationResponse::Many(_)) => {
            return Err(NewsError::Model("endpoint returned no generations".to_string()));
        }
        Ok(GenerationResponse::One(generation)) => generation.generated_text,
        Ok(GenerationResponse::Failure { error }) => return Err(NewsError::Model(error)),
        Err(e) => {
            return Err(NewsError::Model(format!(
                "unexpected response ({e}): {}",
                truncate_for_log(body, 300)
            )));
        }
    };

    Ok(truncate_tokens(&generated, MAX_OUTPUT_TOKENS))
}

/// Client for a hosted text2text generation endpoint.
pub struct ModelSummarizer {
    client: Client,
    endpoint: String,
}

impl fmt::Debug for ModelSummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSummarizer")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ModelSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.api_token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| NewsError::Config(format!("invalid API token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NewsError::Config(format!("cannot build model client: {e}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl Summarize for ModelSummarizer {
    #[instrument(level = "info", skip_all, fields(endpoint = %self.endpoint))]
    async fn summarize(&self, text: &str) -> Result<String> {
        let t0 = Instant::now();
        let request = build_request(text);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| NewsError::Model(format!("request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NewsError::Model(format!("reading response failed: {e}")))?;
        let dt = t0.elapsed();

        let res = parse_response(status, &body);
        match &res {
            Ok(summary) => info!(
                elapsed_ms = dt.as_millis(),
                tokens = token_count(summary),
                "Model call succeeded"
            ),
            Err(e) => warn!(elapsed_ms = dt.as_millis(), error = %e, "Model call failed"),
        }
        res
    }
}

static SUMMARIZER: OnceCell<Retry<ModelSummarizer>> = OnceCell::new();

/// Build the process-wide summarizer on first call and return it.
///
/// Later calls return the same instance and ignore `config`; there is no
/// reload path.
pub fn init(config: &SummarizerConfig) -> Result<&'static Retry<ModelSummarizer>> {
    SUMMARIZER.get_or_try_init(|| {
        let model = ModelSummarizer::new(config)?;
        info!(endpoint = %config.endpoint, max_retries = config.max_retries, "Summarizer initialized");
        Ok(Retry::new(model, config.max_retries, Duration::from_secs(1)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl Summarize for Flaky {
        async fn summarize(&self, text: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(NewsError::Model(format!("attempt {n} failed")))
            } else {
                Ok(format!("summary of {text}"))
            }
        }
    }

    #[test]
    fn test_build_request_uses_fixed_parameters() {
        let request = build_request("The article body.");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "summarize: The article body.");
        assert_eq!(json["parameters"]["max_length"], 150);
        assert_eq!(json["parameters"]["num_beams"], 2);
        assert_eq!(json["parameters"]["length_penalty"], 2.0);
        assert_eq!(json["parameters"]["early_stopping"], true);
        assert_eq!(json["options"]["wait_for_model"], true);
    }

    #[test]
    fn test_build_request_truncates_input() {
        let text = "word ".repeat(5000);
        let request = build_request(&text);
        assert_eq!(token_count(&request.inputs), MAX_INPUT_TOKENS);
        assert!(request.inputs.starts_with(PROMPT_PREFIX));
    }

    #[test]
    fn test_parse_response_variants() {
        let ok = parse_response(StatusCode::OK, r#"[{"generated_text": "A short summary."}]"#);
        assert_eq!(ok.unwrap(), "A short summary.");

        let ok = parse_response(StatusCode::OK, r#"[{"summary_text": "Pipeline style."}]"#);
        assert_eq!(ok.unwrap(), "Pipeline style.");

        let ok = parse_response(StatusCode::OK, r#"{"generated_text": "Single object."}"#);
        assert_eq!(ok.unwrap(), "Single object.");
    }

    #[test]
    fn test_parse_response_bounds_output_tokens() {
        let long = "token ".repeat(400);
        let body = serde_json::json!([{ "generated_text": long }]).to_string();
        let summary = parse_response(StatusCode::OK, &body).unwrap();
        assert_eq!(token_count(&summary), MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn test_parse_response_errors_are_model_errors() {
        let err = parse_response(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error": "Model is currently loading", "estimated_time": 20.0}"#,
        )
        .unwrap_err();
        assert!(matches!(&err, NewsError::Model(m) if m.contains("currently loading")));

        let err = parse_response(StatusCode::OK, "[]").unwrap_err();
        assert!(matches!(err, NewsError::Model(_)));

        let err = parse_response(StatusCode::OK, "<html>gateway</html>").unwrap_err();
        assert!(matches!(err, NewsError::Model(_)));

        let err = parse_response(StatusCode::OK, r#"{"error": "bad input"}"#).unwrap_err();
        assert!(matches!(&err, NewsError::Model(m) if m == "bad input"));
    }

    #[tokio::test]
    async fn test_retry_recovers_after_failures() {
        let flaky = Flaky {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let retry = Retry::new(flaky, 3, Duration::from_millis(1));
        let summary = retry.summarize("text").await.unwrap();
        assert_eq!(summary, "summary of text");
        assert_eq!(retry.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let flaky = Flaky {
            failures: 10,
            calls: AtomicUsize::new(0),
        };
        let retry = Retry::new(flaky, 1, Duration::from_millis(1));
        assert!(retry.summarize("text").await.is_err());
        assert_eq!(retry.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_retries_calls_once() {
        let flaky = Flaky {
            failures: 1,
            calls: AtomicUsize::new(0),
        };
        let retry = Retry::new(flaky, 0, Duration::from_millis(1));
        assert!(retry.summarize("text").await.is_err());
        assert_eq!(retry.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_init_is_load_once() {
        let first = init(&SummarizerConfig::default()).unwrap();
        let other = SummarizerConfig {
            endpoint: "http://127.0.0.1:9/other".to_string(),
            ..SummarizerConfig::default()
        };
        let second = init(&other).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_model_error() {
        let config = SummarizerConfig {
            endpoint: "http://127.0.0.1:9/generate".to_string(),
            timeout_secs: 5,
            ..SummarizerConfig::default()
        };
        let model = ModelSummarizer::new(&config).unwrap();
        let err = model.summarize("Some text.").await.unwrap_err();
        assert!(matches!(err, NewsError::Model(_)));
    }
}
