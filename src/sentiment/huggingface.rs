// Hugging Face Inference API classifier.
//
// Sends each text to the hosted text-classification endpoint for the same
// model the local backend runs. Useful when the ONNX export isn't available.
//
// API docs: https://huggingface.co/docs/inference-providers/tasks/text-classification

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::{Label, SentimentClassifier, SentimentResult, MODEL_ID};

/// Default host of the hosted inference endpoints.
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// The hosted pipeline rejects inputs over the model's token window, so we
/// cut client side. 512 word pieces of Turkish text stay well above this.
pub const MAX_INPUT_CHARS: usize = 1000;

/// Hosted-inference sentiment classifier.
pub struct HuggingFaceClassifier {
    client: Client,
    endpoint: String,
    api_token: String,
    rate_limiter: RateLimiter,
}

impl HuggingFaceClassifier {
    /// Create a classifier for `MODEL_ID` under the given inference base URL.
    pub fn new(base_url: &str, api_token: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), MODEL_ID),
            api_token,
            // Free tier: stay around 5 requests per second
            rate_limiter: RateLimiter::new(5.0),
        }
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        self.rate_limiter.acquire().await;

        let request = InferenceRequest {
            inputs: truncate_input(text, MAX_INPUT_CHARS),
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .context("Failed to call Hugging Face Inference API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Hugging Face Inference API returned {}: {}", status, body);
        }

        let body: InferenceResponse = response
            .json()
            .await
            .context("Failed to parse Hugging Face Inference API response")?;

        let result = best_label(body)?;

        debug!(
            label = %result.label,
            score = result.score,
            text_preview = %crate::report::truncate_chars(text, 50),
            "Hosted model classified text"
        );

        Ok(result)
    }
}

/// Keep at most `max_chars` characters, respecting UTF-8 boundaries.
fn truncate_input(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Pick the highest-scoring label we understand from an API response.
fn best_label(response: InferenceResponse) -> Result<SentimentResult> {
    let candidates = match response {
        InferenceResponse::Nested(mut rows) => {
            if rows.is_empty() {
                Vec::new()
            } else {
                rows.swap_remove(0)
            }
        }
        InferenceResponse::Flat(scores) => scores,
        InferenceResponse::Error { error } => {
            anyhow::bail!("Hugging Face Inference API error: {error}")
        }
    };

    candidates
        .into_iter()
        .filter_map(|c| Label::from_model_label(&c.label).map(|label| (label, c.score)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(label, score)| SentimentResult { label, score })
        .ok_or_else(|| anyhow::anyhow!("Hugging Face response contained no known label"))
}

// --- Inference API request/response types ---

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

/// The endpoint answers `[[{label, score}, ...]]` for a single input, some
/// deployments flatten that to `[{label, score}, ...]`, and failures come
/// back as `{"error": "..."}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Error { error: String },
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}
