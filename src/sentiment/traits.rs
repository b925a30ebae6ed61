// Sentiment classifier trait — the swap-ready abstraction.
//
// The default implementation runs a local ONNX export of a Turkish BERT
// sentiment model. The hosted Hugging Face Inference API is available as a
// fallback for machines without the model files.

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

/// Identifier of the pretrained model both backends use.
pub const MODEL_ID: &str = "savasy/bert-base-turkish-sentiment-cased";

/// Binary sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Parse a label string as returned by a model.
    ///
    /// Accepts the model's own vocabulary ("positive"/"negative") in any case,
    /// and the generic "LABEL_1"/"LABEL_0" names exports fall back to when the
    /// id2label mapping was lost.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" | "label_1" => Some(Label::Positive),
            "negative" | "neg" | "label_0" => Some(Label::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of classifying a single piece of text.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentResult {
    pub label: Label,
    /// Model confidence for `label`, 0.0 to 1.0
    pub score: f64,
}

/// Trait for classifying text sentiment. Implementations are async because
/// the hosted backend makes HTTP calls.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a single text. Over-long input is truncated, never rejected.
    async fn classify(&self, text: &str) -> Result<SentimentResult>;
}
