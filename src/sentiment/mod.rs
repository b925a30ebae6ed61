// Sentiment classification — trait-based abstraction for swappable backends.
//
// The SentimentClassifier trait defines the interface. The local ONNX model
// is the default; the hosted Hugging Face Inference API runs the same model
// when the ONNX files aren't available.

pub mod download;
pub mod huggingface;
pub mod onnx;
pub mod rate_limiter;
pub mod traits;

pub use traits::{Label, SentimentClassifier, SentimentResult};
