use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Which sentiment classification backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Local ONNX model (default) — no API key needed, no rate limits
    Onnx,
    /// Hosted Hugging Face Inference API — requires HF_API_TOKEN
    HuggingFace,
}

impl ClassifierBackend {
    /// Parse the `COMMENTMOOD_CLASSIFIER` value. Unknown or unset values fall
    /// back to the local ONNX model.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("huggingface") | Some("hf") => ClassifierBackend::HuggingFace,
            _ => ClassifierBackend::Onnx,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClassifierBackend::Onnx => "onnx",
            ClassifierBackend::HuggingFace => "huggingface",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    /// Reddit rejects requests without a descriptive User-Agent.
    pub reddit_user_agent: String,
    /// Host of the OAuth token endpoint (defaults to https://www.reddit.com).
    pub reddit_auth_url: String,
    /// Host for authenticated API calls (defaults to https://oauth.reddit.com).
    pub reddit_api_url: String,
    /// Which sentiment classifier to use (default: Onnx)
    pub classifier_backend: ClassifierBackend,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Base URL the ONNX model and tokenizer are downloaded from
    pub model_url: String,
    pub hf_api_token: String,
    pub hf_inference_url: String,
    /// Rendered charts land in a timestamped subdirectory of this
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is validated here. Missing Reddit credentials only matter
    /// for `run`, so callers check with `require_reddit` at the point of use.
    pub fn load() -> Self {
        let classifier_backend =
            ClassifierBackend::from_env_value(env::var("COMMENTMOOD_CLASSIFIER").ok().as_deref());

        let model_dir = env::var("COMMENTMOOD_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::sentiment::download::default_model_dir());

        Self {
            reddit_client_id: env_trimmed("REDDIT_CLIENT_ID"),
            reddit_client_secret: env_trimmed("REDDIT_CLIENT_SECRET"),
            reddit_user_agent: env_trimmed("REDDIT_USER_AGENT"),
            reddit_auth_url: env::var("REDDIT_AUTH_URL")
                .unwrap_or_else(|_| crate::reddit::client::DEFAULT_AUTH_URL.to_string()),
            reddit_api_url: env::var("REDDIT_API_URL")
                .unwrap_or_else(|_| crate::reddit::client::DEFAULT_API_URL.to_string()),
            classifier_backend,
            model_dir,
            model_url: env::var("COMMENTMOOD_MODEL_URL")
                .unwrap_or_else(|_| crate::sentiment::download::DEFAULT_MODEL_URL.to_string()),
            hf_api_token: env_trimmed("HF_API_TOKEN"),
            hf_inference_url: env::var("HF_INFERENCE_URL").unwrap_or_else(|_| {
                crate::sentiment::huggingface::DEFAULT_INFERENCE_URL.to_string()
            }),
            output_dir: env::var("COMMENTMOOD_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./output")),
        }
    }

    /// Check that all three Reddit credentials are configured.
    /// `RedditClient::connect` assumes this has passed.
    pub fn require_reddit(&self) -> Result<()> {
        let missing = self.missing_reddit_vars();
        if !missing.is_empty() {
            anyhow::bail!(
                "{} not set. Add them to your .env file.\n\
                 See .env.example for the required variables.",
                missing.join(", ")
            );
        }
        Ok(())
    }

    /// Names of the Reddit credential variables that are unset or empty.
    pub fn missing_reddit_vars(&self) -> Vec<&'static str> {
        [
            ("REDDIT_CLIENT_ID", &self.reddit_client_id),
            ("REDDIT_CLIENT_SECRET", &self.reddit_client_secret),
            ("REDDIT_USER_AGENT", &self.reddit_user_agent),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Validate that the chosen classifier backend has what it needs.
    /// For ONNX: model files must exist (or user should run download-model).
    /// For Hugging Face: API token must be set.
    pub fn require_classifier(&self) -> Result<()> {
        match self.classifier_backend {
            ClassifierBackend::Onnx => {
                if !crate::sentiment::download::model_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "ONNX model files not found in {}\n\
                         Run `commentmood download-model` to download them, \
                         or export the graph with `{}`.\n\
                         Or set COMMENTMOOD_CLASSIFIER=huggingface to use the hosted model instead.",
                        self.model_dir.display(),
                        crate::sentiment::download::export_command(&self.model_dir)
                    );
                }
                Ok(())
            }
            ClassifierBackend::HuggingFace => {
                if self.hf_api_token.is_empty() {
                    anyhow::bail!(
                        "HF_API_TOKEN not set. Add it to your .env file.\n\
                         See .env.example for the required variables."
                    );
                }
                Ok(())
            }
        }
    }
}

/// Read an env var, treating unset and whitespace-only values the same.
fn env_trimmed(name: &str) -> String {
    env::var(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(id: &str, secret: &str, agent: &str) -> Config {
        Config {
            reddit_client_id: id.to_string(),
            reddit_client_secret: secret.to_string(),
            reddit_user_agent: agent.to_string(),
            reddit_auth_url: crate::reddit::client::DEFAULT_AUTH_URL.to_string(),
            reddit_api_url: crate::reddit::client::DEFAULT_API_URL.to_string(),
            classifier_backend: ClassifierBackend::Onnx,
            model_dir: PathBuf::from("/nonexistent/commentmood-models"),
            model_url: crate::sentiment::download::DEFAULT_MODEL_URL.to_string(),
            hf_api_token: String::new(),
            hf_inference_url: crate::sentiment::huggingface::DEFAULT_INFERENCE_URL.to_string(),
            output_dir: PathBuf::from("./output"),
        }
    }

    #[test]
    fn test_require_reddit_ok_when_all_set() {
        let config = config_with("id", "secret", "commentmood/0.1");
        assert!(config.require_reddit().is_ok());
    }

    #[test]
    fn test_require_reddit_names_every_missing_var() {
        let config = config_with("id", "", "");
        let err = config.require_reddit().unwrap_err().to_string();
        assert!(err.contains("REDDIT_CLIENT_SECRET"));
        assert!(err.contains("REDDIT_USER_AGENT"));
        assert!(!err.contains("REDDIT_CLIENT_ID"));
    }

    #[test]
    fn test_backend_parsing() {
        assert_eq!(ClassifierBackend::from_env_value(None), ClassifierBackend::Onnx);
        assert_eq!(
            ClassifierBackend::from_env_value(Some("HuggingFace")),
            ClassifierBackend::HuggingFace
        );
        assert_eq!(
            ClassifierBackend::from_env_value(Some("something-else")),
            ClassifierBackend::Onnx
        );
    }

    #[test]
    fn test_require_classifier_onnx_without_files_fails() {
        let config = config_with("id", "secret", "agent");
        let err = config.require_classifier().unwrap_err().to_string();
        assert!(err.contains("download-model"));
        assert!(err.contains("optimum-cli export onnx"));
    }

    #[test]
    fn test_require_classifier_huggingface_needs_token() {
        let mut config = config_with("id", "secret", "agent");
        config.classifier_backend = ClassifierBackend::HuggingFace;
        assert!(config.require_classifier().is_err());
        config.hf_api_token = "hf_abc".to_string();
        assert!(config.require_classifier().is_ok());
    }
}
