// Model download helper for the local ONNX sentiment model.
//
// Fetches the model config, the WordPiece vocabulary and an ONNX graph from
// a Hugging Face repo. Files are stored in a platform-appropriate directory
// (~/.local/share/commentmood/models/ on Linux) so they persist across runs.
//
// The published savasy repo carries PyTorch/TF weights only. When no ONNX
// graph is found the download stops with the `optimum-cli` command that
// exports one into the same directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Repo the files are fetched from. Override with COMMENTMOOD_MODEL_URL to
/// point at a repo that publishes `onnx/model.onnx`.
pub const DEFAULT_MODEL_URL: &str =
    "https://huggingface.co/savasy/bert-base-turkish-sentiment-cased/resolve/main";

/// Local file names inside the model directory.
pub const MODEL_FILE: &str = "model.onnx";
/// Written by `optimum-cli` exports; preferred over `VOCAB_FILE` when present.
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const VOCAB_FILE: &str = "vocab.txt";
pub const CONFIG_FILE: &str = "config.json";

/// Path of the ONNX graph inside the remote repo.
const REMOTE_MODEL_PATH: &str = "onnx/model.onnx";

/// Returns the default directory for storing model files.
/// Uses the platform data directory: ~/.local/share/commentmood/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("commentmood")
        .join("models")
}

/// Check whether the ONNX graph and a tokenizer source exist.
pub fn model_files_present(dir: &Path) -> bool {
    dir.join(MODEL_FILE).exists()
        && (dir.join(TOKENIZER_FILE).exists() || dir.join(VOCAB_FILE).exists())
}

/// Command that exports the model to ONNX straight into `dir`.
pub fn export_command(dir: &Path) -> String {
    format!(
        "optimum-cli export onnx --model {} --task text-classification {}",
        super::traits::MODEL_ID,
        dir.display()
    )
}

/// One file to fetch: remote path, local name, whether it's big enough for
/// a progress bar.
struct ModelFile {
    remote: &'static str,
    local: &'static str,
    large: bool,
}

const FILES: [ModelFile; 3] = [
    ModelFile {
        remote: CONFIG_FILE,
        local: CONFIG_FILE,
        large: false,
    },
    ModelFile {
        remote: VOCAB_FILE,
        local: VOCAB_FILE,
        large: false,
    },
    ModelFile {
        remote: REMOTE_MODEL_PATH,
        local: MODEL_FILE,
        large: true,
    },
];

/// Download the sentiment model files from `base_url` into `dir`.
///
/// Shows a progress bar for the model graph. Skips files that already exist.
pub async fn download_model(base_url: &str, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    println!("\nSentiment model ({}):", super::traits::MODEL_ID);

    let base_url = base_url.trim_end_matches('/');
    for file in &FILES {
        let dest = dir.join(file.local);
        if dest.exists() {
            info!(file = file.local, "Model file already exists, skipping");
            println!("  {} (already exists)", file.local);
            continue;
        }

        println!("  Downloading {}...", file.local);
        let url = format!("{}/{}", base_url, file.remote);
        let result = download_file(&url, &dest, file.large).await;
        if file.local == MODEL_FILE {
            result.with_context(|| {
                format!(
                    "No ONNX graph at {url}. Export one with:\n  {}\n\
                     or set COMMENTMOOD_MODEL_URL to a repo that publishes onnx/model.onnx.",
                    export_command(dir)
                )
            })?;
        } else {
            result?;
        }
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = if show_progress {
        let pb = match response.content_length() {
            Some(size) => {
                let pb = ProgressBar::new(size);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .expect("valid template")
                        .progress_chars("=> "),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("    {spinner} {bytes}")
                        .expect("valid template"),
                );
                pb
            }
        };
        Some(pb)
    } else {
        None
    };

    // Buffer in memory; the largest file is a few hundred MB.
    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        bytes.extend_from_slice(&chunk);
        if let Some(ref pb) = pb {
            pb.set_position(bytes.len() as u64);
        }
    }

    std::fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_commentmood() {
        let dir = default_model_dir();
        let path_str = dir.to_string_lossy();
        assert!(
            path_str.contains("commentmood") && path_str.contains("models"),
            "Expected path containing commentmood/models, got: {path_str}"
        );
    }

    #[test]
    fn test_model_files_present_false_when_empty() {
        let dir = std::env::temp_dir().join("commentmood-test-nonexistent");
        assert!(!model_files_present(&dir));
    }

    #[test]
    fn test_model_files_present_true_when_files_exist() {
        let dir = std::env::temp_dir().join("commentmood-model-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MODEL_FILE), b"fake").unwrap();
        std::fs::write(dir.join(TOKENIZER_FILE), b"fake").unwrap();

        assert!(model_files_present(&dir));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_vocab_is_enough_as_tokenizer_source() {
        let dir = std::env::temp_dir().join("commentmood-model-vocab-test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(VOCAB_FILE), b"[UNK]\n").unwrap();
        assert!(!model_files_present(&dir), "graph still missing");

        std::fs::write(dir.join(MODEL_FILE), b"fake").unwrap();
        assert!(model_files_present(&dir));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_command_targets_dir() {
        let cmd = export_command(Path::new("/tmp/models"));
        assert!(cmd.starts_with("optimum-cli export onnx"));
        assert!(cmd.contains("savasy/bert-base-turkish-sentiment-cased"));
        assert!(cmd.ends_with("/tmp/models"));
    }

    #[tokio::test]
    async fn test_missing_onnx_graph_points_at_export() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vocab.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[UNK]\n"))
            .mount(&server)
            .await;
        // Anything else, including onnx/model.onnx, is a 404

        let dir = std::env::temp_dir().join("commentmood-download-test");
        let _ = std::fs::remove_dir_all(&dir);

        let err = download_model(&server.uri(), &dir).await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("optimum-cli export onnx"), "got: {message}");
        assert!(message.contains("404"), "got: {message}");

        assert!(dir.join(CONFIG_FILE).exists());
        assert!(dir.join(VOCAB_FILE).exists());
        assert!(!dir.join(MODEL_FILE).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
