// Local ONNX sentiment classifier.
//
// Runs an ONNX export of savasy/bert-base-turkish-sentiment-cased on the
// local CPU without API calls. The model is a BERT sequence
// classifier with two output logits.
//
// Inputs longer than the model's 512-token window are truncated by the
// tokenizer before inference. The tokenizer comes from `tokenizer.json`
// when an export wrote one, otherwise it is rebuilt from `vocab.txt`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use serde::Deserialize;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::download::{export_command, CONFIG_FILE, MODEL_FILE, TOKENIZER_FILE, VOCAB_FILE};
use super::traits::{Label, SentimentClassifier, SentimentResult};

/// Maximum sequence length of the BERT encoder, special tokens included.
pub const MAX_SEQUENCE_LENGTH: usize = 512;

/// Output order when the export carries no usable id2label mapping.
const DEFAULT_LABEL_ORDER: [Label; 2] = [Label::Negative, Label::Positive];

/// Local ONNX-based classifier. Holds the model session and tokenizer
/// behind Arc<Mutex> so inference can be offloaded to spawn_blocking.
pub struct OnnxSentimentClassifier {
    // ort::Session::run takes &mut self, and spawn_blocking needs 'static.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    labels: [Label; 2],
}

impl OnnxSentimentClassifier {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Expects `model.onnx` plus `tokenizer.json` or `vocab.txt` in
    /// `model_dir`; `config.json` is optional and only read for the label
    /// order.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nExport it with `{}`.",
                model_path.display(),
                export_command(model_dir)
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = load_tokenizer(model_dir)?;

        let labels = match std::fs::read_to_string(model_dir.join(CONFIG_FILE)) {
            Ok(json) => label_order_from_config(&json).unwrap_or(DEFAULT_LABEL_ORDER),
            Err(_) => DEFAULT_LABEL_ORDER,
        };

        debug!(
            labels = ?labels,
            "Loaded ONNX sentiment model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            labels,
        })
    }
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    /// Tokenize (with truncation), run one forward pass and softmax the two
    /// logits. CPU-bound work runs on a blocking thread.
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let labels = self.labels;
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let encoding = tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

            let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();

            let shape = [1_i64, ids.len() as i64];

            let input_ids_tensor = Tensor::from_array((shape, ids))
                .context("Failed to create input_ids tensor")?;
            let attention_mask_tensor = Tensor::from_array((shape, mask))
                .context("Failed to create attention_mask tensor")?;
            let token_type_ids_tensor = Tensor::from_array((shape, type_ids))
                .context("Failed to create token_type_ids tensor")?;

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor,
                        "token_type_ids" => token_type_ids_tensor
                    })
                    .context("ONNX inference failed")?;

                // Output shape: [1, 2]
                let (_out_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            let result = pick_label(&logits, &labels)?;

            debug!(
                label = %result.label,
                score = result.score,
                text_preview = %crate::report::truncate_chars(&text, 50),
                "ONNX classified text"
            );

            Ok(result)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Load the tokenizer for `model_dir` with truncation at the model window.
pub fn load_tokenizer(model_dir: &Path) -> Result<Tokenizer> {
    let tokenizer_path = model_dir.join(TOKENIZER_FILE);
    let vocab_path = model_dir.join(VOCAB_FILE);

    let mut tokenizer = if tokenizer_path.exists() {
        Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?
    } else if vocab_path.exists() {
        wordpiece_tokenizer(&vocab_path)?
    } else {
        anyhow::bail!(
            "No {} or {} in {}\nRun `commentmood download-model` to download it.",
            TOKENIZER_FILE,
            VOCAB_FILE,
            model_dir.display()
        );
    };

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: MAX_SEQUENCE_LENGTH,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer truncation: {}", e))?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}

/// The cased BERT tokenizer pipeline over a plain `vocab.txt`: no
/// lowercasing, no accent stripping, `[CLS] ... [SEP]` around each input.
fn wordpiece_tokenizer(vocab_path: &Path) -> Result<Tokenizer> {
    let vocab = vocab_path
        .to_str()
        .with_context(|| format!("Vocabulary path is not UTF-8: {}", vocab_path.display()))?;

    let wordpiece = WordPiece::from_file(vocab)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", vocab_path.display(), e))?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    let cls = tokenizer
        .token_to_id("[CLS]")
        .context("Vocabulary has no [CLS] token")?;
    let sep = tokenizer
        .token_to_id("[SEP]")
        .context("Vocabulary has no [SEP] token")?;

    tokenizer
        .with_normalizer(Some(BertNormalizer::new(true, true, None, false)))
        .with_pre_tokenizer(Some(BertPreTokenizer))
        .with_post_processor(Some(BertProcessing::new(
            ("[SEP]".to_string(), sep),
            ("[CLS]".to_string(), cls),
        )));

    Ok(tokenizer)
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = logits.iter().map(|&l| (l as f64 - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Map a two-logit output row to the winning label and its probability.
fn pick_label(logits: &[f32], labels: &[Label; 2]) -> Result<SentimentResult> {
    if logits.len() != labels.len() {
        anyhow::bail!(
            "Expected {} logits from the sentiment model, got {}",
            labels.len(),
            logits.len()
        );
    }

    let probs = softmax(logits);
    let (idx, score) = probs
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, p)| if p > best.1 { (i, p) } else { best });

    Ok(SentimentResult {
        label: labels[idx],
        score,
    })
}

#[derive(Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

/// Read the label order from a Hugging Face `config.json`.
///
/// Returns None unless ids 0 and 1 both map to labels we understand.
fn label_order_from_config(json: &str) -> Option<[Label; 2]> {
    let config: ModelConfig = serde_json::from_str(json).ok()?;
    let first = Label::from_model_label(config.id2label.get("0")?)?;
    let second = Label::from_model_label(config.id2label.get("1")?)?;
    (first != second).then_some([first, second])
}
