//! Semantic Similarity Engine — embeds texts with a static sentence-embedding
//! model and compares them with cosine similarity.
//!
//! # Lazy model
//! The model is loaded on first use through `ensure_loaded`, guarded by a
//! `tokio::sync::OnceCell`: concurrent first callers wait on a single load and
//! all observe the same instance. A failed load leaves the cell empty, so the
//! next request tries again.
//!
//! Loading and embedding are CPU-bound and run inside `spawn_blocking`.

use std::sync::Arc;
use std::time::Instant;

use model2vec_rs::model::StaticModel;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Texts are cut to this many characters before embedding.
pub const MAX_EMBED_CHARS: usize = 2500;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Failed to load embedding model '{model}': {reason}")]
    ModelLoad { model: String, reason: String },

    #[error("Embedding task failed: {0}")]
    Task(String),
}

/// A loaded sentence-embedding model.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Blocking constructor for the embedding model, run at most once per engine.
pub type EmbedderLoader = Arc<dyn Fn() -> anyhow::Result<Arc<dyn Embedder>> + Send + Sync>;

struct StaticEmbedder(StaticModel);

impl Embedder for StaticEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        self.0.encode_single(text)
    }
}

pub struct SimilarityEngine {
    model_name: String,
    loader: EmbedderLoader,
    model: OnceCell<Arc<dyn Embedder>>,
}

impl SimilarityEngine {
    /// Engine backed by a model2vec model (Hugging Face repo id or local folder).
    pub fn model2vec(model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        let repo_or_path = model_name.clone();
        let loader: EmbedderLoader = Arc::new(move || -> anyhow::Result<Arc<dyn Embedder>> {
            let model = StaticModel::from_pretrained(&repo_or_path, None, None, None)?;
            Ok(Arc::new(StaticEmbedder(model)))
        });
        Self::with_loader(model_name, loader)
    }

    pub fn with_loader(model_name: impl Into<String>, loader: EmbedderLoader) -> Self {
        Self {
            model_name: model_name.into(),
            loader,
            model: OnceCell::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Returns the shared model, loading it on the first call.
    pub async fn ensure_loaded(&self) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        self.model
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                let start = Instant::now();
                info!("Loading embedding model '{}'...", self.model_name);

                let model = tokio::task::spawn_blocking(move || loader())
                    .await
                    .map_err(|e| EmbeddingError::Task(e.to_string()))?
                    .map_err(|e| EmbeddingError::ModelLoad {
                        model: self.model_name.clone(),
                        reason: format!("{e:#}"),
                    })?;

                info!(
                    "Embedding model '{}' loaded in {:.2?}",
                    self.model_name,
                    start.elapsed()
                );
                Ok::<_, EmbeddingError>(model)
            })
            .await
            .cloned()
    }

    /// Embeds the first `MAX_EMBED_CHARS` characters of `text`.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = self.ensure_loaded().await?;
        let text = truncate_chars(text, MAX_EMBED_CHARS).to_string();
        tokio::task::spawn_blocking(move || model.embed(&text))
            .await
            .map_err(|e| EmbeddingError::Task(e.to_string()))
    }

    /// Cosine similarity of the two texts, scaled to a percentage (-100 to 100).
    pub async fn semantic_score(&self, resume: &str, jd: &str) -> Result<f64, EmbeddingError> {
        let resume_vec = self.embed(resume).await?;
        let jd_vec = self.embed(jd).await?;
        let similarity = cosine_similarity(&resume_vec, &jd_vec);
        debug!("Semantic similarity: {similarity:.4}");
        Ok(f64::from(similarity) * 100.0)
    }
}

/// Cosine similarity in [-1, 1]. Mismatched, empty or zero vectors give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Prefix of at most `max_chars` characters, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
