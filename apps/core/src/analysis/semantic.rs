//! Embedding-based classification using FastEmbed.
//!
//! Each label is represented by the embedding of a few short descriptions;
//! input text is embedded with the same AllMiniLML6V2 model and compared by
//! cosine similarity. Similarities are scaled and passed through softmax so
//! the confidence is comparable to the pattern classifiers.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use lru::LruCache;
use tracing::{debug, info, warn};

use crate::analysis::classifier::{select_label, TextClassifier};
use crate::analysis::labels::{Audience, Classification, Formality, Intent, Label};
use crate::error::ClassifierError;

/// Cosine similarities live in [-1, 1]; scale them so softmax can separate
/// labels.
const SIMILARITY_SCALE: f32 = 10.0;
const QUERY_CACHE_SIZE: usize = 256;

/// Natural-language descriptions that anchor a label in embedding space.
pub trait LabelDescriptions: Label {
    fn descriptions(&self) -> &'static [&'static str];
}

impl LabelDescriptions for Intent {
    fn descriptions(&self) -> &'static [&'static str] {
        match self {
            Intent::FollowUp => &[
                "following up on a previous email",
                "checking in about a pending item",
                "reminder about an earlier message with no reply",
            ],
            Intent::Request => &[
                "asking the recipient to do something",
                "could you please send or share",
                "requesting information, approval or action",
            ],
            Intent::Inform => &[
                "sharing information or an announcement",
                "letting the recipient know about an update",
                "for your information, no action needed",
            ],
        }
    }
}

impl LabelDescriptions for Audience {
    fn descriptions(&self) -> &'static [&'static str] {
        match self {
            Audience::Professional => &[
                "business email to a colleague, client or manager",
                "work project, meeting, deadline or report",
            ],
            Audience::Personal => &[
                "personal message to family or a close friend",
                "weekend plans, birthday, love and hugs",
            ],
            Audience::General => &[
                "message to a broad audience such as all customers or subscribers",
                "newsletter or public announcement to everyone",
            ],
        }
    }
}

impl LabelDescriptions for Formality {
    fn descriptions(&self) -> &'static [&'static str] {
        match self {
            Formality::Informal => &[
                "casual chatty sentence with slang and contractions",
                "hey thanks so much, gonna, lol",
            ],
            Formality::Neutral => &["plain everyday sentence", "simple factual statement"],
            Formality::Formal => &[
                "formal business correspondence",
                "I am writing to inform you, kind regards, sincerely",
            ],
        }
    }
}

/// Load the shared embedding model.
pub fn load_model() -> Result<Arc<TextEmbedding>, ClassifierError> {
    let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2);
    options.show_download_progress = false;

    let model = TextEmbedding::try_new(options).map_err(|e| ClassifierError::Unavailable {
        classifier: "embedding-model".to_string(),
        reason: e.to_string(),
    })?;

    info!("Embedding model loaded");
    Ok(Arc::new(model))
}

/// Classifier backed by sentence embeddings.
pub struct EmbeddingClassifier<L: LabelDescriptions> {
    name: &'static str,
    model: Arc<TextEmbedding>,
    label_embeddings: Vec<(L, Vec<f32>)>,
    fallback: L,
    cache: Mutex<LruCache<String, Vec<f32>>>,
}

impl<L: LabelDescriptions> EmbeddingClassifier<L> {
    /// Pre-compute one centroid per label from its descriptions.
    pub fn new(
        name: &'static str,
        model: Arc<TextEmbedding>,
        fallback: L,
    ) -> Result<Self, ClassifierError> {
        let mut label_embeddings = Vec::with_capacity(L::ALL.len());

        for label in L::ALL {
            let descriptions: Vec<String> =
                label.descriptions().iter().map(|d| d.to_string()).collect();
            let embeddings = model.embed(descriptions, None).map_err(|e| ClassifierError::Unavailable {
                classifier: name.to_string(),
                reason: format!("failed to embed descriptions for '{}': {}", label, e),
            })?;

            let centroid = centroid(&embeddings).ok_or_else(|| ClassifierError::Unavailable {
                classifier: name.to_string(),
                reason: format!("empty embedding for '{}'", label),
            })?;
            label_embeddings.push((*label, centroid));
        }

        debug!(classifier = name, labels = label_embeddings.len(), "Label embeddings computed");

        Ok(Self {
            name,
            model,
            label_embeddings,
            fallback,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(QUERY_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            )),
        })
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>, ClassifierError> {
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(text) {
                return Ok(hit.clone());
            }
        }

        let embedding = self
            .model
            .embed(vec![text.to_string()], None)
            .map_err(|e| ClassifierError::Inference {
                classifier: self.name.to_string(),
                reason: e.to_string(),
            })?
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::Inference {
                classifier: self.name.to_string(),
                reason: "model returned no embedding".to_string(),
            })?;

        match self.cache.lock() {
            Ok(mut cache) => {
                cache.put(text.to_string(), embedding.clone());
            }
            Err(_) => warn!(classifier = self.name, "Embedding cache lock poisoned"),
        }

        Ok(embedding)
    }
}

impl<L: LabelDescriptions> TextClassifier<L> for EmbeddingClassifier<L> {
    fn name(&self) -> &str {
        self.name
    }

    fn classify(&self, text: &str) -> Result<Classification<L>, ClassifierError> {
        let query = self.embed_query(text)?;

        let mut scores = vec![0.0f32; L::ALL.len()];
        for (label, embedding) in &self.label_embeddings {
            scores[label.index()] = cosine_similarity(&query, embedding) * SIMILARITY_SCALE;
        }

        Ok(select_label(&scores, self.fallback))
    }
}

fn centroid(embeddings: &[Vec<f32>]) -> Option<Vec<f32>> {
    let first = embeddings.first()?;
    let mut sum = vec![0.0f32; first.len()];

    for embedding in embeddings {
        for (acc, value) in sum.iter_mut().zip(embedding) {
            *acc += value;
        }
    }

    let n = embeddings.len() as f32;
    Some(sum.into_iter().map(|v| v / n).collect())
}

/// Calculate cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(c, vec![0.5, 0.5]);
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_embedding_classifier() {
        // Requires the model to be downloadable; skipped offline.
        let Ok(model) = load_model() else {
            return;
        };
        let classifier = EmbeddingClassifier::new("intent-embeddings", model, Intent::Inform).unwrap();
        let result = classifier
            .classify("Just checking in on my previous email, any update?")
            .unwrap();
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
    }
}
