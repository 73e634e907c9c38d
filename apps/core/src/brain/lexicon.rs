//! Lexicon-based sentiment scorer.
//!
//! Backed by the VADER rule set and its full valence lexicon
//! (`vader_sentiment`): boosters, negations, contrastive "but", ALL-CAPS and
//! punctuation emphasis, squashed into a compound score in [-1, 1].

use std::collections::HashMap;
use vader_sentiment::SentimentIntensityAnalyzer;

use super::sentiment::{PolarityScores, SentimentScorer};
use crate::error::ChatError;

/// Built-in VADER scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity_scores(&self, text: &str) -> Result<PolarityScores, ChatError> {
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        scores_from_map(&scores)
    }
}

/// Convert VADER's keyed output into a polarity record; `compound` is required
fn scores_from_map(scores: &HashMap<&str, f64>) -> Result<PolarityScores, ChatError> {
    let compound = scores
        .get("compound")
        .copied()
        .ok_or_else(|| ChatError::Scorer("no compound score in VADER output".to_string()))?;
    let share = |key: &str| scores.get(key).copied().unwrap_or(0.0);

    Ok(PolarityScores {
        neg: share("neg"),
        neu: share("neu"),
        pos: share("pos"),
        compound,
    })
}
