//! Sentiment classification.
//!
//! Wraps a pluggable [`SentimentScorer`] and applies the fixed polarity
//! cutoffs. Neutral text is not a reply category: it yields `None` and the
//! selector falls through to the default pool.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::category::Category;
use crate::error::ChatError;

/// Compound score strictly above this is positive
pub const POSITIVE_CUTOFF: f64 = 0.3;
/// Compound score strictly below this is negative
pub const NEGATIVE_CUTOFF: f64 = -0.3;

/// Polarity record produced by a scorer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarityScores {
    /// Share of negative signal (0.0 - 1.0)
    pub neg: f64,
    /// Share of neutral signal (0.0 - 1.0)
    pub neu: f64,
    /// Share of positive signal (0.0 - 1.0)
    pub pos: f64,
    /// Normalized overall polarity (-1.0 - 1.0)
    pub compound: f64,
}

impl PolarityScores {
    /// A record carrying only a compound score
    pub fn from_compound(compound: f64) -> Self {
        Self {
            compound,
            ..Self::default()
        }
    }
}

/// Maps text to polarity scores.
///
/// Lexicon-based and model-based scorers are interchangeable as long as the
/// compound score lands in [-1.0, 1.0].
pub trait SentimentScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> Result<PolarityScores, ChatError>;
}

/// Sentiment outcome that maps onto a reply category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Classify a compound score against the fixed cutoffs.
    pub fn from_compound(compound: f64) -> Option<Self> {
        if compound > POSITIVE_CUTOFF {
            Some(Sentiment::Positive)
        } else if compound < NEGATIVE_CUTOFF {
            Some(Sentiment::Negative)
        } else {
            None
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Sentiment::Positive => Category::Positive,
            Sentiment::Negative => Category::Negative,
        }
    }
}

/// Outcome of one classification, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentReading {
    /// Compound score, when the scorer produced a usable one
    pub compound: Option<f64>,
    pub sentiment: Option<Sentiment>,
}

/// Threshold classifier over a scorer
#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentClassifier {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    /// Positive / negative classification of `text`, `None` when neutral.
    ///
    /// A failing scorer counts as "no classification".
    pub fn classify(&self, text: &str) -> Option<Sentiment> {
        self.read(text).sentiment
    }

    /// Same as [`classify`](Self::classify), also reporting the compound score
    pub fn read(&self, text: &str) -> SentimentReading {
        match self.compound(text) {
            Ok(compound) => SentimentReading {
                compound: Some(compound),
                sentiment: Sentiment::from_compound(compound),
            },
            Err(e) => {
                warn!("Treating turn as unclassified: {}", e);
                SentimentReading {
                    compound: None,
                    sentiment: None,
                }
            }
        }
    }

    fn compound(&self, text: &str) -> Result<f64, ChatError> {
        let scores = self.scorer.polarity_scores(text)?;
        let compound = scores.compound;
        if !compound.is_finite() || !(-1.0..=1.0).contains(&compound) {
            return Err(ChatError::Scorer(format!(
                "compound score {} outside [-1, 1]",
                compound
            )));
        }
        Ok(compound)
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl SentimentScorer for Fixed {
        fn polarity_scores(&self, _text: &str) -> Result<PolarityScores, ChatError> {
            Ok(PolarityScores::from_compound(self.0))
        }
    }

    struct Broken;

    impl SentimentScorer for Broken {
        fn polarity_scores(&self, _text: &str) -> Result<PolarityScores, ChatError> {
            Err(ChatError::Scorer("lexicon missing".to_string()))
        }
    }

    fn classify_with(compound: f64) -> Option<Sentiment> {
        SentimentClassifier::new(Arc::new(Fixed(compound))).classify("anything")
    }

    #[test]
    fn test_cutoffs_are_strict() {
        assert_eq!(classify_with(0.3), None);
        assert_eq!(classify_with(-0.3), None);
        assert_eq!(classify_with(0.300_001), Some(Sentiment::Positive));
        assert_eq!(classify_with(-0.300_001), Some(Sentiment::Negative));
    }

    #[test]
    fn test_extremes_and_neutral() {
        assert_eq!(classify_with(1.0), Some(Sentiment::Positive));
        assert_eq!(classify_with(-1.0), Some(Sentiment::Negative));
        assert_eq!(classify_with(0.0), None);
    }

    #[test]
    fn test_failing_scorer_is_unclassified() {
        let classifier = SentimentClassifier::new(Arc::new(Broken));
        let reading = classifier.read("i love it");

        assert_eq!(reading.compound, None);
        assert_eq!(reading.sentiment, None);
    }

    #[test]
    fn test_malformed_compound_is_unclassified() {
        assert_eq!(classify_with(f64::NAN), None);
        assert_eq!(classify_with(1.5), None);
        assert_eq!(classify_with(-7.0), None);
    }

    #[test]
    fn test_sentiment_category_mapping() {
        assert_eq!(Sentiment::Positive.category(), Category::Positive);
        assert_eq!(Sentiment::Negative.category(), Category::Negative);
    }
}
