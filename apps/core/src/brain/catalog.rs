//! Reply catalog.
//!
//! Maps every category to a non-empty pool of candidate replies. The catalog
//! is built once per process, validated, and read-only afterwards. Sampling
//! takes the random source as an argument so callers decide how replies are
//! drawn.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::info;

use super::category::Category;
use super::patterns::{PatternMatcher, RuleSpec};
use crate::error::ChatError;

const GREETING_REPLIES: &[&str] = &[
    "Hey there! How's it going?",
    "Hi! Nice to chat with you!",
    "Hello! What's on your mind?",
];

const FAREWELL_REPLIES: &[&str] = &["Catch you later!", "Bye for now!", "See ya!"];

const QUESTION_REPLIES: &[&str] = &[
    "Hmm, that's a good one! Can you tell me more?",
    "Interesting question! What's the context?",
    "Let me think... Could you clarify that a bit?",
];

const POSITIVE_REPLIES: &[&str] = &[
    "That's awesome to hear!",
    "Love the positivity!",
    "You're killing it!",
];

const NEGATIVE_REPLIES: &[&str] = &[
    "Oh no, sorry to hear that. Want to talk about it?",
    "That sounds tough. I'm here for you!",
    "Hang in there, things will get better.",
];

const DEFAULT_REPLIES: &[&str] = &[
    "Cool, tell me more!",
    "That's interesting! What's next?",
    "Nice, what's on your mind now?",
];

/// Immutable category -> reply pool mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyCatalog {
    pools: HashMap<Category, Vec<String>>,
}

impl Default for ReplyCatalog {
    fn default() -> Self {
        let pools = Category::ALL
            .into_iter()
            .map(|category| {
                let replies = default_pool(category).iter().map(|s| s.to_string()).collect();
                (category, replies)
            })
            .collect();
        Self { pools }
    }
}

fn default_pool(category: Category) -> &'static [&'static str] {
    match category {
        Category::Greeting => GREETING_REPLIES,
        Category::Farewell => FAREWELL_REPLIES,
        Category::Question => QUESTION_REPLIES,
        Category::Positive => POSITIVE_REPLIES,
        Category::Negative => NEGATIVE_REPLIES,
        Category::Default => DEFAULT_REPLIES,
    }
}

impl ReplyCatalog {
    /// Build a catalog from explicit pools.
    ///
    /// Every category must be present with at least one non-blank reply.
    pub fn new(pools: HashMap<Category, Vec<String>>) -> Result<Self, ChatError> {
        let catalog = Self { pools };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Overlay the given pools on top of the built-in ones.
    pub fn with_overrides(
        overrides: impl IntoIterator<Item = (Category, Vec<String>)>,
    ) -> Result<Self, ChatError> {
        let mut pools = Self::default().pools;
        pools.extend(overrides);
        Self::new(pools)
    }

    fn validate(&self) -> Result<(), ChatError> {
        for category in Category::ALL {
            let pool = self.pools.get(&category).ok_or_else(|| {
                ChatError::Validation(format!("No replies for category '{}'", category))
            })?;
            if pool.is_empty() {
                return Err(ChatError::Validation(format!(
                    "Reply pool for '{}' is empty",
                    category
                )));
            }
            if pool.iter().any(|reply| reply.trim().is_empty()) {
                return Err(ChatError::Validation(format!(
                    "Reply pool for '{}' contains a blank reply",
                    category
                )));
            }
        }
        Ok(())
    }

    /// The candidate replies of a category, in declaration order
    pub fn pool(&self, category: Category) -> &[String] {
        self.pools.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, category: Category) -> bool {
        !self.pool(category).is_empty()
    }

    /// Uniformly pick one reply of `category`.
    ///
    /// Falls back to the default pool if the category is somehow missing;
    /// validation makes that unreachable for catalogs built through `new`.
    pub fn sample<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> &str {
        self.pool(category)
            .choose(rng)
            .or_else(|| self.pool(Category::Default).choose(rng))
            .map(String::as_str)
            .unwrap_or(DEFAULT_REPLIES[0])
    }
}

/// On-disk profile: reply pools and, optionally, a replacement rule list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub replies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub rules: Option<Vec<RuleSpec>>,
}

/// Catalog and matcher resolved from a profile
#[derive(Debug, Clone)]
pub struct Profile {
    pub catalog: ReplyCatalog,
    pub matcher: PatternMatcher,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            catalog: ReplyCatalog::default(),
            matcher: PatternMatcher::new(),
        }
    }
}

impl Profile {
    /// Resolve a parsed profile against the built-in defaults
    pub fn from_file_contents(file: ProfileFile) -> Result<Self, ChatError> {
        let overrides = file
            .replies
            .into_iter()
            .map(|(label, replies)| Ok((label.parse::<Category>()?, replies)))
            .collect::<Result<Vec<_>, ChatError>>()?;
        let catalog = ReplyCatalog::with_overrides(overrides)?;

        let matcher = match file.rules {
            Some(specs) => PatternMatcher::from_specs(&specs)?,
            None => PatternMatcher::new(),
        };

        Ok(Self { catalog, matcher })
    }

    /// Parse a profile from JSON text
    pub fn from_json(json: &str) -> Result<Self, ChatError> {
        let file: ProfileFile = serde_json::from_str(json)?;
        Self::from_file_contents(file)
    }

    /// Load a profile from a JSON file
    pub fn load(path: &Path) -> Result<Self, ChatError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("Cannot read profile {}: {}", path.display(), e))
        })?;
        let profile = Self::from_json(&contents)?;
        info!(
            "Loaded profile {} ({} rules)",
            path.display(),
            profile.matcher.rules().len()
        );
        Ok(profile)
    }
}
