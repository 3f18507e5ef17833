use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Mutex;

/// Score returned when either text has no usable tokens
pub const EMPTY_TEXT_SCORE: u8 = 85;

const BASE_SCORE: f64 = 80.0;
const MAX_OVERLAP_BONUS: f64 = 15.0;
const OVERLAP_WEIGHT: f64 = 0.15;
const MAX_JITTER: f64 = 2.0;
const MIN_ESTIMATE: f64 = 80.0;
const MAX_ESTIMATE: f64 = 98.0;
const MIN_TOKEN_LEN: usize = 4;

/// Split text into lowercase alphanumeric words longer than three characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.chars().count() >= MIN_TOKEN_LEN)
        .map(|word| word.to_lowercase())
        .collect()
}

/// Fraction of requirement tokens found in the specification's token set
///
/// Duplicate requirement tokens are counted individually. Returns `None`
/// when either side has no tokens.
pub fn overlap_ratio(requirement_text: &str, specification_text: &str) -> Option<f64> {
    let requirement = tokenize(requirement_text);
    let specification: HashSet<String> = tokenize(specification_text).into_iter().collect();

    if requirement.is_empty() || specification.is_empty() {
        return None;
    }

    let hits = requirement
        .iter()
        .filter(|token| specification.contains(token.as_str()))
        .count();

    Some(hits as f64 / requirement.len() as f64)
}

/// Base score (80-95) before jitter for a given overlap ratio
#[inline]
pub fn base_score(ratio: f64) -> f64 {
    let percent = (ratio * 100.0).floor();
    BASE_SCORE + (percent * OVERLAP_WEIGHT).min(MAX_OVERLAP_BONUS)
}

/// Deterministic estimate for an explicit jitter value
///
/// `jitter` is clamped to [-2, 2]; the result always lands in [80, 98]
/// unless either text is empty, in which case it is 85.
pub fn estimate_with_jitter(requirement_text: &str, specification_text: &str, jitter: f64) -> u8 {
    let Some(ratio) = overlap_ratio(requirement_text, specification_text) else {
        return EMPTY_TEXT_SCORE;
    };

    let jitter = jitter.clamp(-MAX_JITTER, MAX_JITTER);
    let score = (base_score(ratio) + jitter).clamp(MIN_ESTIMATE, MAX_ESTIMATE);
    score.round() as u8
}

/// Lexical-overlap score estimator used when no provider is involved
///
/// Adds a small random jitter so repeated estimates look less mechanical.
/// The random source is injectable: `with_seed` pins the sequence for tests.
#[derive(Debug)]
pub struct ScoreEstimator {
    rng: Mutex<StdRng>,
}

impl ScoreEstimator {
    /// Estimator backed by OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Estimator with a reproducible jitter sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Estimate a match score in [80, 98], or 85 when either text is empty
    pub fn estimate(&self, requirement_text: &str, specification_text: &str) -> u8 {
        let jitter = self.next_jitter();
        estimate_with_jitter(requirement_text, specification_text, jitter)
    }

    fn next_jitter(&self) -> f64 {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(-MAX_JITTER..=MAX_JITTER)
    }
}

impl Default for ScoreEstimator {
    fn default() -> Self {
        Self::new()
    }
}
