//! Windowed search configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Parameters for a windowed search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of leading positions of the result ordering that are
    /// guaranteed to be sorted
    pub num_results: usize,
    /// Length of the character grams compared between query and tokens
    pub gram_length: usize,
    /// Minimum token score (0.0-1.0) for a token's spans to be highlighted
    pub threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_results: 10,
            gram_length: 2,
            threshold: 0.5,
        }
    }
}

impl SearchConfig {
    pub fn new(num_results: usize, gram_length: usize, threshold: f32) -> Self {
        Self {
            num_results,
            gram_length,
            threshold,
        }
    }

    /// Parse a JSON object; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }

    pub fn with_gram_length(mut self, gram_length: usize) -> Self {
        self.gram_length = gram_length;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Reject a zero gram length or a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.gram_length == 0 {
            return Err(SearchError::InvalidArgument(
                "gram length must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SearchError::InvalidArgument(format!(
                "threshold {} outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}
