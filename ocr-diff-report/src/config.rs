//! Scoring configuration.
//!
//! Every constant of the severity formula lives here with its default value.
//! A TOML file only needs the keys it overrides:
//!
//! ```toml
//! uncertainty = 0.4
//!
//! [thresholds]
//! critical = 0.7
//!
//! [position]
//! finance_keywords = ["total", "amount", "tax"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a [`ScoringConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid config syntax: {message}")]
    Parse { message: String },

    #[error("invalid config value: {message}")]
    Invalid { message: String },
}

/// Weights of the four severity components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub impact: f64,
    pub magnitude: f64,
    pub position: f64,
    pub rule_bump: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            impact: 0.5,
            magnitude: 0.3,
            position: 0.1,
            rule_bump: 0.1,
        }
    }
}

/// Impact score per category tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactScores {
    pub critical: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ImpactScores {
    fn default() -> Self {
        Self {
            critical: 1.0,
            medium: 0.5,
            low: 0.1,
        }
    }
}

/// Lower bounds of the medium and critical buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketThresholds {
    pub medium: f64,
    pub critical: f64,
}

impl Default for BucketThresholds {
    fn default() -> Self {
        Self {
            medium: 0.2,
            critical: 0.6,
        }
    }
}

/// Boosts derived from where a line sits in the export.
///
/// Keywords are matched case-insensitively as substrings of the line's
/// structural path (e.g. `totals/grand_total`), not of its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    pub finance_keywords: Vec<String>,
    pub finance_boost: f64,
    pub legal_keywords: Vec<String>,
    pub legal_boost: f64,
    /// Applied to lines whose index is below `early_line_limit`.
    pub early_line_boost: f64,
    pub early_line_limit: i64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        Self {
            finance_keywords: words(&[
                "total", "amount", "balance", "fee", "price", "payment", "due", "subtotal",
                "grand",
            ]),
            finance_boost: 0.5,
            legal_keywords: words(&["signature", "authorized", "terms", "effective", "date"]),
            legal_boost: 0.4,
            early_line_boost: 0.1,
            early_line_limit: 10,
        }
    }
}

/// Rule bumps, checked in field order; the first that applies wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBumps {
    /// Exactly one side is a negation.
    pub negation: f64,
    /// Exactly one side is a unit.
    pub unit: f64,
    /// Exactly one side is a comparator.
    pub comparator: f64,
    /// Two numbers, exactly one with a decimal point.
    pub decimal_mismatch: f64,
    /// Two numbers, either looking rounded (`500`, `500.00`).
    pub trailing_zeros: f64,
}

impl Default for RuleBumps {
    fn default() -> Self {
        Self {
            negation: 1.0,
            unit: 0.7,
            comparator: 0.8,
            decimal_mismatch: 0.8,
            trailing_zeros: 0.6,
        }
    }
}

/// Configuration for [`SeverityScorer`](crate::SeverityScorer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ComponentWeights,
    pub impact: ImpactScores,
    /// How strongly low OCR confidence discounts a score:
    /// `U = 1 - uncertainty * (1 - min_confidence)`.
    pub uncertainty: f64,
    pub thresholds: BucketThresholds,
    pub position: PositionConfig,
    pub rule_bumps: RuleBumps,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ComponentWeights::default(),
            impact: ImpactScores::default(),
            uncertainty: 0.5,
            thresholds: BucketThresholds::default(),
            position: PositionConfig::default(),
            rule_bumps: RuleBumps::default(),
        }
    }
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = toml::from_str(source).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })
    }

    /// Reject values that would break the `[0, 1]` score range or make the
    /// buckets overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_values = [
            ("weights.impact", self.weights.impact),
            ("weights.magnitude", self.weights.magnitude),
            ("weights.position", self.weights.position),
            ("weights.rule_bump", self.weights.rule_bump),
            ("impact.critical", self.impact.critical),
            ("impact.medium", self.impact.medium),
            ("impact.low", self.impact.low),
            ("uncertainty", self.uncertainty),
            ("thresholds.medium", self.thresholds.medium),
            ("thresholds.critical", self.thresholds.critical),
            ("position.finance_boost", self.position.finance_boost),
            ("position.legal_boost", self.position.legal_boost),
            ("position.early_line_boost", self.position.early_line_boost),
            ("rule_bumps.negation", self.rule_bumps.negation),
            ("rule_bumps.unit", self.rule_bumps.unit),
            ("rule_bumps.comparator", self.rule_bumps.comparator),
            ("rule_bumps.decimal_mismatch", self.rule_bumps.decimal_mismatch),
            ("rule_bumps.trailing_zeros", self.rule_bumps.trailing_zeros),
        ];
        for (name, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    message: format!("{} must be within [0, 1], got {}", name, value),
                });
            }
        }
        if self.thresholds.medium > self.thresholds.critical {
            return Err(ConfigError::Invalid {
                message: format!(
                    "thresholds.medium ({}) exceeds thresholds.critical ({})",
                    self.thresholds.medium, self.thresholds.critical
                ),
            });
        }
        Ok(())
    }
}
