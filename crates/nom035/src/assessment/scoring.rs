use serde::{Deserialize, Serialize};

use super::domain::{Answer, RiskLevel};

/// Absolute score boundaries separating the three risk bands.
///
/// Scores are compared as raw sums; questionnaires of different lengths share
/// the same scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    medium_from: u32,
    high_from: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium_from: 10,
            high_from: 20,
        }
    }
}

impl RiskThresholds {
    /// Returns `None` when the medium band would start above the high band.
    pub fn new(medium_from: u32, high_from: u32) -> Option<Self> {
        (medium_from <= high_from).then_some(Self {
            medium_from,
            high_from,
        })
    }

    pub fn medium_from(&self) -> u32 {
        self.medium_from
    }

    pub fn high_from(&self) -> u32 {
        self.high_from
    }

    pub fn classify(&self, total_score: u32) -> RiskLevel {
        if total_score >= self.high_from {
            RiskLevel::High
        } else if total_score >= self.medium_from {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Aggregate score and its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    pub total_score: u32,
    pub risk_level: RiskLevel,
}

/// Stateless scorer applying a threshold policy to answer sets.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    thresholds: RiskThresholds,
}

impl RiskScorer {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }

    pub fn score(&self, answers: &[Answer]) -> RiskScore {
        let total_score = answers
            .iter()
            .map(|answer| u32::from(answer.value))
            .sum();

        RiskScore {
            total_score,
            risk_level: self.thresholds.classify(total_score),
        }
    }
}
