use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::config::{normalize_industry, ScoringConfig};
use super::gates::tags;

/// Posture awarded to industries outside the high-risk vocabulary.
const SAFE_POSTURE: i32 = 10;
const FLAGGED_POSTURE: i32 = 1;

/// Industry classification. `points` is a safety score: higher means safer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryAssessment {
    pub normalized_industry: String,
    pub points: i32,
    pub tags: BTreeSet<String>,
    pub heat_penalty: i32,
}

/// Matches an industry label and free-text keywords against the high-risk vocabulary.
#[derive(Debug, Clone)]
pub struct IndustryRiskClassifier {
    high_risk: BTreeSet<String>,
}

impl IndustryRiskClassifier {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            high_risk: config.high_risk_industries.clone(),
        }
    }

    pub fn classify(&self, industry: &str, keywords: &[String]) -> IndustryAssessment {
        let normalized_industry = normalize_industry(industry);
        let keywords: BTreeSet<String> = keywords.iter().map(|kw| kw.to_lowercase()).collect();

        let industry_flagged = self.high_risk.contains(&normalized_industry);
        let keyword_flagged = !self.high_risk.is_disjoint(&keywords);

        let mut flags = BTreeSet::new();
        let points = if industry_flagged || keyword_flagged {
            if industry_flagged {
                flags.insert(normalized_industry.clone());
            } else {
                flags.insert(tags::HIGH_RISK_KEYWORD.to_string());
            }
            FLAGGED_POSTURE
        } else {
            SAFE_POSTURE
        };

        IndustryAssessment {
            normalized_industry,
            points,
            tags: flags,
            heat_penalty: (SAFE_POSTURE - points) * 10,
        }
    }
}

impl Default for IndustryRiskClassifier {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
