//! Deterministic merchant risk scoring.
//!
//! Four independent gates and an industry classifier feed a single combiner. Nothing in this
//! module performs I/O, reads the clock, or logs; identical signals always produce identical
//! results, so an engine can be shared freely across threads.

mod combiner;
mod config;
pub mod gates;
mod industry;

pub use combiner::{Decision, Tier, HOT_THRESHOLD, WARM_THRESHOLD};
pub use config::{normalize_industry, ScoringConfig, DEFAULT_HIGH_RISK_INDUSTRIES};
pub use gates::{DetailValue, GateOutput};
pub use industry::{IndustryAssessment, IndustryRiskClassifier};

use std::collections::BTreeSet;

use super::domain::RiskSignals;
use combiner::combine_gates;
use serde::{Deserialize, Serialize};

/// Stateless evaluator that turns risk signals into an underwriting result.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    classifier: IndustryRiskClassifier,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            classifier: IndustryRiskClassifier::new(&config),
        }
    }

    pub fn score(&self, signals: &RiskSignals) -> ScoreResult {
        self.assess(signals).result
    }

    /// Score and keep every intermediate output for audit trails.
    pub fn assess(&self, signals: &RiskSignals) -> ScoreAssessment {
        let gates = GateSet {
            age_income: gates::age_income(&signals.income),
            identity_fraud: gates::identity_fraud(&signals.fraud),
            creditworthiness: gates::creditworthiness(&signals.credit),
            bank_behavior: gates::bank_behavior(&signals.bank),
        };
        let industry = self
            .classifier
            .classify(&signals.industry, &signals.keywords);
        let result = combine_gates(&gates, &industry);

        ScoreAssessment {
            gates,
            industry,
            result,
        }
    }
}

/// Outputs of the four gates for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSet {
    pub age_income: GateOutput,
    pub identity_fraud: GateOutput,
    pub creditworthiness: GateOutput,
    pub bank_behavior: GateOutput,
}

impl GateSet {
    pub fn iter(&self) -> impl Iterator<Item = &GateOutput> {
        [
            &self.age_income,
            &self.identity_fraud,
            &self.creditworthiness,
            &self.bank_behavior,
        ]
        .into_iter()
    }
}

/// Four-way decomposition of the score for human and regulatory review.
///
/// The age/income gate contributes to the score but has no field here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub credit_weight: i32,
    pub fraud_penalty: i32,
    pub bank_score: i32,
    /// Industry safety score; larger values are safer despite the name.
    pub industry_risk_penalty: i32,
}

/// Final underwriting output. `tier` and `decision` depend on `score` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub tier: Tier,
    pub decision: Decision,
    pub risk_tags: BTreeSet<String>,
    pub explanation: Explanation,
    pub heat_score: i32,
}

/// Score result together with the gate and industry outputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAssessment {
    pub gates: GateSet,
    pub industry: IndustryAssessment,
    pub result: ScoreResult,
}
