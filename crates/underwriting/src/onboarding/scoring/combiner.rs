use serde::{Deserialize, Serialize};

use super::gates::tags;
use super::industry::IndustryAssessment;
use super::{Explanation, GateSet, ScoreResult};

/// Lowest score that still qualifies for automatic approval.
pub const HOT_THRESHOLD: u8 = 71;
/// Lowest score routed to an underwriter instead of rejection.
pub const WARM_THRESHOLD: u8 = 51;

/// Extra deduction applied on top of the identity gate when fraud is high.
const FRAUD_ESCALATION: i32 = 10;

/// Coarse risk bucket derived only from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Hot,
    Warm,
    Cold,
}

impl Tier {
    pub const fn from_score(score: u8) -> Self {
        if score >= HOT_THRESHOLD {
            Tier::Hot
        } else if score >= WARM_THRESHOLD {
            Tier::Warm
        } else {
            Tier::Cold
        }
    }

    pub const fn decision(self) -> Decision {
        match self {
            Tier::Hot => Decision::Approve,
            Tier::Warm => Decision::ManualReview,
            Tier::Cold => Decision::Reject,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Tier::Hot => "Hot",
            Tier::Warm => "Warm",
            Tier::Cold => "Cold",
        }
    }
}

/// Underwriting action, one-to-one with [`Tier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    ManualReview,
    Reject,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approve => "Approve",
            Decision::ManualReview => "ManualReview",
            Decision::Reject => "Reject",
        }
    }

    pub fn summary(self) -> String {
        match self {
            Decision::Approve => "merchant approved".to_string(),
            Decision::ManualReview => "requires manual underwriting review".to_string(),
            Decision::Reject => "merchant rejected".to_string(),
        }
    }
}

pub(crate) fn combine_gates(gates: &GateSet, industry: &IndustryAssessment) -> ScoreResult {
    let credit_weight = gates.creditworthiness.points;
    let fraud_penalty = if gates.identity_fraud.has_tag(tags::HIGH_FRAUD_SIGNAL) {
        gates.identity_fraud.points - FRAUD_ESCALATION
    } else {
        gates.identity_fraud.points
    };
    let bank_score = gates.bank_behavior.points;
    // Safety score, not a penalty: higher values raise the composite.
    let industry_risk_penalty = industry.points;

    let raw = credit_weight
        + fraud_penalty
        + bank_score
        + industry_risk_penalty
        + gates.age_income.points;

    let score = if gates.creditworthiness.knockout {
        0
    } else {
        raw.clamp(0, 100) as u8
    };
    let tier = Tier::from_score(score);

    let risk_tags = gates
        .iter()
        .flat_map(|gate| gate.tags.iter())
        .chain(industry.tags.iter())
        .cloned()
        .collect();

    ScoreResult {
        score,
        tier,
        decision: tier.decision(),
        risk_tags,
        explanation: Explanation {
            credit_weight,
            fraud_penalty,
            bank_score,
            industry_risk_penalty,
        },
        heat_score: industry.heat_penalty,
    }
}
