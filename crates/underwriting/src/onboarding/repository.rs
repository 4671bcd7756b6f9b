use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{MerchantId, MerchantProfile, MerchantStatus};
use super::scoring::{Decision, Explanation, ScoreResult, Tier};

/// Credit line offered alongside a decision. Callers attach it as soon as a result exists.
pub const fn limit_suggestion(tier: Tier) -> &'static str {
    match tier {
        Tier::Hot => "$5,000",
        Tier::Warm => "$3,000",
        Tier::Cold => "$0",
    }
}

/// Persisted snapshot of one scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u8,
    pub tier: Tier,
    pub decision: Decision,
    pub limit_suggestion: String,
    pub risk_tags: BTreeSet<String>,
    pub explanation: Explanation,
    pub heat_score: i32,
    pub created_at: DateTime<Utc>,
}

impl ScoreEntry {
    pub fn from_result(result: ScoreResult, created_at: DateTime<Utc>) -> Self {
        Self {
            score: result.score,
            tier: result.tier,
            decision: result.decision,
            limit_suggestion: limit_suggestion(result.tier).to_string(),
            risk_tags: result.risk_tags,
            explanation: result.explanation,
            heat_score: result.heat_score,
            created_at,
        }
    }
}

/// Repository record containing the merchant profile and its scoring history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantRecord {
    pub profile: MerchantProfile,
    pub scores: Vec<ScoreEntry>,
}

impl MerchantRecord {
    pub fn latest_score(&self) -> Option<&ScoreEntry> {
        self.scores.iter().max_by_key(|entry| entry.created_at)
    }

    pub fn status(&self) -> Option<MerchantStatus> {
        self.latest_score()
            .map(|entry| MerchantStatus::from_decision(entry.decision))
    }

    pub fn summary_view(&self) -> MerchantSummaryView {
        MerchantSummaryView {
            merchant_id: self.profile.merchant_id.clone(),
            name: self.profile.name.clone(),
            industry: self.profile.industry.clone(),
            mid: self.profile.mid.clone(),
            bin: self.profile.bin.clone(),
            mcc: self.profile.mcc.clone(),
            status: self.status().map_or("pending", MerchantStatus::label),
            decision_rationale: self
                .latest_score()
                .map_or_else(|| "pending evaluation".to_string(), |entry| {
                    entry.decision.summary()
                }),
            latest_score: self.latest_score().cloned(),
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait MerchantRepository: Send + Sync {
    fn insert(&self, record: MerchantRecord) -> Result<MerchantRecord, RepositoryError>;
    fn update(&self, record: MerchantRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &MerchantId) -> Result<Option<MerchantRecord>, RepositoryError>;
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<MerchantRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for decision notices (e-mail, CRM, or ops queue adapters).
pub trait DecisionNotifier: Send + Sync {
    fn notify(&self, notice: DecisionNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNotice {
    pub template: String,
    pub merchant_id: MerchantId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a merchant for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct MerchantSummaryView {
    pub merchant_id: MerchantId,
    pub name: String,
    pub industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcc: Option<String>,
    pub status: &'static str,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_score: Option<ScoreEntry>,
}
