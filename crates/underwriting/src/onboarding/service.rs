use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{MerchantId, OnboardingSubmission, RiskSignals};
use super::repository::{
    limit_suggestion, DecisionNotice, DecisionNotifier, MerchantRecord, MerchantRepository,
    RepositoryError, ScoreEntry,
};
use super::scoring::{Decision, ScoreResult, ScoringConfig, ScoringEngine};
use super::validation::{OnboardingValidator, ValidationError};

/// Service composing validation, the scoring engine, persistence, and notifications.
pub struct MerchantOnboardingService<R, N> {
    validator: OnboardingValidator,
    repository: Arc<R>,
    notifier: Arc<N>,
    engine: Arc<ScoringEngine>,
}

/// Stateless scoring response with the caller-side credit limit attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreQuote {
    #[serde(flatten)]
    pub result: ScoreResult,
    pub limit_suggestion: &'static str,
}

static MERCHANT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_merchant_id() -> MerchantId {
    let id = MERCHANT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MerchantId(format!("mer-{id:06}"))
}

impl<R, N> MerchantOnboardingService<R, N>
where
    R: MerchantRepository + 'static,
    N: DecisionNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: ScoringConfig) -> Self {
        Self {
            validator: OnboardingValidator,
            repository,
            notifier,
            engine: Arc::new(ScoringEngine::new(config)),
        }
    }

    /// Score a submission without persisting anything.
    pub fn quote(
        &self,
        submission: &OnboardingSubmission,
    ) -> Result<ScoreQuote, OnboardingServiceError> {
        self.validator.validate(submission)?;
        let result = self.engine.score(&RiskSignals::from_submission(submission));
        Ok(ScoreQuote {
            limit_suggestion: limit_suggestion(result.tier),
            result,
        })
    }

    /// Validate, score, and store a new merchant.
    pub fn onboard(
        &self,
        submission: OnboardingSubmission,
    ) -> Result<MerchantRecord, OnboardingServiceError> {
        let intake = self.validator.intake(next_merchant_id(), submission)?;
        let result = self.engine.score(&intake.signals);
        let decision = result.decision;

        let record = MerchantRecord {
            profile: intake.profile,
            scores: vec![ScoreEntry::from_result(result, Utc::now())],
        };
        let stored = self.repository.insert(record)?;

        info!(
            merchant_id = %stored.profile.merchant_id.0,
            decision = decision.label(),
            "merchant onboarded"
        );
        self.notify(&stored, decision);
        Ok(stored)
    }

    /// Re-score an existing merchant with fresh data, appending to its history.
    pub fn rescore(
        &self,
        merchant_id: &MerchantId,
        submission: OnboardingSubmission,
    ) -> Result<MerchantRecord, OnboardingServiceError> {
        let mut record = self
            .repository
            .fetch(merchant_id)?
            .ok_or(RepositoryError::NotFound)?;

        let intake = self.validator.intake(merchant_id.clone(), submission)?;
        let result = self.engine.score(&intake.signals);
        let decision = result.decision;

        record.profile.merge(intake.profile);
        record.scores.push(ScoreEntry::from_result(result, Utc::now()));
        self.repository.update(record.clone())?;

        info!(
            merchant_id = %merchant_id.0,
            decision = decision.label(),
            history = record.scores.len(),
            "merchant rescored"
        );
        self.notify(&record, decision);
        Ok(record)
    }

    /// Fetch a merchant and its score history.
    pub fn get(&self, merchant_id: &MerchantId) -> Result<MerchantRecord, OnboardingServiceError> {
        let record = self
            .repository
            .fetch(merchant_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MerchantRecord>, OnboardingServiceError> {
        Ok(self.repository.list(limit, offset)?)
    }

    /// Runs after the record is stored, so a failed notice is logged rather than returned.
    fn notify(&self, record: &MerchantRecord, decision: Decision) {
        let template = match decision {
            Decision::Approve => "merchant_approved",
            Decision::ManualReview => "merchant_manual_review",
            Decision::Reject => {
                debug!(merchant_id = %record.profile.merchant_id.0, "no notice for rejection");
                return;
            }
        };

        let mut details = BTreeMap::new();
        details.insert("decision".to_string(), decision.label().to_string());
        if let Some(entry) = record.latest_score() {
            details.insert("score".to_string(), entry.score.to_string());
            details.insert("limit_suggestion".to_string(), entry.limit_suggestion.clone());
        }

        let notice = DecisionNotice {
            template: template.to_string(),
            merchant_id: record.profile.merchant_id.clone(),
            details,
        };
        if let Err(err) = self.notifier.notify(notice) {
            warn!(
                merchant_id = %record.profile.merchant_id.0,
                template,
                error = %err,
                "decision notice not delivered"
            );
        }
    }
}

/// Error raised by the onboarding service.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
