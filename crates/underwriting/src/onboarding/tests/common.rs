use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::onboarding::domain::{BankBehavior, MerchantId, OnboardingSubmission, RiskSignals};
use crate::onboarding::repository::{
    DecisionNotice, DecisionNotifier, MerchantRecord, MerchantRepository, NotificationError,
    RepositoryError,
};
use crate::onboarding::scoring::{ScoringConfig, ScoringEngine};
use crate::onboarding::{onboarding_router, MerchantOnboardingService};

/// Scenario A: a well-capitalized retail merchant with clean signals.
pub(super) fn submission() -> OnboardingSubmission {
    OnboardingSubmission {
        name: "Northwind Outfitters".to_string(),
        legal_entity: Some("Northwind Outfitters LLC".to_string()),
        industry: "retail".to_string(),
        mid: Some("MID-0042".to_string()),
        bin: None,
        mcc: Some("5651".to_string()),
        ein: Some("12-3456789".to_string()),
        website: Some("https://northwind.example".to_string()),
        keywords: Vec::new(),
        self_employed: false,
        annual_income: 100_000.0,
        verified_income: Some(95_000.0),
        device_risk_score: 0.1,
        fraud_score: 0.05,
        fico_score: Some(750),
        tradelines: None,
        utilization: None,
        chargeoffs: None,
        dti: None,
        bank_behavior: Some(BankBehavior {
            overdrafts_6mo: 0,
            avg_balance: 6_000.0,
            nsf_fees: 0,
        }),
    }
}

pub(super) fn signals() -> RiskSignals {
    RiskSignals::from_submission(&submission())
}

/// Mid-range merchant that lands in the Warm tier (score 64).
pub(super) fn manual_review_submission() -> OnboardingSubmission {
    let mut submission = submission();
    submission.fico_score = Some(690);
    submission.verified_income = None;
    submission.annual_income = 45_000.0;
    submission.bank_behavior = Some(BankBehavior {
        overdrafts_6mo: 1,
        avg_balance: 2_500.0,
        nsf_fees: 0,
    });
    submission
}

pub(super) fn knockout_submission() -> OnboardingSubmission {
    let mut submission = submission();
    submission.fico_score = Some(550);
    submission
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

pub(super) fn build_service() -> (
    MerchantOnboardingService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = MerchantOnboardingService::new(
        repository.clone(),
        notifier.clone(),
        ScoringConfig::default(),
    );
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<MerchantId, MerchantRecord>>>,
}

impl MerchantRepository for MemoryRepository {
    fn insert(&self, record: MerchantRecord) -> Result<MerchantRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile.merchant_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile.merchant_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: MerchantRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.profile.merchant_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &MerchantId) -> Result<Option<MerchantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<MerchantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().skip(offset).take(limit).cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<DecisionNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<DecisionNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl DecisionNotifier for MemoryNotifier {
    fn notify(&self, notice: DecisionNotice) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl MerchantRepository for ConflictRepository {
    fn insert(&self, _record: MerchantRecord) -> Result<MerchantRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: MerchantRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &MerchantId) -> Result<Option<MerchantRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _limit: usize, _offset: usize) -> Result<Vec<MerchantRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl MerchantRepository for UnavailableRepository {
    fn insert(&self, _record: MerchantRecord) -> Result<MerchantRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: MerchantRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &MerchantId) -> Result<Option<MerchantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize, _offset: usize) -> Result<Vec<MerchantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineNotifier;

impl DecisionNotifier for OfflineNotifier {
    fn notify(&self, _notice: DecisionNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: MerchantOnboardingService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    onboarding_router(Arc::new(service))
}
