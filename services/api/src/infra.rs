use merchant_underwriting::onboarding::{
    DecisionNotice, DecisionNotifier, MerchantId, MerchantRecord, MerchantRepository,
    NotificationError, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store; merchants are ordered by id so paging is stable.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMerchantRepository {
    records: Arc<Mutex<BTreeMap<MerchantId, MerchantRecord>>>,
}

impl MerchantRepository for InMemoryMerchantRepository {
    fn insert(&self, record: MerchantRecord) -> Result<MerchantRecord, RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.profile.merchant_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile.merchant_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: MerchantRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().map_err(poisoned)?;
        if guard.contains_key(&record.profile.merchant_id) {
            guard.insert(record.profile.merchant_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &MerchantId) -> Result<Option<MerchantRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<MerchantRecord>, RepositoryError> {
        let guard = self.records.lock().map_err(poisoned)?;
        Ok(guard.values().skip(offset).take(limit).cloned().collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("repository mutex poisoned".to_string())
}

/// Records notices and logs them; stands in for the e-mail adapter.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDecisionNotifier {
    events: Arc<Mutex<Vec<DecisionNotice>>>,
}

impl DecisionNotifier for InMemoryDecisionNotifier {
    fn notify(&self, notice: DecisionNotice) -> Result<(), NotificationError> {
        info!(
            template = %notice.template,
            merchant_id = %notice.merchant_id.0,
            "decision notice queued"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("notifier mutex poisoned".to_string()))?;
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryDecisionNotifier {
    pub(crate) fn events(&self) -> Vec<DecisionNotice> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
