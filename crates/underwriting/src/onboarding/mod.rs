//! Merchant onboarding intake, risk scoring, and underwriting decisions.
//!
//! The scoring engine is pure and deterministic. Everything around it (validation,
//! persistence, notifications, HTTP) treats storage and messaging as injected collaborators.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    BankBehavior, CreditSignals, FraudSignals, IncomeSignals, MerchantId, MerchantProfile,
    MerchantStatus, OnboardingSubmission, RiskSignals,
};
pub use repository::{
    limit_suggestion, DecisionNotice, DecisionNotifier, MerchantRecord, MerchantRepository,
    MerchantSummaryView, NotificationError, RepositoryError, ScoreEntry,
};
pub use router::onboarding_router;
pub use scoring::{
    Decision, Explanation, GateOutput, ScoreAssessment, ScoreResult, ScoringConfig, ScoringEngine,
    Tier,
};
pub use service::{MerchantOnboardingService, OnboardingServiceError, ScoreQuote};
pub use validation::{MerchantIntake, OnboardingValidator, ValidationError};
