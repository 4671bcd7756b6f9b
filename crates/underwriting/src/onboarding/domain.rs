use serde::{Deserialize, Serialize};

use super::scoring::Decision;

/// Identifier wrapper for onboarded merchants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MerchantId(pub String);

/// Onboarding payload as received from the intake form, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingSubmission {
    pub name: String,
    #[serde(default)]
    pub legal_entity: Option<String>,
    pub industry: String,
    #[serde(default)]
    pub mid: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub mcc: Option<String>,
    #[serde(default)]
    pub ein: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub self_employed: bool,
    #[serde(default)]
    pub annual_income: f64,
    #[serde(default)]
    pub verified_income: Option<f64>,
    #[serde(default)]
    pub device_risk_score: f64,
    #[serde(default)]
    pub fraud_score: f64,
    #[serde(default)]
    pub fico_score: Option<u16>,
    #[serde(default)]
    pub tradelines: Option<u32>,
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub chargeoffs: Option<u32>,
    #[serde(default)]
    pub dti: Option<f64>,
    #[serde(default)]
    pub bank_behavior: Option<BankBehavior>,
}

/// Open-banking aggregates for the trailing six months. Absent data scores as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BankBehavior {
    #[serde(default)]
    pub overdrafts_6mo: u32,
    #[serde(default)]
    pub avg_balance: f64,
    #[serde(default)]
    pub nsf_fees: u32,
}

/// Declared and verified income. `self_employed` is captured but not weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeSignals {
    pub self_employed: bool,
    pub annual_income: f64,
    pub verified_income: Option<f64>,
}

/// Identity vendor scores where lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudSignals {
    pub device_risk_score: f64,
    pub fraud_score: f64,
}

/// Bureau data. Enrichment fields are optional and usually absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditSignals {
    pub fico_score: Option<u16>,
    pub tradelines: Option<u32>,
    pub utilization: Option<f64>,
    pub chargeoffs: Option<u32>,
    pub dti: Option<f64>,
}

/// Validated, normalized input consumed by the scoring engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskSignals {
    pub income: IncomeSignals,
    pub fraud: FraudSignals,
    pub credit: CreditSignals,
    pub bank: BankBehavior,
    pub industry: String,
    pub keywords: Vec<String>,
}

impl RiskSignals {
    pub fn from_submission(submission: &OnboardingSubmission) -> Self {
        Self {
            income: IncomeSignals {
                self_employed: submission.self_employed,
                annual_income: submission.annual_income,
                verified_income: submission.verified_income,
            },
            fraud: FraudSignals {
                device_risk_score: submission.device_risk_score,
                fraud_score: submission.fraud_score,
            },
            credit: CreditSignals {
                fico_score: submission.fico_score,
                tradelines: submission.tradelines,
                utilization: submission.utilization,
                chargeoffs: submission.chargeoffs,
                dti: submission.dti,
            },
            bank: submission.bank_behavior.unwrap_or_default(),
            industry: submission.industry.clone(),
            keywords: submission.keywords.clone(),
        }
    }
}

/// Merchant identity retained alongside the score history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantProfile {
    pub merchant_id: MerchantId,
    pub name: String,
    pub legal_entity: Option<String>,
    pub industry: String,
    pub mid: Option<String>,
    pub bin: Option<String>,
    pub mcc: Option<String>,
    pub ein: Option<String>,
    pub website: Option<String>,
    pub keywords: Vec<String>,
}

impl MerchantProfile {
    /// Apply a resubmission: present optional fields replace stored ones.
    pub fn merge(&mut self, update: MerchantProfile) {
        self.name = update.name;
        self.industry = update.industry;
        self.legal_entity = update.legal_entity.or(self.legal_entity.take());
        self.mid = update.mid.or(self.mid.take());
        self.bin = update.bin.or(self.bin.take());
        self.mcc = update.mcc.or(self.mcc.take());
        self.ein = update.ein.or(self.ein.take());
        self.website = update.website.or(self.website.take());
        if !update.keywords.is_empty() {
            self.keywords = update.keywords;
        }
    }
}

/// Underwriting status derived from the most recent decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MerchantStatus {
    Approved,
    UnderReview,
    Rejected,
}

impl MerchantStatus {
    pub const fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Approve => MerchantStatus::Approved,
            Decision::ManualReview => MerchantStatus::UnderReview,
            Decision::Reject => MerchantStatus::Rejected,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MerchantStatus::Approved => "approved",
            MerchantStatus::UnderReview => "under_review",
            MerchantStatus::Rejected => "rejected",
        }
    }
}
