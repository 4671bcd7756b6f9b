use super::domain::{MerchantId, MerchantProfile, OnboardingSubmission, RiskSignals};

/// FICO range accepted by the bureaus.
pub const FICO_RANGE: std::ops::RangeInclusive<u16> = 300..=850;

/// Validation errors raised before a submission reaches the scoring engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("merchant name is required")]
    MissingName,
    #[error("industry is required")]
    MissingIndustry,
    #[error("fico_score {0} is outside the 300-850 range")]
    FicoOutOfRange(u16),
    #[error("{field} must be a non-negative amount (found {value})")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number (found {value})")]
    NonFiniteScore { field: &'static str, value: f64 },
    #[error("{field} must be a non-negative fraction (found {value})")]
    InvalidRatio { field: &'static str, value: f64 },
}

/// Validated submission split into stored identity and engine input.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantIntake {
    pub profile: MerchantProfile,
    pub signals: RiskSignals,
}

/// Gatekeeper that turns raw submissions into well-typed engine input.
///
/// Risk scores outside `[0, 1]` are accepted here; the identity gate clamps them.
#[derive(Debug, Clone, Default)]
pub struct OnboardingValidator;

impl OnboardingValidator {
    pub fn intake(
        &self,
        merchant_id: MerchantId,
        submission: OnboardingSubmission,
    ) -> Result<MerchantIntake, ValidationError> {
        self.validate(&submission)?;

        let signals = RiskSignals::from_submission(&submission);
        let profile = MerchantProfile {
            merchant_id,
            name: submission.name.trim().to_string(),
            legal_entity: non_blank(submission.legal_entity),
            industry: submission.industry.trim().to_string(),
            mid: non_blank(submission.mid),
            bin: non_blank(submission.bin),
            mcc: non_blank(submission.mcc),
            ein: non_blank(submission.ein),
            website: non_blank(submission.website),
            keywords: submission.keywords,
        };

        Ok(MerchantIntake { profile, signals })
    }

    pub fn validate(&self, submission: &OnboardingSubmission) -> Result<(), ValidationError> {
        if submission.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if submission.industry.trim().is_empty() {
            return Err(ValidationError::MissingIndustry);
        }

        if let Some(fico) = submission.fico_score {
            if !FICO_RANGE.contains(&fico) {
                return Err(ValidationError::FicoOutOfRange(fico));
            }
        }

        check_amount("annual_income", submission.annual_income)?;
        if let Some(verified) = submission.verified_income {
            check_amount("verified_income", verified)?;
        }
        if let Some(bank) = &submission.bank_behavior {
            check_amount("bank_behavior.avg_balance", bank.avg_balance)?;
        }

        check_finite("device_risk_score", submission.device_risk_score)?;
        check_finite("fraud_score", submission.fraud_score)?;

        if let Some(utilization) = submission.utilization {
            check_ratio("utilization", utilization)?;
        }
        if let Some(dti) = submission.dti {
            check_ratio("dti", dti)?;
        }

        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidAmount { field, value })
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteScore { field, value })
    }
}

fn check_ratio(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidRatio { field, value })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
