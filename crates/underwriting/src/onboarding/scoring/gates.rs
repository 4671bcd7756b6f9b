use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::super::domain::{BankBehavior, CreditSignals, FraudSignals, IncomeSignals};

/// Machine-readable labels attached when a gate moves points.
pub mod tags {
    pub const LOW_INCOME: &str = "low_income";
    pub const INCOME_MISMATCH: &str = "income_mismatch";
    pub const HIGH_FRAUD_SIGNAL: &str = "high_fraud_signal";
    pub const MODERATE_DEVICE_RISK: &str = "moderate_device_risk";
    pub const THIN_FILE: &str = "thin_file";
    pub const FICO_BELOW_MIN: &str = "fico_below_min";
    pub const HIGH_UTILIZATION: &str = "high_utilization";
    pub const CHARGEOFFS_PRESENT: &str = "chargeoffs_present";
    pub const HIGH_DTI: &str = "high_dti";
    pub const LOW_AVG_BALANCE: &str = "low_avg_balance";
    pub const FREQUENT_OVERDRAFTS: &str = "frequent_overdrafts";
    pub const NSF_EVENTS: &str = "nsf_events";
    pub const HIGH_RISK_KEYWORD: &str = "high_risk_keyword";
}

/// FICO scores below this floor knock the applicant out.
pub const MINIMUM_FICO: u16 = 580;

/// Sentinel subtracted from a knocked-out gate so the audit trail shows the override.
pub const KNOCKOUT_PENALTY: i32 = 999;

/// Diagnostic value recorded for audits; never scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Integer(i64),
    Decimal(f64),
    Missing,
}

impl From<Option<u32>> for DetailValue {
    fn from(value: Option<u32>) -> Self {
        value.map_or(DetailValue::Missing, |count| {
            DetailValue::Integer(i64::from(count))
        })
    }
}

impl From<Option<f64>> for DetailValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(DetailValue::Missing, DetailValue::Decimal)
    }
}

/// Result of a single gate evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutput {
    pub points: i32,
    pub tags: BTreeSet<String>,
    pub details: BTreeMap<String, DetailValue>,
    /// Set when the gate overrides every other signal with a hard reject.
    #[serde(default)]
    pub knockout: bool,
}

impl GateOutput {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Default)]
struct GateTally {
    points: i32,
    tags: BTreeSet<String>,
    details: BTreeMap<String, DetailValue>,
}

impl GateTally {
    fn adjust(&mut self, points: i32) {
        self.points += points;
    }

    fn flag(&mut self, points: i32, tag: &str) {
        self.points += points;
        self.tags.insert(tag.to_string());
    }

    fn detail(&mut self, key: &str, value: DetailValue) {
        self.details.insert(key.to_string(), value);
    }

    fn finish(self) -> GateOutput {
        GateOutput {
            points: self.points,
            tags: self.tags,
            details: self.details,
            knockout: false,
        }
    }

    fn knockout(mut self, tag: &str) -> GateOutput {
        self.flag(-KNOCKOUT_PENALTY, tag);
        GateOutput {
            knockout: true,
            ..self.finish()
        }
    }
}

/// Gate 1: income sufficiency, preferring verified income over the declared figure.
pub fn age_income(signals: &IncomeSignals) -> GateOutput {
    let mut gate = GateTally::default();
    let base = signals.verified_income.unwrap_or(signals.annual_income);

    if base >= 90_000.0 {
        gate.adjust(20);
    } else if base >= 60_000.0 {
        gate.adjust(12);
    } else if base >= 30_000.0 {
        gate.adjust(5);
    } else {
        gate.flag(-10, tags::LOW_INCOME);
    }

    if let Some(verified) = signals.verified_income {
        if verified < 0.8 * signals.annual_income {
            gate.flag(-5, tags::INCOME_MISMATCH);
        }
    }

    gate.detail("income_used", DetailValue::Decimal(base));
    gate.finish()
}

/// Gate 2: device hygiene and identity fraud. Scores are clamped into `[0, 1]`.
pub fn identity_fraud(signals: &FraudSignals) -> GateOutput {
    let mut gate = GateTally::default();
    gate.detail(
        "device_risk_score",
        DetailValue::Decimal(signals.device_risk_score),
    );
    gate.detail("fraud_score", DetailValue::Decimal(signals.fraud_score));

    let device_risk = clamp_unit(signals.device_risk_score);
    let fraud = clamp_unit(signals.fraud_score);

    gate.adjust(((1.0 - device_risk) * 10.0).floor() as i32);
    gate.adjust(((1.0 - fraud) * 15.0).floor() as i32);

    if fraud > 0.6 {
        gate.flag(-25, tags::HIGH_FRAUD_SIGNAL);
    } else if fraud > 0.3 {
        gate.flag(0, tags::MODERATE_DEVICE_RISK);
    }

    gate.finish()
}

/// Gate 3: bureau creditworthiness with a FICO knockout.
pub fn creditworthiness(signals: &CreditSignals) -> GateOutput {
    let mut gate = GateTally::default();
    gate.detail("fico", signals.fico_score.map(u32::from).into());
    gate.detail("tradelines", signals.tradelines.into());
    gate.detail("utilization", signals.utilization.into());
    gate.detail("chargeoffs", signals.chargeoffs.into());
    gate.detail("dti", signals.dti.into());

    match signals.fico_score {
        None => gate.flag(-10, tags::THIN_FILE),
        Some(fico) if fico < MINIMUM_FICO => return gate.knockout(tags::FICO_BELOW_MIN),
        Some(fico) if fico < 620 => gate.adjust(-15),
        Some(fico) if fico < 680 => gate.adjust(5),
        Some(_) => gate.adjust(18),
    }

    if signals.utilization.is_some_and(|ratio| ratio > 0.75) {
        gate.flag(-10, tags::HIGH_UTILIZATION);
    }
    if signals.chargeoffs.is_some_and(|count| count > 0) {
        gate.flag(-20, tags::CHARGEOFFS_PRESENT);
    }
    if signals.dti.is_some_and(|ratio| ratio > 0.45) {
        gate.flag(-8, tags::HIGH_DTI);
    }

    gate.finish()
}

/// Gate 4: average balance, overdraft frequency, and NSF events.
pub fn bank_behavior(behavior: &BankBehavior) -> GateOutput {
    let mut gate = GateTally::default();
    gate.detail(
        "overdrafts_6mo",
        DetailValue::Integer(i64::from(behavior.overdrafts_6mo)),
    );
    gate.detail("avg_balance", DetailValue::Decimal(behavior.avg_balance));
    gate.detail("nsf_fees", DetailValue::Integer(i64::from(behavior.nsf_fees)));

    if behavior.avg_balance >= 5_000.0 {
        gate.adjust(20);
    } else if behavior.avg_balance >= 2_000.0 {
        gate.adjust(12);
    } else if behavior.avg_balance >= 500.0 {
        gate.adjust(5);
    } else {
        gate.flag(-10, tags::LOW_AVG_BALANCE);
    }

    match behavior.overdrafts_6mo {
        0 => {}
        1 => gate.adjust(-4),
        2 => gate.adjust(-8),
        _ => gate.flag(-15, tags::FREQUENT_OVERDRAFTS),
    }

    if behavior.nsf_fees >= 2 {
        gate.flag(-10, tags::NSF_EVENTS);
    }

    gate.finish()
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
