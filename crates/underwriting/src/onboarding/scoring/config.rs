use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Industries flagged as high risk unless configuration says otherwise.
pub const DEFAULT_HIGH_RISK_INDUSTRIES: [&str; 4] =
    ["peptides", "cannabis", "psilocybin", "subscription_ecommerce"];

/// Static inputs to the scoring engine, fixed for the lifetime of a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub high_risk_industries: BTreeSet<String>,
}

impl ScoringConfig {
    /// Build a config from arbitrary labels, normalized the same way industries are.
    pub fn with_high_risk_industries<I, S>(industries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            high_risk_industries: industries
                .into_iter()
                .map(|label| normalize_industry(label.as_ref()))
                .filter(|label| !label.is_empty())
                .collect(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::with_high_risk_industries(DEFAULT_HIGH_RISK_INDUSTRIES)
    }
}

/// Lower-case, trim, and replace spaces with underscores.
pub fn normalize_industry(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}
