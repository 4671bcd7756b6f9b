use crate::infra::{InMemoryDecisionNotifier, InMemoryMerchantRepository};
use clap::Args;
use merchant_underwriting::config::AppConfig;
use merchant_underwriting::error::AppError;
use merchant_underwriting::onboarding::{
    BankBehavior, MerchantOnboardingService, OnboardingSubmission, ScoreQuote, ScoringConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding a single onboarding submission
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Ignore UNDERWRITING_HIGH_RISK_INDUSTRIES and use the built-in vocabulary
    #[arg(long)]
    pub(crate) default_vocabulary: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the full score history for each merchant
    #[arg(long)]
    pub(crate) verbose: bool,
    /// Ignore UNDERWRITING_HIGH_RISK_INDUSTRIES and use the built-in vocabulary
    #[arg(long)]
    pub(crate) default_vocabulary: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let scoring = resolve_scoring(args.default_vocabulary)?;
    let quote = quote_from_path(&args.input, scoring)?;
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

/// Same vocabulary the server uses unless the caller opts out.
fn resolve_scoring(default_vocabulary: bool) -> Result<ScoringConfig, AppError> {
    if default_vocabulary {
        Ok(ScoringConfig::default())
    } else {
        Ok(AppConfig::load()?.scoring)
    }
}

fn quote_from_path(path: &Path, scoring: ScoringConfig) -> Result<ScoreQuote, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let submission: OnboardingSubmission = serde_json::from_str(&raw)?;
    Ok(demo_service(scoring).quote(&submission)?)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let scoring = resolve_scoring(args.default_vocabulary)?;
    let notifier = Arc::new(InMemoryDecisionNotifier::default());
    let service = MerchantOnboardingService::new(
        Arc::new(InMemoryMerchantRepository::default()),
        notifier.clone(),
        scoring,
    );

    println!("Merchant underwriting demo");
    for (label, submission) in demo_submissions() {
        let record = match service.onboard(submission) {
            Ok(record) => record,
            Err(err) => {
                println!("- {label}: submission rejected ({err})");
                continue;
            }
        };
        let view = record.summary_view();
        println!(
            "- {label}: {} -> {} ({})",
            view.merchant_id.0, view.status, view.decision_rationale
        );
        let Some(latest) = view.latest_score else {
            continue;
        };
        println!(
            "  score {} | tier {} | limit {} | heat {}",
            latest.score,
            latest.tier.label(),
            latest.limit_suggestion,
            latest.heat_score
        );
        if !latest.risk_tags.is_empty() {
            let tags: Vec<&str> = latest.risk_tags.iter().map(String::as_str).collect();
            println!("  risk tags: {}", tags.join(", "));
        }
        if args.verbose {
            println!(
                "  explanation: credit {} | fraud {} | bank {} | industry {}",
                latest.explanation.credit_weight,
                latest.explanation.fraud_penalty,
                latest.explanation.bank_score,
                latest.explanation.industry_risk_penalty
            );
        }
    }

    let notices = notifier.events();
    println!("\nDecision notices queued: {}", notices.len());
    for notice in notices {
        println!("- {} -> {}", notice.merchant_id.0, notice.template);
    }

    Ok(())
}

fn demo_service(
    scoring: ScoringConfig,
) -> MerchantOnboardingService<InMemoryMerchantRepository, InMemoryDecisionNotifier> {
    MerchantOnboardingService::new(
        Arc::new(InMemoryMerchantRepository::default()),
        Arc::new(InMemoryDecisionNotifier::default()),
        scoring,
    )
}

fn demo_submissions() -> Vec<(&'static str, OnboardingSubmission)> {
    let established = OnboardingSubmission {
        name: "Northwind Outfitters".to_string(),
        legal_entity: Some("Northwind Outfitters LLC".to_string()),
        industry: "Retail".to_string(),
        mid: Some("MID-1001".to_string()),
        bin: None,
        mcc: Some("5651".to_string()),
        ein: None,
        website: Some("https://northwind.example".to_string()),
        keywords: vec!["outdoor".to_string(), "apparel".to_string()],
        self_employed: false,
        annual_income: 80_000.0,
        verified_income: Some(78_000.0),
        device_risk_score: 0.1,
        fraud_score: 0.1,
        fico_score: Some(720),
        tradelines: Some(6),
        utilization: Some(0.2),
        chargeoffs: Some(0),
        dti: Some(0.25),
        bank_behavior: Some(BankBehavior {
            overdrafts_6mo: 0,
            avg_balance: 12_000.0,
            nsf_fees: 0,
        }),
    };

    let mut mid_tier = established.clone();
    mid_tier.name = "Corner Street Deli".to_string();
    mid_tier.industry = "Food and Beverage".to_string();
    mid_tier.mid = Some("MID-1002".to_string());
    mid_tier.annual_income = 45_000.0;
    mid_tier.verified_income = None;
    mid_tier.fico_score = Some(690);
    mid_tier.bank_behavior = Some(BankBehavior {
        overdrafts_6mo: 1,
        avg_balance: 2_500.0,
        nsf_fees: 0,
    });

    let mut high_risk = established.clone();
    high_risk.name = "Greenleaf Dispensary".to_string();
    high_risk.industry = "Cannabis".to_string();
    high_risk.mid = Some("MID-1003".to_string());
    high_risk.keywords = vec!["cannabis".to_string(), "delivery".to_string()];
    high_risk.fraud_score = 0.7;

    let mut knockout = established.clone();
    knockout.name = "Quickfix Auto".to_string();
    knockout.industry = "Automotive".to_string();
    knockout.mid = Some("MID-1004".to_string());
    knockout.fico_score = Some(540);

    vec![
        ("established retailer", established),
        ("mid-tier deli", mid_tier),
        ("high-risk dispensary", high_risk),
        ("credit knockout", knockout),
    ]
}
