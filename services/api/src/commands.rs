use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;

use jobwright::config::AppConfig;
use jobwright::error::AppError;
use jobwright::pipeline::{
    classify_postings, evaluate_batch, load_postings, write_decisions, RoleVariantSet,
};
use jobwright::tracker::ApplicationStore;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON array of collected postings
    #[arg(long)]
    pub(crate) postings: PathBuf,
    /// Directory of role variant profiles (defaults to the configured data dir)
    #[arg(long)]
    pub(crate) variants: Option<PathBuf>,
    /// Output path for decision records (defaults to the configured data dir)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SummaryArgs {
    /// Evaluation date for follow-up counts (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FollowupArgs {
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the outreach template for each due application
    #[arg(long)]
    pub(crate) show_templates: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let variants_dir = args
        .variants
        .unwrap_or_else(|| config.storage.role_variants_dir());
    let output = args.output.unwrap_or_else(|| config.storage.decisions_file());

    let variants = RoleVariantSet::load_dir(&variants_dir)?;
    let postings = load_postings(&args.postings)?;
    let classified = classify_postings(&postings, &variants);
    let discarded = postings.len() - classified.len();

    let report = evaluate_batch(&classified, &variants, Utc::now());
    write_decisions(&output, &report.decisions)?;

    let applies = report
        .decisions
        .iter()
        .filter(|d| d.decision == jobwright::pipeline::Decision::Apply)
        .count();

    println!("Evaluated {} postings", postings.len());
    println!("  discarded by classifier: {discarded}");
    println!("  skipped during scoring:  {}", report.skipped.len());
    println!("  APPLY decisions:         {applies}");
    println!("  decisions written to {}", output.display());

    for skipped in &report.skipped {
        println!("  ! {} / {}: {}", skipped.company, skipped.role, skipped.error);
    }

    Ok(())
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = ApplicationStore::open(config.storage.applications_log())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let summary = store.summary(today);

    println!("Applications: {}", summary.total_applications);
    for (status, count) in &summary.by_status {
        println!("  {status:<10} {count}");
    }
    println!("Needing follow-up: {}", summary.needing_followup);
    println!("Interview rate:    {}", summary.success_rate_label());

    Ok(())
}

pub(crate) fn run_followups(args: FollowupArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = ApplicationStore::open(config.storage.applications_log())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let due = store.due_followups(today);

    if due.is_empty() {
        println!("No follow-ups due.");
        return Ok(());
    }

    for entry in &due {
        println!(
            "{} - {} at {} ({} days overdue, status {})",
            entry.job_id,
            entry.role,
            entry.company,
            entry.days_overdue,
            entry.status.label(),
        );
        if args.show_templates {
            if let Some(template) = &entry.template {
                println!("\n{template}\n");
            }
        }
    }

    Ok(())
}
