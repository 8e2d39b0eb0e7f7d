//! Scholar Scan - command line entry point

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use scholar_scan::constants::{APP_NAME, APP_VERSION};
use scholar_scan::logic::normalize::NormalizedResult;
use scholar_scan::logic::report;
use scholar_scan::{
    AnalysisApi, ClientConfig, FileStorage, HistoryStore, HttpAnalysisClient, SessionController,
    SubmitOutcome, UploadFile,
};

#[derive(Parser)]
#[command(name = "scholar-scan", version, about = "Scholarly paper analysis client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a paper for analysis
    Analyze { file: PathBuf },
    /// List the recent analyses
    History,
    /// Show a past analysis in full
    Show { id: i64 },
    /// Dashboard statistics over the history
    Stats,
    /// Write the text report of a past analysis
    Report {
        id: i64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Ask the assistant about the most recent analysis
    Chat { message: String },
    /// Print the assistant's opening line
    Greeting,
    /// Check that the analysis service is reachable
    Health,
    /// Tell the service whether a past analysis was accurate
    Feedback {
        id: i64,
        #[arg(long, conflicts_with = "inaccurate", required_unless_present = "inaccurate")]
        accurate: bool,
        #[arg(long)]
        inaccurate: bool,
    },
}

type Session = SessionController<HttpAnalysisClient, FileStorage>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("Starting {} v{}", APP_NAME, APP_VERSION);

    let config = ClientConfig::from_env();
    let api = HttpAnalysisClient::new(config.service_config())
        .context("failed to build the service client")?;
    let history = HistoryStore::new(FileStorage::new(config.history_path.clone()));
    let session = SessionController::new(api, history).with_submit_timeout(config.submit_timeout());

    match cli.command {
        Command::Analyze { file } => analyze(&session, &file).await,
        Command::History => {
            list_history(&session);
            Ok(())
        }
        Command::Show { id } => {
            let result = entry_result(&session, id)?;
            print_result(&result);
            Ok(())
        }
        Command::Stats => {
            print_stats(&session);
            Ok(())
        }
        Command::Report { id, out } => {
            let result = entry_result(&session, id)?;
            let path = out.unwrap_or_else(|| PathBuf::from(report::file_name(&result)));
            std::fs::write(&path, report::render(&result, chrono::Utc::now()))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
            Ok(())
        }
        Command::Chat { message } => {
            if let Some(entry) = session.history().load().latest() {
                session.assistant().update(Arc::new(entry.result.clone()));
            }
            match session.send_chat(&message).await {
                Some(reply) => println!("{}", reply),
                None => bail!("message is empty"),
            }
            Ok(())
        }
        Command::Greeting => {
            println!("{}", session.greeting().await);
            Ok(())
        }
        Command::Health => {
            let health = session
                .api()
                .health()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}: {}", session.api().server_url(), health.status);
            Ok(())
        }
        Command::Feedback { id, accurate, .. } => {
            if !session.show_history(id) {
                bail!("no history entry with id {}", id);
            }
            if let Some(reply) = session.send_feedback(accurate).await {
                println!("{}", reply);
            }
            Ok(())
        }
    }
}

async fn analyze(session: &Session, path: &Path) -> anyhow::Result<()> {
    let file = UploadFile::from_path(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    match session.submit(Some(file)).await {
        SubmitOutcome::Succeeded(result) => {
            print_result(&result);
            Ok(())
        }
        SubmitOutcome::Failed(message) => bail!(message),
        SubmitOutcome::Ignored(reason) => bail!("submission ignored: {:?}", reason),
    }
}

fn entry_result(session: &Session, id: i64) -> anyhow::Result<NormalizedResult> {
    session
        .history()
        .find_by_id(id)
        .map(|entry| entry.result)
        .with_context(|| format!("no history entry with id {}", id))
}

fn list_history(session: &Session) {
    let ledger = session.history().load();
    if ledger.is_empty() {
        println!("No analyses yet.");
        return;
    }
    for entry in &ledger {
        println!(
            "{:>15}  {}  {:>5}  {}",
            entry.id,
            entry.captured_at.format("%Y-%m-%d %H:%M"),
            report::fmt_pct(entry.summary.final_probability),
            entry.summary.file_name
        );
    }
}

fn print_stats(session: &Session) {
    let activity = session.activity();
    println!("Total scans:     {}", activity.count);
    println!(
        "Average risk:    {}",
        report::fmt_pct(activity.mean_final_probability)
    );
    for point in &activity.series {
        println!("  {:<8} {:>5.1}%", point.label, point.value_percent);
    }
    for row in &activity.rows {
        println!(
            "  {}  {:>3}%  {}{}",
            row.captured_at.format("%Y-%m-%d %H:%M"),
            row.risk_percent,
            row.file_name,
            if row.elevated { "  [elevated]" } else { "" }
        );
    }
}

fn print_result(result: &NormalizedResult) {
    println!("File:           {}", result.file_name);
    println!("Recommendation: {} ({})", result.decision_label, result.decision.as_str());
    println!("Combined:       {}", report::fmt_pct(result.final_probability));
    println!("AI likelihood:  {}", report::fmt_pct(result.ai_probability));
    println!("Plagiarism:     {}", report::fmt_pct(result.plagiarism_score));
    if let Some(citation) = &result.citation {
        println!("Citations:      {} (score {})", citation.count, citation.score);
    }
    if let Some(eligibility) = &result.eligibility {
        println!(
            "Eligible:       {} (integrity {})",
            if eligibility.is_eligible { "yes" } else { "no" },
            report::fmt_pct(eligibility.integrity_score)
        );
    }
    if !result.matches.is_empty() {
        println!("Suspicious segments:");
        for segment in &result.matches {
            println!("  - {}", segment);
        }
    }
}
