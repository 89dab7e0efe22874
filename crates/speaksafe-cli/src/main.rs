//! SpeakSafe CLI: file a confidential report from the command line.
//!
//! Attachments are validated and stripped locally before anything is sent.
//! Set SPEAKSAFE_RELAY_URL to point at the relay.

use anyhow::Context;
use clap::{Parser, Subcommand};
use speaksafe_cli::{describe_attachment, init_tracing, read_candidates, unique_file_name};
use speaksafe_client::RelayClient;
use speaksafe_core::models::{
    Department, DepartmentDirectory, Language, ReportForm, ReportPayload,
};
use speaksafe_core::Notice;
use speaksafe_processing::{
    format_file_size, AttachmentPipeline, BatchOutcome, PendingAttachments,
};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "speaksafe", about = "Confidential whistleblower reporting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a report to the relay
    Submit {
        /// Department: hr, finance, it, compliance, project, other
        #[arg(long)]
        department: Option<Department>,
        /// Report text
        #[arg(long)]
        message: String,
        /// Your name (optional)
        #[arg(long)]
        name: Option<String>,
        /// Contact email (optional)
        #[arg(long)]
        email: Option<String>,
        /// Site or organization (optional)
        #[arg(long)]
        site: Option<String>,
        /// Language for the report and notices: en, ar
        #[arg(long, default_value = "en")]
        lang: Language,
        /// File to attach (repeatable)
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
        /// Print what would be sent without contacting the relay
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate and strip files locally, without sending anything
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write stripped copies into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Language for notices: en, ar
        #[arg(long, default_value = "en")]
        lang: Language,
    },
}

fn report_rejections(outcome: &BatchOutcome, language: Language) {
    for rejection in &outcome.rejected {
        eprintln!("{}", rejection.notice().message(language));
    }
}

async fn process_files(
    pipeline: &AttachmentPipeline,
    files: &[PathBuf],
    language: Language,
) -> anyhow::Result<PendingAttachments> {
    let candidates = read_candidates(files).await?;
    let outcome = pipeline.process_batch(candidates).await;
    report_rejections(&outcome, language);

    let mut pending = PendingAttachments::new();
    pending.extend(outcome.accepted);
    Ok(pending)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit {
            department,
            message,
            name,
            email,
            site,
            lang,
            attachments,
            dry_run,
        } => {
            if department.is_none() {
                anyhow::bail!(Notice::DepartmentRequired.message(lang));
            }

            let pipeline = AttachmentPipeline::default();
            let mut pending = process_files(&pipeline, &attachments, lang).await?;
            for attachment in pending.iter() {
                println!("{}", describe_attachment(attachment));
            }

            let form = ReportForm {
                name,
                email,
                site,
                department,
                message,
            };
            let payload = ReportPayload::assemble(
                &form,
                lang,
                &DepartmentDirectory::default(),
                pending.to_wire(),
                chrono::Utc::now(),
            )?;

            if dry_run {
                let summary = serde_json::json!({
                    "to": payload.to,
                    "subject": payload.subject,
                    "attachments": payload.attachments.iter().map(|a| &a.filename).collect::<Vec<_>>(),
                    "attachmentBytes": pending.total_size(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).context("Serialize summary")?
                );
                return Ok(());
            }

            let client = RelayClient::from_env().context("Failed to create relay client")?;
            let response = client.submit(&payload).await;
            match response {
                Ok(response) if response.success => {
                    pending.clear();
                    println!("{}", Notice::SubmissionSucceeded.message(lang));
                }
                Ok(response) => {
                    tracing::error!(
                        error = %response.error_message(),
                        details = ?response.details,
                        "Relay rejected report"
                    );
                    anyhow::bail!(Notice::SubmissionFailed.message(lang));
                }
                Err(err) => {
                    tracing::error!(error = %err, "Report submission failed");
                    anyhow::bail!(Notice::SubmissionFailed.message(lang));
                }
            }
        }
        Commands::Check {
            files,
            out_dir,
            lang,
        } => {
            let pipeline = AttachmentPipeline::default();
            println!(
                "Checking {} file(s), limit {} per file",
                files.len(),
                format_file_size(pipeline.validator().max_file_size() as u64)
            );
            let pending = process_files(&pipeline, &files, lang).await?;
            for attachment in pending.iter() {
                println!(
                    "{} (was {})",
                    describe_attachment(attachment),
                    format_file_size(attachment.original_size as u64)
                );
            }

            if let Some(dir) = out_dir {
                tokio::fs::create_dir_all(&dir)
                    .await
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                let mut taken = HashSet::new();
                for attachment in pending.iter() {
                    let path = dir.join(unique_file_name(&attachment.name, &mut taken));
                    tokio::fs::write(&path, &attachment.payload)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
            }
        }
    }

    Ok(())
}
