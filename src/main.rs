mod actors;
mod engine;
mod models;
mod processing;
mod rules;
mod storage;
mod types;
mod wizard;

use std::io::{stderr, stdout, BufWriter, Write};
use std::path::Path;
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::engine::{SessionEngine, SessionReport};
use crate::models::{Execution, Recipient, SessionContext};
use crate::processing::SimulatedProcessor;
use crate::rules::TransferPolicy;
use crate::storage::{policy_from_dir, SeedDirectory};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: transfer-wizard [session].csv [log_level:optional] [seed_dir:optional] > [report].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        eprintln!("A seed directory holds accounts.csv, recipients.csv and an optional policy.csv");
        exit(1);
    }

    let path = &args[1];
    let log_level = args.get(2)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let (directory, policy) = match args.get(3) {
        Some(seed_dir) => (SeedDirectory::from_dir(Path::new(seed_dir))?, policy_from_dir(Path::new(seed_dir))?),
        None => (SeedDirectory::demo()?, TransferPolicy::default())
    };

    let engine = SessionEngine::new(Arc::new(directory), Arc::new(SimulatedProcessor::default()))
        .with_policy(policy);
    let session = SessionContext::authenticated("demo", Local::now().date_naive());

    let timer = Instant::now();
    let report = engine.run(path, &session).await?;
    let duration = timer.elapsed();

    info!("Replayed session in: {duration:?}");

    write_report_to_stdout(&report)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: The report goes to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_report_to_stdout(report: &SessionReport) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());
    let state = &report.state;

    writeln!(output, "field,value")?;
    writeln!(output, "step,{}", state.current_step)?;
    writeln!(output, "step_number,{}", state.current_step.number())?;
    writeln!(output, "can_advance,{}", report.can_advance)?;

    if let Some(source) = &state.source_account {
        writeln!(output, "source,{}", source.id)?;
        writeln!(output, "source_name,{}", source.name)?;
        writeln!(output, "source_kind,{}", source.kind)?;
        writeln!(output, "source_number,{}", source.masked_number)?;
        writeln!(output, "source_available,{}", source.available_balance)?;
    }

    if let Some(recipient) = &state.recipient {
        writeln!(output, "recipient,{}", recipient.id())?;
        writeln!(output, "recipient_name,{}", recipient.name())?;

        match recipient {
            Recipient::Internal(account) => {
                writeln!(output, "recipient_number,{}", account.masked_number)?;
            }
            Recipient::External(beneficiary) => {
                writeln!(output, "recipient_iban,{}", beneficiary.formatted_iban())?;
                writeln!(output, "recipient_bank,{}", beneficiary.bank_name)?;
                writeln!(output, "recipient_category,{}", beneficiary.category)?;
                writeln!(output, "recipient_verified,{}", beneficiary.verified)?;
            }
        }
    }

    if let Some(details) = &state.transfer_details {
        writeln!(output, "reference,{}", details.reference)?;
        writeln!(output, "mode,{}", details.execution.mode())?;

        if let Execution::Scheduled(date) = details.execution {
            writeln!(output, "date,{date}")?;
        }

        if let Some(frequency) = details.recurrence {
            writeln!(output, "frequency,{frequency}")?;
        }
    }

    if let Some(result) = &state.result {
        writeln!(output, "amount,{}", result.amount)?;
        writeln!(output, "fee,{}", result.fee)?;
        writeln!(output, "total,{}", result.total)?;
        writeln!(output, "status,{}", result.status)?;
        writeln!(output, "transaction_code,{}", result.reference)?;
        writeln!(output, "transaction_id,{}", result.id)?;
        writeln!(output, "estimated_processing_time,{}", result.estimated_processing_time)?;
        writeln!(output, "created_at,{}", result.created_at.to_rfc3339())?;
    } else if let Some(summary) = &report.summary {
        writeln!(output, "amount,{}", summary.amount)?;
        writeln!(output, "fee,{}", summary.fee)?;
        writeln!(output, "total,{}", summary.total)?;
    }

    if let Some(required) = report.requires_security_code {
        writeln!(output, "requires_security_code,{required}")?;
    }

    for (field, error) in &state.field_errors {
        writeln!(output, "error.{field},{error:?}")?;
    }

    writeln!(output, "eligible_recipients,{}", report.eligible_recipients.join(";"))?;
    writeln!(output, "applied,{}", report.applied)?;
    writeln!(output, "rejected,{}", report.rejected)?;

    output.flush()?;

    Ok(())
}
