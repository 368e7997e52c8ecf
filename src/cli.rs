// SocLookup - cli.rs
//
// Command-line surface: argument definitions and one handler per command.
// Command output goes to stdout; notices and progress detail go to stderr
// or the log.

use crate::app::batch::{BatchProgress, BatchRequest, BatchSummary};
use crate::app::state::{AppState, LookupResult};
use crate::core::classifier;
use crate::core::export;
use crate::core::model::{ArtifactType, ClassificationOutcome, SearchRecord};
use crate::core::resolver::{self, ServiceFilter};
use crate::util::constants;
use crate::util::error::{ExportError, Result, SocLookupError};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Classify SOC indicators and open them in threat-intelligence services.
#[derive(Parser, Debug)]
#[command(name = "soclookup", version, about)]
pub struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Path to config.toml (default: platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory for persisted services and history.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect the type of a single value.
    Classify { value: String },

    /// Print lookup URLs for a value of a given type.
    Resolve {
        /// ip, domain, sha256, asn or mail.
        kind: ArtifactType,
        value: String,
        /// Include disabled services.
        #[arg(long)]
        all: bool,
    },

    /// Classify, resolve and record a value; optionally open the URLs.
    Lookup {
        value: String,
        /// Skip detection and treat the value as this type.
        #[arg(short = 't', long = "type")]
        kind: Option<ArtifactType>,
        /// Open every URL in the browser.
        #[arg(long)]
        open: bool,
        /// Let the browser take focus.
        #[arg(long)]
        foreground: bool,
    },

    /// Look up one value per stdin line, throttled.
    Batch {
        #[arg(short = 't', long = "type")]
        kind: ArtifactType,
        #[arg(long = "max-items")]
        max_items: Option<usize>,
        #[arg(long = "delay-ms")]
        delay_ms: Option<u64>,
        #[arg(long)]
        open: bool,
        #[arg(long)]
        foreground: bool,
    },

    /// Classify every stdin line and report the result.
    Validate {
        /// Emit the report as CSV.
        #[arg(long)]
        csv: bool,
    },

    /// Inspect and toggle lookup services.
    Services {
        #[command(subcommand)]
        action: ServicesAction,
    },

    /// Inspect, prune and export search history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

impl Command {
    /// Whether this invocation may hand URLs to a real browser.
    pub fn opens_browser(&self) -> bool {
        matches!(
            self,
            Command::Lookup { open: true, .. } | Command::Batch { open: true, .. }
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum ServicesAction {
    /// List services, grouped by type.
    List {
        #[arg(short = 't', long = "type")]
        kind: Option<ArtifactType>,
    },
    /// Flip a service between enabled and disabled.
    Toggle { id: String },
    Enable { id: String },
    Disable { id: String },
    /// Discard all changes and restore the built-in defaults.
    Reset,
    /// Enabled/total counts per type.
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List records, most recent first.
    List {
        /// Case-insensitive filter on value or type.
        #[arg(short = 'q', long)]
        query: Option<String>,
        /// Maximum records shown (default 10).
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Remove one record by id.
    Delete { id: Uuid },
    /// Remove every record.
    Clear,
    /// Write the history as CSV or JSON.
    Export {
        #[arg(short = 'f', long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file (default: stdout).
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Execute one command against the loaded state.
pub fn run(command: Command, state: &mut AppState) -> Result<()> {
    match command {
        Command::Classify { value } => {
            classify(&value);
            Ok(())
        }
        Command::Resolve { kind, value, all } => {
            let filter = if all {
                ServiceFilter::All
            } else {
                ServiceFilter::EnabledOnly
            };
            for url in resolver::resolve(&state.catalog, kind, &value, filter) {
                println!("{url}");
            }
            Ok(())
        }
        Command::Lookup {
            value,
            kind,
            open,
            foreground,
        } => {
            let in_background = state.config.open_in_background && !foreground;
            lookup(state, &value, kind, open, in_background);
            Ok(())
        }
        Command::Batch {
            kind,
            max_items,
            delay_ms,
            open,
            foreground,
        } => {
            let text = read_stdin()?;
            let in_background = state.config.open_in_background && !foreground;
            batch(state, &text, kind, max_items, delay_ms, open, in_background);
            Ok(())
        }
        Command::Validate { csv } => validate(&read_stdin()?, csv),
        Command::Services { action } => {
            services(state, action);
            Ok(())
        }
        Command::History { action } => history(state, action),
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn classify(value: &str) {
    let outcome = classifier::classify(value);
    println!("{outcome}");
    if !outcome.is_valid() {
        if let Some(hint) = classifier::suggestion_for(value) {
            println!("hint: {hint}");
        }
    }
}

fn lookup(
    state: &AppState,
    value: &str,
    kind: Option<ArtifactType>,
    open: bool,
    in_background: bool,
) {
    match state.lookup(value, kind, open, in_background) {
        LookupResult::Resolved {
            kind,
            urls,
            opened,
            ..
        } => {
            eprintln!("{}: {} service(s)", kind.label(), urls.len());
            for url in &urls {
                println!("{url}");
            }
            if open {
                eprintln!("Opened {opened} of {} URL(s)", urls.len());
            }
        }
        LookupResult::Rejected(outcome) => {
            eprintln!("Not looked up: {outcome}");
            if let Some(hint) = classifier::suggestion_for(value) {
                eprintln!("hint: {hint}");
            }
        }
    }
}

fn batch(
    state: &mut AppState,
    text: &str,
    kind: ArtifactType,
    max_items: Option<usize>,
    delay_ms: Option<u64>,
    open: bool,
    in_background: bool,
) {
    let max_items = max_items
        .unwrap_or(state.config.max_batch_items)
        .clamp(constants::MIN_MAX_BATCH_ITEMS, constants::ABSOLUTE_MAX_BATCH_ITEMS);
    let delay = delay_ms
        .map(|ms| Duration::from_millis(ms.min(constants::MAX_BATCH_DELAY_MS)))
        .unwrap_or(state.config.batch_delay);

    let mut request = BatchRequest::from_text(text, kind, max_items, delay);
    request.open_in_background = in_background;
    if !open {
        // Nothing is opened, so there is nothing to throttle.
        request.delay = Duration::ZERO;
    }

    state.start_batch(request);

    while let Some(progress) = state.batch.recv_progress() {
        match progress {
            BatchProgress::Started { submitted, queued } => {
                if queued < submitted {
                    eprintln!("{submitted} item(s) submitted; only the first {queued} will be processed");
                }
            }
            BatchProgress::ItemProcessed {
                value,
                urls,
                processed,
                queued,
            } => {
                println!("[{processed}/{queued}] {value}: {} URL(s)", urls.len());
                for url in &urls {
                    println!("    {url}");
                }
            }
            BatchProgress::ItemSkipped { value, reason } => {
                println!("skipped {value}: {reason}");
            }
            BatchProgress::Completed(summary) => println!("{}", summary_line(&summary, false)),
            BatchProgress::Cancelled(summary) => println!("{}", summary_line(&summary, true)),
        }
    }
}

/// Final batch line: processed count against every non-empty line submitted.
fn summary_line(summary: &BatchSummary, cancelled: bool) -> String {
    let line = format!("processed {} of {}", summary.processed, summary.submitted);
    if cancelled {
        format!("cancelled: {line}")
    } else {
        line
    }
}

fn validate(text: &str, as_csv: bool) -> Result<()> {
    let results = classifier::validate_batch(text);

    if as_csv {
        let stdout = std::io::stdout();
        export::export_validation_csv(&results, stdout.lock())?;
        return Ok(());
    }

    for (index, (value, outcome)) in results.iter().enumerate() {
        match outcome {
            ClassificationOutcome::Valid(kind) => {
                println!("{:>4}  {value}  {}", index + 1, kind.label());
            }
            other => {
                let hint = classifier::suggestion_for(value).unwrap_or_default();
                println!("{:>4}  {value}  {other} ({hint})", index + 1);
            }
        }
    }
    let valid = results.iter().filter(|(_, o)| o.is_valid()).count();
    println!("{valid} of {} valid", results.len());
    Ok(())
}

fn services(state: &mut AppState, action: ServicesAction) {
    match action {
        ServicesAction::List { kind } => {
            let kinds: Vec<ArtifactType> = match kind {
                Some(kind) => vec![kind],
                None => ArtifactType::all().to_vec(),
            };
            for kind in kinds {
                println!("{}", kind.label());
                for service in state.catalog.all_services(kind) {
                    let mark = if service.enabled { 'x' } else { ' ' };
                    println!("  [{mark}] {:<22} {}", service.id, service.name);
                }
            }
        }
        ServicesAction::Toggle { id } => report_toggle(&id, state.catalog.toggle(&id)),
        ServicesAction::Enable { id } => report_toggle(&id, state.catalog.set_enabled(&id, true)),
        ServicesAction::Disable { id } => {
            report_toggle(&id, state.catalog.set_enabled(&id, false))
        }
        ServicesAction::Reset => {
            state.catalog.reset_to_defaults();
            println!("services reset to defaults");
        }
        ServicesAction::Stats => {
            for stats in state.catalog.statistics() {
                println!(
                    "{:<8} {}/{} enabled",
                    stats.category.label(),
                    stats.enabled,
                    stats.total
                );
            }
        }
    }
}

fn report_toggle(id: &str, result: Option<bool>) {
    match result {
        Some(true) => println!("{id}: enabled"),
        Some(false) => println!("{id}: disabled"),
        None => eprintln!("Unknown service id '{id}'; nothing changed"),
    }
}

fn history(state: &mut AppState, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List { query, limit } => {
            let history = state.history();
            let limit = limit.unwrap_or(constants::DEFAULT_RECENT_LIMIT);
            let matches: Vec<&SearchRecord> = match query.as_deref() {
                Some(q) => history.search(q).into_iter().take(limit).collect(),
                None => history.recent(limit).iter().collect(),
            };
            for record in matches {
                println!(
                    "{}  {}  {:<7}  {}",
                    record.id,
                    record
                        .timestamp
                        .with_timezone(&chrono::Local)
                        .format(constants::CSV_TIMESTAMP_FORMAT),
                    record.display_type(),
                    record.value
                );
            }
        }
        HistoryAction::Delete { id } => {
            if state.history().delete_search(id) {
                println!("deleted {id}");
            } else {
                eprintln!("No history record with id {id}");
            }
        }
        HistoryAction::Clear => {
            state.history().clear();
            println!("history cleared");
        }
        HistoryAction::Export { format, output } => {
            let content = {
                let history = state.history();
                match format {
                    ExportFormat::Csv => history.export_csv()?,
                    ExportFormat::Json => history.export_json()?,
                }
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, content.as_bytes())
                        .map_err(|source| ExportError::Io { path: path.clone(), source })?;
                    tracing::info!(path = %path.display(), "History exported");
                    eprintln!("Exported history to {}", path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout
                        .write_all(content.as_bytes())
                        .and_then(|()| stdout.flush())
                        .map_err(|source| SocLookupError::Io {
                            path: PathBuf::from("<stdout>"),
                            operation: "write export",
                            source,
                        })?;
                }
            }
        }
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    std::io::read_to_string(std::io::stdin()).map_err(|source| SocLookupError::Io {
        path: PathBuf::from("<stdin>"),
        operation: "read",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_against_submitted_lines() {
        let summary = BatchSummary {
            processed: 3,
            skipped: 0,
            queued: 3,
            submitted: 5,
        };
        assert_eq!(summary_line(&summary, false), "processed 3 of 5");
        assert_eq!(summary_line(&summary, true), "cancelled: processed 3 of 5");
    }
}
