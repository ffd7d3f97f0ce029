use crate::config::{apply_overrides, base_url_from_env, load_config};
use crate::error::PresentationError;
use crate::model::{Chat, UserId, decode_chats};
use crate::resolver::{ChatPresentation, ChatPresenter};
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print display names and images for chats fetched from the chat API.
#[derive(Debug, Parser)]
#[command(name = "dialog-display", version)]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Media origin used for avatar paths; overrides the config file and environment.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Identifier of the signed-in user.
    #[arg(long)]
    pub user_id: i64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON file with one chat record or an array of them; stdin when omitted.
    pub input: Option<PathBuf>,
}

static TRACING_INIT: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING_INIT.get_or_init(|| {
        let _ = LogTracer::init();
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_target(false)
            .compact()
            .try_init();
    });
}

pub fn run(cli: Cli) -> Result<()> {
    let explicit = cli.config.is_some();
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = load_config(&config_path, explicit)?;
    let config = apply_overrides(config, base_url_from_env(), cli.base_url)?;
    let presenter = ChatPresenter::from_config(&config.display)?;

    debug!(
        config_path = %config_path.display(),
        base_url = presenter.base_url(),
        "loaded display config"
    );

    let raw = read_input(cli.input.as_ref())?;
    let chats = parse_records(&raw)?;
    let current_user = UserId(cli.user_id);
    let (presentations, failed) = present_records(&presenter, chats, current_user);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_presentations(&mut out, &presentations, cli.format)?;
    out.flush().context("failed to flush output")?;

    info!(
        user_id = %current_user,
        presented = presentations.len(),
        failed,
        "finished presenting chats"
    );

    if failed > 0 {
        bail!(
            "{failed} of {} chats could not be presented",
            failed + presentations.len()
        );
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chat records from {}", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read chat records from stdin")?;
            Ok(raw)
        }
    }
}

/// Fails only when the input is not JSON at all; records with a bad shape
/// come back as per-record errors.
pub fn parse_records(raw: &str) -> Result<Vec<Result<Chat, PresentationError>>> {
    let document: serde_json::Value =
        serde_json::from_str(raw).context("failed to parse chat records as JSON")?;
    Ok(decode_chats(document))
}

/// Presents the records that decoded, logging and skipping the rest.
/// Returns the presentations in input order and the number of skipped records.
pub fn present_records(
    presenter: &ChatPresenter,
    records: Vec<Result<Chat, PresentationError>>,
    current_user: UserId,
) -> (Vec<ChatPresentation>, usize) {
    let mut chats = Vec::with_capacity(records.len());
    let mut failed = 0;

    for record in records {
        match record {
            Ok(chat) => chats.push(chat),
            Err(err) => {
                failed += 1;
                warn!(
                    chat_id = err.chat_id(),
                    user_id = %current_user,
                    error = %err,
                    "skipping malformed chat record"
                );
            }
        }
    }

    let mut presentations = Vec::with_capacity(chats.len());
    for result in presenter.present_all(&chats, current_user) {
        match result {
            Ok(presentation) => presentations.push(presentation),
            Err(_) => failed += 1,
        }
    }

    (presentations, failed)
}

pub fn write_presentations<W: Write>(
    out: &mut W,
    presentations: &[ChatPresentation],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for presentation in presentations {
                writeln!(out, "{}\t{}", presentation.name, presentation.image)
                    .context("failed to write output")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, presentations)
                .context("failed to serialize presentations")?;
            writeln!(out).context("failed to write output")?;
        }
    }
    Ok(())
}
