use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::attachments::extract_text;
use crate::chat::{ChatEngine, OutgoingMessage};
use crate::clipboard::SystemClipboard;
use crate::config::{AppConfig, api_key, build_engine};
use crate::history::{SessionStore, render_transcript};
use crate::logging::{self, LogTarget};
use crate::models::{Attachment, Session};
use crate::notion::{
    ExportOrigin, ExportSource, NotionConfig, SystemBrowser, export_cases, resolve_export_source,
};
use crate::parsers::parse_cases;
use crate::tui::run_chat;
use crate::utils::{MAX_FILE_SIZE_BYTES, format_path_with_tilde, get_config_dir, get_data_dir};

const HISTORY_DIR: &str = "history";

#[derive(Parser)]
#[command(name = "qa-assistant")]
#[command(version)]
#[command(about = "Terminal QA assistant backed by Gemini, with local fallback replies", long_about = None)]
pub struct Cli {
    /// Gemini model to use
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Never call the AI; answer with local replies only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Directory for history, logs and settings
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Ask {
        message: String,
        /// File to attach (repeatable)
        #[arg(short, long = "attach", value_name = "FILE")]
        attach: Vec<PathBuf>,
        /// Do not write the exchange to history
        #[arg(long)]
        no_save: bool,
    },
    /// Print the text extracted from a file
    Extract { file: PathBuf },
    /// Saved conversations
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Test case records scraped from generated text
    Cases {
        #[command(subcommand)]
        command: CasesCommand,
    },
    /// Notion board used by the case export
    Notion {
        #[command(subcommand)]
        command: NotionCommand,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved conversations, newest first
    List,
    /// Print a conversation
    Show { file: String },
    /// Write a conversation as plain text
    Export {
        file: String,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show statistics about the history
    Stats,
}

#[derive(Subcommand)]
pub enum CasesCommand {
    /// Print the cases found in FILE (stdin when omitted)
    Parse {
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Copy cases to the clipboard and open the Notion board
    Export {
        file: Option<PathBuf>,
        /// Export the built-in sample cases
        #[arg(long, conflicts_with = "file")]
        sample: bool,
    },
}

#[derive(Subcommand)]
pub enum NotionCommand {
    /// Store the database id (raw id or notion.so URL)
    Configure {
        id_or_url: String,
        #[arg(long)]
        workspace: Option<String>,
    },
    /// Show the stored configuration
    Status,
    /// Remove the stored configuration
    Clear,
}

/// Resolved directories and settings for one invocation
struct AppContext {
    data_dir: PathBuf,
    config_dir: PathBuf,
    config: AppConfig,
}

impl AppContext {
    fn resolve(cli: &Cli) -> Result<Self> {
        let (data_dir, config_dir) = match &cli.data_dir {
            Some(dir) => (dir.clone(), dir.clone()),
            None => (get_data_dir()?, get_config_dir()?),
        };

        let mut config = AppConfig::load(&AppConfig::path(&config_dir))?;
        if let Some(model) = &cli.model {
            config.model = model.clone();
        }
        if cli.offline {
            config.use_ai = false;
        }

        Ok(Self { data_dir, config_dir, config })
    }

    fn store(&self) -> SessionStore {
        SessionStore::new(self.data_dir.join(HISTORY_DIR))
    }

    fn engine(&self) -> (ChatEngine, Option<String>) {
        let key = if self.config.use_ai { api_key() } else { None };
        build_engine(&self.config, key)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = AppContext::resolve(&cli)?;

    let command = cli.command.unwrap_or(Commands::Chat);

    // The TUI owns the screen, so its logs go to a file
    let target = match command {
        Commands::Chat => LogTarget::File(ctx.data_dir.clone()),
        _ => LogTarget::Stderr,
    };
    logging::init(target)?;

    run_command(&ctx, &command)
}

fn run_command(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Chat => {
            let (engine, notice) = ctx.engine();
            run_chat(engine, notice, ctx.store(), ctx.config_dir.clone())
        }
        Commands::Ask { message, attach, no_save } => ask(ctx, message, attach, *no_save),
        Commands::Extract { file } => extract(file),
        Commands::History { command } => match command {
            HistoryCommand::List => history_list(&ctx.store()),
            HistoryCommand::Show { file } => history_show(&ctx.store(), file),
            HistoryCommand::Export { file, output } => history_export(&ctx.store(), file, output.as_deref()),
            HistoryCommand::Stats => history_stats(&ctx.store()),
        },
        Commands::Cases { command } => match command {
            CasesCommand::Parse { file, json } => cases_parse(file.as_deref(), *json),
            CasesCommand::Export { file, sample } => cases_export(ctx, file.as_deref(), *sample),
        },
        Commands::Notion { command } => match command {
            NotionCommand::Configure { id_or_url, workspace } => {
                notion_configure(&ctx.config_dir, id_or_url, workspace.as_deref())
            }
            NotionCommand::Status => notion_status(&ctx.config_dir),
            NotionCommand::Clear => notion_clear(&ctx.config_dir),
        },
    }
}

fn ask(ctx: &AppContext, message: &str, attach: &[PathBuf], no_save: bool) -> Result<()> {
    for path in attach {
        if !path.is_file() {
            bail!("Attachment not found: {}", path.display());
        }
    }
    let attachments = attach.iter().map(|p| Attachment::new(p.clone())).collect();
    let Some(outgoing) = OutgoingMessage::compose(message, attachments) else {
        bail!("Nothing to send: give a message or --attach a file");
    };

    let (mut engine, notice) = ctx.engine();
    if let Some(notice) = notice {
        eprintln!("{}", notice);
    }

    let (user, reply) = engine.process_message(&outgoing.render());
    println!("{}", reply.text);

    if !no_save {
        let mut session = Session::new();
        session.push_answered(user, reply.text, reply.was_ai);
        let path = ctx.store().save(&mut session)?;
        info!("Conversation saved to {}", format_path_with_tilde(&path));
    }
    Ok(())
}

fn extract(file: &Path) -> Result<()> {
    if !file.is_file() {
        bail!("File not found: {}", file.display());
    }
    println!("{}", extract_text(file));
    Ok(())
}

fn history_list(store: &SessionStore) -> Result<()> {
    let sessions = store.list()?;
    if sessions.is_empty() {
        println!("No saved conversations in {}", format_path_with_tilde(store.dir()));
        return Ok(());
    }

    for stored in &sessions {
        let ai_turns = stored.session.turns.iter().filter(|t| t.was_ai).count();
        println!(
            "{}  {}  {} turns ({} AI)",
            stored.file_name,
            stored.session.start.format("%Y-%m-%d %H:%M:%S"),
            stored.session.turns.len(),
            ai_turns
        );
    }
    Ok(())
}

fn history_show(store: &SessionStore, file: &str) -> Result<()> {
    let session = store.load(file)?;
    print!("{}", render_transcript(&session, file));
    Ok(())
}

fn history_export(store: &SessionStore, file: &str, output: Option<&Path>) -> Result<()> {
    let session = store.load(file)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file).with_extension("txt"),
    };

    fs::write(&output, render_transcript(&session, file))
        .with_context(|| format!("Failed to write transcript: {}", output.display()))?;
    println!("Exported {} to {}", file, output.display());
    Ok(())
}

fn history_stats(store: &SessionStore) -> Result<()> {
    let stats = store.stats()?;

    println!("Conversation History Statistics");
    println!("================================");
    println!("Total sessions: {}", stats.total_sessions);
    println!("Total turns: {}", stats.total_turns);
    println!();
    println!("History directory: {}", format_path_with_tilde(store.dir()));

    if let Some(first) = stats.first_start {
        println!("First session: {}", first.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(last) = stats.last_start {
        println!("Last session: {}", last.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

/// Read `file`, or stdin when `None`, under the usual size limit
fn read_case_text(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            let bytes = crate::utils::read_bounded(path)?;
            String::from_utf8(bytes).with_context(|| format!("Not valid UTF-8: {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .take(MAX_FILE_SIZE_BYTES + 1)
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            if text.len() as u64 > MAX_FILE_SIZE_BYTES {
                bail!("Input too large (max {} bytes)", MAX_FILE_SIZE_BYTES);
            }
            Ok(text)
        }
    }
}

fn cases_parse(file: Option<&Path>, json: bool) -> Result<()> {
    let text = read_case_text(file)?;
    let cases = parse_cases(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&cases).context("Failed to serialize cases")?);
        return Ok(());
    }

    if cases.is_empty() {
        println!("No test cases found");
        return Ok(());
    }

    for case in &cases {
        println!("[{}] {}", case.id, case.title);
        println!("  Module: {} | Priority: {} | Status: {}", case.module, case.priority, case.status);
        println!("  Expected: {}", case.expected_result);
        println!("  Steps: {}", case.steps.len());
        if !case.is_complete() {
            let missing: Vec<String> = case.defaulted.iter().map(|f| f.to_string()).collect();
            println!("  Defaulted: {}", missing.join(", "));
        }
    }
    println!();
    println!("Found {} test cases", cases.len());
    Ok(())
}

fn cases_export(ctx: &AppContext, file: Option<&Path>, sample: bool) -> Result<()> {
    let config = NotionConfig::load(&ctx.config_dir);
    if !config.is_configured() {
        bail!("Notion is not configured. Run `qa-assistant notion configure <DATABASE_ID_OR_URL>` first");
    }

    let mut clipboard = SystemClipboard::new()?;
    let source = if sample {
        ExportSource::sample()
    } else {
        let newest = ctx.store().list()?.into_iter().next();
        let last_reply = newest.as_ref().and_then(|s| s.session.last_ai_reply());
        resolve_export_source(file, last_reply, &mut clipboard)?.context(
            "No test cases to export. Pass a FILE, ask the assistant for test cases, or use --sample",
        )?
    };
    match &source.origin {
        ExportOrigin::File(path) => info!("Exporting cases from {}", path.display()),
        origin => info!("Exporting cases from {:?}", origin),
    }

    let cases = parse_cases(&source.text);
    let report = export_cases(&cases, &config, &mut clipboard, &SystemBrowser)?;
    println!("✅ {} cases prepared for Notion", report.total);
    println!("📋 Copied to the clipboard with full formatting");
    println!("🌐 Opened {}", report.url);
    Ok(())
}

fn notion_configure(config_dir: &Path, id_or_url: &str, workspace: Option<&str>) -> Result<()> {
    let config = NotionConfig::new(id_or_url, workspace)?;
    let path = config.save(config_dir)?;
    println!("Notion configured: database {}", config.database_id);
    println!("Saved to {}", format_path_with_tilde(&path));
    Ok(())
}

fn notion_status(config_dir: &Path) -> Result<()> {
    let config = NotionConfig::load(config_dir);
    if !config.is_configured() {
        println!("Notion: not configured");
        println!("Run `qa-assistant notion configure <DATABASE_ID_OR_URL>`");
        return Ok(());
    }

    println!("Notion: configured");
    println!("Database: {}", config.database_id);
    if !config.workspace_name.is_empty() {
        println!("Workspace: {}", config.workspace_name);
    }
    println!("Board: {}", config.board_url());
    Ok(())
}

fn notion_clear(config_dir: &Path) -> Result<()> {
    if NotionConfig::clear(config_dir)? {
        println!("Notion configuration cleared");
    } else {
        println!("Notion was not configured");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_chat() {
        let cli = Cli::try_parse_from(["qa-assistant"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.offline);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qa-assistant", "ask", "hi", "--offline", "--model", "gemini-x"]).unwrap();
        assert!(cli.offline);
        assert_eq!(cli.model.as_deref(), Some("gemini-x"));
    }

    #[test]
    fn test_ask_repeatable_attach() {
        let cli = Cli::try_parse_from(["qa-assistant", "ask", "review", "-a", "a.pdf", "--attach", "b.docx"])
            .unwrap();
        let Some(Commands::Ask { attach, no_save, .. }) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(attach, vec![PathBuf::from("a.pdf"), PathBuf::from("b.docx")]);
        assert!(!no_save);
    }

    #[test]
    fn test_sample_conflicts_with_file() {
        assert!(Cli::try_parse_from(["qa-assistant", "cases", "export", "f.txt", "--sample"]).is_err());
    }
}
