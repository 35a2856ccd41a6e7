use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use insightforge_application::{AppController, Snapshot};
use insightforge_core::report::ResearchRequest;
use insightforge_core::store::{Store, StorageBackend};
use insightforge_infrastructure::{AppConfig, FileStore, MemoryStore, MockReportGenerator};

mod export;
mod render;

use export::{default_export_path, MarkdownExporter, ReportExporter};

const COMMANDS: &[&str] = &[
    "/login", "/logout", "/theme", "/new", "/history", "/open", "/export", "/help", "/quit",
];

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "using default configuration");
            AppConfig::default()
        }
    };

    // Durable store when possible, in-memory fallback otherwise: a broken
    // data directory degrades persistence, never startup.
    let backend: Arc<dyn StorageBackend> = match config.store_dir() {
        Ok(dir) => match FileStore::new(dir).await {
            Ok(files) => Arc::new(files),
            Err(e) => {
                tracing::warn!(error = %e, "store unavailable, state will not be persisted");
                Arc::new(MemoryStore::new())
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "no data directory, state will not be persisted");
            Arc::new(MemoryStore::new())
        }
    };
    let store = Store::new(backend);

    let delay = config
        .generation_delay()
        .unwrap_or(MockReportGenerator::DEFAULT_DELAY);
    let generator = Arc::new(MockReportGenerator::with_delay(delay));

    let controller = AppController::load(store, generator)
        .await
        .with_generation_timeout(config.generation_timeout());

    run_repl(controller).await
}

async fn run_repl(controller: AppController) -> Result<()> {
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "Welcome to InsightForge".bold());
    println!("Log in with /login <username>, then submit the research form.");
    println!("Type /help for the command list.\n");

    loop {
        let snapshot = controller.snapshot().await;
        match rl.readline(&prompt_for(&snapshot)) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                match handle_line(&controller, &mut rl, &line).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(e) => println!("{}", format!("error: {e}").red()),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn prompt_for(snapshot: &Snapshot) -> String {
    match &snapshot.user {
        Some(user) => format!("insightforge({})> ", user.username),
        None => "insightforge> ".to_string(),
    }
}

async fn handle_line(
    controller: &AppController,
    rl: &mut Editor<CliHelper, DefaultHistory>,
    line: &str,
) -> Result<Flow> {
    let (command, rest) = match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/help" => print_help(),
        "/quit" | "/exit" => return Ok(Flow::Quit),
        "/login" => {
            let username = if rest.is_empty() {
                rl.readline("  Username: ")?.trim().to_string()
            } else {
                rest.to_string()
            };
            if username.is_empty() {
                println!("A username is required to log in.");
            } else {
                let user = controller.login(username).await?;
                println!("Welcome, {}. Submit any input to start the research form.", user.username.bold());
            }
        }
        "/logout" => {
            controller.logout().await?;
            println!("Logged out.");
        }
        "/theme" => {
            let theme = controller.toggle_theme().await?;
            println!("Theme is now {theme}.");
        }
        _ => {
            let snapshot = controller.snapshot().await;
            if snapshot.user.is_none() {
                println!("Log in first with /login <username>.");
                return Ok(Flow::Continue);
            }
            match command {
                "/new" => {
                    controller.new_research().await;
                    println!("Back to the research form.");
                }
                "/history" => {
                    println!("{}", render::render_history(&snapshot.history));
                }
                "/open" => {
                    let index: usize = rest
                        .parse()
                        .map_err(|_| anyhow::anyhow!("usage: /open <number from /history>"))?;
                    let item = index
                        .checked_sub(1)
                        .and_then(|i| snapshot.history.get(i))
                        .ok_or_else(|| anyhow::anyhow!("no history entry {index}"))?;
                    controller.select_history(&item.id).await?;
                    let snapshot = controller.snapshot().await;
                    if let Some(report) = &snapshot.active_report {
                        println!("{}", render::render_report(report, snapshot.theme));
                    }
                }
                "/export" => export_active(&snapshot, rest),
                _ if command.starts_with('/') => {
                    println!("Unknown command {command}. Type /help for the command list.");
                }
                _ => run_form_flow(controller, rl).await?,
            }
        }
    }

    Ok(Flow::Continue)
}

/// Collects the research form fields and runs a generation.
async fn run_form_flow(
    controller: &AppController,
    rl: &mut Editor<CliHelper, DefaultHistory>,
) -> Result<()> {
    println!("{}", "New research".bold());
    let startup_name = rl.readline("  Startup name: ")?.trim().to_string();
    let target_sector = rl.readline("  Target sector: ")?.trim().to_string();
    let objective = rl.readline("  Research objective: ")?.trim().to_string();
    let attachments_line =
        rl.readline("  Attachments (comma-separated paths, blank for none): ")?;
    let attachments: Vec<PathBuf> = attachments_line
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();

    let request = ResearchRequest {
        startup_name,
        target_sector,
        objective,
        attachments,
    };

    println!("{}", "Analyzing market data, this takes a moment ...".cyan());
    match controller.generate(request).await {
        Ok(()) => {
            let snapshot = controller.snapshot().await;
            if let Some(report) = &snapshot.active_report {
                println!("{}", render::render_report(report, snapshot.theme));
                println!("Saved to history. /export writes it to a file, /new starts over.");
            }
        }
        Err(e) => {
            println!(
                "{}",
                format!("Report generation failed: {e}. Back to the form.").red()
            );
        }
    }
    Ok(())
}

fn export_active(snapshot: &Snapshot, rest: &str) {
    let Some(report) = &snapshot.active_report else {
        println!("No report is open. Generate one or /open a history entry first.");
        return;
    };
    let exporter = MarkdownExporter;
    if !exporter.available() {
        println!("Export is not available in this build.");
        return;
    }
    let path = if rest.is_empty() {
        PathBuf::from(default_export_path(report))
    } else {
        PathBuf::from(rest)
    };
    match exporter.export(report, Path::new(&path)) {
        Ok(()) => println!(
            "Exported {} report to {}.",
            exporter.format_name(),
            path.display()
        ),
        Err(e) => println!("{}", format!("Export failed: {e}").red()),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /login <username>   log in and restore your saved history");
    println!("  /logout             end the session (history is kept)");
    println!("  /theme              toggle light/dark rendering");
    println!("  /new                leave the report view, back to the form");
    println!("  /history            list past reports, newest first");
    println!("  /open <n>           reopen a report from /history");
    println!("  /export [path]      write the open report as Markdown");
    println!("  /help               this list");
    println!("  /quit               exit");
    println!("Anything else starts the research form.");
}
