mod commands;
mod error;
mod pdf;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    completions, export, goals, leads, notes, parse, reports, stats, status, tui, webhooks,
    Context,
};
use crate::error::{exit_code_for, report_error};
use treadline_config as config;
use treadline_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "treadline", version, about = "treadline lead back office")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// Record a submitted contact form or OTR indication
    Intake(leads::IntakeArgs),
    List(leads::ListArgs),
    Show(leads::ShowArgs),
    Delete(leads::DeleteArgs),
    /// Move a lead to another status
    Status(status::StatusArgs),
    /// Add a manual note to a lead
    Note(notes::NoteArgs),
    /// Email the lead and record the reply as a note
    Reply(notes::ReplyArgs),
    /// Extract OTR indication fields from a message
    Parse(parse::ParseArgs),
    Stats(stats::StatsArgs),
    Export(export::ExportArgs),
    #[command(subcommand)]
    Goal(goals::GoalCommand),
    #[command(subcommand)]
    Webhook(webhooks::WebhookCommand),
    #[command(name = "weekly-report")]
    WeeklyReport(reports::WeeklyReportArgs),
    Tui(tui::TuiArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let command = match command {
        Command::Tui(args) => return tui::launch(db_path, config_path, args, verbose),
        Command::Completions(args) => return completions::emit(args),
        command => command,
    };

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }
    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;
    let invoker = treadline_functions::build_invoker(&app_config.functions)
        .with_context(|| "configure functions client")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
        functions: invoker.as_ref(),
    };

    match command {
        Command::Intake(args) => leads::intake(&ctx, args),
        Command::List(args) => leads::list_leads(&ctx, args),
        Command::Show(args) => leads::show_lead(&ctx, args),
        Command::Delete(args) => leads::delete_lead(&ctx, args),
        Command::Status(args) => status::set_status(&ctx, args),
        Command::Note(args) => notes::add_note(&ctx, args),
        Command::Reply(args) => notes::reply(&ctx, args),
        Command::Parse(args) => parse::parse_message(&ctx, args),
        Command::Stats(args) => stats::show_stats(&ctx, args),
        Command::Export(args) => export::export(&ctx, args),
        Command::Goal(cmd) => match cmd {
            goals::GoalCommand::Set(args) => goals::set_goal(&ctx, args),
            goals::GoalCommand::Ls(args) => goals::list_goals(&ctx, args),
            goals::GoalCommand::Progress(args) => goals::show_progress(&ctx, args),
        },
        Command::Webhook(cmd) => match cmd {
            webhooks::WebhookCommand::Add(args) => webhooks::add_webhook(&ctx, args),
            webhooks::WebhookCommand::Ls(args) => webhooks::list_webhooks(&ctx, args),
            webhooks::WebhookCommand::Toggle(args) => webhooks::toggle_webhook(&ctx, args),
            webhooks::WebhookCommand::Rm(args) => webhooks::remove_webhook(&ctx, args),
        },
        Command::WeeklyReport(args) => reports::weekly(&ctx, args),
        Command::Tui(_) | Command::Completions(_) => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
