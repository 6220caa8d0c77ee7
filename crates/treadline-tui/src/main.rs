mod actions;
mod app;
mod ui;
mod util;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context as _, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::actions::execute_action;
use crate::app::App;
use treadline_functions::FunctionInvoker;
use treadline_store::changes::{StoreChange, Topic};
use treadline_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "treadline-tui", version, about = "treadline TUI")]
struct Args {
    #[arg(long)]
    db_path: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Initial lead filter, same syntax as `treadline list --filter`
    #[arg(long)]
    filter: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = treadline_config::load(args.config).with_context(|| "load config")?;
    let db_path = paths::resolve_db_path(args.db_path).with_context(|| "resolve database path")?;
    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;
    let invoker = treadline_functions::build_invoker(&config.functions)
        .with_context(|| "configure functions client")?;

    let mut app = App::new(config.analytics_months, config.workflow.notify_on_approval);
    if let Some(raw) = args.filter.as_deref() {
        app = app.with_initial_filter(raw).map_err(|err| anyhow!(err))?;
    }

    let subscriptions = vec![store.subscribe(Topic::Leads), store.subscribe(Topic::Notes)];

    let mut terminal = TerminalGuard::new()?;
    run_app(
        &mut terminal,
        &store,
        invoker.as_ref(),
        &subscriptions,
        &mut app,
    )
}

fn run_app(
    terminal: &mut TerminalGuard,
    store: &Store,
    functions: &dyn FunctionInvoker,
    subscriptions: &[Receiver<StoreChange>],
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        while let Some(action) = app.next_action() {
            if let Err(err) = execute_action(app, store, functions, action) {
                app.set_error(err.to_string());
            }
        }
        if drain_changes(subscriptions) {
            app.refresh_views();
            continue;
        }

        terminal.terminal_mut().draw(|frame| ui::draw(frame, app))?;

        if app.should_quit {
            break;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            if let Err(err) = store.poll_external_changes() {
                app.set_error(err.to_string());
            }
        }
    }

    Ok(())
}

/// Empties every subscription; true when at least one change arrived.
fn drain_changes(subscriptions: &[Receiver<StoreChange>]) -> bool {
    let mut changed = false;
    for receiver in subscriptions {
        while receiver.try_recv().is_ok() {
            changed = true;
        }
    }
    changed
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            original_hook(info);
        }));

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::drain_changes;
    use treadline_store::changes::Topic;
    use treadline_store::repo::GoalUpsert;
    use treadline_store::Store;

    #[test]
    fn drain_reports_store_writes_once() {
        let store = Store::open_in_memory().unwrap();
        store.migrate().unwrap();
        let subscriptions = vec![store.subscribe(Topic::Leads), store.subscribe(Topic::Goals)];
        assert!(!drain_changes(&subscriptions));

        store
            .goals()
            .upsert(
                1_700_000_000,
                GoalUpsert {
                    month: 3,
                    year: 2025,
                    target_leads: 10,
                    target_conversions: 2,
                    notes: None,
                },
            )
            .unwrap();
        assert!(drain_changes(&subscriptions));
        assert!(!drain_changes(&subscriptions));
    }
}
