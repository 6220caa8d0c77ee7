use anyhow::{anyhow, Context as _, Result};
use clap::Args;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use treadline_store::paths;

#[derive(Debug, Args)]
pub struct TuiArgs {
    /// Initial filter expression for the lead list
    #[arg(long)]
    pub filter: Option<String>,
}

const TUI_BINARY: &str = "treadline-tui";

/// Replaces the process with `treadline-tui` on unix; elsewhere waits for it.
pub fn launch(
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    args: TuiArgs,
    verbose: bool,
) -> Result<()> {
    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    if verbose {
        eprintln!("db: {}", db_path.display());
    }
    let mut command = build_command(&db_path, config_path, args.filter);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = command.exec();
        Err(exec_error(err))
    }

    #[cfg(not(unix))]
    {
        let status = command
            .status()
            .map_err(exec_error)?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

fn build_command(db_path: &Path, config_path: Option<PathBuf>, filter: Option<String>) -> Command {
    let mut command = Command::new(tui_binary_path());
    command.arg("--db-path").arg(db_path);
    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }
    if let Some(filter) = filter {
        command.arg("--filter").arg(filter);
    }
    command
}

/// Prefers a sibling of the running binary, then `PATH`.
fn tui_binary_path() -> PathBuf {
    let name = format!("{}{}", TUI_BINARY, env::consts::EXE_SUFFIX);
    env::current_exe()
        .ok()
        .and_then(|current| current.parent().map(|dir| dir.join(&name)))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(name))
}

fn exec_error(err: std::io::Error) -> anyhow::Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        return anyhow!("{} not found; install it next to treadline", TUI_BINARY);
    }
    anyhow!("launch {} failed: {}", TUI_BINARY, err)
}

#[cfg(test)]
mod tests {
    use super::build_command;
    use std::path::{Path, PathBuf};

    #[test]
    fn forwards_paths_and_filter() {
        let command = build_command(
            Path::new("/tmp/leads.db"),
            Some(PathBuf::from("/tmp/config.toml")),
            Some("status:pending".to_string()),
        );
        let args: Vec<_> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            [
                "--db-path",
                "/tmp/leads.db",
                "--config",
                "/tmp/config.toml",
                "--filter",
                "status:pending"
            ]
        );
    }
}
