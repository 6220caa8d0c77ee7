use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use treadline_config::AppConfig;
use treadline_functions::FunctionInvoker;
use treadline_store::Store;

pub mod completions;
pub mod export;
pub mod goals;
pub mod leads;
pub mod notes;
pub mod parse;
pub mod reports;
pub mod stats;
pub mod status;
pub mod tui;
pub mod webhooks;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
    pub functions: &'a dyn FunctionInvoker,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
