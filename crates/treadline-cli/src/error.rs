use anyhow::Error;
use std::process::ExitCode;
use thiserror::Error as ThisError;
use treadline_config::ConfigError;
use treadline_core::export::ExportError;
use treadline_core::filter::FilterParseError;
use treadline_core::time::TimeParseError;
use treadline_core::CoreError;
use treadline_functions::FunctionError;
use treadline_store::error::{StoreError, StoreErrorKind};

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(function_err) = cause.downcast_ref::<FunctionError>() {
            return ExitCode::from(function_exit_code(function_err));
        }
        if cause.downcast_ref::<ExportError>().is_some() {
            return ExitCode::from(EXIT_FAILURE);
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if cause.downcast_ref::<FilterParseError>().is_some() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if cause.downcast_ref::<TimeParseError>().is_some() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::InvalidId
        | StoreErrorKind::InvalidFilter
        | StoreErrorKind::InvalidDataPath
        | StoreErrorKind::InvalidWebhookUrl
        | StoreErrorKind::Core => EXIT_INVALID_INPUT,
        StoreErrorKind::Function => match err {
            StoreError::Function(inner) => function_exit_code(inner),
            _ => EXIT_FAILURE,
        },
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::InvalidStoredValue
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidChannel(_)
        | ConfigError::InvalidAnalyticsMonths(_)
        | ConfigError::InvalidReportRowLimit(_)
        | ConfigError::InvalidBaseUrl(_)
        | ConfigError::InvalidApiKeyEnv(_)
        | ConfigError::InvalidTimeout(_)
        | ConfigError::MissingBaseUrl
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn function_exit_code(err: &FunctionError) -> u8 {
    match err {
        FunctionError::Unavailable(_) | FunctionError::InvalidUrl(_) => EXIT_INVALID_INPUT,
        FunctionError::Status { .. }
        | FunctionError::Rejected { .. }
        | FunctionError::Serialize(_) => EXIT_FAILURE,
        #[cfg(feature = "http")]
        FunctionError::Http(_) => EXIT_FAILURE,
    }
}
