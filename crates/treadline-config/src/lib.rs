use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use treadline_core::domain::Channel;
use url::Url;

const APP_DIR: &str = "treadline";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_ANALYTICS_MONTHS: usize = 6;
pub const MAX_ANALYTICS_MONTHS: usize = 24;
pub const DEFAULT_REPORT_ROW_LIMIT: usize = 25;
pub const MAX_REPORT_ROW_LIMIT: usize = 500;
pub const DEFAULT_API_KEY_ENV: &str = "TREADLINE_FUNCTIONS_KEY";
pub const DEFAULT_FUNCTION_TIMEOUT_SECONDS: u64 = 30;
const MAX_FUNCTION_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_channel: Channel,
    pub analytics_months: usize,
    pub report_row_limit: usize,
    pub functions: FunctionsConfig,
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone)]
pub struct FunctionsConfig {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub api_key_env: String,
    pub timeout_seconds: u64,
}

impl FunctionsConfig {
    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub notify_on_approval: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_channel: Channel::default(),
            analytics_months: DEFAULT_ANALYTICS_MONTHS,
            report_row_limit: DEFAULT_REPORT_ROW_LIMIT,
            functions: FunctionsConfig {
                enabled: false,
                base_url: None,
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                timeout_seconds: DEFAULT_FUNCTION_TIMEOUT_SECONDS,
            },
            workflow: WorkflowConfig {
                notify_on_approval: true,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid default_channel value: {0:?}")]
    InvalidChannel(String),
    #[error("invalid analytics_months value: {0}")]
    InvalidAnalyticsMonths(usize),
    #[error("invalid report_row_limit value: {0}")]
    InvalidReportRowLimit(usize),
    #[error("invalid functions.base_url value: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid functions.api_key_env value: {0:?}")]
    InvalidApiKeyEnv(String),
    #[error("invalid functions.timeout_seconds value: {0}")]
    InvalidTimeout(u64),
    #[error("functions.enabled requires functions.base_url")]
    MissingBaseUrl,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_channel: Option<String>,
    analytics_months: Option<usize>,
    report_row_limit: Option<usize>,
    functions: Option<FunctionsFile>,
    workflow: Option<WorkflowFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionsFile {
    enabled: Option<bool>,
    base_url: Option<String>,
    api_key_env: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkflowFile {
    notify_on_approval: Option<bool>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(raw) = parsed.default_channel {
        config.default_channel =
            Channel::new(&raw).map_err(|_| ConfigError::InvalidChannel(raw.clone()))?;
    }

    if let Some(months) = parsed.analytics_months {
        if months == 0 || months > MAX_ANALYTICS_MONTHS {
            return Err(ConfigError::InvalidAnalyticsMonths(months));
        }
        config.analytics_months = months;
    }

    if let Some(limit) = parsed.report_row_limit {
        if limit == 0 || limit > MAX_REPORT_ROW_LIMIT {
            return Err(ConfigError::InvalidReportRowLimit(limit));
        }
        config.report_row_limit = limit;
    }

    if let Some(functions) = parsed.functions {
        if let Some(enabled) = functions.enabled {
            config.functions.enabled = enabled;
        }
        if let Some(base_url) = functions.base_url {
            config.functions.base_url = Some(validate_base_url(&base_url)?);
        }
        if let Some(name) = functions.api_key_env {
            let trimmed = name.trim();
            if trimmed.is_empty() || trimmed.contains('=') {
                return Err(ConfigError::InvalidApiKeyEnv(name));
            }
            config.functions.api_key_env = trimmed.to_string();
        }
        if let Some(timeout) = functions.timeout_seconds {
            if timeout == 0 || timeout > MAX_FUNCTION_TIMEOUT_SECONDS {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
            config.functions.timeout_seconds = timeout;
        }
    }

    if config.functions.enabled && config.functions.base_url.is_none() {
        return Err(ConfigError::MissingBaseUrl);
    }

    if let Some(workflow) = parsed.workflow {
        if let Some(notify) = workflow.notify_on_approval {
            config.workflow.notify_on_approval = notify;
        }
    }

    Ok(config)
}

fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    match url.scheme() {
        "https" => {}
        "http" if matches!(url.host_str(), Some("localhost") | Some("127.0.0.1")) => {}
        _ => return Err(ConfigError::InvalidBaseUrl(raw.to_string())),
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
