pub mod error;
pub mod http;
pub mod memory;
pub mod payloads;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use treadline_config::FunctionsConfig;

pub use error::{FunctionError, Result};
pub use http::HttpFunctions;
pub use memory::{MemoryInvoker, RecordedCall};

/// Serverless functions hosted next to the lead tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    SendContactEmail,
    NotifyOtrApproval,
    SendWebhookNotification,
    SendReplyEmail,
    SendWeeklyReport,
    SendMarketplaceEmail,
    FetchYoutubeVideos,
}

impl FunctionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::SendContactEmail => "send-contact-email",
            FunctionName::NotifyOtrApproval => "notify-otr-approval",
            FunctionName::SendWebhookNotification => "send-webhook-notification",
            FunctionName::SendReplyEmail => "send-reply-email",
            FunctionName::SendWeeklyReport => "send-weekly-report",
            FunctionName::SendMarketplaceEmail => "send-marketplace-email",
            FunctionName::FetchYoutubeVideos => "fetch-youtube-videos",
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait FunctionInvoker {
    fn invoke(&self, name: FunctionName, body: &Value) -> Result<Value>;
}

/// Serializes `payload` and invokes `name` with it.
pub fn call<T: Serialize>(
    invoker: &dyn FunctionInvoker,
    name: FunctionName,
    payload: &T,
) -> Result<Value> {
    let body = serde_json::to_value(payload)?;
    tracing::debug!(function = name.as_str(), "invoking function");
    invoker.invoke(name, &body)
}

/// Invoker used when no functions endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredFunctions;

impl FunctionInvoker for UnconfiguredFunctions {
    fn invoke(&self, name: FunctionName, _body: &Value) -> Result<Value> {
        Err(FunctionError::Unavailable(format!(
            "{} skipped: functions are not configured",
            name
        )))
    }
}

/// Picks the invoker for outbound calls. Disabled functions, or a missing
/// base URL, yield an invoker that reports every call as unavailable.
pub fn build_invoker(config: &FunctionsConfig) -> Result<Box<dyn FunctionInvoker>> {
    let base_url = match (&config.base_url, config.enabled) {
        (Some(base_url), true) => base_url,
        _ => return Ok(Box::new(UnconfiguredFunctions)),
    };
    let api_key = config.api_key();
    if api_key.is_none() {
        tracing::warn!(
            env = config.api_key_env.as_str(),
            "functions api key not set; calls will be unauthenticated"
        );
    }
    let invoker = HttpFunctions::new(
        base_url,
        api_key,
        Duration::from_secs(config.timeout_seconds),
    )?;
    Ok(Box::new(invoker))
}
