use crate::{FunctionError, FunctionInvoker, FunctionName, Result};
use serde_json::Value;

const FUNCTIONS_PATH: &str = "functions/v1";

fn function_url(base_url: &str, name: FunctionName) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        FUNCTIONS_PATH,
        name.as_str()
    )
}

#[cfg(feature = "http")]
mod imp {
    use super::{function_url, FunctionError, FunctionInvoker, FunctionName, Result, Value};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use url::Url;

    /// Calls functions over HTTPS with a bearer key.
    #[derive(Debug, Clone)]
    pub struct HttpFunctions {
        client: Client,
        base_url: String,
        api_key: Option<String>,
    }

    impl HttpFunctions {
        pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
            let url = Url::parse(base_url)
                .map_err(|_| FunctionError::InvalidUrl(base_url.to_string()))?;
            let local = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
            if url.scheme() != "https" && !(url.scheme() == "http" && local) {
                return Err(FunctionError::InvalidUrl(base_url.to_string()));
            }
            let client = Client::builder()
                .user_agent("treadline")
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
            })
        }
    }

    impl FunctionInvoker for HttpFunctions {
        fn invoke(&self, name: FunctionName, body: &Value) -> Result<Value> {
            let mut request = self.client.post(function_url(&self.base_url, name)).json(body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }
            let response = request.send()?;
            let status = response.status();
            let text = response.text()?;
            if !status.is_success() {
                tracing::debug!(function = name.as_str(), status = status.as_u16(), "function failed");
                return Err(FunctionError::Status {
                    function: name.as_str().to_string(),
                    status: status.as_u16(),
                    body: text,
                });
            }
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        }
    }
}

#[cfg(not(feature = "http"))]
mod imp {
    use super::{function_url, FunctionError, FunctionInvoker, FunctionName, Result, Value};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub struct HttpFunctions {
        base_url: String,
    }

    impl HttpFunctions {
        pub fn new(base_url: &str, _api_key: Option<String>, _timeout: Duration) -> Result<Self> {
            Ok(Self {
                base_url: base_url.trim_end_matches('/').to_string(),
            })
        }
    }

    impl FunctionInvoker for HttpFunctions {
        fn invoke(&self, name: FunctionName, _body: &Value) -> Result<Value> {
            Err(FunctionError::Unavailable(format!(
                "{} requires the http feature",
                function_url(&self.base_url, name)
            )))
        }
    }
}

pub use imp::HttpFunctions;

#[cfg(test)]
mod tests {
    use super::function_url;
    use crate::FunctionName;

    #[test]
    fn function_url_joins_base_and_slug() {
        assert_eq!(
            function_url("https://project.example.co/", FunctionName::SendReplyEmail),
            "https://project.example.co/functions/v1/send-reply-email"
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_functions_reject_plain_http_remote() {
        use super::HttpFunctions;
        use std::time::Duration;

        assert!(HttpFunctions::new("http://project.example.co", None, Duration::from_secs(1)).is_err());
        assert!(HttpFunctions::new("https://project.example.co", None, Duration::from_secs(1)).is_ok());
    }
}
