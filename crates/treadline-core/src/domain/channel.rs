use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel assigned to leads submitted through the plain contact form.
pub const DEFAULT_CHANNEL: &str = "contact";
/// Channel of the OTR indication form.
pub const OTR_CHANNEL: &str = "otr";

/// Tag naming the form or campaign a lead came from (`contact`, `otr`,
/// `investors`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Channel(String);

impl Channel {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let normalized = normalize_channel(raw)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self(DEFAULT_CHANNEL.to_string())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Channel {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Channel> for String {
    fn from(value: Channel) -> Self {
        value.0
    }
}

pub fn normalize_channel(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidChannel);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut prev_dash = false;
    for ch in trimmed.chars() {
        let mapped = if ch.is_whitespace() || ch == '_' { '-' } else { ch };

        if mapped == '-' {
            if prev_dash {
                continue;
            }
            prev_dash = true;
            out.push('-');
        } else {
            prev_dash = false;
            out.extend(mapped.to_lowercase());
        }
    }

    let out = out.trim_matches('-').to_string();
    if out.is_empty() {
        return Err(CoreError::InvalidChannel);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{normalize_channel, Channel};

    #[test]
    fn normalize_channel_basic() {
        assert_eq!(normalize_channel(" OTR ").unwrap(), "otr");
    }

    #[test]
    fn normalize_channel_collapses_separators() {
        assert_eq!(
            normalize_channel("investor   relations").unwrap(),
            "investor-relations"
        );
        assert_eq!(normalize_channel("otr_partner").unwrap(), "otr-partner");
    }

    #[test]
    fn normalize_channel_rejects_blank() {
        assert!(normalize_channel("   ").is_err());
        assert!(normalize_channel(" - ").is_err());
    }

    #[test]
    fn channel_default_is_contact() {
        assert_eq!(Channel::default().as_str(), "contact");
    }
}
