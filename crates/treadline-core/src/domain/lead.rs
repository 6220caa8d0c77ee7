use crate::domain::channel::Channel;
use crate::domain::ids::LeadId;
use crate::domain::status::LeadStatus;
use crate::error::CoreError;
use crate::otr::{parse_otr_message, ParsedOtrMessage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub channel: Channel,
    pub status: LeadStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lead {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(CoreError::EmptyEmail);
        }
        Ok(())
    }

    /// Display fields extracted from the free-text message. Recomputed on
    /// every call; never stored.
    pub fn parsed(&self) -> ParsedOtrMessage {
        parse_otr_message(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::Lead;
    use crate::domain::{Channel, LeadId, LeadStatus};
    use crate::error::CoreError;

    fn lead(name: &str, email: &str) -> Lead {
        Lead {
            id: LeadId::new(),
            name: name.to_string(),
            email: email.to_string(),
            company: None,
            subject: None,
            message: String::new(),
            channel: Channel::default(),
            status: LeadStatus::Pending,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn validate_requires_name_and_email() {
        assert_eq!(lead(" ", "a@b.c").validate(), Err(CoreError::EmptyName));
        assert_eq!(lead("Ana", "").validate(), Err(CoreError::EmptyEmail));
        assert!(lead("Ana", "ana@example.com").validate().is_ok());
    }
}
