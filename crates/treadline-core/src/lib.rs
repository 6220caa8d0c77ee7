pub mod analytics;
pub mod domain;
pub mod dto;
pub mod error;
pub mod export;
pub mod filter;
pub mod otr;
pub mod rules;
pub mod time;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use filter::{parse_filter, FilterExpr, FilterParseError, LeadFilter};
pub use otr::{parse_otr_message, ParsedOtrMessage};
pub use rules::*;
