mod ast;
mod parser;

use thiserror::Error;

pub use ast::{FilterExpr, LeadFilter};
pub use parser::parse_filter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("empty channel token")]
    EmptyChannel,
    #[error("invalid channel: {0}")]
    InvalidChannel(String),
    #[error("empty status selector")]
    EmptyStatus,
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}
