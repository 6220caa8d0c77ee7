use crate::domain::{Channel, LeadStatus};
use crate::filter::ast::{FilterExpr, LeadFilter};
use crate::filter::FilterParseError;
use chrono::NaiveDate;

pub fn parse_filter(input: &str) -> Result<LeadFilter, FilterParseError> {
    let mut terms = Vec::new();

    for token in input.split_whitespace() {
        if let Some(channel_raw) = token.strip_prefix('#') {
            if channel_raw.is_empty() {
                return Err(FilterParseError::EmptyChannel);
            }
            let channel = Channel::new(channel_raw)
                .map_err(|_| FilterParseError::InvalidChannel(channel_raw.to_string()))?;
            terms.push(FilterExpr::Channel(channel));
        } else if let Some(status_raw) = token.strip_prefix("status:") {
            if status_raw.is_empty() {
                return Err(FilterParseError::EmptyStatus);
            }
            terms.push(FilterExpr::Status(LeadStatus::parse_input(status_raw)));
        } else if let Some(date_raw) = token.strip_prefix("since:") {
            terms.push(FilterExpr::Since(parse_date(date_raw)?));
        } else if let Some(date_raw) = token.strip_prefix("until:") {
            terms.push(FilterExpr::Until(parse_date(date_raw)?));
        } else {
            terms.push(FilterExpr::Text(token.to_string()));
        }
    }

    Ok(FilterExpr::And(terms))
}

fn parse_date(raw: &str) -> Result<NaiveDate, FilterParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| FilterParseError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_filter;
    use crate::domain::{Channel, LeadStatus};
    use crate::filter::ast::FilterExpr;
    use crate::filter::FilterParseError;
    use chrono::NaiveDate;

    #[test]
    fn parse_status_and_channel() {
        let filter = parse_filter("status:approved #otr").unwrap();
        assert_eq!(
            filter,
            FilterExpr::And(vec![
                FilterExpr::Status(LeadStatus::Approved),
                FilterExpr::Channel(Channel::new("otr").unwrap()),
            ])
        );
    }

    #[test]
    fn parse_dates_and_text() {
        let filter = parse_filter("since:2025-01-01 until:2025-01-31 mineradora").unwrap();
        assert_eq!(
            filter,
            FilterExpr::And(vec![
                FilterExpr::Since(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
                FilterExpr::Until(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()),
                FilterExpr::Text("mineradora".to_string()),
            ])
        );
    }

    #[test]
    fn unknown_status_is_kept() {
        let filter = parse_filter("status:on_hold").unwrap();
        assert_eq!(
            filter,
            FilterExpr::And(vec![FilterExpr::Status(LeadStatus::Other(
                "on_hold".to_string()
            ))])
        );
    }

    #[test]
    fn errors() {
        assert_eq!(parse_filter("#").unwrap_err(), FilterParseError::EmptyChannel);
        assert_eq!(
            parse_filter("status:").unwrap_err(),
            FilterParseError::EmptyStatus
        );
        assert_eq!(
            parse_filter("since:yesterday").unwrap_err(),
            FilterParseError::InvalidDate("yesterday".to_string())
        );
    }

    #[test]
    fn describe_lists_terms() {
        let filter = parse_filter("status:converted #otr").unwrap();
        assert_eq!(filter.describe(), "status Converted, channel otr");
        assert_eq!(parse_filter("").unwrap().describe(), "all leads");
    }
}
