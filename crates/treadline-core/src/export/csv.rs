use super::ExportError;
use crate::domain::Lead;
use crate::time::format_timestamp_date;
use chrono::FixedOffset;

pub const CSV_HEADER: [&str; 12] = [
    "Date",
    "Name",
    "Email",
    "Company",
    "Subject",
    "Channel",
    "Status",
    "Indicator",
    "Indicator Company",
    "Source Type",
    "Location",
    "Estimated Volume",
];

/// Serializes leads in the order given. Fields are quoted per RFC 4180
/// when they contain a delimiter, quote or line break.
pub fn leads_to_csv(leads: &[Lead], offset: FixedOffset) -> Result<String, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for lead in leads {
        let parsed = lead.parsed();
        writer.write_record([
            format_timestamp_date(lead.created_at, offset).as_str(),
            lead.name.as_str(),
            lead.email.as_str(),
            lead.company.as_deref().unwrap_or_default(),
            lead.subject.as_deref().unwrap_or_default(),
            lead.channel.as_str(),
            lead.status.as_str(),
            parsed.indicator_name.as_str(),
            parsed.indicator_company.as_str(),
            parsed.source_type.as_str(),
            parsed.location.as_str(),
            parsed.estimated_volume.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Buffer(err.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
