//! Parser for the OTR indication message convention.
//!
//! Indication forms submit a single free-text block:
//!
//! ```text
//! INDICADOR:
//! - Nome: Maria
//! - Empresa: Acme
//! FONTE INDICADA:
//! - Tipo: Mineradora
//! - Localização: Parauapebas, PA, Brasil
//! DETALHES ADICIONAIS:
//! free text...
//! ```
//!
//! Parsing never fails. Anything that does not match the convention is
//! dropped and missing fields come back as empty strings.

use serde::{Deserialize, Serialize};

pub const INDICATOR_HEADER: &str = "INDICADOR:";
pub const SOURCE_HEADER: &str = "FONTE INDICADA:";
pub const DETAILS_HEADER: &str = "DETALHES ADICIONAIS:";

const INDICATOR_NAME: &str = "- Nome:";
const INDICATOR_COMPANY: &str = "- Empresa:";
const INDICATOR_PHONE: &str = "- Telefone:";
const INDICATOR_EMAIL: &str = "- Email:";

const SOURCE_TYPE: &str = "- Tipo:";
const SOURCE_COMPANY: &str = "- Empresa:";
const SOURCE_CONTACT: &str = "- Contato:";
const SOURCE_PHONE: &str = "- Telefone:";
const SOURCE_EMAIL: &str = "- Email:";
const SOURCE_LOCATION: &str = "- Localização:";
const SOURCE_VOLUME: &str = "- Volume estimado:";
const SOURCE_TIRE_TYPES: &str = "- Tipos de pneus:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOtrMessage {
    pub indicator_name: String,
    pub indicator_company: String,
    pub indicator_phone: String,
    pub indicator_email: String,
    pub source_type: String,
    pub source_company: String,
    pub source_contact: String,
    pub source_phone: String,
    pub source_email: String,
    pub location: String,
    pub estimated_volume: String,
    pub tire_types: String,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Indicator,
    Source,
    Details,
}

pub fn parse_otr_message(message: &str) -> ParsedOtrMessage {
    let mut parsed = ParsedOtrMessage::default();
    let mut section = Section::Preamble;
    let mut details = String::new();

    for line in message.lines() {
        if section == Section::Details {
            details.push_str(line);
            details.push('\n');
            continue;
        }

        match line.trim() {
            INDICATOR_HEADER => {
                section = Section::Indicator;
                continue;
            }
            SOURCE_HEADER => {
                section = Section::Source;
                continue;
            }
            DETAILS_HEADER => {
                section = Section::Details;
                continue;
            }
            _ => {}
        }

        let line = line.trim_start();
        let slot = match section {
            Section::Preamble | Section::Details => None,
            Section::Indicator => parsed.indicator_slot(line),
            Section::Source => parsed.source_slot(line),
        };
        if let Some((field, value)) = slot {
            *field = value.trim().to_string();
        }
    }

    parsed.details = details.trim().to_string();
    parsed
}

impl ParsedOtrMessage {
    fn indicator_slot<'a, 'l>(&'a mut self, line: &'l str) -> Option<(&'a mut String, &'l str)> {
        let table: [(&str, &'a mut String); 4] = [
            (INDICATOR_NAME, &mut self.indicator_name),
            (INDICATOR_COMPANY, &mut self.indicator_company),
            (INDICATOR_PHONE, &mut self.indicator_phone),
            (INDICATOR_EMAIL, &mut self.indicator_email),
        ];
        match_prefix(table, line)
    }

    fn source_slot<'a, 'l>(&'a mut self, line: &'l str) -> Option<(&'a mut String, &'l str)> {
        let table: [(&str, &'a mut String); 8] = [
            (SOURCE_TYPE, &mut self.source_type),
            (SOURCE_COMPANY, &mut self.source_company),
            (SOURCE_CONTACT, &mut self.source_contact),
            (SOURCE_PHONE, &mut self.source_phone),
            (SOURCE_EMAIL, &mut self.source_email),
            (SOURCE_LOCATION, &mut self.location),
            (SOURCE_VOLUME, &mut self.estimated_volume),
            (SOURCE_TIRE_TYPES, &mut self.tire_types),
        ];
        match_prefix(table, line)
    }

    pub fn is_empty(&self) -> bool {
        self == &ParsedOtrMessage::default()
    }

    /// Renders the fields back into the message convention. Empty fields
    /// are left out; sections with no fields are left out entirely.
    pub fn to_message(&self) -> String {
        let mut out = String::new();

        let indicator = [
            (INDICATOR_NAME, &self.indicator_name),
            (INDICATOR_COMPANY, &self.indicator_company),
            (INDICATOR_PHONE, &self.indicator_phone),
            (INDICATOR_EMAIL, &self.indicator_email),
        ];
        push_section(&mut out, INDICATOR_HEADER, &indicator);

        let source = [
            (SOURCE_TYPE, &self.source_type),
            (SOURCE_COMPANY, &self.source_company),
            (SOURCE_CONTACT, &self.source_contact),
            (SOURCE_PHONE, &self.source_phone),
            (SOURCE_EMAIL, &self.source_email),
            (SOURCE_LOCATION, &self.location),
            (SOURCE_VOLUME, &self.estimated_volume),
            (SOURCE_TIRE_TYPES, &self.tire_types),
        ];
        push_section(&mut out, SOURCE_HEADER, &source);

        let details = self.details.trim();
        if !details.is_empty() {
            out.push_str(DETAILS_HEADER);
            out.push('\n');
            out.push_str(details);
            out.push('\n');
        }

        out
    }
}

fn match_prefix<'a, 'l, const N: usize>(
    table: [(&str, &'a mut String); N],
    line: &'l str,
) -> Option<(&'a mut String, &'l str)> {
    for (prefix, field) in table {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some((field, rest));
        }
    }
    None
}

fn push_section(out: &mut String, header: &str, fields: &[(&str, &String)]) {
    let present: Vec<_> = fields
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect();
    if present.is_empty() {
        return;
    }
    out.push_str(header);
    out.push('\n');
    for (prefix, value) in present {
        out.push_str(prefix);
        out.push(' ');
        out.push_str(value.trim());
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_otr_message, ParsedOtrMessage};

    const SAMPLE: &str = "INDICADOR:\n- Nome: Maria\n- Empresa: Acme\nFONTE INDICADA:\n- Tipo: Mineradora\nDETALHES ADICIONAIS:\nLinha 1\nLinha 2";

    #[test]
    fn parses_sample_indication() {
        let parsed = parse_otr_message(SAMPLE);
        assert_eq!(
            parsed,
            ParsedOtrMessage {
                indicator_name: "Maria".to_string(),
                indicator_company: "Acme".to_string(),
                source_type: "Mineradora".to_string(),
                details: "Linha 1\nLinha 2".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn empty_input_yields_empty_fields() {
        let parsed = parse_otr_message("");
        assert!(parsed.is_empty());
        assert_eq!(parsed.details, "");
    }

    #[test]
    fn lines_before_first_header_are_dropped() {
        let parsed = parse_otr_message("- Nome: Ghost\nINDICADOR:\n- Telefone: 123");
        assert_eq!(parsed.indicator_name, "");
        assert_eq!(parsed.indicator_phone, "123");
    }

    #[test]
    fn same_prefix_maps_by_section() {
        let parsed = parse_otr_message(
            "INDICADOR:\n- Empresa: Broker Ltda\nFONTE INDICADA:\n- Empresa: Vale Norte\n- Localização:  Carajás, Brasil ",
        );
        assert_eq!(parsed.indicator_company, "Broker Ltda");
        assert_eq!(parsed.source_company, "Vale Norte");
        assert_eq!(parsed.location, "Carajás, Brasil");
    }

    #[test]
    fn repeated_field_keeps_last_value() {
        let parsed = parse_otr_message("INDICADOR:\n- Nome: First\n- Nome: Second");
        assert_eq!(parsed.indicator_name, "Second");
    }

    #[test]
    fn prefixes_are_case_sensitive() {
        let parsed = parse_otr_message("INDICADOR:\n- nome: lower\nindicador:\n- Nome: ok");
        assert_eq!(parsed.indicator_name, "ok");
    }

    #[test]
    fn details_capture_everything_after_header() {
        let parsed = parse_otr_message(
            "DETALHES ADICIONAIS:\n\n  indented\nINDICADOR:\n- Nome: not parsed\n\n",
        );
        assert_eq!(parsed.details, "indented\nINDICADOR:\n- Nome: not parsed");
        assert_eq!(parsed.indicator_name, "");
    }

    #[test]
    fn reparsing_rendered_message_is_stable() {
        let messages = [
            SAMPLE,
            "INDICADOR:\n- Email: a@b.c\nFONTE INDICADA:\n- Volume estimado: 300 t/mês\n- Tipos de pneus: 57\"\n",
            "garbage only",
            "",
        ];
        for message in messages {
            let first = parse_otr_message(message);
            let second = parse_otr_message(&first.to_message());
            assert_eq!(first, second, "message: {message:?}");
        }
    }
}
