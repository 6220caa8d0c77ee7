use crate::error::CoreError;

/// Trims and lowercases a submitted address and checks its shape: one `@`
/// with a non-empty local part and a dotted domain, no whitespace.
pub fn parse_email(value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyEmail);
    }
    let invalid = || CoreError::InvalidEmail(trimmed.to_string());
    let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(trimmed.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::parse_email;
    use crate::error::CoreError;

    #[test]
    fn parse_email_trims_and_lowercases() {
        assert_eq!(
            parse_email("  Maria@Reciclagem.COM.br ").as_deref(),
            Ok("maria@reciclagem.com.br")
        );
    }

    #[test]
    fn parse_email_rejects_malformed_addresses() {
        assert_eq!(parse_email("   "), Err(CoreError::EmptyEmail));
        for raw in [
            "maria",
            "@example.com",
            "maria@localhost",
            "ma ria@example.com",
            "a@b@c.com",
            "a@example.",
        ] {
            assert!(
                matches!(parse_email(raw), Err(CoreError::InvalidEmail(_))),
                "{raw} should be rejected"
            );
        }
    }
}
