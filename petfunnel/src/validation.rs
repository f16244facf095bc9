//! Registration form validation and normalisation.
//!
//! Field keys in [`validate_form`] errors match the form's input names (`nomeCompleto`, `email`,
//! `whatsapp`) so a frontend can attach each message to its input directly.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

pub const FULL_NAME_FIELD: &str = "nomeCompleto";
pub const EMAIL_FIELD: &str = "email";
pub const WHATSAPP_FIELD: &str = "whatsapp";

/// `local@domain.tld`, no whitespace, exactly one `@` before the domain.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 10 or 11 digits once everything that is not a digit is stripped.
pub fn validate_phone(phone: &str) -> bool {
    let digits = digits_only(phone);
    (10..=11).contains(&digits.len())
}

/// At least 3 characters after trimming, and at least one space.
pub fn validate_full_name(name: &str) -> bool {
    name.trim().chars().count() >= 3 && name.contains(' ')
}

/// Trim and drop angle brackets.
pub fn sanitize_input(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a Brazilian phone number.
///
/// 11 digits become `(DD) DDDDD-DDDD`, 10 digits become `(DD) DDDD-DDDD`. Any other digit count
/// returns the input unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits = digits_only(phone);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => phone.to_string(),
    }
}

/// Validate the three registration fields together, collecting one message per failing field.
pub fn validate_form(full_name: &str, email: &str, whatsapp: &str) -> Result<(), BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();

    if !validate_full_name(full_name) {
        errors.insert(FULL_NAME_FIELD.to_string(), "Por favor, insira seu nome completo".to_string());
    }
    if !validate_email(email) {
        errors.insert(EMAIL_FIELD.to_string(), "Por favor, insira um email válido".to_string());
    }
    if !validate_phone(whatsapp) {
        errors.insert(WHATSAPP_FIELD.to_string(), "Por favor, insira um número válido".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone_eleven_digits() {
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        // Already-formatted input is re-derived from its digits
        assert_eq!(format_phone("(11) 98765-4321"), "(11) 98765-4321");
    }

    #[test]
    fn test_format_phone_ten_digits() {
        assert_eq!(format_phone("1134567890"), "(11) 3456-7890");
        assert_eq!(format_phone("11 3456 7890"), "(11) 3456-7890");
    }

    #[test]
    fn test_format_phone_other_lengths_unchanged() {
        for input in ["", "1", "123456789", "119876543210", "+55 11 98765-4321", "abc"] {
            assert_eq!(format_phone(input), input, "{input:?} should be returned as-is");
        }
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Ana Souza"));
        assert!(validate_full_name("A B"));
        assert!(!validate_full_name("Ana"));
        assert!(!validate_full_name("AnaSouza"));
        assert!(!validate_full_name("A "));
        assert!(!validate_full_name(""));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com"));
        assert!(validate_email("a.b+c@mail.example.com.br"));
        assert!(!validate_email("ana@example"));
        assert!(!validate_email("ana.example.com"));
        assert!(!validate_email("ana @example.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("ana@@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("(11) 98765-4321"));
        assert!(validate_phone("1134567890"));
        assert!(!validate_phone("123456789"));
        assert!(!validate_phone("551198765432"));
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  <b>Ana</b> Souza "), "bAna/b Souza");
        assert_eq!(sanitize_input("plain"), "plain");
    }

    #[test]
    fn test_validate_form_collects_every_failing_field() {
        let errors = validate_form("Ana", "not-an-email", "123").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[FULL_NAME_FIELD], "Por favor, insira seu nome completo");
        assert_eq!(errors[EMAIL_FIELD], "Por favor, insira um email válido");
        assert_eq!(errors[WHATSAPP_FIELD], "Por favor, insira um número válido");

        assert!(validate_form("Ana Souza", "ana@example.com", "11987654321").is_ok());
    }
}
