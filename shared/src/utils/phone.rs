//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Romanian mobile number regex (national format, 07xx xxx xxx)
static ROMANIA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^07\d{8}$").unwrap()
});

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").unwrap()
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is a valid Romanian mobile (national format)
pub fn is_valid_romanian_mobile(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    ROMANIA_MOBILE_REGEX.is_match(&normalized)
}

/// Check if a phone number is valid international E.164 format
pub fn is_valid_international_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Check if a phone number is valid (E.164 or Romanian national format)
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    is_valid_international_phone(&normalized) || is_valid_romanian_mobile(&normalized)
}

/// Convert a Romanian national-format mobile number to E.164
///
/// Numbers already in E.164 pass through unchanged. Returns `None`
/// when the input is neither.
pub fn to_e164(phone: &str) -> Option<String> {
    let normalized = normalize_phone_number(phone);
    if is_valid_international_phone(&normalized) {
        Some(normalized)
    } else if is_valid_romanian_mobile(&normalized) {
        Some(format!("+4{}", normalized))
    } else {
        None
    }
}

/// Mask a phone number for logging (e.g. +40712345678 -> +407****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 8 {
        format!(
            "{}****{}",
            &normalized[0..4],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("0712-345-678"), "0712345678");
        assert_eq!(normalize_phone_number("+40 712 345 678"), "+40712345678");
        assert_eq!(normalize_phone_number("(07) 1234-5678"), "0712345678");
    }

    #[test]
    fn test_is_valid_romanian_mobile() {
        assert!(is_valid_romanian_mobile("0712345678"));
        assert!(is_valid_romanian_mobile("0744 123 456"));
        assert!(!is_valid_romanian_mobile("0212345678")); // landline
        assert!(!is_valid_romanian_mobile("071234567")); // too short
    }

    #[test]
    fn test_is_valid_international_phone() {
        assert!(is_valid_international_phone("+40712345678"));
        assert!(is_valid_international_phone("+14155552671"));
        assert!(!is_valid_international_phone("40712345678")); // missing +
        assert!(!is_valid_international_phone("+0712345678")); // leading zero
    }

    #[test]
    fn test_to_e164() {
        assert_eq!(to_e164("0712345678").as_deref(), Some("+40712345678"));
        assert_eq!(to_e164("+40712345678").as_deref(), Some("+40712345678"));
        assert_eq!(to_e164("abc"), None);
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+40712345678"), "+407****5678");
        assert_eq!(mask_phone_number("0712345678"), "0712****5678");
        assert_eq!(mask_phone_number("123"), "****");
    }
}
