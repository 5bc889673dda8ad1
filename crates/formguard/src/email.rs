//! Email address grammar.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // Simplified RFC 5322 local part; the domain needs at least one dot.
        Regex::new(
            r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email pattern is valid")
    })
}

/// Check whether `input` is a well-formed email address.
pub fn is_email(input: &str) -> bool {
    input.len() <= 254 && email_regex().is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_addresses() {
        assert!(is_email("test@example.com"));
        assert!(is_email("user.name+tag@domain.co.uk"));
        assert!(is_email("o'brien@mail.example.org"));
    }

    #[test]
    fn invalid_addresses() {
        assert!(!is_email("invalid"));
        assert!(!is_email("@domain.com"));
        assert!(!is_email("user@"));
        assert!(!is_email("user@localhost"));
        assert!(!is_email("user@@example.com"));
        assert!(!is_email(".user@example.com"));
        assert!(!is_email("user..name@example.com"));
        assert!(!is_email("user name@example.com"));
        assert!(!is_email("user@-example.com"));
    }
}
