//! Local mobile number normalization.
//!
//! Numbers are accepted in three shapes and normalized to the international
//! form `880` + 10-digit subscriber number:
//!
//! | input | length | result |
//! |---|---|---|
//! | `1711781878` | 10 | `880` + input |
//! | `01711781878` | 11 | `88` + input |
//! | `8801711781878` | 13 | input |

/// Country calling code prepended to normalized numbers.
pub const COUNTRY_CODE: &str = "880";

/// Recognized operator codes.
pub const OPERATOR_CODES: [&str; 7] = ["013", "014", "015", "016", "017", "018", "019"];

const MIN_DIGITS: usize = 10;

/// Check a 3-digit operator code against [`OPERATOR_CODES`].
pub fn is_operator_code(code: &str) -> bool {
    OPERATOR_CODES.contains(&code)
}

/// Normalize a mobile number, or `None` if it is not a recognized number.
pub fn normalize_mobile(input: &str) -> Option<String> {
    if input.len() < MIN_DIGITS || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    if input.starts_with('1') {
        if input.len() != 10 {
            return None;
        }
        let code = format!("0{}", &input[..2]);
        return is_operator_code(&code).then(|| format!("{COUNTRY_CODE}{input}"));
    }

    if input.starts_with("01") {
        if input.len() != 11 {
            return None;
        }
        return is_operator_code(&input[..3]).then(|| format!("88{input}"));
    }

    if input.starts_with("8801") {
        if input.len() != 13 {
            return None;
        }
        return is_operator_code(&input[2..5]).then(|| input.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_all_three_shapes() {
        assert_eq!(
            normalize_mobile("1711781878").as_deref(),
            Some("8801711781878")
        );
        assert_eq!(
            normalize_mobile("01711781878").as_deref(),
            Some("8801711781878")
        );
        assert_eq!(
            normalize_mobile("8801711781878").as_deref(),
            Some("8801711781878")
        );
    }

    #[test]
    fn rejects_unknown_operator() {
        assert!(normalize_mobile("1234567890").is_none());
        assert!(normalize_mobile("01211781878").is_none());
        assert!(normalize_mobile("8801211781878").is_none());
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(normalize_mobile("171178187").is_none());
        assert!(normalize_mobile("17117818789").is_none());
        assert!(normalize_mobile("0171178187").is_none());
        assert!(normalize_mobile("017117818789").is_none());
        assert!(normalize_mobile("880171178187").is_none());
    }

    #[test]
    fn rejects_non_digits_and_other_prefixes() {
        assert!(normalize_mobile("").is_none());
        assert!(normalize_mobile("17117818a8").is_none());
        assert!(normalize_mobile("+8801711781878").is_none());
        assert!(normalize_mobile("171178187.").is_none());
        assert!(normalize_mobile("9711781878").is_none());
    }

    #[test]
    fn accepts_every_operator_code() {
        for code in OPERATOR_CODES {
            let local = format!("{code}11781878");
            assert_eq!(normalize_mobile(&local), Some(format!("88{local}")));
        }
    }
}
