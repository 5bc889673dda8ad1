//! Input sanitization helpers.
//!
//! These are plain string transforms; [`ValueValidator`](crate::ValueValidator)
//! applies them to text values in a chain.

/// Which quote characters [`escape_html`] converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteMode {
    /// Leave both quote kinds alone.
    Neither,
    /// Convert `"` only.
    DoubleOnly,
    /// Convert `"` and `'`.
    #[default]
    Both,
}

impl QuoteMode {
    /// Resolve the two escape flags into a mode.
    ///
    /// | double | single | mode |
    /// |---|---|---|
    /// | true | false | `DoubleOnly` |
    /// | false | false | `Neither` |
    /// | true | true | `Both` |
    /// | false | true | `Both` |
    pub fn from_flags(escape_double: bool, escape_single: bool) -> Self {
        match (escape_double, escape_single) {
            (true, false) => QuoteMode::DoubleOnly,
            (false, false) => QuoteMode::Neither,
            _ => QuoteMode::Both,
        }
    }
}

/// Escape HTML special characters once.
///
/// Replaces:
/// - `&` -> `&amp;`
/// - `<` -> `&lt;`
/// - `>` -> `&gt;`
/// - `"` -> `&quot;` (unless `mode` is `Neither`)
/// - `'` -> `&#039;` (only when `mode` is `Both`)
pub fn escape_html(input: &str, mode: QuoteMode) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' if mode != QuoteMode::Neither => output.push_str("&quot;"),
            '\'' if mode == QuoteMode::Both => output.push_str("&#039;"),
            _ => output.push(c),
        }
    }
    output
}

/// Drop every backslash, then trim.
///
/// `how\'s` becomes `how's` and `a\\\\b` becomes `ab`; escape sequences are
/// not interpreted.
pub fn remove_backslashes(input: &str) -> String {
    let stripped: String = input.chars().filter(|&c| c != '\\').collect();
    stripped.trim().to_string()
}

/// Strip HTML and processing-instruction tags from a string.
///
/// Tags whose name appears in `allowed` (case-insensitive, given as `"b"`
/// or `"<b>"`) are kept verbatim. Text between tags is kept. A `<` followed
/// by whitespace or the end of input is literal text. Comments are removed
/// along with their contents. An unterminated tag removes the rest of the
/// input.
pub fn strip_tags(input: &str, allowed: &[&str]) -> String {
    let allowed: Vec<String> = allowed
        .iter()
        .map(|t| {
            t.trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .trim_start_matches('/')
                .to_ascii_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect();

    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match candidate[1..].chars().next() {
            None => {
                output.push('<');
                rest = "";
                break;
            }
            Some(c) if c.is_whitespace() => {
                output.push('<');
                rest = &candidate[1..];
                continue;
            }
            _ => {}
        }

        if let Some(body) = candidate.strip_prefix("<!--") {
            rest = match body.find("-->") {
                Some(end) => &body[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(end) = tag_end(candidate) else {
            rest = "";
            break;
        };
        let tag = &candidate[..=end];
        if is_allowed(tag, &allowed) {
            output.push_str(tag);
        }
        rest = &candidate[end + 1..];
    }

    output.push_str(rest);
    output
}

/// Byte index of the `>` closing the tag that starts at `tag[0]`, skipping
/// `>` inside quoted attribute values.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in tag.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_allowed(tag: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return false;
    }
    let name: String = tag[1..]
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    !name.is_empty() && allowed.iter().any(|a| *a == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        let input = "<script>alert('XSS')</script>";
        let expected = "&lt;script&gt;alert(&#039;XSS&#039;)&lt;/script&gt;";
        assert_eq!(escape_html(input, QuoteMode::Both), expected);
    }

    #[test]
    fn test_escape_html_quote_modes() {
        let input = r#"say "hi" & 'bye'"#;
        assert_eq!(
            escape_html(input, QuoteMode::Both),
            "say &quot;hi&quot; &amp; &#039;bye&#039;"
        );
        assert_eq!(
            escape_html(input, QuoteMode::DoubleOnly),
            "say &quot;hi&quot; &amp; 'bye'"
        );
        assert_eq!(
            escape_html(input, QuoteMode::Neither),
            r#"say "hi" &amp; 'bye'"#
        );
    }

    #[test]
    fn test_quote_mode_truth_table() {
        assert_eq!(QuoteMode::from_flags(true, false), QuoteMode::DoubleOnly);
        assert_eq!(QuoteMode::from_flags(false, false), QuoteMode::Neither);
        assert_eq!(QuoteMode::from_flags(true, true), QuoteMode::Both);
        assert_eq!(QuoteMode::from_flags(false, true), QuoteMode::Both);
    }

    #[test]
    fn test_remove_backslashes() {
        assert_eq!(remove_backslashes(r"how\'s going on?"), "how's going on?");
        assert_eq!(
            remove_backslashes(r"My dog don\\\\\\\\'t like the postman!"),
            "My dog don't like the postman!"
        );
        assert_eq!(remove_backslashes("  \\ padded \\ "), "padded");
    }

    #[test]
    fn test_strip_tags() {
        let input = "<p>Hello <b>World</b></p>";
        assert_eq!(strip_tags(input, &[]), "Hello World");
    }

    #[test]
    fn test_strip_tags_keeps_script_text() {
        assert_eq!(
            strip_tags("<script>alert(1)</script>done", &[]),
            "alert(1)done"
        );
    }

    #[test]
    fn test_strip_tags_allow_list() {
        let input = "<p>Hello <B>bold</B> <i>it</i></p>";
        assert_eq!(strip_tags(input, &["b"]), "Hello <B>bold</B> it");
        assert_eq!(strip_tags(input, &["<b>", "<i>"]), "Hello <B>bold</B> <i>it</i>");
    }

    #[test]
    fn test_strip_tags_literal_angle_brackets() {
        assert_eq!(strip_tags("1 < 2 and 3 > 2", &[]), "1 < 2 and 3 > 2");
        assert_eq!(strip_tags("trailing <", &[]), "trailing <");
    }

    #[test]
    fn test_strip_tags_quoted_gt_and_comments() {
        assert_eq!(strip_tags(r#"<a title="x > y">link</a>"#, &[]), "link");
        assert_eq!(strip_tags("a<!-- <b>hidden</b> -->b", &[]), "ab");
        assert_eq!(strip_tags("x<?php echo 1; ?>y", &[]), "xy");
    }

    #[test]
    fn test_strip_tags_unterminated() {
        assert_eq!(strip_tags("keep <b unterminated", &[]), "keep ");
    }
}
