//! The fluent validation session.

use crate::config::ValidatorConfig;
use crate::date::parse_datetime;
use crate::email::is_email;
use crate::error::{ErrorKind, FormError};
use crate::mobile::normalize_mobile;
use crate::numeric::Truncated;
use crate::sanitize::{escape_html, remove_backslashes, strip_tags, QuoteMode};
use crate::source::KeyedSource;
use crate::value::Value;
use chrono_tz::Tz;
use std::cmp::Ordering;
use std::fmt;

/// Vocabulary used in length failure messages.
///
/// Set by the type checks; never causes a failure on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueKind {
    /// No type check ran yet.
    #[default]
    Unspecified,
    /// Set by `as_alphabetic` and `as_alphanumeric`.
    Characters,
    /// Set by `as_numeric`, `as_integer` and `as_float`.
    Digits,
}

impl ValueKind {
    /// Plural noun for messages. `Unspecified` reads as "characters".
    pub fn noun(&self) -> &'static str {
        match self {
            ValueKind::Unspecified | ValueKind::Characters => "characters",
            ValueKind::Digits => "digits",
        }
    }
}

/// Validation session for a single field value.
///
/// Setters return `&mut Self`; checks return `Result<&mut Self, FormError>`
/// and stop the chain on the first failure. [`validate`](Self::validate)
/// ends the chain, returns the value (or the default) and resets the
/// session for the next field. A session that failed is left as it was;
/// start a fresh one.
///
/// ## Example
///
/// ```rust
/// use formguard::{ErrorKind, Value, ValueValidator};
///
/// # fn main() -> Result<(), formguard::FormError> {
/// let mut v = ValueValidator::new();
///
/// let age = v.label("Age").value("42").required()?.as_integer()?.min_value(18)?.validate();
/// assert_eq!(age, Some(Value::Integer(42)));
///
/// let mobile = v.label("Mobile").value("01711781878").as_mobile()?.validate();
/// assert_eq!(mobile, Some(Value::from("8801711781878")));
///
/// let err = v.label("Name").value("ab").min_length(3).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::LengthViolation);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueValidator {
    config: ValidatorConfig,
    label: String,
    current: Option<Value>,
    default: Option<Value>,
    required: bool,
    kind: ValueKind,
}

impl ValueValidator {
    /// Create a validator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with a custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Input acquisition
    // ------------------------------------------------------------------

    /// Set the human-readable field name used in failure messages.
    pub fn label(&mut self, label: impl AsRef<str>) -> &mut Self {
        self.label = label.as_ref().trim().to_string();
        self
    }

    /// Set the value under validation. Text is trimmed.
    pub fn value(&mut self, raw: impl Into<Value>) -> &mut Self {
        self.current = Some(match raw.into() {
            Value::Text(s) => Value::Text(s.trim().to_string()),
            other => other,
        });
        self
    }

    /// Read the value for `key` from `source`.
    ///
    /// A missing key fails with [`ErrorKind::MissingField`] when `required`
    /// is set and leaves the current value untouched otherwise.
    pub fn read<S>(
        &mut self,
        source: &S,
        key: &str,
        required: bool,
    ) -> Result<&mut Self, FormError>
    where
        S: KeyedSource + ?Sized,
    {
        match source.get(key) {
            Some(raw) => self.current = Some(Value::Text(raw.trim().to_string())),
            None if required => return Err(self.fail(ErrorKind::MissingField, "required.")),
            None => {}
        }
        Ok(self)
    }

    /// Value returned by `validate()` when the current value is empty.
    pub fn default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    // ------------------------------------------------------------------
    // Sanitization
    // ------------------------------------------------------------------

    /// Remove markup tags, keeping those named in `allowed`.
    pub fn strip_markup(&mut self, allowed: &[&str]) -> &mut Self {
        self.map_text(|s| strip_tags(s, allowed));
        self
    }

    /// Drop every backslash, then trim.
    pub fn remove_escapes(&mut self) -> &mut Self {
        self.map_text(remove_backslashes);
        self
    }

    /// HTML-escape the value.
    ///
    /// The escape is applied twice, so `<` ends up as `&amp;lt;`. Stored
    /// values must be decoded twice before display.
    pub fn escape_html(&mut self, escape_double_quote: bool, escape_single_quote: bool) -> &mut Self {
        let mode = QuoteMode::from_flags(escape_double_quote, escape_single_quote);
        self.map_text(|s| escape_twice(s, mode));
        self
    }

    /// Apply [`strip_markup`](Self::strip_markup),
    /// [`remove_escapes`](Self::remove_escapes) and
    /// [`escape_html`](Self::escape_html) (both quote kinds) in that order,
    /// each only when its flag is set.
    pub fn sanitize(&mut self, strip_markup: bool, remove_escapes: bool, escape: bool) -> &mut Self {
        if strip_markup {
            self.map_text(|s| strip_tags(s, &[]));
        }
        if remove_escapes {
            self.map_text(remove_backslashes);
        }
        if escape {
            self.map_text(|s| escape_twice(s, QuoteMode::Both));
        }
        self
    }

    /// [`sanitize`](Self::sanitize) with every step enabled.
    pub fn sanitize_all(&mut self) -> &mut Self {
        self.sanitize(true, true, true)
    }

    // ------------------------------------------------------------------
    // Presence
    // ------------------------------------------------------------------

    /// Mark the field required and fail if the value is empty.
    pub fn required(&mut self) -> Result<&mut Self, FormError> {
        self.required = true;
        if self.is_empty() {
            return Err(self.fail(ErrorKind::RequiredFieldMissing, "required."));
        }
        Ok(self)
    }

    /// Mark the field optional. Never fails.
    pub fn optional(&mut self) -> &mut Self {
        self.required = false;
        self
    }

    // ------------------------------------------------------------------
    // Type and format checks
    // ------------------------------------------------------------------

    /// Require ASCII letters only. With `allow_spaces`, space characters
    /// are ignored; without it, any whitespace fails.
    pub fn as_alphabetic(&mut self, allow_spaces: bool) -> Result<&mut Self, FormError> {
        self.kind = ValueKind::Characters;
        self.check_charset(
            allow_spaces,
            char::is_ascii_alphabetic,
            ErrorKind::NotAlphabetic,
            "must be alphabetic.",
        )
    }

    /// Require ASCII letters and digits only. Spaces as in
    /// [`as_alphabetic`](Self::as_alphabetic).
    pub fn as_alphanumeric(&mut self, allow_spaces: bool) -> Result<&mut Self, FormError> {
        self.kind = ValueKind::Characters;
        self.check_charset(
            allow_spaces,
            char::is_ascii_alphanumeric,
            ErrorKind::NotAlphaNumeric,
            "must be a-z/A-Z and/or 0-9.",
        )
    }

    /// Require a number (optional sign, decimal point, exponent). The value
    /// is not converted.
    pub fn as_numeric(&mut self) -> Result<&mut Self, FormError> {
        self.kind = ValueKind::Digits;
        if let Some(value) = self.non_empty() {
            if value.number().is_none() {
                return Err(self.fail(ErrorKind::NotNumeric, "must be numeric."));
            }
        }
        Ok(self)
    }

    /// Convert the value to an `i64`, truncating any fraction.
    pub fn as_integer(&mut self) -> Result<&mut Self, FormError> {
        self.kind = ValueKind::Digits;
        let Some(value) = self.non_empty() else {
            return Ok(self);
        };
        let integer = match value.truncated() {
            None => return Err(self.fail(ErrorKind::NotNumeric, "must be numeric.")),
            Some(Truncated::Integer(i)) => i,
            Some(Truncated::Overflow) => {
                let reason = format!("must be less than or equal to {}.", i64::MAX);
                return Err(self.fail(ErrorKind::Overflow, reason).param("max", i64::MAX));
            }
            Some(Truncated::Invalid) => {
                return Err(self.fail(ErrorKind::InvalidInteger, "invalid."));
            }
        };
        self.current = Some(Value::Integer(integer));
        Ok(self)
    }

    /// Convert the value to an `f64`.
    pub fn as_float(&mut self) -> Result<&mut Self, FormError> {
        self.kind = ValueKind::Digits;
        let Some(value) = self.non_empty() else {
            return Ok(self);
        };
        match value.number() {
            Some(number) => {
                self.current = Some(Value::Float(number.as_f64()));
                Ok(self)
            }
            None => Err(self.fail(ErrorKind::NotNumeric, "must be numeric.")),
        }
    }

    /// Require a well-formed email address.
    pub fn as_email(&mut self) -> Result<&mut Self, FormError> {
        if let Some(value) = self.non_empty() {
            if !is_email(&value.to_string()) {
                return Err(self.fail(ErrorKind::InvalidFormat, "invalid."));
            }
        }
        Ok(self)
    }

    /// Normalize a local mobile number to `880XXXXXXXXXX`.
    ///
    /// Unlike the other checks, an empty value fails.
    pub fn as_mobile(&mut self) -> Result<&mut Self, FormError> {
        let normalized = self
            .non_empty()
            .and_then(|value| normalize_mobile(&value.to_string()));
        match normalized {
            Some(number) => {
                self.current = Some(Value::Text(number));
                Ok(self)
            }
            None => Err(self.fail(ErrorKind::InvalidFormat, "invalid.")),
        }
    }

    /// Convert the value to a date in the configured time zone.
    pub fn as_date(&mut self) -> Result<&mut Self, FormError> {
        let tz = self.config.timezone;
        self.as_date_in(tz)
    }

    /// Convert the value to a date in `tz`.
    pub fn as_date_in(&mut self, tz: Tz) -> Result<&mut Self, FormError> {
        let Some(value) = self.non_empty() else {
            return Ok(self);
        };
        let parsed = match value {
            Value::DateTime(dt) => Some(dt.with_timezone(&tz)),
            other => parse_datetime(&other.to_string(), tz),
        };
        match parsed {
            Some(dt) => {
                self.current = Some(Value::DateTime(dt));
                Ok(self)
            }
            None => Err(self.fail(ErrorKind::InvalidDate, "must be a valid date.")),
        }
    }

    // ------------------------------------------------------------------
    // Length checks
    // ------------------------------------------------------------------

    /// Require exactly `length` characters.
    pub fn equal_length(&mut self, length: usize) -> Result<&mut Self, FormError> {
        if let Some(actual) = self.non_empty().map(Value::char_len) {
            if actual != length {
                let noun = self.kind.noun();
                let reason =
                    format!("invalid. {length} {noun} required. Found {actual} {noun}.");
                return Err(self.length_failure(reason, "expected", length, actual));
            }
        }
        Ok(self)
    }

    /// Require at least `length` characters.
    pub fn min_length(&mut self, length: usize) -> Result<&mut Self, FormError> {
        if let Some(actual) = self.non_empty().map(Value::char_len) {
            if actual < length {
                let noun = self.kind.noun();
                let reason = format!(
                    "invalid. Minimum {length} {noun} required. Found {actual} {noun}."
                );
                return Err(self.length_failure(reason, "min", length, actual));
            }
        }
        Ok(self)
    }

    /// Allow at most `length` characters.
    pub fn max_length(&mut self, length: usize) -> Result<&mut Self, FormError> {
        if let Some(actual) = self.non_empty().map(Value::char_len) {
            if actual > length {
                let noun = self.kind.noun();
                let reason =
                    format!("invalid. Maximum {length} {noun} allowed. Found {actual} {noun}.");
                return Err(self.length_failure(reason, "max", length, actual));
            }
        }
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Range checks
    // ------------------------------------------------------------------

    /// Require the value to be at least `min`.
    ///
    /// Convert dates with [`as_date`](Self::as_date) before comparing
    /// against a date bound. Values with no ordering against `min` fail.
    pub fn min_value(&mut self, min: impl Into<Value>) -> Result<&mut Self, FormError> {
        let min = min.into();
        if let Some(value) = self.non_empty() {
            if matches!(value.compare(&min), Some(Ordering::Less) | None) {
                let reason = format!("must be equal to or greater than {min}.");
                return Err(self.fail(ErrorKind::RangeViolation, reason).param("min", &min));
            }
        }
        Ok(self)
    }

    /// Require the value to be at most `max`.
    pub fn max_value(&mut self, max: impl Into<Value>) -> Result<&mut Self, FormError> {
        let max = max.into();
        if let Some(value) = self.non_empty() {
            if matches!(value.compare(&max), Some(Ordering::Greater) | None) {
                let reason = format!("must be equal to or less than {max}.");
                return Err(self.fail(ErrorKind::RangeViolation, reason).param("max", &max));
            }
        }
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Prefix / suffix
    // ------------------------------------------------------------------

    /// Require the value to start with `prefix`. An empty value never
    /// matches.
    pub fn starts_with(&mut self, prefix: &str) -> Result<&mut Self, FormError> {
        match self.rendered() {
            Some(text) if !text.is_empty() && text.starts_with(prefix) => Ok(self),
            _ => Err(self.fail(ErrorKind::PrefixMismatch, format!("must start with {prefix}."))),
        }
    }

    /// Require the value to end with `suffix`. An empty value never
    /// matches.
    pub fn ends_with(&mut self, suffix: &str) -> Result<&mut Self, FormError> {
        match self.rendered() {
            Some(text) if !text.is_empty() && text.ends_with(suffix) => Ok(self),
            _ => Err(self.fail(ErrorKind::SuffixMismatch, format!("must end with {suffix}."))),
        }
    }

    // ------------------------------------------------------------------
    // Finalization
    // ------------------------------------------------------------------

    /// End the chain.
    ///
    /// Returns the current value, or the default if the value is empty,
    /// and resets the session (the configuration is kept).
    pub fn validate(&mut self) -> Option<Value> {
        let defaulted = self.is_empty();
        let result = if defaulted {
            self.default.take()
        } else {
            self.current.take()
        };
        tracing::trace!(label = %self.label, defaulted, "field validated");
        self.reset();
        result
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The current label.
    pub fn current_label(&self) -> &str {
        &self.label
    }

    /// The value under validation.
    pub fn current_value(&self) -> Option<&Value> {
        self.current.as_ref()
    }

    /// Whether `required()` was called since the last reset.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Vocabulary for length messages.
    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the current value is absent or empty.
    pub fn is_empty(&self) -> bool {
        self.non_empty().is_none()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn reset(&mut self) {
        self.label.clear();
        self.current = None;
        self.default = None;
        self.required = false;
        self.kind = ValueKind::Unspecified;
    }

    fn non_empty(&self) -> Option<&Value> {
        self.current
            .as_ref()
            .filter(|v| !v.is_empty(self.config.empty_policy))
    }

    fn rendered(&self) -> Option<String> {
        self.current.as_ref().map(Value::to_string)
    }

    fn map_text(&mut self, f: impl FnOnce(&str) -> String) {
        if self.is_empty() {
            return;
        }
        if let Some(Value::Text(s)) = self.current.as_mut() {
            *s = f(s);
        }
    }

    fn check_charset(
        &mut self,
        allow_spaces: bool,
        accept: fn(&char) -> bool,
        kind: ErrorKind,
        reason: &'static str,
    ) -> Result<&mut Self, FormError> {
        if let Some(value) = self.non_empty() {
            let text = value.to_string();
            if !allow_spaces && text.chars().any(char::is_whitespace) {
                return Err(self.fail(ErrorKind::ContainsWhitespace, "can not have blank space."));
            }
            let candidate = if allow_spaces {
                text.replace(' ', "")
            } else {
                text
            };
            if !candidate.chars().all(|c| accept(&c)) {
                return Err(self.fail(kind, reason));
            }
        }
        Ok(self)
    }

    fn length_failure(
        &self,
        reason: String,
        bound: &str,
        length: usize,
        actual: usize,
    ) -> FormError {
        self.fail(ErrorKind::LengthViolation, reason)
            .param(bound, length)
            .param("actual", actual)
    }

    fn fail(&self, kind: ErrorKind, reason: impl fmt::Display) -> FormError {
        let subject = if self.label.is_empty() {
            "Value"
        } else {
            self.label.as_str()
        };
        tracing::debug!(label = %self.label, code = kind.code(), "field validation failed");
        FormError::new(kind, self.label.clone(), format!("{subject} {reason}"))
    }
}

fn escape_twice(input: &str, mode: QuoteMode) -> String {
    escape_html(&escape_html(input, mode), mode)
}
