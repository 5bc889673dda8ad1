//! Failure types raised by a validation chain and the JSON error envelope
//! used when a caller collects them for display.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// The reason a check failed.
///
/// Every failure aborts the chain it was raised from; callers branch on the
/// kind instead of parsing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required key was absent from the keyed source.
    MissingField,
    /// `required()` was called on an empty value.
    RequiredFieldMissing,
    /// Whitespace found where none is allowed.
    ContainsWhitespace,
    /// Value contains something other than ASCII letters.
    NotAlphabetic,
    /// Value contains something other than ASCII letters and digits.
    NotAlphaNumeric,
    /// Value is not a number.
    NotNumeric,
    /// Value is larger than `i64::MAX`.
    Overflow,
    /// Value cannot be truncated to a representable integer.
    InvalidInteger,
    /// Email or mobile number does not match its format.
    InvalidFormat,
    /// Value is not a valid calendar date.
    InvalidDate,
    /// Length outside the exact/min/max bound.
    LengthViolation,
    /// Value outside the min/max bound.
    RangeViolation,
    /// Value does not start with the expected prefix.
    PrefixMismatch,
    /// Value does not end with the expected suffix.
    SuffixMismatch,
}

impl ErrorKind {
    /// Stable machine-readable code, used as `FieldError::code`.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "missing_field",
            ErrorKind::RequiredFieldMissing => "required",
            ErrorKind::ContainsWhitespace => "contains_whitespace",
            ErrorKind::NotAlphabetic => "not_alphabetic",
            ErrorKind::NotAlphaNumeric => "not_alphanumeric",
            ErrorKind::NotNumeric => "not_numeric",
            ErrorKind::Overflow => "overflow",
            ErrorKind::InvalidInteger => "invalid_integer",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::InvalidDate => "invalid_date",
            ErrorKind::LengthViolation => "length",
            ErrorKind::RangeViolation => "range",
            ErrorKind::PrefixMismatch => "prefix",
            ErrorKind::SuffixMismatch => "suffix",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A labeled validation failure.
///
/// The message always reads `"<label> <reason>."`, e.g.
/// `"Age must be numeric."`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct FormError {
    kind: ErrorKind,
    label: String,
    message: String,
    params: HashMap<String, serde_json::Value>,
}

impl FormError {
    /// Create a failure of the given kind.
    pub fn new(kind: ErrorKind, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            message: message.into(),
            params: HashMap::new(),
        }
    }

    /// Attach a parameter describing the failed bound.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// The failure kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Label of the field that failed. Empty when no label was set.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Bound parameters (`min`, `max`, `expected`, `actual`) for length and
    /// range failures.
    pub fn params(&self) -> &HashMap<String, serde_json::Value> {
        &self.params
    }

    /// Convert into the serializable per-field representation.
    pub fn to_field_error(&self) -> FieldError {
        FieldError {
            field: self.label.clone(),
            code: self.kind.code().to_string(),
            message: self.message.clone(),
            params: if self.params.is_empty() {
                None
            } else {
                Some(self.params.clone())
            },
        }
    }
}

/// A single field failure in the JSON error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// The label of the field that failed
    pub field: String,
    /// The failure code (see [`ErrorKind::code`])
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional bound parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl From<FormError> for FieldError {
    fn from(err: FormError) -> Self {
        err.to_field_error()
    }
}

impl From<&FormError> for FieldError {
    fn from(err: &FormError) -> Self {
        err.to_field_error()
    }
}

const ENVELOPE_TYPE: &str = "validation_error";

/// Wire shape of [`ValidationErrors`].
#[derive(Serialize, Deserialize)]
struct Envelope {
    error: EnvelopeBody,
}

#[derive(Serialize, Deserialize)]
struct EnvelopeBody {
    #[serde(rename = "type")]
    kind: String,
    message: String,
    #[serde(default)]
    fields: Vec<FieldError>,
}

impl From<ValidationErrors> for Envelope {
    fn from(errors: ValidationErrors) -> Self {
        Envelope {
            error: EnvelopeBody {
                kind: ENVELOPE_TYPE.to_string(),
                message: errors.message,
                fields: errors.fields,
            },
        }
    }
}

impl From<Envelope> for ValidationErrors {
    fn from(envelope: Envelope) -> Self {
        ValidationErrors {
            fields: envelope.error.fields,
            message: envelope.error.message,
        }
    }
}

/// Failures a caller gathered while validating the fields of one form.
///
/// Each field is still validated by its own chain; this type only collects
/// the outcomes for display. It serializes to:
///
/// ```json
/// {
///   "error": {
///     "type": "validation_error",
///     "message": "Validation failed",
///     "fields": [...]
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "Envelope", from = "Envelope")]
pub struct ValidationErrors {
    /// Collected field failures, in the order they were added
    pub fields: Vec<FieldError>,
    /// Envelope message (default: "Validation failed")
    pub message: String,
}

impl ValidationErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            message: "Validation failed".to_string(),
        }
    }

    /// Create an empty collection with a custom envelope message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            message: message.into(),
        }
    }

    /// Add a failure.
    pub fn add(&mut self, error: impl Into<FieldError>) {
        self.fields.push(error.into());
    }

    /// Record the outcome of one field chain, keeping the value on success.
    pub fn collect<T>(&mut self, result: Result<T, FormError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.add(e);
                None
            }
        }
    }

    /// Check if there are any failures.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of collected failures.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.message.as_str()).collect()
    }

    /// `Ok` if nothing was collected, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} field error(s)", self.message, self.fields.len())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_error_display_is_message() {
        let err = FormError::new(ErrorKind::NotNumeric, "Age", "Age must be numeric.");
        assert_eq!(err.to_string(), "Age must be numeric.");
        assert_eq!(err.kind(), ErrorKind::NotNumeric);
        assert_eq!(err.label(), "Age");
    }

    #[test]
    fn field_error_carries_params() {
        let err = FormError::new(ErrorKind::LengthViolation, "Name", "Name invalid.")
            .param("min", 5)
            .param("actual", 3);
        let field = err.to_field_error();

        assert_eq!(field.field, "Name");
        assert_eq!(field.code, "length");
        let params = field.params.unwrap();
        assert_eq!(params["min"], 5);
        assert_eq!(params["actual"], 3);
    }

    #[test]
    fn field_error_without_params_omits_them() {
        let field: FieldError =
            FormError::new(ErrorKind::InvalidFormat, "Email", "Email invalid.").into();
        let json = serde_json::to_value(&field).unwrap();
        assert!(json.get("params").is_none());
    }

    #[test]
    fn validation_errors_serialization() {
        let mut errors = ValidationErrors::new();
        errors.add(FormError::new(
            ErrorKind::InvalidFormat,
            "Email",
            "Email invalid.",
        ));

        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json["error"]["type"], "validation_error");
        assert_eq!(json["error"]["message"], "Validation failed");
        assert_eq!(json["error"]["fields"][0]["field"], "Email");
        assert_eq!(json["error"]["fields"][0]["code"], "invalid_format");
    }

    #[test]
    fn validation_errors_read_back_from_envelope() {
        let mut errors = ValidationErrors::with_message("Signup rejected");
        errors.add(
            FormError::new(ErrorKind::LengthViolation, "Name", "Name invalid.").param("min", 2),
        );

        let json = serde_json::to_string(&errors).unwrap();
        let parsed: ValidationErrors = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.message, "Signup rejected");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.fields[0].code, "length");
        assert_eq!(parsed.fields[0].params.as_ref().unwrap()["min"], 2);
    }

    #[test]
    fn validation_errors_collect() {
        let mut errors = ValidationErrors::new();
        let ok: Option<i32> = errors.collect(Ok(1));
        let failed: Option<i32> = errors.collect(Err(FormError::new(
            ErrorKind::RequiredFieldMissing,
            "Name",
            "Name required.",
        )));

        assert_eq!(ok, Some(1));
        assert!(failed.is_none());
        assert_eq!(errors.messages(), vec!["Name required."]);
        assert_eq!(errors.to_string(), "Validation failed: 1 field error(s)");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn empty_validation_errors_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn error_kind_codes_are_snake_case() {
        assert_eq!(ErrorKind::NotAlphaNumeric.code(), "not_alphanumeric");
        assert_eq!(
            serde_json::to_value(ErrorKind::RequiredFieldMissing).unwrap(),
            "required_field_missing"
        );
    }
}
