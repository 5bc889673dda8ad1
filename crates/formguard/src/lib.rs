//! # Formguard
//!
//! Fluent validation and sanitization for a single form field. A
//! [`ValueValidator`] takes one raw value through a chain of checks and
//! transforms and either yields the normalized value or a labeled
//! [`FormError`].
//!
//! ## Example
//!
//! ```rust
//! use formguard::prelude::*;
//! use std::collections::HashMap;
//!
//! # fn main() -> Result<(), FormError> {
//! let mut params = HashMap::new();
//! params.insert("mobile".to_string(), " 01711781878 ".to_string());
//! params.insert("bio".to_string(), "<b>Hi</b> <there>".to_string());
//!
//! let mut v = ValueValidator::new();
//!
//! let mobile = v
//!     .label("Mobile")
//!     .read(&params, "mobile", true)?
//!     .required()?
//!     .as_mobile()?
//!     .validate();
//! assert_eq!(mobile, Some(Value::from("8801711781878")));
//!
//! let age = v
//!     .label("Age")
//!     .read(&params, "age", false)?
//!     .as_integer()?
//!     .default_value(0)
//!     .validate();
//! assert_eq!(age, Some(Value::Integer(0)));
//!
//! let bio = v.label("Bio").read(&params, "bio", false)?.sanitize_all().validate();
//! assert_eq!(bio, Some(Value::from("Hi")));
//! # Ok(())
//! # }
//! ```
//!
//! ## Checks
//!
//! - Presence: `required`, `optional`
//! - Type: `as_alphabetic`, `as_alphanumeric`, `as_numeric`, `as_integer`,
//!   `as_float`, `as_email`, `as_mobile`, `as_date`
//! - Length: `equal_length`, `min_length`, `max_length`
//! - Range: `min_value`, `max_value`
//! - Substring: `starts_with`, `ends_with`
//! - Sanitization: `strip_markup`, `remove_escapes`, `escape_html`, `sanitize`
//!
//! ## Error Format
//!
//! Callers that gather failures across a form can collect them in
//! [`ValidationErrors`], which serializes to:
//!
//! ```json
//! {
//!   "error": {
//!     "type": "validation_error",
//!     "message": "Validation failed",
//!     "fields": [
//!       {"field": "Mobile", "code": "invalid_format", "message": "Mobile invalid."}
//!     ]
//!   }
//! }
//! ```

pub mod config;
pub mod date;
pub mod email;
mod error;
pub mod mobile;
pub mod numeric;
pub mod sanitize;
mod source;
mod validator;
mod value;

pub use config::{EmptyPolicy, ValidatorConfig};
pub use error::{ErrorKind, FieldError, FormError, ValidationErrors};
pub use sanitize::QuoteMode;
pub use source::KeyedSource;
pub use validator::{ValueKind, ValueValidator};
pub use value::Value;

/// Re-exported so callers can name zones for `as_date_in`.
pub use chrono_tz::Tz;

/// Prelude module for validation
pub mod prelude {
    pub use crate::config::{EmptyPolicy, ValidatorConfig};
    pub use crate::error::{ErrorKind, FieldError, FormError, ValidationErrors};
    pub use crate::source::KeyedSource;
    pub use crate::validator::{ValueKind, ValueValidator};
    pub use crate::value::Value;
    pub use chrono_tz::Tz;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_to_json() {
        let mut errors = ValidationErrors::new();
        errors.collect::<Value>(
            ValueValidator::new()
                .label("Email")
                .value("nope")
                .as_email()
                .map(|v| v.validate().unwrap_or(Value::from(""))),
        );
        errors.collect::<Value>(
            ValueValidator::new()
                .label("Age")
                .value("abc")
                .as_integer()
                .map(|v| v.validate().unwrap_or(Value::Integer(0))),
        );

        let json = serde_json::to_string_pretty(&errors).unwrap();
        assert!(json.contains("validation_error"));
        assert!(json.contains("Email invalid."));
        assert!(json.contains("Age must be numeric."));
    }
}
