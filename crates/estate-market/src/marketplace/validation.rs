use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// Single failed field check, surfaced to API clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-level detail carried by `MarketplaceError::Validation`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::default();
        report.push(field, message);
        report
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Records a failure unless one is already present for `field`.
    pub fn require_not_blank(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() && !self.has_field(field) {
            self.push(field, message);
        }
    }

    /// Like `require_not_blank` but counts characters after trimming.
    pub fn require_min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min && !self.has_field(field) {
            self.push(field, message);
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let mut report = Self::default();
        for (field, failures) in errors.field_errors() {
            for failure in failures.iter() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                report.push(camel_case(&field), message);
            }
        }
        report.errors.sort_by(|a, b| a.field.cmp(&b.field));
        report
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|error| error.field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

/// Wire payloads use camelCase keys; report fields the same way.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Runs derive-based checks and converts failures into a report.
pub fn validate<T: Validate>(input: &T) -> Result<(), ValidationReport> {
    input.validate().map_err(ValidationReport::from)
}
