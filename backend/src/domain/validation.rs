//! Field-level validation helpers shared by entity schemas.
//!
//! Validators collect every violation instead of stopping at the first one so
//! clients can highlight all offending form fields in a single round trip.

use serde::Serialize;
use serde_json::json;

use super::Error;

/// Machine-readable reason attached to a field violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Required field absent or blank.
    Missing,
    /// Text longer than allowed.
    TooLong,
    /// Number outside the accepted interval.
    OutOfRange,
    /// Value does not follow the expected format.
    InvalidFormat,
    /// Value is not one of the accepted choices.
    InvalidChoice,
    /// Value is inconsistent with another field.
    Mismatch,
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field name as it appears in the payload.
    pub field: &'static str,
    /// Violation category.
    pub code: ViolationCode,
    /// Human-readable explanation.
    pub message: String,
}

/// Ordered collection of field violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Record a violation.
    pub fn push(&mut self, field: &'static str, code: ViolationCode, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            code,
            message: message.into(),
        });
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded violations in order.
    pub fn as_slice(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Names of the rejected fields.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|v| v.field)
    }

    /// Convert into the domain error returned to adapters.
    pub fn into_error(self, label: &str) -> Error {
        Error::validation_failed(format!("dados de {label} inválidos"))
            .with_details(json!({ "fields": self.0 }))
    }

    /// Trimmed required text of at most `max` characters.
    pub fn required_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        let Some(text) = non_blank(value) else {
            self.push(field, ViolationCode::Missing, format!("{field} é obrigatório"));
            return None;
        };
        self.bounded(field, text, max)
    }

    /// Trimmed optional text of at most `max` characters. Blank input is
    /// treated as absent.
    pub fn optional_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        non_blank(value).and_then(|text| self.bounded(field, text, max))
    }

    /// Required value that must be present before further checks.
    pub fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, ViolationCode::Missing, format!("{field} é obrigatório"));
        }
        value
    }

    fn bounded(&mut self, field: &'static str, text: String, max: usize) -> Option<String> {
        if text.chars().count() > max {
            self.push(
                field,
                ViolationCode::TooLong,
                format!("{field} deve ter no máximo {max} caracteres"),
            );
            return None;
        }
        Some(text)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
