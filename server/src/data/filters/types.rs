//! Filter descriptor definitions
//!
//! A descriptor is one `field / operator / value` condition. Descriptors can
//! only be built through [`FilterDescriptor::new`], so any descriptor that
//! reaches the compiler has already passed validation.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Filter parsing and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Payload is not JSON, not an array of objects, or exceeds limits
    #[error("Invalid filters JSON: {0}")]
    Malformed(String),

    /// A single descriptor failed validation
    #[error("Invalid filter on field '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl FilterError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Closed set of filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    IsEmpty,
    GreaterThan,
    LessThan,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 7] = [
        Self::Contains,
        Self::Equals,
        Self::StartsWith,
        Self::EndsWith,
        Self::IsEmpty,
        Self::GreaterThan,
        Self::LessThan,
    ];

    /// Parse the wire form. Case-sensitive; the camelCase spelling is
    /// accepted alongside the human-readable one.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contains" => Some(Self::Contains),
            "equals" => Some(Self::Equals),
            "starts with" | "startsWith" => Some(Self::StartsWith),
            "ends with" | "endsWith" => Some(Self::EndsWith),
            "is empty" | "isEmpty" => Some(Self::IsEmpty),
            "greater than" | "greaterThan" => Some(Self::GreaterThan),
            "less than" | "lessThan" => Some(Self::LessThan),
            _ => None,
        }
    }

    /// Human-readable wire form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::Equals => "equals",
            Self::StartsWith => "starts with",
            Self::EndsWith => "ends with",
            Self::IsEmpty => "is empty",
            Self::GreaterThan => "greater than",
            Self::LessThan => "less than",
        }
    }

    /// Whether the operator binds a value parameter
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::IsEmpty)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape of one filter: `{ "field", "type", "value" }`
///
/// `value` may arrive as a string or a number; numbers are kept in their
/// JSON text form and compared with the store's native semantics.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawFilter {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl RawFilter {
    pub(super) fn into_descriptor(self) -> Result<FilterDescriptor, FilterError> {
        let operator = FilterOperator::parse(&self.kind).ok_or_else(|| {
            FilterError::invalid(&self.field, format!("unknown filter type '{}'", self.kind))
        })?;

        let value = match self.value {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                return Err(FilterError::invalid(
                    &self.field,
                    format!("value must be a string or number, got {}", other),
                ));
            }
        };

        FilterDescriptor::new(self.field, operator, value)
    }
}

/// One validated filter condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    field: String,
    operator: FilterOperator,
    value: Option<String>,
}

impl FilterDescriptor {
    /// Build and validate a descriptor
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: Option<String>,
    ) -> Result<Self, FilterError> {
        let descriptor = Self {
            field: field.into(),
            operator,
            value,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check field presence and value requirements. No type coercion.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.field.trim().is_empty() {
            return Err(FilterError::invalid(&self.field, "field must not be empty"));
        }

        if self.operator.takes_value()
            && self.value.as_deref().is_none_or(|v| v.trim().is_empty())
        {
            return Err(FilterError::invalid(
                &self.field,
                format!("a value is required for '{}'", self.operator),
            ));
        }

        Ok(())
    }

    /// Reject fields that are not columns of the dataset
    pub fn ensure_known_column<S: AsRef<str>>(&self, columns: &[S]) -> Result<(), FilterError> {
        if columns.iter().any(|c| c.as_ref() == self.field) {
            Ok(())
        } else {
            Err(FilterError::invalid(&self.field, "unknown column"))
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
