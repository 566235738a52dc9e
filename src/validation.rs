//! Declarative field validation.
//!
//! Each request type lists its fields in declaration order together with the
//! rules that apply to them. [`validate`] walks that table and stops at the
//! first violation, reporting it as `"<field> <reason>"`.

use thiserror::Error;
use uuid::Uuid;
use validator::{ValidateEmail, ValidateUrl};

use crate::error::AppError;

/// A single constraint on a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty string, non-zero number, non-nil id
    Required,
    /// Lower bound: character count for text, value for numbers
    Min(i64),
    /// Upper bound: character count for text, value for numbers
    Max(i64),
    Email,
    Url,
    UuidV4,
    OneOf(&'static [&'static str]),
    /// A rule the validator cannot evaluate; always reported with the generic message
    Unsupported(&'static str),
}

/// Borrowed view of a field value
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Text(&'a str),
    Int(i64),
    Id(Uuid),
    /// Optional field that was not supplied; no rule applies
    Absent,
}

/// One row of a rule table
#[derive(Debug)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: Value<'a>,
    pub rules: &'static [Rule],
}

impl<'a> Field<'a> {
    pub fn text(name: &'static str, value: &'a str, rules: &'static [Rule]) -> Self {
        Self { name, value: Value::Text(value), rules }
    }

    pub fn optional_text(name: &'static str, value: Option<&'a str>, rules: &'static [Rule]) -> Self {
        Self {
            name,
            value: value.map(Value::Text).unwrap_or(Value::Absent),
            rules,
        }
    }

    pub fn int(name: &'static str, value: i64, rules: &'static [Rule]) -> Self {
        Self { name, value: Value::Int(value), rules }
    }

    pub fn optional_int(name: &'static str, value: Option<i64>, rules: &'static [Rule]) -> Self {
        Self {
            name,
            value: value.map(Value::Int).unwrap_or(Value::Absent),
            rules,
        }
    }

    pub fn id(name: &'static str, value: Uuid, rules: &'static [Rule]) -> Self {
        Self { name, value: Value::Id(value), rules }
    }
}

/// Types that expose a validation rule table
pub trait FieldRules {
    /// Fields in declaration order
    fn fields(&self) -> Vec<Field<'_>>;
}

/// First violated rule of a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.message)
    }
}

/// Validate a record against its rule table, reporting only the first failure
pub fn validate<T: FieldRules + ?Sized>(record: &T) -> Result<(), ValidationError> {
    for field in record.fields() {
        if let Value::Absent = field.value {
            continue;
        }

        for rule in field.rules {
            if let Some(message) = check(rule, &field) {
                return Err(ValidationError {
                    field: field.name,
                    message,
                });
            }
        }
    }

    Ok(())
}

enum Outcome {
    Pass,
    Fail(String),
    /// Rule does not apply to this kind of value
    Malformed,
}

fn check(rule: &Rule, field: &Field<'_>) -> Option<String> {
    let outcome = match (rule, field.value) {
        (_, Value::Absent) => Outcome::Pass,

        (Rule::Required, Value::Text(s)) => fail_if(s.is_empty(), "is required".to_string()),
        (Rule::Required, Value::Int(v)) => fail_if(v == 0, "is required".to_string()),
        (Rule::Required, Value::Id(id)) => fail_if(id.is_nil(), "is required".to_string()),

        (Rule::Min(n), Value::Text(s)) => fail_if(
            (s.chars().count() as i64) < *n,
            format!("must be greater than or equal to {}", n),
        ),
        (Rule::Min(n), Value::Int(v)) => {
            fail_if(v < *n, format!("must be greater than or equal to {}", n))
        }
        (Rule::Max(n), Value::Text(s)) => fail_if(
            (s.chars().count() as i64) > *n,
            format!("must be less than or equal to {}", n),
        ),
        (Rule::Max(n), Value::Int(v)) => {
            fail_if(v > *n, format!("must be less than or equal to {}", n))
        }

        (Rule::Email, Value::Text(s)) => {
            fail_if(!s.is_empty() && !s.validate_email(), "is an invalid email".to_string())
        }
        (Rule::Url, Value::Text(s)) => {
            fail_if(!s.is_empty() && !s.validate_url(), "is an invalid URL".to_string())
        }
        (Rule::UuidV4, Value::Text(s)) => fail_if(
            !s.is_empty() && !is_uuid_v4(s),
            "must be a valid UUIDv4".to_string(),
        ),
        (Rule::UuidV4, Value::Id(id)) => fail_if(
            !id.is_nil() && id.get_version_num() != 4,
            "must be a valid UUIDv4".to_string(),
        ),
        (Rule::OneOf(options), Value::Text(s)) => fail_if(
            !s.is_empty() && !options.iter().any(|o| *o == s),
            format!("must be one of: {}", options.join(" ")),
        ),
        (Rule::OneOf(options), Value::Int(v)) => fail_if(
            !options.iter().any(|o| *o == v.to_string()),
            format!("must be one of: {}", options.join(" ")),
        ),

        _ => Outcome::Malformed,
    };

    match outcome {
        Outcome::Pass => None,
        Outcome::Fail(reason) => Some(format!("{} {}", field.name, reason)),
        Outcome::Malformed => Some(format!("Validation error for field: {}", field.name)),
    }
}

fn fail_if(condition: bool, reason: String) -> Outcome {
    if condition {
        Outcome::Fail(reason)
    } else {
        Outcome::Pass
    }
}

/// Canonical lowercase hyphenated form only, version 4 with the RFC 4122 variant
fn is_uuid_v4(s: &str) -> bool {
    let canonical = s.len() == 36
        && s.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => matches!(c, '0'..='9' | 'a'..='f'),
        });
    if !canonical {
        return false;
    }

    Uuid::parse_str(s)
        .map(|id| id.get_version_num() == 4 && id.get_variant() == uuid::Variant::RFC4122)
        .unwrap_or(false)
}
