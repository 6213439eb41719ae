//! Input validation.
//!
//! Each request type implements [`Validate`] by listing its constraint
//! violations explicitly; serialization knows nothing about these rules.

use std::fmt;

use crate::error::ApiError;

/// A single constraint a field value can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub rule: Rule,
}

impl Violation {
    pub fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            Rule::Required => write!(f, "{} is required", self.field),
            Rule::MinLength(n) => write!(f, "{} must be at least {} characters", self.field, n),
            Rule::MaxLength(n) => write!(f, "{} must be at most {} characters", self.field, n),
        }
    }
}

pub trait Validate {
    /// Every constraint this value breaks, empty when valid.
    fn violations(&self) -> Vec<Violation>;

    fn validate(&self) -> Result<(), ApiError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(violations))
        }
    }
}

/// Checks a required string against inclusive length bounds, counted in
/// characters. Reports at most one violation per field, the first rule broken.
pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    out: &mut Vec<Violation>,
) {
    let len = value.chars().count();
    if len == 0 {
        out.push(Violation::new(field, Rule::Required));
    } else if len < min {
        out.push(Violation::new(field, Rule::MinLength(min)));
    } else if len > max {
        out.push(Violation::new(field, Rule::MaxLength(max)));
    }
}
