//! Field validators.
//!
//! Validators are written as strings in field definitions: `required`,
//! `numeric`, `email`, `maxlength:<n>`, `minlength:<n>`. Only `required`
//! rejects an empty value; every other validator passes on empty input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Validator {
    Required,
    Numeric,
    Email,
    MaxLength(usize),
    MinLength(usize),
}

impl Validator {
    /// Returns true if `value` satisfies this validator.
    pub fn check(&self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return !matches!(self, Validator::Required);
        }
        match self {
            Validator::Required => true,
            Validator::Numeric => value.parse::<f64>().is_ok_and(|n| n.is_finite()),
            Validator::Email => is_email(value),
            Validator::MaxLength(max) => value.chars().count() <= *max,
            Validator::MinLength(min) => value.chars().count() >= *min,
        }
    }

    /// Short name stored against a failing field.
    pub fn name(&self) -> &'static str {
        match self {
            Validator::Required => "required",
            Validator::Numeric => "numeric",
            Validator::Email => "email",
            Validator::MaxLength(_) => "maxlength",
            Validator::MinLength(_) => "minlength",
        }
    }
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    }
}

impl FromStr for Validator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };
        let length = |arg: Option<&str>| -> Result<usize, String> {
            arg.ok_or_else(|| format!("validator {:?} needs a length", name))?
                .parse()
                .map_err(|_| format!("validator {:?} has an invalid length", s))
        };

        match name {
            "required" => Ok(Validator::Required),
            "numeric" => Ok(Validator::Numeric),
            "email" => Ok(Validator::Email),
            "maxlength" => Ok(Validator::MaxLength(length(arg)?)),
            "minlength" => Ok(Validator::MinLength(length(arg)?)),
            other => Err(format!("unknown validator {:?}", other)),
        }
    }
}

impl TryFrom<String> for Validator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::MaxLength(n) | Validator::MinLength(n) => write!(f, "{}:{}", self.name(), n),
            _ => f.write_str(self.name()),
        }
    }
}

impl From<Validator> for String {
    fn from(validator: Validator) -> Self {
        validator.to_string()
    }
}
