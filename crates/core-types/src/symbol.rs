use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized ticker symbol. Always uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let normalized = Self::normalize(input);
        if normalized.is_empty() {
            return Err(CoreError::InvalidArgument("Symbol must not be empty".to_string()));
        }

        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(CoreError::InvalidArgument(format!(
                "Symbol '{}' is {} characters long, maximum is {}",
                normalized, len, MAX_SYMBOL_LEN
            )));
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphabetic() {
                return Err(CoreError::InvalidArgument(format!(
                    "Symbol '{}' must start with a letter",
                    normalized
                )));
            }
        }

        if let Some(ch) = normalized
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '.' || *ch == '-'))
        {
            return Err(CoreError::InvalidArgument(format!(
                "Symbol '{}' contains invalid character '{}'",
                normalized, ch
            )));
        }

        Ok(Self(normalized))
    }

    /// The lookup key for arbitrary caller input. Never fails.
    pub fn normalize(input: &str) -> String {
        input.trim().to_ascii_uppercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
