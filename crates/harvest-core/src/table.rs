//! [`TableName`] — a target table name that is safe to splice into SQL.
//!
//! Table names cannot be bound as statement parameters, so they are checked
//! against an identifier allow-list once, at configuration time.

use std::{fmt, str::FromStr};

use crate::ConfigError;

const MAX_LEN: usize = 63;

/// Default target table.
pub const DEFAULT_TABLE: &str = "hacker_news_items";

/// A validated SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`, at most 63 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
  pub fn parse(name: &str) -> Result<Self, ConfigError> {
    if name.is_empty() {
      return Err(ConfigError::Missing("table"));
    }
    if name.len() > MAX_LEN {
      return Err(ConfigError::invalid(
        "table",
        format!("{name:?} is longer than {MAX_LEN} characters"),
      ));
    }

    let mut chars = name.chars();
    let head_ok = chars
      .next()
      .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !(head_ok && tail_ok) {
      return Err(ConfigError::invalid(
        "table",
        format!("{name:?} is not a plain identifier"),
      ));
    }

    Ok(Self(name.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for TableName {
  fn default() -> Self { Self(DEFAULT_TABLE.to_owned()) }
}

impl FromStr for TableName {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl fmt::Display for TableName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
