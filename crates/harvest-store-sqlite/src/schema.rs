//! SQL text for the item table.
//!
//! The table name is spliced in as a quoted identifier; it has already passed
//! the [`TableName`] allow-list. Every column name is quoted as well, since
//! `type`, `by`, `text` and `time` are keywords in some dialects.

use harvest_core::{TableName, row::COLUMNS};

/// Table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`. An existing
/// table is used as is and never altered.
pub fn create_table(table: &TableName) -> String {
  format!(
    "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS \"{table}\" (
    \"id\"          INTEGER PRIMARY KEY,
    \"type\"        TEXT,
    \"by\"          TEXT,
    \"url\"         TEXT,
    \"title\"       TEXT,
    \"text\"        TEXT,
    \"score\"       INTEGER,
    \"time\"        TEXT,               -- RFC 3339 UTC
    \"parent\"      INTEGER,
    \"deleted\"     INTEGER NOT NULL DEFAULT 0,
    \"dead\"        INTEGER NOT NULL DEFAULT 0,
    \"descendants\" INTEGER,
    \"ranking\"     INTEGER,
    \"kids\"        TEXT,               -- comma-joined child ids
    \"parts\"       TEXT
);
"
  )
}

pub fn count_by_id(table: &TableName) -> String {
  format!("SELECT COUNT(*) FROM \"{table}\" WHERE \"id\" = ?1")
}

/// Fifteen positional parameters, in [`COLUMNS`] order.
pub fn insert_row(table: &TableName) -> String {
  let columns = quoted_columns();
  let params = (1..=COLUMNS.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!("INSERT INTO \"{table}\" ({columns}) VALUES ({params})")
}

pub fn select_by_id(table: &TableName) -> String {
  let columns = quoted_columns();
  format!("SELECT {columns} FROM \"{table}\" WHERE \"id\" = ?1")
}

pub fn count_all(table: &TableName) -> String {
  format!("SELECT COUNT(*) FROM \"{table}\"")
}

fn quoted_columns() -> String {
  COLUMNS
    .iter()
    .map(|c| format!("\"{c}\""))
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insert_lists_fifteen_columns_in_order() {
    let sql = insert_row(&TableName::default());
    assert_eq!(
      sql,
      "INSERT INTO \"hacker_news_items\" (\"id\", \"type\", \"by\", \"url\", \
       \"title\", \"text\", \"score\", \"time\", \"parent\", \"deleted\", \
       \"dead\", \"descendants\", \"ranking\", \"kids\", \"parts\") VALUES \
       (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
    );
  }

  #[test]
  fn count_is_scoped_to_id() {
    let table = TableName::parse("items").unwrap();
    assert_eq!(
      count_by_id(&table),
      "SELECT COUNT(*) FROM \"items\" WHERE \"id\" = ?1"
    );
  }
}
