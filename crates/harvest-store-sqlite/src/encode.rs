//! Encoding and decoding helpers between [`ItemRow`] and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Everything else maps directly
//! onto a SQLite integer or text value.

use chrono::{DateTime, Utc};
use harvest_core::ItemRow;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from one item row.
pub struct RawRow {
  pub id:          Option<i64>,
  pub kind:        Option<String>,
  pub by:          Option<String>,
  pub url:         Option<String>,
  pub title:       Option<String>,
  pub text:        Option<String>,
  pub score:       Option<i64>,
  pub time:        Option<String>,
  pub parent:      Option<i64>,
  pub deleted:     bool,
  pub dead:        bool,
  pub descendants: Option<i64>,
  pub ranking:     Option<i64>,
  pub kids:        Option<String>,
  pub parts:       Option<String>,
}

impl RawRow {
  /// Columns are expected in [`harvest_core::row::COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      kind:        row.get(1)?,
      by:          row.get(2)?,
      url:         row.get(3)?,
      title:       row.get(4)?,
      text:        row.get(5)?,
      score:       row.get(6)?,
      time:        row.get(7)?,
      parent:      row.get(8)?,
      deleted:     row.get(9)?,
      dead:        row.get(10)?,
      descendants: row.get(11)?,
      ranking:     row.get(12)?,
      kids:        row.get(13)?,
      parts:       row.get(14)?,
    })
  }

  pub fn into_item_row(self) -> Result<ItemRow> {
    let time = self.time.as_deref().map(decode_dt).transpose()?;
    Ok(ItemRow {
      id: self.id,
      kind: self.kind,
      by: self.by,
      url: self.url,
      title: self.title,
      text: self.text,
      score: self.score,
      time,
      parent: self.parent,
      deleted: self.deleted,
      dead: self.dead,
      descendants: self.descendants,
      ranking: self.ranking,
      kids: self.kids,
      parts: self.parts,
    })
  }
}
