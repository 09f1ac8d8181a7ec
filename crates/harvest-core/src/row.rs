//! [`ItemRow`] — an [`Item`] after coercion, one value per table column.

use chrono::{DateTime, Utc};

use crate::{coerce, item::Item};

/// Table columns in insert order. The parameter positions of every insert
/// statement follow this order.
pub const COLUMNS: [&str; 15] = [
  "id",
  "type",
  "by",
  "url",
  "title",
  "text",
  "score",
  "time",
  "parent",
  "deleted",
  "dead",
  "descendants",
  "ranking",
  "kids",
  "parts",
];

/// The nullable column values for one item, in [`COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
  pub id:          Option<i64>,
  pub kind:        Option<String>,
  pub by:          Option<String>,
  pub url:         Option<String>,
  pub title:       Option<String>,
  pub text:        Option<String>,
  pub score:       Option<i64>,
  pub time:        Option<DateTime<Utc>>,
  pub parent:      Option<i64>,
  pub deleted:     bool,
  pub dead:        bool,
  pub descendants: Option<i64>,
  pub ranking:     Option<i64>,
  pub kids:        Option<String>,
  pub parts:       Option<String>,
}

impl From<&Item> for ItemRow {
  fn from(item: &Item) -> Self {
    Self {
      id:          coerce::int(item.id),
      kind:        coerce::text(&item.kind),
      by:          coerce::text(&item.author),
      url:         coerce::text(&item.url),
      title:       coerce::text(&item.title),
      text:        coerce::text(&item.text),
      score:       coerce::int(item.score),
      time:        coerce::timestamp(item.created_at),
      parent:      coerce::int(item.parent_id),
      deleted:     item.deleted,
      dead:        item.dead,
      descendants: coerce::int(item.descendant_count),
      ranking:     coerce::int(item.ranking),
      kids:        coerce::id_list(&item.child_ids),
      parts:       coerce::text(&item.parts),
    }
  }
}
