//! Field coercion: raw feed values to nullable column values.
//!
//! The feed encodes "unset" as the zero value of a field. Every function here
//! maps that zero value to `None` and anything else to `Some`. A genuine zero
//! (a score of 0, a timestamp of exactly the epoch) is therefore stored as
//! NULL; that is the feed's own convention and is kept as is.
//!
//! All functions are total and pure.

use chrono::{DateTime, Utc};

/// Present iff non-empty.
pub fn text(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_owned())
}

/// Present iff non-zero.
pub fn int(value: i64) -> Option<i64> { (value != 0).then_some(value) }

/// Unix seconds to a UTC instant. Zero is absent, not the epoch. Values
/// outside chrono's representable range are absent as well.
pub fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
  if secs == 0 {
    return None;
  }
  DateTime::from_timestamp(secs, 0)
}

/// Comma-joined ids, e.g. `[4, 5, 6]` to `"4,5,6"`. An empty list is absent,
/// never the empty string.
pub fn id_list(ids: &[i64]) -> Option<String> {
  if ids.is_empty() {
    return None;
  }
  let joined = ids
    .iter()
    .map(i64::to_string)
    .collect::<Vec<_>>()
    .join(",");
  Some(joined)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_present_iff_non_empty() {
    assert_eq!(text(""), None);
    assert_eq!(text("pg"), Some("pg".to_owned()));
    assert_eq!(text(" "), Some(" ".to_owned()));
  }

  #[test]
  fn int_present_iff_non_zero() {
    assert_eq!(int(0), None);
    for v in [1, -1, 5, i64::MIN, i64::MAX] {
      assert_eq!(int(v), Some(v), "value {v}");
    }
  }

  #[test]
  fn zero_timestamp_is_absent_not_epoch() {
    assert_eq!(timestamp(0), None);
  }

  #[test]
  fn timestamp_converts_unix_seconds() {
    let ts = timestamp(1_175_714_200).unwrap();
    assert_eq!(ts.to_rfc3339(), "2007-04-04T19:16:40+00:00");

    let before_epoch = timestamp(-1).unwrap();
    assert_eq!(before_epoch.timestamp(), -1);
  }

  #[test]
  fn out_of_range_timestamp_is_absent() {
    assert_eq!(timestamp(i64::MAX), None);
    assert_eq!(timestamp(i64::MIN), None);
  }

  #[test]
  fn id_list_joins_with_commas() {
    assert_eq!(id_list(&[4, 5, 6]), Some("4,5,6".to_owned()));
    assert_eq!(id_list(&[42]), Some("42".to_owned()));
  }

  #[test]
  fn empty_id_list_is_absent() {
    assert_eq!(id_list(&[]), None);
  }
}
