//! The item record as the remote API serves it.
//!
//! An item is transient: it is decoded from one response, coerced into an
//! [`ItemRow`](crate::row::ItemRow), and persisted once. It is never updated.
//!
//! The feed uses the zero value of a field to mean "unset", and omits or
//! nulls fields freely. Decoding therefore defaults every field except `id`,
//! and maps an explicit JSON `null` to the same zero value as a missing key.

use serde::{Deserialize, Deserializer, de};

use crate::coerce;

/// One record of the remote feed, keyed by its numeric id.
///
/// Field names follow this crate; the `serde` renames map them onto the wire
/// names of the feed (`type`, `by`, `time`, `parent`, `descendants`, `kids`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Item {
  pub id:               i64,
  /// Open set: story, comment, job, poll, pollopt, ...
  #[serde(rename = "type", deserialize_with = "null_as_default")]
  pub kind:             String,
  #[serde(rename = "by", deserialize_with = "null_as_default")]
  pub author:           String,
  #[serde(deserialize_with = "null_as_default")]
  pub url:              String,
  #[serde(deserialize_with = "null_as_default")]
  pub title:            String,
  #[serde(deserialize_with = "null_as_default")]
  pub text:             String,
  #[serde(deserialize_with = "null_as_default")]
  pub score:            i64,
  /// Unix seconds.
  #[serde(rename = "time", deserialize_with = "null_as_default")]
  pub created_at:       i64,
  #[serde(rename = "parent", deserialize_with = "null_as_default")]
  pub parent_id:        i64,
  #[serde(deserialize_with = "null_as_default")]
  pub deleted:          bool,
  #[serde(deserialize_with = "null_as_default")]
  pub dead:             bool,
  #[serde(rename = "descendants", deserialize_with = "null_as_default")]
  pub descendant_count: i64,
  /// Reserved by the table schema; the feed never sets it.
  #[serde(deserialize_with = "null_as_default")]
  pub ranking:          i64,
  #[serde(rename = "kids", deserialize_with = "null_as_default")]
  pub child_ids:        Vec<i64>,
  #[serde(deserialize_with = "string_or_id_list")]
  pub parts:            String,
}

impl Item {
  /// Decode a response body. The feed answers `null` for ids it does not
  /// know; that, and a record without an id, decode to `None`.
  pub fn from_json(body: &[u8]) -> serde_json::Result<Option<Self>> {
    let item: Option<Self> = serde_json::from_slice(body)?;
    Ok(item.filter(|item| item.id != 0))
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `parts` is a string column, but polls send it as an array of pollopt ids.
/// Arrays are joined the same way `kids` is.
fn string_or_id_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Parts {
    Text(String),
    Ids(Vec<i64>),
  }

  match Option::<Parts>::deserialize(deserializer) {
    Ok(None) => Ok(String::new()),
    Ok(Some(Parts::Text(s))) => Ok(s),
    Ok(Some(Parts::Ids(ids))) => Ok(coerce::id_list(&ids).unwrap_or_default()),
    Err(_) => Err(de::Error::custom(
      "expected `parts` to be a string or an array of integer ids",
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_story_with_wire_names() {
    let body = br#"{
      "by": "dhouston", "descendants": 71, "id": 8863,
      "kids": [8952, 9224], "score": 111, "time": 1175714200,
      "title": "My YC app: Dropbox", "type": "story",
      "url": "http://www.getdropbox.com/u/2/screencast.html"
    }"#;

    let item = Item::from_json(body).unwrap().unwrap();
    assert_eq!(item.id, 8863);
    assert_eq!(item.kind, "story");
    assert_eq!(item.author, "dhouston");
    assert_eq!(item.descendant_count, 71);
    assert_eq!(item.child_ids, vec![8952, 9224]);
    assert_eq!(item.created_at, 1175714200);
    assert_eq!(item.text, "");
    assert!(!item.deleted);
  }

  #[test]
  fn null_body_is_no_item() {
    assert_eq!(Item::from_json(b"null").unwrap(), None);
  }

  #[test]
  fn zero_id_is_no_item() {
    assert_eq!(Item::from_json(b"{}").unwrap(), None);
    assert_eq!(Item::from_json(br#"{"id": 0, "type": "story"}"#).unwrap(), None);
  }

  #[test]
  fn explicit_nulls_decode_to_zero_values() {
    let body = br#"{"id": 5, "by": null, "score": null, "kids": null, "dead": null}"#;
    let item = Item::from_json(body).unwrap().unwrap();
    assert_eq!(item.author, "");
    assert_eq!(item.score, 0);
    assert!(item.child_ids.is_empty());
    assert!(!item.dead);
  }

  #[test]
  fn parts_accepts_string_or_ids() {
    let poll = br#"{"id": 126809, "type": "poll", "parts": [126810, 126811]}"#;
    let item = Item::from_json(poll).unwrap().unwrap();
    assert_eq!(item.parts, "126810,126811");

    let text = br#"{"id": 7, "parts": "a,b"}"#;
    assert_eq!(Item::from_json(text).unwrap().unwrap().parts, "a,b");
  }

  #[test]
  fn unknown_fields_are_ignored() {
    let body = br#"{"id": 160705, "type": "pollopt", "poll": 160704, "score": 335}"#;
    let item = Item::from_json(body).unwrap().unwrap();
    assert_eq!(item.kind, "pollopt");
    assert_eq!(item.score, 335);
  }

  #[test]
  fn wrong_shape_is_an_error() {
    assert!(Item::from_json(b"[1, 2, 3]").is_err());
    assert!(Item::from_json(br#"{"id": "eight"}"#).is_err());
    assert!(Item::from_json(br#"{"id": 1, "parts": {"x": 1}}"#).is_err());
  }
}
