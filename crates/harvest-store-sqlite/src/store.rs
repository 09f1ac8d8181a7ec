//! [`SqliteStore`] — the SQLite implementation of [`ItemStore`].

use std::{path::Path, sync::Arc};

use harvest_core::{
  ItemRow, QueryError, StoreError, TableName, store::ItemStore,
};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Error, Result,
  encode::{RawRow, encode_dt},
  schema,
};

// ─── Statements ──────────────────────────────────────────────────────────────

/// SQL text rendered once for the configured table.
struct Statements {
  count_by_id:  String,
  insert_row:   String,
  select_by_id: String,
  count_all:    String,
}

impl Statements {
  fn new(table: &TableName) -> Self {
    Self {
      count_by_id:  schema::count_by_id(table),
      insert_row:   schema::insert_row(table),
      select_by_id: schema::select_by_id(table),
      count_all:    schema::count_all(table),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An item table in a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and every
/// clone talks to the same database.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  table: TableName,
  sql:   Arc<Statements>,
}

impl SqliteStore {
  /// Open (or create) a database at `path` and make sure `table` exists.
  pub async fn open(path: impl AsRef<Path>, table: TableName) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, table).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(table: TableName) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, table).await
  }

  async fn init(conn: tokio_rusqlite::Connection, table: TableName) -> Result<Self> {
    let ddl = schema::create_table(&table);
    conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    debug!(%table, "item table ready");

    let sql = Arc::new(Statements::new(&table));
    Ok(Self { conn, table, sql })
  }

  pub fn table(&self) -> &TableName { &self.table }

  /// Number of rows with `id`; `0` or `1` given the primary key.
  async fn count_id(&self, id: i64) -> Result<i64> {
    let sql = Arc::clone(&self.sql);
    let count = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql.count_by_id)?;
        Ok(stmt.query_row(rusqlite::params![id], |r| r.get(0))?)
      })
      .await?;
    Ok(count)
  }

  /// Insert `row`. Returns `false` when a row with the same id is already
  /// stored.
  async fn insert_row(&self, row: ItemRow) -> Result<bool> {
    let id = row.id.ok_or(Error::MissingId)?;
    let time = row.time.map(encode_dt);
    let sql = Arc::clone(&self.sql);

    let inserted = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql.insert_row)?;
        let result = stmt.execute(rusqlite::params![
          id,
          row.kind,
          row.by,
          row.url,
          row.title,
          row.text,
          row.score,
          time,
          row.parent,
          row.deleted,
          row.dead,
          row.descendants,
          row.ranking,
          row.kids,
          row.parts,
        ]);
        match result {
          Ok(_) => Ok(true),
          Err(e) if is_unique_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    Ok(inserted)
  }

  /// Read back one stored row.
  pub async fn get(&self, id: i64) -> Result<Option<ItemRow>> {
    let sql = Arc::clone(&self.sql);
    let raw: Option<RawRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql.select_by_id)?;
        Ok(
          stmt
            .query_row(rusqlite::params![id], RawRow::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRow::into_item_row).transpose()
  }

  /// Total number of stored rows.
  pub async fn count(&self) -> Result<u64> {
    let sql = Arc::clone(&self.sql);
    let count: i64 = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql.count_all)?;
        Ok(stmt.query_row([], |r| r.get(0))?)
      })
      .await?;
    Ok(count.max(0) as u64)
  }
}

/// Primary-key and unique-index violations; `INTEGER PRIMARY KEY` reports the
/// former.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        || f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteStore {
  async fn exists(&self, id: i64) -> Result<bool, QueryError> {
    Ok(self.count_id(id).await? != 0)
  }

  async fn insert(&self, row: ItemRow) -> Result<(), StoreError> {
    let id = row.id.unwrap_or_default();
    if self.insert_row(row).await? {
      Ok(())
    } else {
      Err(StoreError::Conflict(id))
    }
  }
}
