use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension};

use super::RecordStore;
use crate::db::{get_connection, get_metadata, init_db, set_metadata};
use crate::error::Result;
use crate::models::Record;

pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    pub fn open(path: &Path, key: Option<&str>) -> Result<Self> {
        let conn = get_connection(path, key)?;
        init_db(&conn)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn set_owner(&self, owner: &str) -> Result<()> {
        set_metadata(&self.conn, "owner", owner)
    }
}

impl RecordStore for SqliteStore {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn owner(&self) -> Option<String> {
        get_metadata(&self.conn, "owner")
    }

    fn records(&self) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT category, amount, date FROM expenses ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Record {
                    category: row.get(0)?,
                    amount: row.get(1)?,
                    date: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn append(&mut self, records: &[Record]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO expenses (category, amount, date) VALUES (?1, ?2, ?3)")?;
            for record in records {
                stmt.execute(rusqlite::params![record.category, record.amount, record.date])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_at(&mut self, position: usize) -> Result<Option<Record>> {
        let Ok(offset) = i64::try_from(position) else {
            return Ok(None);
        };
        let target = self
            .conn
            .query_row(
                "SELECT id, category, amount, date FROM expenses ORDER BY id ASC LIMIT 1 OFFSET ?1",
                [offset],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        Record {
                            category: row.get(1)?,
                            amount: row.get(2)?,
                            date: row.get(3)?,
                        },
                    ))
                },
            )
            .optional()?;

        let Some((id, record)) = target else {
            return Ok(None);
        };
        self.conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
        Ok(Some(record))
    }

    fn is_empty(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT count(*) FROM expenses", [], |r| r.get(0))?;
        Ok(count == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordDate;

    fn test_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db"), None).unwrap();
        (dir, store)
    }

    fn day(d: u32) -> RecordDate {
        RecordDate::Known(chrono::NaiveDate::from_ymd_opt(2025, 1, d).unwrap())
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let (_dir, mut store) = test_store();
        store
            .append(&[Record::new("Food", 1500, day(2)), Record::new("Transport", 300, day(1))])
            .unwrap();
        store.append(&[Record::new("Rent", 90000, RecordDate::Unknown)]).unwrap();
        let rows = store.records().unwrap();
        let cats: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(cats, vec!["Food", "Transport", "Rent"]);
        assert_eq!(rows[2].date, RecordDate::Unknown);
        assert_eq!(rows[0].date, day(2));
    }

    #[test]
    fn test_append_is_all_or_nothing() {
        let (_dir, mut store) = test_store();
        let res = store.append(&[Record::new("Food", 10, day(1)), Record::new("Bad", 0, day(1))]);
        assert!(res.is_err());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_remove_at_uses_position_not_id() {
        let (_dir, mut store) = test_store();
        store
            .append(&[
                Record::new("A", 1, day(1)),
                Record::new("B", 2, day(1)),
                Record::new("C", 3, day(1)),
            ])
            .unwrap();
        // ids are now 1..=3; after removing A, position 0 is B (id 2)
        assert_eq!(store.remove_at(0).unwrap().unwrap().category, "A");
        assert_eq!(store.remove_at(0).unwrap().unwrap().category, "B");
        let rows = store.records().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "C");
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let (_dir, mut store) = test_store();
        store.append(&[Record::new("A", 1, day(1))]).unwrap();
        assert!(store.remove_at(1).unwrap().is_none());
        assert!(store.remove_at(usize::MAX).unwrap().is_none());
        assert_eq!(store.records().unwrap().len(), 1);
    }

    #[test]
    fn test_owner_metadata() {
        let (_dir, store) = test_store();
        assert_eq!(store.owner(), None);
        store.set_owner("aigerim").unwrap();
        assert_eq!(store.owner().as_deref(), Some("aigerim"));
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.db");
        {
            let mut store = SqliteStore::open(&path, Some("right")).unwrap();
            store.append(&[Record::new("A", 1, day(1))]).unwrap();
        }
        assert!(SqliteStore::open(&path, Some("wrong")).is_err());
        let store = SqliteStore::open(&path, Some("right")).unwrap();
        assert_eq!(store.records().unwrap().len(), 1);
    }
}
