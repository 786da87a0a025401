//! Tag operations and poster/tag linkage.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use posterbox_core::{PosterId, Tag, TagId};
use rusqlite::{params, OptionalExtension, TransactionBehavior};

impl Database {
    /// Get a tag by name.
    pub fn get_tag_by_name(&self, name: &str) -> DbResult<Option<Tag>> {
        let conn = self.conn()?;
        let tag = conn
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(tag)
    }

    /// Look a tag up by name, creating it if absent.
    ///
    /// Lookup and insert run inside one immediate transaction, so the
    /// unique-name invariant holds even if another connection races us.
    pub fn get_or_create_tag(&self, name: &str) -> DbResult<TagId> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<TagId> = tx
            .query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?;

        let id = match existing {
            Some(id) => id,
            None => {
                tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![name])?;
                tx.query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| {
                    row.get(0)
                })?
            }
        };

        tx.commit()?;
        Ok(id)
    }

    /// Link a tag to a poster. Returns `false` when the pair already existed.
    pub fn link_poster_tag(&self, poster_id: PosterId, tag_id: TagId) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "INSERT OR IGNORE INTO poster_tags (poster_id, tag_id) VALUES (?1, ?2)",
            params![poster_id, tag_id],
        )?;
        Ok(rows > 0)
    }

    /// List all tags.
    pub fn list_tags(&self) -> DbResult<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM tags ORDER BY name")?;

        let tags = stmt.query_map([], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        tags.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Get tag usage counts, most used first.
    pub fn get_tag_counts(&self) -> DbResult<Vec<(Tag, i64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, COUNT(pt.poster_id) as count
             FROM tags t
             LEFT JOIN poster_tags pt ON pt.tag_id = t.id
             GROUP BY t.id
             ORDER BY count DESC, t.name",
        )?;

        let results = stmt.query_map([], |row| {
            let tag = Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            };
            let count: i64 = row.get(2)?;
            Ok((tag, count))
        })?;

        results.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn count(db: &Database, table: &str) -> i64 {
        let conn = db.conn().unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_get_or_create_tag_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        let first = db.get_or_create_tag("Austin").unwrap();
        let second = db.get_or_create_tag("Austin").unwrap();

        assert_eq!(first, second);
        assert_eq!(count(&db, "tags"), 1);
    }

    #[test]
    fn test_tag_names_are_case_sensitive() {
        let db = Database::open_in_memory().unwrap();

        let upper = db.get_or_create_tag("Austin").unwrap();
        let lower = db.get_or_create_tag("austin").unwrap();

        assert_ne!(upper, lower);
        assert_eq!(db.list_tags().unwrap().len(), 2);
    }

    #[test]
    fn test_get_tag_by_name() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_tag_by_name("Austin").unwrap().is_none());

        let id = db.get_or_create_tag("Austin").unwrap();
        let tag = db.get_tag_by_name("Austin").unwrap().unwrap();
        assert_eq!(tag.id, id);
        assert_eq!(tag.name, "Austin");
    }

    #[test]
    fn test_link_poster_tag_ignores_duplicates() {
        let db = Database::open_in_memory().unwrap();
        let poster = db.insert_poster("event.png", "Jazz Festival in Austin", Utc::now()).unwrap();
        let tag = db.get_or_create_tag("Austin").unwrap();

        assert!(db.link_poster_tag(poster, tag).unwrap());
        assert!(!db.link_poster_tag(poster, tag).unwrap());

        assert_eq!(count(&db, "poster_tags"), 1);
        let tags = db.get_poster_tags(poster).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Austin");
    }

    #[test]
    fn test_link_requires_existing_rows() {
        let db = Database::open_in_memory().unwrap();
        let tag = db.get_or_create_tag("Austin").unwrap();

        assert!(db.link_poster_tag(999, tag).is_err());

        let poster = db.insert_poster("event.png", "", Utc::now()).unwrap();
        assert!(db.link_poster_tag(poster, 999).is_err());
    }

    #[test]
    fn test_tag_counts() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        let first = db.insert_poster("a.png", "", now).unwrap();
        let second = db.insert_poster("b.png", "", now).unwrap();

        let austin = db.get_or_create_tag("Austin").unwrap();
        let moody = db.get_or_create_tag("Moody Theater").unwrap();
        db.get_or_create_tag("Unused").unwrap();

        db.link_poster_tag(first, austin).unwrap();
        db.link_poster_tag(second, austin).unwrap();
        db.link_poster_tag(second, moody).unwrap();

        let counts = db.get_tag_counts().unwrap();
        assert_eq!(counts[0].0.name, "Austin");
        assert_eq!(counts[0].1, 2);
        assert_eq!(counts[1].1, 1);
        assert_eq!(counts[2].0.name, "Unused");
        assert_eq!(counts[2].1, 0);

        assert_eq!(db.get_posters_by_tag(austin).unwrap(), vec![first, second]);
    }
}
