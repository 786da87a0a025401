//! Poster operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use posterbox_core::{Poster, PosterId, Tag, TagId};
use rusqlite::{params, Row};

impl Database {
    /// Insert a new poster and return its id. Posters are never deduplicated:
    /// every call creates a row.
    pub fn insert_poster(
        &self,
        image_path: &str,
        extracted_text: &str,
        date_received: DateTime<Utc>,
    ) -> DbResult<PosterId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO posters (image_path, extracted_text, date_received) VALUES (?1, ?2, ?3)",
            params![image_path, extracted_text, date_received.to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a poster by ID.
    pub fn get_poster(&self, id: PosterId) -> DbResult<Poster> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, image_path, extracted_text, date_received FROM posters WHERE id = ?1",
            params![id],
            row_to_poster,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Poster not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// List posters, newest first.
    pub fn list_posters(&self, limit: Option<i64>) -> DbResult<Vec<Poster>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, image_path, extracted_text, date_received
             FROM posters ORDER BY id DESC LIMIT ?1",
        )?;

        let posters = stmt.query_map(params![limit.unwrap_or(100)], row_to_poster)?;
        posters.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Get all tags linked to a poster.
    pub fn get_poster_tags(&self, poster_id: PosterId) -> DbResult<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name FROM tags t
             INNER JOIN poster_tags pt ON pt.tag_id = t.id
             WHERE pt.poster_id = ?1 ORDER BY t.name",
        )?;

        let tags = stmt.query_map(params![poster_id], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        tags.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Get the ids of all posters linked to a tag.
    pub fn get_posters_by_tag(&self, tag_id: TagId) -> DbResult<Vec<PosterId>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT poster_id FROM poster_tags WHERE tag_id = ?1 ORDER BY poster_id")?;

        let posters = stmt.query_map(params![tag_id], |row| row.get(0))?;
        posters.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn row_to_poster(row: &Row<'_>) -> rusqlite::Result<Poster> {
    let date_received_str: String = row.get(3)?;

    Ok(Poster {
        id: row.get(0)?,
        image_path: row.get(1)?,
        extracted_text: row.get(2)?,
        date_received: DateTime::parse_from_rfc3339(&date_received_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })?,
    })
}
