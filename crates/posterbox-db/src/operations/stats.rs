//! Database statistics operations.

use crate::database::Database;
use crate::error::DbResult;
use chrono::{DateTime, Utc};
use posterbox_core::DatabaseStats;

impl Database {
    /// Get summary statistics for the poster store.
    pub fn get_stats(&self) -> DbResult<DatabaseStats> {
        let conn = self.conn()?;

        let total_posters: i64 =
            conn.query_row("SELECT COUNT(*) FROM posters", [], |row| row.get(0))?;

        let untagged_posters: i64 = conn.query_row(
            "SELECT COUNT(*) FROM posters p
             WHERE NOT EXISTS (SELECT 1 FROM poster_tags pt WHERE pt.poster_id = p.id)",
            [],
            |row| row.get(0),
        )?;

        let total_tags: i64 = conn.query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))?;

        let total_links: i64 =
            conn.query_row("SELECT COUNT(*) FROM poster_tags", [], |row| row.get(0))?;

        let latest: Option<String> =
            conn.query_row("SELECT MAX(date_received) FROM posters", [], |row| row.get(0))?;
        let latest_received = latest.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        drop(conn);

        Ok(DatabaseStats {
            total_posters,
            untagged_posters,
            total_tags,
            total_links,
            latest_received,
            database_size_bytes: self.file_size()?,
        })
    }
}
