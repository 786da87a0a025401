//! Read side used by the publication export.

use crate::database::Database;
use crate::error::DbResult;
use posterbox_core::{PosterId, PosterRecord};
use rusqlite::params;

impl Database {
    /// Every poster with the names of its tags, ordered by poster id.
    /// Posters without tags carry an empty list.
    pub fn posters_with_tags(&self) -> DbResult<Vec<PosterRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.image_path, t.name
             FROM posters p
             LEFT JOIN poster_tags pt ON p.id = pt.poster_id
             LEFT JOIN tags t ON pt.tag_id = t.id
             ORDER BY p.id, t.name",
        )?;

        let rows = stmt.query_map(params![], |row| {
            let id: PosterId = row.get(0)?;
            let image_path: String = row.get(1)?;
            let tag: Option<String> = row.get(2)?;
            Ok((id, image_path, tag))
        })?;

        let mut records: Vec<PosterRecord> = Vec::new();
        for row in rows {
            let (id, image_path, tag) = row?;

            match records.last_mut() {
                Some(last) if last.id == id => last.tags.extend(tag),
                _ => records.push(PosterRecord {
                    id,
                    image_path,
                    tags: tag.into_iter().collect(),
                }),
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_posters_with_tags() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();

        let tagged = db.insert_poster("attachments/jazz.png", "Jazz Festival in Austin", now).unwrap();
        let untagged = db.insert_poster("attachments/blank.png", "", now).unwrap();

        for name in ["Austin", "Jazz Festival"] {
            let tag = db.get_or_create_tag(name).unwrap();
            db.link_poster_tag(tagged, tag).unwrap();
        }

        let records = db.posters_with_tags().unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].id, tagged);
        assert_eq!(records[0].image_path, "attachments/jazz.png");
        assert_eq!(records[0].tags, vec!["Austin", "Jazz Festival"]);

        assert_eq!(records[1].id, untagged);
        assert!(records[1].tags.is_empty());
    }

    #[test]
    fn test_tag_names_with_commas_survive() {
        let db = Database::open_in_memory().unwrap();
        let poster = db.insert_poster("a.png", "", Utc::now()).unwrap();
        let tag = db.get_or_create_tag("Austin, TX").unwrap();
        db.link_poster_tag(poster, tag).unwrap();

        let records = db.posters_with_tags().unwrap();
        assert_eq!(records[0].tags, vec!["Austin, TX"]);
    }

    #[test]
    fn test_empty_store() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.posters_with_tags().unwrap().is_empty());
    }
}
