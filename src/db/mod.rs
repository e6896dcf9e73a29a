mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::*;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Idea operations
    // ============================================================

    /// All ideas with nested notes and attachments, ranked by votes
    /// descending. Ties break by creation time ascending (oldest first).
    pub fn list_ideas(&self) -> Result<Vec<IdeaWithDetails>> {
        let ideas = self.all_idea_rows()?;
        ideas
            .into_iter()
            .map(|idea| self.with_details(idea))
            .collect()
    }

    fn all_idea_rows(&self) -> Result<Vec<Idea>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, text, description, author, priority, votes, created_at, updated_at
             FROM ideas ORDER BY votes DESC, created_at ASC",
        )?;

        let ideas = stmt
            .query_map([], map_idea_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ideas)
    }

    pub fn get_idea(&self, id: Uuid) -> Result<Option<IdeaWithDetails>> {
        match self.get_idea_row(id)? {
            Some(idea) => Ok(Some(self.with_details(idea)?)),
            None => Ok(None),
        }
    }

    fn get_idea_row(&self, id: Uuid) -> Result<Option<Idea>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, text, description, author, priority, votes, created_at, updated_at
             FROM ideas WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(map_idea_row(row)?))
        } else {
            Ok(None)
        }
    }

    fn with_details(&self, idea: Idea) -> Result<IdeaWithDetails> {
        let notes = self.get_notes(idea.id)?;
        let attachments = self.get_attachments(idea.id)?;
        Ok(IdeaWithDetails {
            idea,
            notes,
            attachments,
        })
    }

    pub fn create_idea(&self, input: CreateIdeaInput) -> Result<Idea> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO ideas (id, text, description, author, priority, votes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
            (
                id.to_string(),
                &input.text,
                &input.description,
                &input.author,
                input.priority,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Idea {
            id,
            text: input.text,
            description: input.description,
            author: input.author,
            priority: input.priority,
            votes: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Increment the idea's vote count by one.
    pub fn upvote(&self, id: Uuid) -> Result<Option<Idea>> {
        let Some(existing) = self.get_idea_row(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        conn.execute(
            "UPDATE ideas SET votes = votes + 1, updated_at = ? WHERE id = ?",
            (now.to_rfc3339(), id.to_string()),
        )?;

        Ok(Some(Idea {
            votes: existing.votes + 1,
            updated_at: now,
            ..existing
        }))
    }

    /// Decrement the idea's vote count by one, flooring at zero.
    /// A downvote at zero is a no-op and does not touch `updated_at`.
    pub fn downvote(&self, id: Uuid) -> Result<Option<Idea>> {
        let Some(existing) = self.get_idea_row(id)? else {
            return Ok(None);
        };

        if existing.votes == 0 {
            return Ok(Some(existing));
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        conn.execute(
            "UPDATE ideas SET votes = votes - 1, updated_at = ? WHERE id = ?",
            (now.to_rfc3339(), id.to_string()),
        )?;

        Ok(Some(Idea {
            votes: existing.votes - 1,
            updated_at: now,
            ..existing
        }))
    }

    // ============================================================
    // Note operations
    // ============================================================

    /// Append a note to an idea. Returns `None` if the idea does not exist.
    pub fn add_note(&self, idea_id: Uuid, input: CreateNoteInput) -> Result<Option<Note>> {
        if self.get_idea_row(idea_id)?.is_none() {
            return Ok(None);
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (id, idea_id, content, created_at) VALUES (?, ?, ?, ?)",
            (
                id.to_string(),
                idea_id.to_string(),
                &input.content,
                now.to_rfc3339(),
            ),
        )?;
        conn.execute(
            "UPDATE ideas SET updated_at = ? WHERE id = ?",
            (now.to_rfc3339(), idea_id.to_string()),
        )?;

        Ok(Some(Note {
            id,
            idea_id,
            content: input.content,
            created_at: now,
        }))
    }

    pub fn get_notes(&self, idea_id: Uuid) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, idea_id, content, created_at
             FROM notes WHERE idea_id = ? ORDER BY created_at ASC",
        )?;

        let notes = stmt
            .query_map([idea_id.to_string()], |row| {
                Ok(Note {
                    id: parse_uuid(row.get::<_, String>(0)?),
                    idea_id: parse_uuid(row.get::<_, String>(1)?),
                    content: row.get(2)?,
                    created_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    // ============================================================
    // Attachment operations
    // ============================================================

    /// Record an attachment against an idea. Returns `None` if the idea does
    /// not exist; the caller is responsible for removing the stored file in
    /// that case.
    pub fn add_attachment(&self, idea_id: Uuid, input: NewAttachment) -> Result<Option<Attachment>> {
        if self.get_idea_row(idea_id)?.is_none() {
            return Ok(None);
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO attachments (id, idea_id, original_name, stored_name, mime_type, size, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                id.to_string(),
                idea_id.to_string(),
                &input.original_name,
                &input.stored_name,
                &input.mime_type,
                input.size,
                now.to_rfc3339(),
            ),
        )?;
        conn.execute(
            "UPDATE ideas SET updated_at = ? WHERE id = ?",
            (now.to_rfc3339(), idea_id.to_string()),
        )?;

        Ok(Some(Attachment {
            id,
            idea_id,
            original_name: input.original_name,
            stored_name: input.stored_name,
            mime_type: input.mime_type,
            size: input.size,
            created_at: now,
        }))
    }

    pub fn get_attachments(&self, idea_id: Uuid) -> Result<Vec<Attachment>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, idea_id, original_name, stored_name, mime_type, size, created_at
             FROM attachments WHERE idea_id = ? ORDER BY created_at ASC",
        )?;

        let attachments = stmt
            .query_map([idea_id.to_string()], map_attachment_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(attachments)
    }

    pub fn get_attachment(&self, id: Uuid) -> Result<Option<Attachment>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, idea_id, original_name, stored_name, mime_type, size, created_at
             FROM attachments WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(map_attachment_row(row)?))
        } else {
            Ok(None)
        }
    }

    // ============================================================
    // Stats
    // ============================================================

    pub fn stats(&self) -> Result<Stats> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let (total_ideas, total_votes): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(votes), 0) FROM ideas",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        // RFC 3339 timestamps in UTC compare correctly as strings
        let week_ago = (Utc::now() - chrono::Duration::days(7)).to_rfc3339();
        let this_week: i64 = conn.query_row(
            "SELECT COUNT(*) FROM ideas WHERE created_at >= ?",
            [week_ago],
            |row| row.get(0),
        )?;

        let top_votes: Option<i64> =
            conn.query_row("SELECT MAX(votes) FROM ideas", [], |row| row.get(0))?;

        Ok(Stats {
            total_ideas,
            total_votes,
            this_week,
            top_idea: top_votes.map(|votes| TopIdea { votes }),
        })
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn map_idea_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Idea> {
    Ok(Idea {
        id: parse_uuid(row.get::<_, String>(0)?),
        text: row.get(1)?,
        description: row.get(2)?,
        author: row.get(3)?,
        priority: row.get(4)?,
        votes: row.get(5)?,
        created_at: parse_datetime(row.get::<_, String>(6)?),
        updated_at: parse_datetime(row.get::<_, String>(7)?),
    })
}

fn map_attachment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: parse_uuid(row.get::<_, String>(0)?),
        idea_id: parse_uuid(row.get::<_, String>(1)?),
        original_name: row.get(2)?,
        stored_name: row.get(3)?,
        mime_type: row.get(4)?,
        size: row.get(5)?,
        created_at: parse_datetime(row.get::<_, String>(6)?),
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
