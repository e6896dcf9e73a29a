use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-text annotation appended to an idea.
///
/// Notes are append-only: there is no edit or delete operation. They are
/// returned in insertion order inside their parent idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for appending a note to an idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteInput {
    /// The note text. Required, must be non-empty after trimming.
    /// `note` and `noteText` are accepted as aliases.
    #[serde(alias = "note", alias = "noteText")]
    pub content: String,
}
