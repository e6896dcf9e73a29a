use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file associated with an idea.
///
/// The bytes are written to the file store under `stored_name`, a
/// collision-free name distinct from what the client uploaded. Only the
/// metadata is tracked in the database. Append-only, like notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub idea_id: Uuid,
    /// The filename as uploaded by the client, used as the suggested
    /// download name.
    pub original_name: String,
    /// Unique name in the file store (`{uuid}{extension}`).
    pub stored_name: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a file already written to the store, ready to be recorded
/// against an idea.
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub original_name: String,
    pub stored_name: String,
    pub mime_type: String,
    pub size: i64,
}
