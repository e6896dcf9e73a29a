use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Attachment, Note};

/// A submitted proposal on the board.
///
/// Ideas are ranked by `votes` (descending) in list responses and carry two
/// append-only child collections: notes and attachments. `updated_at` is
/// refreshed on every mutation to the idea or its children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    pub text: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub priority: Option<i64>,
    /// Never negative. Upvotes increment; downvotes floor at zero.
    pub votes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdeaInput {
    /// The idea text. Required, must be non-empty after trimming.
    /// `title` is accepted as an alias for clients using that name.
    #[serde(alias = "title")]
    pub text: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub priority: Option<i64>,
}

/// An idea with its nested notes and attachments, used for list and
/// detail responses.
///
/// The `idea` fields are flattened into the JSON response, with additional
/// `notes` and `attachments` arrays in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaWithDetails {
    #[serde(flatten)]
    pub idea: Idea,
    pub notes: Vec<Note>,
    pub attachments: Vec<Attachment>,
}
