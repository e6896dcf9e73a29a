use serde::{Deserialize, Serialize};

/// Aggregate counters over the whole board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_ideas: i64,
    /// Sum of votes across all ideas.
    pub total_votes: i64,
    /// Ideas created within the trailing 7 days.
    pub this_week: i64,
    /// The highest-voted idea, or `null` when the board is empty.
    pub top_idea: Option<TopIdea>,
}

/// Vote count of the single highest-voted idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopIdea {
    pub votes: i64,
}
