//! Domain models for the idea board.
//!
//! # Core Concepts
//!
//! - [`Idea`]: The primary record, a submitted proposal ranked by votes.
//! - [`Note`]: A free-text annotation appended to an idea. Append-only.
//! - [`Attachment`]: A file associated with an idea; the bytes live in the
//!   file store, the metadata lives here. Append-only.
//!
//! Notes and attachments are exclusively owned by one idea. No delete
//! operations are exposed anywhere in the API, so ownership is only
//! structural (cascade constraints in the schema).

mod attachment;
mod idea;
mod note;
mod stats;

pub use attachment::*;
pub use idea::*;
pub use note::*;
pub use stats::*;
