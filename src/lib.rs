//! Idea board server: submit ideas, vote on them, append notes, and attach
//! files. Backed by an embedded SQLite database and an on-disk file store.

pub mod api;
pub mod db;
pub mod files;
pub mod models;
