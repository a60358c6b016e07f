//! deja storage crate - SQLite persistence for conversation exchanges.
//!
//! Provides a WAL-mode SQLite database with migrations and an append-only
//! repository over the `exchanges` table.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::ConversationRepository;
