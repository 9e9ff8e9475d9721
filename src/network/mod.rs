//! Network Layer
//!
//! HTTP transport for the game engine: wire protocol types, the axum
//! server with its per-user session registry, and the append-only
//! transaction journal.

pub mod journal;
pub mod protocol;
pub mod server;

pub use journal::{JournalEntry, TransactionJournal};
pub use server::{serve, ApiError, AppState, ServerConfig};
