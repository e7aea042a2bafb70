//! SQLite persistence adapter.
//!
//! RULE: only store.rs talks to the database. The engine calls store
//! methods; it never executes SQL directly.
//!
//! The store is a single-slot key-value blob: one row holding the
//! JSON-serialized [`SaveData`]. Read failures and unparseable payloads
//! are reported as "no save exists" — never as an error the engine has
//! to handle mid-game.

use crate::error::GameResult;
use crate::save::SaveData;
use crate::types::TimestampMs;
use rusqlite::{params, Connection};

const SAVE_SLOT: &str = "solar";

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_save.sql"))?;
        Ok(())
    }

    /// Persist a snapshot, replacing any previous one.
    pub fn save_game(&self, data: &SaveData, saved_at: TimestampMs) -> GameResult<()> {
        let payload = serde_json::to_string(data)?;
        self.save_payload(&payload, saved_at)
    }

    /// Persist a raw payload string. `save_game` serializes through
    /// here; tests use it to plant malformed blobs.
    pub fn save_payload(&self, payload: &str, saved_at: TimestampMs) -> GameResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO save_slot (slot, payload, saved_at)
             VALUES (?1, ?2, ?3)",
            params![SAVE_SLOT, payload, saved_at],
        )?;
        Ok(())
    }

    /// Load the stored snapshot, sanitized. Returns `None` when no save
    /// exists, the row cannot be read, or the payload does not parse —
    /// all three mean "fresh start" to the caller.
    pub fn load_game(&self) -> Option<SaveData> {
        let payload: String = self
            .conn
            .query_row(
                "SELECT payload FROM save_slot WHERE slot = ?1",
                params![SAVE_SLOT],
                |row| row.get(0),
            )
            .ok()?;

        match serde_json::from_str::<SaveData>(&payload) {
            Ok(data) => Some(data.sanitize()),
            Err(e) => {
                log::warn!("Discarding unreadable save payload: {e}");
                None
            }
        }
    }

    /// Erase the stored snapshot. Used by the reset transaction.
    pub fn clear_save(&self) -> GameResult<()> {
        self.conn.execute(
            "DELETE FROM save_slot WHERE slot = ?1",
            params![SAVE_SLOT],
        )?;
        Ok(())
    }
}
