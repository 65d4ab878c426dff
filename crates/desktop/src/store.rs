//! SQLite-backed `RecordStore`

use std::path::Path;

use chrono::{DateTime, Utc};
use lorekeeper_core::{
    Achievement, CompletedGame, GameSeries, LorekeeperError, MediaItem, MediaKind, RecordStore,
    Result, UserProfile,
};
use rusqlite::Connection;

use crate::db;

fn read_err(e: rusqlite::Error) -> LorekeeperError {
    LorekeeperError::StoreRead(e.to_string())
}

fn write_err(e: rusqlite::Error) -> LorekeeperError {
    LorekeeperError::StoreWrite(e.to_string())
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (and initialize) the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open_connection(path).map_err(|e| {
            LorekeeperError::StoreRead(format!("cannot open {}: {}", path.display(), e))
        })?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = db::open_in_memory().map_err(read_err)?;
        Ok(Self { conn })
    }

    /// Direct access for inserting records
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for SqliteStore {
    fn list_completed_games(&self) -> Result<Vec<CompletedGame>> {
        db::get_all_completed_games(&self.conn).map_err(read_err)
    }

    fn list_media(&self, kind: MediaKind) -> Result<Vec<MediaItem>> {
        db::get_media(&self.conn, kind).map_err(read_err)
    }

    fn list_game_series(&self) -> Result<Vec<GameSeries>> {
        db::get_game_series(&self.conn).map_err(read_err)
    }

    fn list_achievements(&self) -> Result<Vec<Achievement>> {
        db::get_achievements(&self.conn).map_err(read_err)
    }

    fn update_achievement(&self, id: i64, unlocked_at: DateTime<Utc>) -> Result<bool> {
        let changed = db::unlock_achievement(&self.conn, id, unlocked_at).map_err(write_err)?;
        if !changed && !db::achievement_exists(&self.conn, id).map_err(write_err)? {
            return Err(LorekeeperError::StoreWrite(format!("achievement {} not found", id)));
        }
        Ok(changed)
    }

    fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        db::upsert_profile(&self.conn, profile).map_err(write_err)
    }

    fn get_profile(&self) -> Result<UserProfile> {
        db::get_profile(&self.conn).map_err(read_err)
    }
}
