use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use lorekeeper_core::{
    parse_play_time, Achievement, CompletedGame, Difficulty, GameSeries, GameSeriesEntry,
    MediaItem, MediaKind, MediaStatus, UserProfile, CATALOG,
};
use rusqlite::{Connection, OptionalExtension, Result};

pub const DB_FILE_NAME: &str = "lorekeeper.db";

pub fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    init_tables(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_tables(&conn)?;
    Ok(conn)
}

pub fn init_tables(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS completed_games (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            console TEXT NOT NULL DEFAULT 'PC',
            genre TEXT NOT NULL DEFAULT 'Ação',
            completion_date TEXT,
            play_time_seconds INTEGER NOT NULL DEFAULT 0,
            rating INTEGER NOT NULL DEFAULT 7,
            difficulty TEXT NOT NULL DEFAULT 'B',
            is_gold INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // Migration: older databases kept play time as H:MM:SS text
    migrate_play_time_seconds(conn)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS game_series (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS game_series_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            series_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            is_completed INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            FOREIGN KEY (series_id) REFERENCES game_series(id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Movies are a watch log, every row is a finished viewing
    conn.execute(
        "CREATE TABLE IF NOT EXISTS movies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            genre TEXT NOT NULL DEFAULT 'Ação',
            watch_date TEXT,
            rating INTEGER NOT NULL DEFAULT 7,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    for (table, default_status) in [
        ("tv_shows", "Assistindo"),
        ("animes", "Assistindo"),
        ("manga", "Lendo"),
        ("books", "Lendo"),
    ] {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    genre TEXT NOT NULL DEFAULT 'Ação',
                    status TEXT NOT NULL DEFAULT '{}',
                    rating INTEGER,
                    created_at TEXT NOT NULL
                )",
                table, default_status
            ),
            [],
        )?;
    }

    conn.execute(
        "CREATE TABLE IF NOT EXISTS achievements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '🏆',
            xp INTEGER NOT NULL DEFAULT 50,
            unlocked_at TEXT DEFAULT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_profile (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            total_xp INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    let _ = conn.execute("CREATE INDEX IF NOT EXISTS idx_series_entries_series_id ON game_series_entries(series_id)", []);

    ensure_profile(conn)?;
    seed_achievements(conn)?;

    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> bool {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM pragma_table_info('{}') WHERE name = ?1", table),
        [column],
        |row| row.get::<_, i32>(0),
    )
    .map(|count| count > 0)
    .unwrap_or(false)
}

/// Add `play_time_seconds` and backfill it from the legacy `play_time` text column
fn migrate_play_time_seconds(conn: &Connection) -> Result<()> {
    if has_column(conn, "completed_games", "play_time_seconds") {
        return Ok(());
    }

    conn.execute(
        "ALTER TABLE completed_games ADD COLUMN play_time_seconds INTEGER NOT NULL DEFAULT 0",
        [],
    )?;

    if !has_column(conn, "completed_games", "play_time") {
        return Ok(());
    }

    let legacy: Vec<(i64, Option<String>)> = {
        let mut stmt = conn.prepare("SELECT rowid, play_time FROM completed_games")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;
        rows
    };

    for (rowid, play_time) in &legacy {
        let seconds = play_time.as_deref().map(parse_play_time).unwrap_or(0);
        conn.execute(
            "UPDATE completed_games SET play_time_seconds = ?1 WHERE rowid = ?2",
            (seconds, rowid),
        )?;
    }

    tracing::info!("Migrated play time for {} completed games", legacy.len());
    Ok(())
}

/// Create the single profile row if it is missing
pub fn ensure_profile(conn: &Connection) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR IGNORE INTO user_profile (id, total_xp, level, updated_at) VALUES (1, 0, 1, ?1)",
        [&now],
    )?;
    Ok(())
}

/// Insert catalog entries whose key is not stored yet. Existing rows keep their unlock state.
pub fn seed_achievements(conn: &Connection) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    for def in CATALOG.iter() {
        conn.execute(
            "INSERT OR IGNORE INTO achievements (key, name, description, icon, xp, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (def.key, def.name, def.description, def.icon, def.xp, &now),
        )?;
    }
    Ok(())
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub fn insert_completed_game(conn: &Connection, game: &CompletedGame) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO completed_games
         (name, console, genre, completion_date, play_time_seconds, rating, difficulty, is_gold, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            &game.name,
            &game.platform,
            &game.genre,
            game.completion_date.map(|d| d.format("%Y-%m-%d").to_string()),
            game.play_time_seconds,
            game.rating,
            game.difficulty.map(|d| d.as_str()).unwrap_or(""),
            game.is_gold as i32,
            &now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_all_completed_games(conn: &Connection) -> Result<Vec<CompletedGame>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, console, genre, completion_date, play_time_seconds, rating, difficulty, is_gold
         FROM completed_games ORDER BY id",
    )?;

    let games = stmt
        .query_map([], |row| {
            let completion_date: Option<String> = row.get(4)?;
            let difficulty: String = row.get(7)?;
            Ok(CompletedGame {
                id: row.get(0)?,
                name: row.get(1)?,
                platform: row.get(2)?,
                genre: row.get(3)?,
                completion_date: completion_date.as_deref().and_then(parse_date),
                play_time_seconds: row.get(5)?,
                rating: row.get(6)?,
                difficulty: Difficulty::parse(&difficulty),
                is_gold: row.get::<_, i32>(8)? != 0,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(games)
}

fn media_table(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movies",
        MediaKind::Show => "tv_shows",
        MediaKind::Anime => "animes",
        MediaKind::Manga => "manga",
        MediaKind::Book => "books",
    }
}

/// Insert a movie, show, anime, manga or book. Movies ignore `status`.
pub fn insert_media(conn: &Connection, kind: MediaKind, title: &str, status: MediaStatus) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    match kind {
        MediaKind::Movie => {
            conn.execute(
                "INSERT INTO movies (title, watch_date, created_at) VALUES (?1, ?2, ?2)",
                [title, now.as_str()],
            )?;
        }
        _ => {
            conn.execute(
                &format!(
                    "INSERT INTO {} (title, status, created_at) VALUES (?1, ?2, ?3)",
                    media_table(kind)
                ),
                [title, status.as_str(), now.as_str()],
            )?;
        }
    }
    Ok(conn.last_insert_rowid())
}

pub fn get_media(conn: &Connection, kind: MediaKind) -> Result<Vec<MediaItem>> {
    let sql = match kind {
        MediaKind::Movie => "SELECT id, title, 'Concluído' FROM movies ORDER BY id".to_string(),
        _ => format!("SELECT id, title, status FROM {} ORDER BY id", media_table(kind)),
    };
    let mut stmt = conn.prepare(&sql)?;

    let items = stmt
        .query_map([], |row| {
            let status: String = row.get(2)?;
            Ok(MediaItem {
                id: row.get(0)?,
                kind,
                title: row.get(1)?,
                status: MediaStatus::parse(&status),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(items)
}

pub fn insert_game_series(conn: &Connection, name: &str) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO game_series (name, created_at) VALUES (?1, ?2)",
        [name, now.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_series_entry(conn: &Connection, series_id: i64, name: &str, is_completed: bool) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO game_series_entries (series_id, name, is_completed, sort_order, created_at)
         VALUES (?1, ?2, ?3, (SELECT COUNT(*) FROM game_series_entries WHERE series_id = ?1), ?4)",
        (series_id, name, is_completed as i32, &now),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn set_series_entry_completed(conn: &Connection, entry_id: i64, is_completed: bool) -> Result<()> {
    conn.execute(
        "UPDATE game_series_entries SET is_completed = ?1 WHERE id = ?2",
        (is_completed as i32, entry_id),
    )?;
    Ok(())
}

pub fn get_game_series(conn: &Connection) -> Result<Vec<GameSeries>> {
    let mut series: Vec<GameSeries> = {
        let mut stmt = conn.prepare("SELECT id, name FROM game_series ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(GameSeries {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    entries: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        rows
    };

    let mut stmt = conn.prepare(
        "SELECT id, series_id, name, is_completed FROM game_series_entries ORDER BY series_id, sort_order, id",
    )?;
    let entries = stmt
        .query_map([], |row| {
            Ok(GameSeriesEntry {
                id: row.get(0)?,
                series_id: row.get(1)?,
                name: row.get(2)?,
                is_completed: row.get::<_, i32>(3)? != 0,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    // Entries whose series row is gone are dropped
    for entry in entries {
        if let Some(s) = series.iter_mut().find(|s| s.id == entry.series_id) {
            s.entries.push(entry);
        }
    }

    Ok(series)
}

/// All achievements, in catalog insertion order
pub fn get_achievements(conn: &Connection) -> Result<Vec<Achievement>> {
    let mut stmt = conn.prepare(
        "SELECT id, key, name, description, icon, xp, unlocked_at FROM achievements ORDER BY id",
    )?;

    let achievements = stmt
        .query_map([], |row| {
            let unlocked_at: Option<String> = row.get(6)?;
            Ok(Achievement {
                id: row.get(0)?,
                key: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
                icon: row.get(4)?,
                xp: row.get(5)?,
                unlocked_at: unlocked_at.as_deref().map(parse_timestamp),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(achievements)
}

/// Mark an achievement unlocked. Returns false when the row was already unlocked.
pub fn unlock_achievement(conn: &Connection, id: i64, unlocked_at: DateTime<Utc>) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE achievements SET unlocked_at = ?1 WHERE id = ?2 AND unlocked_at IS NULL",
        (unlocked_at.to_rfc3339(), id),
    )?;
    Ok(changed > 0)
}

pub fn achievement_exists(conn: &Connection, id: i64) -> Result<bool> {
    conn.query_row("SELECT 1 FROM achievements WHERE id = ?1", [id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
}

pub fn get_profile(conn: &Connection) -> Result<UserProfile> {
    conn.query_row(
        "SELECT total_xp, level, updated_at FROM user_profile WHERE id = 1",
        [],
        |row| {
            let updated_at: String = row.get(2)?;
            Ok(UserProfile {
                total_xp: row.get::<_, i64>(0)?.max(0) as u64,
                level: row.get::<_, i64>(1)?.max(1) as u32,
                updated_at: parse_timestamp(&updated_at),
            })
        },
    )
}

/// XP beyond what SQLite's INTEGER holds is stored as `i64::MAX`
pub fn upsert_profile(conn: &Connection, profile: &UserProfile) -> Result<()> {
    let total_xp = i64::try_from(profile.total_xp).unwrap_or(i64::MAX);
    conn.execute(
        "INSERT INTO user_profile (id, total_xp, level, updated_at) VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
         total_xp = excluded.total_xp,
         level = excluded.level,
         updated_at = excluded.updated_at",
        (total_xp, i64::from(profile.level), profile.updated_at.to_rfc3339()),
    )?;
    Ok(())
}
