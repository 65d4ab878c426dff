//! In-memory record store for unit tests

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::achievements::CATALOG;
use crate::error::{LorekeeperError, Result};
use crate::models::{
    Achievement, CompletedGame, Difficulty, GameSeries, GameSeriesEntry, MediaItem, MediaKind,
    MediaStatus, UserProfile,
};
use crate::store::RecordStore;

#[derive(Default)]
pub struct MemoryStore {
    games: RefCell<Vec<CompletedGame>>,
    media: RefCell<Vec<MediaItem>>,
    series: RefCell<Vec<GameSeries>>,
    achievements: RefCell<Vec<Achievement>>,
    profile: RefCell<Option<UserProfile>>,
    failing_unlocks: RefCell<HashSet<String>>,
    fail_reads: Cell<bool>,
    fail_profile_write: Cell<bool>,
    next_id: Cell<i64>,
}

impl MemoryStore {
    /// Store with the full catalog locked and a fresh profile
    pub fn seeded() -> Self {
        let store = Self::default();
        *store.achievements.borrow_mut() = CATALOG
            .iter()
            .enumerate()
            .map(|(i, def)| Achievement {
                id: i as i64 + 1,
                key: def.key.to_string(),
                name: def.name.to_string(),
                description: def.description.to_string(),
                icon: def.icon.to_string(),
                xp: def.xp,
                unlocked_at: None,
            })
            .collect();
        *store.profile.borrow_mut() = Some(UserProfile::initial(Utc::now()));
        store
    }

    fn next_id(&self) -> i64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    pub fn add_game(&self, platform: &str, genre: &str, play_time_seconds: i64) {
        let id = self.next_id();
        self.games.borrow_mut().push(CompletedGame {
            id,
            name: format!("Game {}", id),
            platform: platform.to_string(),
            genre: genre.to_string(),
            difficulty: Some(Difficulty::B),
            rating: 7,
            play_time_seconds,
            is_gold: false,
            completion_date: None,
        });
    }

    pub fn add_media(&self, kind: MediaKind, status: MediaStatus) {
        let id = self.next_id();
        self.media.borrow_mut().push(MediaItem {
            id,
            kind,
            title: format!("Title {}", id),
            status,
        });
    }

    pub fn add_series(&self, completed: &[bool]) {
        let series_id = self.next_id();
        let entries = completed
            .iter()
            .map(|done| GameSeriesEntry {
                id: self.next_id(),
                series_id,
                name: "Entry".to_string(),
                is_completed: *done,
            })
            .collect();
        self.series.borrow_mut().push(GameSeries {
            id: series_id,
            name: format!("Series {}", series_id),
            entries,
        });
    }

    pub fn fail_unlock_of(&self, key: &str) {
        self.failing_unlocks.borrow_mut().insert(key.to_string());
    }

    pub fn clear_unlock_failures(&self) {
        self.failing_unlocks.borrow_mut().clear();
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_profile_write(&self, fail: bool) {
        self.fail_profile_write.set(fail);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.get() {
            return Err(LorekeeperError::StoreRead("injected read failure".to_string()));
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn list_completed_games(&self) -> Result<Vec<CompletedGame>> {
        self.check_read()?;
        Ok(self.games.borrow().clone())
    }

    fn list_media(&self, kind: MediaKind) -> Result<Vec<MediaItem>> {
        self.check_read()?;
        Ok(self
            .media
            .borrow()
            .iter()
            .filter(|m| m.kind == kind)
            .cloned()
            .collect())
    }

    fn list_game_series(&self) -> Result<Vec<GameSeries>> {
        self.check_read()?;
        Ok(self.series.borrow().clone())
    }

    fn list_achievements(&self) -> Result<Vec<Achievement>> {
        self.check_read()?;
        Ok(self.achievements.borrow().clone())
    }

    fn update_achievement(&self, id: i64, unlocked_at: DateTime<Utc>) -> Result<bool> {
        let mut achievements = self.achievements.borrow_mut();
        let achievement = achievements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| LorekeeperError::StoreWrite(format!("no achievement {}", id)))?;
        if self.failing_unlocks.borrow().contains(&achievement.key) {
            return Err(LorekeeperError::StoreWrite(format!(
                "injected failure for {}",
                achievement.key
            )));
        }
        if achievement.unlocked_at.is_some() {
            return Ok(false);
        }
        achievement.unlocked_at = Some(unlocked_at);
        Ok(true)
    }

    fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        if self.fail_profile_write.get() {
            return Err(LorekeeperError::StoreWrite("injected profile failure".to_string()));
        }
        *self.profile.borrow_mut() = Some(profile.clone());
        Ok(())
    }

    fn get_profile(&self) -> Result<UserProfile> {
        self.check_read()?;
        self.profile
            .borrow()
            .clone()
            .ok_or_else(|| LorekeeperError::StoreRead("profile missing".to_string()))
    }
}
