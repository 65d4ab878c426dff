//! Record store boundary consumed by the progress engine

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    Achievement, CompletedGame, GameSeries, MediaItem, MediaKind, MediaSnapshot, UserProfile,
};

/// Persistence operations the engine needs. Read failures map to
/// `LorekeeperError::StoreRead`, write failures to `LorekeeperError::StoreWrite`.
pub trait RecordStore {
    fn list_completed_games(&self) -> Result<Vec<CompletedGame>>;

    fn list_media(&self, kind: MediaKind) -> Result<Vec<MediaItem>>;

    /// Series with their entries attached
    fn list_game_series(&self) -> Result<Vec<GameSeries>>;

    fn list_achievements(&self) -> Result<Vec<Achievement>>;

    /// Set `unlocked_at` on an achievement that is still locked and return
    /// whether this call changed it. Writing an already unlocked achievement
    /// must leave it unchanged and return `false`.
    fn update_achievement(&self, id: i64, unlocked_at: DateTime<Utc>) -> Result<bool>;

    fn upsert_profile(&self, profile: &UserProfile) -> Result<()>;

    fn get_profile(&self) -> Result<UserProfile>;

    /// Read every record the aggregator needs
    fn load_snapshot(&self) -> Result<MediaSnapshot> {
        let games = self.list_completed_games()?;
        let mut media = Vec::new();
        for kind in MediaKind::ALL {
            media.extend(self.list_media(kind)?);
        }
        let series = self.list_game_series()?;
        Ok(MediaSnapshot {
            games,
            media,
            series,
        })
    }
}
