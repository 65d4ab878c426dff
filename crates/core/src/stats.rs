//! Aggregation of raw records into the statistics achievements are judged on

use std::collections::HashSet;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::{CompletedGame, Difficulty, GameSeries, MediaItem, MediaKind, MediaSnapshot};

/// Play time below this counts as a speedrun (exclusive)
pub const SPEEDRUN_LIMIT_SECONDS: u64 = 2 * 3600;
/// Play time at or above this counts as a marathon
pub const MARATHON_THRESHOLD_SECONDS: u64 = 100 * 3600;

/// Aggregated statistics over the whole collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub completed_games_count: u32,
    pub total_play_time_seconds: u64,
    pub gold_completion_count: u32,
    pub distinct_platform_count: u32,
    pub distinct_genre_count: u32,
    pub distinct_completion_month_count: u32,
    pub aaa_difficulty_count: u32,
    pub has_rating_eleven: bool,
    pub has_speedrun: bool,
    pub has_marathon: bool,
    pub fully_completed_series_count: u32,
    pub movies_watched_count: u32,
    pub shows_completed_count: u32,
    pub anime_completed_count: u32,
    pub manga_completed_count: u32,
    pub books_completed_count: u32,
}

impl Stats {
    /// Reduce a snapshot of the store into statistics
    pub fn aggregate(snapshot: &MediaSnapshot) -> Self {
        Self::from_records(&snapshot.games, &snapshot.media, &snapshot.series)
    }

    pub fn from_records(games: &[CompletedGame], media: &[MediaItem], series: &[GameSeries]) -> Self {
        let mut stats = Stats::default();

        let mut platforms: HashSet<&str> = HashSet::new();
        let mut genres: HashSet<&str> = HashSet::new();
        let mut months: HashSet<(i32, u32)> = HashSet::new();

        for game in games {
            let play_time = game.play_time();

            stats.completed_games_count += 1;
            stats.total_play_time_seconds = stats.total_play_time_seconds.saturating_add(play_time);

            if game.is_gold {
                stats.gold_completion_count += 1;
            }
            if game.difficulty == Some(Difficulty::AAA) {
                stats.aaa_difficulty_count += 1;
            }
            if game.valid_rating() == Some(11) {
                stats.has_rating_eleven = true;
            }
            if play_time > 0 && play_time < SPEEDRUN_LIMIT_SECONDS {
                stats.has_speedrun = true;
            }
            if play_time >= MARATHON_THRESHOLD_SECONDS {
                stats.has_marathon = true;
            }

            platforms.insert(game.platform.as_str());
            genres.insert(game.genre.as_str());
            if let Some(date) = game.completion_date {
                months.insert((date.year(), date.month()));
            }
        }

        stats.distinct_platform_count = platforms.len() as u32;
        stats.distinct_genre_count = genres.len() as u32;
        stats.distinct_completion_month_count = months.len() as u32;

        for item in media.iter().filter(|m| m.status.is_completed()) {
            match item.kind {
                MediaKind::Movie => stats.movies_watched_count += 1,
                MediaKind::Show => stats.shows_completed_count += 1,
                MediaKind::Anime => stats.anime_completed_count += 1,
                MediaKind::Manga => stats.manga_completed_count += 1,
                MediaKind::Book => stats.books_completed_count += 1,
            }
        }

        stats.fully_completed_series_count =
            series.iter().filter(|s| s.is_fully_completed()).count() as u32;

        stats
    }

    /// Completed count for a non-game media kind
    pub fn completed_media(&self, kind: MediaKind) -> u32 {
        match kind {
            MediaKind::Movie => self.movies_watched_count,
            MediaKind::Show => self.shows_completed_count,
            MediaKind::Anime => self.anime_completed_count,
            MediaKind::Manga => self.manga_completed_count,
            MediaKind::Book => self.books_completed_count,
        }
    }

    pub fn total_play_hours(&self) -> f64 {
        self.total_play_time_seconds as f64 / 3600.0
    }
}
