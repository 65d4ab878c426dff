//! Collection breakdowns for the dashboard view

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::{rating_label, CompletedGame, Difficulty, MediaItem, MediaKind, MediaSnapshot};

/// Group name for games without a completion date or difficulty
pub const NOT_AVAILABLE: &str = "N/A";
/// How many of the latest completions are listed
pub const RECENT_GAMES_LIMIT: usize = 5;

/// Number of games and their summed play time within one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub name: String,
    pub count: u32,
    pub play_time_seconds: u64,
}

impl GroupTotal {
    fn new(name: String) -> Self {
        Self {
            name,
            count: 0,
            play_time_seconds: 0,
        }
    }

    fn add(&mut self, game: &CompletedGame) {
        self.count = self.count.saturating_add(1);
        self.play_time_seconds = self.play_time_seconds.saturating_add(game.play_time());
    }

    /// Play time rounded to the nearest hour
    pub fn hours(&self) -> u64 {
        self.play_time_seconds.saturating_add(1800) / 3600
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCount {
    pub rating: i32,
    pub label: String,
    pub count: u32,
}

/// Every record of a kind, whatever its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTotal {
    pub kind: MediaKind,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionBreakdown {
    pub total_games: u32,
    pub total_play_time_seconds: u64,
    pub media_totals: Vec<MediaTotal>,
    /// Ascending by year, undated games last
    pub by_year: Vec<GroupTotal>,
    /// Highest rating first. Ratings outside the scale are left out.
    pub by_rating: Vec<RatingCount>,
    /// Easiest grade first, ungraded games last
    pub by_difficulty: Vec<GroupTotal>,
    /// Most games first, ties by name
    pub by_platform: Vec<GroupTotal>,
    /// Most games first, ties by name
    pub by_genre: Vec<GroupTotal>,
    /// Latest completions first, undated games last
    pub recent_games: Vec<CompletedGame>,
}

impl CollectionBreakdown {
    pub fn aggregate(snapshot: &MediaSnapshot) -> Self {
        Self::from_records(&snapshot.games, &snapshot.media)
    }

    pub fn from_records(games: &[CompletedGame], media: &[MediaItem]) -> Self {
        let total_play_time_seconds = games
            .iter()
            .fold(0u64, |sum, game| sum.saturating_add(game.play_time()));

        let media_totals = MediaKind::ALL
            .into_iter()
            .map(|kind| MediaTotal {
                kind,
                count: media.iter().filter(|m| m.kind == kind).count() as u32,
            })
            .collect();

        let by_year = group_by(games, |game| match game.completion_date {
            Some(date) => date.year().to_string(),
            None => NOT_AVAILABLE.to_string(),
        });

        let mut ratings: BTreeMap<i32, u32> = BTreeMap::new();
        for rating in games.iter().filter_map(CompletedGame::valid_rating) {
            *ratings.entry(rating).or_default() += 1;
        }
        let by_rating = ratings
            .into_iter()
            .rev()
            .map(|(rating, count)| RatingCount {
                rating,
                label: rating_label(rating).unwrap_or_default().to_string(),
                count,
            })
            .collect();

        let by_difficulty = Difficulty::ALL
            .into_iter()
            .map(Some)
            .chain([None])
            .filter_map(|difficulty| {
                let name = difficulty.map_or(NOT_AVAILABLE, |d| d.label());
                let mut total = GroupTotal::new(name.to_string());
                for game in games.iter().filter(|g| g.difficulty == difficulty) {
                    total.add(game);
                }
                (total.count > 0).then_some(total)
            })
            .collect();

        let mut by_platform = group_by(games, |game| game.platform.clone());
        by_platform.sort_by(|a, b| b.count.cmp(&a.count));
        let mut by_genre = group_by(games, |game| game.genre.clone());
        by_genre.sort_by(|a, b| b.count.cmp(&a.count));

        let mut recent_games = games.to_vec();
        recent_games.sort_by(|a, b| b.completion_date.cmp(&a.completion_date));
        recent_games.truncate(RECENT_GAMES_LIMIT);

        Self {
            total_games: games.len() as u32,
            total_play_time_seconds,
            media_totals,
            by_year,
            by_rating,
            by_difficulty,
            by_platform,
            by_genre,
            recent_games,
        }
    }
}

/// Group games by name, sorted by name
fn group_by<F>(games: &[CompletedGame], key: F) -> Vec<GroupTotal>
where
    F: Fn(&CompletedGame) -> String,
{
    let mut groups: BTreeMap<String, GroupTotal> = BTreeMap::new();
    for game in games {
        let name = key(game);
        groups
            .entry(name.clone())
            .or_insert_with(|| GroupTotal::new(name))
            .add(game);
    }
    groups.into_values().collect()
}
