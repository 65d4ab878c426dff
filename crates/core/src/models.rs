//! Shared data models for records, achievements and the user profile

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest rating a completed game can carry
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 11;

/// Display name of a rating on the 1 to 11 scale
pub fn rating_label(rating: i32) -> Option<&'static str> {
    let label = match rating {
        1 => "Tragédia",
        2 => "Terrível",
        3 => "Ruim",
        4 => "Medíocre",
        5 => "Tanto faz",
        6 => "Decente",
        7 => "Bom",
        8 => "Muito bom",
        9 => "Ótimo",
        10 => "Incrível",
        11 => "Jogo da vida",
        _ => return None,
    };
    Some(label)
}

/// Difficulty grade assigned to a completed game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    C,
    B,
    A,
    AA,
    AAA,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::C,
        Difficulty::B,
        Difficulty::A,
        Difficulty::AA,
        Difficulty::AAA,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::C => "C",
            Difficulty::B => "B",
            Difficulty::A => "A",
            Difficulty::AA => "AA",
            Difficulty::AAA => "AAA",
        }
    }

    /// Parse the stored grade. Unknown grades yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "C" => Some(Difficulty::C),
            "B" => Some(Difficulty::B),
            "A" => Some(Difficulty::A),
            "AA" => Some(Difficulty::AA),
            "AAA" => Some(Difficulty::AAA),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::C => "C (Fácil)",
            Difficulty::B => "B (Médio)",
            Difficulty::A => "A (Complicado)",
            Difficulty::AA => "AA (Difícil)",
            Difficulty::AAA => "AAA (Imperdoável)",
        }
    }
}

/// A finished game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedGame {
    pub id: i64,
    pub name: String,
    pub platform: String,
    pub genre: String,
    pub difficulty: Option<Difficulty>,
    pub rating: i32,
    pub play_time_seconds: i64,
    pub is_gold: bool,
    pub completion_date: Option<NaiveDate>,
}

impl CompletedGame {
    /// Play time with negative values clamped to zero
    pub fn play_time(&self) -> u64 {
        self.play_time_seconds.max(0) as u64
    }

    /// Rating if it falls inside the accepted scale
    pub fn valid_rating(&self) -> Option<i32> {
        (MIN_RATING..=MAX_RATING)
            .contains(&self.rating)
            .then_some(self.rating)
    }
}

/// Kinds of non-game media tracked by status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
    Anime,
    Manga,
    Book,
}

impl MediaKind {
    pub const ALL: [MediaKind; 5] = [
        MediaKind::Movie,
        MediaKind::Show,
        MediaKind::Anime,
        MediaKind::Manga,
        MediaKind::Book,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movies",
            MediaKind::Show => "TV Shows",
            MediaKind::Anime => "Anime",
            MediaKind::Manga => "Manga",
            MediaKind::Book => "Books",
        }
    }
}

/// Consumption status of a movie, show, anime, manga or book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MediaStatus {
    #[default]
    InProgress,
    Completed,
    Dropped,
    Paused,
    Planned,
    Unknown,
}

impl MediaStatus {
    /// Value written to the store
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::InProgress => "Assistindo",
            MediaStatus::Completed => "Concluído",
            MediaStatus::Dropped => "Dropado",
            MediaStatus::Paused => "Pausado",
            MediaStatus::Planned => "Planejado",
            MediaStatus::Unknown => "",
        }
    }

    /// Accepts the stored labels as well as their English names.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "Assistindo" | "Lendo" | "InProgress" | "Watching" | "Reading" => {
                MediaStatus::InProgress
            }
            "Concluído" | "Completed" => MediaStatus::Completed,
            "Dropado" | "Dropped" => MediaStatus::Dropped,
            "Pausado" | "Paused" => MediaStatus::Paused,
            "Planejado" | "Planned" => MediaStatus::Planned,
            _ => MediaStatus::Unknown,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MediaStatus::Completed)
    }
}

/// A movie, show, anime, manga or book entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    pub kind: MediaKind,
    pub title: String,
    pub status: MediaStatus,
}

/// One game inside a series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSeriesEntry {
    pub id: i64,
    pub series_id: i64,
    pub name: String,
    pub is_completed: bool,
}

/// A franchise with its entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSeries {
    pub id: i64,
    pub name: String,
    pub entries: Vec<GameSeriesEntry>,
}

impl GameSeries {
    /// True when the series has entries and every one of them is completed
    pub fn is_fully_completed(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.is_completed)
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_completed).count()
    }
}

/// Achievement row as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub xp: u32,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// The single experience profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub total_xp: u64,
    pub level: u32,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Profile as created on first initialization
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            total_xp: 0,
            level: 1,
            updated_at: now,
        }
    }
}

/// Everything the aggregator reads in one pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaSnapshot {
    pub games: Vec<CompletedGame>,
    pub media: Vec<MediaItem>,
    pub series: Vec<GameSeries>,
}

/// Result of a full recompute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeOutcome {
    pub profile: UserProfile,
    pub newly_unlocked: Vec<Achievement>,
    /// Keys whose unlock could not be persisted this round
    pub failed_unlocks: Vec<String>,
}
