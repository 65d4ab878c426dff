//! Achievement catalog and unlock evaluation
//!
//! The catalog keys are persisted by the store and used to match rows back to
//! their predicates, so they must never be renamed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Achievement;
use crate::stats::Stats;
use crate::store::RecordStore;

const HOUR: u64 = 3600;

/// XP granted per completed record of each kind
pub const GAME_XP: u64 = 30;
pub const MOVIE_XP: u64 = 10;
pub const SHOW_XP: u64 = 20;
pub const ANIME_XP: u64 = 15;
pub const MANGA_XP: u64 = 15;
pub const BOOK_XP: u64 = 20;

/// A catalog entry: metadata plus the condition that unlocks it
pub struct AchievementDef {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub xp: u32,
    check: fn(&Stats) -> bool,
}

impl AchievementDef {
    pub fn is_met(&self, stats: &Stats) -> bool {
        (self.check)(stats)
    }

    pub fn by_key(key: &str) -> Option<&'static AchievementDef> {
        CATALOG.iter().find(|def| def.key == key)
    }
}

pub static CATALOG: [AchievementDef; 20] = [
    AchievementDef {
        key: "first_game",
        name: "Primeiro Passo",
        description: "Zerar o primeiro jogo",
        icon: "🎮",
        xp: 50,
        check: |s| s.completed_games_count >= 1,
    },
    AchievementDef {
        key: "ten_games",
        name: "Veterano",
        description: "Zerar 10 jogos",
        icon: "⭐",
        xp: 100,
        check: |s| s.completed_games_count >= 10,
    },
    AchievementDef {
        key: "fifty_games",
        name: "Lendário",
        description: "Zerar 50 jogos",
        icon: "👑",
        xp: 250,
        check: |s| s.completed_games_count >= 50,
    },
    AchievementDef {
        key: "hundred_games",
        name: "Centurião",
        description: "Zerar 100 jogos",
        icon: "💎",
        xp: 500,
        check: |s| s.completed_games_count >= 100,
    },
    AchievementDef {
        key: "speedrunner",
        name: "Speedrunner",
        description: "Zerar um jogo em menos de 2 horas",
        icon: "⚡",
        xp: 100,
        check: |s| s.has_speedrun,
    },
    AchievementDef {
        key: "marathon",
        name: "Maratonista",
        description: "Zerar um jogo com mais de 100 horas",
        icon: "🏃",
        xp: 150,
        check: |s| s.has_marathon,
    },
    AchievementDef {
        key: "perfectionist",
        name: "Perfeccionista",
        description: "Obter 5 jogos com 100%/Platina",
        icon: "🏆",
        xp: 200,
        check: |s| s.gold_completion_count >= 5,
    },
    AchievementDef {
        key: "bookworm",
        name: "Rato de Biblioteca",
        description: "Ler 5 livros",
        icon: "📚",
        xp: 100,
        check: |s| s.books_completed_count >= 5,
    },
    AchievementDef {
        key: "otaku",
        name: "Otaku",
        description: "Assistir 10 animes",
        icon: "🍥",
        xp: 100,
        check: |s| s.anime_completed_count >= 10,
    },
    AchievementDef {
        key: "cinephile",
        name: "Cinéfilo",
        description: "Assistir 20 filmes",
        icon: "🎬",
        xp: 100,
        check: |s| s.movies_watched_count >= 20,
    },
    AchievementDef {
        key: "binge_watcher",
        name: "Binge Watcher",
        description: "Concluir 5 séries de TV",
        icon: "📺",
        xp: 100,
        check: |s| s.shows_completed_count >= 5,
    },
    AchievementDef {
        key: "manga_reader",
        name: "Leitor de Mangá",
        description: "Ler 10 mangás",
        icon: "📖",
        xp: 100,
        check: |s| s.manga_completed_count >= 10,
    },
    AchievementDef {
        key: "all_platforms",
        name: "Multiplataforma",
        description: "Zerar jogos em 5+ plataformas diferentes",
        icon: "🌐",
        xp: 150,
        check: |s| s.distinct_platform_count >= 5,
    },
    AchievementDef {
        key: "genre_explorer",
        name: "Explorador de Gêneros",
        description: "Zerar jogos de 8+ gêneros diferentes",
        icon: "🗺️",
        xp: 150,
        check: |s| s.distinct_genre_count >= 8,
    },
    AchievementDef {
        key: "series_complete",
        name: "Colecionador",
        description: "Completar uma série de jogos inteira",
        icon: "📦",
        xp: 200,
        check: |s| s.fully_completed_series_count >= 1,
    },
    AchievementDef {
        key: "five_hundred_hours",
        name: "500 Horas",
        description: "Acumular 500 horas de jogo",
        icon: "⏰",
        xp: 200,
        check: |s| s.total_play_time_seconds >= 500 * HOUR,
    },
    AchievementDef {
        key: "thousand_hours",
        name: "Mil Horas",
        description: "Acumular 1000 horas de jogo",
        icon: "🔥",
        xp: 500,
        check: |s| s.total_play_time_seconds >= 1000 * HOUR,
    },
    AchievementDef {
        key: "max_rating",
        name: "Jogo da Vida",
        description: "Dar nota 11 para um jogo",
        icon: "💫",
        xp: 50,
        check: |s| s.has_rating_eleven,
    },
    AchievementDef {
        key: "triple_aaa",
        name: "Desafio AAA",
        description: "Zerar 3 jogos com dificuldade AAA",
        icon: "💀",
        xp: 200,
        check: |s| s.aaa_difficulty_count >= 3,
    },
    AchievementDef {
        key: "daily_player",
        name: "Dedicado",
        description: "Zerar jogos em 12+ meses diferentes",
        icon: "📅",
        xp: 150,
        check: |s| s.distinct_completion_month_count >= 12,
    },
];

/// XP earned from collection size alone
pub fn compute_base_xp(stats: &Stats) -> u64 {
    stats.completed_games_count as u64 * GAME_XP
        + stats.movies_watched_count as u64 * MOVIE_XP
        + stats.shows_completed_count as u64 * SHOW_XP
        + stats.anime_completed_count as u64 * ANIME_XP
        + stats.manga_completed_count as u64 * MANGA_XP
        + stats.books_completed_count as u64 * BOOK_XP
}

/// Sum of XP over unlocked achievements
pub fn unlocked_xp(achievements: &[Achievement]) -> u64 {
    achievements
        .iter()
        .filter(|a| a.is_unlocked())
        .map(|a| a.xp as u64)
        .sum()
}

/// Locked achievements whose condition now holds. Rows with a key missing
/// from the catalog are never unlocked.
pub fn pending_unlocks<'a>(stats: &Stats, achievements: &'a [Achievement]) -> Vec<&'a Achievement> {
    achievements
        .iter()
        .filter(|a| !a.is_unlocked())
        .filter(|a| match AchievementDef::by_key(&a.key) {
            Some(def) => def.is_met(stats),
            None => {
                tracing::warn!("Achievement '{}' has no catalog entry, skipping", a.key);
                false
            }
        })
        .collect()
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Evaluation {
    pub newly_unlocked: Vec<Achievement>,
    pub failed_unlocks: Vec<String>,
    /// XP of every unlocked achievement, read back from the store
    pub total_achievement_xp: u64,
}

/// Unlock every pending achievement in the store, then total achievement XP
/// from a fresh read. A failed unlock write is logged and left for the next run.
pub fn evaluate<S: RecordStore + ?Sized>(
    store: &S,
    stats: &Stats,
    achievements: &[Achievement],
    now: DateTime<Utc>,
) -> Result<Evaluation> {
    let mut evaluation = Evaluation::default();

    for achievement in pending_unlocks(stats, achievements) {
        match store.update_achievement(achievement.id, now) {
            Ok(false) => {
                tracing::debug!("Achievement '{}' was already unlocked", achievement.key);
            }
            Ok(true) => {
                tracing::info!("Unlocked achievement '{}' (+{} XP)", achievement.key, achievement.xp);
                evaluation.newly_unlocked.push(Achievement {
                    unlocked_at: Some(now),
                    ..achievement.clone()
                });
            }
            Err(e) => {
                tracing::warn!("Failed to unlock achievement '{}': {}", achievement.key, e);
                evaluation.failed_unlocks.push(achievement.key.clone());
            }
        }
    }

    let stored = store.list_achievements()?;
    evaluation.total_achievement_xp = unlocked_xp(&stored);

    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use std::collections::HashSet;

    fn met_keys(stats: &Stats) -> HashSet<&'static str> {
        CATALOG
            .iter()
            .filter(|def| def.is_met(stats))
            .map(|def| def.key)
            .collect()
    }

    #[test]
    fn catalog_has_twenty_unique_keys() {
        let keys: HashSet<_> = CATALOG.iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), 20);
        assert!(CATALOG.iter().all(|d| d.xp > 0));
    }

    #[test]
    fn by_key_finds_definitions() {
        assert_eq!(AchievementDef::by_key("otaku").map(|d| d.xp), Some(100));
        assert!(AchievementDef::by_key("unknown").is_none());
    }

    #[test]
    fn nothing_met_on_empty_stats() {
        assert!(met_keys(&Stats::default()).is_empty());
    }

    #[test]
    fn ten_game_scenario_thresholds() {
        let stats = Stats {
            completed_games_count: 10,
            total_play_time_seconds: 400 * HOUR,
            gold_completion_count: 0,
            distinct_platform_count: 3,
            distinct_genre_count: 4,
            distinct_completion_month_count: 5,
            aaa_difficulty_count: 0,
            ..Stats::default()
        };
        let met = met_keys(&stats);
        assert!(met.contains("first_game"));
        assert!(met.contains("ten_games"));
        for key in [
            "fifty_games",
            "all_platforms",
            "genre_explorer",
            "five_hundred_hours",
            "triple_aaa",
            "daily_player",
            "perfectionist",
        ] {
            assert!(!met.contains(key), "{} should stay locked", key);
        }
    }

    #[test]
    fn every_key_has_a_reachable_condition() {
        let stats = Stats {
            completed_games_count: 100,
            total_play_time_seconds: 1000 * HOUR,
            gold_completion_count: 5,
            distinct_platform_count: 5,
            distinct_genre_count: 8,
            distinct_completion_month_count: 12,
            aaa_difficulty_count: 3,
            has_rating_eleven: true,
            has_speedrun: true,
            has_marathon: true,
            fully_completed_series_count: 1,
            movies_watched_count: 20,
            shows_completed_count: 5,
            anime_completed_count: 10,
            manga_completed_count: 10,
            books_completed_count: 5,
        };
        assert_eq!(met_keys(&stats).len(), 20);
    }

    #[test]
    fn hour_thresholds_are_inclusive() {
        let stats = Stats {
            total_play_time_seconds: 500 * HOUR - 1,
            ..Stats::default()
        };
        assert!(!met_keys(&stats).contains("five_hundred_hours"));

        let stats = Stats {
            total_play_time_seconds: 500 * HOUR,
            ..Stats::default()
        };
        let met = met_keys(&stats);
        assert!(met.contains("five_hundred_hours"));
        assert!(!met.contains("thousand_hours"));
    }

    #[test]
    fn base_xp_literal() {
        let stats = Stats {
            completed_games_count: 10,
            movies_watched_count: 5,
            shows_completed_count: 2,
            anime_completed_count: 0,
            manga_completed_count: 0,
            books_completed_count: 3,
            ..Stats::default()
        };
        assert_eq!(compute_base_xp(&stats), 450);
    }

    #[test]
    fn pending_skips_unlocked_and_unknown_rows() {
        let store = MemoryStore::seeded();
        let mut achievements = store.list_achievements().unwrap();
        achievements[0].unlocked_at = Some(Utc::now()); // first_game
        achievements.push(Achievement {
            id: 999,
            key: "retired_key".to_string(),
            name: "Retired".to_string(),
            description: String::new(),
            icon: String::new(),
            xp: 10,
            unlocked_at: None,
        });

        let stats = Stats {
            completed_games_count: 10,
            ..Stats::default()
        };
        let pending: Vec<_> = pending_unlocks(&stats, &achievements)
            .into_iter()
            .map(|a| a.key.as_str())
            .collect();
        assert_eq!(pending, vec!["ten_games"]);
    }

    #[test]
    fn evaluate_persists_unlocks_and_reads_back_xp() {
        let store = MemoryStore::seeded();
        let achievements = store.list_achievements().unwrap();
        let stats = Stats {
            completed_games_count: 1,
            has_rating_eleven: true,
            ..Stats::default()
        };
        let now = Utc::now();

        let evaluation = evaluate(&store, &stats, &achievements, now).unwrap();
        let keys: Vec<_> = evaluation.newly_unlocked.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["first_game", "max_rating"]);
        assert!(evaluation.newly_unlocked.iter().all(|a| a.unlocked_at == Some(now)));
        assert_eq!(evaluation.total_achievement_xp, 100);
        assert!(evaluation.failed_unlocks.is_empty());

        let stored = store.list_achievements().unwrap();
        assert_eq!(stored.iter().filter(|a| a.is_unlocked()).count(), 2);
    }

    #[test]
    fn failed_unlock_does_not_block_others() {
        let store = MemoryStore::seeded();
        store.fail_unlock_of("first_game");
        let achievements = store.list_achievements().unwrap();
        let stats = Stats {
            completed_games_count: 10,
            ..Stats::default()
        };

        let evaluation = evaluate(&store, &stats, &achievements, Utc::now()).unwrap();
        assert_eq!(evaluation.failed_unlocks, vec!["first_game".to_string()]);
        assert_eq!(evaluation.newly_unlocked.len(), 1);
        assert_eq!(evaluation.newly_unlocked[0].key, "ten_games");
        assert_eq!(evaluation.total_achievement_xp, 100);
    }

    #[test]
    fn already_unlocked_rows_are_never_rewritten() {
        let store = MemoryStore::seeded();
        let earlier = Utc::now() - chrono::Duration::days(3);
        let stats = Stats {
            completed_games_count: 1,
            ..Stats::default()
        };
        let achievements = store.list_achievements().unwrap();
        evaluate(&store, &stats, &achievements, earlier).unwrap();

        let achievements = store.list_achievements().unwrap();
        let evaluation = evaluate(&store, &stats, &achievements, Utc::now()).unwrap();
        assert!(evaluation.newly_unlocked.is_empty());

        let first = store
            .list_achievements()
            .unwrap()
            .into_iter()
            .find(|a| a.key == "first_game")
            .unwrap();
        assert_eq!(first.unlocked_at, Some(earlier));
    }

    #[test]
    fn stale_listing_does_not_report_unlock_twice() {
        let store = MemoryStore::seeded();
        let stats = Stats {
            completed_games_count: 1,
            ..Stats::default()
        };
        let stale = store.list_achievements().unwrap();

        let first = evaluate(&store, &stats, &stale, Utc::now()).unwrap();
        assert_eq!(first.newly_unlocked.len(), 1);

        // Same pre-unlock listing, as a concurrent run would have read it
        let second = evaluate(&store, &stats, &stale, Utc::now()).unwrap();
        assert!(second.newly_unlocked.is_empty());
        assert!(second.failed_unlocks.is_empty());
        assert_eq!(second.total_achievement_xp, 50);
    }
}
