//! Core progress engine for Lorekeeper
//!
//! This crate contains:
//! - Record, achievement and profile models
//! - Stats aggregation over the collection
//! - Dashboard breakdowns by year, rating, difficulty, platform and genre
//! - The achievement catalog and unlock evaluation
//! - The XP level curve
//! - The `RecordStore` trait and the recompute entry point

pub mod achievements;
pub mod breakdown;
pub mod error;
pub mod levels;
pub mod models;
pub mod play_time;
pub mod progress;
pub mod stats;
pub mod store;

#[cfg(test)]
mod testing;

pub use achievements::{compute_base_xp, AchievementDef, Evaluation, CATALOG};
pub use breakdown::CollectionBreakdown;
pub use error::*;
pub use levels::{level_from_xp, level_title, xp_cost, LevelInfo};
pub use models::*;
pub use play_time::{format_play_time, parse_play_time};
pub use progress::{recompute, recompute_at};
pub use stats::Stats;
pub use store::RecordStore;
