//! Command implementations for the `lorekeeper` binary

use std::io::Write;

use anyhow::Result;
use lorekeeper_core::{
    breakdown::GroupTotal, compute_base_xp, format_play_time, level_from_xp,
    recompute as recompute_progress, CollectionBreakdown, LevelInfo, MediaKind, RecordStore,
    Stats,
};
use lorekeeper_desktop::SqliteStore;
use serde::Serialize;

/// Everything `stats --json` prints
#[derive(Serialize)]
struct StatsReport {
    stats: Stats,
    base_xp: u64,
    breakdown: CollectionBreakdown,
}

fn write_level(out: &mut impl Write, info: &LevelInfo, total_xp: u64) -> Result<()> {
    writeln!(out, "Level {} - {}", info.level, info.title())?;
    writeln!(
        out,
        "{} XP total • {}/{} XP to level {} ({}%)",
        total_xp,
        info.current_xp,
        info.next_level_xp,
        info.level + 1,
        info.progress_percent()
    )?;
    Ok(())
}

pub fn level(out: &mut impl Write, xp: u64) -> Result<()> {
    write_level(out, &level_from_xp(xp), xp)
}

pub fn recompute(out: &mut impl Write, store: &SqliteStore, json: bool) -> Result<()> {
    let outcome = recompute_progress(store)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        return Ok(());
    }

    write_level(out, &level_from_xp(outcome.profile.total_xp), outcome.profile.total_xp)?;
    if outcome.newly_unlocked.is_empty() {
        writeln!(out, "No new achievements")?;
    }
    for achievement in &outcome.newly_unlocked {
        writeln!(
            out,
            "{} Unlocked: {} (+{} XP) - {}",
            achievement.icon, achievement.name, achievement.xp, achievement.description
        )?;
    }
    for key in &outcome.failed_unlocks {
        writeln!(out, "Could not save '{}', it will be retried on the next recompute", key)?;
    }
    Ok(())
}

pub fn profile(out: &mut impl Write, store: &SqliteStore) -> Result<()> {
    let profile = store.get_profile()?;
    write_level(out, &level_from_xp(profile.total_xp), profile.total_xp)?;
    writeln!(out, "Last updated {}", profile.updated_at.format("%d/%m/%Y %H:%M"))?;
    Ok(())
}

pub fn achievements(out: &mut impl Write, store: &SqliteStore) -> Result<()> {
    let mut all = store.list_achievements()?;
    all.sort_by(|a, b| {
        a.unlocked_at
            .is_none()
            .cmp(&b.unlocked_at.is_none())
            .then_with(|| a.name.cmp(&b.name))
    });

    let unlocked = all.iter().filter(|a| a.is_unlocked()).count();
    writeln!(out, "{}/{} achievements unlocked", unlocked, all.len())?;
    for a in &all {
        match a.unlocked_at {
            Some(at) => writeln!(
                out,
                "  {} {:<24} {:>4} XP  {}",
                a.icon,
                a.name,
                a.xp,
                at.format("%d/%m/%Y")
            )?,
            None => writeln!(out, "  🔒 {:<24} {:>4} XP  {}", a.name, a.xp, a.description)?,
        }
    }
    Ok(())
}

fn write_groups(out: &mut impl Write, title: &str, groups: &[GroupTotal]) -> Result<()> {
    if groups.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for group in groups {
        writeln!(
            out,
            "  {:<20} {:>4}  {}",
            group.name,
            group.count,
            format_play_time(group.play_time_seconds)
        )?;
    }
    Ok(())
}

pub fn stats(out: &mut impl Write, store: &SqliteStore, json: bool) -> Result<()> {
    let snapshot = store.load_snapshot()?;
    let stats = Stats::aggregate(&snapshot);
    let breakdown = CollectionBreakdown::aggregate(&snapshot);

    if json {
        let report = StatsReport {
            base_xp: compute_base_xp(&stats),
            stats,
            breakdown,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "Games completed:      {}", stats.completed_games_count)?;
    writeln!(
        out,
        "Total play time:      {}",
        format_play_time(stats.total_play_time_seconds)
    )?;
    writeln!(out, "Gold completions:     {}", stats.gold_completion_count)?;
    writeln!(out, "Platforms:            {}", stats.distinct_platform_count)?;
    writeln!(out, "Genres:               {}", stats.distinct_genre_count)?;
    writeln!(out, "Completion months:    {}", stats.distinct_completion_month_count)?;
    writeln!(out, "AAA completions:      {}", stats.aaa_difficulty_count)?;
    writeln!(out, "Full series:          {}", stats.fully_completed_series_count)?;
    for kind in MediaKind::ALL {
        writeln!(
            out,
            "{:<22}{}",
            format!("{}:", kind.label()),
            stats.completed_media(kind)
        )?;
    }
    writeln!(out, "Base XP:              {}", compute_base_xp(&stats))?;

    write_groups(out, "By year", &breakdown.by_year)?;
    if !breakdown.by_rating.is_empty() {
        writeln!(out)?;
        writeln!(out, "By rating")?;
        for rating in &breakdown.by_rating {
            writeln!(out, "  {:>2} {:<17} {:>4}", rating.rating, rating.label, rating.count)?;
        }
    }
    write_groups(out, "By difficulty", &breakdown.by_difficulty)?;
    write_groups(out, "By platform", &breakdown.by_platform)?;
    write_groups(out, "By genre", &breakdown.by_genre)?;

    if !breakdown.recent_games.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recently completed")?;
        for game in &breakdown.recent_games {
            let date = game
                .completion_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "--/--/----".to_string());
            writeln!(out, "  {}  {} ({})", date, game.name, game.platform)?;
        }
    }
    Ok(())
}
