//! Full recompute of achievements, XP and level

use chrono::{DateTime, Utc};

use crate::achievements::{compute_base_xp, evaluate};
use crate::error::Result;
use crate::levels::level_from_xp;
use crate::models::{RecomputeOutcome, UserProfile};
use crate::stats::Stats;
use crate::store::RecordStore;

/// Recompute progress as of now
pub fn recompute<S: RecordStore + ?Sized>(store: &S) -> Result<RecomputeOutcome> {
    recompute_at(store, Utc::now())
}

/// Read every record, unlock what the stats now satisfy and rewrite the
/// profile. Read failures abort before anything is written.
pub fn recompute_at<S: RecordStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
) -> Result<RecomputeOutcome> {
    let snapshot = store.load_snapshot()?;
    let achievements = store.list_achievements()?;

    let stats = Stats::aggregate(&snapshot);
    tracing::debug!(
        "Aggregated {} games, {} media items, {} series",
        snapshot.games.len(),
        snapshot.media.len(),
        snapshot.series.len()
    );

    let evaluation = evaluate(store, &stats, &achievements, now)?;

    let base_xp = compute_base_xp(&stats);
    let total_xp = base_xp + evaluation.total_achievement_xp;
    let level = level_from_xp(total_xp).level;

    let profile = UserProfile {
        total_xp,
        level,
        updated_at: now,
    };
    store.upsert_profile(&profile)?;

    tracing::info!(
        "Profile updated: {} XP ({} base + {} achievements), level {}, {} new unlocks",
        total_xp,
        base_xp,
        evaluation.total_achievement_xp,
        level,
        evaluation.newly_unlocked.len()
    );

    Ok(RecomputeOutcome {
        profile,
        newly_unlocked: evaluation.newly_unlocked,
        failed_unlocks: evaluation.failed_unlocks,
    })
}
