//! Importance and idle scoring — pure numeric functions of category,
//! recency, and visit telemetry. No I/O.

use crate::classify::Category;
use tabwarden_core::reminder::TabActivitySnapshot;

const HOUR_MS: f64 = 3_600_000.0;

/// Importance score in [0, 1]: the category base, decayed by staleness and
/// boosted by cumulative focus time and visit count.
pub fn importance_score(category: Category, activity: &TabActivitySnapshot, now: i64) -> f64 {
    let mut score = category.base_score();

    if activity.last_active > 0 {
        let hours_idle = (now - activity.last_active) as f64 / HOUR_MS;
        score *= (1.0 - hours_idle / 24.0).clamp(0.3, 1.0);
    }

    if activity.total_active_ms > 0 {
        let hours_active = activity.total_active_ms as f64 / HOUR_MS;
        score *= (1.0 + hours_active / 24.0).min(1.2);
    }

    if activity.visit_count > 0 {
        score *= (1.0 + activity.visit_count as f64 / 10.0).min(1.2);
    }

    score.clamp(0.0, 1.0)
}

/// Idle score in [0, 1]: how long the tab has gone unfocused, saturating
/// at 24 hours. A never-focused tab scores 0.
pub fn idle_score(last_active: i64, now: i64) -> f64 {
    if last_active <= 0 {
        return 0.0;
    }
    let hours_idle = (now - last_active) as f64 / HOUR_MS;
    (hours_idle / 24.0).clamp(0.0, 1.0)
}

/// Display ordering score: equal-weight blend of importance and idleness.
pub fn combined_score(importance: f64, idle: f64) -> f64 {
    importance * 0.5 + idle * 0.5
}

/// Format a remaining duration, e.g. "2d 5h", "3h 12m", "45m".
pub fn format_time_left(ms: i64) -> String {
    if ms <= 0 {
        return "now".to_string();
    }
    let minutes = ms / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h", days, hours % 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Format how long ago a tab was last focused, e.g. "3h ago", "just now".
pub fn format_last_active(last_active: i64, now: i64) -> String {
    if last_active <= 0 {
        return "never".to_string();
    }
    let minutes = (now - last_active) / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}
